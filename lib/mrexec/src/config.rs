use crate::constants::*;
use crate::error::{EmitError, ExecError};
use crate::utils::env_usize;
use serde::Serialize;

/// Bounds enforced by the stores. Lengths are in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub max_key_len: usize,
    pub max_value_len: usize,
    /// Distinct keys the intermediate store accepts per call.
    pub max_intermediate_keys: usize,
    /// Values a single key accepts, in either store.
    pub max_values_per_key: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_key_len: DEFAULT_MAX_KEY_LEN,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            max_intermediate_keys: DEFAULT_MAX_INTERMEDIATE,
            max_values_per_key: DEFAULT_MAX_VALUES_PER_KEY,
        }
    }
}

impl Limits {
    /// Defaults overridden by any `MREXEC_MAX_*` variables that are set.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            max_key_len: env_usize(ENV_MAX_KEY_LEN).unwrap_or(d.max_key_len),
            max_value_len: env_usize(ENV_MAX_VALUE_LEN).unwrap_or(d.max_value_len),
            max_intermediate_keys: env_usize(ENV_MAX_INTERMEDIATE).unwrap_or(d.max_intermediate_keys),
            max_values_per_key: env_usize(ENV_MAX_VALUES_PER_KEY).unwrap_or(d.max_values_per_key),
        }
    }

    pub fn with_max_key_len(mut self, n: usize) -> Self { self.max_key_len = n; self }
    pub fn with_max_value_len(mut self, n: usize) -> Self { self.max_value_len = n; self }
    pub fn with_max_intermediate_keys(mut self, n: usize) -> Self { self.max_intermediate_keys = n; self }
    pub fn with_max_values_per_key(mut self, n: usize) -> Self { self.max_values_per_key = n; self }

    pub fn validate(&self) -> Result<(), ExecError> {
        let fields = [
            ("max_key_len", self.max_key_len),
            ("max_value_len", self.max_value_len),
            ("max_intermediate_keys", self.max_intermediate_keys),
            ("max_values_per_key", self.max_values_per_key),
        ];
        match fields.iter().find(|(_, v)| *v == 0) {
            Some(&(name, _)) => Err(ExecError::InvalidLimits { name }),
            None => Ok(()),
        }
    }

    pub(crate) fn check_pair(&self, key: &str, value: &str) -> Result<(), EmitError> {
        if key.len() > self.max_key_len {
            return Err(EmitError::KeyTooLong { len: key.len(), limit: self.max_key_len });
        }
        if value.len() > self.max_value_len {
            return Err(EmitError::ValueTooLong { len: value.len(), limit: self.max_value_len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_buffers() {
        let l = Limits::default();
        assert_eq!(l.max_key_len, 15);
        assert_eq!(l.max_value_len, 15);
        assert_eq!(l.max_intermediate_keys, 1024);
        assert_eq!(l.max_values_per_key, 256);
        assert!(l.validate().is_ok());
    }

    #[test]
    fn from_env_falls_back_on_bad_values() {
        // the only test touching this variable
        std::env::set_var(ENV_MAX_VALUES_PER_KEY, "not-a-number");
        assert_eq!(Limits::from_env().max_values_per_key, DEFAULT_MAX_VALUES_PER_KEY);
        std::env::set_var(ENV_MAX_VALUES_PER_KEY, "0");
        assert_eq!(Limits::from_env().max_values_per_key, DEFAULT_MAX_VALUES_PER_KEY);
        std::env::set_var(ENV_MAX_VALUES_PER_KEY, "12");
        assert_eq!(Limits::from_env().max_values_per_key, 12);
        std::env::remove_var(ENV_MAX_VALUES_PER_KEY);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let l = Limits::default().with_max_values_per_key(0);
        assert_eq!(l.validate(), Err(ExecError::InvalidLimits { name: "max_values_per_key" }));
    }

    #[test]
    fn pair_bounds_are_inclusive() {
        let l = Limits::default().with_max_key_len(3).with_max_value_len(2);
        assert!(l.check_pair("abc", "xy").is_ok());
        assert_eq!(l.check_pair("abcd", "x"), Err(EmitError::KeyTooLong { len: 4, limit: 3 }));
        assert_eq!(l.check_pair("a", "xyz"), Err(EmitError::ValueTooLong { len: 3, limit: 2 }));
    }
}
