use std::time::Duration;
use tracing::warn;

/// Reads a positive integer from the environment. Unset yields `None`;
/// unparsable or zero values are logged and ignored.
pub fn env_usize(name: &str) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(0) => {
            warn!(var = name, "ignoring zero value");
            None
        }
        Ok(v) => Some(v),
        Err(e) => {
            warn!(var = name, value = %raw, error = %e, "ignoring unparsable value");
            None
        }
    }
}

/// Worker count from `name`, falling back to the number of logical CPUs.
pub fn default_workers(name: &str) -> usize {
    env_usize(name).unwrap_or_else(num_cpus::get).max(1)
}

pub fn as_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}
