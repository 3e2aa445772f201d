//! Centralized environment variable names and default values for engine limits.

// Environment variable names
pub const ENV_MAX_KEY_LEN: &str = "MREXEC_MAX_KEY_LEN";
pub const ENV_MAX_VALUE_LEN: &str = "MREXEC_MAX_VALUE_LEN";
pub const ENV_MAX_INTERMEDIATE: &str = "MREXEC_MAX_INTERMEDIATE";
pub const ENV_MAX_VALUES_PER_KEY: &str = "MREXEC_MAX_VALUES_PER_KEY";
/// Default mapper thread count used by the demo binaries
pub const ENV_MAPPERS: &str = "MREXEC_MAPPERS";
/// Default reducer thread count used by the demo binaries
pub const ENV_REDUCERS: &str = "MREXEC_REDUCERS";

// Defaults (16-byte key/value buffers including the terminator)
pub const DEFAULT_MAX_KEY_LEN: usize = 15;
pub const DEFAULT_MAX_VALUE_LEN: usize = 15;
pub const DEFAULT_MAX_INTERMEDIATE: usize = 1024;
pub const DEFAULT_MAX_VALUES_PER_KEY: usize = 256;
