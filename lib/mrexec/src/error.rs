use crate::stats::Phase;
use thiserror::Error;

/// Returned to a map or reduce callback when an emit is rejected. The rejected
/// value is never recorded; the pipeline keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("store already holds the maximum of {limit} distinct keys")]
    CapacityExceeded { limit: usize },
    #[error("key {key:?} already holds the maximum of {limit} values")]
    ValuesPerKeyExceeded { key: String, limit: usize },
    #[error("key is {len} bytes, limit is {limit}")]
    KeyTooLong { len: usize, limit: usize },
    #[error("value is {len} bytes, limit is {limit}")]
    ValueTooLong { len: usize, limit: usize },
}

/// Failure of a whole `mr_exec` call. No output is produced when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("{phase} worker count must be at least 1")]
    InvalidWorkerCount { phase: Phase },
    #[error("limit {name} must be at least 1")]
    InvalidLimits { name: &'static str },
    #[error("input pair {index} is out of bounds: {source}")]
    InputOutOfBounds { index: usize, source: EmitError },
    #[error("{phase} worker {worker} panicked")]
    WorkerPanicked { phase: Phase, worker: usize },
}
