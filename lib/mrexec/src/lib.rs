//! In-process parallel map-reduce.
//!
//! Input pairs are split into contiguous partitions, one mapper thread per
//! partition. Mappers emit into a bounded intermediate store; after every
//! mapper has been joined the store is frozen and split by position across
//! reducer threads, which emit into the final store. The final store is
//! returned sorted by key.

pub mod api;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod output;
pub mod partition;
pub mod sort;
pub mod stats;
pub mod store;
pub mod utils;

pub use api::{InputPair, IntermediateEntry, MapEmitter, Mapper, ReduceEmitter, Reducer};
pub use config::Limits;
pub use engine::{mr_exec, Engine};
pub use error::{EmitError, ExecError};
pub use output::{free_output, MrOutput, OutputEntry};
pub use stats::{ExecReport, Phase, PhaseStats, WorkerReport};
