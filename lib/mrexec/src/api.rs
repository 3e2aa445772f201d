use crate::error::EmitError;
use crate::stats::{EmitCounts, EmitTally, Phase};
use crate::store::{FinalStore, IntermediateStore};
use serde::Serialize;
use tracing::warn;

// ========== Records ==========

/// One caller-owned input record. The engine only ever reads it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct InputPair {
    pub key: String,
    pub value: String,
}

impl InputPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// A key and every value emitted for it during the map phase, in lock
/// acquisition order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntermediateEntry {
    pub key: String,
    pub values: Vec<String>,
}

impl IntermediateEntry {
    pub fn count(&self) -> usize { self.values.len() }
}

// ========== Emit handles ==========

/// Handle given to map callbacks; `emit` appends to the intermediate store.
/// One handle exists per map worker and lives only as long as the phase.
pub struct MapEmitter<'a> {
    store: &'a IntermediateStore,
    tally: EmitTally,
}

impl<'a> MapEmitter<'a> {
    pub(crate) fn new(store: &'a IntermediateStore) -> Self {
        Self { store, tally: EmitTally::default() }
    }

    /// Records `value` under `key`. On error nothing was recorded and the
    /// callback decides whether to carry on.
    pub fn emit(&self, key: &str, value: &str) -> Result<(), EmitError> {
        let res = self.store.emit(key, value);
        record(Phase::Map, &self.tally, &res);
        res
    }

    pub(crate) fn counts(&self) -> EmitCounts { self.tally.counts() }
}

/// Handle given to reduce callbacks; `emit` appends to the final store.
pub struct ReduceEmitter<'a> {
    store: &'a FinalStore,
    tally: EmitTally,
}

impl<'a> ReduceEmitter<'a> {
    pub(crate) fn new(store: &'a FinalStore) -> Self {
        Self { store, tally: EmitTally::default() }
    }

    pub fn emit(&self, key: &str, value: &str) -> Result<(), EmitError> {
        let res = self.store.emit(key, value);
        record(Phase::Reduce, &self.tally, &res);
        res
    }

    pub(crate) fn counts(&self) -> EmitCounts { self.tally.counts() }
}

fn record(phase: Phase, tally: &EmitTally, res: &Result<(), EmitError>) {
    match res {
        Ok(()) => tally.accept(),
        Err(e) => {
            // one warning per worker, the rest only show up in the stats
            if tally.reject() == 1 {
                warn!(%phase, error = %e, "emit rejected");
            }
        }
    }
}

// ========== Core MapReduce traits ==========

/// Called once per input pair, from whichever mapper thread owns its partition.
pub trait Mapper: Sync {
    fn do_map(&self, pair: &InputPair, emit: &MapEmitter<'_>);
}

/// Called exactly once per intermediate key with that key's full value list.
/// Which reducer thread gets which key depends on map-phase insertion order.
pub trait Reducer: Sync {
    fn do_reduce(&self, entry: &IntermediateEntry, emit: &ReduceEmitter<'_>);
}

impl<F> Mapper for F
where
    F: Fn(&InputPair, &MapEmitter<'_>) + Sync,
{
    fn do_map(&self, pair: &InputPair, emit: &MapEmitter<'_>) { self(pair, emit) }
}

impl<F> Reducer for F
where
    F: Fn(&IntermediateEntry, &ReduceEmitter<'_>) + Sync,
{
    fn do_reduce(&self, entry: &IntermediateEntry, emit: &ReduceEmitter<'_>) { self(entry, emit) }
}
