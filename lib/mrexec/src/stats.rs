use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Map,
    Reduce,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Map => f.write_str("map"),
            Phase::Reduce => f.write_str("reduce"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitCounts {
    pub emits: u64,
    pub rejected: u64,
}

/// Per-worker emit counters. Owned by a single worker thread.
#[derive(Default)]
pub(crate) struct EmitTally {
    emits: Cell<u64>,
    rejected: Cell<u64>,
}

impl EmitTally {
    pub(crate) fn accept(&self) {
        self.emits.set(self.emits.get() + 1);
    }

    /// Returns the rejection count including this one.
    pub(crate) fn reject(&self) -> u64 {
        let n = self.rejected.get() + 1;
        self.rejected.set(n);
        n
    }

    pub(crate) fn counts(&self) -> EmitCounts {
        EmitCounts { emits: self.emits.get(), rejected: self.rejected.get() }
    }
}

/// What one worker did: the partition it owned and how its emits went.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub phase: Phase,
    pub worker: usize,
    pub range: Range<usize>,
    pub items: usize,
    pub emits: u64,
    pub rejected: u64,
    pub wall_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub phase: Phase,
    pub workers: usize,
    pub items: usize,
    pub emits: u64,
    pub rejected: u64,
    pub min_worker_ms: u64,
    pub max_worker_ms: u64,
    pub wall_ms: u64,
}

impl PhaseStats {
    pub fn from_reports(phase: Phase, reports: &[WorkerReport], wall_ms: u64) -> Self {
        Self {
            phase,
            workers: reports.len(),
            items: reports.iter().map(|r| r.items).sum(),
            emits: reports.iter().map(|r| r.emits).sum(),
            rejected: reports.iter().map(|r| r.rejected).sum(),
            min_worker_ms: reports.iter().map(|r| r.wall_ms).min().unwrap_or(0),
            max_worker_ms: reports.iter().map(|r| r.wall_ms).max().unwrap_or(0),
            wall_ms,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SortStats {
    pub entries: usize,
    pub wall_ms: u64,
}

/// Everything observed during one `mr_exec` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExecReport {
    pub map: PhaseStats,
    pub intermediate_keys: usize,
    pub reduce: PhaseStats,
    pub sort: SortStats,
    /// Map workers first, then reduce workers, each ordered by worker index.
    pub workers: Vec<WorkerReport>,
}

impl ExecReport {
    pub fn workers_of(&self, phase: Phase) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(move |w| w.phase == phase)
    }
}
