use crate::api::{InputPair, IntermediateEntry, MapEmitter, Mapper, ReduceEmitter, Reducer};
use crate::config::Limits;
use crate::error::ExecError;
use crate::output::MrOutput;
use crate::partition::chunk_ranges;
use crate::sort::sort_final_entries;
use crate::stats::{EmitCounts, ExecReport, Phase, PhaseStats, WorkerReport};
use crate::store::{FinalStore, IntermediateStore};
use crate::utils::as_ms;
use anyhow::{Context, Result};
use crossbeam_channel as channel;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs map-reduce jobs in-process under a fixed set of [`Limits`]. Each call
/// gets its own stores, so one engine can be shared and called concurrently.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    limits: Limits,
}

impl Engine {
    pub fn new(limits: Limits) -> Self { Self { limits } }

    pub fn from_env() -> Self { Self::new(Limits::from_env()) }

    pub fn limits(&self) -> &Limits { &self.limits }

    /// Map every input pair, reduce every intermediate key, and return the
    /// final store sorted by key. Blocks until both phases are done.
    pub fn exec<M, R>(&self, input: &[InputPair], mapper: M, mapper_count: usize, reducer: R, reducer_count: usize) -> Result<MrOutput>
    where
        M: Mapper,
        R: Reducer,
    {
        self.exec_with_report(input, mapper, mapper_count, reducer, reducer_count)
            .map(|(output, _)| output)
    }

    pub fn exec_with_report<M, R>(
        &self,
        input: &[InputPair],
        mapper: M,
        mapper_count: usize,
        reducer: R,
        reducer_count: usize,
    ) -> Result<(MrOutput, ExecReport)>
    where
        M: Mapper,
        R: Reducer,
    {
        self.limits.validate()?;
        if mapper_count == 0 {
            return Err(ExecError::InvalidWorkerCount { phase: Phase::Map }.into());
        }
        if reducer_count == 0 {
            return Err(ExecError::InvalidWorkerCount { phase: Phase::Reduce }.into());
        }
        for (index, pair) in input.iter().enumerate() {
            self.limits
                .check_pair(&pair.key, &pair.value)
                .map_err(|source| ExecError::InputOutOfBounds { index, source })?;
        }

        info!(inputs = input.len(), mappers = mapper_count, reducers = reducer_count, "mrexec starting map phase");

        // Map phase
        let intermediate = IntermediateStore::new(self.limits);
        let (map_stats, mut workers) = run_phase(Phase::Map, input, mapper_count, |chunk| {
            let emitter = MapEmitter::new(&intermediate);
            for pair in chunk {
                mapper.do_map(pair, &emitter);
            }
            emitter.counts()
        })
        .context("map phase failed")?;
        // frozen from here on: reducers only see this snapshot
        let entries: Vec<IntermediateEntry> = intermediate.into_entries();
        let intermediate_keys = entries.len();

        // Reduce phase
        let final_store = FinalStore::new(self.limits);
        let (reduce_stats, reduce_workers) = run_phase(Phase::Reduce, &entries, reducer_count, |chunk| {
            let emitter = ReduceEmitter::new(&final_store);
            for entry in chunk {
                reducer.do_reduce(entry, &emitter);
            }
            emitter.counts()
        })
        .context("reduce phase failed")?;
        workers.extend(reduce_workers);
        drop(entries);

        let (sorted, sort_stats) = sort_final_entries(final_store.into_entries());
        info!(phase = "sort", entries = sort_stats.entries, wall_ms = sort_stats.wall_ms, "Output assembled");

        let report = ExecReport { map: map_stats, intermediate_keys, reduce: reduce_stats, sort: sort_stats, workers };
        Ok((MrOutput::from_sorted(sorted), report))
    }
}

/// Runs `input -> map -> reduce -> sorted output` with limits taken from the
/// environment. Errors carry no partial output.
pub fn mr_exec<F, G>(input: &[InputPair], map: F, mapper_count: usize, reduce: G, reducer_count: usize) -> Result<MrOutput>
where
    F: Fn(&InputPair, &MapEmitter<'_>) + Sync,
    G: Fn(&IntermediateEntry, &ReduceEmitter<'_>) + Sync,
{
    Engine::from_env().exec(input, map, mapper_count, reduce, reducer_count)
}

/// One thread per partition of `items`, then join all of them. A panicking
/// worker fails the phase only after every other worker has been joined.
fn run_phase<T, W>(phase: Phase, items: &[T], workers: usize, work: W) -> Result<(PhaseStats, Vec<WorkerReport>)>
where
    T: Sync,
    W: Fn(&[T]) -> EmitCounts + Sync,
{
    let phase_start = Instant::now();
    let ranges = chunk_ranges(items.len(), workers);
    let (tx, rx) = channel::unbounded::<WorkerReport>();

    let panicked = thread::scope(|scope| -> Result<Vec<usize>> {
        let mut handles = Vec::with_capacity(ranges.len());
        for (worker, range) in ranges.iter().cloned().enumerate() {
            let tx = tx.clone();
            let work = &work;
            let chunk = &items[range.clone()];
            let handle = thread::Builder::new()
                .name(format!("mrexec-{}-{}", phase, worker))
                .spawn_scoped(scope, move || {
                    let start = Instant::now();
                    debug!(%phase, worker, start = range.start, end = range.end, "worker starting");
                    let counts = work(chunk);
                    let wall_ms = as_ms(start.elapsed());
                    debug!(%phase, worker, emits = counts.emits, rejected = counts.rejected, wall_ms, "worker done");
                    let report = WorkerReport {
                        phase,
                        worker,
                        items: chunk.len(),
                        range,
                        emits: counts.emits,
                        rejected: counts.rejected,
                        wall_ms,
                    };
                    if let Err(e) = tx.send(report) {
                        error!(%phase, worker, error = %e, "worker report dropped");
                    }
                })
                .with_context(|| format!("spawn {} worker {}", phase, worker))?;
            handles.push(handle);
        }

        // barrier
        let mut panicked = Vec::new();
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                error!(%phase, worker, "worker panicked");
                panicked.push(worker);
            }
        }
        Ok(panicked)
    })?;
    drop(tx);

    if let Some(&worker) = panicked.first() {
        return Err(ExecError::WorkerPanicked { phase, worker }.into());
    }

    let mut reports: Vec<WorkerReport> = rx.try_iter().collect();
    reports.sort_by_key(|r| r.worker);
    let stats = PhaseStats::from_reports(phase, &reports, as_ms(phase_start.elapsed()));
    info!(%phase,
          workers = stats.workers, items = stats.items,
          emits = stats.emits, rejected = stats.rejected,
          min_worker_ms = stats.min_worker_ms, max_worker_ms = stats.max_worker_ms,
          wall_ms = stats.wall_ms,
          "Phase complete");
    Ok((stats, reports))
}
