use mrexec::partition::chunk_ranges;
use mrexec::{mr_exec, Engine, InputPair, IntermediateEntry, MapEmitter, Phase, ReduceEmitter};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::thread::{self, ThreadId};

const MAX_THREADS: usize = 32;

fn padded(n: usize) -> Vec<InputPair> {
    (0..n).map(|i| InputPair::new(format!("{:4}", i), format!("{:4}", i))).collect()
}

fn forward(pair: &InputPair, emit: &MapEmitter<'_>) {
    emit.emit(&pair.key, &pair.value).unwrap();
}

/// Groups what each thread saw, keeping per-thread call order.
fn by_thread(seen: Vec<(ThreadId, String)>) -> Vec<Vec<String>> {
    let mut groups: HashMap<ThreadId, Vec<String>> = HashMap::new();
    for (id, key) in seen {
        groups.entry(id).or_default().push(key);
    }
    let mut groups: Vec<Vec<String>> = groups.into_values().collect();
    groups.sort();
    groups
}

#[test]
fn one_thread_per_mapper() {
    let input = padded(MAX_THREADS);
    for n in [2, 4, 8, 16, 32] {
        let threads = Mutex::new(HashSet::new());
        mr_exec(&input, |_p, _e| { threads.lock().unwrap().insert(thread::current().id()); }, n, |_e, _emit| {}, 1).unwrap();
        assert_eq!(threads.into_inner().unwrap().len(), n);
    }
}

#[test]
fn one_thread_per_reducer() {
    let input = padded(MAX_THREADS);
    for n in [2, 4, 8, 16, 32] {
        let threads = Mutex::new(HashSet::new());
        mr_exec(&input, forward, 1, |_e, _emit| { threads.lock().unwrap().insert(thread::current().id()); }, n).unwrap();
        assert_eq!(threads.into_inner().unwrap().len(), n);
    }
}

#[test]
fn input_partitions_are_contiguous_blocks() {
    let input = padded(1024);
    for n in [2, 4, 8, 16, 32] {
        let seen = Mutex::new(Vec::new());
        mr_exec(
            &input,
            |p: &InputPair, _e: &MapEmitter<'_>| seen.lock().unwrap().push((thread::current().id(), p.key.clone())),
            n,
            |_e: &IntermediateEntry, _emit: &ReduceEmitter<'_>| {},
            1,
        )
        .unwrap();
        let groups = by_thread(seen.into_inner().unwrap());
        let expected: Vec<Vec<String>> = input
            .chunks(1024 / n)
            .map(|c| c.iter().map(|p| p.key.clone()).collect())
            .collect();
        assert_eq!(groups, expected, "mappers={}", n);
    }
}

#[test]
fn intermediate_partitions_follow_insertion_order() {
    let input = padded(1024);
    for n in [2, 4, 8, 16, 32] {
        let seen = Mutex::new(Vec::new());
        mr_exec(
            &input,
            forward,
            1,
            |e: &IntermediateEntry, _emit: &ReduceEmitter<'_>| seen.lock().unwrap().push((thread::current().id(), e.key.clone())),
            n,
        )
        .unwrap();
        let groups = by_thread(seen.into_inner().unwrap());
        let expected: Vec<Vec<String>> = input
            .chunks(1024 / n)
            .map(|c| c.iter().map(|p| p.key.clone()).collect())
            .collect();
        assert_eq!(groups, expected, "reducers={}", n);
    }
}

#[test]
fn worker_ranges_cover_input_for_any_mapper_count() {
    let engine = Engine::default();
    for n in [0usize, 1, 7, 10] {
        let input = padded(n);
        for m in 1..=12 {
            let (_, report) = engine.exec_with_report(&input, forward, m, |_e: &IntermediateEntry, _emit: &ReduceEmitter<'_>| {}, 1).unwrap();
            let ranges: Vec<_> = report.workers_of(Phase::Map).map(|w| w.range.clone()).collect();
            assert_eq!(ranges.len(), m);
            assert_eq!(ranges, chunk_ranges(n, m));
            let mut next = 0;
            for r in &ranges {
                assert_eq!(r.start, next);
                next = r.end;
            }
            assert_eq!(next, n);
            assert_eq!(report.map.items, n);
        }
    }
}

#[test]
fn every_key_reduced_exactly_once() {
    let input: Vec<InputPair> = (0..300).map(|i| InputPair::new(format!("k{}", i % 37), i.to_string())).collect();
    let calls = Mutex::new(HashMap::new());
    let (_, report) = Engine::default()
        .exec_with_report(
            &input,
            forward,
            5,
            |e: &IntermediateEntry, _emit: &ReduceEmitter<'_>| *calls.lock().unwrap().entry(e.key.clone()).or_insert(0) += 1,
            6,
        )
        .unwrap();
    let calls = calls.into_inner().unwrap();
    assert_eq!(calls.len(), 37);
    assert!(calls.values().all(|&c| c == 1));
    assert_eq!(report.reduce.items, 37);
    assert_eq!(report.intermediate_keys, 37);
}
