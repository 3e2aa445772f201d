use crate::output::OutputEntry;
use crate::stats::SortStats;
use crate::utils::as_ms;
use rayon::prelude::*;
use std::time::Instant;

/// Orders drained final-store entries by key bytes. Keys are unique, so the
/// unstable sort cannot reorder ties.
pub fn sort_final_entries(mut entries: Vec<(String, Vec<String>)>) -> (Vec<OutputEntry>, SortStats) {
    let start = Instant::now();
    entries.par_sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    let sorted: Vec<OutputEntry> = entries
        .into_iter()
        .map(|(key, values)| OutputEntry { key, values })
        .collect();
    let stats = SortStats { entries: sorted.len(), wall_ms: as_ms(start.elapsed()) };
    (sorted, stats)
}
