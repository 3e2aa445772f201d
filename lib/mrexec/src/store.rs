//! Lock-protected accumulation tables for the two phases.
//!
//! Both stores are scoped to a single `mr_exec` call. Every emit takes the
//! store's one mutex, so appends are serialized and no key is ever inserted
//! twice. The intermediate store keeps insertion order because the reduce
//! phase partitions it by position.

use crate::api::IntermediateEntry;
use crate::config::Limits;
use crate::error::EmitError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct IntermediateTable {
    entries: Vec<IntermediateEntry>,
    index: HashMap<String, usize>,
}

/// Fixed-capacity key -> values table written by map workers.
pub struct IntermediateStore {
    limits: Limits,
    table: Mutex<IntermediateTable>,
}

impl IntermediateStore {
    pub fn new(limits: Limits) -> Self {
        Self { limits, table: Mutex::new(IntermediateTable::default()) }
    }

    pub fn emit(&self, key: &str, value: &str) -> Result<(), EmitError> {
        self.limits.check_pair(key, value)?;
        let mut guard = lock(&self.table);
        let table = &mut *guard;
        let slot = match table.index.get(key).copied() {
            Some(slot) => slot,
            None => {
                if table.entries.len() >= self.limits.max_intermediate_keys {
                    return Err(EmitError::CapacityExceeded { limit: self.limits.max_intermediate_keys });
                }
                table.entries.push(IntermediateEntry { key: key.to_owned(), values: Vec::new() });
                table.index.insert(key.to_owned(), table.entries.len() - 1);
                table.entries.len() - 1
            }
        };
        let entry = &mut table.entries[slot];
        if entry.values.len() >= self.limits.max_values_per_key {
            return Err(EmitError::ValuesPerKeyExceeded { key: key.to_owned(), limit: self.limits.max_values_per_key });
        }
        entry.values.push(value.to_owned());
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.table).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freezes the store. Entries come back in first-emit order.
    pub fn into_entries(self) -> Vec<IntermediateEntry> {
        self.table.into_inner().unwrap_or_else(PoisonError::into_inner).entries
    }
}

/// Growable key -> values table written by reduce workers.
pub struct FinalStore {
    limits: Limits,
    table: Mutex<HashMap<String, Vec<String>>>,
}

impl FinalStore {
    pub fn new(limits: Limits) -> Self {
        Self { limits, table: Mutex::new(HashMap::new()) }
    }

    pub fn emit(&self, key: &str, value: &str) -> Result<(), EmitError> {
        self.limits.check_pair(key, value)?;
        let mut table = lock(&self.table);
        match table.get_mut(key) {
            Some(values) => {
                if values.len() >= self.limits.max_values_per_key {
                    return Err(EmitError::ValuesPerKeyExceeded { key: key.to_owned(), limit: self.limits.max_values_per_key });
                }
                values.push(value.to_owned());
            }
            None => {
                table.insert(key.to_owned(), vec![value.to_owned()]);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.table).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unordered drain of every key and its values.
    pub fn into_entries(self) -> Vec<(String, Vec<String>)> {
        self.table.into_inner().unwrap_or_else(PoisonError::into_inner).into_iter().collect()
    }
}
