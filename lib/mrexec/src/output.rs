use serde::Serialize;
use tracing::debug;

/// A final key with every value the reducers emitted for it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    pub key: String,
    pub values: Vec<String>,
}

impl OutputEntry {
    pub fn count(&self) -> usize { self.values.len() }
}

/// Result of a successful `mr_exec`: entries in ascending byte-wise key
/// order, no duplicate keys. Owned by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MrOutput {
    entries: Vec<OutputEntry>,
}

impl MrOutput {
    /// `entries` must already be sorted by key with no duplicates.
    pub(crate) fn from_sorted(entries: Vec<OutputEntry>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
        Self { entries }
    }

    pub fn count(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> &[OutputEntry] { &self.entries }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputEntry> { self.entries.iter() }

    pub fn get(&self, key: &str) -> Option<&OutputEntry> {
        self.entries
            .binary_search_by(|e| e.key.as_str().cmp(key))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn into_entries(self) -> Vec<OutputEntry> { self.entries }
}

impl IntoIterator for MrOutput {
    type Item = OutputEntry;
    type IntoIter = std::vec::IntoIter<OutputEntry>;
    fn into_iter(self) -> Self::IntoIter { self.entries.into_iter() }
}

impl<'a> IntoIterator for &'a MrOutput {
    type Item = &'a OutputEntry;
    type IntoIter = std::slice::Iter<'a, OutputEntry>;
    fn into_iter(self) -> Self::IntoIter { self.entries.iter() }
}

/// Releases every value list and the entry list, leaving `output` empty.
/// Safe to call any number of times.
pub fn free_output(output: &mut MrOutput) {
    if output.entries.is_empty() {
        return;
    }
    let released = output.entries.len();
    output.entries = Vec::new();
    debug!(released, "output released");
}
