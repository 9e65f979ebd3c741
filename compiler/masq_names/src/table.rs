//! The batch-wide mapping from original identifiers to replacements.
//!
//! Keys are upper-cased originals, so `Customer-Name` and `CUSTOMER-NAME`
//! share one entry. Entries keep insertion order, which makes the persisted
//! state and any report built from it deterministic.
//!
//! # Counting
//!
//! [`MappingTable::resolve`] is called for declarations and counts each call
//! in [`MappingEntry::occurrences`]. [`MappingTable::lookup`] is the
//! read-only path used while rewriting and counts nothing.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use masq_lexer::{has_system_prefix, is_reserved};

use crate::policy::check_shape;
use crate::strategy::{NameRequest, StrategyKind};
use crate::IdentifierCategory;

/// Candidates tried per identifier before giving up.
pub const DEFAULT_RETRY_CEILING: u32 = 64;

/// Version of the persisted [`MappingState`] layout.
pub const STATE_VERSION: u32 = 1;

/// File and 1-based line where an identifier was first resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        SourceLocation {
            file: file.into(),
            line,
        }
    }
}

/// One original identifier and its replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Upper-cased original identifier.
    pub original: String,
    pub replacement: String,
    /// Category of the first resolution.
    pub category: IdentifierCategory,
    pub first_seen: SourceLocation,
    /// Number of resolutions (declarations) of this identifier.
    pub occurrences: u32,
    /// Shared with other programs through `EXTERNAL`.
    pub external: bool,
}

/// Errors from name generation and mapping state persistence.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("no valid {category} name for '{identifier}' after {attempts} attempts")]
    Exhausted {
        identifier: String,
        category: IdentifierCategory,
        attempts: u32,
    },
    #[error("failed to encode mapping state: {0}")]
    Encode(String),
    #[error("failed to decode mapping state: {0}")]
    Decode(String),
    #[error("mapping state version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("mapping state is inconsistent: {0}")]
    Inconsistent(String),
}

/// Serialized form of a [`MappingTable`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingState {
    pub version: u32,
    pub strategy: StrategyKind,
    pub entries: Vec<MappingEntry>,
    /// Last counter value per category, in category order.
    pub counters: Vec<(IdentifierCategory, u64)>,
    /// Sorted.
    pub never_rename: Vec<String>,
}

/// Batch-wide identifier mapping.
#[derive(Clone, Debug)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    /// Upper-cased original to index in `entries`.
    index: FxHashMap<String, usize>,
    /// Replacements issued per category.
    issued: FxHashMap<IdentifierCategory, FxHashSet<String>>,
    counters: FxHashMap<IdentifierCategory, u64>,
    never_rename: FxHashSet<String>,
    strategy: StrategyKind,
    retry_ceiling: u32,
}

impl MappingTable {
    pub fn new(strategy: StrategyKind) -> Self {
        MappingTable {
            entries: Vec::new(),
            index: FxHashMap::default(),
            issued: FxHashMap::default(),
            counters: FxHashMap::default(),
            never_rename: FxHashSet::default(),
            strategy,
            retry_ceiling: DEFAULT_RETRY_CEILING,
        }
    }

    #[must_use]
    pub fn with_retry_ceiling(mut self, retry_ceiling: u32) -> Self {
        self.retry_ceiling = retry_ceiling.max(1);
        self
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn retry_ceiling(&self) -> u32 {
        self.retry_ceiling
    }

    // ─── Queries ───────────────────────────────────────────────────────

    /// Replacement for an identifier, without counting an occurrence.
    pub fn lookup(&self, identifier: &str) -> Option<&str> {
        self.entry(identifier).map(|e| e.replacement.as_str())
    }

    pub fn entry(&self, identifier: &str) -> Option<&MappingEntry> {
        let key = identifier.to_ascii_uppercase();
        self.index.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last counter value handed out for a category (0 if none).
    pub fn counter(&self, category: IdentifierCategory) -> u64 {
        self.counters.get(&category).copied().unwrap_or(0)
    }

    /// Returns `true` if the identifier must pass through unchanged.
    pub fn is_frozen(&self, identifier: &str) -> bool {
        is_reserved(identifier)
            || has_system_prefix(identifier)
            || self
                .never_rename
                .contains(&identifier.to_ascii_uppercase())
    }

    /// Returns `true` if `name` was issued as a replacement in any category.
    pub fn is_issued(&self, name: &str) -> bool {
        self.issued.values().any(|names| names.contains(name))
    }

    // ─── Updates ───────────────────────────────────────────────────────

    /// Exclude an identifier from renaming. An existing mapping is kept.
    pub fn mark_never_rename(&mut self, identifier: &str) {
        self.never_rename.insert(identifier.to_ascii_uppercase());
    }

    /// Get or create the replacement for a declared identifier.
    ///
    /// An existing entry keeps its replacement and gains one occurrence.
    /// Frozen identifiers and [`IdentifierCategory::SystemReserved`] come
    /// back unchanged and are not recorded. Otherwise candidates are drawn
    /// from the strategy with successive counter values until one passes
    /// the naming policy and is not already taken.
    pub fn resolve(
        &mut self,
        identifier: &str,
        category: IdentifierCategory,
        location: &SourceLocation,
    ) -> Result<String, MappingError> {
        let key = identifier.to_ascii_uppercase();
        if let Some(&idx) = self.index.get(&key) {
            let entry = &mut self.entries[idx];
            entry.occurrences += 1;
            entry.external |= category.is_external();
            trace!(original = %key, occurrences = entry.occurrences, "resolved existing mapping");
            return Ok(entry.replacement.clone());
        }

        if !category.is_renameable() || self.is_frozen(identifier) {
            return Ok(identifier.to_string());
        }

        let replacement = self.generate(&key, category)?;
        debug!(
            original = %key,
            replacement = %replacement,
            category = %category,
            file = %location.file,
            line = location.line,
            "new mapping"
        );

        self.issued
            .entry(category)
            .or_default()
            .insert(replacement.clone());
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(MappingEntry {
            original: key,
            replacement: replacement.clone(),
            category,
            first_seen: location.clone(),
            occurrences: 1,
            external: category.is_external(),
        });
        Ok(replacement)
    }

    fn generate(&mut self, key: &str, category: IdentifierCategory) -> Result<String, MappingError> {
        let namer = self.strategy.namer();
        for _ in 0..self.retry_ceiling {
            let counter = self.next_counter(category);
            let candidate = namer.candidate(&NameRequest {
                original: key,
                category,
                counter,
            });
            if self.accepts(&candidate, category) {
                return Ok(candidate);
            }
            trace!(original = %key, candidate = %candidate, "candidate rejected");
        }
        Err(MappingError::Exhausted {
            identifier: key.to_string(),
            category,
            attempts: self.retry_ceiling,
        })
    }

    fn next_counter(&mut self, category: IdentifierCategory) -> u64 {
        let counter = self.counters.entry(category).or_insert(0);
        *counter += 1;
        *counter
    }

    fn accepts(&self, candidate: &str, category: IdentifierCategory) -> bool {
        check_shape(candidate, category).is_ok()
            && !self.is_issued(candidate)
            && !self.never_rename.contains(candidate)
            // Never reuse the spelling of a mapped original.
            && !self.index.contains_key(candidate)
    }

    // ─── Persistence ───────────────────────────────────────────────────

    /// Snapshot the table.
    pub fn to_state(&self) -> MappingState {
        let mut counters: Vec<(IdentifierCategory, u64)> =
            self.counters.iter().map(|(c, v)| (*c, *v)).collect();
        counters.sort_unstable();
        let mut never_rename: Vec<String> = self.never_rename.iter().cloned().collect();
        never_rename.sort_unstable();

        MappingState {
            version: STATE_VERSION,
            strategy: self.strategy,
            entries: self.entries.clone(),
            counters,
            never_rename,
        }
    }

    /// Rebuild a table from a snapshot, validating it.
    pub fn from_state(state: MappingState) -> Result<Self, MappingError> {
        if state.version != STATE_VERSION {
            return Err(MappingError::Version {
                found: state.version,
                expected: STATE_VERSION,
            });
        }

        let mut table = MappingTable::new(state.strategy);
        let mut replacements = FxHashSet::default();
        for entry in state.entries {
            if !replacements.insert(entry.replacement.clone()) {
                return Err(MappingError::Inconsistent(format!(
                    "replacement '{}' is issued twice",
                    entry.replacement
                )));
            }
            if table.index.contains_key(&entry.original) {
                return Err(MappingError::Inconsistent(format!(
                    "identifier '{}' is mapped twice",
                    entry.original
                )));
            }
            table
                .issued
                .entry(entry.category)
                .or_default()
                .insert(entry.replacement.clone());
            table.index.insert(entry.original.clone(), table.entries.len());
            table.entries.push(entry);
        }
        table.counters = state.counters.into_iter().collect();
        table.never_rename = state.never_rename.into_iter().collect();
        Ok(table)
    }

    /// Encode the table with `bincode`.
    pub fn persist(&self) -> Result<Vec<u8>, MappingError> {
        bincode::serialize(&self.to_state()).map_err(|e| MappingError::Encode(e.to_string()))
    }

    /// Decode a table produced by [`MappingTable::persist`].
    pub fn restore(bytes: &[u8]) -> Result<Self, MappingError> {
        let state: MappingState =
            bincode::deserialize(bytes).map_err(|e| MappingError::Decode(e.to_string()))?;
        Self::from_state(state)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
