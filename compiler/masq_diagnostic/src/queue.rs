//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Warning limits so one noisy file cannot drown the report
//! - Deduplication of identical diagnostics at the same location
//! - Stable ordering by file, line and column on flush

use rustc_hash::FxHashSet;

use crate::{Diagnostic, ErrorCode, Location};

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// `(code, location, message)` of every queued diagnostic, for dedup.
    seen: FxHashSet<(ErrorCode, Option<Location>, String)>,
    warning_count: usize,
    /// Warnings dropped because of the limit.
    suppressed: usize,
    /// Maximum number of warnings kept (0 = unlimited). Errors are never
    /// dropped.
    warning_limit: usize,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagnostic queue that keeps at most `limit` warnings.
    pub fn with_warning_limit(limit: usize) -> Self {
        DiagnosticQueue {
            warning_limit: limit,
            ..Self::default()
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        if !is_error && self.warning_limit > 0 && self.warning_count >= self.warning_limit {
            self.suppressed += 1;
            return false;
        }

        let key = (diag.code, diag.location.clone(), diag.message.clone());
        if !self.seen.insert(key) {
            return false;
        }

        if !is_error {
            self.warning_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Number of warnings dropped by the warning limit.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Sort diagnostics by location and return them.
    ///
    /// Diagnostics without a location come last, in insertion order. Clears
    /// the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result = std::mem::take(&mut self.diagnostics);
        result.sort_by(|a, b| match (&a.location, &b.location) {
            (Some(la), Some(lb)) => la.cmp(lb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        self.seen.clear();
        self.warning_count = 0;
        self.suppressed = 0;

        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}
