//! Batch configuration.
//!
//! Built in code with the `with_*` methods, or read from a JSON file whose
//! keys match the field names in kebab case. Every key is optional.
//!
//! ```text
//! {
//!     "strategy": "vocabulary",
//!     "retry-ceiling": 128,
//!     "overlay-scope": "file",
//!     "warning-limit": 50,
//!     "never-rename": ["CUSTOMER-ID"]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use masq_names::{StrategyKind, DEFAULT_RETRY_CEILING};
use masq_rewrite::OverlayScope;

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options of one anonymization batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnonymizeConfig {
    /// Naming strategy for new mappings. A restored mapping state keeps the
    /// strategy it was written with.
    pub strategy: StrategyKind,
    /// Run every phase but produce no rewritten output.
    pub preview: bool,
    /// Candidates tried per identifier before giving up.
    pub retry_ceiling: u32,
    pub overlay_scope: OverlayScope,
    /// Most warnings reported per batch, 0 for no limit. Errors are always
    /// reported.
    pub warning_limit: usize,
    /// Identifiers that pass through unchanged in addition to reserved
    /// words.
    pub never_rename: Vec<String>,
}

impl Default for AnonymizeConfig {
    fn default() -> Self {
        AnonymizeConfig {
            strategy: StrategyKind::Counter,
            preview: false,
            retry_ceiling: DEFAULT_RETRY_CEILING,
            overlay_scope: OverlayScope::Batch,
            warning_limit: 0,
            never_rename: Vec::new(),
        }
    }
}

impl AnonymizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    #[must_use]
    pub fn with_retry_ceiling(mut self, retry_ceiling: u32) -> Self {
        self.retry_ceiling = retry_ceiling;
        self
    }

    #[must_use]
    pub fn with_overlay_scope(mut self, scope: OverlayScope) -> Self {
        self.overlay_scope = scope;
        self
    }

    #[must_use]
    pub fn with_warning_limit(mut self, limit: usize) -> Self {
        self.warning_limit = limit;
        self
    }

    #[must_use]
    pub fn with_never_rename<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.never_rename
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Parse a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
