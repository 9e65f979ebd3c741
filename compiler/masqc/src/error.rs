//! Batch-level errors.

use std::path::PathBuf;

use masq_deps::DependencyError;
use masq_diagnostic::{Diagnostic, ErrorCode, Location};
use masq_names::MappingError;
use masq_rewrite::TransformError;

use crate::config::ConfigError;

/// Error that stops a batch, or the rewrite of one file.
#[derive(Debug, thiserror::Error)]
pub enum AnonymizeError {
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error("{}: {source}", .file.display())]
    Mapping {
        file: PathBuf,
        line: u32,
        #[source]
        source: MappingError,
    },
    #[error("mapping state: {0}")]
    State(MappingError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}: not part of the batch", .0.display())]
    UnknownFile(PathBuf),
    #[error(
        "{}: classified at position {found} but belongs at {expected} of the processing order",
        .file.display()
    )]
    OutOfOrder {
        file: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("no processing order; the batch has not been scanned")]
    NotScanned,
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnonymizeError {
    /// Diagnostic code, for errors that have one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AnonymizeError::Dependency(err) => Some(err.code()),
            AnonymizeError::Mapping {
                source: MappingError::Exhausted { .. },
                ..
            } => Some(ErrorCode::E1001),
            AnonymizeError::Transform(err) => Some(err.code()),
            _ => None,
        }
    }

    /// Diagnostic for errors that have a code.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            AnonymizeError::Dependency(err) => Some(err.to_diagnostic()),
            AnonymizeError::Transform(err) => Some(err.to_diagnostic()),
            AnonymizeError::Mapping { file, line, .. } => self.code().map(|code| {
                Diagnostic::error(code)
                    .with_message(self.to_string())
                    .at(Location::new(file.display().to_string(), *line, 1))
            }),
            _ => None,
        }
    }
}
