//! masq: batch anonymizer for fixed-format sources.
//!
//! Ties the workspace crates into one pipeline and provides the pieces of
//! the `masq` binary.
//!
//! ```text
//! masq_lexer ──► masq_deps ──► masq_rewrite::classify ──► masq_names
//!                                      │
//!                                      ▼
//!                masq_rewrite::OverlayTracker ──► masq_rewrite::Transformer
//! ```

pub mod cli;
mod config;
mod discovery;
mod error;
mod pipeline;

use std::sync::Once;

pub use config::{AnonymizeConfig, ConfigError};
pub use discovery::{
    discover_sources, discover_sources_in, is_source_file, SourceFile, SOURCE_EXTENSIONS,
};
pub use error::AnonymizeError;
pub use pipeline::{Anonymizer, BatchOutput, RewrittenFile};

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=masq_names=debug`.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
