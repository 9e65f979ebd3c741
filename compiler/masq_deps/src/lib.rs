//! Fragment dependency resolution for masq.
//!
//! A batch is only consistent if every fragment is classified before any
//! file that includes it. This crate finds the inclusion statements in each
//! lexed file, resolves them to batch files, and orders the batch.
//!
//! ```text
//! LexedSource ─── scan_includes() ───► FileIncludes
//!                                          │
//!                          DependencyGraph::build()  (MissingFragment)
//!                                          │
//!                          processing_order()        (CircularDependency)
//!                                          ▼
//!                                   ProcessingOrder
//! ```

mod graph;
mod include;

pub use graph::{DependencyError, DependencyGraph, FileIncludes, IncludeEdge, ProcessingOrder};
pub use include::{is_system_fragment, scan_includes, IncludeStatement, Replacement};
