//! Diagnostic system for the masq anonymizer.
//!
//! Every recoverable problem and every fatal one is reported as a
//! [`Diagnostic`] with:
//! - an error code for searchability
//! - a severity
//! - a message
//! - a file/line/column location when there is one
//!
//! [`DiagnosticQueue`] collects them across a batch and returns them sorted.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Location, Severity};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;
