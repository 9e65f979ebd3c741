//! Fixed-format source lexing for masq.
//!
//! Two layers:
//! - [`SourceLine`] splits a raw line into sequence, indicator, code and
//!   trailing zones by character column.
//! - [`scan_line`] tokenizes one code zone, protecting layout descriptors and
//!   literals, and [`LexedSource`] drives it over a whole file.
//!
//! Nothing here knows about identifier categories or renaming. Token texts
//! always concatenate back to the code zone they came from.

mod descriptor;
mod line;
mod reserved;
mod scanner;
mod source;
mod token;

pub use descriptor::{DescriptorError, LayoutDescriptor, Usage};
pub use line::{
    Indicator, SourceLine, ZoneOverflow, AREA_A_WIDTH, CODE_END_COLUMN, CODE_START_COLUMN,
    CODE_WIDTH, INDICATOR_COLUMN, SEQUENCE_WIDTH,
};
pub use reserved::{has_system_prefix, is_reserved, is_usage_word, SYSTEM_PREFIXES};
pub use scanner::{scan_line, ScanCarry, ScanWarning, ScanWarningKind, ScannedLine};
pub use source::{source_column, LexWarning, LexedLine, LexedSource};
pub use token::{Token, TokenKind};
