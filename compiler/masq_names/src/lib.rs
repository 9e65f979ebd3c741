//! Replacement naming for masq.
//!
//! - [`IdentifierCategory`]: what kind of word an identifier is, and the
//!   prefix and length bound that follow from it.
//! - [`NamingStrategy`]: pure candidate generation ([`CounterNaming`],
//!   [`VocabularyNaming`]).
//! - [`MappingTable`]: the single source of truth for replacements across a
//!   batch, persisted between sessions with `bincode`.

mod category;
mod policy;
mod strategy;
mod table;

pub use category::{IdentifierCategory, SHORT_NAME_LENGTH, WORD_LENGTH};
pub use policy::{check_shape, PolicyViolation};
pub use strategy::{
    fnv1a_64, CounterNaming, NameRequest, NamingStrategy, StrategyKind, UnknownStrategy,
    VocabularyNaming,
};
pub use table::{
    MappingEntry, MappingError, MappingState, MappingTable, SourceLocation,
    DEFAULT_RETRY_CEILING, STATE_VERSION,
};
