//! Deterministic replacement-name generation.
//!
//! A strategy is a pure function from a [`NameRequest`] to a candidate
//! string. It does not check reserved words or collisions; the mapping table
//! does that and asks again with the next counter value when a candidate is
//! rejected.
//!
//! # Target length
//!
//! Both strategies aim at the length of the original identifier, clamped to
//! the category's bound, so a rewritten line keeps its shape whenever
//! possible:
//!
//! ```text
//! CUSTOMER-NAME  counter 7  ->  D000000000007
//! CUSTOMER-NAME  counter 7  ->  YOUNG-SPARR-7   (vocabulary, noun shrunk)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::IdentifierCategory;

/// Input to a naming strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NameRequest<'a> {
    /// The identifier as written in the source.
    pub original: &'a str,
    pub category: IdentifierCategory,
    /// Next value of the category counter. Strictly increasing per category.
    pub counter: u64,
}

impl NameRequest<'_> {
    /// Length the candidate should have: the original's length, within the
    /// category bound.
    pub fn target_length(&self) -> usize {
        self.original
            .chars()
            .count()
            .min(self.category.max_length())
    }
}

/// Produces candidate replacement names.
pub trait NamingStrategy {
    fn candidate(&self, request: &NameRequest<'_>) -> String;
}

// ─── Counter ───────────────────────────────────────────────────────────

/// Category prefix followed by the zero-padded counter.
///
/// The counter field is widened until the name reaches the target length.
/// The counter is never truncated, so a large counter can produce a name
/// longer than the target.
#[derive(Copy, Clone, Debug, Default)]
pub struct CounterNaming;

impl NamingStrategy for CounterNaming {
    fn candidate(&self, request: &NameRequest<'_>) -> String {
        let prefix = request.category.prefix();
        let width = request.target_length().saturating_sub(prefix.len()).max(1);
        format!("{prefix}{:0width$}", request.counter)
    }
}

// ─── Vocabulary ────────────────────────────────────────────────────────

/// `ADJECTIVE-NOUN-counter`, with the word pair picked by hashing the
/// upper-cased original.
///
/// Words are shortened (longest first, never below one letter) to meet the
/// target length. When even `A-B-counter` does not fit, the name falls back
/// to [`CounterNaming`].
#[derive(Copy, Clone, Debug, Default)]
pub struct VocabularyNaming;

static ADJECTIVES: [&str; 32] = [
    "AMBER", "BRAVE", "CALM", "DARK", "EAGER", "FAINT", "GOLDEN", "HOLLOW", "IVORY", "JOLLY",
    "KEEN", "LUCKY", "MELLOW", "NOBLE", "OAKEN", "PALE", "QUIET", "RAPID", "SILVER", "TAME",
    "UPPER", "VIVID", "WARM", "YOUNG", "ZESTY", "BROAD", "CRISP", "DUSTY", "EVEN", "FROSTY",
    "GENTLE", "HUMBLE",
];

static NOUNS: [&str; 32] = [
    "ANCHOR", "BADGER", "CANYON", "DELTA", "EMBER", "FALCON", "GARDEN", "HARBOR", "ISLAND",
    "JASPER", "KETTLE", "LANTERN", "MEADOW", "NEEDLE", "ORCHARD", "PEBBLE", "QUARRY", "RIVER",
    "SPARROW", "TIMBER", "UMBER", "VALLEY", "WILLOW", "YARROW", "ZEPHYR", "BRIDGE", "CEDAR",
    "DUNE", "FERN", "GLACIER", "HERON", "MAPLE",
];

impl VocabularyNaming {
    /// The word pair for an original identifier.
    pub fn words(original: &str) -> (&'static str, &'static str) {
        let hash = fnv1a_64(original.to_ascii_uppercase().as_bytes());
        let adjective = ADJECTIVES[index(hash, ADJECTIVES.len())];
        let noun = NOUNS[index(hash >> 32, NOUNS.len())];
        (adjective, noun)
    }
}

fn index(hash: u64, len: usize) -> usize {
    // `len` is a small constant, so the remainder always fits.
    usize::try_from(hash % len as u64).unwrap_or(0)
}

impl NamingStrategy for VocabularyNaming {
    fn candidate(&self, request: &NameRequest<'_>) -> String {
        let (adjective, noun) = Self::words(request.original);
        let counter = request.counter.to_string();
        let target = request.target_length();

        let mut adj_len = adjective.len();
        let mut noun_len = noun.len();
        while adj_len + noun_len + counter.len() + 2 > target && (adj_len > 1 || noun_len > 1) {
            if adj_len >= noun_len && adj_len > 1 {
                adj_len -= 1;
            } else {
                noun_len -= 1;
            }
        }

        if adj_len + noun_len + counter.len() + 2 > target {
            return CounterNaming.candidate(request);
        }

        format!("{}-{}-{counter}", &adjective[..adj_len], &noun[..noun_len])
    }
}

/// 64-bit FNV-1a.
///
/// Persisted vocabulary names depend on this exact function; changing it
/// makes previously issued names unreproducible.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

// ─── Selection ─────────────────────────────────────────────────────────

/// Which strategy a batch uses. Chosen once per batch and stored with the
/// mapping state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Counter,
    Vocabulary,
}

impl StrategyKind {
    pub fn namer(self) -> &'static dyn NamingStrategy {
        match self {
            StrategyKind::Counter => &CounterNaming,
            StrategyKind::Vocabulary => &VocabularyNaming,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Counter => f.write_str("counter"),
            StrategyKind::Vocabulary => f.write_str("vocabulary"),
        }
    }
}

/// Error parsing a strategy name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown naming strategy '{0}' (expected 'counter' or 'vocabulary')")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "counter" => Ok(StrategyKind::Counter),
            "vocabulary" | "vocab" => Ok(StrategyKind::Vocabulary),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}
