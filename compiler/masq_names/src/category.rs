//! Identifier categories and their naming policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length bound for program and fragment names. These double as member
/// names in external libraries.
pub const SHORT_NAME_LENGTH: usize = 8;

/// Length bound for every other user-defined word.
pub const WORD_LENGTH: usize = 30;

/// Semantic category of a user-defined identifier.
///
/// The category decides the naming prefix, the length bound and whether the
/// identifier may be renamed at all.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum IdentifierCategory {
    ProgramName,
    IncludedFragmentName,
    SectionName,
    ParagraphName,
    DataName,
    ConditionName,
    FileRecordName,
    IndexName,
    /// An `EXTERNAL` item shared between programs. Must map identically in
    /// every file.
    CrossProgramName,
    /// Vendor or runtime names. Never renamed.
    SystemReserved,
}

impl IdentifierCategory {
    /// All categories, in counter order.
    pub const ALL: [IdentifierCategory; 10] = [
        IdentifierCategory::ProgramName,
        IdentifierCategory::IncludedFragmentName,
        IdentifierCategory::SectionName,
        IdentifierCategory::ParagraphName,
        IdentifierCategory::DataName,
        IdentifierCategory::ConditionName,
        IdentifierCategory::FileRecordName,
        IdentifierCategory::IndexName,
        IdentifierCategory::CrossProgramName,
        IdentifierCategory::SystemReserved,
    ];

    /// Prefix of generated names.
    pub fn prefix(self) -> &'static str {
        match self {
            IdentifierCategory::ProgramName => "PG",
            IdentifierCategory::IncludedFragmentName => "CP",
            IdentifierCategory::SectionName => "SC",
            IdentifierCategory::ParagraphName => "PA",
            IdentifierCategory::DataName => "D",
            IdentifierCategory::ConditionName => "CN",
            IdentifierCategory::FileRecordName => "FR",
            IdentifierCategory::IndexName => "IX",
            IdentifierCategory::CrossProgramName => "XP",
            IdentifierCategory::SystemReserved => "",
        }
    }

    /// Maximum length of a name in this category.
    pub fn max_length(self) -> usize {
        match self {
            IdentifierCategory::ProgramName | IdentifierCategory::IncludedFragmentName => {
                SHORT_NAME_LENGTH
            }
            _ => WORD_LENGTH,
        }
    }

    pub fn is_renameable(self) -> bool {
        self != IdentifierCategory::SystemReserved
    }

    /// Returns `true` for names visible across program boundaries.
    pub fn is_external(self) -> bool {
        self == IdentifierCategory::CrossProgramName
    }
}

impl fmt::Display for IdentifierCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierCategory::ProgramName => "program",
            IdentifierCategory::IncludedFragmentName => "fragment",
            IdentifierCategory::SectionName => "section",
            IdentifierCategory::ParagraphName => "paragraph",
            IdentifierCategory::DataName => "data item",
            IdentifierCategory::ConditionName => "condition",
            IdentifierCategory::FileRecordName => "file record",
            IdentifierCategory::IndexName => "index",
            IdentifierCategory::CrossProgramName => "cross-program item",
            IdentifierCategory::SystemReserved => "system name",
        };
        f.write_str(name)
    }
}
