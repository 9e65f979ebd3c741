//! Shape rules every replacement name must satisfy.

use std::fmt;

use masq_lexer::{has_system_prefix, is_reserved};

use crate::IdentifierCategory;

/// Why a candidate name was rejected on shape alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PolicyViolation {
    Empty,
    /// First character is not a letter.
    NoLeadingLetter,
    /// A character other than `A-Z`, `0-9`, `-`.
    BadCharacter(char),
    TrailingHyphen,
    TooLong { length: usize, max: usize },
    /// A reserved word or a name with a vendor prefix.
    Reserved,
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::Empty => write!(f, "name is empty"),
            PolicyViolation::NoLeadingLetter => write!(f, "name must start with a letter"),
            PolicyViolation::BadCharacter(c) => write!(f, "character '{c}' is not allowed"),
            PolicyViolation::TrailingHyphen => write!(f, "name must not end with a hyphen"),
            PolicyViolation::TooLong { length, max } => {
                write!(f, "name is {length} characters, limit is {max}")
            }
            PolicyViolation::Reserved => write!(f, "name is reserved"),
        }
    }
}

/// Check a candidate against the naming policy for its category.
///
/// Collisions with already issued names are checked by the mapping table,
/// not here.
pub fn check_shape(name: &str, category: IdentifierCategory) -> Result<(), PolicyViolation> {
    let first = name.chars().next().ok_or(PolicyViolation::Empty)?;
    if !first.is_ascii_uppercase() {
        return Err(PolicyViolation::NoLeadingLetter);
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(PolicyViolation::BadCharacter(bad));
    }
    if name.ends_with('-') {
        return Err(PolicyViolation::TrailingHyphen);
    }
    let length = name.len();
    let max = category.max_length();
    if length > max {
        return Err(PolicyViolation::TooLong { length, max });
    }
    if is_reserved(name) || has_system_prefix(name) {
        return Err(PolicyViolation::Reserved);
    }
    Ok(())
}
