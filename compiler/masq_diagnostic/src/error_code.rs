use std::fmt;

/// Codes for every diagnostic the anonymizer reports.
///
/// Format: a letter and four digits. `W` codes are recoverable; the first
/// digit of an `E` code names the phase that failed:
/// - W0xxx: recoverable lexing and classification problems
/// - E1xxx: naming errors
/// - E2xxx: dependency structure errors (abort the batch)
/// - E3xxx: rewrite validation errors (abort one file)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Recoverable warnings (W0xxx)
    /// Quoted literal never closed
    W0001,
    /// Unknown indicator character in column 7
    W0002,
    /// Layout descriptor could not be decoded
    W0003,
    /// Overlay target not declared
    W0004,

    // Naming errors (E1xxx)
    /// No valid replacement within the retry ceiling
    E1001,

    // Dependency errors (E2xxx)
    /// Circular fragment inclusion
    E2001,
    /// Included fragment not in the batch
    E2002,

    // Rewrite errors (E3xxx)
    /// Rewritten code zone wider than the fixed boundary
    E3001,
}

impl ErrorCode {
    /// Every code, warnings first.
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::W0001,
        ErrorCode::W0002,
        ErrorCode::W0003,
        ErrorCode::W0004,
        ErrorCode::E1001,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E3001,
    ];

    /// Get the code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::W0001 => "W0001",
            ErrorCode::W0002 => "W0002",
            ErrorCode::W0003 => "W0003",
            ErrorCode::W0004 => "W0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E3001 => "E3001",
        }
    }

    /// Short description used when no specific message is available.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::W0001 => "unterminated literal",
            ErrorCode::W0002 => "unknown indicator",
            ErrorCode::W0003 => "unknown layout descriptor",
            ErrorCode::W0004 => "unresolved overlay target",
            ErrorCode::E1001 => "naming exhausted",
            ErrorCode::E2001 => "circular dependency",
            ErrorCode::E2002 => "missing fragment",
            ErrorCode::E3001 => "boundary exceeded",
        }
    }

    /// Check if this is a warning code (Wxxxx range).
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }

    /// Check if this error aborts the whole batch rather than one file.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E2001 | ErrorCode::E2002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
