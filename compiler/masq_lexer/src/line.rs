//! Fixed-column zone splitting for source lines.
//!
//! A fixed-format line is divided into four positional zones:
//!
//! ```text
//! 1      7 8   12                                                   72 73    80
//! |seq...|i|A..|B...........................................................|ident...|
//! ```
//!
//! - columns 1-6: sequence zone
//! - column 7: indicator (`*`/`/` comment, `-` continuation, `D` debug)
//! - columns 8-72: code zone (Area A is 8-11, Area B is 12-72)
//! - columns 73+: trailing identification zone
//!
//! Zones are counted in characters, not bytes. Everything outside the code
//! zone is reproduced byte-for-byte by [`SourceLine::reassemble`].

use std::fmt;

/// Width of the sequence zone (columns 1-6).
pub const SEQUENCE_WIDTH: usize = 6;

/// 1-based column of the indicator.
pub const INDICATOR_COLUMN: usize = 7;

/// 1-based column where the code zone starts.
pub const CODE_START_COLUMN: usize = 8;

/// 1-based column where the code zone ends (inclusive).
pub const CODE_END_COLUMN: usize = 72;

/// Width of the code zone in characters.
pub const CODE_WIDTH: usize = CODE_END_COLUMN - CODE_START_COLUMN + 1;

/// Width of Area A at the start of the code zone.
pub const AREA_A_WIDTH: usize = 4;

/// Meaning of the indicator column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Blank: ordinary code line.
    Blank,
    /// `*` or `/`: the whole line is commentary.
    Comment,
    /// `-`: continues a literal or word from the previous line.
    Continuation,
    /// `D` or `d`: debugging line, treated as code.
    Debug,
    /// Anything else. Recoverable; the line is treated as code.
    Unknown(char),
}

impl Indicator {
    /// Classify an indicator character.
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => Indicator::Blank,
            '*' | '/' => Indicator::Comment,
            '-' => Indicator::Continuation,
            'D' | 'd' => Indicator::Debug,
            other => Indicator::Unknown(other),
        }
    }
}

/// Error when a rewritten code zone no longer fits between columns 8 and 72.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneOverflow {
    /// Width of the offending code zone after trailing blanks were absorbed.
    pub width: usize,
}

impl ZoneOverflow {
    /// First 1-based column that lies beyond the code zone.
    pub fn column(&self) -> usize {
        CODE_END_COLUMN + 1
    }
}

impl fmt::Display for ZoneOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code zone is {} columns wide, limit is {} (columns {}-{})",
            self.width, CODE_WIDTH, CODE_START_COLUMN, CODE_END_COLUMN
        )
    }
}

impl std::error::Error for ZoneOverflow {}

/// One raw source line split into its fixed zones.
///
/// Immutable once parsed. Lines shorter than the indicator column carry only
/// a sequence zone and are never rewritten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    sequence: String,
    indicator: Option<char>,
    code: String,
    trailing: Option<String>,
}

impl SourceLine {
    /// Split a raw line (without its line terminator) into zones.
    pub fn parse(raw: &str) -> Self {
        let seq_end = byte_offset(raw, SEQUENCE_WIDTH);
        let sequence = raw[..seq_end].to_string();
        let rest = &raw[seq_end..];

        let mut chars = rest.chars();
        let Some(indicator) = chars.next() else {
            return SourceLine {
                sequence,
                indicator: None,
                code: String::new(),
                trailing: None,
            };
        };

        let body = chars.as_str();
        let code_end = byte_offset(body, CODE_WIDTH);
        let code = body[..code_end].to_string();
        let trailing = (code_end < body.len()).then(|| body[code_end..].to_string());

        SourceLine {
            sequence,
            indicator: Some(indicator),
            code,
            trailing,
        }
    }

    /// The sequence zone (columns 1-6, possibly shorter).
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// The raw indicator character, if the line reaches column 7.
    pub fn indicator_char(&self) -> Option<char> {
        self.indicator
    }

    /// The classified indicator. Short lines count as blank.
    pub fn indicator(&self) -> Indicator {
        self.indicator.map_or(Indicator::Blank, Indicator::from_char)
    }

    /// The code zone (columns 8-72, possibly shorter).
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The trailing identification zone (columns 73+), if present.
    pub fn trailing(&self) -> Option<&str> {
        self.trailing.as_deref()
    }

    /// Returns `true` for `*` and `/` comment lines.
    pub fn is_comment(&self) -> bool {
        self.indicator() == Indicator::Comment
    }

    /// Returns `true` for `-` continuation lines.
    pub fn is_continuation(&self) -> bool {
        self.indicator() == Indicator::Continuation
    }

    /// Returns `true` when the code zone holds nothing but blanks.
    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }

    /// Rebuild the raw line with the original code zone.
    pub fn to_raw(&self) -> String {
        let mut out = String::with_capacity(
            self.sequence.len() + 1 + self.code.len() + self.trailing.as_ref().map_or(0, String::len),
        );
        out.push_str(&self.sequence);
        if let Some(ind) = self.indicator {
            out.push(ind);
        }
        out.push_str(&self.code);
        if let Some(trailing) = &self.trailing {
            out.push_str(trailing);
        }
        out
    }

    /// Rebuild the raw line around a rewritten code zone.
    ///
    /// Trailing blanks of `code` are absorbed when it is wider than the zone.
    /// When a trailing zone exists the code zone is padded back to its full
    /// width so the trailing zone keeps its columns.
    pub fn reassemble(&self, code: &str) -> Result<String, ZoneOverflow> {
        let Some(ind) = self.indicator else {
            return Ok(self.to_raw());
        };

        let mut code = code;
        let mut width = code.chars().count();
        if width > CODE_WIDTH {
            code = code.trim_end_matches(' ');
            width = code.chars().count();
            if width > CODE_WIDTH {
                return Err(ZoneOverflow { width });
            }
        }

        let mut out = String::with_capacity(self.sequence.len() + 1 + CODE_WIDTH + 8);
        out.push_str(&self.sequence);
        out.push(ind);
        out.push_str(code);
        if let Some(trailing) = &self.trailing {
            out.extend(std::iter::repeat(' ').take(CODE_WIDTH - width));
            out.push_str(trailing);
        }
        Ok(out)
    }
}

/// Byte offset of the `n`th character of `s`, clamped to `s.len()`.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx)
}
