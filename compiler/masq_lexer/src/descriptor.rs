//! Layout descriptor decoding and storage sizing.
//!
//! A layout descriptor is the text of one protected
//! [`TokenKind::LayoutDescriptor`](crate::TokenKind::LayoutDescriptor) token:
//! `PIC S9(7)V99 COMP-3`, `PICTURE IS X(30)`, `USAGE IS BINARY`, `COMP-1`.
//! The descriptor itself is never rewritten; decoding it only serves to size
//! elementary items so overlay positions can be computed.

use std::fmt;

/// Storage usage of an elementary item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Usage {
    /// One byte per picture position.
    #[default]
    Display,
    /// Two bytes per picture position.
    National,
    /// Packed decimal: two digits per byte plus a sign nibble.
    Packed,
    /// Binary integer sized by digit count.
    Binary,
    /// Single precision float.
    Float4,
    /// Double precision float.
    Float8,
    /// Index data item.
    Index,
    /// Address-sized pointer.
    Pointer,
}

impl Usage {
    /// Decode a usage word. Returns `None` for anything else.
    pub fn from_word(word: &str) -> Option<Usage> {
        let upper = word.to_ascii_uppercase();
        let usage = match upper.as_str() {
            "DISPLAY" | "DISPLAY-1" => Usage::Display,
            "NATIONAL" => Usage::National,
            "COMP-3" | "COMPUTATIONAL-3" | "PACKED-DECIMAL" => Usage::Packed,
            "COMP" | "COMP-4" | "COMP-5" | "COMPUTATIONAL" | "COMPUTATIONAL-4"
            | "COMPUTATIONAL-5" | "BINARY" => Usage::Binary,
            "COMP-1" | "COMPUTATIONAL-1" => Usage::Float4,
            "COMP-2" | "COMPUTATIONAL-2" => Usage::Float8,
            "INDEX" => Usage::Index,
            "POINTER" | "FUNCTION-POINTER" | "PROCEDURE-POINTER" => Usage::Pointer,
            _ => return None,
        };
        Some(usage)
    }
}

/// Error decoding a layout descriptor. Always recoverable: the descriptor
/// text still passes through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorError {
    /// `PIC` without a picture string.
    MissingPicture,
    /// A picture symbol outside the picture alphabet.
    UnknownSymbol { symbol: char },
    /// A repeat count that is not `(digits)` or follows nothing.
    BadRepeat,
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::MissingPicture => write!(f, "picture clause has no picture string"),
            DescriptorError::UnknownSymbol { symbol } => {
                write!(f, "unknown picture symbol '{symbol}'")
            }
            DescriptorError::BadRepeat => write!(f, "malformed repeat count in picture string"),
        }
    }
}

impl std::error::Error for DescriptorError {}

/// A decoded layout descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LayoutDescriptor {
    picture: Option<String>,
    usage: Usage,
}

impl LayoutDescriptor {
    /// Decode the text of a layout descriptor token.
    pub fn parse(text: &str) -> Result<Self, DescriptorError> {
        let mut words = text.split_whitespace().peekable();
        let mut descriptor = LayoutDescriptor::default();

        while let Some(word) = words.next() {
            if word.eq_ignore_ascii_case("PIC") || word.eq_ignore_ascii_case("PICTURE") {
                if words.peek().is_some_and(|w| w.eq_ignore_ascii_case("IS")) {
                    words.next();
                }
                let picture = words.next().ok_or(DescriptorError::MissingPicture)?;
                validate_picture(picture)?;
                descriptor.picture = Some(picture.to_ascii_uppercase());
            } else if word.eq_ignore_ascii_case("USAGE") || word.eq_ignore_ascii_case("IS") {
                continue;
            } else if let Some(usage) = Usage::from_word(word) {
                descriptor.usage = usage;
            }
        }

        Ok(descriptor)
    }

    /// The upper-cased picture string, if any.
    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// Number of `9` digit positions in the picture.
    pub fn digits(&self) -> u32 {
        count_u32(self.expanded().filter(|c| *c == '9'))
    }

    /// Storage size in bytes of an elementary item with this descriptor.
    pub fn storage_size(&self) -> u32 {
        match self.usage {
            Usage::Display => self.display_positions(),
            Usage::National => self.display_positions() * 2,
            Usage::Packed => self.digits() / 2 + 1,
            Usage::Binary => match self.digits() {
                0..=4 => 2,
                5..=9 => 4,
                _ => 8,
            },
            Usage::Float4 | Usage::Index | Usage::Pointer => 4,
            Usage::Float8 => 8,
        }
    }

    /// Character positions occupied in display form. `S`, `V` and `P` take
    /// no storage.
    fn display_positions(&self) -> u32 {
        count_u32(self.expanded().filter(|c| !matches!(c, 'S' | 'V' | 'P')))
    }

    /// Iterate the picture with repeat counts expanded.
    fn expanded(&self) -> impl Iterator<Item = char> + '_ {
        let picture = self.picture.as_deref().unwrap_or("");
        PictureSymbols::new(picture).flat_map(|(c, n)| std::iter::repeat(c).take(n as usize))
    }
}

fn count_u32(iter: impl Iterator<Item = char>) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}

/// Picture alphabet, upper case. Lower case is accepted by folding.
const PICTURE_ALPHABET: &str = "ABEGNPSVXZ0123456789*+-,./$CRDB";

fn validate_picture(picture: &str) -> Result<(), DescriptorError> {
    let bytes = picture.as_bytes();
    let mut i = 0;
    let mut seen_symbol = false;
    while i < bytes.len() {
        let c = bytes[i].to_ascii_uppercase() as char;
        if c == '(' {
            let close = picture[i..].find(')').ok_or(DescriptorError::BadRepeat)? + i;
            let count = &picture[i + 1..close];
            if !seen_symbol || count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DescriptorError::BadRepeat);
            }
            i = close + 1;
            continue;
        }
        if !PICTURE_ALPHABET.contains(c) {
            return Err(DescriptorError::UnknownSymbol {
                symbol: picture[i..].chars().next().unwrap_or(c),
            });
        }
        seen_symbol = true;
        i += 1;
    }
    Ok(())
}

/// Iterator over `(symbol, repeat)` pairs of a validated picture string.
struct PictureSymbols<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PictureSymbols<'a> {
    fn new(picture: &'a str) -> Self {
        PictureSymbols {
            bytes: picture.as_bytes(),
            pos: 0,
        }
    }
}

impl Iterator for PictureSymbols<'_> {
    type Item = (char, u32);

    fn next(&mut self) -> Option<(char, u32)> {
        let symbol = self.bytes.get(self.pos)?.to_ascii_uppercase() as char;
        self.pos += 1;

        if self.bytes.get(self.pos) != Some(&b'(') {
            return Some((symbol, 1));
        }

        let start = self.pos + 1;
        let mut end = start;
        while self.bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        let repeat = std::str::from_utf8(&self.bytes[start..end])
            .ok()
            .and_then(|digits| digits.parse::<u32>().ok())
            .unwrap_or(1);
        // Skip the closing parenthesis.
        self.pos = end + 1;
        Some((symbol, repeat))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
