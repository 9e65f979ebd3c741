//! Layout-aware scanner for a single code zone.
//!
//! The scanner turns the code zone of one line into an ordered token list.
//! Concatenating the token texts reproduces the zone exactly, so a line can
//! be rebuilt losslessly after identifier substitution.
//!
//! # Layout protection
//!
//! A picture clause (`PIC`/`PICTURE`, optional `IS`, the picture string) and
//! an attached usage (`[USAGE [IS]] COMP-3`) become one opaque
//! [`TokenKind::LayoutDescriptor`] token, inner blanks included. Nothing
//! inside it is ever seen as an identifier, so `PIC X(10)` never renames `X`
//! even when a data item called `X` exists.
//!
//! # Errors
//!
//! The scanner never fails. Odd input produces best-effort tokens plus
//! [`ScanWarning`]s; the caller decides how to report them.

use crate::descriptor::{DescriptorError, LayoutDescriptor};
use crate::reserved::{is_reserved, is_standalone_usage, is_usage_word};
use crate::token::{Token, TokenKind};

/// State carried from one code line to the next within a file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanCarry {
    /// Quote of a literal still open at the end of the previous line.
    pub open_literal: Option<u8>,
    /// The previous line ended right after `PIC`; the picture string follows.
    pub pending_picture: bool,
}

/// A recoverable scanning problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanWarning {
    pub kind: ScanWarningKind,
    /// 0-based character offset inside the code zone.
    pub column: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanWarningKind {
    /// A quoted literal was still open when its line ended and no
    /// continuation line picked it up.
    UnterminatedLiteral,
    /// A layout descriptor could not be decoded. It is still protected.
    UnknownLayoutDescriptor(DescriptorError),
    /// A character with no meaning in the code zone.
    UnrecognizedCharacter(char),
    /// An indicator character outside the known set.
    UnknownIndicator(char),
}

/// Tokens of one code zone plus the state handed to the next line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScannedLine {
    pub tokens: Vec<Token>,
    pub warnings: Vec<ScanWarning>,
    pub carry: ScanCarry,
}

/// Scan one code zone.
///
/// `carry` is the state returned for the previous code line of the same file.
pub fn scan_line(code: &str, carry: ScanCarry) -> ScannedLine {
    let mut scanner = LineScanner::new(code);
    if carry.pending_picture {
        scanner.pending_picture();
    }
    scanner.run();
    ScannedLine {
        tokens: scanner.tokens,
        warnings: scanner.warnings,
        carry: scanner.carry,
    }
}

/// Prefixes that turn a following quoted literal into a typed literal
/// (`X"FF"`, `N"..."`, `Z"..."`).
const LITERAL_PREFIXES: &[&str] = &["X", "N", "Z", "G", "B", "NX", "BX"];

struct LineScanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    warnings: Vec<ScanWarning>,
    carry: ScanCarry,
}

impl<'a> LineScanner<'a> {
    fn new(src: &'a str) -> Self {
        LineScanner {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            warnings: Vec::new(),
            carry: ScanCarry::default(),
        }
    }

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn column_of(&self, byte: usize) -> u32 {
        u32::try_from(self.src[..byte].chars().count()).unwrap_or(u32::MAX)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let column = self.column_of(start);
        self.tokens
            .push(Token::new(kind, &self.src[start..self.pos], column));
    }

    fn warn(&mut self, kind: ScanWarningKind, at: usize) {
        let column = self.column_of(at);
        self.warnings.push(ScanWarning { kind, column });
    }

    fn run(&mut self) {
        while let Some(b) = self.current() {
            let start = self.pos;
            match b {
                b' ' | b'\t' => self.whitespace(start),
                b'"' | b'\'' => self.quoted(start),
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => self.word(start),
                b'*' if self.peek(1) == Some(b'>') => {
                    self.pos = self.bytes.len();
                    self.push(TokenKind::Comment, start);
                }
                b'=' if self.peek(1) == Some(b'=') => {
                    self.pos += 2;
                    self.push(TokenKind::Punctuation, start);
                }
                b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) && self.after_blank() => {
                    self.pos += 1;
                    self.eat_digits();
                    self.push(TokenKind::Literal, start);
                }
                b'.' | b',' | b';' | b'(' | b')' | b':' => {
                    self.pos += 1;
                    self.push(TokenKind::Punctuation, start);
                }
                b'*' | b'>' | b'<' => self.operator(start),
                b'+' | b'-' | b'/' | b'=' | b'&' => {
                    self.pos += 1;
                    self.push(TokenKind::Operator, start);
                }
                _ => self.unrecognized(start),
            }
        }
    }

    /// Returns `true` when the byte before `pos` is a blank or the line start.
    fn after_blank(&self) -> bool {
        self.pos == 0 || matches!(self.bytes[self.pos - 1], b' ' | b'\t')
    }

    // ─── Trivia ────────────────────────────────────────────────────────

    fn whitespace(&mut self, start: usize) {
        self.eat_blanks();
        self.push(TokenKind::Whitespace, start);
    }

    fn eat_blanks(&mut self) {
        while matches!(self.current(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    fn unrecognized(&mut self, start: usize) {
        let c = self.src[start..].chars().next().unwrap_or('\u{fffd}');
        self.pos += c.len_utf8();
        self.warn(ScanWarningKind::UnrecognizedCharacter(c), start);
        self.push(TokenKind::Punctuation, start);
    }

    // ─── Operators ─────────────────────────────────────────────────────

    fn operator(&mut self, start: usize) {
        let first = self.bytes[self.pos];
        self.pos += 1;
        match (first, self.current()) {
            (b'*', Some(b'*')) | (b'>' | b'<', Some(b'=')) | (b'<', Some(b'>')) => self.pos += 1,
            _ => {}
        }
        self.push(TokenKind::Operator, start);
    }

    // ─── Literals ──────────────────────────────────────────────────────

    /// Scan a quoted literal starting at the quote under the cursor. A
    /// doubled quote is an escaped quote. A literal still open at the end of
    /// the zone is recorded in the carry.
    fn quoted(&mut self, start: usize) {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        loop {
            match memchr::memchr(quote, &self.bytes[self.pos..]) {
                Some(offset) => {
                    self.pos += offset + 1;
                    if self.current() == Some(quote) {
                        self.pos += 1;
                        continue;
                    }
                    break;
                }
                None => {
                    self.pos = self.bytes.len();
                    self.carry.open_literal = Some(quote);
                    break;
                }
            }
        }
        self.push(TokenKind::Literal, start);
    }

    fn eat_digits(&mut self) {
        while self.current().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    // ─── Words ─────────────────────────────────────────────────────────

    fn eat_word_chars(&mut self) {
        while self
            .current()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            self.pos += 1;
        }
    }

    /// Byte range of the word starting at `at`, if any.
    fn word_at(&self, at: usize) -> Option<(usize, usize)> {
        let mut end = at;
        while self
            .bytes
            .get(end)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
        {
            end += 1;
        }
        (end > at).then_some((at, end))
    }

    /// Position of the first non-blank byte at or after `at`.
    fn skip_blanks_from(&self, at: usize) -> usize {
        let mut pos = at;
        while matches!(self.bytes.get(pos), Some(b' ' | b'\t')) {
            pos += 1;
        }
        pos
    }

    fn word(&mut self, start: usize) {
        self.eat_word_chars();
        let src = self.src;
        let word = &src[start..self.pos];

        if word.bytes().all(|b| b.is_ascii_digit()) {
            if self.current() == Some(b'.') && self.peek(1).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
                self.eat_digits();
            }
            self.push(TokenKind::Literal, start);
            return;
        }

        if matches!(self.current(), Some(b'"' | b'\''))
            && LITERAL_PREFIXES.iter().any(|p| p.eq_ignore_ascii_case(word))
        {
            self.quoted(start);
            return;
        }

        if word.eq_ignore_ascii_case("PIC") || word.eq_ignore_ascii_case("PICTURE") {
            self.picture_clause(start);
        } else if word.eq_ignore_ascii_case("USAGE") {
            self.usage_clause(start);
        } else if is_standalone_usage(word) {
            self.push(TokenKind::LayoutDescriptor, start);
        } else if is_reserved(word) {
            self.push(TokenKind::Keyword, start);
        } else {
            self.push(TokenKind::Identifier, start);
        }
    }

    // ─── Layout descriptors ────────────────────────────────────────────

    /// `PIC [IS] picture [[USAGE [IS]] usage]` starting at the `PIC` word.
    fn picture_clause(&mut self, start: usize) {
        let after_keyword = self.pos;
        let mut cursor = self.skip_blanks_from(self.pos);
        if let Some((is_start, is_end)) = self.word_at(cursor) {
            if self.src[is_start..is_end].eq_ignore_ascii_case("IS") {
                cursor = self.skip_blanks_from(is_end);
            }
        }

        if cursor >= self.bytes.len() {
            // The picture string is on the next line.
            self.pos = after_keyword;
            self.carry.pending_picture = true;
            self.push(TokenKind::LayoutDescriptor, start);
            return;
        }

        self.pos = cursor;
        self.picture_string();
        self.usage_suffix();
        self.push(TokenKind::LayoutDescriptor, start);
        self.check_descriptor(start);
    }

    /// Picture string continued from the previous line.
    fn pending_picture(&mut self) {
        let lead = self.pos;
        self.eat_blanks();
        if self.pos > lead {
            self.push(TokenKind::Whitespace, lead);
        }
        if self.current().is_none() {
            self.carry.pending_picture = true;
            return;
        }
        let start = self.pos;
        if let Some((is_start, is_end)) = self.word_at(start) {
            if self.src[is_start..is_end].eq_ignore_ascii_case("IS") {
                self.pos = self.skip_blanks_from(is_end);
            }
        }
        self.picture_string();
        self.usage_suffix();
        self.push(TokenKind::LayoutDescriptor, start);
        self.check_descriptor(start);
    }

    /// Consume a picture string. A trailing period, comma or semicolon that
    /// ends the zone or precedes a blank is a separator, not picture text.
    fn picture_string(&mut self) {
        let pic_start = self.pos;
        while self.current().is_some_and(|b| b != b' ' && b != b'\t') {
            self.pos += 1;
        }
        if self.pos > pic_start + 1 && matches!(self.bytes[self.pos - 1], b'.' | b',' | b';') {
            self.pos -= 1;
        }
    }

    /// Extend the clause over an attached `[USAGE [IS]] usage`, if present.
    fn usage_suffix(&mut self) {
        let first = self.skip_blanks_from(self.pos);
        let Some((w_start, w_end)) = self.word_at(first) else {
            return;
        };
        let src = self.src;
        let word = &src[w_start..w_end];
        if is_usage_word(word) {
            self.pos = w_end;
        } else if word.eq_ignore_ascii_case("USAGE") {
            if let Some(end) = self.usage_operand(w_end) {
                self.pos = end;
            }
        }
    }

    /// `[IS] usage` after a `USAGE` word ending at `from`. Returns the end of
    /// the usage word.
    fn usage_operand(&self, from: usize) -> Option<usize> {
        let mut cursor = self.skip_blanks_from(from);
        let (mut w_start, mut w_end) = self.word_at(cursor)?;
        if self.src[w_start..w_end].eq_ignore_ascii_case("IS") {
            cursor = self.skip_blanks_from(w_end);
            (w_start, w_end) = self.word_at(cursor)?;
        }
        is_usage_word(&self.src[w_start..w_end]).then_some(w_end)
    }

    /// `USAGE [IS] usage` without a picture clause.
    fn usage_clause(&mut self, start: usize) {
        match self.usage_operand(self.pos) {
            Some(end) => {
                self.pos = end;
                self.push(TokenKind::LayoutDescriptor, start);
            }
            None => self.push(TokenKind::Keyword, start),
        }
    }

    fn check_descriptor(&mut self, start: usize) {
        if let Err(err) = LayoutDescriptor::parse(&self.src[start..self.pos]) {
            self.warn(ScanWarningKind::UnknownLayoutDescriptor(err), start);
        }
    }
}
