//! Whole-file lexing: zone splitting plus per-line scanning with carried
//! state.
//!
//! This is the shared pre-scan every later phase consumes: the dependency
//! resolver looks for include statements in it, the classifier walks its
//! tokens, and the transformer replays them.

use crate::line::{Indicator, SourceLine, CODE_START_COLUMN};
use crate::scanner::{scan_line, ScanCarry, ScanWarningKind};
use crate::token::Token;

/// One source line with its tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexedLine {
    /// 1-based line number.
    pub number: u32,
    pub line: SourceLine,
    /// Tokens of the code zone. Empty for comment and short lines.
    pub tokens: Vec<Token>,
}

impl LexedLine {
    /// Iterate over tokens that are not whitespace or comments.
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.is_trivia())
    }
}

/// A recoverable problem found while lexing a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexWarning {
    pub kind: ScanWarningKind,
    /// 1-based line number.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
}

/// A lexed file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexedSource {
    pub lines: Vec<LexedLine>,
    pub warnings: Vec<LexWarning>,
}

impl LexedSource {
    /// Lex a whole file.
    pub fn lex(text: &str) -> Self {
        let mut lexer = SourceLexer::default();
        for (idx, raw) in text.lines().enumerate() {
            let number = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            lexer.line(number, raw);
        }
        lexer.finish()
    }

    /// Iterate over every significant token with its line number.
    pub fn significant_tokens(&self) -> impl Iterator<Item = (u32, &Token)> {
        self.lines
            .iter()
            .flat_map(|line| line.significant().map(move |t| (line.number, t)))
    }
}

/// The 1-based source column of a token column inside the code zone.
pub fn source_column(code_column: u32) -> u32 {
    code_column + CODE_START_COLUMN as u32
}

#[derive(Default)]
struct SourceLexer {
    lines: Vec<LexedLine>,
    warnings: Vec<LexWarning>,
    carry: ScanCarry,
    /// Where the literal in `carry.open_literal` was opened.
    open_literal_at: Option<(u32, u32)>,
}

impl SourceLexer {
    fn line(&mut self, number: u32, raw: &str) {
        let line = SourceLine::parse(raw);

        if line.indicator_char().is_none() || line.is_comment() {
            self.lines.push(LexedLine {
                number,
                line,
                tokens: Vec::new(),
            });
            return;
        }

        if let Indicator::Unknown(c) = line.indicator() {
            self.warnings.push(LexWarning {
                kind: ScanWarningKind::UnknownIndicator(c),
                line: number,
                column: crate::line::INDICATOR_COLUMN as u32,
            });
        }

        if self.carry.open_literal.is_some() && !line.is_continuation() && !line.is_blank() {
            self.close_open_literal();
        }

        let scanned = scan_line(line.code(), self.carry);
        for warning in scanned.warnings {
            self.warnings.push(LexWarning {
                kind: warning.kind,
                line: number,
                column: source_column(warning.column),
            });
        }
        if scanned.carry.open_literal.is_some() {
            let column = scanned
                .tokens
                .last()
                .map_or(0, |t| source_column(t.column));
            self.open_literal_at = Some((number, column));
        }
        self.carry = scanned.carry;

        self.lines.push(LexedLine {
            number,
            line,
            tokens: scanned.tokens,
        });
    }

    /// Report the literal left open by an earlier line that no continuation
    /// line resumed.
    fn close_open_literal(&mut self) {
        if let Some((line, column)) = self.open_literal_at.take() {
            self.warnings.push(LexWarning {
                kind: ScanWarningKind::UnterminatedLiteral,
                line,
                column,
            });
        }
        self.carry.open_literal = None;
    }

    fn finish(mut self) -> LexedSource {
        if self.carry.open_literal.is_some() {
            self.close_open_literal();
        }
        self.warnings.sort_by_key(|w| (w.line, w.column));
        LexedSource {
            lines: self.lines,
            warnings: self.warnings,
        }
    }
}
