//! Rewriting of lexed files with the mapping table.
//!
//! Tokens are replayed in order. Identifiers take their replacement from the
//! table, the target after `REDEFINES` takes the one resolved for that
//! overlay, and a quoted program or fragment name after `CALL`, `CANCEL`,
//! `COPY`, `INCLUDE` or `PROGRAM-ID` has its content replaced. Everything
//! else passes through byte for byte.
//!
//! When a replacement is wider or narrower than the original, the next run
//! of blanks on the line shrinks or grows to compensate, never below one
//! blank, so columns further right stay where they were. Lines without any
//! substitution come back exactly as read.

use rustc_hash::FxHashMap;
use tracing::debug;

use masq_diagnostic::{Diagnostic, ErrorCode, Location};
use masq_lexer::{source_column, LexedLine, LexedSource, Token, TokenKind, CODE_END_COLUMN};
use masq_names::{IdentifierCategory, MappingTable};

use crate::overlay::OverlayResolution;

/// Fatal rewriting error for one file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error(
        "{file}:{line}:{column}: replacing '{identifier}' pushes the code zone past column {}",
        CODE_END_COLUMN
    )]
    BoundaryExceeded {
        file: String,
        line: u32,
        column: u32,
        identifier: String,
    },
}

impl TransformError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TransformError::BoundaryExceeded { .. } => ErrorCode::E3001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TransformError::BoundaryExceeded {
                file, line, column, ..
            } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .at(Location::new(file.clone(), *line, *column)),
        }
    }
}

/// What the previous significant token makes of the next one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Preceding {
    Redefines,
    ProgramId,
    /// `CALL`, `CANCEL`, `COPY`, `INCLUDE`, or `PROGRAM-ID .`
    NameReference,
    Other,
}

impl Preceding {
    fn after(self, tok: &Token) -> Preceding {
        if tok.is_word("REDEFINES") {
            Preceding::Redefines
        } else if tok.is_word("PROGRAM-ID") {
            Preceding::ProgramId
        } else if tok.is_period() && self == Preceding::ProgramId {
            Preceding::NameReference
        } else if ["CALL", "CANCEL", "COPY", "INCLUDE"]
            .iter()
            .any(|w| tok.is_word(w))
        {
            Preceding::NameReference
        } else {
            Preceding::Other
        }
    }
}

/// Rewrites files against a finished mapping table.
///
/// Holds only shared references, so one transformer can rewrite many files
/// in parallel.
#[derive(Debug)]
pub struct Transformer<'a> {
    table: &'a MappingTable,
    /// Per file, (line, column) of an overlay target to its replacement.
    overlays: FxHashMap<&'a str, FxHashMap<(u32, u32), &'a str>>,
}

impl<'a> Transformer<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Transformer {
            table,
            overlays: FxHashMap::default(),
        }
    }

    /// Use resolved overlays for `REDEFINES` targets.
    #[must_use]
    pub fn with_overlays(mut self, resolution: &'a OverlayResolution) -> Self {
        for overlay in &resolution.overlays {
            let rel = &overlay.relationship;
            self.overlays
                .entry(rel.file.as_str())
                .or_default()
                .insert((rel.line, rel.column), overlay.replacements.target.as_str());
        }
        self
    }

    /// Rewrite every line of a file.
    pub fn transform(&self, file: &str, source: &LexedSource) -> Result<Vec<String>, TransformError> {
        let overlays = self.overlays.get(file);
        let mut preceding = Preceding::Other;
        let mut changed = 0usize;
        let mut out = Vec::with_capacity(source.lines.len());

        for line in &source.lines {
            match self.rewrite_line(file, line, overlays, &mut preceding)? {
                Some(rewritten) => {
                    changed += 1;
                    out.push(rewritten);
                }
                None => out.push(line.line.to_raw()),
            }
        }

        debug!(file, lines = out.len(), changed, "file rewritten");
        Ok(out)
    }

    /// Rewrite one line. `None` when nothing on it changed.
    fn rewrite_line(
        &self,
        file: &str,
        line: &LexedLine,
        overlays: Option<&FxHashMap<(u32, u32), &'a str>>,
        preceding: &mut Preceding,
    ) -> Result<Option<String>, TransformError> {
        let mut code = String::with_capacity(line.line.code().len() + 8);
        let mut drift: isize = 0;
        let mut changed = false;
        let mut widest: Option<&Token> = None;

        for tok in &line.tokens {
            match tok.kind {
                TokenKind::Whitespace => {
                    let width = signed(tok.width());
                    let new_width = if drift > 0 {
                        (width - drift).max(1)
                    } else {
                        width - drift
                    };
                    drift += new_width - width;
                    code.extend(std::iter::repeat(' ').take(new_width.unsigned_abs()));
                    if new_width != width {
                        changed = true;
                    }
                }
                TokenKind::Comment => code.push_str(&tok.text),
                _ => {
                    let replacement = self.substitute(line.number, tok, overlays, *preceding);
                    *preceding = preceding.after(tok);
                    match replacement {
                        Some(text) => {
                            let growth = signed(text.chars().count()) - signed(tok.width());
                            if growth > 0 {
                                widest = Some(tok);
                            }
                            drift += growth;
                            changed = true;
                            code.push_str(&text);
                        }
                        None => code.push_str(&tok.text),
                    }
                }
            }
        }

        if !changed {
            return Ok(None);
        }
        line.line.reassemble(&code).map(Some).map_err(|_| {
            let culprit = widest.or_else(|| line.significant().next());
            TransformError::BoundaryExceeded {
                file: file.to_string(),
                line: line.number,
                column: culprit.map_or(0, |t| source_column(t.column)),
                identifier: culprit.map(|t| t.text.clone()).unwrap_or_default(),
            }
        })
    }

    fn substitute(
        &self,
        line: u32,
        tok: &Token,
        overlays: Option<&FxHashMap<(u32, u32), &'a str>>,
        preceding: Preceding,
    ) -> Option<String> {
        match tok.kind {
            TokenKind::Identifier => {
                let overlay = (preceding == Preceding::Redefines)
                    .then(|| overlays?.get(&(line, source_column(tok.column))).copied())
                    .flatten();
                overlay
                    .or_else(|| self.table.lookup(&tok.text))
                    .filter(|r| *r != tok.text)
                    .map(str::to_string)
            }
            TokenKind::Literal if preceding == Preceding::NameReference => {
                self.substitute_name_literal(tok)
            }
            _ => None,
        }
    }

    /// Replace the content of a quoted program or fragment name.
    fn substitute_name_literal(&self, tok: &Token) -> Option<String> {
        let body = tok.literal_body()?;
        let quote = tok.text.chars().next()?;
        if tok.text.len() < 2 || !tok.text.ends_with(quote) {
            return None;
        }
        let entry = self.table.entry(body)?;
        let is_name = matches!(
            entry.category,
            IdentifierCategory::ProgramName | IdentifierCategory::IncludedFragmentName
        );
        (is_name && entry.replacement != body)
            .then(|| format!("{quote}{}{quote}", entry.replacement))
    }
}

fn signed(width: usize) -> isize {
    isize::try_from(width).unwrap_or(isize::MAX)
}
