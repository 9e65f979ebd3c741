//! Extraction of fragment inclusion statements.
//!
//! Recognized forms, possibly spread over several lines:
//!
//! ```text
//! COPY name [OF|IN library] [REPLACING operand BY operand [,] ...] .
//! EXEC SQL INCLUDE name END-EXEC
//! ```
//!
//! An operand is a single word or literal, or pseudo-text between `==`
//! delimiters. Names may be written as quoted literals.

use masq_lexer::{has_system_prefix, source_column, LexedSource, Token, TokenKind};

/// Fragments supplied by the runtime or a precompiler, never by the batch.
const SYSTEM_FRAGMENTS: &[&str] = &["SQLCA", "SQLDA"];

/// One `REPLACING a BY b` pair. Pseudo-text keeps its words joined by one
/// blank.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// One inclusion statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IncludeStatement {
    /// Fragment name as written, without quotes.
    pub fragment: String,
    pub library: Option<String>,
    pub replacing: Vec<Replacement>,
    /// 1-based line of the fragment name.
    pub line: u32,
    /// 1-based source column of the fragment name.
    pub column: u32,
}

/// Returns `true` for fragments that never resolve to a batch file.
pub fn is_system_fragment(name: &str) -> bool {
    SYSTEM_FRAGMENTS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
        || has_system_prefix(name)
}

/// Collect the inclusion statements of a lexed file, in source order.
/// System fragments are left out.
pub fn scan_includes(source: &LexedSource) -> Vec<IncludeStatement> {
    let tokens: Vec<(u32, &Token)> = source.significant_tokens().collect();
    let mut statements = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i].1;
        if tok.is_word("COPY") || tok.is_word("INCLUDE") {
            if let Some((statement, next)) = parse_statement(&tokens, i + 1) {
                if !is_system_fragment(&statement.fragment) {
                    statements.push(statement);
                }
                i = next;
                continue;
            }
        }
        i += 1;
    }
    statements
}

/// Parse the statement after the `COPY`/`INCLUDE` word at `start - 1`.
/// Returns the statement and the index just past it.
fn parse_statement(tokens: &[(u32, &Token)], start: usize) -> Option<(IncludeStatement, usize)> {
    let &(line, name_tok) = tokens.get(start)?;
    let fragment = name_text(name_tok)?;
    let mut i = start + 1;

    let mut library = None;
    if let Some(&(_, tok)) = tokens.get(i) {
        if tok.is_word("OF") || tok.is_word("IN") {
            if let Some(lib) = tokens.get(i + 1).and_then(|(_, t)| name_text(t)) {
                library = Some(lib);
                i += 2;
            }
        }
    }

    let mut replacing = Vec::new();
    if tokens.get(i).is_some_and(|(_, t)| t.is_word("REPLACING")) {
        i += 1;
        while let Some((from, after_from)) = operand(tokens, i) {
            if !tokens.get(after_from).is_some_and(|(_, t)| t.is_word("BY")) {
                break;
            }
            let Some((to, after_to)) = operand(tokens, after_from + 1) else {
                break;
            };
            replacing.push(Replacement { from, to });
            i = after_to;
            while tokens.get(i).is_some_and(|(_, t)| is_separator(t)) {
                i += 1;
            }
        }
    }

    if let Some(&(_, tok)) = tokens.get(i) {
        if tok.is_period() || tok.is_word("END-EXEC") {
            i += 1;
        }
    }

    let statement = IncludeStatement {
        fragment,
        library,
        replacing,
        line,
        column: source_column(name_tok.column),
    };
    Some((statement, i))
}

/// A fragment or library name: a user word or a quoted literal.
fn name_text(tok: &Token) -> Option<String> {
    match tok.kind {
        TokenKind::Identifier => Some(tok.text.clone()),
        TokenKind::Literal => tok.literal_body().map(str::to_string),
        _ => None,
    }
}

fn is_separator(tok: &Token) -> bool {
    tok.kind == TokenKind::Punctuation && matches!(tok.text.as_str(), "," | ";")
}

/// A `REPLACING` operand starting at `i`.
fn operand(tokens: &[(u32, &Token)], i: usize) -> Option<(String, usize)> {
    let &(_, tok) = tokens.get(i)?;
    if tok.kind == TokenKind::Punctuation && tok.text == "==" {
        let mut words = Vec::new();
        let mut j = i + 1;
        while let Some(&(_, t)) = tokens.get(j) {
            if t.kind == TokenKind::Punctuation && t.text == "==" {
                return Some((words.join(" "), j + 1));
            }
            words.push(t.text.as_str());
            j += 1;
        }
        return None;
    }
    match tok.kind {
        TokenKind::Identifier | TokenKind::Keyword | TokenKind::Literal if !tok.is_word("BY") => {
            Some((tok.text.clone(), i + 1))
        }
        _ => None,
    }
}
