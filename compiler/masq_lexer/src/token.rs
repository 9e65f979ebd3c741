//! Token types produced by the line scanner.

/// What a token is, as far as rewriting is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A reserved word. Never rewritten.
    Keyword,
    /// A user-defined word. Candidate for substitution.
    Identifier,
    /// A `PICTURE`/`USAGE` clause. Opaque and protected.
    LayoutDescriptor,
    /// Quoted or numeric literal.
    Literal,
    /// Arithmetic or relational operator.
    Operator,
    /// Period, comma, semicolon, parentheses, colon, `==`.
    Punctuation,
    /// Run of blanks between tokens.
    Whitespace,
    /// Floating `*>` comment running to the end of the zone.
    Comment,
}

/// A single token of a code zone.
///
/// `column` is the 0-based character offset inside the code zone; add
/// [`CODE_START_COLUMN`](crate::CODE_START_COLUMN) for the 1-based source
/// column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, column: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            column,
        }
    }

    /// Width of the token in characters.
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns `true` for whitespace and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Case-insensitive comparison against a reserved word.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier)
            && self.text.eq_ignore_ascii_case(word)
    }

    /// Returns `true` for the sentence-terminating period.
    pub fn is_period(&self) -> bool {
        self.kind == TokenKind::Punctuation && self.text == "."
    }

    /// Unquoted body of a quoted literal, or `None` for anything else.
    pub fn literal_body(&self) -> Option<&str> {
        if self.kind != TokenKind::Literal {
            return None;
        }
        let text = self.text.as_str();
        let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let inner = &text[1..];
        Some(inner.strip_suffix(quote).unwrap_or(inner))
    }
}
