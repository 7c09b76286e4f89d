use std::fmt;

/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    String,
    Bool,
    AggregateFunction,
    Field,
    LogicOp,
    ComparisonOp,
    Identifier,
    Wildcard,
    LParen,
    RParen,
}

impl TokenKind {
    /// Human-readable description used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Bool => "boolean",
            TokenKind::AggregateFunction => "aggregate function",
            TokenKind::Field => "field",
            TokenKind::LogicOp => "logical operator",
            TokenKind::ComparisonOp => "comparison operator",
            TokenKind::Identifier => "word",
            TokenKind::Wildcard => "'*'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A single lexeme.
///
/// `text` is upper-cased for everything except string literals, which keep
/// their quotes and (by default) the casing of the source. `position` is the
/// byte offset of the lexeme in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub(crate) fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub(crate) fn is_logic(&self, word: &str) -> bool {
        self.kind == TokenKind::LogicOp && self.text == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::LParen | TokenKind::RParen | TokenKind::Wildcard => {
                write!(f, "'{}'", self.text)
            }
            _ => write!(f, "{} '{}'", self.kind, self.text),
        }
    }
}
