mod error;
mod grammar;
mod lexer;
mod validate;

pub use error::SyntaxError;

pub(crate) use grammar::Parser;

use crate::types::{AstNode, CompileError, CompileOptions, RuleCategory, Token};

/// Split an expression into tokens, keeping string literal casing.
///
/// # Errors
///
/// Returns [`CompileError::Lex`] at the first character no token class
/// recognizes.
pub fn tokenize(text: &str) -> Result<Vec<Token>, CompileError> {
    lexer::tokenize(text, CompileOptions::default().preserve_literal_case)
}

pub(crate) fn tokenize_with(text: &str, preserve_literal_case: bool) -> Result<Vec<Token>, CompileError> {
    lexer::tokenize(text, preserve_literal_case)
}

/// Check a token stream against the field whitelist and the structural rules
/// of `category`.
///
/// # Errors
///
/// Returns [`CompileError::UnknownField`] listing every unrecognized field, or
/// [`CompileError::CategoryConstraint`] naming the violated rule.
pub fn validate(tokens: &[Token], category: RuleCategory) -> Result<(), CompileError> {
    validate::validate(tokens, category)
}

/// Parse a token stream with the entry production for `category`.
///
/// # Errors
///
/// Returns [`SyntaxError`] at the first grammar violation.
pub fn parse(tokens: &[Token], category: RuleCategory) -> Result<AstNode, SyntaxError> {
    let end = tokens.last().map_or(0, |t| t.position + t.text.len());
    Parser::new(tokens, category, CompileOptions::default().max_depth, end).parse()
}
