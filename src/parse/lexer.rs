use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, delimited, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use crate::types::{AggFn, CompileError, Field, Token, TokenKind};

// -- Lexemes ----------------------------------------------------------------

fn number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (opt('-'), digit1, opt(('.', digit0)))
        .take()
        .parse_next(input)
}

fn string_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((
        delimited('\'', take_till(0.., '\''), '\''),
        delimited('"', take_till(0.., '"'), '"'),
    ))
    .take()
    .parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn comparison_op<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt(("==", "!=", ">=", "<=", ">", "<", "=")).parse_next(input)
}

fn lexeme<'i>(input: &mut &'i str) -> ModalResult<(TokenKind, &'i str)> {
    alt((
        number.map(|s| (TokenKind::Number, s)),
        string_literal.map(|s| (TokenKind::String, s)),
        word.map(|w| (classify_word(w), w)),
        comparison_op.map(|s| (TokenKind::ComparisonOp, s)),
        "(".map(|s| (TokenKind::LParen, s)),
        ")".map(|s| (TokenKind::RParen, s)),
        "*".map(|s| (TokenKind::Wildcard, s)),
    ))
    .parse_next(input)
}

/// Keywords win over the identifier fallback. Words are matched whole, so
/// `COUNTRY` is an identifier rather than `COUNT` followed by `RY`.
fn classify_word(word: &str) -> TokenKind {
    let upper = word.to_ascii_uppercase();
    if upper == "TRUE" || upper == "FALSE" {
        TokenKind::Bool
    } else if AggFn::from_name(&upper).is_some() {
        TokenKind::AggregateFunction
    } else if Field::from_name(&upper).is_some() {
        TokenKind::Field
    } else if matches!(upper.as_str(), "AND" | "OR" | "NOT") {
        TokenKind::LogicOp
    } else {
        TokenKind::Identifier
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

// -- Driver -----------------------------------------------------------------

/// Split `text` into tokens. Everything but string literal bodies is
/// upper-cased; `preserve_literal_case` decides whether literal bodies are too.
pub(crate) fn tokenize(text: &str, preserve_literal_case: bool) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut rest = text;
    loop {
        rest = rest.trim_start_matches(is_space);
        let Some(character) = rest.chars().next() else {
            break;
        };
        let position = text.len() - rest.len();
        let (kind, raw) = lexeme
            .parse_next(&mut rest)
            .map_err(|_| CompileError::Lex {
                character,
                position,
            })?;
        let normalized = match kind {
            TokenKind::String if preserve_literal_case => raw.to_owned(),
            TokenKind::String => raw.to_uppercase(),
            _ => raw.to_ascii_uppercase(),
        };
        tokens.push(Token::new(kind, normalized, position));
    }
    Ok(tokens)
}
