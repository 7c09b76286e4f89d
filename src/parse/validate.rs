use crate::types::{CompileError, Field, RuleCategory, Token, TokenKind, Violation};

/// Token-level checks run before parsing: the field whitelist, then the
/// structural constraints of `category`.
pub(crate) fn validate(tokens: &[Token], category: RuleCategory) -> Result<(), CompileError> {
    check_fields(tokens)?;
    match category_violation(tokens, category) {
        Some(violation) => Err(CompileError::CategoryConstraint {
            category,
            violation,
        }),
        None => Ok(()),
    }
}

/// Collects every field-shaped name outside the whitelist so the operator
/// sees all of them at once.
///
/// A bare word counts as field-shaped when it is the left operand of a
/// comparison or the argument of an aggregate function; elsewhere it is an
/// enumerated string value such as `night`.
fn check_fields(tokens: &[Token]) -> Result<(), CompileError> {
    let mut unknown: Vec<String> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let suspicious = match token.kind {
            TokenKind::Field => Field::from_name(&token.text).is_none(),
            TokenKind::Identifier => {
                let next = tokens.get(i + 1).map(|t| t.kind);
                let in_aggregate = i >= 2
                    && tokens[i - 1].is(TokenKind::LParen)
                    && tokens[i - 2].is(TokenKind::AggregateFunction);
                next == Some(TokenKind::ComparisonOp) || in_aggregate
            }
            _ => false,
        };
        if suspicious && !unknown.contains(&token.text) {
            unknown.push(token.text.clone());
        }
    }
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(CompileError::UnknownField {
            names: unknown,
            valid: Field::names(),
        })
    }
}

fn category_violation(tokens: &[Token], category: RuleCategory) -> Option<Violation> {
    let has = |kind: TokenKind| tokens.iter().any(|t| t.is(kind));
    let logic = has(TokenKind::LogicOp);
    let aggregate = has(TokenKind::AggregateFunction);
    let comparison = has(TokenKind::ComparisonOp);

    match category {
        RuleCategory::Threshold if logic => Some(Violation::LogicalOperatorsForbidden),
        RuleCategory::Threshold if aggregate => Some(Violation::AggregatesForbidden),
        RuleCategory::Threshold if !comparison => Some(Violation::ComparisonRequired),
        RuleCategory::Pattern if logic => Some(Violation::LogicalOperatorsForbidden),
        RuleCategory::Pattern if !aggregate => Some(Violation::AggregateRequired),
        RuleCategory::Pattern if !comparison => Some(Violation::ComparisonRequired),
        RuleCategory::Composite if !logic => Some(Violation::LogicalOperatorRequired),
        RuleCategory::Composite if aggregate => Some(Violation::AggregatesForbidden),
        _ => None,
    }
}
