use std::fmt;

use thiserror::Error;

use super::ast::LogicOp;
use super::category::RuleCategory;
use crate::parse::SyntaxError;

/// Why an expression was rejected for its declared [`RuleCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    LogicalOperatorsForbidden,
    AggregatesForbidden,
    ComparisonRequired,
    AggregateRequired,
    LogicalOperatorRequired,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::LogicalOperatorsForbidden => {
                f.write_str("logical operators (AND, OR, NOT) are not allowed")
            }
            Violation::AggregatesForbidden => {
                f.write_str("aggregate functions (COUNT, SUM, AVG, MIN, MAX, COUNT_DISTINCT) are not allowed")
            }
            Violation::ComparisonRequired => {
                f.write_str("a comparison operator (=, ==, !=, >, >=, <, <=) is required")
            }
            Violation::AggregateRequired => f.write_str(
                "an aggregate function (COUNT, SUM, AVG, MIN, MAX, COUNT_DISTINCT) is required",
            ),
            Violation::LogicalOperatorRequired => {
                f.write_str("at least one logical operator (AND, OR, NOT) is required")
            }
        }
    }
}

/// Fieldless mirror of [`CompileError`] for callers that render by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyExpression,
    Lex,
    UnknownField,
    CategoryConstraint,
    Syntax,
}

/// Errors produced while compiling a rule expression. Every error is terminal
/// for the call that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("expression cannot be empty")]
    EmptyExpression,

    #[error(
        "unknown character '{character}' at position {position}; check the spelling of fields, operators and values"
    )]
    Lex { character: char, position: usize },

    #[error("unknown field(s): {}. Valid fields: {}", names.join(", "), valid.join(", "))]
    UnknownField {
        names: Vec<String>,
        valid: Vec<&'static str>,
    },

    #[error("{violation} in {category} rules, e.g. {}", category.example())]
    CategoryConstraint {
        category: RuleCategory,
        violation: Violation,
    },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl CompileError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::EmptyExpression => ErrorKind::EmptyExpression,
            CompileError::Lex { .. } => ErrorKind::Lex,
            CompileError::UnknownField { .. } => ErrorKind::UnknownField,
            CompileError::CategoryConstraint { .. } => ErrorKind::CategoryConstraint,
            CompileError::Syntax(_) => ErrorKind::Syntax,
        }
    }

    /// Byte offset in the source text, where one is known.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            CompileError::Lex { position, .. } => Some(*position),
            CompileError::Syntax(e) => e.position(),
            _ => None,
        }
    }
}

/// A logical node was built with the wrong number of operands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operator} requires {} operand(s), got {actual}", expected(*operator))]
pub struct ArityError {
    pub operator: LogicOp,
    pub actual: usize,
}

fn expected(operator: LogicOp) -> &'static str {
    match operator {
        LogicOp::Not => "exactly one",
        LogicOp::And | LogicOp::Or => "at least two",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_expression_message() {
        assert_eq!(
            CompileError::EmptyExpression.to_string(),
            "expression cannot be empty"
        );
    }

    #[test]
    fn lex_message() {
        let err = CompileError::Lex {
            character: '$',
            position: 7,
        };
        assert_eq!(
            err.to_string(),
            "unknown character '$' at position 7; check the spelling of fields, operators and values"
        );
        assert_eq!(err.position(), Some(7));
        assert_eq!(err.kind(), ErrorKind::Lex);
    }

    #[test]
    fn unknown_field_message_lists_everything() {
        let err = CompileError::UnknownField {
            names: vec!["FOO".into(), "BAR".into()],
            valid: vec!["AMOUNT", "TIME"],
        };
        assert_eq!(
            err.to_string(),
            "unknown field(s): FOO, BAR. Valid fields: AMOUNT, TIME"
        );
    }

    #[test]
    fn category_constraint_message_has_example() {
        let err = CompileError::CategoryConstraint {
            category: RuleCategory::Threshold,
            violation: Violation::LogicalOperatorsForbidden,
        };
        assert_eq!(
            err.to_string(),
            "logical operators (AND, OR, NOT) are not allowed in THRESHOLD rules, e.g. AMOUNT > 1000"
        );
        assert_eq!(err.position(), None);
    }

    #[test]
    fn arity_message() {
        let err = ArityError {
            operator: LogicOp::And,
            actual: 1,
        };
        assert_eq!(err.to_string(), "AND requires at least two operand(s), got 1");
    }
}
