//! Compiler for fraud-detection rule expressions.
//!
//! Operators write rules such as `AMOUNT > 1000`, `COUNT(AMOUNT) > 5` or
//! `AMOUNT > 100 AND TIME = 'night'`. [`compile`] turns that text, together
//! with the rule's declared [`RuleCategory`], into an [`AstNode`] whose
//! variant and enum names match the rule-evaluation service's message schema.
//!
//! ```
//! use fraudrule::{compile, field, Field, RuleCategory};
//!
//! let ast = compile("amount > 1000", RuleCategory::Threshold).unwrap();
//! assert_eq!(ast, field(Field::Amount).gt(1000));
//! ```

mod compile;
#[cfg(feature = "json")]
mod document;
mod error;
pub mod parse;
mod types;

pub use compile::Compiler;
pub use error::FraudruleError;
pub use parse::SyntaxError;
pub use types::{
    aggregate, count_all, field, AggFn, Aggregate, AggregateOperand, ArityError, AstNode, CompOp,
    Comparison, CompileError, CompileOptions, ErrorKind, Field, FieldRef, Literal, LogicOp,
    Logical, RuleCategory, Term, Token, TokenKind, UnknownName, Violation,
};

#[cfg(feature = "json")]
pub use document::{from_document, from_json_str, to_document, to_json_string, DocumentError};

/// Compile `text` as a rule of `category` with default options.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile(text: &str, category: RuleCategory) -> Result<AstNode, CompileError> {
    Compiler::new().compile(text, category)
}

/// Compile `text` and render the result as the JSON document stored with the
/// rule record.
///
/// # Errors
///
/// Returns [`FraudruleError`] on compile or encoding failure.
#[cfg(feature = "json")]
pub fn compile_document(
    text: &str,
    category: RuleCategory,
) -> Result<serde_json::Value, FraudruleError> {
    let ast = compile(text, category)?;
    Ok(to_document(&ast)?)
}
