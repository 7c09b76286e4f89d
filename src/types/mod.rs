mod ast;
mod category;
mod error;
mod field;
mod options;
mod token;

pub use ast::{
    aggregate, count_all, field, AggFn, Aggregate, AggregateOperand, AstNode, CompOp, Comparison,
    FieldRef, Literal, LogicOp, Logical, Term,
};
pub use category::RuleCategory;
pub use error::{ArityError, CompileError, ErrorKind, Violation};
pub use field::{Field, UnknownName};
pub use options::CompileOptions;
pub use token::{Token, TokenKind};
