use std::fmt;
use std::ops::Not;
use std::str::FromStr;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use super::error::ArityError;
use super::field::{Field, UnknownName};

/// Comparison operators. Variant names map one-to-one onto the wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CompOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl CompOp {
    pub const ALL: [CompOp; 6] = [
        CompOp::Equal,
        CompOp::NotEqual,
        CompOp::GreaterThan,
        CompOp::GreaterThanOrEqual,
        CompOp::LessThan,
        CompOp::LessThanOrEqual,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CompOp::Equal => "EQUAL",
            CompOp::NotEqual => "NOT_EQUAL",
            CompOp::GreaterThan => "GREATER_THAN",
            CompOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            CompOp::LessThan => "LESS_THAN",
            CompOp::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
        }
    }

    /// Canonical source symbol. `EQUAL` renders as `=`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            CompOp::Equal => "=",
            CompOp::NotEqual => "!=",
            CompOp::GreaterThan => ">",
            CompOp::GreaterThanOrEqual => ">=",
            CompOp::LessThan => "<",
            CompOp::LessThanOrEqual => "<=",
        }
    }

    /// `==` and `=` both map to [`CompOp::Equal`].
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<CompOp> {
        Some(match symbol {
            "=" | "==" => CompOp::Equal,
            "!=" => CompOp::NotEqual,
            ">" => CompOp::GreaterThan,
            ">=" => CompOp::GreaterThanOrEqual,
            "<" => CompOp::LessThan,
            "<=" => CompOp::LessThanOrEqual,
            _ => return None,
        })
    }
}

/// Aggregate functions applied over the records of a pattern window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AggFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    CountDistinct,
}

impl AggFn {
    pub const ALL: [AggFn; 6] = [
        AggFn::Count,
        AggFn::Sum,
        AggFn::Avg,
        AggFn::Min,
        AggFn::Max,
        AggFn::CountDistinct,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AggFn::Count => "COUNT",
            AggFn::Sum => "SUM",
            AggFn::Avg => "AVG",
            AggFn::Min => "MIN",
            AggFn::Max => "MAX",
            AggFn::CountDistinct => "COUNT_DISTINCT",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<AggFn> {
        AggFn::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LogicOp {
    And,
    Or,
    Not,
}

impl LogicOp {
    pub const ALL: [LogicOp; 3] = [LogicOp::And, LogicOp::Or, LogicOp::Not];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
            LogicOp::Not => "NOT",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<LogicOp> {
        LogicOp::ALL.into_iter().find(|op| op.as_str() == name)
    }
}

/// Accepts the wire name or the source symbol, ignoring case.
impl FromStr for CompOp {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        CompOp::from_symbol(&upper)
            .or_else(|| CompOp::ALL.into_iter().find(|op| op.as_str() == upper))
            .ok_or_else(|| UnknownName(s.to_owned()))
    }
}

impl FromStr for AggFn {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggFn::from_name(&s.trim().to_ascii_uppercase()).ok_or_else(|| UnknownName(s.to_owned()))
    }
}

impl FromStr for LogicOp {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicOp::from_name(&s.trim().to_ascii_uppercase()).ok_or_else(|| UnknownName(s.to_owned()))
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AggFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constant operand. Exactly one payload, named after its wire field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Literal {
    #[cfg_attr(feature = "json", serde(rename = "int_value"))]
    Int32(i32),
    #[cfg_attr(feature = "json", serde(rename = "int64_value"))]
    Int64(i64),
    #[cfg_attr(feature = "json", serde(rename = "float_value"))]
    Float(f64),
    #[cfg_attr(feature = "json", serde(rename = "string_value"))]
    String(String),
    #[cfg_attr(feature = "json", serde(rename = "bool_value"))]
    Bool(bool),
}

impl Literal {
    /// Classify numeric source text.
    ///
    /// Integral values in `[-2^31, 2^31 - 1]` become [`Literal::Int32`], other
    /// integral values that fit 64 bits become [`Literal::Int64`], everything
    /// else is [`Literal::Float`]. Returns `None` if the text is not a number
    /// or is too large to represent as a finite float.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_number_text(text: &str) -> Option<Literal> {
        if let Ok(int) = text.parse::<i64>() {
            return Some(Literal::from(int));
        }
        let value: f64 = text.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            return Some(Literal::from(value as i64));
        }
        Some(Literal::Float(value))
    }
}

/// Narrows to [`Literal::Int32`] when the value fits, matching how numeric
/// source text is classified.
impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        match i32::try_from(v) {
            Ok(narrow) => Literal::Int32(narrow),
            Err(_) => Literal::Int64(v),
        }
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Int32(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int32(v) => write!(f, "{v}"),
            Literal::Int64(v) => write!(f, "{v}"),
            Literal::Float(v) => {
                debug_assert!(v.is_finite(), "non-finite float literal {v}");
                if v.fract() == 0.0 {
                    write!(f, "{v}.0")
                } else {
                    write!(f, "{v}")
                }
            }
            Literal::String(v) if v.contains('\'') => write!(f, "\"{v}\""),
            Literal::String(v) => write!(f, "'{v}'"),
            Literal::Bool(true) => f.write_str("TRUE"),
            Literal::Bool(false) => f.write_str("FALSE"),
        }
    }
}

/// Reference to a transaction attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct FieldRef {
    #[cfg_attr(feature = "json", serde(rename = "field"))]
    pub name: Field,
}

/// What an aggregate function ranges over. Only a field or `*` can appear
/// here, so a malformed aggregate cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum AggregateOperand {
    Field(FieldRef),
    Wildcard {},
}

impl From<Field> for AggregateOperand {
    fn from(name: Field) -> Self {
        AggregateOperand::Field(FieldRef { name })
    }
}

impl From<AggregateOperand> for AstNode {
    fn from(operand: AggregateOperand) -> Self {
        match operand {
            AggregateOperand::Field(f) => AstNode::Field(f),
            AggregateOperand::Wildcard {} => AstNode::Wildcard {},
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Aggregate {
    pub function: AggFn,
    pub operand: AggregateOperand,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Comparison {
    pub operator: CompOp,
    pub left: Box<AstNode>,
    pub right: Box<AstNode>,
}

/// A logical combination. `NOT` holds exactly one operand, `AND` / `OR` hold
/// two or more. The fields are private so the arity cannot be broken after
/// construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(try_from = "RawLogical"))]
pub struct Logical {
    operator: LogicOp,
    operands: Vec<AstNode>,
}

impl Logical {
    /// Build a logical node, checking operand arity.
    ///
    /// # Errors
    ///
    /// Returns [`ArityError`] if `NOT` is given anything but one operand, or
    /// `AND` / `OR` fewer than two.
    pub fn new(operator: LogicOp, operands: Vec<AstNode>) -> Result<Self, ArityError> {
        let ok = match operator {
            LogicOp::Not => operands.len() == 1,
            LogicOp::And | LogicOp::Or => operands.len() >= 2,
        };
        if !ok {
            return Err(ArityError {
                operator,
                actual: operands.len(),
            });
        }
        Ok(Self { operator, operands })
    }

    #[must_use]
    pub fn not(operand: AstNode) -> Self {
        Self {
            operator: LogicOp::Not,
            operands: vec![operand],
        }
    }

    /// Caller guarantees the arity; used by the parser's chain accumulator.
    pub(crate) fn from_chain(operator: LogicOp, operands: Vec<AstNode>) -> Self {
        debug_assert!(operator != LogicOp::Not && operands.len() >= 2);
        Self { operator, operands }
    }

    #[must_use]
    pub fn operator(&self) -> LogicOp {
        self.operator
    }

    #[must_use]
    pub fn operands(&self) -> &[AstNode] {
        &self.operands
    }

    #[must_use]
    pub fn into_operands(self) -> Vec<AstNode> {
        self.operands
    }
}

#[cfg(feature = "json")]
#[derive(Deserialize)]
struct RawLogical {
    operator: LogicOp,
    operands: Vec<AstNode>,
}

#[cfg(feature = "json")]
impl TryFrom<RawLogical> for Logical {
    type Error = ArityError;

    fn try_from(raw: RawLogical) -> Result<Self, Self::Error> {
        Logical::new(raw.operator, raw.operands)
    }
}

/// Compiled rule expression.
///
/// A strict tree: every node owns its children. Variant and enum names are
/// the ones the rule-evaluation service's message schema uses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum AstNode {
    Literal(Literal),
    #[cfg_attr(feature = "json", serde(rename = "field"))]
    Field(FieldRef),
    Wildcard {},
    Aggregate(Aggregate),
    Comparison(Comparison),
    Logical(Logical),
}

impl AstNode {
    #[must_use]
    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            AstNode::Comparison(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_logical(&self) -> Option<&Logical> {
        match self {
            AstNode::Logical(l) => Some(l),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            AstNode::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Whether this node can stand as an operand of AND / OR / NOT.
    pub(crate) fn is_condition(&self) -> bool {
        matches!(self, AstNode::Comparison(_) | AstNode::Logical(_))
    }

    /// Pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a AstNode)) {
        visit(self);
        match self {
            AstNode::Comparison(c) => {
                c.left.walk(visit);
                c.right.walk(visit);
            }
            AstNode::Logical(l) => {
                for operand in &l.operands {
                    operand.walk(visit);
                }
            }
            AstNode::Literal(_)
            | AstNode::Field(_)
            | AstNode::Wildcard {}
            | AstNode::Aggregate(_) => {}
        }
    }

    /// Total number of nodes, counting an aggregate's operand.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            count += if matches!(node, AstNode::Aggregate(_)) { 2 } else { 1 };
        });
        count
    }

    /// Height of the tree. A leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            AstNode::Literal(_) | AstNode::Field(_) | AstNode::Wildcard {} => 1,
            AstNode::Aggregate(_) => 2,
            AstNode::Comparison(c) => 1 + c.left.depth().max(c.right.depth()),
            AstNode::Logical(l) => 1 + l.operands.iter().map(AstNode::depth).max().unwrap_or(0),
        }
    }

    /// Distinct fields referenced anywhere in the tree, in order of first
    /// appearance.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            let name = match node {
                AstNode::Field(f)
                | AstNode::Aggregate(Aggregate {
                    operand: AggregateOperand::Field(f),
                    ..
                }) => f.name,
                _ => return,
            };
            if !out.contains(&name) {
                out.push(name);
            }
        });
        out
    }

    /// Combine with AND. Appends to an existing AND chain on the left instead
    /// of nesting.
    #[must_use]
    pub fn and(self, other: AstNode) -> AstNode {
        self.chain(LogicOp::And, other)
    }

    /// Combine with OR. Appends to an existing OR chain on the left instead
    /// of nesting.
    #[must_use]
    pub fn or(self, other: AstNode) -> AstNode {
        self.chain(LogicOp::Or, other)
    }

    fn chain(self, operator: LogicOp, other: AstNode) -> AstNode {
        let operands = match self {
            AstNode::Logical(l) if l.operator == operator => {
                let mut operands = l.operands;
                operands.push(other);
                operands
            }
            lhs => vec![lhs, other],
        };
        AstNode::Logical(Logical::from_chain(operator, operands))
    }

    fn needs_parens_under(&self, parent: LogicOp) -> bool {
        match self {
            AstNode::Logical(l) => match parent {
                LogicOp::Not => l.operator != LogicOp::Not,
                LogicOp::And => l.operator != LogicOp::Not,
                LogicOp::Or => l.operator == LogicOp::Or,
            },
            _ => false,
        }
    }
}

impl Not for AstNode {
    type Output = AstNode;

    fn not(self) -> AstNode {
        AstNode::Logical(Logical::not(self))
    }
}

impl From<Literal> for AstNode {
    fn from(l: Literal) -> Self {
        AstNode::Literal(l)
    }
}

impl From<Field> for AstNode {
    fn from(name: Field) -> Self {
        AstNode::Field(FieldRef { name })
    }
}

impl From<Aggregate> for AstNode {
    fn from(a: Aggregate) -> Self {
        AstNode::Aggregate(a)
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            AggregateOperand::Field(field) => write!(f, "{}({})", self.function, field.name),
            AggregateOperand::Wildcard {} => write!(f, "{}(*)", self.function),
        }
    }
}

/// Renders canonical expression text that compiles back to an equal tree.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Literal(l) => write!(f, "{l}"),
            AstNode::Field(field) => write!(f, "{}", field.name),
            AstNode::Wildcard {} => f.write_str("*"),
            AstNode::Aggregate(a) => write!(f, "{a}"),
            AstNode::Comparison(c) => {
                write_operand(f, &c.left)?;
                write!(f, " {} ", c.operator.symbol())?;
                write_operand(f, &c.right)
            }
            AstNode::Logical(l) => {
                if l.operator == LogicOp::Not {
                    f.write_str("NOT ")?;
                }
                for (i, operand) in l.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", l.operator)?;
                    }
                    if operand.needs_parens_under(l.operator) {
                        write!(f, "({operand})")?;
                    } else {
                        write!(f, "{operand}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &AstNode) -> fmt::Result {
    if node.is_condition() {
        write!(f, "({node})")
    } else {
        write!(f, "{node}")
    }
}

/// Intermediate builder for comparisons. Created by [`field()`],
/// [`aggregate()`] or [`count_all()`].
#[derive(Debug, Clone)]
pub struct Term {
    node: AstNode,
}

macro_rules! comparison_builders {
    ($($method:ident => $op:ident),* $(,)?) => {
        impl Term {
            $(
                #[must_use]
                pub fn $method(self, value: impl Into<Literal>) -> AstNode {
                    self.compare(CompOp::$op, value)
                }
            )*
        }
    };
}

comparison_builders! {
    eq => Equal,
    neq => NotEqual,
    gt => GreaterThan,
    gte => GreaterThanOrEqual,
    lt => LessThan,
    lte => LessThanOrEqual,
}

impl Term {
    #[must_use]
    pub fn compare(self, operator: CompOp, value: impl Into<Literal>) -> AstNode {
        AstNode::Comparison(Comparison {
            operator,
            left: Box::new(self.node),
            right: Box::new(AstNode::Literal(value.into())),
        })
    }

    #[must_use]
    pub fn into_node(self) -> AstNode {
        self.node
    }
}

#[must_use]
pub fn field(name: Field) -> Term {
    Term {
        node: AstNode::from(name),
    }
}

#[must_use]
pub fn aggregate(function: AggFn, operand: impl Into<AggregateOperand>) -> Term {
    Term {
        node: AstNode::Aggregate(Aggregate {
            function,
            operand: operand.into(),
        }),
    }
}

/// `COUNT(*)`.
#[must_use]
pub fn count_all() -> Term {
    aggregate(AggFn::Count, AggregateOperand::Wildcard {})
}
