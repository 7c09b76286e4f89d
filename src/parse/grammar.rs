use crate::types::{
    AggFn, Aggregate, AggregateOperand, AstNode, CompOp, Comparison, Field, Literal, LogicOp, Logical,
    RuleCategory, Token, TokenKind,
};

use super::error::SyntaxError;

type ParseResult<T> = Result<T, SyntaxError>;

const OPERAND: &str = "a number, string, field, aggregate function or '('";

/// Recursive-descent parser over an immutable token list.
///
/// Precedence, lowest to highest: OR, AND, NOT, comparison, atom. The cursor
/// only moves forward; every production decides on a single token of
/// lookahead.
pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    category: RuleCategory,
    depth: usize,
    max_depth: usize,
    end: usize,
}

impl<'t> Parser<'t> {
    /// `end` is the byte offset reported for errors at end of input.
    pub(crate) fn new(tokens: &'t [Token], category: RuleCategory, max_depth: usize, end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            category,
            depth: 0,
            max_depth,
            end,
        }
    }

    pub(crate) fn parse(mut self) -> ParseResult<AstNode> {
        let node = match self.category {
            RuleCategory::Threshold => self.threshold()?,
            RuleCategory::Pattern => self.pattern()?,
            RuleCategory::Composite => self.logical_expr()?,
        };
        if let Some(token) = self.peek() {
            return Err(self.error(
                format!("failed to process the whole expression; unprocessed {token} remains"),
                token.position,
            ));
        }
        Ok(node)
    }

    // -- Entry points -------------------------------------------------------

    fn threshold(&mut self) -> ParseResult<AstNode> {
        let start = self.position();
        let node = self.comparison()?;
        if node.as_comparison().is_some() {
            return Ok(node);
        }
        Err(match self.peek() {
            Some(token) => self.error(
                format!("expected a comparison operator, found {token}"),
                token.position,
            ),
            None => self.error(
                format!("THRESHOLD rule must be a comparison, found {}", describe(&node)),
                start,
            ),
        })
    }

    fn pattern(&mut self) -> ParseResult<AstNode> {
        let start = self.position();
        let left = self.atom()?;
        if !matches!(left, AstNode::Aggregate(_)) {
            return Err(self.error(
                format!(
                    "PATTERN rule must start with an aggregate function such as COUNT(AMOUNT) or COUNT(*), found {}",
                    describe(&left)
                ),
                start,
            ));
        }
        let operator = self.comparison_op("a comparison operator after the aggregate")?;
        let right_start = self.position();
        let right = self.atom()?;
        match right {
            AstNode::Literal(_) => Ok(AstNode::Comparison(Comparison {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            })),
            AstNode::Field(f) => Err(self.error(
                format!(
                    "right-hand side of a PATTERN rule must be a literal value, not field {}",
                    f.name
                ),
                right_start,
            )),
            other => Err(self.error(
                format!(
                    "right-hand side of a PATTERN rule must be a literal value, found {}",
                    describe(&other)
                ),
                right_start,
            )),
        }
    }

    // -- Logical productions ------------------------------------------------

    fn logical_expr(&mut self) -> ParseResult<AstNode> {
        self.chain(LogicOp::Or, Self::logical_term)
    }

    fn logical_term(&mut self) -> ParseResult<AstNode> {
        self.chain(LogicOp::And, Self::logical_factor)
    }

    /// Parses `operand (op operand)*`, accumulating a same-operator run into
    /// one flat node.
    fn chain(
        &mut self,
        operator: LogicOp,
        operand: fn(&mut Self) -> ParseResult<AstNode>,
    ) -> ParseResult<AstNode> {
        let start = self.position();
        let first = operand(self)?;
        if !self.at_logic(operator) {
            return Ok(first);
        }
        let mut operands = vec![self.condition(first, start, operator)?];
        while self.at_logic(operator) {
            self.pos += 1;
            let start = self.position();
            let next = operand(self)?;
            operands.push(self.condition(next, start, operator)?);
        }
        Ok(AstNode::Logical(Logical::from_chain(operator, operands)))
    }

    fn logical_factor(&mut self) -> ParseResult<AstNode> {
        if !self.at_logic(LogicOp::Not) {
            return self.comparison();
        }
        let not_at = self.position();
        self.pos += 1;
        let start = self.position();
        let operand = self.nested(not_at, Self::logical_factor)?;
        let operand = self.condition(operand, start, LogicOp::Not)?;
        Ok(AstNode::Logical(Logical::not(operand)))
    }

    /// Operands of AND / OR / NOT must be conditions, never bare values.
    fn condition(&self, node: AstNode, start: usize, operator: LogicOp) -> ParseResult<AstNode> {
        if node.is_condition() {
            return Ok(node);
        }
        Err(self.error(
            format!(
                "operand of {operator} must be a comparison such as AMOUNT > 100, found {}",
                describe(&node)
            ),
            start,
        ))
    }

    // -- Comparison and atoms -----------------------------------------------

    fn comparison(&mut self) -> ParseResult<AstNode> {
        let left = self.atom()?;
        if !self.peek().is_some_and(|t| t.is(TokenKind::ComparisonOp)) {
            return Ok(left);
        }
        let operator = self.comparison_op("a comparison operator")?;
        let right = self.atom()?;
        Ok(AstNode::Comparison(Comparison {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn atom(&mut self) -> ParseResult<AstNode> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected_end(OPERAND));
        };
        let node = match token.kind {
            TokenKind::Number => {
                let literal = Literal::from_number_text(&token.text).ok_or_else(|| {
                    let reason = if token.text.parse::<f64>().is_ok() {
                        "is out of range"
                    } else {
                        "is not valid"
                    };
                    self.error(format!("number '{}' {reason}", token.text), token.position)
                })?;
                self.pos += 1;
                AstNode::Literal(literal)
            }
            TokenKind::String => {
                let body = strip_quotes(&token.text).ok_or_else(|| {
                    self.error(format!("malformed string {}", token.text), token.position)
                })?;
                self.pos += 1;
                AstNode::Literal(Literal::String(body.to_owned()))
            }
            TokenKind::Bool => {
                self.pos += 1;
                AstNode::Literal(Literal::Bool(token.text == "TRUE"))
            }
            TokenKind::Field => {
                let name = self.field_name(token)?;
                self.pos += 1;
                AstNode::from(name)
            }
            TokenKind::Identifier => {
                self.pos += 1;
                AstNode::Literal(Literal::String(token.text.to_lowercase()))
            }
            TokenKind::AggregateFunction => self.aggregate()?,
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.nested(token.position, Self::logical_expr)?;
                self.expect(TokenKind::RParen, "')' to close the group")?;
                inner
            }
            TokenKind::Wildcard => {
                return Err(self
                    .error(
                        "'*' is only valid as an aggregate function argument",
                        token.position,
                    )
                    .with_example("COUNT(*) >= 10"));
            }
            TokenKind::RParen | TokenKind::ComparisonOp | TokenKind::LogicOp => {
                return Err(self.error(
                    format!("unexpected {token}; expected {OPERAND}"),
                    token.position,
                ));
            }
        };
        Ok(node)
    }

    fn aggregate(&mut self) -> ParseResult<AstNode> {
        let token = self.expect(TokenKind::AggregateFunction, "an aggregate function")?;
        let function = AggFn::from_name(&token.text).ok_or_else(|| {
            self.error(
                format!("unknown aggregate function '{}'", token.text),
                token.position,
            )
        })?;
        self.expect(TokenKind::LParen, "'(' after the aggregate function")?;
        let Some(arg) = self.peek() else {
            return Err(self.unexpected_end("a field or '*' as the aggregate argument"));
        };
        let operand = match arg.kind {
            TokenKind::Field => AggregateOperand::from(self.field_name(arg)?),
            TokenKind::Wildcard => AggregateOperand::Wildcard {},
            _ => {
                return Err(SyntaxError::new(format!(
                    "argument of {function} must be a field (e.g. AMOUNT) or '*', found {arg}"
                ))
                .at(arg.position)
                .with_example("COUNT(AMOUNT) > 5"));
            }
        };
        self.pos += 1;
        self.expect(TokenKind::RParen, "')' after the aggregate argument")?;
        Ok(AstNode::Aggregate(Aggregate { function, operand }))
    }

    // -- Cursor helpers -----------------------------------------------------

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |t| t.position)
    }

    fn at_logic(&self, operator: LogicOp) -> bool {
        self.peek().is_some_and(|t| t.is_logic(operator.as_str()))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<&'t Token> {
        match self.peek() {
            Some(token) if token.is(kind) => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(self.error(format!("expected {what}, found {token}"), token.position)),
            None => Err(self.unexpected_end(what)),
        }
    }

    fn comparison_op(&mut self, what: &str) -> ParseResult<CompOp> {
        let token = self.expect(TokenKind::ComparisonOp, what)?;
        CompOp::from_symbol(&token.text).ok_or_else(|| {
            self.error(
                format!("unknown comparison operator '{}'", token.text),
                token.position,
            )
        })
    }

    fn field_name(&self, token: &Token) -> ParseResult<Field> {
        Field::from_name(&token.text).ok_or_else(|| {
            self.error(format!("unknown field '{}'", token.text), token.position)
        })
    }

    fn nested(
        &mut self,
        opened_at: usize,
        production: fn(&mut Self) -> ParseResult<AstNode>,
    ) -> ParseResult<AstNode> {
        if self.depth >= self.max_depth {
            return Err(SyntaxError::new(format!(
                "expression nests deeper than {} levels",
                self.max_depth
            ))
            .at(opened_at));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn error(&self, message: impl Into<String>, position: usize) -> SyntaxError {
        SyntaxError::new(message)
            .at(position)
            .with_example(self.category.example())
    }

    fn unexpected_end(&self, expected: &str) -> SyntaxError {
        self.error(
            format!("unexpected end of expression, expected {expected}"),
            self.end,
        )
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    text.strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
}

fn describe(node: &AstNode) -> String {
    match node {
        AstNode::Literal(l) => format!("literal {l}"),
        AstNode::Field(f) => format!("field {}", f.name),
        AstNode::Wildcard {} => "'*'".to_owned(),
        AstNode::Aggregate(a) => format!("aggregate {a}"),
        AstNode::Comparison(_) => format!("comparison {node}"),
        AstNode::Logical(l) => format!("{} expression", l.operator()),
    }
}
