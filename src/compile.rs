use tracing::debug;

use crate::parse::{self, Parser, SyntaxError};
use crate::types::{AstNode, CompileError, CompileOptions, RuleCategory};

/// Compiles rule expressions into [`AstNode`] trees.
///
/// A `Compiler` holds only its options, so one instance can be shared across
/// threads and reused for any number of calls.
///
/// ```
/// use fraudrule::{Compiler, RuleCategory};
///
/// let compiler = Compiler::new().max_depth(16);
/// let ast = compiler.compile("COUNT(*) >= 10", RuleCategory::Pattern).unwrap();
/// assert_eq!(ast.to_string(), "COUNT(*) >= 10");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Keep the source casing of quoted string literals (default `true`).
    #[must_use]
    pub fn preserve_literal_case(mut self, preserve: bool) -> Self {
        self.options.preserve_literal_case = preserve;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    #[must_use]
    pub fn max_length(mut self, bytes: usize) -> Self {
        self.options.max_length = bytes;
        self
    }

    #[must_use]
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `text` as a rule of the given category.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] raised by the pipeline. No partial
    /// tree is produced.
    pub fn compile(&self, text: &str, category: RuleCategory) -> Result<AstNode, CompileError> {
        let result = self.run(text, category);
        if let Err(err) = &result {
            debug!(%category, kind = ?err.kind(), error = %err, "rejected rule expression");
        }
        result
    }

    fn run(&self, text: &str, category: RuleCategory) -> Result<AstNode, CompileError> {
        if text.trim().is_empty() {
            return Err(CompileError::EmptyExpression);
        }
        if text.len() > self.options.max_length {
            return Err(SyntaxError::new(format!(
                "expression is {} bytes long; the limit is {}",
                text.len(),
                self.options.max_length
            ))
            .into());
        }

        let tokens = parse::tokenize_with(text, self.options.preserve_literal_case)?;
        debug!(%category, tokens = tokens.len(), len = text.len(), "tokenized rule expression");

        parse::validate(&tokens, category)?;

        let ast = Parser::new(&tokens, category, self.options.max_depth, text.len()).parse()?;
        debug!(
            %category,
            nodes = ast.node_count(),
            depth = ast.depth(),
            "compiled rule expression"
        );
        Ok(ast)
    }
}
