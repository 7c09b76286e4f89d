use std::fmt;

/// A grammar violation found while parsing the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    message: String,
    position: Option<usize>,
    example: Option<&'static str>,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            example: None,
        }
    }

    pub(crate) fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub(crate) fn with_example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the offending token, if the error is tied to one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// A valid expression the operator can model theirs on.
    #[must_use]
    pub fn example(&self) -> Option<&'static str> {
        self.example
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error")?;
        if let Some(pos) = self.position {
            write!(f, " at position {pos}")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(example) = self.example {
            write!(f, " (example: {example})")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}
