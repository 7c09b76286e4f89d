use thiserror::Error;

use crate::CompileError;

/// Unified error type covering compilation and the JSON document.
///
/// Returned by convenience functions like
/// [`compile_document()`](crate::compile_document) that run more than one stage.
#[derive(Debug, Error)]
pub enum FraudruleError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Document(#[from] crate::document::DocumentError),
}
