/// Tunables for a [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Keep the source casing of quoted string literals. When `false` the
    /// literal body is upper-cased along with the rest of the input.
    pub preserve_literal_case: bool,
    /// Maximum nesting of parentheses, NOT chains and logical groups.
    pub max_depth: usize,
    /// Maximum expression length in bytes.
    pub max_length: usize,
}

impl CompileOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_MAX_LENGTH: usize = 4096;
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            preserve_literal_case: true,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_length: Self::DEFAULT_MAX_LENGTH,
        }
    }
}
