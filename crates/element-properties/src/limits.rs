//! Limits applied when decoding wire data and substituting placeholders.
//!
//! Decoders reject input beyond these bounds instead of building arbitrarily
//! deep or wide value trees.

/// Maximum nesting depth of array, map and struct values.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Maximum number of properties in a single container.
pub const MAX_PROPERTIES: usize = 100_000;

/// Maximum number of placeholder tokens substituted into one template.
pub const MAX_PLACEHOLDER_TOKENS: usize = 1_000;

/// Opening marker of a placeholder token.
pub const PLACEHOLDER_OPEN: &str = "{{";

/// Closing marker of a placeholder token.
pub const PLACEHOLDER_CLOSE: &str = "}}";
