//! Top-level generation failures.
//!
//! Generation is all-or-nothing: any of these means no source text was
//! produced. Field-level problems are [`crate::ir::Warning`]s instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("top-level JSON must be an object or an array of objects, found {found}")]
    Shape { found: &'static str },

    #[error("top-level array is empty; there is no object to infer a model from")]
    EmptyArray,

    #[error("generation cancelled")]
    Cancelled,
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Human-readable JSON kind, for shape errors.
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
