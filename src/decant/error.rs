use thiserror::Error;

use crate::parser::ParserError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecantError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error("missing required input '{field}'")]
    MissingRequiredInput { field: String },

    #[error("unhandled keys: {}", .keys.join(", "))]
    UnhandledKeys { keys: Vec<String> },

    #[error("expected a map for '{key}', got {found}")]
    ExpectedMap { key: String, found: &'static str },

    #[error("expected an array for '{key}', got {found}")]
    ExpectedArray { key: String, found: &'static str },

    #[error("input is nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("unknown schema '{0}'")]
    UnknownSchema(String),
}
