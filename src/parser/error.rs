use thiserror::Error;

use super::TypeTag;

/// A parser rejected a raw value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value for '{field}': {message}")]
pub struct ParseError {
    pub field: String,
    pub message: String,
}

impl ParseError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParserError {
    #[error("no parser registered for type '{0}'")]
    UnregisteredType(TypeTag),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
