use std::path::PathBuf;
use thiserror::Error;

use crate::parser::TypeTag;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("a context name is required to scope declarations")]
    MissingContext,

    #[error("context name '{0}' has leading or trailing whitespace")]
    InvalidContext(String),

    #[error("schema '{schema}' declares input '{field}' with unregistered type '{tag}'")]
    UnregisteredType {
        schema: String,
        field: String,
        tag: TypeTag,
    },

    #[error("association '{association}' of schema '{schema}' refers to unknown schema '{target}'")]
    UnknownSchema {
        schema: String,
        association: String,
        target: String,
    },

    #[error("schema '{0}' is declared more than once")]
    DuplicateSchema(String),

    #[error("required schema file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read schema file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid schema file '{path}': {source}")]
    InvalidFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}
