use crate::decant::DecantError;
use crate::parser::ParserError;
use crate::schema::SchemaError;
use crate::settings::SettingsError;
use thiserror::Error;

/// Top-level error type for the decanter library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("decant error: {0}")]
    Decant(#[from] DecantError),

    #[error("parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}
