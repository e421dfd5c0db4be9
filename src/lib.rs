pub mod catalog;
pub mod decant;
mod error;
pub mod parser;
pub mod schema;
pub mod settings;
pub mod value;

pub use catalog::{Catalog, CatalogBuilder};
pub use decant::{DecantError, Decanter};
pub use error::Error;
pub use parser::{ParserRegistry, TypeTag, ValueParser};
pub use schema::{Schema, SchemaError};
pub use settings::{Settings, SettingsError, UnhandledKeys};
pub use value::{Map, Value};
