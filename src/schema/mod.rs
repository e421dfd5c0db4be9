//! Schema declarations: inputs, associations and the contexts they live in.

mod builder;
mod error;
mod file;
mod registry;
mod spec;

pub use builder::{ContextScope, Schema, SchemaBuilder};
pub use error::SchemaError;
pub use file::load_schemas;
pub use registry::Registry;
pub use spec::{AssociationKind, AssociationOptions, AssociationSpec, InputSpec, DEFAULT_CONTEXT};
