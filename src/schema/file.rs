//! Declarative schema definitions stored in TOML.
//!
//! ```toml
//! [[schema]]
//! name = "trip"
//!
//! [[schema.input]]
//! name = "start_date"
//! type = "date"
//! options = { parse_format = "%Y-%m-%d", required = true }
//!
//! [[schema.has_many]]
//! name = "destinations"
//! context = "admin"
//! ```
//!
//! Every entry goes through the same [`SchemaBuilder`] calls as schemas
//! declared in code.

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use super::{AssociationOptions, Schema, SchemaBuilder, SchemaError};
use crate::parser::TypeTag;
use crate::value::{Map, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    schema: Vec<SchemaDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDef {
    name: String,
    #[serde(default)]
    input: Vec<InputDef>,
    #[serde(default)]
    has_one: Vec<AssociationDef>,
    #[serde(default)]
    has_many: Vec<AssociationDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputDef {
    name: String,
    #[serde(rename = "type", default)]
    type_tag: Option<TypeTag>,
    context: Option<String>,
    #[serde(default)]
    options: toml::Table,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssociationDef {
    name: String,
    key: Option<String>,
    schema: Option<String>,
    context: Option<String>,
    #[serde(default)]
    options: toml::Table,
}

impl AssociationDef {
    fn options(&self) -> AssociationOptions {
        let mut options = AssociationOptions::new();
        if let Some(key) = &self.key {
            options = options.key(key);
        }
        if let Some(schema) = &self.schema {
            options = options.schema(schema);
        }
        for (key, value) in &self.options {
            options = options.option(key, Value::from(value.clone()));
        }
        options
    }
}

/// Loads every schema defined in a TOML file.
///
/// Returns an empty list if the file doesn't exist and `required` is false.
pub fn load_schemas(path: impl AsRef<Path>, required: bool) -> Result<Vec<Schema>, SchemaError> {
    let path = path.as_ref();
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound && !required => return Ok(Vec::new()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SchemaError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(SchemaError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let file: SchemaFile = toml::from_str(&contents).map_err(|e| SchemaError::InvalidFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    file.schema.into_iter().map(build_schema).collect()
}

fn build_schema(def: SchemaDef) -> Result<Schema, SchemaError> {
    let mut builder = Schema::builder(def.name);

    for input in def.input {
        let options: Map = input.options.into_iter().collect();
        builder = in_context(builder, input.context.as_deref(), |scope| {
            scope.input(input.name, input.type_tag, options)
        })?;
    }
    for assoc in def.has_one {
        let options = assoc.options();
        builder = in_context(builder, assoc.context.as_deref(), |scope| {
            scope.has_one(assoc.name, options)
        })?;
    }
    for assoc in def.has_many {
        let options = assoc.options();
        builder = in_context(builder, assoc.context.as_deref(), |scope| {
            scope.has_many(assoc.name, options)
        })?;
    }

    Ok(builder.build())
}

/// Applies one declaration in `context`, or in the default context when the
/// entry names none.
fn in_context<F>(
    builder: SchemaBuilder,
    context: Option<&str>,
    declare: F,
) -> Result<SchemaBuilder, SchemaError>
where
    F: FnOnce(super::ContextScope) -> super::ContextScope,
{
    builder.with_context(context.unwrap_or(super::DEFAULT_CONTEXT), declare)
}
