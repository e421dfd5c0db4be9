//! The frozen set of schemas, parsers and settings used at request time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::decant::{DecantError, Decanter};
use crate::parser::{ParserRegistry, TypeTag, ValueParser};
use crate::schema::{load_schemas, Schema, SchemaError};
use crate::settings::Settings;
use crate::value::Map;

/// Immutable collection of schemas ready for decanting.
///
/// Building a catalog checks that every association names a known schema
/// and that every input type has a parser, so decanting never resolves
/// either lazily. A catalog is `Send + Sync` and can be shared freely.
///
/// ## Example
///
/// ```
/// use decanter::schema::{AssociationOptions, Schema};
/// use decanter::{Catalog, Map, TypeTag, Value};
///
/// let catalog = Catalog::builder()
///     .with_schema(
///         Schema::builder("trip")
///             .input("start_date", TypeTag::Date, Map::new())
///             .has_one("address", AssociationOptions::new())
///             .build(),
///     )
///     .with_schema(Schema::builder("address").build())
///     .build()?;
///
/// let raw = Value::from(serde_json::json!({
///     "start_date": "01/15/2015",
///     "address_attributes": {"city": "Lisbon"},
/// }));
/// let decanted = catalog.decant("trip", raw.as_map().unwrap(), None)?;
///
/// assert!(matches!(decanted["start_date"], Value::Date(_)));
/// # Ok::<(), decanter::Error>(())
/// ```
#[derive(Debug)]
pub struct Catalog {
    schemas: HashMap<String, Schema>,
    parsers: HashMap<TypeTag, Arc<dyn ValueParser>>,
    settings: Settings,
}

impl Catalog {
    /// Creates a new catalog builder.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns a decanter bound to the schema called `name`.
    pub fn decanter(&self, name: &str) -> Option<Decanter<'_>> {
        self.schema(name).map(|schema| Decanter::new(self, schema))
    }

    /// Decants `raw` with the schema called `name`.
    pub fn decant(
        &self,
        name: &str,
        raw: &Map,
        context: Option<&str>,
    ) -> Result<Map, DecantError> {
        self.decanter(name)
            .ok_or_else(|| DecantError::UnknownSchema(name.to_string()))?
            .decant(raw, context)
    }

    pub(crate) fn parser(&self, tag: &TypeTag) -> Option<&Arc<dyn ValueParser>> {
        self.parsers.get(tag)
    }
}

/// Builder for a [`Catalog`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct CatalogBuilder {
    schemas: Vec<Schema>,
    files: Vec<(PathBuf, bool)>,
    parsers: Option<ParserRegistry>,
    settings: Settings,
}

impl CatalogBuilder {
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn with_schemas(mut self, schemas: impl IntoIterator<Item = Schema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    /// Adds every schema defined in a TOML file, loaded at build time.
    ///
    /// If `required` is `true`, the build fails when the file doesn't exist.
    pub fn with_schema_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.files.push((path.as_ref().to_path_buf(), required));
        self
    }

    /// Replaces the parser registry. Defaults to [`ParserRegistry::builtin`].
    pub fn with_parsers(mut self, parsers: ParserRegistry) -> Self {
        self.parsers = Some(parsers);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Loads schema files and validates every declaration.
    pub fn build(self) -> Result<Catalog, SchemaError> {
        let mut declared = self.schemas;
        for (path, required) in &self.files {
            declared.extend(load_schemas(path, *required)?);
        }

        let mut schemas = HashMap::with_capacity(declared.len());
        for schema in declared {
            let name = schema.name().to_string();
            if schemas.contains_key(&name) {
                return Err(SchemaError::DuplicateSchema(name));
            }
            schemas.insert(name, schema);
        }

        let registry = self.parsers.unwrap_or_else(ParserRegistry::builtin);
        let mut parsers = HashMap::new();

        for schema in schemas.values() {
            for input in schema.registry().all_inputs() {
                let Some(tag) = &input.type_tag else {
                    continue;
                };
                if parsers.contains_key(tag) {
                    continue;
                }
                let parser =
                    registry
                        .parser_for(tag)
                        .map_err(|_| SchemaError::UnregisteredType {
                            schema: schema.name().to_string(),
                            field: input.name.clone(),
                            tag: tag.clone(),
                        })?;
                parsers.insert(tag.clone(), parser);
            }

            for assoc in schema.registry().all_associations() {
                if !schemas.contains_key(&assoc.schema) {
                    return Err(SchemaError::UnknownSchema {
                        schema: schema.name().to_string(),
                        association: assoc.name.clone(),
                        target: assoc.schema.clone(),
                    });
                }
            }
        }

        debug!(
            schemas = schemas.len(),
            parsers = parsers.len(),
            "catalog built"
        );
        Ok(Catalog {
            schemas,
            parsers,
            settings: self.settings,
        })
    }
}
