//! The dispatch engine that turns one raw mapping into one decanted mapping.
//!
//! Each raw key is resolved against the schema in this order:
//!
//! 1. a declared input: the value is coerced by its parser;
//! 2. a `has_one` key: the value must be a map and is decanted recursively;
//! 3. a `has_many` key: the value must be an array of maps, each decanted;
//! 4. anything else: passed through when no context was given, otherwise
//!    dropped or rejected according to [`UnhandledKeys`].
//!
//! Output keys keep the order of the raw input. The first failure aborts
//! the whole call.

mod error;

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::parser::ParserError;
use crate::schema::{AssociationKind, AssociationSpec, InputSpec, Schema};
use crate::settings::UnhandledKeys;
use crate::value::{Map, Value};

pub use error::DecantError;

/// Decants raw mappings with one schema of a [`Catalog`].
#[derive(Debug, Clone, Copy)]
pub struct Decanter<'a> {
    catalog: &'a Catalog,
    schema: &'a Schema,
}

impl<'a> Decanter<'a> {
    pub(crate) fn new(catalog: &'a Catalog, schema: &'a Schema) -> Self {
        Self { catalog, schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Decants `raw` with the rules declared for `context`.
    ///
    /// `None` selects the default context and passes unmatched keys through.
    pub fn decant(&self, raw: &Map, context: Option<&str>) -> Result<Map, DecantError> {
        debug!(
            schema = self.schema.name(),
            context = context.unwrap_or("<none>"),
            keys = raw.len(),
            "decanting"
        );
        let walk = Walk {
            catalog: self.catalog,
            context,
        };
        walk.decant(self.schema, raw, 0)
    }

    /// Decants a JSON object.
    pub fn decant_json(
        &self,
        raw: serde_json::Value,
        context: Option<&str>,
    ) -> Result<Map, DecantError> {
        match Value::from(raw) {
            Value::Map(map) => self.decant(&map, context),
            other => Err(DecantError::ExpectedMap {
                key: self.schema.name().to_string(),
                found: other.kind(),
            }),
        }
    }
}

/// One traversal; the context is fixed for every nesting level.
struct Walk<'a> {
    catalog: &'a Catalog,
    context: Option<&'a str>,
}

impl Walk<'_> {
    fn decant(&self, schema: &Schema, raw: &Map, depth: usize) -> Result<Map, DecantError> {
        let settings = self.catalog.settings();
        if depth > settings.max_depth {
            return Err(DecantError::DepthExceeded {
                limit: settings.max_depth,
            });
        }

        let registry = schema.registry();
        if let Some(missing) = registry
            .inputs(self.context)
            .find(|spec| spec.is_required() && raw.get(&spec.name).map_or(true, Value::is_blank))
        {
            return Err(DecantError::MissingRequiredInput {
                field: missing.name.clone(),
            });
        }

        let mut out = Map::with_capacity(raw.len());
        let mut unhandled = Vec::new();

        for (key, value) in raw {
            if let Some(spec) = registry.lookup_input(self.context, key) {
                out.insert(key.as_str(), self.parse(spec, value)?);
            } else if let Some(assoc) =
                registry.lookup_association(self.context, key, AssociationKind::HasOne)
            {
                let nested = as_map(key, value)?;
                let decanted = self.decant(self.target(assoc)?, nested, depth + 1)?;
                out.insert(assoc.key.as_str(), decanted);
            } else if let Some(assoc) =
                registry.lookup_association(self.context, key, AssociationKind::HasMany)
            {
                let items = value.as_array().ok_or_else(|| DecantError::ExpectedArray {
                    key: key.clone(),
                    found: value.kind(),
                })?;
                let target = self.target(assoc)?;
                let decanted = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let nested = as_map(&format!("{key}[{index}]"), item)?;
                        self.decant(target, nested, depth + 1).map(Value::Map)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                out.insert(assoc.key.as_str(), decanted);
            } else if self.context.is_none() {
                trace!(key = %key, "passing through unmatched key");
                out.insert(key.as_str(), value.clone());
            } else {
                match settings.unhandled_keys {
                    UnhandledKeys::Drop => trace!(key = %key, "dropping unmatched key"),
                    UnhandledKeys::Reject => unhandled.push(key.clone()),
                }
            }
        }

        if !unhandled.is_empty() {
            return Err(DecantError::UnhandledKeys { keys: unhandled });
        }
        Ok(out)
    }

    fn parse(&self, spec: &InputSpec, value: &Value) -> Result<Value, DecantError> {
        let Some(tag) = &spec.type_tag else {
            return Ok(value.clone());
        };
        let parser = self
            .catalog
            .parser(tag)
            .ok_or_else(|| ParserError::UnregisteredType(tag.clone()))?;
        parser
            .parse(&spec.name, value, &spec.options)
            .map_err(|e| DecantError::Parser(e.into()))
    }

    fn target(&self, assoc: &AssociationSpec) -> Result<&Schema, DecantError> {
        self.catalog
            .schema(&assoc.schema)
            .ok_or_else(|| DecantError::UnknownSchema(assoc.schema.clone()))
    }
}

fn as_map<'v>(key: &str, value: &'v Value) -> Result<&'v Map, DecantError> {
    value.as_map().ok_or_else(|| DecantError::ExpectedMap {
        key: key.to_string(),
        found: value.kind(),
    })
}
