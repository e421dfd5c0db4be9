use crate::parser::TypeTag;
use crate::value::{Map, Value};

/// Context used when none is given, at declaration and at decant time.
pub const DEFAULT_CONTEXT: &str = "default";

/// A scalar field coerced by the parser for its type tag.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    pub name: String,
    /// `None` passes the raw value through untouched.
    pub type_tag: Option<TypeTag>,
    /// Forwarded verbatim to the parser.
    pub options: Map,
    pub context: String,
}

impl InputSpec {
    pub fn new(
        context: impl Into<String>,
        name: impl Into<String>,
        type_tag: Option<TypeTag>,
        options: Map,
    ) -> Self {
        Self {
            name: name.into(),
            type_tag,
            options,
            context: context.into(),
        }
    }

    /// Whether the `required` option is set to `true`.
    pub fn is_required(&self) -> bool {
        self.options
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    HasOne,
    HasMany,
}

/// A nested structure decanted with another schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationSpec {
    pub name: String,
    pub kind: AssociationKind,
    /// Field name expected in the raw input, `<name>_attributes` by default.
    pub key: String,
    /// Schema the nested values are decanted with, `name` by default.
    pub schema: String,
    pub options: Map,
    pub context: String,
}

impl AssociationSpec {
    pub fn new(
        context: impl Into<String>,
        name: impl Into<String>,
        kind: AssociationKind,
        options: AssociationOptions,
    ) -> Self {
        let name = name.into();
        Self {
            key: options.key.unwrap_or_else(|| format!("{name}_attributes")),
            schema: options.schema.unwrap_or_else(|| name.clone()),
            options: options.extra,
            name,
            kind,
            context: context.into(),
        }
    }
}

/// Optional settings for `has_one` / `has_many` declarations.
#[derive(Debug, Clone, Default)]
pub struct AssociationOptions {
    key: Option<String>,
    schema: Option<String>,
    extra: Map,
}

impl AssociationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the raw input key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Names the schema to recurse into.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key, value);
        self
    }
}
