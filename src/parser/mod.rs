//! Value parsers and the registry that maps type tags to them.
//!
//! A parser coerces one raw scalar into a typed [`Value`]. The registry is
//! assembled once through [`ParserRegistry::builder`] and is read-only
//! afterwards. When several parsers accept the same tag, the one registered
//! first wins, so custom parsers registered before
//! [`with_builtins`](ParserRegistryBuilder::with_builtins) override the
//! built-in ones.
//!
//! ## Example
//!
//! ```
//! use decanter::parser::{ParseError, ParserRegistry, TypeTag};
//! use decanter::{Map, Value};
//!
//! let parsers = ParserRegistry::builder()
//!     .register("upcase", |name: &str, value: &Value, _: &Map| match value {
//!         Value::String(s) => Ok(Value::String(s.to_uppercase())),
//!         other => Err(ParseError::new(name, format!("cannot upcase a {}", other.kind()))),
//!     })
//!     .with_builtins()
//!     .build();
//!
//! let tag = TypeTag::from("upcase");
//! let value = parsers.parse(Some(&tag), "code", &Value::from("ab"), &Map::new())?;
//! assert_eq!(value, Value::from("AB"));
//! # Ok::<(), decanter::parser::ParserError>(())
//! ```

mod datetime;
mod error;
mod scalar;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::value::{Map, Value};

pub use datetime::{DateParser, DateTimeParser, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT};
pub use error::{ParseError, ParserError};
pub use scalar::{BooleanParser, FloatParser, IntegerParser, StringParser};

/// Identifies which parser coerces an input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum TypeTag {
    Boolean,
    Date,
    DateTime,
    Float,
    Integer,
    String,
    /// Consumer-defined tag served by a registered plugin.
    Custom(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::DateTime => "datetime",
            TypeTag::Float => "float",
            TypeTag::Integer => "integer",
            TypeTag::String => "string",
            TypeTag::Custom(name) => name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "boolean" => TypeTag::Boolean,
            "date" => TypeTag::Date,
            "datetime" => TypeTag::DateTime,
            "float" => TypeTag::Float,
            "integer" => TypeTag::Integer,
            "string" => TypeTag::String,
            other => TypeTag::Custom(other.to_string()),
        })
    }
}

impl From<&str> for TypeTag {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<String> for TypeTag {
    fn from(s: String) -> Self {
        TypeTag::from(s.as_str())
    }
}

/// A coercion rule for one or more type tags.
pub trait ValueParser: Send + Sync + fmt::Debug {
    /// Tags this parser accepts.
    fn tags(&self) -> &[TypeTag];

    /// Coerces `value`, the raw input for field `name`.
    fn parse(&self, name: &str, value: &Value, options: &Map) -> Result<Value, ParseError>;
}

/// Adapts a plain function into a [`ValueParser`].
struct FnParser<F> {
    tags: Vec<TypeTag>,
    parse: F,
}

impl<F> fmt::Debug for FnParser<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnParser").field("tags", &self.tags).finish()
    }
}

impl<F> ValueParser for FnParser<F>
where
    F: Fn(&str, &Value, &Map) -> Result<Value, ParseError> + Send + Sync,
{
    fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    fn parse(&self, name: &str, value: &Value, options: &Map) -> Result<Value, ParseError> {
        (self.parse)(name, value, options)
    }
}

/// Immutable lookup table from type tag to parser.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn ValueParser>>,
}

impl ParserRegistry {
    /// Creates a new registry builder.
    pub fn builder() -> ParserRegistryBuilder {
        ParserRegistryBuilder::default()
    }

    /// A registry holding only the built-in parsers.
    pub fn builtin() -> Self {
        Self::builder().with_builtins().build()
    }

    /// Returns the first registered parser accepting `tag`.
    pub fn parser_for(&self, tag: &TypeTag) -> Result<Arc<dyn ValueParser>, ParserError> {
        self.parsers
            .iter()
            .find(|parser| parser.tags().contains(tag))
            .cloned()
            .ok_or_else(|| ParserError::UnregisteredType(tag.clone()))
    }

    /// Coerces `value` with the parser for `tag`.
    ///
    /// A `None` tag returns the value unchanged.
    pub fn parse(
        &self,
        tag: Option<&TypeTag>,
        name: &str,
        value: &Value,
        options: &Map,
    ) -> Result<Value, ParserError> {
        match tag {
            None => Ok(value.clone()),
            Some(tag) => Ok(self.parser_for(tag)?.parse(name, value, options)?),
        }
    }
}

/// Builder for a [`ParserRegistry`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ParserRegistryBuilder {
    parsers: Vec<Arc<dyn ValueParser>>,
}

impl ParserRegistryBuilder {
    /// Adds a parser implementation.
    pub fn with_parser(mut self, parser: impl ValueParser + 'static) -> Self {
        self.parsers.push(Arc::new(parser));
        self
    }

    /// Registers a function as the parser for `tag`.
    pub fn register<F>(mut self, tag: impl Into<TypeTag>, parse: F) -> Self
    where
        F: Fn(&str, &Value, &Map) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        self.parsers.push(Arc::new(FnParser {
            tags: vec![tag.into()],
            parse,
        }));
        self
    }

    /// Appends the built-in parsers.
    pub fn with_builtins(self) -> Self {
        self.with_parser(BooleanParser)
            .with_parser(DateParser)
            .with_parser(DateTimeParser)
            .with_parser(FloatParser)
            .with_parser(IntegerParser)
            .with_parser(StringParser)
    }

    pub fn build(self) -> ParserRegistry {
        ParserRegistry {
            parsers: self.parsers,
        }
    }
}

/// Reads a string option, failing if it is present with another type.
pub(crate) fn str_option<'a>(
    name: &str,
    options: &'a Map,
    key: &str,
) -> Result<Option<&'a str>, ParseError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ParseError::new(
            name,
            format!("option '{key}' must be a string, got {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for name in ["boolean", "date", "datetime", "float", "integer", "string"] {
            assert_eq!(TypeTag::from(name).as_str(), name);
        }
        assert_eq!(TypeTag::from("phone"), TypeTag::Custom("phone".into()));
    }

    #[test]
    fn test_parse_without_tag_is_identity() {
        let registry = ParserRegistry::default();
        let value = Value::from("untouched");

        let parsed = registry.parse(None, "field", &value, &Map::new()).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_unregistered_tag() {
        let registry = ParserRegistry::builtin();
        let result = registry.parser_for(&TypeTag::from("phone"));

        assert!(matches!(
            result,
            Err(ParserError::UnregisteredType(TypeTag::Custom(ref name))) if name == "phone"
        ));
    }

    #[test]
    fn test_first_registered_parser_wins() {
        let registry = ParserRegistry::builder()
            .register(TypeTag::Integer, |_: &str, _: &Value, _: &Map| Ok(Value::Integer(7)))
            .with_builtins()
            .build();

        let parsed = registry
            .parse(Some(&TypeTag::Integer), "n", &Value::from("12"), &Map::new())
            .unwrap();
        assert_eq!(parsed, Value::Integer(7));
    }

    #[test]
    fn test_registered_function_receives_options() {
        let registry = ParserRegistry::builder()
            .register("suffix", |name: &str, value: &Value, options: &Map| {
                let suffix = str_option(name, options, "with")?.unwrap_or("");
                Ok(Value::String(format!("{value}{suffix}")))
            })
            .build();
        let options: Map = [("with", "!")].into_iter().collect();

        let parsed = registry
            .parse(Some(&TypeTag::from("suffix")), "greeting", &Value::from("hi"), &options)
            .unwrap();
        assert_eq!(parsed, Value::from("hi!"));
    }

    #[test]
    fn test_parse_error_propagates_through_registry() {
        let registry = ParserRegistry::builtin();
        let result = registry.parse(
            Some(&TypeTag::Integer),
            "count",
            &Value::from("many"),
            &Map::new(),
        );

        assert!(matches!(result, Err(ParserError::Parse(ref e)) if e.field == "count"));
    }
}
