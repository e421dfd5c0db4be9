//! Parsers for booleans, numbers and strings.

use super::{ParseError, TypeTag, ValueParser};
use crate::value::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanParser;

impl ValueParser for BooleanParser {
    fn tags(&self) -> &[TypeTag] {
        const TAGS: &[TypeTag] = &[TypeTag::Boolean];
        TAGS
    }

    fn parse(&self, name: &str, value: &Value, _options: &Map) -> Result<Value, ParseError> {
        if value.is_blank() {
            return Ok(Value::Null);
        }

        match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::Integer(1) => Ok(Value::Bool(true)),
            Value::Integer(0) => Ok(Value::Bool(false)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "f" | "no" | "n" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(ParseError::new(name, format!("'{s}' is not a boolean"))),
            },
            other => Err(ParseError::new(name, format!("'{other}' is not a boolean"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerParser;

impl ValueParser for IntegerParser {
    fn tags(&self) -> &[TypeTag] {
        const TAGS: &[TypeTag] = &[TypeTag::Integer];
        TAGS
    }

    fn parse(&self, name: &str, value: &Value, _options: &Map) -> Result<Value, ParseError> {
        if value.is_blank() {
            return Ok(Value::Null);
        }

        match value {
            Value::Integer(_) => Ok(value.clone()),
            Value::Float(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                Ok(Value::Integer(*x as i64))
            }
            Value::String(s) => strip_separators(s)
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| ParseError::new(name, format!("'{s}' is not an integer"))),
            other => Err(ParseError::new(name, format!("'{other}' is not an integer"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatParser;

impl ValueParser for FloatParser {
    fn tags(&self) -> &[TypeTag] {
        const TAGS: &[TypeTag] = &[TypeTag::Float];
        TAGS
    }

    fn parse(&self, name: &str, value: &Value, _options: &Map) -> Result<Value, ParseError> {
        if value.is_blank() {
            return Ok(Value::Null);
        }

        match value {
            Value::Float(_) => Ok(value.clone()),
            Value::Integer(i) => Ok(Value::Float(*i as f64)),
            Value::String(s) => strip_separators(s)
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Value::Float)
                .ok_or_else(|| ParseError::new(name, format!("'{s}' is not a number"))),
            other => Err(ParseError::new(name, format!("'{other}' is not a number"))),
        }
    }
}

/// Renders scalars as text. Option `strip = true` trims surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl ValueParser for StringParser {
    fn tags(&self) -> &[TypeTag] {
        const TAGS: &[TypeTag] = &[TypeTag::String];
        TAGS
    }

    fn parse(&self, name: &str, value: &Value, options: &Map) -> Result<Value, ParseError> {
        if value.is_blank() {
            return Ok(Value::Null);
        }
        let strip = options.get("strip").and_then(Value::as_bool).unwrap_or(false);

        match value {
            Value::Array(_) | Value::Map(_) => Err(ParseError::new(
                name,
                format!("expected a scalar, got {}", value.kind()),
            )),
            Value::String(s) if strip => Ok(Value::String(s.trim().to_string())),
            Value::String(_) => Ok(value.clone()),
            other => Ok(Value::String(other.to_string())),
        }
    }
}

/// Trims and drops thousands separators such as `1,000` or `1_000`.
fn strip_separators(s: &str) -> String {
    s.trim().chars().filter(|c| !matches!(c, ',' | '_')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(parser: &dyn ValueParser, value: impl Into<Value>) -> Result<Value, ParseError> {
        parser.parse("field", &value.into(), &Map::new())
    }

    #[test]
    fn test_boolean_words() {
        assert_eq!(parse(&BooleanParser, "Yes").unwrap(), Value::Bool(true));
        assert_eq!(parse(&BooleanParser, " off ").unwrap(), Value::Bool(false));
        assert_eq!(parse(&BooleanParser, 1).unwrap(), Value::Bool(true));
        assert_eq!(parse(&BooleanParser, false).unwrap(), Value::Bool(false));
        assert!(parse(&BooleanParser, "maybe").is_err());
        assert!(parse(&BooleanParser, 2).is_err());
    }

    #[test]
    fn test_integer_parsing() {
        assert_eq!(parse(&IntegerParser, "1,000").unwrap(), Value::Integer(1000));
        assert_eq!(parse(&IntegerParser, " -42 ").unwrap(), Value::Integer(-42));
        assert_eq!(parse(&IntegerParser, 3.0).unwrap(), Value::Integer(3));
        assert!(parse(&IntegerParser, 3.5).is_err());
        assert!(parse(&IntegerParser, "12abc").is_err());
        assert!(parse(&IntegerParser, true).is_err());
    }

    #[test]
    fn test_float_parsing() {
        assert_eq!(parse(&FloatParser, "1_234.5").unwrap(), Value::Float(1234.5));
        assert_eq!(parse(&FloatParser, 2).unwrap(), Value::Float(2.0));
        assert!(parse(&FloatParser, "NaN").is_err());
        assert!(parse(&FloatParser, "one").is_err());
    }

    #[test]
    fn test_string_rendering() {
        assert_eq!(parse(&StringParser, 42).unwrap(), Value::from("42"));
        assert_eq!(parse(&StringParser, "  padded ").unwrap(), Value::from("  padded "));
        assert!(parse(&StringParser, Value::Array(vec![])).is_err());

        let strip: Map = [("strip", true)].into_iter().collect();
        let stripped = StringParser
            .parse("field", &Value::from("  padded "), &strip)
            .unwrap();
        assert_eq!(stripped, Value::from("padded"));
    }

    #[test]
    fn test_blank_is_null_for_every_scalar() {
        let parsers: [&dyn ValueParser; 4] =
            [&BooleanParser, &IntegerParser, &FloatParser, &StringParser];
        for parser in parsers {
            assert_eq!(parse(parser, "").unwrap(), Value::Null);
            assert_eq!(parse(parser, Value::Null).unwrap(), Value::Null);
        }
    }
}
