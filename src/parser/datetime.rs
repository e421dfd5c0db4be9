//! Date and date-time parsers.
//!
//! Both match text strictly against a `chrono` format string taken from the
//! `parse_format` option: the whole input must be consumed by the format.
//! Text is not trimmed first, so surrounding whitespace the format does not
//! allow is an error.

use chrono::{NaiveDate, NaiveDateTime};

use super::{str_option, ParseError, TypeTag, ValueParser};
use crate::value::{Map, Value};

/// Format used by [`DateTimeParser`] when no `parse_format` is given.
pub const DEFAULT_DATETIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Format used by [`DateParser`] when no `parse_format` is given.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

const PARSE_FORMAT: &str = "parse_format";

/// Parses text into a [`Value::DateTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeParser;

impl ValueParser for DateTimeParser {
    fn tags(&self) -> &[TypeTag] {
        const TAGS: &[TypeTag] = &[TypeTag::DateTime];
        TAGS
    }

    fn parse(&self, name: &str, value: &Value, options: &Map) -> Result<Value, ParseError> {
        if value.is_blank() {
            return Ok(Value::Null);
        }
        let format = str_option(name, options, PARSE_FORMAT)?.unwrap_or(DEFAULT_DATETIME_FORMAT);

        match value {
            Value::DateTime(_) => Ok(value.clone()),
            Value::String(text) => NaiveDateTime::parse_from_str(text, format)
                .map(Value::DateTime)
                .map_err(|e| {
                    ParseError::new(name, format!("'{text}' does not match '{format}': {e}"))
                }),
            other => Err(ParseError::new(
                name,
                format!("expected a datetime string, got {}", other.kind()),
            )),
        }
    }
}

/// Parses text into a [`Value::Date`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParser;

impl ValueParser for DateParser {
    fn tags(&self) -> &[TypeTag] {
        const TAGS: &[TypeTag] = &[TypeTag::Date];
        TAGS
    }

    fn parse(&self, name: &str, value: &Value, options: &Map) -> Result<Value, ParseError> {
        if value.is_blank() {
            return Ok(Value::Null);
        }
        let format = str_option(name, options, PARSE_FORMAT)?.unwrap_or(DEFAULT_DATE_FORMAT);

        match value {
            Value::Date(_) => Ok(value.clone()),
            Value::DateTime(dt) => Ok(Value::Date(dt.date())),
            Value::String(text) => NaiveDate::parse_from_str(text, format)
                .map(Value::Date)
                .map_err(|e| {
                    ParseError::new(name, format!("'{text}' does not match '{format}': {e}"))
                }),
            other => Err(ParseError::new(
                name,
                format!("expected a date string, got {}", other.kind()),
            )),
        }
    }
}
