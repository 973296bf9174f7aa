//! Three-valued rule values.
//!
//! A cell of a mapping rule is either a concrete typed payload, `NULL`, or
//! the wildcard `*` which stands for "any value of the field". The wildcard
//! is a proper variant, never a NULL in disguise.
//!
//! Textual tokens:
//!
//! | Text            | Value                         |
//! |-----------------|-------------------------------|
//! | `NULL` (any case) | [`Value::Null`]             |
//! | `*`             | [`Value::Wildcard`]           |
//! | anything else   | parsed per [`FieldType`]      |

mod compare;
mod convert;
mod culture;
mod list;

pub use compare::{tuples_equal, values_match};
pub use culture::Culture;
pub use list::{format_values, parse_values};

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};

/// Token for the NULL value.
pub const NULL_TOKEN: &str = "NULL";

/// Token for the wildcard value.
pub const WILDCARD_TOKEN: &str = "*";

/// Declared type of a dataset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    ShortInteger,
    LongInteger,
    Float,
    Double,
    Text,
    Date,
    Guid,
    ObjectId,
    GlobalId,
    Geometry,
    Blob,
    Raster,
    Xml,
}

impl FieldType {
    /// Returns the canonical type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::ShortInteger => "ShortInteger",
            FieldType::LongInteger => "LongInteger",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::Text => "Text",
            FieldType::Date => "Date",
            FieldType::Guid => "Guid",
            FieldType::ObjectId => "ObjectId",
            FieldType::GlobalId => "GlobalId",
            FieldType::Geometry => "Geometry",
            FieldType::Blob => "Blob",
            FieldType::Raster => "Raster",
            FieldType::Xml => "Xml",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, FieldType::ShortInteger | FieldType::LongInteger)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::ShortInteger | FieldType::LongInteger | FieldType::Float | FieldType::Double
        )
    }

    /// Returns true if rule values can be expressed for this type.
    pub fn supports_values(&self) -> bool {
        self.is_numeric() || matches!(self, FieldType::Text | FieldType::Date)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    /// Parse a field type name (case-insensitive, common aliases accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', ' '], "");
        match normalized.as_str() {
            "SHORTINTEGER" | "SMALLINTEGER" | "SHORT" | "INT16" => Ok(FieldType::ShortInteger),
            "LONGINTEGER" | "INTEGER" | "LONG" | "INT32" => Ok(FieldType::LongInteger),
            "FLOAT" | "SINGLE" => Ok(FieldType::Float),
            "DOUBLE" | "REAL" => Ok(FieldType::Double),
            "TEXT" | "STRING" => Ok(FieldType::Text),
            "DATE" | "DATETIME" => Ok(FieldType::Date),
            "GUID" => Ok(FieldType::Guid),
            "OBJECTID" | "OID" => Ok(FieldType::ObjectId),
            "GLOBALID" => Ok(FieldType::GlobalId),
            "GEOMETRY" | "SHAPE" => Ok(FieldType::Geometry),
            "BLOB" => Ok(FieldType::Blob),
            "RASTER" => Ok(FieldType::Raster),
            "XML" => Ok(FieldType::Xml),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}

/// Typed payload of a concrete value.
///
/// Deserializes from plain JSON scalars: integers, floats, booleans, and
/// strings (ISO 8601 date-times become dates, everything else text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConcreteValue {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Date(NaiveDateTime),
    Text(String),
}

impl ConcreteValue {
    /// Name of the payload type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConcreteValue::Integer(_) => "integer",
            ConcreteValue::Real(_) => "real",
            ConcreteValue::Boolean(_) => "boolean",
            ConcreteValue::Date(_) => "date",
            ConcreteValue::Text(_) => "text",
        }
    }

    /// Integral view of the payload: integers, and reals without a fraction.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConcreteValue::Integer(value) => Some(*value),
            ConcreteValue::Real(value)
                if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 =>
            {
                Some(*value as i64)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConcreteValue::Integer(value) => Some(*value as f64),
            ConcreteValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConcreteValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ConcreteValue {
    /// Culture-invariant textual form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcreteValue::Integer(value) => write!(f, "{value}"),
            ConcreteValue::Real(value) => write!(f, "{value}"),
            ConcreteValue::Boolean(value) => write!(f, "{value}"),
            ConcreteValue::Date(value) => {
                if value.time().num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
                    write!(f, "{}", value.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S%.f"))
                }
            }
            ConcreteValue::Text(text) => {
                if needs_quotes(text) {
                    write!(f, "\"{text}\"")
                } else {
                    write!(f, "{text}")
                }
            }
        }
    }
}

/// Text that would not survive a parse unquoted: empty or padded text,
/// tokens, and text that is itself wrapped in quotes.
fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.trim() != text
        || text.eq_ignore_ascii_case(NULL_TOKEN)
        || text == WILDCARD_TOKEN
        || (text.len() > 1 && text.starts_with('"') && text.ends_with('"'))
}

/// A rule value: concrete, NULL, or wildcard.
///
/// The derived `PartialEq` is structural (`Integer(1) != Real(1.0)`);
/// use [`Value::value_eq`] for the semantic comparison used by duplicate
/// detection.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Concrete(ConcreteValue),
    Null,
    Wildcard,
}

impl Value {
    pub fn integer(value: i64) -> Self {
        Value::Concrete(ConcreteValue::Integer(value))
    }

    pub fn real(value: f64) -> Self {
        Value::Concrete(ConcreteValue::Real(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::Concrete(ConcreteValue::Text(value.into()))
    }

    pub fn date(value: NaiveDateTime) -> Self {
        Value::Concrete(ConcreteValue::Date(value))
    }

    pub fn boolean(value: bool) -> Self {
        Value::Concrete(ConcreteValue::Boolean(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Value::Wildcard)
    }

    pub fn as_concrete(&self) -> Option<&ConcreteValue> {
        match self {
            Value::Concrete(value) => Some(value),
            _ => None,
        }
    }

    /// Parse a textual token into a value of the given field type.
    ///
    /// `NULL` (any case) and `*` are recognized before type conversion.
    /// Numbers and dates follow `culture`.
    pub fn parse(
        text: &str,
        field_type: FieldType,
        culture: &Culture,
    ) -> Result<Self, crate::ValueError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case(NULL_TOKEN) {
            return Ok(Value::Null);
        }
        if trimmed == WILDCARD_TOKEN {
            return Ok(Value::Wildcard);
        }
        convert::parse_concrete(trimmed, field_type, culture).map(Value::Concrete)
    }

    /// Inverse of [`Value::parse`]: `NULL`, `*`, or the invariant form.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Concrete(value) => write!(f, "{value}"),
            Value::Null => f.write_str(NULL_TOKEN),
            Value::Wildcard => f.write_str(WILDCARD_TOKEN),
        }
    }
}

impl From<ConcreteValue> for Value {
    fn from(value: ConcreteValue) -> Self {
        Value::Concrete(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Concrete(value) => value.serialize(serializer),
            _ => serializer.serialize_str(&self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn field_type_from_str_accepts_aliases() {
        assert_eq!("SmallInteger".parse::<FieldType>(), Ok(FieldType::ShortInteger));
        assert_eq!("integer".parse::<FieldType>(), Ok(FieldType::LongInteger));
        assert_eq!("string".parse::<FieldType>(), Ok(FieldType::Text));
        assert!("polygon".parse::<FieldType>().is_err());
    }

    #[test]
    fn text_that_looks_like_a_token_is_quoted() {
        assert_eq!(Value::text("null").to_string(), "\"null\"");
        assert_eq!(Value::text("*").to_string(), "\"*\"");
        assert_eq!(Value::text(" padded").to_string(), "\" padded\"");
        assert_eq!(Value::text("plain").to_string(), "plain");
    }

    #[test]
    fn empty_text_is_quoted_and_not_read_as_null() {
        let formatted = Value::text("").to_string();
        assert_eq!(formatted, "\"\"");
        assert_eq!(
            Value::parse(&formatted, FieldType::Text, &Culture::INVARIANT),
            Ok(Value::text(""))
        );
    }

    #[test]
    fn dates_drop_midnight_time() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            Value::date(day.and_hms_opt(0, 0, 0).unwrap()).to_string(),
            "2024-03-01"
        );
        assert_eq!(
            Value::date(day.and_hms_opt(13, 5, 9).unwrap()).to_string(),
            "2024-03-01T13:05:09"
        );
    }

    #[test]
    fn integral_reals_convert_to_i64() {
        assert_eq!(ConcreteValue::Real(2.0).as_i64(), Some(2));
        assert_eq!(ConcreteValue::Real(2.5).as_i64(), None);
        assert_eq!(ConcreteValue::Text("2".into()).as_i64(), None);
    }
}
