//! Typed conversion of textual tokens and untyped list values.

use super::{ConcreteValue, Culture, FieldType, Value};
use crate::ValueError;

/// Parse trimmed, non-token text as a payload of `field_type`.
pub(super) fn parse_concrete(
    text: &str,
    field_type: FieldType,
    culture: &Culture,
) -> Result<ConcreteValue, ValueError> {
    match field_type {
        FieldType::ShortInteger | FieldType::LongInteger => parse_integer(text, field_type, culture),
        FieldType::Float | FieldType::Double => culture
            .parse_real(text)
            .map(ConcreteValue::Real)
            .ok_or_else(|| ValueError::format(text, field_type, "not a valid number")),
        FieldType::Text => Ok(ConcreteValue::Text(unquote(text).to_string())),
        FieldType::Date => culture
            .parse_date(text)
            .map(ConcreteValue::Date)
            .ok_or_else(|| ValueError::format(text, field_type, "not a valid date")),
        _ => Err(ValueError::UnsupportedFieldType { field_type }),
    }
}

fn parse_integer(
    text: &str,
    field_type: FieldType,
    culture: &Culture,
) -> Result<ConcreteValue, ValueError> {
    if text.eq_ignore_ascii_case("true") {
        return Ok(ConcreteValue::Integer(1));
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(ConcreteValue::Integer(0));
    }
    let value = culture
        .parse_integer(text)
        .ok_or_else(|| ValueError::format(text, field_type, "not a valid integer"))?;
    if i32::try_from(value).is_err() {
        return Err(ValueError::format(
            text,
            field_type,
            "outside the 32-bit integer range",
        ));
    }
    Ok(ConcreteValue::Integer(value))
}

/// Strip one pair of surrounding double quotes.
fn unquote(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

impl Value {
    /// Convert an untyped value (as read from a value list) to the payload
    /// type of `field_type`.
    ///
    /// NULL and the wildcard pass through. Values without a lossless
    /// conversion are returned unchanged, so that a schema check can report
    /// them as mistyped.
    pub fn convert_to(&self, field_type: FieldType) -> Value {
        let Value::Concrete(concrete) = self else {
            return self.clone();
        };
        convert_concrete(concrete, field_type)
            .map(Value::Concrete)
            .unwrap_or_else(|| self.clone())
    }
}

fn convert_concrete(value: &ConcreteValue, field_type: FieldType) -> Option<ConcreteValue> {
    match (field_type, value) {
        (FieldType::ShortInteger | FieldType::LongInteger, ConcreteValue::Integer(_)) => {
            Some(value.clone())
        }
        (FieldType::ShortInteger | FieldType::LongInteger, ConcreteValue::Boolean(flag)) => {
            Some(ConcreteValue::Integer(i64::from(*flag)))
        }
        (FieldType::ShortInteger | FieldType::LongInteger, ConcreteValue::Real(_)) => {
            value.as_i64().map(ConcreteValue::Integer)
        }
        (FieldType::Float | FieldType::Double, ConcreteValue::Integer(number)) => {
            Some(ConcreteValue::Real(*number as f64))
        }
        (FieldType::Float | FieldType::Double, ConcreteValue::Real(_)) => Some(value.clone()),
        (FieldType::Float | FieldType::Double, ConcreteValue::Boolean(flag)) => {
            Some(ConcreteValue::Real(if *flag { 1.0 } else { 0.0 }))
        }
        (FieldType::Text, ConcreteValue::Text(_)) => Some(value.clone()),
        (FieldType::Text, ConcreteValue::Integer(number)) => {
            Some(ConcreteValue::Text(number.to_string()))
        }
        (FieldType::Text, ConcreteValue::Real(number)) => {
            Some(ConcreteValue::Text(number.to_string()))
        }
        (FieldType::Text, ConcreteValue::Boolean(flag)) => {
            Some(ConcreteValue::Text(flag.to_string()))
        }
        (FieldType::Text, ConcreteValue::Date(_)) => Some(ConcreteValue::Text(value.to_string())),
        (FieldType::Date, ConcreteValue::Date(_)) => Some(value.clone()),
        (FieldType::Date, ConcreteValue::Text(text)) => Culture::INVARIANT
            .parse_date(text.trim())
            .map(ConcreteValue::Date),
        (_, ConcreteValue::Text(text)) if field_type.is_numeric() => {
            parse_concrete(text.trim(), field_type, &Culture::INVARIANT).ok()
        }
        _ => None,
    }
}
