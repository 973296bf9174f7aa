//! Property tests: formatting a parsed token gives back the token.

use attrdep_model::{Culture, FieldType, Value, format_values, parse_values};
use chrono::NaiveDate;
use proptest::prelude::*;

const VALUE_TYPES: [FieldType; 6] = [
    FieldType::ShortInteger,
    FieldType::LongInteger,
    FieldType::Float,
    FieldType::Double,
    FieldType::Text,
    FieldType::Date,
];

fn reparse(value: &Value, field_type: FieldType) -> Value {
    Value::parse(&value.format(), field_type, &Culture::INVARIANT).expect("formatted value parses")
}

#[test]
fn tokens_round_trip_for_every_type() {
    for field_type in VALUE_TYPES {
        for (token, expected) in [("NULL", Value::Null), ("null", Value::Null), ("*", Value::Wildcard)] {
            let value = Value::parse(token, field_type, &Culture::INVARIANT).unwrap();
            assert_eq!(value, expected, "{token} as {field_type}");
            assert_eq!(Value::parse(&value.format(), field_type, &Culture::INVARIANT).unwrap(), expected);
        }
    }
    assert_eq!(Value::Null.format(), "NULL");
    assert_eq!(Value::Wildcard.format(), "*");
}

proptest! {
    #[test]
    fn integers_round_trip(number in any::<i32>()) {
        let text = number.to_string();
        let value = Value::parse(&text, FieldType::LongInteger, &Culture::INVARIANT).unwrap();
        prop_assert_eq!(value.format(), text);
    }

    #[test]
    fn reals_round_trip(number in any::<f64>().prop_filter("finite", |n| n.is_finite())) {
        let value = Value::real(number);
        prop_assert_eq!(reparse(&value, FieldType::Double), value);
    }

    #[test]
    fn text_round_trips(text in any::<String>()) {
        let value = Value::text(text);
        prop_assert_eq!(reparse(&value, FieldType::Text), value);
    }

    #[test]
    fn dates_round_trip(
        days in 0i64..73_000,
        seconds in 0u32..86_400,
        millis in 0u32..1_000,
    ) {
        let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Duration::days(days);
        let datetime = date
            .and_hms_milli_opt(seconds / 3600, (seconds / 60) % 60, seconds % 60, millis)
            .unwrap();
        let value = Value::date(datetime);
        prop_assert_eq!(reparse(&value, FieldType::Date), value);
    }

    #[test]
    fn value_lists_round_trip(
        numbers in prop::collection::vec(any::<i64>(), 0..5),
        texts in prop::collection::vec(".*", 0..3),
    ) {
        let mut values: Vec<Value> = numbers.into_iter().map(Value::integer).collect();
        values.extend(texts.into_iter().map(Value::text));
        values.push(Value::Null);
        values.push(Value::Wildcard);
        prop_assert_eq!(parse_values(&format_values(&values)).unwrap(), values);
    }
}
