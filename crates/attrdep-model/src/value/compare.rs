//! Ordering and equality of rule values.

use std::cmp::Ordering;

use super::{ConcreteValue, Value};
use crate::ValueError;

/// Reals are considered equal when they agree to this many significant digits.
const SIGNIFICANT_DIGITS: usize = 15;

impl ConcreteValue {
    /// Order two payloads of compatible type.
    ///
    /// Integers and reals compare numerically regardless of their payload
    /// type. Text compares ordinally, dates chronologically and booleans
    /// with `false < true`.
    pub fn compare(&self, other: &Self) -> Result<Ordering, ValueError> {
        use ConcreteValue::{Boolean, Date, Integer, Real, Text};

        match (self, other) {
            (Integer(a), Integer(b)) => Ok(a.cmp(b)),
            (Integer(_) | Real(_), Integer(_) | Real(_)) => {
                let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) else {
                    return Err(self.incomparable(other));
                };
                compare_reals(a, b).ok_or_else(|| self.incomparable(other))
            }
            (Text(a), Text(b)) => Ok(a.cmp(b)),
            (Date(a), Date(b)) => Ok(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Ok(a.cmp(b)),
            _ => Err(self.incomparable(other)),
        }
    }

    /// Semantic equality; incomparable payloads are unequal.
    pub fn value_eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }

    fn incomparable(&self, other: &Self) -> ValueError {
        ValueError::Incomparable {
            left: self.type_name(),
            right: other.type_name(),
        }
    }
}

fn compare_reals(a: f64, b: f64) -> Option<Ordering> {
    if a.is_nan() || b.is_nan() {
        return None;
    }
    let precision = SIGNIFICANT_DIGITS - 1;
    if format!("{a:.precision$e}") == format!("{b:.precision$e}") {
        return Some(Ordering::Equal);
    }
    a.partial_cmp(&b)
}

impl Value {
    /// Order two values. NULL equals NULL and sorts before any concrete
    /// value; the wildcard has no order.
    pub fn compare(&self, other: &Self) -> Result<Ordering, ValueError> {
        match (self, other) {
            (Value::Concrete(a), Value::Concrete(b)) => a.compare(b),
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Null, Value::Concrete(_)) => Ok(Ordering::Less),
            (Value::Concrete(_), Value::Null) => Ok(Ordering::Greater),
            (Value::Wildcard, _) | (_, Value::Wildcard) => Err(ValueError::Incomparable {
                left: self.kind_name(),
                right: other.kind_name(),
            }),
        }
    }

    /// Equality used for duplicate detection: the wildcard equals only the
    /// wildcard, NULL only NULL, and concrete values compare semantically.
    pub fn value_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Wildcard, Value::Wildcard) | (Value::Null, Value::Null) => true,
            (Value::Concrete(a), Value::Concrete(b)) => a.value_eq(b),
            _ => false,
        }
    }

    /// Matching with wildcard unification: a wildcard on either side
    /// matches anything.
    pub fn matches(&self, other: &Self) -> bool {
        self.is_wildcard() || other.is_wildcard() || self.value_eq(other)
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Value::Concrete(value) => value.type_name(),
            Value::Null => "null",
            Value::Wildcard => "wildcard",
        }
    }
}

/// Positional tuple match with wildcard unification.
pub fn values_match(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a.matches(b))
}

/// Positional tuple equality without unification.
pub fn tuples_equal(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a.value_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_across_payload_types() {
        assert!(Value::integer(1).value_eq(&Value::real(1.0)));
        assert_eq!(
            Value::integer(2).compare(&Value::real(2.5)),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn reals_equal_to_fifteen_digits() {
        assert!(Value::real(0.1 + 0.2).value_eq(&Value::real(0.3)));
        assert!(!Value::real(0.3).value_eq(&Value::real(0.300001)));
    }

    #[test]
    fn null_sorts_first_and_wildcard_is_unordered() {
        assert_eq!(Value::Null.compare(&Value::integer(0)), Ok(Ordering::Less));
        assert_eq!(Value::Null.compare(&Value::Null), Ok(Ordering::Equal));
        assert!(Value::Wildcard.compare(&Value::Wildcard).is_err());
        assert!(Value::text("a").compare(&Value::integer(1)).is_err());
    }

    #[test]
    fn wildcard_equals_only_wildcard() {
        assert!(Value::Wildcard.value_eq(&Value::Wildcard));
        assert!(!Value::Wildcard.value_eq(&Value::Null));
        assert!(!Value::Wildcard.value_eq(&Value::integer(1)));
    }

    #[test]
    fn tuple_match_unifies_wildcards() {
        let rule = [Value::Wildcard, Value::integer(2)];
        assert!(values_match(&rule, &[Value::text("x"), Value::real(2.0)]));
        assert!(!values_match(&rule, &[Value::text("x"), Value::integer(3)]));
        assert!(!values_match(&rule, &[Value::Wildcard]));
        assert!(!tuples_equal(&rule, &[Value::text("x"), Value::integer(2)]));
    }
}
