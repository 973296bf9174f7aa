//! Per-mapping value checks: nullability, type and domain.

use std::cmp::Ordering;

use attrdep_model::{
    AttributeDependency, AttributeValueMapping, ConcreteValue, FieldDescriptor, FieldDomain,
    RangeDomain, Schema, Side, Value,
};

use super::super::finding::{Finding, MappingRef};
use super::fields::ResolvedFields;
use super::subtype::{self, SubtypeLocation};

/// Check every value of every mapping, in mapping-then-field order.
///
/// - NULL: only nullability is checked
/// - Wildcard: nothing is checked
/// - Concrete: type compatibility, then the effective domain
pub fn check<S: Schema + ?Sized>(
    dependency: &AttributeDependency,
    schema: &S,
    resolved: &ResolvedFields<'_>,
    subtype_location: Option<&SubtypeLocation>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (index, mapping) in dependency.mappings.iter().enumerate() {
        let mapping_ref = MappingRef::new(index, mapping);
        let subtype_code = subtype_location.and_then(|location| {
            subtype::code_of(schema, location, mapping, &mapping_ref, &mut findings)
        });

        for side in [Side::Source, Side::Target] {
            check_side(
                schema,
                resolved.side(side),
                side,
                mapping,
                &mapping_ref,
                subtype_code,
                &mut findings,
            );
        }
    }

    findings
}

fn check_side<S: Schema + ?Sized>(
    schema: &S,
    fields: &[Option<&FieldDescriptor>],
    side: Side,
    mapping: &AttributeValueMapping,
    mapping_ref: &MappingRef,
    subtype_code: Option<i64>,
    findings: &mut Vec<Finding>,
) {
    let values = mapping.values(side);
    if values.len() != fields.len() {
        findings.push(Finding::ArityMismatch {
            mapping: mapping_ref.clone(),
            side,
            expected: fields.len(),
            actual: values.len(),
        });
        return;
    }

    for (field, value) in fields.iter().zip(values) {
        let Some(field) = field else {
            continue;
        };
        match value {
            Value::Null => {
                if !field.nullable {
                    findings.push(Finding::NullNotAllowed {
                        field: field.name.clone(),
                        mapping: mapping_ref.clone(),
                    });
                }
            }
            Value::Wildcard => {}
            Value::Concrete(concrete) => {
                if !field.can_accept(value) {
                    findings.push(Finding::TypeMismatch {
                        field: field.name.clone(),
                        field_type: field.field_type,
                        value: value.clone(),
                        mapping: mapping_ref.clone(),
                    });
                    continue;
                }
                let domain = schema.domain(&field.name, subtype_code);
                if let Some(finding) = check_domain(field, value, concrete, &domain, mapping_ref) {
                    findings.push(finding);
                }
            }
        }
    }
}

fn check_domain(
    field: &FieldDescriptor,
    value: &Value,
    concrete: &ConcreteValue,
    domain: &FieldDomain,
    mapping_ref: &MappingRef,
) -> Option<Finding> {
    match domain {
        FieldDomain::CodedValue(coded) => (!coded.contains(concrete)).then(|| {
            Finding::ValueNotInCodedDomain {
                field: field.name.clone(),
                value: value.clone(),
                domain: coded.name.clone(),
                mapping: mapping_ref.clone(),
            }
        }),
        FieldDomain::Range(range) => {
            out_of_range(field, concrete, range).then(|| Finding::ValueOutOfRange {
                field: field.name.clone(),
                value: value.clone(),
                min: range.min.clone(),
                max: range.max.clone(),
                domain: range.name.clone(),
                mapping: mapping_ref.clone(),
            })
        }
        FieldDomain::None => None,
    }
}

/// Returns true if `value < min` or `value > max`. Bounds that cannot be
/// compared with the value are skipped.
fn out_of_range(field: &FieldDescriptor, value: &ConcreteValue, range: &RangeDomain) -> bool {
    let below = match value.compare(&range.min) {
        Ok(ordering) => ordering == Ordering::Less,
        Err(error) => {
            tracing::warn!(field = %field.name, domain = %range.name, %error, "range minimum not comparable");
            false
        }
    };
    let above = match value.compare(&range.max) {
        Ok(ordering) => ordering == Ordering::Greater,
        Err(error) => {
            tracing::warn!(field = %field.name, domain = %range.name, %error, "range maximum not comparable");
            false
        }
    };
    below || above
}
