//! Subtype field location and per-mapping subtype codes.

use attrdep_model::{AttributeDependency, AttributeValueMapping, Schema, Side, Value};

use super::super::finding::{Finding, MappingRef};
use super::fields::ResolvedFields;

/// Where the subtype field sits among the configured attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtypeLocation {
    pub field: String,
    pub side: Side,
    pub index: usize,
}

/// Find the subtype field among the resolved attributes.
///
/// Source attributes are scanned before target attributes and the last
/// match wins. A field configured on both sides at different positions is
/// reported as ambiguous.
pub fn locate<S: Schema + ?Sized>(
    dependency: &AttributeDependency,
    schema: &S,
    resolved: &ResolvedFields<'_>,
) -> (Option<SubtypeLocation>, Vec<Finding>) {
    if !schema.has_subtypes() {
        return (None, Vec::new());
    }
    let subtype_field = schema.subtype_field_name().unwrap_or_default();

    let position = |side: Side| {
        dependency
            .attributes(side)
            .iter()
            .zip(resolved.side(side))
            .rposition(|(attribute, field)| {
                field.is_some() && attribute.name.eq_ignore_ascii_case(subtype_field)
            })
    };
    let source_index = position(Side::Source);
    let target_index = position(Side::Target);

    let mut findings = Vec::new();
    if let (Some(source_index), Some(target_index)) = (source_index, target_index)
        && source_index != target_index
    {
        findings.push(Finding::SubtypeFieldAmbiguous {
            field: subtype_field.to_string(),
            source_index,
            target_index,
        });
    }

    let location = target_index
        .map(|index| (Side::Target, index))
        .or(source_index.map(|index| (Side::Source, index)))
        .map(|(side, index)| SubtypeLocation {
            field: subtype_field.to_string(),
            side,
            index,
        });

    match &location {
        Some(location) => tracing::debug!(
            dataset = %schema.dataset_name(),
            field = %location.field,
            side = %location.side,
            index = location.index,
            "subtype field located"
        ),
        None => findings.push(Finding::SubtypeFieldNotConfigured {
            subtype_field: subtype_field.to_string(),
        }),
    }

    (location, findings)
}

/// Subtype code of one mapping, or `None` to fall back to dataset-level
/// domains.
///
/// A wildcard or an unknown code adds a finding. NULL falls back silently;
/// its nullability is checked with the other values.
pub fn code_of<S: Schema + ?Sized>(
    schema: &S,
    location: &SubtypeLocation,
    mapping: &AttributeValueMapping,
    mapping_ref: &MappingRef,
    findings: &mut Vec<Finding>,
) -> Option<i64> {
    // A short tuple is reported as an arity mismatch.
    let value = mapping.values(location.side).get(location.index)?;

    match value {
        Value::Null => None,
        Value::Wildcard => {
            findings.push(Finding::SubtypeUndeterminedByWildcard {
                field: location.field.clone(),
                mapping: mapping_ref.clone(),
            });
            None
        }
        Value::Concrete(concrete) => {
            let code = concrete
                .as_i64()
                .filter(|code| schema.find_subtype(*code).is_some());
            if code.is_none() {
                findings.push(Finding::UnknownSubtypeCode {
                    field: location.field.clone(),
                    value: value.clone(),
                    mapping: mapping_ref.clone(),
                });
            }
            code
        }
    }
}
