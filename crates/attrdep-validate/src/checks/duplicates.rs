//! Duplicate source combinations.

use attrdep_model::{AttributeDependency, tuples_equal};

use super::super::finding::{Finding, MappingRef};

/// Report every mapping whose source tuple equals an earlier one.
///
/// Tuples are compared with value equality: the wildcard equals only the
/// wildcard and NULL only NULL.
pub fn check(dependency: &AttributeDependency) -> Vec<Finding> {
    let mappings = &dependency.mappings;
    let mut findings = Vec::new();

    for (index, mapping) in mappings.iter().enumerate() {
        let first = mappings[..index]
            .iter()
            .position(|earlier| tuples_equal(&earlier.source_values, &mapping.source_values));
        if let Some(first) = first {
            findings.push(Finding::DuplicateSourceCombination {
                mapping: MappingRef::new(index, mapping),
                first: MappingRef::new(first, &mappings[first]),
            });
        }
    }

    if !findings.is_empty() {
        tracing::debug!(
            dataset = %dependency.dataset_name(),
            duplicates = findings.len(),
            "duplicate source combinations"
        );
    }
    findings
}
