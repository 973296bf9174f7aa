//! Validation checks, run in order by [`run_all`].

pub mod duplicates;
pub mod fields;
pub mod structure;
pub mod subtype;
pub mod values;

use attrdep_model::{AttributeDependency, SchemaProvider};

use crate::finding::Finding;

/// Run every check against one rule set.
///
/// Structural gates stop the run: their finding is returned together with
/// whatever was collected before.
pub fn run_all<P: SchemaProvider + ?Sized>(
    dependency: &AttributeDependency,
    provider: &P,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let dataset = match structure::check(dependency) {
        Ok(dataset) => dataset,
        Err(finding) => {
            findings.push(finding);
            return findings;
        }
    };

    let schema = match provider.open_schema(dataset) {
        Ok(schema) => schema,
        Err(error) => {
            tracing::debug!(dataset = %dataset, %error, "schema unavailable");
            findings.push(Finding::SchemaUnavailable {
                dataset: dataset.name.clone(),
                reason: error.to_string(),
            });
            return findings;
        }
    };
    let schema = schema.as_ref();

    let resolved = fields::resolve(dependency, schema);
    findings.extend(resolved.findings());

    if dependency.mappings.is_empty() {
        findings.push(Finding::NoMappingsDefined);
        return findings;
    }

    findings.extend(duplicates::check(dependency));

    let (location, subtype_findings) = subtype::locate(dependency, schema, &resolved);
    findings.extend(subtype_findings);

    findings.extend(values::check(dependency, schema, &resolved, location.as_ref()));

    tracing::debug!(
        dataset = %dataset,
        mappings = dependency.mappings.len(),
        findings = findings.len(),
        "validation finished"
    );
    findings
}
