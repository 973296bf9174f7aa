//! Structural gate: dataset and attribute lists.

use attrdep_model::{AttributeDependency, DatasetRef, Side};

use super::super::finding::Finding;

/// Returns the dataset to open, or the terminal finding that stops the run.
pub fn check(dependency: &AttributeDependency) -> Result<&DatasetRef, Finding> {
    let Some(dataset) = &dependency.dataset else {
        return Err(Finding::SchemaMismatch {
            reason: "no dataset".to_string(),
        });
    };

    for side in [Side::Source, Side::Target] {
        if dependency.attributes(side).is_empty() {
            return Err(Finding::ConfigurationError { side });
        }
    }

    Ok(dataset)
}
