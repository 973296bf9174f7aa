//! Attribute dependency rule table validation.
//!
//! Checks a rule set against the schema of its dataset:
//!
//! - **Structure**: dataset set, both attribute lists non-empty, schema opens
//! - **Fields**: every attribute resolves to a schema field
//! - **Duplicates**: no source tuple repeats an earlier one
//! - **Subtypes**: the subtype field is configured and each rule's subtype
//!   code is known
//! - **Values**: nullability, type compatibility and coded/range domains,
//!   resolved per subtype where possible
//!
//! Data-quality problems are returned as [`Finding`]s, never as errors.
//!
//! # Example
//!
//! ```ignore
//! use attrdep_validate::{validate_report, Severity};
//!
//! let report = validate_report(&dependency, &provider);
//! for finding in &report.findings {
//!     println!("[{:?}] {}: {}", finding.severity(None), finding.category(), finding.message());
//! }
//! ```

mod checks;
mod finding;
mod policy;
mod report;

use std::num::NonZeroUsize;
use std::thread;

use attrdep_model::{AttributeDependency, SchemaProvider};

pub use finding::{Category, Finding, FindingKind, MappingRef, Severity};
pub use policy::SeverityPolicy;
pub use report::ValidationReport;

/// Validate one rule set against the schema its provider opens.
///
/// Findings are ordered: structural and field findings first, then
/// duplicate combinations, subtype configuration, and finally per-mapping
/// findings in mapping-then-field order.
pub fn validate<P: SchemaProvider + ?Sized>(
    dependency: &AttributeDependency,
    provider: &P,
) -> Vec<Finding> {
    checks::run_all(dependency, provider)
}

/// Validate one rule set and wrap the findings in a report.
pub fn validate_report<P: SchemaProvider + ?Sized>(
    dependency: &AttributeDependency,
    provider: &P,
) -> ValidationReport {
    let _span = tracing::debug_span!("validate", dataset = %dependency.dataset_name()).entered();
    ValidationReport {
        dataset: dependency.dataset_name().to_string(),
        findings: validate(dependency, provider),
    }
}

/// Validate many rule sets in parallel.
///
/// Each worker opens its own schemas through the shared provider. Reports
/// are returned in input order.
pub fn validate_all<P: SchemaProvider + Sync + ?Sized>(
    dependencies: &[AttributeDependency],
    provider: &P,
) -> Vec<ValidationReport> {
    if dependencies.is_empty() {
        return Vec::new();
    }
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(dependencies.len());
    let chunk_size = dependencies.len().div_ceil(workers);
    tracing::debug!(
        dependencies = dependencies.len(),
        workers,
        "validating rule sets"
    );

    thread::scope(|scope| {
        let handles: Vec<_> = dependencies
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|dependency| validate_report(dependency, provider))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}
