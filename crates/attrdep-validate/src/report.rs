//! Validation report containing all findings for a rule set.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::finding::{Category, Finding, Severity};
use crate::policy::SeverityPolicy;

/// Validation report for one attribute dependency.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub dataset: String,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Count of error-severity findings.
    pub fn error_count(&self, policy: Option<&SeverityPolicy>) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity(policy) == Severity::Error)
            .count()
    }

    /// Count of warnings.
    pub fn warning_count(&self, policy: Option<&SeverityPolicy>) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity(policy) == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self, policy: Option<&SeverityPolicy>) -> bool {
        self.error_count(policy) > 0
    }

    /// Returns true if validation stopped at a structural gate.
    pub fn is_terminated(&self) -> bool {
        self.findings.iter().any(Finding::is_terminal)
    }

    /// Finding counts per category, in category order.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.findings {
            *counts.entry(finding.category()).or_insert(0) += 1;
        }
        counts
    }

    /// Get findings sorted by severity (errors first), keeping the
    /// validation order within each severity.
    pub fn sorted_by_severity(&self, policy: Option<&SeverityPolicy>) -> Vec<&Finding> {
        let mut findings: Vec<_> = self.findings.iter().collect();
        findings.sort_by_key(|f| match f.severity(policy) {
            Severity::Error => 0,
            Severity::Warning => 1,
        });
        findings
    }
}
