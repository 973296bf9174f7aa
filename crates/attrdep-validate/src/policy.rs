//! Caller-side severity mapping.

use std::collections::HashMap;

use crate::finding::{Finding, FindingKind, Severity};

/// Remaps finding severities, e.g. to fail a CI run on warnings.
///
/// Per-kind overrides take precedence over strict mode.
#[derive(Debug, Clone, Default)]
pub struct SeverityPolicy {
    strict: bool,
    overrides: HashMap<FindingKind, Severity>,
}

impl SeverityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every finding as an error unless overridden.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_override(mut self, kind: FindingKind, severity: Severity) -> Self {
        self.overrides.insert(kind, severity);
        self
    }

    pub fn severity_of(&self, finding: &Finding) -> Severity {
        if let Some(severity) = self.overrides.get(&finding.kind()) {
            return *severity;
        }
        if self.strict {
            return Severity::Error;
        }
        finding.default_severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_promotes_warnings() {
        let finding = Finding::NoMappingsDefined;
        assert_eq!(SeverityPolicy::new().severity_of(&finding), Severity::Warning);
        assert_eq!(SeverityPolicy::strict().severity_of(&finding), Severity::Error);
    }

    #[test]
    fn overrides_win_over_strict() {
        let policy = SeverityPolicy::strict()
            .with_override(FindingKind::NoMappingsDefined, Severity::Warning);
        assert_eq!(
            policy.severity_of(&Finding::NoMappingsDefined),
            Severity::Warning
        );
    }
}
