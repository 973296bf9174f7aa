//! Validation finding types.
//!
//! Each `Finding` variant carries only the data needed to describe it.
//! Severity is a default that callers can remap with a
//! [`SeverityPolicy`](crate::SeverityPolicy).

use std::fmt;

use attrdep_model::{AttributeValueMapping, ConcreteValue, FieldType, Side, Value};
use serde::{Deserialize, Serialize};

use crate::policy::SeverityPolicy;

/// Finding severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// The rule table is wrong or cannot be checked
    Error,
    /// Should review
    Warning,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Finding category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Structure,
    Schema,
    Consistency,
    Nullability,
    Format,
    Domain,
    Subtype,
}

impl Category {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Structure,
            Self::Schema,
            Self::Consistency,
            Self::Nullability,
            Self::Format,
            Self::Domain,
            Self::Subtype,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "Structure",
            Self::Schema => "Schema",
            Self::Consistency => "Consistency",
            Self::Nullability => "Nullability",
            Self::Format => "Format",
            Self::Domain => "Domain",
            Self::Subtype => "Subtype",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Structure => "Rule set configuration and mapping count",
            Self::Schema => "Dataset and field resolution",
            Self::Consistency => "Duplicate rules and tuple alignment",
            Self::Nullability => "NULL values in non-nullable fields",
            Self::Format => "Value type compatibility",
            Self::Domain => "Coded value and range domains",
            Self::Subtype => "Subtype field configuration and codes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a mapping within its rule set, with its source tuple for
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRef {
    /// Zero-based index in declaration order.
    pub index: usize,
    /// Source tuple in value-list syntax.
    pub source: String,
}

impl MappingRef {
    pub fn new(index: usize, mapping: &AttributeValueMapping) -> Self {
        Self {
            index,
            source: mapping.source_text(),
        }
    }
}

impl fmt::Display for MappingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.index + 1, self.source)
    }
}

/// Kind of a finding, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FindingKind {
    SchemaMismatch,
    ConfigurationError,
    SchemaUnavailable,
    MissingField,
    SubtypeFieldNotConfigured,
    SubtypeFieldAmbiguous,
    NoMappingsDefined,
    DuplicateSourceCombination,
    ArityMismatch,
    NullNotAllowed,
    TypeMismatch,
    ValueNotInCodedDomain,
    ValueOutOfRange,
    UnknownSubtypeCode,
    SubtypeUndeterminedByWildcard,
}

impl FindingKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SchemaMismatch => "SchemaMismatch",
            Self::ConfigurationError => "ConfigurationError",
            Self::SchemaUnavailable => "SchemaUnavailable",
            Self::MissingField => "MissingField",
            Self::SubtypeFieldNotConfigured => "SubtypeFieldNotConfigured",
            Self::SubtypeFieldAmbiguous => "SubtypeFieldAmbiguous",
            Self::NoMappingsDefined => "NoMappingsDefined",
            Self::DuplicateSourceCombination => "DuplicateSourceCombination",
            Self::ArityMismatch => "ArityMismatch",
            Self::NullNotAllowed => "NullNotAllowed",
            Self::TypeMismatch => "TypeMismatch",
            Self::ValueNotInCodedDomain => "ValueNotInCodedDomain",
            Self::ValueOutOfRange => "ValueOutOfRange",
            Self::UnknownSubtypeCode => "UnknownSubtypeCode",
            Self::SubtypeUndeterminedByWildcard => "SubtypeUndeterminedByWildcard",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation finding - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Finding {
    // Structural gates
    /// The rule set cannot be matched to a dataset
    SchemaMismatch { reason: String },
    /// One side has no attributes
    ConfigurationError { side: Side },
    /// The schema provider could not open the dataset
    SchemaUnavailable { dataset: String, reason: String },

    // Schema checks
    /// A configured attribute has no field in the schema
    MissingField { attribute: String, side: Side },
    /// The dataset has subtypes but its subtype field is not an attribute
    SubtypeFieldNotConfigured { subtype_field: String },
    /// The subtype field is configured on both sides at different positions
    SubtypeFieldAmbiguous {
        field: String,
        source_index: usize,
        target_index: usize,
    },

    // Rule table checks
    /// The rule set has no mappings
    NoMappingsDefined,
    /// A source tuple repeats an earlier one
    DuplicateSourceCombination {
        mapping: MappingRef,
        first: MappingRef,
    },
    /// A value tuple does not line up with its attributes
    ArityMismatch {
        mapping: MappingRef,
        side: Side,
        expected: usize,
        actual: usize,
    },

    // Value checks
    /// NULL in a field that does not allow it
    NullNotAllowed { field: String, mapping: MappingRef },
    /// Value payload is not compatible with the field type
    TypeMismatch {
        field: String,
        field_type: FieldType,
        value: Value,
        mapping: MappingRef,
    },
    /// Value is not a code of the field's coded value domain
    ValueNotInCodedDomain {
        field: String,
        value: Value,
        domain: String,
        mapping: MappingRef,
    },
    /// Value lies outside the field's range domain
    ValueOutOfRange {
        field: String,
        value: Value,
        min: ConcreteValue,
        max: ConcreteValue,
        domain: String,
        mapping: MappingRef,
    },

    // Subtype checks
    /// The subtype field value is not a known subtype code
    UnknownSubtypeCode {
        field: String,
        value: Value,
        mapping: MappingRef,
    },
    /// The subtype field value is a wildcard
    SubtypeUndeterminedByWildcard { field: String, mapping: MappingRef },
}

impl Finding {
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::SchemaMismatch { .. } => FindingKind::SchemaMismatch,
            Finding::ConfigurationError { .. } => FindingKind::ConfigurationError,
            Finding::SchemaUnavailable { .. } => FindingKind::SchemaUnavailable,
            Finding::MissingField { .. } => FindingKind::MissingField,
            Finding::SubtypeFieldNotConfigured { .. } => FindingKind::SubtypeFieldNotConfigured,
            Finding::SubtypeFieldAmbiguous { .. } => FindingKind::SubtypeFieldAmbiguous,
            Finding::NoMappingsDefined => FindingKind::NoMappingsDefined,
            Finding::DuplicateSourceCombination { .. } => FindingKind::DuplicateSourceCombination,
            Finding::ArityMismatch { .. } => FindingKind::ArityMismatch,
            Finding::NullNotAllowed { .. } => FindingKind::NullNotAllowed,
            Finding::TypeMismatch { .. } => FindingKind::TypeMismatch,
            Finding::ValueNotInCodedDomain { .. } => FindingKind::ValueNotInCodedDomain,
            Finding::ValueOutOfRange { .. } => FindingKind::ValueOutOfRange,
            Finding::UnknownSubtypeCode { .. } => FindingKind::UnknownSubtypeCode,
            Finding::SubtypeUndeterminedByWildcard { .. } => {
                FindingKind::SubtypeUndeterminedByWildcard
            }
        }
    }

    /// Category for this finding type.
    pub fn category(&self) -> Category {
        match self {
            Finding::SchemaMismatch { .. }
            | Finding::ConfigurationError { .. }
            | Finding::NoMappingsDefined => Category::Structure,
            Finding::SchemaUnavailable { .. } | Finding::MissingField { .. } => Category::Schema,
            Finding::DuplicateSourceCombination { .. } | Finding::ArityMismatch { .. } => {
                Category::Consistency
            }
            Finding::NullNotAllowed { .. } => Category::Nullability,
            Finding::TypeMismatch { .. } => Category::Format,
            Finding::ValueNotInCodedDomain { .. } | Finding::ValueOutOfRange { .. } => {
                Category::Domain
            }
            Finding::SubtypeFieldNotConfigured { .. }
            | Finding::SubtypeFieldAmbiguous { .. }
            | Finding::UnknownSubtypeCode { .. }
            | Finding::SubtypeUndeterminedByWildcard { .. } => Category::Subtype,
        }
    }

    /// Default severity (can be overridden by a policy).
    pub fn default_severity(&self) -> Severity {
        match self {
            Finding::SubtypeFieldNotConfigured { .. }
            | Finding::SubtypeFieldAmbiguous { .. }
            | Finding::NoMappingsDefined
            | Finding::DuplicateSourceCombination { .. }
            | Finding::SubtypeUndeterminedByWildcard { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Severity after applying `policy`, if any.
    pub fn severity(&self, policy: Option<&SeverityPolicy>) -> Severity {
        policy.map_or_else(|| self.default_severity(), |policy| policy.severity_of(self))
    }

    /// Terminal findings end validation; nothing else is reported with them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Finding::SchemaMismatch { .. }
                | Finding::ConfigurationError { .. }
                | Finding::SchemaUnavailable { .. }
        )
    }

    /// Field or attribute the finding is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Finding::MissingField { attribute, .. } => Some(attribute),
            Finding::SubtypeFieldNotConfigured { subtype_field } => Some(subtype_field),
            Finding::SubtypeFieldAmbiguous { field, .. }
            | Finding::NullNotAllowed { field, .. }
            | Finding::TypeMismatch { field, .. }
            | Finding::ValueNotInCodedDomain { field, .. }
            | Finding::ValueOutOfRange { field, .. }
            | Finding::UnknownSubtypeCode { field, .. }
            | Finding::SubtypeUndeterminedByWildcard { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Mapping the finding is about, if any.
    pub fn mapping(&self) -> Option<&MappingRef> {
        match self {
            Finding::DuplicateSourceCombination { mapping, .. }
            | Finding::ArityMismatch { mapping, .. }
            | Finding::NullNotAllowed { mapping, .. }
            | Finding::TypeMismatch { mapping, .. }
            | Finding::ValueNotInCodedDomain { mapping, .. }
            | Finding::ValueOutOfRange { mapping, .. }
            | Finding::UnknownSubtypeCode { mapping, .. }
            | Finding::SubtypeUndeterminedByWildcard { mapping, .. } => Some(mapping),
            _ => None,
        }
    }

    /// Format message with finding-specific data.
    pub fn message(&self) -> String {
        match self {
            Finding::SchemaMismatch { reason } => format!("Schema mismatch: {reason}"),
            Finding::ConfigurationError { side } => format!("No {side} attributes configured"),
            Finding::SchemaUnavailable { dataset, reason } => {
                format!("Schema of dataset {dataset} is unavailable: {reason}")
            }
            Finding::MissingField { attribute, side } => {
                format!("Field {attribute} ({side} attribute) not found in dataset schema")
            }
            Finding::SubtypeFieldNotConfigured { subtype_field } => format!(
                "Subtype field {subtype_field} is not a configured attribute; \
                 dataset-level domains are used"
            ),
            Finding::SubtypeFieldAmbiguous {
                field,
                source_index,
                target_index,
            } => format!(
                "Subtype field {field} is source attribute {} and target attribute {}; \
                 the target attribute is used",
                source_index + 1,
                target_index + 1
            ),
            Finding::NoMappingsDefined => "No attribute value mappings defined".to_string(),
            Finding::DuplicateSourceCombination { mapping, first } => {
                format!("Mapping {mapping} repeats the source values of mapping {first}")
            }
            Finding::ArityMismatch {
                mapping,
                side,
                expected,
                actual,
            } => format!("Mapping {mapping} has {actual} {side} values, expected {expected}"),
            Finding::NullNotAllowed { field, mapping } => {
                format!("Mapping {mapping}: NULL is not allowed in field {field}")
            }
            Finding::TypeMismatch {
                field,
                field_type,
                value,
                mapping,
            } => format!("Mapping {mapping}: {value} is not a valid {field_type} for field {field}"),
            Finding::ValueNotInCodedDomain {
                field,
                value,
                domain,
                mapping,
            } => format!(
                "Mapping {mapping}: {value} is not a code of domain {domain} (field {field})"
            ),
            Finding::ValueOutOfRange {
                field,
                value,
                min,
                max,
                domain,
                mapping,
            } => format!(
                "Mapping {mapping}: {value} is outside [{min}, {max}] of domain {domain} \
                 (field {field})"
            ),
            Finding::UnknownSubtypeCode {
                field,
                value,
                mapping,
            } => format!(
                "Mapping {mapping}: {value} is not a subtype code of field {field}; \
                 dataset-level domains are used"
            ),
            Finding::SubtypeUndeterminedByWildcard { field, mapping } => format!(
                "Mapping {mapping}: subtype field {field} is a wildcard; \
                 dataset-level domains are used"
            ),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_ref() -> MappingRef {
        MappingRef {
            index: 2,
            source: "1, 600".to_string(),
        }
    }

    #[test]
    fn duplicates_are_warnings() {
        let finding = Finding::DuplicateSourceCombination {
            mapping: mapping_ref(),
            first: MappingRef {
                index: 0,
                source: "1, 600".to_string(),
            },
        };
        assert_eq!(finding.default_severity(), Severity::Warning);
        assert_eq!(finding.category(), Category::Consistency);
        assert!(!finding.is_terminal());
        assert_eq!(
            finding.message(),
            "Mapping #3 (1, 600) repeats the source values of mapping #1 (1, 600)"
        );
    }

    #[test]
    fn gates_are_terminal_errors() {
        let finding = Finding::ConfigurationError { side: Side::Target };
        assert!(finding.is_terminal());
        assert_eq!(finding.severity(None), Severity::Error);
        assert_eq!(finding.message(), "No target attributes configured");
    }

    #[test]
    fn range_message_shows_bounds() {
        let finding = Finding::ValueOutOfRange {
            field: "Diameter".to_string(),
            value: Value::integer(600),
            min: ConcreteValue::Integer(0),
            max: ConcreteValue::Integer(500),
            domain: "SmallDiameter".to_string(),
            mapping: mapping_ref(),
        };
        assert_eq!(
            finding.message(),
            "Mapping #3 (1, 600): 600 is outside [0, 500] of domain SmallDiameter (field Diameter)"
        );
        assert_eq!(finding.field(), Some("Diameter"));
        assert_eq!(finding.mapping().map(|m| m.index), Some(2));
    }

    #[test]
    fn severity_parse_accepts_aliases() {
        assert_eq!(Severity::parse(" WARN "), Some(Severity::Warning));
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("fatal"), None);
    }
}
