//! Error types for the rule model.

use thiserror::Error;

use crate::dependency::Side;
use crate::value::FieldType;

/// Errors raised while parsing, converting or comparing rule values.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// Text could not be converted to a value of the requested field type.
    #[error("cannot convert '{text}' to {field_type}: {reason}")]
    Format {
        text: String,
        field_type: FieldType,
        reason: String,
    },

    /// The field type has no textual value representation.
    #[error("field type {field_type} is not supported for rule values")]
    UnsupportedFieldType { field_type: FieldType },

    /// Malformed value list.
    #[error("{message} (near position {position})")]
    Syntax { position: usize, message: String },

    /// The two values have no common ordering.
    #[error("cannot compare {left} and {right}")]
    Incomparable {
        left: &'static str,
        right: &'static str,
    },
}

impl ValueError {
    pub(crate) fn format(
        text: impl Into<String>,
        field_type: FieldType,
        reason: impl Into<String>,
    ) -> Self {
        Self::Format {
            text: text.into(),
            field_type,
            reason: reason.into(),
        }
    }

    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Violations of the dependency model's structural invariants.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The attribute is already part of this side.
    #[error("{side} attribute '{name}' is already defined")]
    DuplicateAttribute { side: Side, name: String },

    /// No attribute with this name on this side.
    #[error("{side} attribute '{name}' not found")]
    AttributeNotFound { side: Side, name: String },

    /// A value tuple does not line up with the configured attributes.
    #[error("expected {expected} {side} values, but got {actual}")]
    ArityMismatch {
        side: Side,
        expected: usize,
        actual: usize,
    },

    /// A mapping's value text is malformed.
    #[error("invalid {side} values '{text}': {source}")]
    InvalidValues {
        side: Side,
        text: String,
        #[source]
        source: ValueError,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Failures of a [`SchemaProvider`](crate::schema::SchemaProvider).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// The provider knows no dataset with this name.
    #[error("dataset '{dataset}' not found")]
    DatasetNotFound { dataset: String },

    /// The dataset exists but its backing store cannot be opened.
    #[error("dataset '{dataset}' is unavailable: {reason}")]
    Unavailable { dataset: String, reason: String },

    /// A field references a domain that is not defined.
    #[error("domain '{domain}' referenced by '{dataset}.{field}' is not defined")]
    UnknownDomain {
        dataset: String,
        field: String,
        domain: String,
    },
}
