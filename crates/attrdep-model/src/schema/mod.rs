//! Dataset schema access.
//!
//! The validator never talks to a storage driver directly. It asks a
//! [`SchemaProvider`] to open the [`Schema`] of a dataset and reads fields,
//! domains and subtypes through it.

mod document;
mod memory;

pub use document::{
    DatasetDefinition, DomainDefinition, DomainKind, FieldDefinition, SchemaDocument,
    SubtypeDefinition,
};
pub use memory::{InMemorySchema, InMemorySchemaProvider};

use serde::{Deserialize, Serialize};

use crate::dependency::DatasetRef;
use crate::error::SchemaError;
use crate::value::{ConcreteValue, FieldType, Value};

/// A subtype of a dataset: discriminator code and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtype {
    pub code: i64,
    pub name: String,
}

/// One legal entry of a coded value domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodedValue {
    pub code: ConcreteValue,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodedValueDomain {
    pub name: String,
    pub values: Vec<CodedValue>,
}

impl CodedValueDomain {
    /// Returns true if any code is value-equal to `value`.
    pub fn contains(&self, value: &ConcreteValue) -> bool {
        self.values.iter().any(|entry| entry.code.value_eq(value))
    }

    /// Display name of the entry for `value`.
    pub fn name_of(&self, value: &ConcreteValue) -> Option<&str> {
        self.values
            .iter()
            .find(|entry| entry.code.value_eq(value))
            .map(|entry| entry.name.as_str())
    }
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeDomain {
    pub name: String,
    pub min: ConcreteValue,
    pub max: ConcreteValue,
}

/// Domain constraint of a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldDomain {
    CodedValue(CodedValueDomain),
    Range(RangeDomain),
    #[default]
    None,
}

impl FieldDomain {
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldDomain::CodedValue(domain) => Some(&domain.name),
            FieldDomain::Range(domain) => Some(&domain.name),
            FieldDomain::None => None,
        }
    }

    /// The domain with its codes or bounds converted to `field_type`.
    ///
    /// Entries without a lossless conversion are kept as they are.
    pub fn for_field_type(&self, field_type: FieldType) -> FieldDomain {
        let convert = |value: &ConcreteValue| {
            match Value::Concrete(value.clone()).convert_to(field_type) {
                Value::Concrete(converted) => converted,
                Value::Null | Value::Wildcard => value.clone(),
            }
        };
        match self {
            FieldDomain::CodedValue(domain) => FieldDomain::CodedValue(CodedValueDomain {
                name: domain.name.clone(),
                values: domain
                    .values
                    .iter()
                    .map(|entry| CodedValue {
                        code: convert(&entry.code),
                        name: entry.name.clone(),
                    })
                    .collect(),
            }),
            FieldDomain::Range(domain) => FieldDomain::Range(RangeDomain {
                name: domain.name.clone(),
                min: convert(&domain.min),
                max: convert(&domain.max),
            }),
            FieldDomain::None => FieldDomain::None,
        }
    }
}

/// Field metadata needed to check rule values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
    /// Maximum text length in characters.
    pub length: Option<usize>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
            length: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Type and format compatibility of a value with this field,
    /// independent of any domain.
    ///
    /// NULL and the wildcard are always accepted; nullability is a separate
    /// check.
    pub fn can_accept(&self, value: &Value) -> bool {
        let Value::Concrete(value) = value else {
            return true;
        };
        match (self.field_type, value) {
            (FieldType::ShortInteger, ConcreteValue::Integer(number)) => {
                i16::try_from(*number).is_ok()
            }
            (FieldType::LongInteger | FieldType::ObjectId, ConcreteValue::Integer(number)) => {
                i32::try_from(*number).is_ok()
            }
            (FieldType::ShortInteger | FieldType::LongInteger, ConcreteValue::Boolean(_)) => true,
            (FieldType::Float | FieldType::Double, ConcreteValue::Integer(_)) => true,
            (FieldType::Float, ConcreteValue::Real(number)) => {
                number.is_finite() && number.abs() <= f64::from(f32::MAX)
            }
            (FieldType::Double, ConcreteValue::Real(number)) => number.is_finite(),
            (FieldType::Text, ConcreteValue::Text(text)) => self
                .length
                .is_none_or(|length| text.chars().count() <= length),
            (FieldType::Date, ConcreteValue::Date(_)) => true,
            _ => false,
        }
    }
}

/// Read access to the schema of one dataset.
pub trait Schema {
    fn dataset_name(&self) -> &str;

    fn fields(&self) -> &[FieldDescriptor];

    /// Case-insensitive field lookup.
    fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    fn has_subtypes(&self) -> bool {
        self.subtype_field_name().is_some()
    }

    fn subtype_field_name(&self) -> Option<&str>;

    fn subtypes(&self) -> &[Subtype];

    fn find_subtype(&self, code: i64) -> Option<&Subtype> {
        self.subtypes().iter().find(|subtype| subtype.code == code)
    }

    /// Effective domain of a field: the subtype's override if `subtype_code`
    /// names one, otherwise the field's default domain.
    fn domain(&self, field_name: &str, subtype_code: Option<i64>) -> FieldDomain;
}

impl<S: Schema + ?Sized> Schema for &S {
    fn dataset_name(&self) -> &str {
        (**self).dataset_name()
    }

    fn fields(&self) -> &[FieldDescriptor] {
        (**self).fields()
    }

    fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        (**self).find_field(name)
    }

    fn has_subtypes(&self) -> bool {
        (**self).has_subtypes()
    }

    fn subtype_field_name(&self) -> Option<&str> {
        (**self).subtype_field_name()
    }

    fn subtypes(&self) -> &[Subtype] {
        (**self).subtypes()
    }

    fn find_subtype(&self, code: i64) -> Option<&Subtype> {
        (**self).find_subtype(code)
    }

    fn domain(&self, field_name: &str, subtype_code: Option<i64>) -> FieldDomain {
        (**self).domain(field_name, subtype_code)
    }
}

/// Opens dataset schemas by reference.
///
/// Retries, caching and connection handling belong to implementations;
/// callers treat a failure as final.
pub trait SchemaProvider {
    fn open_schema(&self, dataset: &DatasetRef) -> Result<Box<dyn Schema + '_>, SchemaError>;
}
