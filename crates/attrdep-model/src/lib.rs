//! Attribute dependency rule model.
//!
//! This crate provides the types shared by the validator, the codecs and
//! the command line tool:
//!
//! - **Values**: three-valued rule cells ([`Value`]: concrete, NULL or
//!   wildcard) with typed parsing, formatting and comparison
//! - **Dependencies**: [`AttributeDependency`] rule sets with ordered source
//!   and target attributes and their [`AttributeValueMapping`]s
//! - **Schemas**: the [`SchemaProvider`] seam through which field metadata,
//!   domains and subtypes are read, plus an in-memory implementation
//!
//! # Example
//!
//! ```
//! use attrdep_model::{Culture, FieldType, Value};
//!
//! let value = Value::parse("1.234,5", FieldType::Double, &Culture::DE_DE).unwrap();
//! assert_eq!(value.to_string(), "1234.5");
//! assert_eq!(Value::parse("null", FieldType::Text, &Culture::INVARIANT).unwrap(), Value::Null);
//! ```

pub mod dependency;
pub mod error;
pub mod schema;
pub mod value;

pub use dependency::{
    Attribute, AttributeDependency, AttributeValueMapping, DatasetRef, MappingRecord, Side,
};
pub use error::{ModelError, Result, SchemaError, ValueError};
pub use schema::{
    CodedValue, CodedValueDomain, FieldDescriptor, FieldDomain, InMemorySchema,
    InMemorySchemaProvider, RangeDomain, Schema, SchemaDocument, SchemaProvider, Subtype,
};
pub use value::{
    ConcreteValue, Culture, FieldType, NULL_TOKEN, Value, WILDCARD_TOKEN, format_values,
    parse_values, tuples_equal, values_match,
};
