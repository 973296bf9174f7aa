//! Serializable schema document.
//!
//! ```json
//! {
//!   "domains": [
//!     { "name": "Material", "kind": "coded",
//!       "values": [ { "code": 1, "name": "Steel" } ] },
//!     { "name": "SmallDiameter", "kind": "range", "min": 0, "max": 500 }
//!   ],
//!   "datasets": [
//!     { "name": "Pipes", "subtype_field": "Kind",
//!       "fields": [ { "name": "Diameter", "type": "Double" } ],
//!       "subtypes": [ { "code": 1, "name": "Small",
//!                       "domains": { "Diameter": "SmallDiameter" } } ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::CodedValue;
use crate::value::{ConcreteValue, FieldType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Named domains shared by all datasets.
    #[serde(default)]
    pub domains: Vec<DomainDefinition>,
    #[serde(default)]
    pub datasets: Vec<DatasetDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: DomainKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DomainKind {
    Coded { values: Vec<CodedValue> },
    Range { min: ConcreteValue, max: ConcreteValue },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype_field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtypes: Vec<SubtypeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Default domain name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

fn default_nullable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtypeDefinition {
    pub code: i64,
    pub name: String,
    /// Per-field domain overrides; `null` removes the field's domain for
    /// this subtype.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domains: BTreeMap<String, Option<String>>,
}
