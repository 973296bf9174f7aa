//! Attribute dependency rule sets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::{FieldType, Value, format_values, parse_values, values_match};

/// Reference to the dataset a rule set applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetRef {
    pub name: String,
    /// Owning data model, if datasets are grouped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl DatasetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.model {
            Some(model) => write!(f, "{model}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One field of the dataset, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub field_type: FieldType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Which half of a rule an attribute or value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored form of a mapping: both tuples as value-list text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRecord {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single rule: source tuple implies target tuple.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "MappingRecord", into = "MappingRecord")]
pub struct AttributeValueMapping {
    pub source_values: Vec<Value>,
    pub target_values: Vec<Value>,
    pub description: Option<String>,
}

impl AttributeValueMapping {
    pub fn new(source_values: Vec<Value>, target_values: Vec<Value>) -> Self {
        Self {
            source_values,
            target_values,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn values(&self, side: Side) -> &[Value] {
        match side {
            Side::Source => &self.source_values,
            Side::Target => &self.target_values,
        }
    }

    /// Source tuple in value-list syntax.
    pub fn source_text(&self) -> String {
        format_values(&self.source_values)
    }

    /// Target tuple in value-list syntax.
    pub fn target_text(&self) -> String {
        format_values(&self.target_values)
    }
}

impl TryFrom<MappingRecord> for AttributeValueMapping {
    type Error = ModelError;

    fn try_from(record: MappingRecord) -> Result<Self> {
        let parse = |side: Side, text: String| {
            parse_values(&text).map_err(|source| ModelError::InvalidValues { side, text, source })
        };
        Ok(Self {
            source_values: parse(Side::Source, record.source)?,
            target_values: parse(Side::Target, record.target)?,
            description: record.description,
        })
    }
}

impl From<AttributeValueMapping> for MappingRecord {
    fn from(mapping: AttributeValueMapping) -> Self {
        Self {
            source: mapping.source_text(),
            target: mapping.target_text(),
            description: mapping.description,
        }
    }
}

/// The rule set for one dataset.
///
/// Fields are public for deserialization and for tests that need to build
/// deliberately malformed rule sets; the mutating methods keep the mapping
/// tuples aligned with the attribute lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeDependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetRef>,
    #[serde(default)]
    pub source_attributes: Vec<Attribute>,
    #[serde(default)]
    pub target_attributes: Vec<Attribute>,
    #[serde(default)]
    pub mappings: Vec<AttributeValueMapping>,
}

impl AttributeDependency {
    pub fn new(dataset: DatasetRef) -> Self {
        Self {
            dataset: Some(dataset),
            ..Self::default()
        }
    }

    /// Dataset name for diagnostics.
    pub fn dataset_name(&self) -> &str {
        self.dataset.as_ref().map_or("<unset>", |dataset| dataset.name.as_str())
    }

    pub fn attributes(&self, side: Side) -> &[Attribute] {
        match side {
            Side::Source => &self.source_attributes,
            Side::Target => &self.target_attributes,
        }
    }

    fn attributes_mut(&mut self, side: Side) -> &mut Vec<Attribute> {
        match side {
            Side::Source => &mut self.source_attributes,
            Side::Target => &mut self.target_attributes,
        }
    }

    pub fn add_source_attribute(&mut self, attribute: Attribute) -> Result<()> {
        self.add_attribute(Side::Source, attribute)
    }

    pub fn add_target_attribute(&mut self, attribute: Attribute) -> Result<()> {
        self.add_attribute(Side::Target, attribute)
    }

    pub fn remove_source_attribute(&mut self, name: &str) -> Result<Attribute> {
        self.remove_attribute(Side::Source, name)
    }

    pub fn remove_target_attribute(&mut self, name: &str) -> Result<Attribute> {
        self.remove_attribute(Side::Target, name)
    }

    /// Append an attribute to one side. Names are unique per side,
    /// ignoring case. Existing mappings are discarded.
    pub fn add_attribute(&mut self, side: Side, attribute: Attribute) -> Result<()> {
        if self
            .attributes(side)
            .iter()
            .any(|existing| existing.name.eq_ignore_ascii_case(&attribute.name))
        {
            return Err(ModelError::DuplicateAttribute {
                side,
                name: attribute.name,
            });
        }
        tracing::debug!(
            dataset = %self.dataset_name(),
            %side,
            attribute = %attribute.name,
            "adding attribute"
        );
        self.attributes_mut(side).push(attribute);
        self.reset_mappings();
        Ok(())
    }

    /// Remove an attribute by name (case-insensitive). Existing mappings
    /// are discarded.
    pub fn remove_attribute(&mut self, side: Side, name: &str) -> Result<Attribute> {
        let Some(index) = self
            .attributes(side)
            .iter()
            .position(|attribute| attribute.name.eq_ignore_ascii_case(name))
        else {
            return Err(ModelError::AttributeNotFound {
                side,
                name: name.to_string(),
            });
        };
        let removed = self.attributes_mut(side).remove(index);
        tracing::debug!(
            dataset = %self.dataset_name(),
            %side,
            attribute = %removed.name,
            "removed attribute"
        );
        self.reset_mappings();
        Ok(removed)
    }

    /// Column layout changed: every mapping is misaligned now.
    fn reset_mappings(&mut self) {
        if self.mappings.is_empty() {
            return;
        }
        tracing::info!(
            dataset = %self.dataset_name(),
            cleared = self.mappings.len(),
            "attribute list changed, mappings cleared"
        );
        self.mappings.clear();
    }

    /// Check a mapping's tuple lengths against the attribute lists.
    pub fn check_arity(&self, mapping: &AttributeValueMapping) -> Result<()> {
        for side in [Side::Source, Side::Target] {
            let expected = self.attributes(side).len();
            let actual = mapping.values(side).len();
            if expected != actual {
                return Err(ModelError::ArityMismatch {
                    side,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    pub fn add_mapping(&mut self, mapping: AttributeValueMapping) -> Result<()> {
        self.check_arity(&mapping)?;
        self.mappings.push(mapping);
        Ok(())
    }

    /// Replace the whole mapping table. Nothing changes if any mapping has
    /// the wrong arity.
    pub fn replace_mappings(&mut self, mappings: Vec<AttributeValueMapping>) -> Result<()> {
        for mapping in &mappings {
            self.check_arity(mapping)?;
        }
        tracing::debug!(
            dataset = %self.dataset_name(),
            previous = self.mappings.len(),
            current = mappings.len(),
            "replacing mappings"
        );
        self.mappings = mappings;
        Ok(())
    }

    /// Resolve a field name to its side and position.
    ///
    /// Exact matches win over case-insensitive ones, and the source side
    /// is searched before the target side.
    pub fn attribute_index(&self, name: &str) -> Option<(Side, usize)> {
        const SIDES: [Side; 2] = [Side::Source, Side::Target];

        SIDES
            .into_iter()
            .find_map(|side| self.position(side, |attribute| attribute.name == name))
            .or_else(|| {
                SIDES.into_iter().find_map(|side| {
                    self.position(side, |attribute| attribute.name.eq_ignore_ascii_case(name))
                })
            })
    }

    fn position(
        &self,
        side: Side,
        predicate: impl Fn(&Attribute) -> bool,
    ) -> Option<(Side, usize)> {
        self.attributes(side)
            .iter()
            .position(predicate)
            .map(|index| (side, index))
    }

    /// Find the rule for a source tuple. Wildcards unify with anything;
    /// among several matching rules the last-defined one wins.
    pub fn lookup(&self, source_values: &[Value]) -> Option<&AttributeValueMapping> {
        self.mappings
            .iter()
            .rev()
            .find(|mapping| values_match(&mapping.source_values, source_values))
    }

    /// Convert every mapping value to its attribute's field type.
    ///
    /// Value lists are untyped; this aligns their payloads with the schema
    /// (integer to real, text to date, ...). Values that do not convert are
    /// kept as they are.
    pub fn convert_mapping_values(&mut self) {
        let source_types: Vec<FieldType> =
            self.source_attributes.iter().map(|a| a.field_type).collect();
        let target_types: Vec<FieldType> =
            self.target_attributes.iter().map(|a| a.field_type).collect();

        for mapping in &mut self.mappings {
            convert_tuple(&mut mapping.source_values, &source_types);
            convert_tuple(&mut mapping.target_values, &target_types);
        }
    }
}

fn convert_tuple(values: &mut [Value], field_types: &[FieldType]) {
    for (value, field_type) in values.iter_mut().zip(field_types) {
        *value = value.convert_to(*field_type);
    }
}
