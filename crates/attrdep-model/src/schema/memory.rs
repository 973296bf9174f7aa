//! In-memory schemas, built in code or loaded from a [`SchemaDocument`].

use std::collections::{BTreeMap, HashMap};

use super::{
    CodedValueDomain, DatasetDefinition, DomainKind, FieldDescriptor, FieldDomain, RangeDomain,
    Schema, SchemaDocument, SchemaProvider, Subtype,
};
use crate::dependency::DatasetRef;
use crate::error::SchemaError;

/// Schema of one dataset held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchema {
    name: String,
    fields: Vec<FieldDescriptor>,
    field_domains: HashMap<String, FieldDomain>,
    subtype_field: Option<String>,
    subtypes: Vec<Subtype>,
    subtype_domains: HashMap<(i64, String), FieldDomain>,
}

/// Map keys ignore field name case.
fn key(name: &str) -> String {
    name.to_ascii_uppercase()
}

impl InMemorySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the default domain of a field.
    pub fn with_field_domain(mut self, field: &str, domain: FieldDomain) -> Self {
        self.field_domains.insert(key(field), domain);
        self
    }

    pub fn with_subtype_field(mut self, field: impl Into<String>) -> Self {
        self.subtype_field = Some(field.into());
        self
    }

    pub fn with_subtype(mut self, code: i64, name: impl Into<String>) -> Self {
        self.subtypes.push(Subtype {
            code,
            name: name.into(),
        });
        self
    }

    /// Override a field's domain for one subtype.
    pub fn with_subtype_domain(mut self, code: i64, field: &str, domain: FieldDomain) -> Self {
        self.subtype_domains.insert((code, key(field)), domain);
        self
    }

    /// Default (dataset-level) domain of a field.
    pub fn field_domain(&self, field: &str) -> Option<&FieldDomain> {
        self.field_domains.get(&key(field))
    }

    /// Domain overrides of one subtype, by field name.
    pub fn subtype_overrides(&self, code: i64) -> Vec<(&str, &FieldDomain)> {
        let mut overrides: Vec<(&str, &FieldDomain)> = self
            .fields
            .iter()
            .filter_map(|field| {
                self.subtype_domains
                    .get(&(code, key(&field.name)))
                    .map(|domain| (field.name.as_str(), domain))
            })
            .collect();
        overrides.sort_by(|a, b| a.0.cmp(b.0));
        overrides
    }
}

impl Schema for InMemorySchema {
    fn dataset_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn subtype_field_name(&self) -> Option<&str> {
        self.subtype_field.as_deref()
    }

    fn subtypes(&self) -> &[Subtype] {
        &self.subtypes
    }

    fn domain(&self, field_name: &str, subtype_code: Option<i64>) -> FieldDomain {
        let field_key = key(field_name);
        if let Some(code) = subtype_code
            && let Some(domain) = self.subtype_domains.get(&(code, field_key.clone()))
        {
            return domain.clone();
        }
        self.field_domains
            .get(&field_key)
            .cloned()
            .unwrap_or_default()
    }
}

/// Provider over a fixed set of in-memory schemas.
///
/// Datasets can be marked unavailable to simulate a store that cannot be
/// opened.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaProvider {
    schemas: BTreeMap<String, InMemorySchema>,
    unavailable: HashMap<String, String>,
}

impl InMemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema: InMemorySchema) {
        self.schemas.insert(key(&schema.name), schema);
    }

    pub fn with_schema(mut self, schema: InMemorySchema) -> Self {
        self.insert(schema);
        self
    }

    pub fn mark_unavailable(&mut self, dataset: &str, reason: impl Into<String>) {
        self.unavailable.insert(key(dataset), reason.into());
    }

    pub fn get(&self, dataset: &str) -> Option<&InMemorySchema> {
        self.schemas.get(&key(dataset))
    }

    pub fn schemas(&self) -> impl Iterator<Item = &InMemorySchema> {
        self.schemas.values()
    }

    /// Build schemas from a document, resolving domain names.
    pub fn from_document(document: &SchemaDocument) -> Result<Self, SchemaError> {
        let domains: HashMap<String, FieldDomain> = document
            .domains
            .iter()
            .map(|definition| {
                let domain = match &definition.kind {
                    DomainKind::Coded { values } => FieldDomain::CodedValue(CodedValueDomain {
                        name: definition.name.clone(),
                        values: values.clone(),
                    }),
                    DomainKind::Range { min, max } => FieldDomain::Range(RangeDomain {
                        name: definition.name.clone(),
                        min: min.clone(),
                        max: max.clone(),
                    }),
                };
                (key(&definition.name), domain)
            })
            .collect();

        // Shared domains take the payload type of each field they are attached to.
        let resolve = |dataset: &DatasetDefinition, field: &str, name: &str| {
            let field_type = dataset
                .fields
                .iter()
                .find(|definition| definition.name.eq_ignore_ascii_case(field))
                .map(|definition| definition.field_type);
            domains
                .get(&key(name))
                .map(|domain| match field_type {
                    Some(field_type) => domain.for_field_type(field_type),
                    None => domain.clone(),
                })
                .ok_or_else(|| SchemaError::UnknownDomain {
                    dataset: dataset.name.clone(),
                    field: field.to_string(),
                    domain: name.to_string(),
                })
        };

        let mut provider = Self::new();
        for dataset in &document.datasets {
            let mut schema = InMemorySchema::new(&dataset.name);
            for field in &dataset.fields {
                let mut descriptor = FieldDescriptor::new(&field.name, field.field_type);
                descriptor.nullable = field.nullable;
                descriptor.length = field.length;
                schema = schema.with_field(descriptor);
                if let Some(domain) = &field.domain {
                    let domain = resolve(dataset, field.name.as_str(), domain.as_str())?;
                    schema = schema.with_field_domain(&field.name, domain);
                }
            }
            if let Some(subtype_field) = &dataset.subtype_field {
                schema = schema.with_subtype_field(subtype_field);
            }
            for subtype in &dataset.subtypes {
                schema = schema.with_subtype(subtype.code, &subtype.name);
                for (field, domain) in &subtype.domains {
                    let domain = match domain {
                        Some(name) => resolve(dataset, field.as_str(), name.as_str())?,
                        None => FieldDomain::None,
                    };
                    schema = schema.with_subtype_domain(subtype.code, field, domain);
                }
            }
            tracing::debug!(
                dataset = %dataset.name,
                fields = dataset.fields.len(),
                subtypes = dataset.subtypes.len(),
                "loaded dataset schema"
            );
            provider.insert(schema);
        }
        Ok(provider)
    }
}

impl SchemaProvider for InMemorySchemaProvider {
    fn open_schema(&self, dataset: &DatasetRef) -> Result<Box<dyn Schema + '_>, SchemaError> {
        if let Some(reason) = self.unavailable.get(&key(&dataset.name)) {
            return Err(SchemaError::Unavailable {
                dataset: dataset.name.clone(),
                reason: reason.clone(),
            });
        }
        let schema = self
            .get(&dataset.name)
            .ok_or_else(|| SchemaError::DatasetNotFound {
                dataset: dataset.name.clone(),
            })?;
        Ok(Box::new(schema))
    }
}
