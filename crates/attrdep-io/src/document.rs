//! JSON schema documents and rule set documents.

use std::fs;
use std::path::Path;

use attrdep_model::{AttributeDependency, InMemorySchemaProvider, SchemaDocument};
use serde::de::DeserializeOwned;

use crate::error::{CodecError, Result};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| CodecError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CodecError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a schema document.
pub fn load_schema_document(path: &Path) -> Result<SchemaDocument> {
    read_json(path)
}

/// Load a schema document and build the in-memory provider over it.
pub fn load_schema_provider(path: &Path) -> Result<InMemorySchemaProvider> {
    let document = load_schema_document(path)?;
    let provider = InMemorySchemaProvider::from_document(&document)?;
    tracing::debug!(
        path = %path.display(),
        datasets = document.datasets.len(),
        domains = document.domains.len(),
        "loaded schema document"
    );
    Ok(provider)
}

/// Load one rule set.
///
/// Mapping values are converted to the field types of their attributes.
pub fn load_dependency(path: &Path) -> Result<AttributeDependency> {
    let mut dependency: AttributeDependency = read_json(path)?;
    dependency.convert_mapping_values();
    Ok(dependency)
}

/// Load a rule set document holding either one rule set or an array of
/// them.
pub fn load_dependencies(path: &Path) -> Result<Vec<AttributeDependency>> {
    let document: serde_json::Value = read_json(path)?;
    let parsed = if document.is_array() {
        serde_json::from_value::<Vec<AttributeDependency>>(document)
    } else {
        serde_json::from_value::<AttributeDependency>(document).map(|dependency| vec![dependency])
    };
    let mut dependencies = parsed.map_err(|source| CodecError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    for dependency in &mut dependencies {
        dependency.convert_mapping_values();
    }
    tracing::debug!(
        path = %path.display(),
        dependencies = dependencies.len(),
        "loaded rule sets"
    );
    Ok(dependencies)
}

/// Write one rule set as pretty-printed JSON.
pub fn save_dependency(dependency: &AttributeDependency, path: &Path) -> Result<()> {
    let mut text = serde_json::to_string_pretty(dependency).map_err(|source| CodecError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| CodecError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
