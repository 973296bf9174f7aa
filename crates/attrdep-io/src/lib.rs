//! Mapping table codecs and document loading.
//!
//! # Features
//!
//! - **Delimited tables**: CSV/TSV (comma, semicolon or tab separated) with
//!   one column per attribute and an optional description column
//! - **Line format**: `source => target # description` rules using the
//!   value-list syntax
//! - **Documents**: JSON schema documents and rule set documents
//!
//! Importing a table replaces all mappings of the rule set.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use attrdep_io::{CodecOptions, import_mappings, load_dependency, save_dependency};
//!
//! let mut dependency = load_dependency(Path::new("pipes.json"))?;
//! let count = import_mappings(&mut dependency, Path::new("pipes.csv"), &CodecOptions::default())?;
//! save_dependency(&dependency, Path::new("pipes.json"))?;
//! ```

mod document;
mod error;
mod format;
mod table;
mod text;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use attrdep_model::{AttributeDependency, AttributeValueMapping, Culture};

// === Error Types ===
pub use error::{CodecError, Result};

// === Formats ===
pub use format::{Delimiter, MappingFormat};

// === Codecs ===
pub use table::{DESCRIPTION_COLUMN, read_table, write_table};
pub use text::{read_text, write_text};

// === Documents ===
pub use document::{
    load_dependencies, load_dependency, load_schema_document, load_schema_provider,
    save_dependency,
};

/// Options for reading and writing mapping table files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecOptions {
    /// Overrides the delimiter implied by the file extension.
    pub delimiter: Option<Delimiter>,
    /// Culture for parsing table cells. Written cells are always invariant.
    pub culture: Culture,
}

impl CodecOptions {
    /// Format for `path`: its extension, then the delimiter override.
    pub fn format_for(&self, path: &Path) -> Result<MappingFormat> {
        let format = MappingFormat::from_path(path)?;
        Ok(match self.delimiter {
            Some(delimiter) => format.with_delimiter(delimiter),
            None => format,
        })
    }
}

/// Read the mappings stored in `path` for the attributes of `dependency`.
pub fn read_mappings(
    dependency: &AttributeDependency,
    path: &Path,
    options: &CodecOptions,
) -> Result<Vec<AttributeValueMapping>> {
    let format = options.format_for(path)?;
    let file = File::open(path).map_err(|source| CodecError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    match format {
        MappingFormat::Delimited(delimiter) => {
            read_table(dependency, reader, delimiter, &options.culture)
        }
        MappingFormat::Text => read_text(dependency, reader),
    }
}

/// Replace the mappings of `dependency` with those stored in `path`.
///
/// Returns the number of imported mappings. The rule set is unchanged if
/// reading fails.
pub fn import_mappings(
    dependency: &mut AttributeDependency,
    path: &Path,
    options: &CodecOptions,
) -> Result<usize> {
    let mappings = read_mappings(dependency, path, options)?;
    let count = mappings.len();
    dependency.replace_mappings(mappings)?;
    tracing::info!(
        dataset = %dependency.dataset_name(),
        path = %path.display(),
        mappings = count,
        "imported mappings"
    );
    Ok(count)
}

/// Write the mappings of `dependency` to `path` in the format its extension
/// names.
pub fn export_mappings(
    dependency: &AttributeDependency,
    path: &Path,
    options: &CodecOptions,
) -> Result<()> {
    let format = options.format_for(path)?;
    let file = File::create(path).map_err(|source| CodecError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);
    match format {
        MappingFormat::Delimited(delimiter) => write_table(dependency, writer, delimiter)?,
        MappingFormat::Text => write_text(dependency, writer)?,
    }
    tracing::info!(
        dataset = %dependency.dataset_name(),
        path = %path.display(),
        %format,
        mappings = dependency.mappings.len(),
        "exported mappings"
    );
    Ok(())
}
