//! Delimited (CSV/TSV) mapping tables.
//!
//! Layout: one header row naming the source attributes, then the target
//! attributes, then an optional `Description` column; one data row per
//! mapping. Cells hold value tokens (`NULL`, `*` or a typed value). Lines
//! starting with `#` and blank lines are skipped; empty cells read as NULL.

use std::io::{Read, Write};
use std::iter;

use attrdep_model::{Attribute, AttributeDependency, AttributeValueMapping, Culture, Side, Value};
use csv::{Position, ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::{CodecError, Result};
use crate::format::Delimiter;

/// Header of the optional description column.
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Write the mappings of `dependency` as a delimited table.
pub fn write_table<W: Write>(
    dependency: &AttributeDependency,
    writer: W,
    delimiter: Delimiter,
) -> Result<()> {
    // Quotes cells starting with '#' so they are not read back as comments.
    let mut csv = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .comment(Some(b'#'))
        .from_writer(writer);

    let header = attributes(dependency)
        .map(|attribute| attribute.name.as_str())
        .chain(iter::once(DESCRIPTION_COLUMN));
    csv.write_record(header)?;

    for mapping in &dependency.mappings {
        let cells = mapping
            .source_values
            .iter()
            .chain(&mapping.target_values)
            .map(Value::to_string)
            .chain(iter::once(mapping.description.clone().unwrap_or_default()));
        csv.write_record(cells)?;
    }
    csv.flush()?;

    tracing::debug!(
        dataset = %dependency.dataset_name(),
        mappings = dependency.mappings.len(),
        %delimiter,
        "wrote mapping table"
    );
    Ok(())
}

/// Read mappings from a delimited table.
///
/// Cells are parsed for the field type of their attribute using `culture`.
/// The dependency is not modified.
pub fn read_table<R: Read>(
    dependency: &AttributeDependency,
    reader: R,
    delimiter: Delimiter,
    culture: &Culture,
) -> Result<Vec<AttributeValueMapping>> {
    let mut csv = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .comment(Some(b'#'))
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let attributes: Vec<&Attribute> = attributes(dependency).collect();
    let source_count = dependency.attributes(Side::Source).len();

    let mut records = csv.records();
    let header = records.next().ok_or(CodecError::MissingHeader)??;
    let has_description = check_header(&header, &attributes)?;
    let expected = attributes.len() + usize::from(has_description);

    let mut mappings = Vec::new();
    for record in records {
        let record = record?;
        let line = record.position().map_or(0, Position::line);
        if record.len() != expected {
            return Err(CodecError::FieldCount {
                line,
                expected,
                found: record.len(),
            });
        }

        let mut source_values = attributes
            .iter()
            .zip(record.iter())
            .map(|(attribute, cell)| {
                parse_cell(cell, attribute, culture).map_err(|source| CodecError::Value {
                    line,
                    column: attribute.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<Value>>>()?;
        let target_values = source_values.split_off(source_count);

        let description = has_description
            .then(|| record.get(attributes.len()))
            .flatten()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map(str::to_string);

        mappings.push(AttributeValueMapping {
            source_values,
            target_values,
            description,
        });
    }

    tracing::debug!(
        dataset = %dependency.dataset_name(),
        mappings = mappings.len(),
        %delimiter,
        culture = %culture,
        "read mapping table"
    );
    Ok(mappings)
}

fn attributes(dependency: &AttributeDependency) -> impl Iterator<Item = &Attribute> {
    dependency
        .attributes(Side::Source)
        .iter()
        .chain(dependency.attributes(Side::Target))
}

fn parse_cell(
    cell: &str,
    attribute: &Attribute,
    culture: &Culture,
) -> std::result::Result<Value, attrdep_model::ValueError> {
    if cell.trim().is_empty() {
        return Ok(Value::Null);
    }
    Value::parse(cell, attribute.field_type, culture)
}

/// Check that the header names the attributes in order (case-insensitive).
///
/// Returns whether a description column follows them.
fn check_header(header: &StringRecord, attributes: &[&Attribute]) -> Result<bool> {
    let column_name = |index: usize| {
        header
            .get(index)
            .unwrap_or_default()
            .trim_start_matches('\u{feff}')
            .trim()
    };

    for (index, attribute) in attributes.iter().enumerate() {
        let found = column_name(index);
        if !found.eq_ignore_ascii_case(&attribute.name) {
            return Err(CodecError::HeaderMismatch {
                column: index + 1,
                expected: attribute.name.clone(),
                found: found.to_string(),
            });
        }
    }

    match header.len().saturating_sub(attributes.len()) {
        0 => Ok(false),
        1 => {
            let found = column_name(attributes.len());
            if found.eq_ignore_ascii_case(DESCRIPTION_COLUMN) {
                Ok(true)
            } else {
                Err(CodecError::HeaderMismatch {
                    column: attributes.len() + 1,
                    expected: DESCRIPTION_COLUMN.to_string(),
                    found: found.to_string(),
                })
            }
        }
        _ => Err(CodecError::FieldCount {
            line: header.position().map_or(1, Position::line),
            expected: attributes.len() + 1,
            found: header.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use attrdep_model::{DatasetRef, FieldType};

    use super::*;

    fn pipes() -> AttributeDependency {
        let mut dependency = AttributeDependency::new(DatasetRef::new("Pipes"));
        dependency
            .add_source_attribute(Attribute::new("Material", FieldType::LongInteger))
            .unwrap();
        dependency
            .add_target_attribute(Attribute::new("Diameter", FieldType::Double))
            .unwrap();
        dependency
    }

    fn read(text: &str) -> Result<Vec<AttributeValueMapping>> {
        read_table(&pipes(), text.as_bytes(), Delimiter::Comma, &Culture::INVARIANT)
    }

    #[test]
    fn test_write_table() {
        let mut dependency = pipes();
        dependency
            .add_mapping(
                AttributeValueMapping::new(vec![Value::integer(1)], vec![Value::real(150.5)])
                    .with_description("steel, small"),
            )
            .unwrap();
        dependency
            .add_mapping(AttributeValueMapping::new(vec![Value::Wildcard], vec![Value::Null]))
            .unwrap();

        let mut buffer = Vec::new();
        write_table(&dependency, &mut buffer, Delimiter::Semicolon).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Material;Diameter;Description\n1;150.5;steel, small\n*;NULL;\n"
        );
    }

    #[test]
    fn test_read_skips_comments_and_blank_lines() {
        let mappings = read("# exported rules\nmaterial,DIAMETER\n\n1,150\n# note\n2,\n").unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].target_values, vec![Value::real(150.0)]);
        assert_eq!(mappings[1].target_values, vec![Value::Null]);
        assert_eq!(mappings[1].description, None);
    }

    #[test]
    fn test_read_description_column() {
        let mappings = read("Material,Diameter,description\n*,null,\"any, unknown\"\n").unwrap();
        assert_eq!(mappings[0].source_values, vec![Value::Wildcard]);
        assert_eq!(mappings[0].target_values, vec![Value::Null]);
        assert_eq!(mappings[0].description.as_deref(), Some("any, unknown"));
    }

    #[test]
    fn test_header_mismatch() {
        let err = read("Diameter,Material\n1,2\n").unwrap_err();
        assert!(matches!(
            err,
            CodecError::HeaderMismatch { column: 1, ref found, .. } if found == "Diameter"
        ));

        let err = read("Material,Diameter,Remark\n1,2,x\n").unwrap_err();
        assert!(matches!(err, CodecError::HeaderMismatch { column: 3, .. }));

        assert!(matches!(read("# only comments\n").unwrap_err(), CodecError::MissingHeader));
    }

    #[test]
    fn test_field_count_reports_line() {
        let err = read("Material,Diameter\n1,2\n3\n").unwrap_err();
        assert_eq!(err.to_string(), "line 3: expected 2 fields but found 1");
    }

    #[test]
    fn test_value_error_reports_line_and_column() {
        let err = read("Material,Diameter\n1,2\nsteel,3\n").unwrap_err();
        let CodecError::Value { line, column, .. } = &err else {
            panic!("expected value error, got {err:?}");
        };
        assert_eq!(*line, 3);
        assert_eq!(column, "Material");
    }

    #[test]
    fn test_read_with_culture() {
        let mappings = read_table(
            &pipes(),
            "Material;Diameter\n1;1.234,5\n".as_bytes(),
            Delimiter::Semicolon,
            &Culture::DE_DE,
        )
        .unwrap();
        assert_eq!(mappings[0].target_values, vec![Value::real(1234.5)]);
    }
}
