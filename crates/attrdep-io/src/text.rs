//! Line-oriented mapping tables.
//!
//! ```text
//! # Material, Diameter => Status # description
//! 1, 150 => "OK"
//! *, null => "Check" # anything without a diameter
//! ```
//!
//! Both sides use the value-list syntax. Values are converted to the field
//! types of their attributes after parsing.

use std::io::{BufRead, Write};

use attrdep_model::{
    Attribute, AttributeDependency, AttributeValueMapping, Side, Value, parse_values,
};

use crate::error::{CodecError, Result};

const RULE_SEPARATOR: &str = "=>";

/// Write the mappings of `dependency`, one rule per line, after a comment
/// header naming the attributes.
pub fn write_text<W: Write>(dependency: &AttributeDependency, mut writer: W) -> Result<()> {
    writeln!(writer, "# Lines starting with '#' are ignored.")?;
    writeln!(writer, "#")?;
    writeln!(
        writer,
        "# Numbers use '.' as decimal separator and no group separator: 1234.5, not 1'234,5."
    )?;
    writeln!(writer, "#")?;
    writeln!(
        writer,
        "# {} {RULE_SEPARATOR} {} # description",
        attribute_names(dependency.attributes(Side::Source)),
        attribute_names(dependency.attributes(Side::Target)),
    )?;

    for mapping in &dependency.mappings {
        write!(
            writer,
            "{} {RULE_SEPARATOR} {}",
            mapping.source_text(),
            mapping.target_text()
        )?;
        match mapping.description.as_deref() {
            Some(description) if !description.is_empty() => writeln!(writer, " # {description}")?,
            _ => writeln!(writer)?,
        }
    }
    writer.flush()?;

    tracing::debug!(
        dataset = %dependency.dataset_name(),
        mappings = dependency.mappings.len(),
        "wrote mapping text"
    );
    Ok(())
}

/// Read mappings from the line format.
///
/// The dependency is not modified.
pub fn read_text<R: BufRead>(
    dependency: &AttributeDependency,
    reader: R,
) -> Result<Vec<AttributeValueMapping>> {
    let mut mappings = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index as u64 + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (source_text, target_text, description) =
            split_rule(line).ok_or(CodecError::Syntax { line: line_number })?;

        let source_values = read_side(dependency, Side::Source, source_text, line_number)?;
        let target_values = read_side(dependency, Side::Target, target_text, line_number)?;
        mappings.push(AttributeValueMapping {
            source_values,
            target_values,
            description: description.map(str::to_string),
        });
    }

    tracing::debug!(
        dataset = %dependency.dataset_name(),
        mappings = mappings.len(),
        "read mapping text"
    );
    Ok(mappings)
}

fn attribute_names(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(|attribute| attribute.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_side(
    dependency: &AttributeDependency,
    side: Side,
    text: &str,
    line: u64,
) -> Result<Vec<Value>> {
    let attributes = dependency.attributes(side);
    let values =
        parse_values(text).map_err(|source| CodecError::ValueList { line, side, source })?;
    if values.len() != attributes.len() {
        return Err(CodecError::Arity {
            line,
            side,
            expected: attributes.len(),
            actual: values.len(),
        });
    }
    Ok(values
        .iter()
        .zip(attributes)
        .map(|(value, attribute)| value.convert_to(attribute.field_type))
        .collect())
}

/// Split `source => target [# description]`.
///
/// The separator and the comment marker are only recognized outside
/// string literals.
fn split_rule(line: &str) -> Option<(&str, &str, Option<&str>)> {
    let separator = find_unquoted(line, RULE_SEPARATOR)?;
    let source = line[..separator].trim();
    let rest = &line[separator + RULE_SEPARATOR.len()..];

    let (target, description) = match find_unquoted(rest, "#") {
        Some(hash) => {
            let description = rest[hash + 1..].trim();
            (&rest[..hash], (!description.is_empty()).then_some(description))
        }
        None => (rest, None),
    };
    Some((source, target.trim(), description))
}

/// Byte offset of `pattern` outside double-quoted strings.
fn find_unquoted(text: &str, pattern: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if ch == '"' {
            in_string = true;
        } else if text[offset..].starts_with(pattern) {
            return Some(offset);
        }
    }
    None
}
