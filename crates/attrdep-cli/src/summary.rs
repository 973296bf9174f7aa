//! Rendering of validation reports and schemas.

use std::collections::BTreeMap;

use attrdep_model::{FieldDomain, InMemorySchema, Schema};
use attrdep_validate::{Category, Finding, Severity, SeverityPolicy, ValidationReport};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use serde::Serialize;

/// Totals over all reports of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub rule_sets: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl Totals {
    pub fn of(reports: &[ValidationReport], policy: Option<&SeverityPolicy>) -> Self {
        reports.iter().fold(
            Self {
                rule_sets: reports.len(),
                ..Self::default()
            },
            |totals, report| Self {
                errors: totals.errors + report.error_count(policy),
                warnings: totals.warnings + report.warning_count(policy),
                ..totals
            },
        )
    }
}

// === Tables ===

/// Overview table plus a findings table (errors first).
pub fn render_table(reports: &[ValidationReport], policy: Option<&SeverityPolicy>) -> String {
    let mut overview = Table::new();
    overview.set_header(vec![
        header_cell("Dataset"),
        header_cell("Mappings checked"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut overview);
    align_column(&mut overview, 2, CellAlignment::Right);
    align_column(&mut overview, 3, CellAlignment::Right);
    align_column(&mut overview, 4, CellAlignment::Center);

    for report in reports {
        let errors = report.error_count(policy);
        let warnings = report.warning_count(policy);
        overview.add_row(vec![
            Cell::new(&report.dataset)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            if report.is_terminated() {
                dim_cell("no")
            } else {
                Cell::new("yes")
            },
            count_cell(errors, Color::Red),
            count_cell(warnings, Color::Yellow),
            status_cell(errors, warnings),
        ]);
    }
    let totals = Totals::of(reports, policy);
    overview.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(totals.errors, Color::Red).add_attribute(Attribute::Bold),
        count_cell(totals.warnings, Color::Yellow).add_attribute(Attribute::Bold),
        status_cell(totals.errors, totals.warnings),
    ]);

    let mut output = overview.to_string();

    let rows: Vec<(&str, &Finding)> = reports
        .iter()
        .flat_map(|report| {
            report
                .sorted_by_severity(policy)
                .into_iter()
                .map(move |finding| (report.dataset.as_str(), finding))
        })
        .collect();
    if rows.is_empty() {
        return output;
    }

    let mut findings = Table::new();
    findings.set_header(vec![
        header_cell("Dataset"),
        header_cell("Severity"),
        header_cell("Category"),
        header_cell("Finding"),
        header_cell("Field"),
        header_cell("Mapping"),
        header_cell("Message"),
    ]);
    apply_findings_table_style(&mut findings);
    align_column(&mut findings, 1, CellAlignment::Center);
    for (dataset, finding) in rows {
        findings.add_row(vec![
            Cell::new(dataset),
            severity_cell(finding.severity(policy)),
            Cell::new(finding.category()),
            Cell::new(finding.kind()),
            Cell::new(finding.field().unwrap_or("-")),
            finding
                .mapping()
                .map_or_else(|| dim_cell("-"), |mapping| Cell::new(mapping.index + 1)),
            Cell::new(finding.message()),
        ]);
    }
    output.push_str("\n\nFindings:\n");
    output.push_str(&findings.to_string());
    output.push_str("\n\nBy category:\n");
    output.push_str(&category_table(reports).to_string());
    output
}

/// Finding counts per category over all reports.
fn category_table(reports: &[ValidationReport]) -> Table {
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for report in reports {
        for (category, count) in report.category_counts() {
            *counts.entry(category).or_insert(0) += count;
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Findings"),
        header_cell("Checks"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for category in Category::all() {
        let Some(&count) = counts.get(category) else {
            continue;
        };
        table.add_row(vec![
            Cell::new(category),
            Cell::new(count),
            dim_cell(category.description()),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_findings_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Fixed(30)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn status_cell(errors: usize, warnings: usize) -> Cell {
    if errors > 0 {
        Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else if warnings > 0 {
        Cell::new("WARN").fg(Color::Yellow)
    } else {
        Cell::new("OK").fg(Color::Green)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

// === Plain text ===

/// One line per finding, grouped by rule set, in validation order.
pub fn render_text(reports: &[ValidationReport], policy: Option<&SeverityPolicy>) -> String {
    let mut lines = Vec::new();
    for report in reports {
        if report.is_empty() {
            lines.push(format!("{}: no findings", report.dataset));
            continue;
        }
        lines.push(format!(
            "{}: {}, {}",
            report.dataset,
            plural(report.error_count(policy), "error"),
            plural(report.warning_count(policy), "warning")
        ));
        for finding in &report.findings {
            lines.push(format!(
                "  {:<7} [{}] {}",
                finding.severity(policy).label().to_lowercase(),
                finding.category(),
                finding.message()
            ));
        }
    }
    let totals = Totals::of(reports, policy);
    lines.push(format!(
        "{} checked: {}, {}",
        plural(totals.rule_sets, "rule set"),
        plural(totals.errors, "error"),
        plural(totals.warnings, "warning")
    ));
    lines.join("\n")
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// === JSON ===

#[derive(Serialize)]
struct JsonOutput<'a> {
    totals: Totals,
    reports: Vec<JsonReport<'a>>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    dataset: &'a str,
    errors: usize,
    warnings: usize,
    findings: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    severity: Severity,
    category: Category,
    message: String,
    #[serde(flatten)]
    finding: &'a Finding,
}

/// Reports as pretty-printed JSON, with severities resolved by `policy`.
pub fn render_json(
    reports: &[ValidationReport],
    policy: Option<&SeverityPolicy>,
) -> serde_json::Result<String> {
    let output = JsonOutput {
        totals: Totals::of(reports, policy),
        reports: reports
            .iter()
            .map(|report| JsonReport {
                dataset: &report.dataset,
                errors: report.error_count(policy),
                warnings: report.warning_count(policy),
                findings: report
                    .findings
                    .iter()
                    .map(|finding| JsonFinding {
                        severity: finding.severity(policy),
                        category: finding.category(),
                        message: finding.message(),
                        finding,
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

// === Schemas ===

/// Fields with their default domains, then subtypes with their overrides.
pub fn render_schema(schema: &InMemorySchema) -> String {
    let mut output = format!("Dataset: {}\n", schema.dataset_name());
    if let Some(field) = schema.subtype_field_name() {
        output.push_str(&format!("Subtype field: {field}\n"));
    }

    let mut fields = Table::new();
    fields.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Nullable"),
        header_cell("Length"),
        header_cell("Domain"),
    ]);
    apply_table_style(&mut fields);
    align_column(&mut fields, 2, CellAlignment::Center);
    align_column(&mut fields, 3, CellAlignment::Right);
    for field in schema.fields() {
        fields.add_row(vec![
            Cell::new(&field.name),
            Cell::new(field.field_type),
            Cell::new(if field.nullable { "yes" } else { "no" }),
            field.length.map_or_else(|| dim_cell("-"), Cell::new),
            domain_cell(schema.field_domain(&field.name)),
        ]);
    }
    output.push_str(&fields.to_string());

    if schema.subtypes().is_empty() {
        return output;
    }
    let mut subtypes = Table::new();
    subtypes.set_header(vec![
        header_cell("Code"),
        header_cell("Subtype"),
        header_cell("Domain overrides"),
    ]);
    apply_table_style(&mut subtypes);
    align_column(&mut subtypes, 0, CellAlignment::Right);
    for subtype in schema.subtypes() {
        let overrides: Vec<String> = schema
            .subtype_overrides(subtype.code)
            .into_iter()
            .map(|(field, domain)| format!("{field}: {}", domain.name().unwrap_or("-")))
            .collect();
        subtypes.add_row(vec![
            Cell::new(subtype.code),
            Cell::new(&subtype.name),
            if overrides.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(overrides.join("\n"))
            },
        ]);
    }
    output.push_str("\n\nSubtypes:\n");
    output.push_str(&subtypes.to_string());
    output
}

/// Short description of a domain: its name, kind and values.
pub fn describe_domain(domain: &FieldDomain) -> Option<String> {
    match domain {
        FieldDomain::CodedValue(coded) => {
            let values: Vec<String> = coded
                .values
                .iter()
                .map(|value| format!("{} {}", value.code, value.name))
                .collect();
            Some(format!("{} (coded: {})", coded.name, values.join(", ")))
        }
        FieldDomain::Range(range) => Some(format!(
            "{} (range: {} .. {})",
            range.name, range.min, range.max
        )),
        FieldDomain::None => None,
    }
}

fn domain_cell(domain: Option<&FieldDomain>) -> Cell {
    match domain.and_then(describe_domain) {
        Some(description) => Cell::new(description),
        None => dim_cell("-"),
    }
}

#[cfg(test)]
mod tests {
    use attrdep_model::{CodedValue, CodedValueDomain, ConcreteValue, RangeDomain};

    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "error"), "1 error");
        assert_eq!(plural(0, "warning"), "0 warnings");
        assert_eq!(plural(3, "rule set"), "3 rule sets");
    }

    #[test]
    fn test_describe_domain() {
        let coded = FieldDomain::CodedValue(CodedValueDomain {
            name: "Material".to_string(),
            values: vec![
                CodedValue {
                    code: ConcreteValue::Integer(1),
                    name: "Steel".to_string(),
                },
                CodedValue {
                    code: ConcreteValue::Integer(2),
                    name: "PVC".to_string(),
                },
            ],
        });
        assert_eq!(
            describe_domain(&coded).as_deref(),
            Some("Material (coded: 1 Steel, 2 PVC)")
        );

        let range = FieldDomain::Range(RangeDomain {
            name: "SmallDiameter".to_string(),
            min: ConcreteValue::Integer(0),
            max: ConcreteValue::Real(500.5),
        });
        assert_eq!(
            describe_domain(&range).as_deref(),
            Some("SmallDiameter (range: 0 .. 500.5)")
        );
        assert_eq!(describe_domain(&FieldDomain::None), None);
    }

    #[test]
    fn empty_run_renders_totals_only() {
        assert_eq!(render_text(&[], None), "0 rule sets checked: 0 errors, 0 warnings");
    }
}
