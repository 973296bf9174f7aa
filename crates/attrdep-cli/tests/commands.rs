//! Integration tests for the CLI commands and report rendering.

use std::fs;
use std::path::{Path, PathBuf};

use attrdep_cli::cli::{
    CheckArgs, Cli, Command, DelimiterArg, ExportArgs, ImportArgs, OutputFormatArg, ShowArgs,
    TableArgs,
};
use attrdep_cli::commands::{resolve_schema_path, run_check, run_export, run_import, run_show};
use attrdep_cli::summary::{Totals, render_json, render_table, render_text};
use attrdep_io::load_dependency;
use attrdep_model::{Culture, Value};
use attrdep_validate::FindingKind;
use clap::Parser;
use tempfile::TempDir;

const SCHEMA: &str = r#"{
  "domains": [
    { "name": "Material", "kind": "coded",
      "values": [ { "code": 1, "name": "Steel" }, { "code": 2, "name": "PVC" } ] },
    { "name": "SmallDiameter", "kind": "range", "min": 0, "max": 500 },
    { "name": "Period", "kind": "range", "min": "2020-01-01", "max": "2029-12-31" }
  ],
  "datasets": [
    {
      "name": "Pipes",
      "subtype_field": "Kind",
      "fields": [
        { "name": "Kind", "type": "ShortInteger", "nullable": false },
        { "name": "Material", "type": "LongInteger", "domain": "Material" },
        { "name": "Diameter", "type": "Double" },
        { "name": "Status", "type": "Text", "length": 10 }
      ],
      "subtypes": [
        { "code": 1, "name": "Small", "domains": { "Diameter": "SmallDiameter" } },
        { "code": 2, "name": "Large" }
      ]
    },
    {
      "name": "Works",
      "fields": [
        { "name": "Started", "type": "Date", "domain": "Period" },
        { "name": "Status", "type": "Text" }
      ]
    }
  ]
}"#;

const PIPES: &str = r#"{
  "dataset": { "name": "Pipes" },
  "source_attributes": [
    { "name": "Kind", "field_type": "ShortInteger" },
    { "name": "Diameter", "field_type": "Double" }
  ],
  "target_attributes": [ { "name": "Status", "field_type": "Text" } ],
  "mappings": [
    { "source": "1, 600", "target": "\"Check\"" },
    { "source": "2, 600", "target": "\"OK\"" },
    { "source": "*, 100", "target": "\"OK\"" },
    { "source": "1, 600", "target": "\"Dup\"" }
  ]
}"#;

const VALVES: &str = r#"{
  "dataset": { "name": "Valves" },
  "source_attributes": [ { "name": "Type", "field_type": "Text" } ],
  "target_attributes": [ { "name": "Status", "field_type": "Text" } ]
}"#;

const WORKS: &str = r#"{
  "dataset": { "name": "Works" },
  "source_attributes": [ { "name": "Started", "field_type": "Date" } ],
  "target_attributes": [ { "name": "Status", "field_type": "Text" } ],
  "mappings": [
    { "source": "\"2024-05-01\"", "target": "\"OK\"" },
    { "source": "\"2030-06-01\"", "target": "\"Late\"" }
  ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("schema.json", SCHEMA);
        fixture.write("pipes.json", PIPES);
        fixture.write("valves.json", VALVES);
        fixture.write("works.json", WORKS);
        fixture.write("all.json", &format!("[{PIPES}, {VALVES}]"));
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn check_args(&self, dependency: &str) -> CheckArgs {
        CheckArgs {
            schema: Some(self.path("schema.json")),
            dependency: self.path(dependency),
            mappings: None,
            table: TableArgs::default(),
            output_format: OutputFormatArg::Text,
            strict: false,
        }
    }
}

#[test]
fn check_renders_findings_as_text() {
    let fixture = Fixture::new();
    let result = run_check(&fixture.check_args("all.json")).unwrap();
    assert!(result.has_errors());

    insta::assert_snapshot!(render_text(&result.reports, result.policy()), @r"
    Pipes: 2 errors, 2 warnings
      warning [Consistency] Mapping #4 (1, 600.0) repeats the source values of mapping #1 (1, 600.0)
      error   [Domain] Mapping #1 (1, 600.0): 600 is outside [0, 500] of domain SmallDiameter (field Diameter)
      warning [Subtype] Mapping #3 (*, 100.0): subtype field Kind is a wildcard; dataset-level domains are used
      error   [Domain] Mapping #4 (1, 600.0): 600 is outside [0, 500] of domain SmallDiameter (field Diameter)
    Valves: 1 error, 0 warnings
      error   [Schema] Schema of dataset Valves is unavailable: dataset 'Valves' not found
    2 rule sets checked: 3 errors, 2 warnings
    ");
}

#[test]
fn check_renders_findings_as_json() {
    let fixture = Fixture::new();
    let result = run_check(&fixture.check_args("valves.json")).unwrap();

    insta::assert_snapshot!(render_json(&result.reports, result.policy()).unwrap(), @r#"
    {
      "totals": {
        "rule_sets": 1,
        "errors": 1,
        "warnings": 0
      },
      "reports": [
        {
          "dataset": "Valves",
          "errors": 1,
          "warnings": 0,
          "findings": [
            {
              "severity": "Error",
              "category": "Schema",
              "message": "Schema of dataset Valves is unavailable: dataset 'Valves' not found",
              "kind": "SchemaUnavailable",
              "dataset": "Valves",
              "reason": "dataset 'Valves' not found"
            }
          ]
        }
      ]
    }
    "#);
}

#[test]
fn check_flags_dates_outside_a_document_range() {
    let fixture = Fixture::new();
    let result = run_check(&fixture.check_args("works.json")).unwrap();
    let findings = &result.reports[0].findings;
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind(), FindingKind::ValueOutOfRange);
    assert_eq!(
        findings[0].message(),
        "Mapping #2 (\"2030-06-01\"): 2030-06-01 is outside [2020-01-01, 2029-12-31] \
         of domain Period (field Started)"
    );
}

#[test]
fn strict_check_counts_warnings_as_errors() {
    let fixture = Fixture::new();
    let mut args = fixture.check_args("pipes.json");
    args.strict = true;
    let result = run_check(&args).unwrap();
    assert_eq!(
        Totals::of(&result.reports, result.policy()),
        Totals {
            rule_sets: 1,
            errors: 4,
            warnings: 0
        }
    );

    let table = render_table(&result.reports, result.policy());
    assert!(table.contains("Pipes"));
    assert!(table.contains("Findings:"));
    assert!(table.contains("By category:"));
    assert!(table.contains("Duplicate rules and tuple alignment"));
    assert!(!table.contains("Nullability"));
}

#[test]
fn check_uses_mapping_table_instead_of_stored_mappings() {
    let fixture = Fixture::new();
    let mappings = fixture.write(
        "pipes.csv",
        "Kind;Diameter;Status\n2;1.500,5;OK\n1;250;OK\n",
    );
    let mut args = fixture.check_args("pipes.json");
    args.mappings = Some(mappings);
    args.table = TableArgs {
        delimiter: Some(DelimiterArg::Semicolon),
        culture: Culture::DE_DE,
    };

    let result = run_check(&args).unwrap();
    assert!(!result.has_errors());
    assert!(result.reports[0].is_empty());

    // Several rule sets cannot share one mapping table.
    let mut args = fixture.check_args("all.json");
    args.mappings = Some(fixture.path("pipes.csv"));
    let err = run_check(&args).unwrap_err();
    assert!(err.to_string().contains("exactly one rule set"));
}

#[test]
fn check_reports_missing_documents_with_context() {
    let fixture = Fixture::new();
    let mut args = fixture.check_args("pipes.json");
    args.schema = Some(fixture.path("missing.json"));
    let err = run_check(&args).unwrap_err();
    assert!(format!("{err:#}").starts_with("load schema "));
}

#[test]
fn export_then_import_round_trips() {
    let fixture = Fixture::new();
    let exported = run_export(&ExportArgs {
        dependency: fixture.path("pipes.json"),
        output: fixture.path("pipes.txt"),
        delimiter: None,
    })
    .unwrap();
    assert_eq!(exported, 4);

    let text = fs::read_to_string(fixture.path("pipes.txt")).unwrap();
    let rules: Vec<&str> = text.lines().filter(|line| !line.starts_with('#')).collect();
    assert_eq!(
        rules,
        vec![
            r#"1, 600.0 => "Check""#,
            r#"2, 600.0 => "OK""#,
            r#"*, 100.0 => "OK""#,
            r#"1, 600.0 => "Dup""#,
        ]
    );

    let imported = run_import(&ImportArgs {
        dependency: fixture.path("pipes.json"),
        input: fixture.path("pipes.txt"),
        output: Some(fixture.path("copy.json")),
        table: TableArgs::default(),
    })
    .unwrap();
    assert_eq!(imported, 4);
    assert_eq!(
        load_dependency(&fixture.path("copy.json")).unwrap(),
        load_dependency(&fixture.path("pipes.json")).unwrap()
    );
}

#[test]
fn import_overwrites_the_rule_set_by_default() {
    let fixture = Fixture::new();
    let input = fixture.write("rules.tsv", "Kind\tDiameter\tStatus\n2\t\t*\n");
    let count = run_import(&ImportArgs {
        dependency: fixture.path("pipes.json"),
        input,
        output: None,
        table: TableArgs::default(),
    })
    .unwrap();
    assert_eq!(count, 1);

    let dependency = load_dependency(&fixture.path("pipes.json")).unwrap();
    assert_eq!(dependency.mappings.len(), 1);
    assert_eq!(
        dependency.mappings[0].source_values,
        vec![Value::integer(2), Value::Null]
    );
    assert_eq!(dependency.mappings[0].target_values, vec![Value::Wildcard]);
}

#[test]
fn show_lists_fields_and_subtypes() {
    let fixture = Fixture::new();
    let text = run_show(&ShowArgs {
        schema: Some(fixture.path("schema.json")),
        dataset: "pipes".to_string(),
    })
    .unwrap();
    assert!(text.starts_with("Dataset: Pipes\nSubtype field: Kind\n"));
    assert!(text.contains("Steel"));
    assert!(text.contains("Subtypes:"));
    assert!(text.contains("SmallDiameter"));

    let err = run_show(&ShowArgs {
        schema: Some(fixture.path("schema.json")),
        dataset: "Valves".to_string(),
    })
    .unwrap_err();
    assert!(err.to_string().contains("dataset 'Valves' not found"));
    assert!(err.to_string().contains("Works"));
}

#[test]
fn schema_flag_wins_over_environment() {
    let path = Path::new("explicit.json");
    assert_eq!(resolve_schema_path(Some(path)).unwrap(), path);
}

#[test]
fn parses_check_arguments() {
    let cli = Cli::try_parse_from([
        "attrdep",
        "-v",
        "check",
        "--schema",
        "schema.json",
        "--dependency",
        "rules.json",
        "--mappings",
        "rules.csv",
        "--delimiter",
        "semicolon",
        "--culture",
        "de-CH",
        "--output-format",
        "json",
        "--strict",
    ])
    .unwrap();
    let Command::Check(args) = cli.command else {
        panic!("expected check command");
    };
    assert_eq!(args.table.culture, Culture::DE_CH);
    assert!(matches!(args.table.delimiter, Some(DelimiterArg::Semicolon)));
    assert!(args.output_format == OutputFormatArg::Json);
    assert!(args.strict);

    assert!(
        Cli::try_parse_from([
            "attrdep",
            "check",
            "--dependency",
            "rules.json",
            "--culture",
            "xx-YY"
        ])
        .is_err()
    );
}
