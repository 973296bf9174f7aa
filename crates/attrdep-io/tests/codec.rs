//! File-based tests for mapping table import/export and documents.

use std::fs;
use std::path::Path;

use attrdep_io::{
    CodecError, CodecOptions, Delimiter, export_mappings, import_mappings, load_dependencies,
    load_dependency, load_schema_provider, read_mappings, save_dependency,
};
use attrdep_model::{
    Attribute, AttributeDependency, AttributeValueMapping, Culture, DatasetRef, FieldType, Value,
};
use tempfile::TempDir;

fn pipes() -> AttributeDependency {
    let mut dependency = AttributeDependency::new(DatasetRef::new("Pipes").with_model("Network"));
    for attribute in [
        Attribute::new("Kind", FieldType::ShortInteger),
        Attribute::new("Diameter", FieldType::Double),
    ] {
        dependency.add_source_attribute(attribute).unwrap();
    }
    for attribute in [
        Attribute::new("Status", FieldType::Text),
        Attribute::new("Installed", FieldType::Date),
    ] {
        dependency.add_target_attribute(attribute).unwrap();
    }
    dependency
}

fn date(text: &str) -> Value {
    Value::parse(text, FieldType::Date, &Culture::INVARIANT).unwrap()
}

fn with_rules(mut dependency: AttributeDependency) -> AttributeDependency {
    let rules = vec![
        AttributeValueMapping::new(
            vec![Value::integer(1), Value::real(150.25)],
            vec![Value::text("OK"), date("2024-03-01")],
        )
        .with_description("small, steel"),
        AttributeValueMapping::new(
            vec![Value::integer(2), Value::Wildcard],
            vec![Value::text("NULL"), Value::Null],
        ),
        AttributeValueMapping::new(
            vec![Value::Null, Value::integer(0).convert_to(FieldType::Double)],
            vec![Value::text("*"), date("1999-12-31T23:59:30")],
        ),
        AttributeValueMapping::new(
            vec![Value::integer(3), Value::real(-1.5e-3)],
            vec![Value::text("say \"hi\"; bye"), Value::Wildcard],
        ),
    ];
    for rule in rules {
        dependency.add_mapping(rule).unwrap();
    }
    dependency
}

fn round_trip(dir: &TempDir, file_name: &str, options: &CodecOptions) {
    let path = dir.path().join(file_name);
    let original = with_rules(pipes());
    export_mappings(&original, &path, options).unwrap();

    let mut imported = pipes();
    let count = import_mappings(&mut imported, &path, options).unwrap();
    assert_eq!(count, original.mappings.len(), "{file_name}");
    assert_eq!(imported, original, "{file_name}");
}

#[test]
fn hash_prefixed_and_empty_text_survive_every_format() {
    let dir = TempDir::new().unwrap();
    let mut labels = AttributeDependency::new(DatasetRef::new("Labels"));
    labels
        .add_source_attribute(Attribute::new("Code", FieldType::Text))
        .unwrap();
    labels
        .add_target_attribute(Attribute::new("Status", FieldType::Text))
        .unwrap();
    let rules = [("#1", "OK"), ("A", ""), ("", "# not a comment")];
    for (code, status) in rules {
        labels
            .add_mapping(AttributeValueMapping::new(
                vec![Value::text(code)],
                vec![Value::text(status)],
            ))
            .unwrap();
    }

    for file_name in ["labels.csv", "labels.tsv", "labels.txt"] {
        let path = dir.path().join(file_name);
        export_mappings(&labels, &path, &CodecOptions::default()).unwrap();
        let mappings = read_mappings(&labels, &path, &CodecOptions::default()).unwrap();
        assert_eq!(mappings, labels.mappings, "{file_name}");
    }
}

#[test]
fn tables_round_trip_in_every_format() {
    let dir = TempDir::new().unwrap();
    round_trip(&dir, "rules.csv", &CodecOptions::default());
    round_trip(&dir, "rules.tsv", &CodecOptions::default());
    round_trip(&dir, "rules.txt", &CodecOptions::default());
    round_trip(
        &dir,
        "semicolons.csv",
        &CodecOptions {
            delimiter: Some(Delimiter::Semicolon),
            ..CodecOptions::default()
        },
    );
}

#[test]
fn semicolon_override_is_used_for_csv_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.csv");
    let options = CodecOptions {
        delimiter: Some(Delimiter::Semicolon),
        ..CodecOptions::default()
    };
    export_mappings(&with_rules(pipes()), &path, &options).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("Kind;Diameter;Status;Installed;Description")
    );
}

#[test]
fn import_replaces_existing_mappings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.csv");
    fs::write(
        &path,
        "# maintained by hand\nKind,Diameter,Status,Installed\n1,100,Open,2020-01-01\n",
    )
    .unwrap();

    let mut dependency = with_rules(pipes());
    let count = import_mappings(&mut dependency, &path, &CodecOptions::default()).unwrap();
    assert_eq!(count, 1);
    assert_eq!(dependency.mappings.len(), 1);
    assert_eq!(
        dependency.mappings[0].target_values,
        vec![Value::text("Open"), date("2020-01-01")]
    );
}

#[test]
fn failed_import_leaves_mappings_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.txt");
    fs::write(&path, "1, 2 => \"a\", null\n3 => \"b\", null\n").unwrap();

    let mut dependency = with_rules(pipes());
    let err = import_mappings(&mut dependency, &path, &CodecOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "line 2: expected 2 source values, but got 1");
    assert_eq!(dependency, with_rules(pipes()));
}

#[test]
fn cells_use_the_requested_culture() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.csv");
    fs::write(
        &path,
        "Kind;Diameter;Status;Installed\n1;1.500,75;OK;31.12.2020\n",
    )
    .unwrap();

    let options = CodecOptions {
        delimiter: Some(Delimiter::Semicolon),
        culture: Culture::DE_DE,
    };
    let mappings = read_mappings(&pipes(), &path, &options).unwrap();
    assert_eq!(mappings[0].source_values[1], Value::real(1500.75));
    assert_eq!(mappings[0].target_values[1], date("2020-12-31"));
}

#[test]
fn unknown_extension_and_missing_file_are_errors() {
    let dir = TempDir::new().unwrap();
    let err = export_mappings(
        &pipes(),
        &dir.path().join("rules.xlsx"),
        &CodecOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::UnknownFormat { .. }));

    let err = read_mappings(
        &pipes(),
        &dir.path().join("missing.csv"),
        &CodecOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::FileRead { .. }));
}

// --- Documents ---

#[test]
fn dependency_documents_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pipes.json");
    let dependency = with_rules(pipes());

    save_dependency(&dependency, &path).unwrap();
    assert_eq!(load_dependency(&path).unwrap(), dependency);
    assert_eq!(load_dependencies(&path).unwrap(), vec![dependency]);
}

#[test]
fn dependency_documents_may_hold_arrays() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(
        &path,
        r#"[
  { "dataset": { "name": "Pipes" },
    "source_attributes": [ { "name": "Diameter", "field_type": "Double" } ],
    "target_attributes": [ { "name": "Status", "field_type": "Text" } ],
    "mappings": [ { "source": "100", "target": "\"OK\"" } ] },
  { "dataset": { "name": "Valves" } }
]"#,
    )
    .unwrap();

    let dependencies = load_dependencies(&path).unwrap();
    assert_eq!(dependencies.len(), 2);
    // Untyped list values are converted to the attribute's field type.
    assert_eq!(
        dependencies[0].mappings[0].source_values,
        vec![Value::real(100.0)]
    );
    assert_eq!(dependencies[1].dataset_name(), "Valves");
    assert!(dependencies[1].mappings.is_empty());
}

#[test]
fn schema_document_errors_name_the_problem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{ "datasets": [ { "name": "Pipes",
             "fields": [ { "name": "Material", "type": "LongInteger", "domain": "Materials" } ] } ] }"#,
    )
    .unwrap();
    let err = load_schema_provider(&path).unwrap_err();
    assert!(matches!(err, CodecError::Schema(_)));

    fs::write(&path, "{ not json").unwrap();
    let err = load_schema_provider(&path).unwrap_err();
    assert!(matches!(err, CodecError::Json { .. }));

    assert!(matches!(
        load_schema_provider(Path::new("/nonexistent/schema.json")).unwrap_err(),
        CodecError::FileRead { .. }
    ));
}
