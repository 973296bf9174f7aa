//! Tests for rule set editing and lookup.

use attrdep_model::{
    Attribute, AttributeDependency, AttributeValueMapping, DatasetRef, FieldType, ModelError,
    Side, Value,
};

fn dependency() -> AttributeDependency {
    let mut dependency = AttributeDependency::new(DatasetRef::new("Pipes"));
    dependency
        .add_source_attribute(Attribute::new("Material", FieldType::LongInteger))
        .unwrap();
    dependency
        .add_source_attribute(Attribute::new("Diameter", FieldType::Double))
        .unwrap();
    dependency
        .add_target_attribute(Attribute::new("Status", FieldType::Text))
        .unwrap();
    dependency
}

fn mapping(material: Value, diameter: Value, status: &str) -> AttributeValueMapping {
    AttributeValueMapping::new(vec![material, diameter], vec![Value::text(status)])
}

#[test]
fn duplicate_attribute_names_are_rejected_per_side() {
    let mut dependency = dependency();
    let err = dependency
        .add_source_attribute(Attribute::new("MATERIAL", FieldType::LongInteger))
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::DuplicateAttribute {
            side: Side::Source,
            name: "MATERIAL".to_string()
        }
    );

    // The same field may appear on the other side.
    dependency
        .add_target_attribute(Attribute::new("Material", FieldType::LongInteger))
        .unwrap();
}

#[test]
fn attribute_changes_clear_mappings() {
    let mut dependency = dependency();
    dependency
        .add_mapping(mapping(Value::integer(1), Value::real(100.0), "OK"))
        .unwrap();
    assert_eq!(dependency.mappings.len(), 1);

    dependency.remove_source_attribute("diameter").unwrap();
    assert!(dependency.mappings.is_empty());
    assert_eq!(dependency.source_attributes.len(), 1);

    let err = dependency.remove_target_attribute("Missing").unwrap_err();
    assert!(matches!(err, ModelError::AttributeNotFound { side: Side::Target, .. }));
}

#[test]
fn add_mapping_checks_arity() {
    let mut dependency = dependency();
    let err = dependency
        .add_mapping(AttributeValueMapping::new(
            vec![Value::integer(1)],
            vec![Value::text("OK")],
        ))
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::ArityMismatch {
            side: Side::Source,
            expected: 2,
            actual: 1
        }
    );
    assert!(dependency.mappings.is_empty());
}

#[test]
fn replace_mappings_is_all_or_nothing() {
    let mut dependency = dependency();
    dependency
        .add_mapping(mapping(Value::integer(1), Value::real(100.0), "OK"))
        .unwrap();

    let bad = vec![
        mapping(Value::integer(2), Value::real(50.0), "OK"),
        AttributeValueMapping::new(vec![Value::integer(3), Value::Null], vec![]),
    ];
    assert!(dependency.replace_mappings(bad).is_err());
    assert_eq!(dependency.mappings.len(), 1);

    let good = vec![
        mapping(Value::integer(2), Value::real(50.0), "OK"),
        mapping(Value::integer(3), Value::Null, "Unknown"),
    ];
    dependency.replace_mappings(good).unwrap();
    assert_eq!(dependency.mappings.len(), 2);
}

#[test]
fn attribute_index_prefers_exact_then_source() {
    let mut dependency = dependency();
    dependency
        .add_target_attribute(Attribute::new("material", FieldType::LongInteger))
        .unwrap();

    assert_eq!(dependency.attribute_index("Material"), Some((Side::Source, 0)));
    assert_eq!(dependency.attribute_index("material"), Some((Side::Target, 1)));
    assert_eq!(dependency.attribute_index("MATERIAL"), Some((Side::Source, 0)));
    assert_eq!(dependency.attribute_index("status"), Some((Side::Target, 0)));
    assert_eq!(dependency.attribute_index("Length"), None);
}

#[test]
fn lookup_unifies_wildcards_and_last_rule_wins() {
    let mut dependency = dependency();
    dependency
        .add_mapping(mapping(Value::integer(1), Value::Wildcard, "Any"))
        .unwrap();
    dependency
        .add_mapping(mapping(Value::integer(1), Value::real(100.0), "Exact"))
        .unwrap();
    dependency
        .add_mapping(mapping(Value::integer(2), Value::real(100.0), "PVC"))
        .unwrap();

    let found = dependency
        .lookup(&[Value::integer(1), Value::integer(100)])
        .unwrap();
    assert_eq!(found.target_values, vec![Value::text("Exact")]);

    let found = dependency
        .lookup(&[Value::integer(1), Value::real(20.0)])
        .unwrap();
    assert_eq!(found.target_values, vec![Value::text("Any")]);

    assert!(dependency.lookup(&[Value::integer(3), Value::real(1.0)]).is_none());
}

#[test]
fn dependency_json_uses_value_list_text() {
    let mut dependency = dependency();
    dependency
        .add_mapping(
            mapping(Value::integer(1), Value::Wildcard, "OK").with_description("any diameter"),
        )
        .unwrap();

    let json = serde_json::to_value(&dependency).unwrap();
    assert_eq!(json["mappings"][0]["source"], "1, *");
    assert_eq!(json["mappings"][0]["target"], "\"OK\"");
    assert_eq!(json["mappings"][0]["description"], "any diameter");

    let mut restored: AttributeDependency = serde_json::from_value(json).unwrap();
    restored.convert_mapping_values();
    assert_eq!(restored, dependency);
}
