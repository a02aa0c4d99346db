//! Tests for cvs-model types.

use cvs_model::{CanonicalField, ColumnMapping, ModelError, RiskLevel, SurveyRecord};

#[test]
fn mapping_serializes_as_flat_object() {
    let mut mapping = ColumnMapping::new();
    mapping
        .insert("How many hours for school?", CanonicalField::HoursAcademic)
        .unwrap();
    mapping.insert("Timestamp", CanonicalField::Timestamp).unwrap();

    let json = serde_json::to_string(&mapping).expect("serialize mapping");
    assert_eq!(
        json,
        r#"{"How many hours for school?":"hours_academic","Timestamp":"timestamp"}"#
    );

    let round: ColumnMapping = serde_json::from_str(&json).expect("deserialize mapping");
    assert_eq!(round, mapping);
}

#[test]
fn mapping_rejects_unknown_field_names() {
    let result = serde_json::from_str::<ColumnMapping>(r#"{"Q1":"shoe_size"}"#);
    assert!(result.is_err());
}

#[test]
fn mapping_rejects_duplicate_targets_on_load() {
    let result = serde_json::from_str::<ColumnMapping>(r#"{"Q1":"age","Q2":"age"}"#);
    let err = result.expect_err("duplicate target must be rejected");
    assert!(err.to_string().contains("already mapped"));
}

#[test]
fn unknown_field_error_names_the_input() {
    let err = "favourite_colour".parse::<CanonicalField>().unwrap_err();
    assert_eq!(err, ModelError::UnknownField("favourite_colour".to_string()));
}

#[test]
fn record_iterates_in_schema_order() {
    let record = SurveyRecord::new()
        .with(CanonicalField::NeckPain, "No")
        .with(CanonicalField::Timestamp, "t1")
        .with(CanonicalField::Devices, "Laptop");
    let fields: Vec<CanonicalField> = record.iter().map(|(field, _)| field).collect();
    assert_eq!(
        fields,
        vec![
            CanonicalField::Timestamp,
            CanonicalField::Devices,
            CanonicalField::NeckPain
        ]
    );
}

#[test]
fn risk_level_parses_case_insensitively() {
    assert_eq!("medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
    assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
    assert!("severe".parse::<RiskLevel>().is_err());
}
