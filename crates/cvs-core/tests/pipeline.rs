use anyhow::Result;

use cvs_core::{
    MappingOrigin, MappingResolver, SuggestionResolver, analyze, import_table,
};
use cvs_map::{MappingStore, MemoryStore};
use cvs_model::{CanonicalField, ColumnMapping, RiskLevel, SourceTable};

/// Resolver that must not be reached.
struct Unreachable;

impl MappingResolver for Unreachable {
    fn resolve(&mut self, _columns: &[String]) -> Result<ColumnMapping> {
        anyhow::bail!("resolver should not be called when a mapping is stored")
    }
}

fn form_export() -> SourceTable {
    let mut table = SourceTable::new(
        [
            "Timestamp",
            "How many hours do you spend on screens for academic purposes?",
            "How many hours do you spend on screens for non-academic activities?",
            "Which devices do you use most?",
            "How many breaks do you take per hour?",
            "Do you experience eye strain?",
            "Do you experience blurry vision?",
            "Do you experience dry eyes?",
            "Do you experience headaches?",
            "Do you experience neck or shoulder pain?",
        ]
        .map(String::from)
        .to_vec(),
    );
    table.push_row(
        ["2024/03/01 10:15", "2", "1", "Laptop", "2", "Yes", "No", "Sometimes", "No", "No"]
            .map(String::from)
            .to_vec(),
    );
    table.push_row(
        ["2024/03/01 10:20", "abc", "5", "Phone", "5+", "Yes", "Yes", "Yes", "Yes", "Yes"]
            .map(String::from)
            .to_vec(),
    );
    table.push_row(
        ["2024/03/01 10:31", "6", "4", "Phone", "", "No", "No", "No", "No", "No"]
            .map(String::from)
            .to_vec(),
    );
    table
}

#[test]
fn auto_mapped_import_is_saved_and_scored() {
    let table = form_export();
    let mut store = MemoryStore::new();
    let mut resolver = SuggestionResolver::default();

    let outcome = import_table(&table, &mut store, &mut resolver, true).expect("import");
    assert_eq!(outcome.origin, MappingOrigin::Resolved { saved: true });
    assert_eq!(store.load().unwrap(), Some(outcome.mapping.clone()));
    assert_eq!(
        outcome.mapping.target(&table.headers[1]),
        Some(CanonicalField::HoursAcademic)
    );
    assert_eq!(
        outcome.mapping.target(&table.headers[9]),
        Some(CanonicalField::NeckPain)
    );

    let analysis = analyze(&outcome.mapped.records);
    assert_eq!(analysis.respondents(), 3);

    let first = &analysis.scored[0];
    assert_eq!(first.identifier(), "2024/03/01 10:15");
    assert_eq!(first.score(), 50);
    assert_eq!(first.level(), RiskLevel::Medium);

    let second = &analysis.scored[1];
    assert_eq!(second.assessment.hours_points, 0);
    assert_eq!(second.score(), 50);

    let third = &analysis.scored[2];
    assert_eq!(third.score(), 50);
    assert_eq!(third.assessment.symptom_points, 0);

    assert_eq!(analysis.summary.risk_count(RiskLevel::Medium), 3);
    assert_eq!(
        analysis.summary.average_lines(),
        vec!["Average hours not available".to_string()]
    );

    let devices = analysis.charts.devices.as_ref().expect("devices chart");
    assert_eq!(devices[0].label, "Phone");
    assert_eq!(devices[0].count, 2);

    let breaks = analysis.charts.breaks.as_ref().expect("breaks chart");
    assert_eq!(breaks.points.len(), 3);
    assert_eq!(breaks.points[1].breaks, 5);
    assert_eq!(breaks.points[1].symptoms, 5);
    assert_eq!(breaks.points[2].breaks, 0);
}

#[test]
fn stored_mapping_skips_resolver() {
    let table = form_export();
    let mut mapping = ColumnMapping::new();
    mapping.insert("Timestamp", CanonicalField::Timestamp).unwrap();
    let mut store = MemoryStore::with_mapping(mapping);

    let outcome = import_table(&table, &mut store, &mut Unreachable, true).expect("import");
    assert_eq!(outcome.origin, MappingOrigin::Stored);
    assert_eq!(outcome.mapped.records.columns, vec![CanonicalField::Timestamp]);
    assert_eq!(outcome.mapped.unmapped_columns.len(), 9);

    let analysis = analyze(&outcome.mapped.records);
    assert!(analysis.charts.devices.is_none());
    assert!(analysis.charts.breaks.is_none());
    assert!(analysis.scored.iter().all(|s| s.score() == 0));
}

#[test]
fn unsaved_mapping_still_applies() {
    let table = form_export();
    let mut store = MemoryStore::new();
    let mut resolver = SuggestionResolver::default();

    let outcome = import_table(&table, &mut store, &mut resolver, false).expect("import");
    assert_eq!(outcome.origin, MappingOrigin::Resolved { saved: false });
    assert!(store.load().unwrap().is_none());
    assert!(outcome.mapped.records.has_column(CanonicalField::EyeStrain));
}
