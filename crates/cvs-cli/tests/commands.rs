use std::fs;
use std::io::Cursor;
use std::path::Path;

use lopdf::Document;
use tempfile::TempDir;

use cvs_cli::commands::{run_entry, run_import, run_mapping_reset, run_mapping_show};
use cvs_cli::prompt::TerminalPrompter;
use cvs_cli::settings::RunConfig;
use cvs_core::{InteractiveResolver, SuggestionResolver};
use cvs_map::{JsonFileStore, MappingStore};
use cvs_model::CanonicalField;

fn config_in(dir: &Path) -> RunConfig {
    RunConfig {
        mapping_file: dir.join("mapping.json"),
        output: dir.join("out").join("report.pdf"),
        charts_dir: None,
        title: "Test Survey".to_string(),
    }
}

fn write_csv(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("responses.csv");
    fs::write(&path, content).unwrap();
    path
}

const CANONICAL_EXPORT: &str = "\
timestamp,hours_academic,hours_non_academic,devices,break_frequency,eye_strain,blurry_vision,dry_eyes,headaches,neck_pain
2024/03/01 10:15,2,1,Laptop,2,Yes,No,Sometimes,No,No
2024/03/01 10:20,abc,5,Phone,5+,Yes,Yes,Yes,Yes,Yes
2024/03/01 10:31,6,4,Phone,,No,No,No,No,No
";

fn pdf_pages(path: &Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}

#[test]
fn auto_mapped_import_saves_mapping_and_writes_report() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let csv = write_csv(dir.path(), CANONICAL_EXPORT);
    let mut output = Vec::new();

    let report = run_import(
        &config,
        &csv,
        &mut SuggestionResolver::default(),
        true,
        &mut output,
    )
    .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Mapping saved:"));
    assert!(text.contains("Data Preview"));
    assert!(text.contains("Risk Summary"));
    assert!(text.contains("PDF report generated:"));

    let mapping = JsonFileStore::new(&config.mapping_file)
        .load()
        .unwrap()
        .expect("mapping saved");
    assert_eq!(mapping.len(), 10);
    assert_eq!(mapping.target("neck_pain"), Some(CanonicalField::NeckPain));

    assert_eq!(report.path, config.output);
    assert_eq!(report.pages, 4);
    assert_eq!(pdf_pages(&config.output), 4);
}

#[test]
fn second_import_reuses_saved_mapping() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let csv = write_csv(dir.path(), CANONICAL_EXPORT);

    run_import(
        &config,
        &csv,
        &mut SuggestionResolver::default(),
        true,
        &mut Vec::new(),
    )
    .unwrap();

    let mut output = Vec::new();
    run_import(
        &config,
        &csv,
        &mut SuggestionResolver::default(),
        true,
        &mut output,
    )
    .unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Using saved mapping:"));
}

#[test]
fn unsaved_mapping_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let csv = write_csv(dir.path(), CANONICAL_EXPORT);
    let mut output = Vec::new();

    run_import(
        &config,
        &csv,
        &mut SuggestionResolver::default(),
        false,
        &mut output,
    )
    .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Mapping applied for this run only (not saved)"));
    assert!(!config.mapping_file.exists());
}

#[test]
fn terminal_mapping_drives_import() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let csv = write_csv(
        dir.path(),
        "When,Academic screen time,Favourite colour\n2024/03/01,6,Blue\n",
    );
    // Column 1 for the timestamp, then Enter for every remaining field.
    let answers = format!("1\n{}", "\n".repeat(CanonicalField::ALL.len()));
    let mut resolver = InteractiveResolver::new(TerminalPrompter::new(
        Cursor::new(answers.into_bytes()),
        Vec::new(),
    ));
    let mut output = Vec::new();

    let report = run_import(&config, &csv, &mut resolver, true, &mut output).unwrap();

    let mapping = JsonFileStore::new(&config.mapping_file)
        .load()
        .unwrap()
        .expect("mapping saved");
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.target("When"), Some(CanonicalField::Timestamp));
    assert_eq!(
        mapping.target("Academic screen time"),
        Some(CanonicalField::HoursAcademic)
    );

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Dropped 1 unmapped column(s)"));
    assert_eq!(report.pages, 2);

    let (_, prompts) = resolver.into_inner().into_inner();
    let prompts = String::from_utf8(prompts).unwrap();
    assert!(prompts.contains("Timestamp (timestamp)"));
    assert!(prompts.contains("[Enter = Academic screen time]"));
}

#[test]
fn terminal_mapping_fails_when_input_ends() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let csv = write_csv(dir.path(), "When,Academic screen time\n2024/03/01,6\n");
    let mut resolver =
        InteractiveResolver::new(TerminalPrompter::new(Cursor::new(b"1\n".to_vec()), Vec::new()));

    let err = run_import(&config, &csv, &mut resolver, true, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("input ended"));
    assert!(!config.mapping_file.exists());
    assert!(!config.output.exists());
}

#[test]
fn entry_from_assignments_writes_report() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let assignments = vec![
        "timestamp=Alex".to_string(),
        "hours_academic=4".to_string(),
        "eye_strain=yes".to_string(),
    ];
    let mut output = Vec::new();

    let report = run_entry(&config, &assignments, &mut Cursor::new(Vec::new()), &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Alex"));
    assert!(text.contains("Medium"));
    assert_eq!(pdf_pages(&report.path), report.pages);
}

#[test]
fn entry_prompts_when_no_assignments() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    // Answers for the first three fields; input then ends.
    let mut input = Cursor::new(b"2024/03/01\nyes\n18-20\n".to_vec());
    let mut output = Vec::new();

    run_entry(&config, &[], &mut input, &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Timestamp [timestamp]: "));
    assert!(config.output.exists());
}

#[test]
fn entry_rejects_unknown_field() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let assignments = vec!["favourite_colour=blue".to_string()];

    let result = run_entry(&config, &assignments, &mut Cursor::new(Vec::new()), &mut Vec::new());
    assert!(result.is_err());
    assert!(!config.output.exists());
}

#[test]
fn mapping_show_and_reset() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());

    let mut output = Vec::new();
    run_mapping_show(&config, &mut output).unwrap();
    assert!(String::from_utf8(output).unwrap().contains("No saved mapping"));

    let csv = write_csv(dir.path(), CANONICAL_EXPORT);
    run_import(
        &config,
        &csv,
        &mut SuggestionResolver::default(),
        true,
        &mut Vec::new(),
    )
    .unwrap();

    let mut output = Vec::new();
    run_mapping_show(&config, &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("hours_non_academic"));

    let mut output = Vec::new();
    run_mapping_reset(&config, &mut output).unwrap();
    assert!(String::from_utf8(output).unwrap().contains("Mapping reset:"));
    assert!(!config.mapping_file.exists());
}
