use std::path::Path;

use cvs_core::analyze;
use cvs_model::{CanonicalField, RecordSet, SurveyRecord};
use cvs_report::{ReportOptions, generate_report, summary_lines};

fn survey(rows: usize) -> RecordSet {
    let mut set = RecordSet::new([
        CanonicalField::Timestamp,
        CanonicalField::HoursAcademic,
        CanonicalField::HoursNonAcademic,
        CanonicalField::Devices,
        CanonicalField::BreakFrequency,
        CanonicalField::EyeStrain,
        CanonicalField::Headaches,
    ]);
    for idx in 0..rows {
        set.push(
            SurveyRecord::new()
                .with(CanonicalField::Timestamp, format!("2024/03/01 10:{:02}", idx % 60))
                .with(CanonicalField::HoursAcademic, "2")
                .with(CanonicalField::HoursNonAcademic, "1.5")
                .with(
                    CanonicalField::Devices,
                    if idx % 3 == 0 { "Laptop" } else { "Phone" },
                )
                .with(CanonicalField::BreakFrequency, (idx % 4).to_string())
                .with(CanonicalField::EyeStrain, "Yes")
                .with(CanonicalField::Headaches, "Sometimes"),
        );
    }
    set
}

fn page_count(path: &Path) -> usize {
    lopdf::Document::load(path)
        .expect("reload report")
        .get_pages()
        .len()
}

#[test]
fn report_has_summary_and_chart_pages() {
    let dir = tempfile::tempdir().expect("temp dir");
    let analysis = analyze(&survey(4));
    let options = ReportOptions::new(dir.path().join("CVS_Report.pdf"));

    let output = generate_report(&analysis, &options).expect("generate report");
    assert_eq!(output.pages, 4);
    assert!(output.chart_files.is_empty());
    assert_eq!(page_count(&output.path), 4);
}

#[test]
fn summary_page_text_is_written() {
    let dir = tempfile::tempdir().expect("temp dir");
    let analysis = analyze(&survey(4));
    let options = ReportOptions::new(dir.path().join("CVS_Report.pdf"));

    let output = generate_report(&analysis, &options).expect("generate report");
    let doc = lopdf::Document::load(&output.path).expect("reload report");
    let text = doc.extract_text(&[1]).expect("page 1 text");
    assert!(text.contains("Computer Vision Syndrome Survey Report"));
    assert!(text.contains("Summary Statistics:"));
    assert!(text.contains("Total Respondents: 4"));
    assert!(text.contains("Student Risk Summary:"));
    assert!(text.contains("2024/03/01 10:00: Score=55, Risk=Medium"));
    assert!(!text.contains("Symptoms Chart"));

    let chart_text = doc.extract_text(&[2]).expect("page 2 text");
    assert!(chart_text.contains("Symptoms Chart"));
}

#[test]
fn risk_lines_continue_on_extra_pages() {
    let dir = tempfile::tempdir().expect("temp dir");
    let analysis = analyze(&survey(120));
    let options = ReportOptions::new(dir.path().join("out").join("report.pdf"));

    let output = generate_report(&analysis, &options).expect("generate report");
    assert!(output.pages > 4, "expected continuation pages, got {}", output.pages);
    assert_eq!(page_count(&output.path), output.pages);
}

#[test]
fn chart_pngs_written_when_configured() {
    let dir = tempfile::tempdir().expect("temp dir");
    let analysis = analyze(&survey(3));
    let charts_dir = dir.path().join("charts");
    let options = ReportOptions::new(dir.path().join("report.pdf"))
        .with_charts_dir(Some(charts_dir.clone()));

    let output = generate_report(&analysis, &options).expect("generate report");
    let names: Vec<String> = output
        .chart_files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(
        names,
        vec!["symptoms_chart.png", "devices_chart.png", "breaks_chart.png"]
    );
    assert!(output.chart_files.iter().all(|p| p.starts_with(&charts_dir) && p.exists()));
}

#[test]
fn missing_columns_drop_optional_charts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut set = RecordSet::new([CanonicalField::EyeStrain]);
    set.push(SurveyRecord::new().with(CanonicalField::EyeStrain, "No"));
    let analysis = analyze(&set);

    let output = generate_report(&analysis, &ReportOptions::new(dir.path().join("r.pdf")))
        .expect("generate report");
    assert_eq!(output.pages, 2);
    insta::assert_snapshot!(summary_lines(&analysis).join("\n"), @r"
    Total Respondents: 1
    Average hours not available
    Low Risk: 1
    Medium Risk: 0
    High Risk: 0
    ");
}

#[test]
fn unwritable_output_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").expect("write blocker");
    let analysis = analyze(&survey(1));

    let err = generate_report(&analysis, &ReportOptions::new(blocker.join("report.pdf")))
        .unwrap_err();
    assert!(format!("{err:#}").contains("report"));
}
