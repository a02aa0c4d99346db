//! Console tables.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cvs_map::Suggestion;
use cvs_model::{CanonicalField, ColumnMapping, RecordSet, RiskLevel, ScoredRecord};

/// Rows shown in the data preview.
pub const PREVIEW_ROWS: usize = 5;

/// First records of the canonical view, one column per mapped field.
pub fn preview_table(records: &RecordSet, limit: usize) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(records.columns.iter().map(|field| header_cell(field.as_str())));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for (idx, record) in records.records.iter().take(limit).enumerate() {
        let mut row = vec![Cell::new(idx + 1)];
        row.extend(records.columns.iter().map(|field| match record.get(*field) {
            Some(value) => Cell::new(value),
            None => dim_cell("-"),
        }));
        table.add_row(row);
    }
    table
}

/// Identifier, score and level of every respondent.
pub fn risk_table(scored: &[ScoredRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Respondent"),
        header_cell("Score"),
        header_cell("Risk"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for record in scored {
        table.add_row(vec![
            Cell::new(record.identifier()),
            Cell::new(record.score()),
            level_cell(record.level()),
        ]);
    }
    table
}

/// Source column to canonical field, in schema order.
pub fn mapping_table(mapping: &ColumnMapping) -> Table {
    let mut entries: Vec<(&str, CanonicalField)> = mapping.iter().collect();
    entries.sort_by_key(|(_, field)| *field);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Source column")]);
    apply_table_style(&mut table);
    for (source, field) in entries {
        table.add_row(vec![Cell::new(field.as_str()), Cell::new(source)]);
    }
    table
}

/// Suggested mapping with confidence.
pub fn suggestion_table(suggestions: &[Suggestion]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Source column"),
        header_cell("Confidence"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for suggestion in suggestions {
        table.add_row(vec![
            Cell::new(suggestion.field.as_str()),
            Cell::new(&suggestion.source_column),
            Cell::new(format!("{:.0}%", suggestion.confidence * 100.0)),
        ]);
    }
    table
}

/// The canonical schema with prompt labels.
pub fn fields_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Question"),
        header_cell("Symptom"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in CanonicalField::ALL {
        table.add_row(vec![
            Cell::new(field.position() + 1),
            Cell::new(field.as_str()).fg(Color::Cyan),
            Cell::new(field.label()),
            if field.is_symptom() {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("-")
            },
        ]);
    }
    table
}

fn level_cell(level: RiskLevel) -> Cell {
    let color = match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    };
    Cell::new(level).fg(color).add_attribute(Attribute::Bold)
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(text: T) -> Cell {
    Cell::new(text.to_string()).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
