use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use cvs_model::SourceTable;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Renames repeated headers to `name.1`, `name.2`, ... so every source
/// column stays addressable by name.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for header in headers {
        let count = seen.entry(header.clone()).or_insert(0);
        if *count == 0 {
            out.push(header);
        } else {
            let renamed = format!("{header}.{count}");
            warn!(column = %header, renamed = %renamed, "duplicate column header renamed");
            out.push(renamed);
        }
        *count += 1;
    }
    out
}

/// Reads a delimited survey export (one header row, one response per row).
pub fn read_csv_table(path: &Path) -> Result<SourceTable> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    read_records(reader, path)
}

/// Same as [`read_csv_table`] over an arbitrary reader; `origin` is only used
/// for error messages.
pub fn read_csv_from_reader<R: Read>(input: R, origin: &Path) -> Result<SourceTable> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    read_records(reader, origin)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>, origin: &Path) -> Result<SourceTable> {
    let mut header: Option<Vec<String>> = None;
    let mut table = SourceTable::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| IngestError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let Some(headers) = header.as_ref() else {
            let names: Vec<String> = record.iter().map(normalize_header).collect();
            header = Some(dedupe_headers(names));
            continue;
        };
        if record.len() > headers.len() {
            debug!(
                line = idx + 1,
                extra = record.len() - headers.len(),
                "row has more cells than headers, extra cells dropped"
            );
        }
        let row: Vec<String> = (0..headers.len())
            .map(|col| record.get(col).map(normalize_cell).unwrap_or_default())
            .collect();
        table.push_row(row);
    }
    let Some(headers) = header else {
        return Err(IngestError::MissingHeader {
            path: origin.to_path_buf(),
        });
    };
    table.headers = headers;
    debug!(
        path = %origin.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "csv table loaded"
    );
    Ok(table)
}
