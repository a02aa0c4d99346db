//! Line-oriented prompts for manual entry and interactive mapping.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::{debug, trace};

use cvs_ingest::FormEntry;
use cvs_map::{FieldChoice, MappingError, MappingPrompter};
use cvs_model::CanonicalField;

use crate::logging::redact_value;

/// Reads one line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Asks for every canonical field in schema order; blank answers leave the
/// field absent. Input ending early leaves the remaining fields absent.
pub fn prompt_form<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<FormEntry> {
    let mut entry = FormEntry::new();
    writeln!(output, "Enter one survey response (leave blank to skip a question).")?;
    for field in CanonicalField::ALL {
        write!(output, "{} [{}]: ", field.label(), field.as_str())?;
        output.flush()?;
        let Some(answer) = read_line(input)? else {
            writeln!(output)?;
            break;
        };
        trace!(field = %field, value = redact_value(&answer), "form answer");
        entry.set(field, answer);
    }
    Ok(entry)
}

/// Interactive mapping over a text terminal.
///
/// Answers: a column number, the exact column name, `s` to skip, or an empty
/// line to accept the suggested column (skip when there is none).
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn print_options(
        &mut self,
        field: CanonicalField,
        columns: &[String],
        suggested: Option<&str>,
    ) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{} ({})", field.label(), field.as_str())?;
        for (idx, column) in columns.iter().enumerate() {
            let marker = if Some(column.as_str()) == suggested {
                " *"
            } else {
                ""
            };
            writeln!(self.output, "  {:>2}) {column}{marker}", idx + 1)?;
        }
        match suggested {
            Some(column) => write!(
                self.output,
                "Column number, name, or s to skip [Enter = {column}]: "
            )?,
            None => write!(self.output, "Column number, name, or s to skip [Enter = skip]: ")?,
        }
        self.output.flush()?;
        Ok(())
    }
}

/// Interprets one answer; `None` when it names no column.
pub fn parse_choice(answer: &str, columns: &[String], suggested: Option<&str>) -> Option<FieldChoice> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Some(match suggested {
            Some(column) => FieldChoice::Column(column.to_string()),
            None => FieldChoice::Skip,
        });
    }
    if answer.eq_ignore_ascii_case("s") || answer.eq_ignore_ascii_case("skip") {
        return Some(FieldChoice::Skip);
    }
    if let Ok(number) = answer.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|idx| columns.get(idx))
            .map(|column| FieldChoice::Column(column.clone()));
    }
    columns
        .iter()
        .find(|column| column.as_str() == answer)
        .map(|column| FieldChoice::Column(column.clone()))
}

impl<R: BufRead, W: Write> MappingPrompter for TerminalPrompter<R, W> {
    fn choose(
        &mut self,
        field: CanonicalField,
        columns: &[String],
        suggested: Option<&str>,
    ) -> Result<FieldChoice> {
        self.print_options(field, columns, suggested)?;
        loop {
            let Some(answer) = read_line(&mut self.input)? else {
                bail!("input ended before the mapping was complete");
            };
            if let Some(choice) = parse_choice(&answer, columns, suggested) {
                return Ok(choice);
            }
            write!(self.output, "Not a column, try again: ")?;
            self.output.flush()?;
        }
    }

    fn rejected(&mut self, field: CanonicalField, error: &MappingError) {
        if let Err(write_error) = writeln!(self.output, "{error}. Choose another column.") {
            debug!(field = %field, error = %write_error, "could not show rejection");
        }
    }
}
