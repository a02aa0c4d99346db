//! Typed parsing of free-text survey answers.

use thiserror::Error;

/// Why a survey answer could not be used as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("value is absent")]
    Absent,
    #[error("malformed value")]
    Malformed { raw: String },
}

impl ValueError {
    pub fn is_absent(&self) -> bool {
        matches!(self, ValueError::Absent)
    }
}

/// Parses a daily screen-hours answer.
///
/// Accepts finite, non-negative decimal numbers with surrounding blanks.
pub fn parse_hours(value: Option<&str>) -> Result<f64, ValueError> {
    let raw = present(value)?;
    match raw.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= 0.0 => Ok(hours),
        _ => Err(ValueError::Malformed {
            raw: raw.to_string(),
        }),
    }
}

/// Parses a break-frequency answer such as `"3"`, `"5+"` or `"2 times"`.
///
/// The `+` and `times` markers are removed before parsing a whole number.
/// Negative counts are malformed.
pub fn parse_break_frequency(value: Option<&str>) -> Result<u32, ValueError> {
    let raw = present(value)?;
    let cleaned = raw.replace('+', "").replace("times", "");
    cleaned
        .trim()
        .parse::<u32>()
        .map_err(|_| ValueError::Malformed {
            raw: raw.to_string(),
        })
}

fn present(value: Option<&str>) -> Result<&str, ValueError> {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(raw),
        _ => Err(ValueError::Absent),
    }
}
