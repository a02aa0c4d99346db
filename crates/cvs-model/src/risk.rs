//! Risk scoring result types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::SurveyRecord;
use crate::schema::CanonicalField;

/// Three-tier risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lower bound (inclusive) of the Medium tier.
    pub const MEDIUM_THRESHOLD: u32 = 30;
    /// Lower bound (inclusive) of the High tier.
    pub const HIGH_THRESHOLD: u32 = 60;

    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Classifies a score: `[0, 30)` Low, `[30, 60)` Medium, `[60, ..)` High.
    pub fn from_score(score: u32) -> Self {
        if score < Self::MEDIUM_THRESHOLD {
            RiskLevel::Low
        } else if score < Self::HIGH_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(format!("Unknown risk level: {s}")),
        }
    }
}

/// How the screen-hours part of the score was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoursOutcome {
    /// Both terms parsed (absent terms count as zero hours).
    Counted { total_hours: f64 },
    /// A term was malformed, so the whole hours contribution is zero.
    Zeroed {
        field: CanonicalField,
        value: String,
    },
}

/// Score breakdown for one respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub level: RiskLevel,
    pub hours_points: u32,
    pub symptom_points: u32,
    pub symptom_count: u32,
    pub hours: HoursOutcome,
}

/// A canonical record together with its (immutable) risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// 0-based position in the input.
    pub index: usize,
    pub record: SurveyRecord,
    pub assessment: RiskAssessment,
}

impl ScoredRecord {
    /// The respondent label used in reports: the timestamp, or `Row N`.
    pub fn identifier(&self) -> String {
        match self.record.get(CanonicalField::Timestamp) {
            Some(timestamp) => timestamp.trim().to_string(),
            None => format!("Row {}", self.index + 1),
        }
    }

    pub fn score(&self) -> u32 {
        self.assessment.score
    }

    pub fn level(&self) -> RiskLevel {
        self.assessment.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(59), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn identifier_falls_back_to_row_number() {
        let assessment = RiskAssessment {
            score: 0,
            level: RiskLevel::Low,
            hours_points: 0,
            symptom_points: 0,
            symptom_count: 0,
            hours: HoursOutcome::Counted { total_hours: 0.0 },
        };
        let anonymous = ScoredRecord {
            index: 4,
            record: SurveyRecord::new(),
            assessment: assessment.clone(),
        };
        assert_eq!(anonymous.identifier(), "Row 5");

        let stamped = ScoredRecord {
            index: 0,
            record: SurveyRecord::new().with(CanonicalField::Timestamp, "2024/03/01 10:15"),
            assessment,
        };
        assert_eq!(stamped.identifier(), "2024/03/01 10:15");
    }
}
