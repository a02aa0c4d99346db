//! Per-respondent CVS risk scoring.
//!
//! The score has two parts, each capped at 50 points:
//!
//! - hours: `min(total daily screen hours * 10, 50)`, truncated;
//! - symptoms: 10 points for each of the five symptom questions answered
//!   "yes" or "sometimes" (case-insensitive).
//!
//! A malformed hours answer zeroes the hours part; an absent one counts as
//! zero hours.

use tracing::{debug, info};

use cvs_model::{
    CanonicalField, HoursOutcome, RecordSet, RiskAssessment, RiskLevel, SYMPTOM_FIELDS,
    ScoredRecord, SurveyRecord,
};

use crate::values::{ValueError, parse_hours};

pub const POINTS_PER_HOUR: f64 = 10.0;
pub const MAX_HOURS_POINTS: u32 = 50;
pub const POINTS_PER_SYMPTOM: u32 = 10;

/// True for "yes" or "sometimes", ignoring case and surrounding blanks.
pub fn symptom_reported(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("sometimes")
    })
}

/// True for "yes" only, ignoring case and surrounding blanks.
pub fn answered_yes(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("yes"))
}

/// Sums the academic and non-academic screen hours of one record.
pub fn total_hours(record: &SurveyRecord) -> HoursOutcome {
    let mut total = 0.0;
    for field in [CanonicalField::HoursAcademic, CanonicalField::HoursNonAcademic] {
        match parse_hours(record.get(field)) {
            Ok(hours) => total += hours,
            Err(ValueError::Absent) => {}
            Err(ValueError::Malformed { raw }) => {
                debug!(field = %field, "malformed hours value, hours contribution zeroed");
                return HoursOutcome::Zeroed { field, value: raw };
            }
        }
    }
    HoursOutcome::Counted { total_hours: total }
}

/// Scores one record.
pub fn assess(record: &SurveyRecord) -> RiskAssessment {
    let hours = total_hours(record);
    let hours_points = match &hours {
        HoursOutcome::Counted { total_hours } => {
            (total_hours * POINTS_PER_HOUR).min(f64::from(MAX_HOURS_POINTS)) as u32
        }
        HoursOutcome::Zeroed { .. } => 0,
    };

    let symptom_count = SYMPTOM_FIELDS
        .iter()
        .filter(|field| symptom_reported(record.get(**field)))
        .count() as u32;
    let symptom_points = symptom_count * POINTS_PER_SYMPTOM;

    let score = hours_points + symptom_points;
    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        hours_points,
        symptom_points,
        symptom_count,
        hours,
    }
}

/// Scores every record, keeping input order.
pub fn score_records(records: &RecordSet) -> Vec<ScoredRecord> {
    let scored: Vec<ScoredRecord> = records
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| ScoredRecord {
            index,
            record: record.clone(),
            assessment: assess(record),
        })
        .collect();

    let zeroed = scored
        .iter()
        .filter(|s| matches!(s.assessment.hours, HoursOutcome::Zeroed { .. }))
        .count();
    info!(record_count = scored.len(), zeroed_hours = zeroed, "records scored");
    scored
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn example_record() -> SurveyRecord {
        SurveyRecord::new()
            .with(CanonicalField::HoursAcademic, "2")
            .with(CanonicalField::HoursNonAcademic, "1")
            .with(CanonicalField::EyeStrain, "Yes")
            .with(CanonicalField::BlurryVision, "No")
            .with(CanonicalField::DryEyes, "Sometimes")
            .with(CanonicalField::Headaches, "No")
            .with(CanonicalField::NeckPain, "No")
    }

    #[test]
    fn example_scores_medium() {
        let assessment = assess(&example_record());
        assert_eq!(assessment.hours_points, 30);
        assert_eq!(assessment.symptom_points, 20);
        assert_eq!(assessment.score, 50);
        assert_eq!(assessment.level, RiskLevel::Medium);
    }

    #[test]
    fn malformed_hours_zero_the_sum() {
        let record = example_record()
            .with(CanonicalField::HoursAcademic, "abc")
            .with(CanonicalField::HoursNonAcademic, "5");
        let assessment = assess(&record);
        assert_eq!(assessment.hours_points, 0);
        assert_eq!(assessment.symptom_points, 20);
        assert_eq!(
            assessment.hours,
            HoursOutcome::Zeroed {
                field: CanonicalField::HoursAcademic,
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn absent_hours_count_as_zero() {
        let record = SurveyRecord::new().with(CanonicalField::HoursNonAcademic, "1.5");
        let assessment = assess(&record);
        assert_eq!(assessment.hours_points, 15);
        assert_eq!(assessment.hours, HoursOutcome::Counted { total_hours: 1.5 });
    }

    #[test]
    fn hours_points_are_capped() {
        let record = SurveyRecord::new()
            .with(CanonicalField::HoursAcademic, "8")
            .with(CanonicalField::HoursNonAcademic, "6");
        assert_eq!(assess(&record).hours_points, MAX_HOURS_POINTS);
    }

    #[test]
    fn empty_record_is_low() {
        let assessment = assess(&SurveyRecord::new());
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    fn symptom_answer() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("Yes".to_string())),
            Just(Some("yes".to_string())),
            Just(Some("Sometimes".to_string())),
            Just(Some("sometimes".to_string())),
            Just(Some("No".to_string())),
            "[a-z ]{0,12}".prop_map(Some),
        ]
    }

    fn hours_answer() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            (0.0f64..24.0).prop_map(|h| Some(format!("{h:.2}"))),
            (0u32..1000).prop_map(|h| Some(h.to_string())),
            "[a-z]{1,6}".prop_map(Some),
        ]
    }

    proptest! {
        #[test]
        fn score_stays_in_range(
            academic in hours_answer(),
            leisure in hours_answer(),
            symptoms in proptest::collection::vec(symptom_answer(), 5),
        ) {
            let mut record = SurveyRecord::new();
            if let Some(v) = academic {
                record.set(CanonicalField::HoursAcademic, v);
            }
            if let Some(v) = leisure {
                record.set(CanonicalField::HoursNonAcademic, v);
            }
            for (field, answer) in SYMPTOM_FIELDS.iter().zip(symptoms) {
                if let Some(v) = answer {
                    record.set(*field, v);
                }
            }
            let assessment = assess(&record);
            prop_assert!(assessment.score <= 100);
            prop_assert!(assessment.hours_points <= MAX_HOURS_POINTS);
            prop_assert_eq!(assessment.score, assessment.hours_points + assessment.symptom_points);
            prop_assert_eq!(assessment.level, RiskLevel::from_score(assessment.score));
        }

        #[test]
        fn each_reported_symptom_adds_ten(
            answers in proptest::collection::vec(symptom_answer(), 5),
        ) {
            let mut record = SurveyRecord::new();
            let mut expected = 0;
            for (field, answer) in SYMPTOM_FIELDS.iter().zip(answers) {
                if symptom_reported(answer.as_deref()) {
                    expected += POINTS_PER_SYMPTOM;
                }
                if let Some(v) = answer {
                    record.set(*field, v);
                }
            }
            prop_assert_eq!(assess(&record).symptom_points, expected);
            prop_assert_eq!(assess(&record).score, expected);
        }
    }
}
