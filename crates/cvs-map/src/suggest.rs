//! Fuzzy suggestions for mapping form questions to canonical fields.
//!
//! A column scores against a field by two signals:
//! - Jaro-Winkler similarity between the normalized header and the field
//!   name or label, kept only for near-exact headers (>= 0.9);
//! - keyword coverage: the share of the field's keyword groups that have
//!   at least one alternative among the header's tokens.
//!
//! Headers containing one of the field's exclusion tokens are halved, so
//! "hours for non-academic use" does not suggest `hours_academic`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rapidfuzz::distance::jaro_winkler;

use cvs_model::{CanonicalField, ColumnMapping};

use crate::utils::{normalize_text, token_set};

/// Default minimum confidence for a suggestion to be offered.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.75;

const NAME_SIMILARITY_FLOOR: f32 = 0.9;
const EXCLUSION_PENALTY: f32 = 0.5;

/// A suggested mapping from a source column to a canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// Source column name.
    pub source_column: String,
    /// Target canonical field.
    pub field: CanonicalField,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
}

/// Keyword groups and exclusion tokens of a canonical field.
///
/// Each group lists `|`-separated alternatives.
struct FieldProfile {
    groups: &'static [&'static str],
    excludes: &'static [&'static str],
}

fn profile(field: CanonicalField) -> FieldProfile {
    use CanonicalField as F;
    let (groups, excludes): (&'static [&'static str], &'static [&'static str]) = match field {
        F::Timestamp => (&["timestamp|date|submitted|submission"], &[]),
        F::Consent => (&["consent|agree|permission"], &[]),
        F::AgeGroup => (&["age", "group|range|bracket"], &[]),
        F::Age => (&["age|old"], &["group", "range", "bracket"]),
        F::Sex => (&["sex|gender"], &[]),
        F::GradeLevel => (&["grade|level|class"], &["eye", "screen"]),
        F::HoursAcademic => (
            &[
                "hours|hour|time",
                "academic|school|study|studies|schoolwork|homework",
            ],
            &["non", "nonacademic", "leisure", "entertainment"],
        ),
        F::HoursNonAcademic => (
            &[
                "hours|hour|time",
                "non|nonacademic|leisure|entertainment|recreational|personal|gaming",
            ],
            &[],
        ),
        F::Devices => (&["device|devices|gadget|gadgets"], &[]),
        F::BreakFrequency => (&["break|breaks"], &[]),
        F::ScreenTools => (
            &["filter|filters|glasses|protector|tool|tools"],
            &["details", "specify", "which", "describe"],
        ),
        F::ScreenToolsDetails => (
            &[
                "filter|filters|glasses|protector|tool|tools",
                "details|specify|which|describe|type",
            ],
            &[],
        ),
        F::EyeStrain => (&["eye|eyes", "strain|tired|fatigue"], &[]),
        F::BlurryVision => (&["blurry|blurred|blur"], &[]),
        F::DryEyes => (&["dry|dryness"], &[]),
        F::Headaches => (&["headache|headaches"], &[]),
        F::NeckPain => (&["neck|shoulder"], &[]),
        F::SymptomsWorse => (&["symptoms|symptom", "worse|worsen|increase"], &[]),
        F::Lighting => (&["lighting|light|brightness"], &["blue"]),
        F::Posture => (&["posture|sitting|position"], &[]),
        F::TwentyRule => (&["20|twenty", "rule"], &[]),
        F::EyeLevelScreen => (&["eye", "level|height"], &[]),
        F::VisitedSpecialist => (
            &["specialist|optometrist|ophthalmologist|doctor|checkup|visited"],
            &[],
        ),
        F::ImpactSchoolwork => (
            &[
                "impact|affect|affected|affects",
                "school|schoolwork|academic|performance|studies",
            ],
            &[],
        ),
        F::MitigationMeasures => (&["measures|mitigation|reduce|prevent|prevention"], &[]),
        F::SchoolSupportOpinion => (&["support", "opinion|think|should|school"], &[]),
    };
    FieldProfile { groups, excludes }
}

/// Scores one source column against one canonical field.
pub fn score_column(column: &str, field: CanonicalField) -> f32 {
    let normalized = normalize_text(column);
    let name_sim =
        jaro_winkler::similarity(normalized.chars(), normalize_text(field.as_str()).chars()) as f32;
    let label_sim =
        jaro_winkler::similarity(normalized.chars(), normalize_text(field.label()).chars()) as f32;
    let similarity = name_sim.max(label_sim);
    let similarity = if similarity >= NAME_SIMILARITY_FLOOR {
        similarity
    } else {
        0.0
    };

    let tokens = token_set(column);
    let profile = profile(field);
    let coverage = keyword_coverage(&tokens, profile.groups);

    let mut score = similarity.max(coverage);
    if profile.excludes.iter().any(|token| tokens.contains(*token)) {
        score *= EXCLUSION_PENALTY;
    }
    score.clamp(0.0, 1.0)
}

fn keyword_coverage(tokens: &BTreeSet<String>, groups: &[&str]) -> f32 {
    if groups.is_empty() {
        return 0.0;
    }
    let hits = groups
        .iter()
        .filter(|group| group.split('|').any(|alt| tokens.contains(alt)))
        .count();
    hits as f32 / groups.len() as f32
}

/// Suggests best one-to-one mappings for all canonical fields.
///
/// Uses greedy assignment by descending score; ties go to the earlier
/// field in schema order, then the earlier column. Each column and field
/// is assigned at most once.
pub fn suggest_mapping(columns: &[String], min_confidence: f32) -> Vec<Suggestion> {
    let mut candidates: Vec<(usize, CanonicalField, f32)> = Vec::new();
    for field in CanonicalField::ALL {
        for (idx, column) in columns.iter().enumerate() {
            let score = score_column(column, field);
            if score >= min_confidence {
                candidates.push((idx, field, score));
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
            .then(a.0.cmp(&b.0))
    });

    let mut assigned_columns = BTreeSet::new();
    let mut assigned_fields = BTreeSet::new();
    let mut suggestions = Vec::new();
    for (idx, field, confidence) in candidates {
        if assigned_columns.contains(&idx) || assigned_fields.contains(&field) {
            continue;
        }
        assigned_columns.insert(idx);
        assigned_fields.insert(field);
        suggestions.push(Suggestion {
            source_column: columns[idx].clone(),
            field,
            confidence,
        });
    }
    suggestions.sort_by_key(|s| s.field);
    suggestions
}

/// Collects suggestions into a mapping.
pub fn suggestions_to_mapping(suggestions: &[Suggestion]) -> cvs_model::Result<ColumnMapping> {
    let mut mapping = ColumnMapping::new();
    for suggestion in suggestions {
        mapping.insert(suggestion.source_column.clone(), suggestion.field)?;
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_name_scores_full() {
        assert_eq!(score_column("eye_strain", CanonicalField::EyeStrain), 1.0);
        assert_eq!(score_column("Sex", CanonicalField::Sex), 1.0);
    }

    #[test]
    fn exclusion_halves_score() {
        let column = "How many hours do you spend on screens for non-academic activities?";
        assert_eq!(score_column(column, CanonicalField::HoursNonAcademic), 1.0);
        assert_eq!(score_column(column, CanonicalField::HoursAcademic), 0.5);
    }

    #[test]
    fn partial_keyword_coverage() {
        assert_eq!(score_column("Age group", CanonicalField::AgeGroup), 1.0);
        assert_eq!(score_column("Age group", CanonicalField::Age), 0.5);
    }
}
