//! The canonical survey schema.
//!
//! Every respondent record, whatever its source, is normalized to these
//! 26 fields. The declaration order is significant: it drives the manual
//! entry form, the interactive mapping prompts and record ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// One field of the canonical survey schema.
///
/// Serialized as its snake_case name (e.g. `hours_non_academic`), which is
/// also the name used in persisted column mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Timestamp,
    Consent,
    AgeGroup,
    Age,
    Sex,
    GradeLevel,
    HoursAcademic,
    HoursNonAcademic,
    Devices,
    BreakFrequency,
    ScreenTools,
    ScreenToolsDetails,
    EyeStrain,
    BlurryVision,
    DryEyes,
    Headaches,
    NeckPain,
    SymptomsWorse,
    Lighting,
    Posture,
    TwentyRule,
    EyeLevelScreen,
    VisitedSpecialist,
    ImpactSchoolwork,
    MitigationMeasures,
    SchoolSupportOpinion,
}

/// The five symptom questions counted by the risk score.
pub const SYMPTOM_FIELDS: [CanonicalField; 5] = [
    CanonicalField::EyeStrain,
    CanonicalField::BlurryVision,
    CanonicalField::DryEyes,
    CanonicalField::Headaches,
    CanonicalField::NeckPain,
];

impl CanonicalField {
    /// All fields in schema order.
    pub const ALL: [CanonicalField; 26] = [
        CanonicalField::Timestamp,
        CanonicalField::Consent,
        CanonicalField::AgeGroup,
        CanonicalField::Age,
        CanonicalField::Sex,
        CanonicalField::GradeLevel,
        CanonicalField::HoursAcademic,
        CanonicalField::HoursNonAcademic,
        CanonicalField::Devices,
        CanonicalField::BreakFrequency,
        CanonicalField::ScreenTools,
        CanonicalField::ScreenToolsDetails,
        CanonicalField::EyeStrain,
        CanonicalField::BlurryVision,
        CanonicalField::DryEyes,
        CanonicalField::Headaches,
        CanonicalField::NeckPain,
        CanonicalField::SymptomsWorse,
        CanonicalField::Lighting,
        CanonicalField::Posture,
        CanonicalField::TwentyRule,
        CanonicalField::EyeLevelScreen,
        CanonicalField::VisitedSpecialist,
        CanonicalField::ImpactSchoolwork,
        CanonicalField::MitigationMeasures,
        CanonicalField::SchoolSupportOpinion,
    ];

    /// Returns the canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Timestamp => "timestamp",
            CanonicalField::Consent => "consent",
            CanonicalField::AgeGroup => "age_group",
            CanonicalField::Age => "age",
            CanonicalField::Sex => "sex",
            CanonicalField::GradeLevel => "grade_level",
            CanonicalField::HoursAcademic => "hours_academic",
            CanonicalField::HoursNonAcademic => "hours_non_academic",
            CanonicalField::Devices => "devices",
            CanonicalField::BreakFrequency => "break_frequency",
            CanonicalField::ScreenTools => "screen_tools",
            CanonicalField::ScreenToolsDetails => "screen_tools_details",
            CanonicalField::EyeStrain => "eye_strain",
            CanonicalField::BlurryVision => "blurry_vision",
            CanonicalField::DryEyes => "dry_eyes",
            CanonicalField::Headaches => "headaches",
            CanonicalField::NeckPain => "neck_pain",
            CanonicalField::SymptomsWorse => "symptoms_worse",
            CanonicalField::Lighting => "lighting",
            CanonicalField::Posture => "posture",
            CanonicalField::TwentyRule => "twenty_rule",
            CanonicalField::EyeLevelScreen => "eye_level_screen",
            CanonicalField::VisitedSpecialist => "visited_specialist",
            CanonicalField::ImpactSchoolwork => "impact_schoolwork",
            CanonicalField::MitigationMeasures => "mitigation_measures",
            CanonicalField::SchoolSupportOpinion => "school_support_opinion",
        }
    }

    /// Human-readable question shown when prompting for this field.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::Timestamp => "Timestamp",
            CanonicalField::Consent => "Consent to participate",
            CanonicalField::AgeGroup => "Age group",
            CanonicalField::Age => "Age",
            CanonicalField::Sex => "Sex",
            CanonicalField::GradeLevel => "Grade level",
            CanonicalField::HoursAcademic => "Daily screen hours for academic work",
            CanonicalField::HoursNonAcademic => "Daily screen hours for non-academic use",
            CanonicalField::Devices => "Devices used most often",
            CanonicalField::BreakFrequency => "Breaks taken per hour of screen use",
            CanonicalField::ScreenTools => "Uses screen protection tools",
            CanonicalField::ScreenToolsDetails => "Screen tool details",
            CanonicalField::EyeStrain => "Eye strain",
            CanonicalField::BlurryVision => "Blurry vision",
            CanonicalField::DryEyes => "Dry eyes",
            CanonicalField::Headaches => "Headaches",
            CanonicalField::NeckPain => "Neck or shoulder pain",
            CanonicalField::SymptomsWorse => "Symptoms worse after long screen use",
            CanonicalField::Lighting => "Lighting conditions",
            CanonicalField::Posture => "Posture while using screens",
            CanonicalField::TwentyRule => "Follows the 20-20-20 rule",
            CanonicalField::EyeLevelScreen => "Screen at eye level",
            CanonicalField::VisitedSpecialist => "Visited an eye specialist",
            CanonicalField::ImpactSchoolwork => "Impact on schoolwork",
            CanonicalField::MitigationMeasures => "Mitigation measures used",
            CanonicalField::SchoolSupportOpinion => "Opinion on school support",
        }
    }

    /// Position of this field in the schema (0-based).
    pub fn position(&self) -> usize {
        *self as usize
    }

    /// Returns true for the five symptom questions.
    pub fn is_symptom(&self) -> bool {
        SYMPTOM_FIELDS.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    /// Parses a canonical name. Case and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CanonicalField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_are_in_declaration_order() {
        for (idx, field) in CanonicalField::ALL.iter().enumerate() {
            assert_eq!(field.position(), idx);
        }
        assert_eq!(CanonicalField::ALL.len(), 26);
    }

    #[test]
    fn parse_accepts_canonical_names() {
        assert_eq!(
            "hours_non_academic".parse::<CanonicalField>().unwrap(),
            CanonicalField::HoursNonAcademic
        );
        assert_eq!(
            " Eye_Strain ".parse::<CanonicalField>().unwrap(),
            CanonicalField::EyeStrain
        );
        assert!("eyes".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for field in CanonicalField::ALL {
            assert_eq!(field.as_str().parse::<CanonicalField>().unwrap(), field);
        }
    }

    #[test]
    fn symptom_fields_are_flagged() {
        assert!(CanonicalField::NeckPain.is_symptom());
        assert!(!CanonicalField::SymptomsWorse.is_symptom());
    }
}
