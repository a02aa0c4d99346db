#![deny(unsafe_code)]

pub mod error;
pub mod mapping;
pub mod record;
pub mod risk;
pub mod schema;

pub use error::{ModelError, Result};
pub use mapping::ColumnMapping;
pub use record::{RecordSet, SourceTable, SurveyRecord};
pub use risk::{HoursOutcome, RiskAssessment, RiskLevel, ScoredRecord};
pub use schema::{CanonicalField, SYMPTOM_FIELDS};
