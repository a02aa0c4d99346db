#![deny(unsafe_code)]

pub mod apply;
pub mod builder;
pub mod error;
pub mod store;
pub mod suggest;
pub mod utils;

pub use apply::{MappedTable, apply_mapping};
pub use builder::{
    FieldChoice, MAX_ATTEMPTS_PER_FIELD, MappingBuilder, MappingPrompter, build_interactively,
};
pub use error::MappingError;
pub use store::{DEFAULT_MAPPING_FILE, JsonFileStore, MappingStore, MemoryStore};
pub use suggest::{
    DEFAULT_MIN_CONFIDENCE, Suggestion, score_column, suggest_mapping, suggestions_to_mapping,
};
pub use utils::normalize_text;
