#![deny(unsafe_code)]

pub mod charts;
pub mod pipeline;
pub mod risk;
pub mod stats;
pub mod values;

pub use charts::{
    BreakPoint, BreakSeries, ChartKind, ChartSet, DeviceUsage, SymptomFrequency, build_chart_set,
};
pub use pipeline::{
    Analysis, ImportOutcome, InteractiveResolver, MappingOrigin, MappingResolver,
    SuggestionResolver, analyze, import_table,
};
pub use risk::{assess, score_records};
pub use stats::{HOURS_UNAVAILABLE, StatError, SummaryStatistics, mean_hours};
pub use values::{ValueError, parse_break_frequency, parse_hours};
