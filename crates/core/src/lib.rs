#![forbid(unsafe_code)]

pub mod model;
pub mod random;
pub mod randomizer;
pub mod selection;
pub mod stats;
pub mod summary;

pub use random::RandomSource;
pub use randomizer::{MalformedQuestion, present};
pub use selection::{SESSION_SIZE, SelectionBuilder, SelectionPlan, SelectionPolicy};
pub use stats::{Stats, StatsError, StatsRecord};
pub use summary::{QuestionStatsRow, StatsSummary, question_breakdown, summarize};
