pub mod evaluation;
pub mod training_stats;

pub use evaluation::EvaluationSummary;
pub use training_stats::{EpisodeRecord, TrainingStats};
