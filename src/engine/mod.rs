pub mod alignment;
pub mod history;
pub mod ngram_stats;
pub mod scoring;

pub use ngram_stats::{SequenceTiming, display_sequence};
