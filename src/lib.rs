// Library target shared by the `wordpace` binary, integration tests and
// criterion benchmarks.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod session;
pub mod store;

pub use engine::alignment::normalize_typed_words;
pub use engine::history::{ProblematicWord, aggregate_slow_sequences, find_problematic_words};
pub use engine::ngram_stats::{SequenceTiming, compute_sequence_timings};
pub use error::{Error, Result};
pub use session::clock::{Clock, ManualClock, MonotonicClock};
pub use session::input::{Key, KeystrokeEvent};
pub use session::result::TestResult;
pub use session::state::{Session, SessionStatus};
