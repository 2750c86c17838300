use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::alignment::normalize_typed_words;
use crate::engine::ngram_stats::{SequenceTiming, compute_sequence_timings};
use crate::engine::scoring::{compute_accuracy, compute_wpm};
use crate::error::Result;
use crate::session::clock::Clock;
use crate::session::input::KeystrokeEvent;
use crate::session::state::Session;

/// Scored outcome of one finished session. `typed_words` is always aligned
/// to `target_words`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub duration_secs: f64,
    #[serde(default)]
    pub elapsed_secs: f64,
    pub content_id: String,
    pub target_words: Vec<String>,
    pub typed_words: Vec<String>,
    pub wpm: u32,
    pub accuracy: u32,
    pub correct_words: usize,
    pub incorrect_words: usize,
    pub total_typed: usize,
    pub total_words: usize,
    pub keystrokes: Vec<KeystrokeEvent>,
}

impl TestResult {
    pub(crate) fn from_session<C: Clock>(
        session: &Session<C>,
        typed_words: Vec<String>,
        end_ms: f64,
    ) -> Result<Self> {
        let target_words = session.target_words().to_vec();
        let aligned = normalize_typed_words(&target_words, &typed_words);
        let wpm = compute_wpm(&aligned, session.duration_secs())?;
        let accuracy = compute_accuracy(&target_words, &aligned);
        let elapsed_secs = session
            .start_time_ms()
            .map(|start| (end_ms - start) / 1000.0)
            .unwrap_or(0.0);

        Ok(Self {
            id: session.id(),
            created_at: Utc::now(),
            duration_secs: session.duration_secs(),
            elapsed_secs,
            content_id: session.content_id().to_string(),
            total_words: target_words.len(),
            target_words,
            typed_words: aligned,
            wpm,
            accuracy: accuracy.accuracy,
            correct_words: accuracy.correct,
            incorrect_words: accuracy.incorrect,
            total_typed: accuracy.total_typed,
            keystrokes: session.keystrokes().to_vec(),
        })
    }

    /// Slowest sequences of this session alone.
    pub fn sequence_timings(&self, n: usize, max_results: usize) -> Result<Vec<SequenceTiming>> {
        compute_sequence_timings(&self.keystrokes, &self.target_words, n, max_results)
    }

    /// Aligned `(target, typed)` pairs that do not match.
    pub fn mistyped_words(&self) -> impl Iterator<Item = (&str, &str)> {
        self.target_words
            .iter()
            .zip(&self.typed_words)
            .filter(|(target, typed)| target != typed)
            .map(|(target, typed)| (target.as_str(), typed.as_str()))
    }
}
