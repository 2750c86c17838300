use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::session::clock::{Clock, MonotonicClock};
use crate::session::input::{Key, KeystrokeEvent};
use crate::session::result::TestResult;

/// Lifecycle of one typing test: `Idle -> Active -> Complete`, with `Failed`
/// as an externally triggered terminal state reachable from `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Active,
    Complete,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Complete | SessionStatus::Failed)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Active => "active",
            SessionStatus::Complete => "complete",
            SessionStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Live state of a typing test.
///
/// The session is owned by whoever drives input; every mutation takes
/// `&mut self`, so keystrokes are applied one at a time. Input arriving in the
/// wrong state is dropped and reported by a `false` return, never an error.
pub struct Session<C: Clock = MonotonicClock> {
    clock: C,
    id: Uuid,
    target_words: Vec<String>,
    duration_secs: f64,
    content_id: String,
    current_word_index: usize,
    current_input: String,
    completed_words: Vec<String>,
    keystrokes: Vec<KeystrokeEvent>,
    status: SessionStatus,
    start_time_ms: Option<f64>,
    end_time_ms: Option<f64>,
}

impl Session<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for Session<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            id: Uuid::new_v4(),
            target_words: Vec::new(),
            duration_secs: 0.0,
            content_id: String::new(),
            current_word_index: 0,
            current_input: String::new(),
            completed_words: Vec::new(),
            keystrokes: Vec::new(),
            status: SessionStatus::Idle,
            start_time_ms: None,
            end_time_ms: None,
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Prepares a fresh test, discarding whatever the session held.
    ///
    /// Refused while a test is active. Configuration is validated before any
    /// field changes.
    pub fn initialize(
        &mut self,
        target_words: Vec<String>,
        duration_secs: f64,
        content_id: impl Into<String>,
    ) -> Result<()> {
        if self.status == SessionStatus::Active {
            return Err(Error::InvalidTransition {
                operation: "initialize",
                status: self.status,
            });
        }
        if duration_secs.is_nan() || duration_secs <= 0.0 {
            return Err(Error::InvalidDuration(duration_secs));
        }
        if target_words.is_empty() {
            return Err(Error::EmptyTargetWords);
        }
        if let Some(word) = target_words
            .iter()
            .find(|w| w.is_empty() || w.chars().any(char::is_whitespace))
        {
            return Err(Error::InvalidTargetWord(word.clone()));
        }

        self.reset();
        self.target_words = target_words;
        self.duration_secs = duration_secs;
        self.content_id = content_id.into();
        tracing::debug!(
            session_id = %self.id,
            words = self.target_words.len(),
            duration_secs,
            "session initialized"
        );
        Ok(())
    }

    /// Starts the clock. Only the first call from an initialized idle session
    /// has any effect.
    pub fn start(&mut self) -> bool {
        if self.status != SessionStatus::Idle || self.target_words.is_empty() {
            return false;
        }
        self.start_time_ms = Some(self.clock.now_ms());
        self.status = SessionStatus::Active;
        tracing::debug!(session_id = %self.id, "session started");
        true
    }

    /// Types one character. A space commits the current word; a space on an
    /// empty word is dropped.
    pub fn handle_character(&mut self, ch: char) -> bool {
        if !self.accepts_input() {
            tracing::debug!(session_id = %self.id, status = %self.status, "dropped keystroke");
            return false;
        }

        if ch == ' ' {
            if self.current_input.is_empty() {
                return false;
            }
            self.commit_word(Key::Space);
            return true;
        }

        let char_index = self.current_input.chars().count();
        self.record(Key::Char(ch), char_index);
        self.current_input.push(ch);
        true
    }

    /// Removes the last character of the current word. Backspacing into a
    /// committed word is not supported.
    pub fn handle_backspace(&mut self) -> bool {
        if !self.accepts_input() || self.current_input.is_empty() {
            return false;
        }
        self.current_input.pop();
        let char_index = self.current_input.chars().count();
        self.record(Key::Backspace, char_index);
        true
    }

    /// Commits the current input as-is, even when empty, and moves on.
    pub fn handle_skip(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.commit_word(Key::Tab);
        true
    }

    /// Finishes the test and returns its scored result.
    ///
    /// Any trailing partial word is counted. The keystroke log is frozen from
    /// here on.
    pub fn complete(&mut self) -> Result<TestResult> {
        if self.status != SessionStatus::Active {
            return Err(Error::InvalidTransition {
                operation: "complete",
                status: self.status,
            });
        }

        let mut typed_words = self.completed_words.clone();
        if !self.current_input.is_empty() {
            typed_words.push(self.current_input.clone());
        }
        let end_ms = self.clock.now_ms();
        let result = TestResult::from_session(self, typed_words.clone(), end_ms)?;

        self.completed_words = typed_words;
        self.current_input.clear();
        self.end_time_ms = Some(end_ms);
        self.status = SessionStatus::Complete;
        tracing::info!(
            session_id = %self.id,
            wpm = result.wpm,
            accuracy = result.accuracy,
            keystrokes = self.keystrokes.len(),
            "session complete"
        );
        Ok(result)
    }

    /// Moves an active session to `Failed`, keeping its keystroke log.
    pub fn fail(&mut self) -> Result<()> {
        if self.status != SessionStatus::Active {
            return Err(Error::InvalidTransition {
                operation: "fail",
                status: self.status,
            });
        }
        self.end_time_ms = Some(self.clock.now_ms());
        self.status = SessionStatus::Failed;
        tracing::debug!(session_id = %self.id, "session failed");
        Ok(())
    }

    /// Back to the never-initialized state. Nothing is produced.
    pub fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.target_words.clear();
        self.duration_secs = 0.0;
        self.content_id.clear();
        self.current_word_index = 0;
        self.current_input.clear();
        self.completed_words.clear();
        self.keystrokes.clear();
        self.status = SessionStatus::Idle;
        self.start_time_ms = None;
        self.end_time_ms = None;
    }

    fn accepts_input(&self) -> bool {
        self.status == SessionStatus::Active && self.start_time_ms.is_some()
    }

    fn record(&mut self, key: Key, char_index: usize) {
        self.keystrokes.push(KeystrokeEvent {
            timestamp_ms: self.clock.now_ms(),
            key,
            word_index: self.current_word_index,
            char_index,
        });
    }

    fn commit_word(&mut self, key: Key) {
        let char_index = self.current_input.chars().count();
        self.record(key, char_index);
        self.completed_words
            .push(std::mem::take(&mut self.current_input));
        self.current_word_index += 1;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn target_words(&self) -> &[String] {
        &self.target_words
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn current_word_index(&self) -> usize {
        self.current_word_index
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn completed_words(&self) -> &[String] {
        &self.completed_words
    }

    pub fn keystrokes(&self) -> &[KeystrokeEvent] {
        &self.keystrokes
    }

    pub fn start_time_ms(&self) -> Option<f64> {
        self.start_time_ms
    }

    pub fn end_time_ms(&self) -> Option<f64> {
        self.end_time_ms
    }

    /// The word currently being typed, if the target has not run out.
    pub fn current_target(&self) -> Option<&str> {
        self.target_words
            .get(self.current_word_index)
            .map(String::as_str)
    }

    /// Whether the partial input is still on track for the current word.
    pub fn is_current_input_prefix(&self) -> bool {
        self.current_target()
            .is_some_and(|target| target.starts_with(self.current_input.as_str()))
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.start_time_ms, self.end_time_ms) {
            (Some(start), Some(end)) => (end - start) / 1000.0,
            (Some(start), None) => (self.clock.now_ms() - start) / 1000.0,
            _ => 0.0,
        }
    }

    pub fn remaining_secs(&self) -> f64 {
        (self.duration_secs - self.elapsed_secs()).max(0.0)
    }

    /// True once an active test has used up its duration.
    pub fn is_time_up(&self) -> bool {
        self.status == SessionStatus::Active && self.elapsed_secs() >= self.duration_secs
    }

    /// True once every target word has been committed.
    pub fn all_words_committed(&self) -> bool {
        !self.target_words.is_empty() && self.current_word_index >= self.target_words.len()
    }
}
