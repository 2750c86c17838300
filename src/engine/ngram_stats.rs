use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::input::{Key, KeystrokeEvent};

/// Visible stand-in for a space when a sequence is shown to a user.
pub const SPACE_PLACEHOLDER: char = '␣';

// ---------------------------------------------------------------------------
// SequenceTiming
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceTiming {
    pub sequence: String,
    pub occurrences: usize,
    pub average_time: f64,
}

/// Running (sum, count) per sequence that remembers first-seen order, so a
/// stable sort on the average breaks ties in favour of the earliest sequence.
#[derive(Debug, Default)]
pub(crate) struct SequenceAccumulator {
    index: HashMap<String, usize>,
    totals: Vec<(String, f64, usize)>,
}

impl SequenceAccumulator {
    pub(crate) fn add(&mut self, sequence: &str, total_time_ms: f64, occurrences: usize) {
        match self.index.get(sequence) {
            Some(&i) => {
                let entry = &mut self.totals[i];
                entry.1 += total_time_ms;
                entry.2 += occurrences;
            }
            None => {
                self.index.insert(sequence.to_string(), self.totals.len());
                self.totals
                    .push((sequence.to_string(), total_time_ms, occurrences));
            }
        }
    }

    /// Averages every entry with at least `min_occurrences`, slowest first.
    pub(crate) fn ranked(self, min_occurrences: usize) -> Vec<SequenceTiming> {
        let mut timings: Vec<SequenceTiming> = self
            .totals
            .into_iter()
            .filter(|(_, _, count)| *count > 0 && *count >= min_occurrences)
            .map(|(sequence, sum, count)| SequenceTiming {
                sequence,
                occurrences: count,
                average_time: sum / count as f64,
            })
            .collect();
        timings.sort_by(|a, b| {
            b.average_time
                .partial_cmp(&a.average_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        timings
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Rebuilds each word's final forward-typed characters with their timestamps.
///
/// A character typed at `char_index` i replaces anything at or after i, and a
/// backspace truncates to its recorded post-removal length, so corrections
/// leave only the surviving keystrokes. Space and Tab close the word and are
/// not part of it.
fn word_timelines(keystrokes: &[KeystrokeEvent]) -> BTreeMap<usize, Vec<(char, f64)>> {
    let mut timelines: BTreeMap<usize, Vec<(char, f64)>> = BTreeMap::new();
    for event in keystrokes {
        match event.key {
            Key::Char(ch) => {
                let timeline = timelines.entry(event.word_index).or_default();
                timeline.truncate(event.char_index);
                timeline.push((ch, event.timestamp_ms));
            }
            Key::Backspace => {
                if let Some(timeline) = timelines.get_mut(&event.word_index) {
                    timeline.truncate(event.char_index);
                }
            }
            Key::Space | Key::Tab => {}
        }
    }
    timelines
}

pub(crate) fn accumulate_sequences<S: AsRef<str>>(
    keystrokes: &[KeystrokeEvent],
    target_words: &[S],
    n: usize,
    acc: &mut SequenceAccumulator,
) {
    for (word_index, timeline) in word_timelines(keystrokes) {
        let Some(target) = target_words.get(word_index) else {
            continue;
        };
        let typed: String = timeline.iter().map(|(ch, _)| *ch).collect();
        if typed != target.as_ref() {
            continue;
        }

        for window in timeline.windows(n) {
            let sequence: String = window.iter().map(|(ch, _)| *ch).collect();
            let elapsed = window[n - 1].1 - window[0].1;
            acc.add(&sequence, elapsed, 1);
        }
    }
}

/// Slowest `n`-character sequences within correctly typed words.
///
/// Only words whose reconstructed keystrokes exactly equal their target word
/// are measured. Each occurrence's time is the last character's timestamp
/// minus the first's. Results are ordered by descending average time, ties in
/// first-seen order, and capped at `max_results`. Returns an empty list when
/// there is nothing to measure.
pub fn compute_sequence_timings<S: AsRef<str>>(
    keystrokes: &[KeystrokeEvent],
    target_words: &[S],
    n: usize,
    max_results: usize,
) -> Result<Vec<SequenceTiming>> {
    if !(2..=3).contains(&n) {
        return Err(Error::InvalidSequenceLength(n));
    }

    let mut acc = SequenceAccumulator::default();
    accumulate_sequences(keystrokes, target_words, n, &mut acc);

    let mut timings = acc.ranked(1);
    timings.truncate(max_results);
    Ok(timings)
}

/// Renders a sequence for display, making spaces visible.
pub fn display_sequence(sequence: &str) -> String {
    sequence.replace(' ', &SPACE_PLACEHOLDER.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
