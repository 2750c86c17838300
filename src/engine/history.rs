use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::ngram_stats::{SequenceAccumulator, SequenceTiming, accumulate_sequences};
use crate::session::result::TestResult;

/// Per-result cap applied before merging, kept generous so little is lost.
const PER_RESULT_CAP: usize = 50;
/// Sequences seen fewer times than this across all history are noise.
const MIN_SEQUENCE_OCCURRENCES: usize = 3;
/// A word mistyped only once is not considered problematic.
const MIN_MISTAKES: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblematicWord {
    pub word: String,
    pub count: usize,
}

fn capped_timings(result: &TestResult, n: usize) -> Vec<SequenceTiming> {
    let mut acc = SequenceAccumulator::default();
    accumulate_sequences(&result.keystrokes, &result.target_words, n, &mut acc);
    let mut timings = acc.ranked(1);
    timings.truncate(PER_RESULT_CAP);
    timings
}

/// Slowest character sequences across every stored result, as bare strings.
///
/// Each result contributes its own capped 2- and 3-character timings; the
/// (sum, count) totals are merged, sequences with fewer than three total
/// occurrences are dropped, and the `limit` slowest averages are returned.
pub fn aggregate_slow_sequences(results: &[TestResult], limit: usize) -> Vec<String> {
    let mut merged = SequenceAccumulator::default();
    for result in results {
        for n in [2, 3] {
            for timing in capped_timings(result, n) {
                merged.add(
                    &timing.sequence,
                    timing.average_time * timing.occurrences as f64,
                    timing.occurrences,
                );
            }
        }
    }

    let ranked = merged.ranked(MIN_SEQUENCE_OCCURRENCES);
    tracing::debug!(
        results = results.len(),
        sequences = ranked.len(),
        "aggregated slow sequences"
    );
    ranked
        .into_iter()
        .take(limit)
        .map(|t| t.sequence)
        .collect()
}

/// Target words mistyped at least twice across all results, most frequent first.
///
/// Mistakes are bucketed by word text regardless of position or session.
pub fn find_problematic_words(results: &[TestResult]) -> Vec<ProblematicWord> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ProblematicWord> = Vec::new();

    for result in results {
        for (target, _) in result.mistyped_words() {
            match index.get(target) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(target, counts.len());
                    counts.push(ProblematicWord {
                        word: target.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.retain(|w| w.count >= MIN_MISTAKES);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
