use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Characters per "word" for rate purposes, trailing space included.
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub correct: usize,
    pub incorrect: usize,
    pub total_typed: usize,
    pub accuracy: u32,
}

/// Word-level accuracy over aligned sequences.
///
/// Both slices are expected to come from `normalize_typed_words`, so they have
/// the same length. Otherwise only the overlapping prefix is scored.
///
/// A slot is correct only on an exact, case-sensitive match with a non-empty
/// typed word. Empty slots count as incorrect but not as typed. Accuracy is
/// 100 when nothing was typed.
pub fn compute_accuracy<S: AsRef<str>>(target_words: &[S], typed_words: &[String]) -> AccuracyStats {
    let mut stats = AccuracyStats::default();
    for (target, typed) in target_words.iter().zip(typed_words) {
        if !typed.is_empty() {
            stats.total_typed += 1;
        }
        if !typed.is_empty() && typed == target.as_ref() {
            stats.correct += 1;
        } else {
            stats.incorrect += 1;
        }
    }

    stats.accuracy = if stats.total_typed == 0 {
        100
    } else {
        (stats.correct as f64 / stats.total_typed as f64 * 100.0).round() as u32
    };
    stats
}

/// Words per minute over the configured duration.
///
/// Each attempted word contributes its length plus one for the implied
/// space; empty slots contribute nothing.
pub fn compute_wpm(typed_words: &[String], duration_secs: f64) -> Result<u32> {
    if duration_secs.is_nan() || duration_secs <= 0.0 {
        return Err(Error::InvalidDuration(duration_secs));
    }
    let chars: usize = typed_words
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| w.chars().count() + 1)
        .sum();
    let minutes = duration_secs / 60.0;
    Ok(((chars as f64 / CHARS_PER_WORD) / minutes).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_wpm_reference_example() {
        let typed = words("the quick");
        assert_eq!(compute_wpm(&typed, 12.0).unwrap(), 10);
    }

    #[test]
    fn test_wpm_ignores_empty_slots() {
        let typed = vec!["the".to_string(), String::new(), "quick".to_string()];
        assert_eq!(compute_wpm(&typed, 12.0).unwrap(), 10);
    }

    #[test]
    fn test_wpm_zero_when_nothing_typed() {
        let typed = vec![String::new(), String::new()];
        assert_eq!(compute_wpm(&typed, 30.0).unwrap(), 0);
    }

    #[test]
    fn test_wpm_rejects_non_positive_duration() {
        let typed = words("hello");
        assert_eq!(compute_wpm(&typed, 0.0), Err(Error::InvalidDuration(0.0)));
        assert_eq!(compute_wpm(&typed, -3.0), Err(Error::InvalidDuration(-3.0)));
        assert!(compute_wpm(&typed, f64::NAN).is_err());
    }

    #[test]
    fn test_accuracy_all_correct() {
        let target = words("the quick brown");
        let stats = compute_accuracy(&target, &target.clone());
        assert_eq!(stats.correct, 3);
        assert_eq!(stats.incorrect, 0);
        assert_eq!(stats.total_typed, 3);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_accuracy_is_case_and_punctuation_sensitive() {
        let target = words("Hello, world.");
        let typed = words("hello, world");
        let stats = compute_accuracy(&target, &typed);
        assert_eq!(stats.correct, 0);
        assert_eq!(stats.incorrect, 2);
        assert_eq!(stats.accuracy, 0);
    }

    #[test]
    fn test_accuracy_untyped_slots_are_incorrect_not_typed() {
        let target = words("one two three");
        let typed = vec!["one".to_string(), "twp".to_string(), String::new()];
        let stats = compute_accuracy(&target, &typed);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.incorrect, 2);
        assert_eq!(stats.total_typed, 2);
        assert_eq!(stats.accuracy, 50);
    }

    #[test]
    fn test_accuracy_defaults_to_100_with_nothing_typed() {
        let target = words("one two");
        let typed = vec![String::new(), String::new()];
        let stats = compute_accuracy(&target, &typed);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.incorrect, 2);
    }

    #[test]
    fn test_accuracy_scores_only_the_overlap_of_unaligned_input() {
        let target = words("one two three");
        let stats = compute_accuracy(&target, &words("one"));
        assert_eq!((stats.correct, stats.incorrect, stats.total_typed), (1, 0, 1));

        let aligned = crate::engine::alignment::normalize_typed_words(&target, &words("one"));
        let stats = compute_accuracy(&target, &aligned);
        assert_eq!((stats.correct, stats.incorrect, stats.total_typed), (1, 2, 1));
    }

    #[test]
    fn test_accuracy_rounds() {
        let target = words("a b c");
        let typed = words("a b x");
        assert_eq!(compute_accuracy(&target, &typed).accuracy, 67);
    }
}
