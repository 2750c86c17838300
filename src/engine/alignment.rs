/// Aligns typed words to the target positionally.
///
/// The output always has exactly `target_words.len()` entries: the first
/// `min(N, M)` typed words in order, then empty strings for untyped slots.
/// Typed words past the end of the target are dropped from the aligned view.
pub fn normalize_typed_words<S: AsRef<str>>(target_words: &[S], typed_words: &[String]) -> Vec<String> {
    let mut aligned: Vec<String> = typed_words
        .iter()
        .take(target_words.len())
        .cloned()
        .collect();
    aligned.resize(target_words.len(), String::new());
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_equal_lengths_unchanged() {
        let target = words("the quick fox");
        let typed = words("the quikc fox");
        assert_eq!(normalize_typed_words(&target, &typed), typed);
    }

    #[test]
    fn test_short_input_padded_with_empty() {
        let target = words("one two three four");
        let typed = words("one two");
        let aligned = normalize_typed_words(&target, &typed);
        assert_eq!(aligned, vec!["one", "two", "", ""]);
    }

    #[test]
    fn test_extra_input_truncated() {
        let target = words("a b");
        let typed = words("a b c d");
        assert_eq!(normalize_typed_words(&target, &typed), vec!["a", "b"]);
    }

    #[test]
    fn test_skipped_empty_word_kept_in_position() {
        let target = words("alpha beta gamma");
        let typed = vec!["alpha".to_string(), String::new(), "gamma".to_string()];
        let aligned = normalize_typed_words(&target, &typed);
        assert_eq!(aligned[1], "");
        assert_eq!(aligned[2], "gamma");
    }

    #[test]
    fn test_length_always_matches_target() {
        let target = words("w1 w2 w3 w4 w5");
        for m in 0..9 {
            let typed: Vec<String> = (0..m).map(|i| format!("x{i}")).collect();
            assert_eq!(normalize_typed_words(&target, &typed).len(), target.len());
        }
    }

    #[test]
    fn test_empty_target_yields_empty() {
        let target: Vec<String> = Vec::new();
        assert!(normalize_typed_words(&target, &words("stray")).is_empty());
    }
}
