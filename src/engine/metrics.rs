use std::time::Instant;

/// Percentage of typed characters that match the target at the same
/// position, floored. An empty input is 100% accurate.
pub fn accuracy(typed: &[char], target: &[char]) -> u32 {
    if typed.is_empty() {
        return 100;
    }
    let correct = correct_prefix_count(typed, target);
    (correct * 100 / typed.len()) as u32
}

/// Positions where `typed[i] == target[i]`, over the overlap of both.
pub fn correct_prefix_count(typed: &[char], target: &[char]) -> usize {
    typed
        .iter()
        .zip(target.iter())
        .filter(|(t, e)| t == e)
        .count()
}

/// Whole-text words per minute: the target's word count over the elapsed
/// minutes, rounded. Zero when typing never started or no time passed.
pub fn wpm(target: &str, started_at: Option<Instant>, finished_at: Instant) -> u32 {
    let Some(start) = started_at else {
        return 0;
    };
    let Some(elapsed) = finished_at.checked_duration_since(start) else {
        return 0;
    };
    wpm_for_secs(word_count(target), elapsed.as_secs_f64())
}

pub fn wpm_for_secs(words: usize, elapsed_secs: f64) -> u32 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    let minutes = elapsed_secs / 60.0;
    (words as f64 / minutes).round() as u32
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_accuracy_empty_input_is_100() {
        assert_eq!(accuracy(&[], &chars("cat")), 100);
        assert_eq!(accuracy(&[], &[]), 100);
    }

    #[test]
    fn test_accuracy_is_floored() {
        // 2 of 3 correct = 66.6 -> 66
        assert_eq!(accuracy(&chars("cax"), &chars("cat")), 66);
    }

    #[test]
    fn test_accuracy_counts_overflow_as_wrong() {
        // "catt": 3 correct positions out of 4 typed
        assert_eq!(accuracy(&chars("catt"), &chars("cat")), 75);
        assert_eq!(accuracy(&chars("cxat"), &chars("cat")), 25);
    }

    #[test]
    fn test_accuracy_stays_in_range() {
        let target = chars("hello world");
        for typed in ["", "h", "zzzz", "hello world", "hello world!!!", "qqqqqqqqqqqqqqqqqq"] {
            let acc = accuracy(&chars(typed), &target);
            assert!(acc <= 100, "{typed:?} gave {acc}");
        }
        assert_eq!(accuracy(&chars("zzzz"), &target), 0);
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("the quick  brown\tfox\n"), 4);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one"), 1);
    }

    #[test]
    fn test_wpm_rounds_words_over_minutes() {
        let start = Instant::now();
        // 9 words in 30s -> 18 wpm
        let end = start + Duration::from_secs(30);
        assert_eq!(
            wpm("The quick brown fox jumps over the lazy dog.", Some(start), end),
            18
        );
        // 2 words in 7s -> 17.14 -> 17
        assert_eq!(wpm("two words", Some(start), start + Duration::from_secs(7)), 17);
    }

    #[test]
    fn test_wpm_zero_without_start_or_elapsed() {
        let now = Instant::now();
        assert_eq!(wpm("cat", None, now), 0);
        assert_eq!(wpm("cat", Some(now), now), 0);
        assert_eq!(wpm_for_secs(3, -1.0), 0);
    }
}
