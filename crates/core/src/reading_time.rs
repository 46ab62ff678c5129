use serde::{Deserialize, Serialize};
use std::fmt;

/// Reading speed used when none is configured.
pub const DEFAULT_WORDS_PER_MINUTE: usize = 225;

/// Reading time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadingTimeOptions {
    /// Words read per minute. Zero is treated as one.
    #[serde(alias = "words_per_minute")]
    pub words_per_minute: usize,
}

impl Default for ReadingTimeOptions {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// Word count and rounded-up minutes for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingTime {
    /// Whitespace-delimited token count.
    pub words: usize,
    /// `ceil(words / words_per_minute)`.
    pub minutes: usize,
}

impl ReadingTime {
    /// Measures `text` at the configured reading speed.
    pub fn measure(text: &str, options: &ReadingTimeOptions) -> Self {
        let words = text.split_whitespace().count();
        let minutes = words.div_ceil(options.words_per_minute.max(1));
        Self { words, minutes }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

/// Formats the reading time of `text` at 225 words per minute, e.g. `"3 min read"`.
pub fn estimate_reading_time(text: &str) -> String {
    ReadingTime::measure(text, &ReadingTimeOptions::default()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(count: usize) -> String {
        vec!["word"; count].join(" ")
    }

    #[test]
    fn empty_input_is_zero_minutes() {
        assert_eq!(estimate_reading_time(""), "0 min read");
        assert_eq!(estimate_reading_time("  \n\t "), "0 min read");
    }

    #[test]
    fn ceiling_at_boundary() {
        assert_eq!(estimate_reading_time(&words(1)), "1 min read");
        assert_eq!(estimate_reading_time(&words(225)), "1 min read");
        assert_eq!(estimate_reading_time(&words(226)), "2 min read");
        assert_eq!(estimate_reading_time(&words(450)), "2 min read");
    }

    #[test]
    fn any_whitespace_separates_words() {
        let measured = ReadingTime::measure("one\ttwo\nthree   four", &ReadingTimeOptions::default());
        assert_eq!(measured.words, 4);
        assert_eq!(measured.minutes, 1);
    }

    #[test]
    fn custom_speed() {
        let options = ReadingTimeOptions {
            words_per_minute: 100,
        };
        let measured = ReadingTime::measure(&words(250), &options);
        assert_eq!(measured.to_string(), "3 min read");
    }

    #[test]
    fn zero_speed_does_not_divide_by_zero() {
        let options = ReadingTimeOptions {
            words_per_minute: 0,
        };
        assert_eq!(ReadingTime::measure("a b", &options).minutes, 2);
    }
}
