//! # Text Statistics
//!
//! Decodes uploaded bytes as UTF-8 and counts lines and words.
//!
//! ## Lines
//!
//! `\r\n`, `\n` and a lone `\r` each end exactly one line. Text after the last
//! terminator counts as a line when it is non-empty, so `"a\nb"` has two lines,
//! `"a\n"` has one and `""` has none. Blank lines count.
//!
//! ## Words
//!
//! Characters up to and including U+0020 are trimmed from both ends of a
//! line, then the rest is split on runs of ASCII whitespace (space, tab, LF,
//! VT, FF, CR). Punctuation is not a separator: `"Name,Age"` is one word.
//! Neither is non-ASCII whitespace such as U+00A0 or U+3000.
//!
//! ## Decoding
//!
//! [`DecodeMode::Lossy`] replaces malformed sequences with U+FFFD and never
//! fails. [`DecodeMode::Strict`] rejects them with [`ProcessError`].

use crate::model::TextStats;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    #[default]
    Lossy,
    Strict,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

pub fn process(raw: &[u8], mode: DecodeMode) -> Result<TextStats, ProcessError> {
    let text = decode(raw, mode)?;

    let mut stats = TextStats::default();
    for line in logical_lines(&text) {
        stats.line_count += 1;
        stats.word_count += count_words(line) as u64;
    }
    Ok(stats)
}

pub fn decode(raw: &[u8], mode: DecodeMode) -> Result<Cow<'_, str>, ProcessError> {
    match mode {
        DecodeMode::Lossy => Ok(String::from_utf8_lossy(raw)),
        DecodeMode::Strict => std::str::from_utf8(raw)
            .map(Cow::Borrowed)
            .map_err(|e| ProcessError::InvalidUtf8 {
                offset: e.valid_up_to(),
            }),
    }
}

pub fn count_words(line: &str) -> usize {
    line.trim_matches(|c: char| c <= ' ')
        .split(is_word_separator)
        .filter(|word| !word.is_empty())
        .count()
}

fn is_word_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Iterates lines without their terminators.
pub fn logical_lines(text: &str) -> LogicalLines<'_> {
    LogicalLines { rest: text }
}

pub struct LogicalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for LogicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                let line = &self.rest[..end];
                let after = &self.rest[end..];
                let skip = if after.starts_with("\r\n") { 2 } else { 1 };
                self.rest = &after[skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(input: &str) -> TextStats {
        process(input.as_bytes(), DecodeMode::Lossy).unwrap()
    }

    fn lines(input: &str) -> Vec<&str> {
        logical_lines(input).collect()
    }

    #[test]
    fn counts_two_lines_four_words() {
        let s = stats("Hello World\nSecond line");
        assert_eq!(s.line_count, 2);
        assert_eq!(s.word_count, 4);
    }

    #[test]
    fn mixed_line_endings_each_end_one_line() {
        assert_eq!(
            lines("Line1\r\nLine2\nLine3\rLine4"),
            vec!["Line1", "Line2", "Line3", "Line4"]
        );
        assert_eq!(stats("Line1\r\nLine2\nLine3\rLine4").line_count, 4);
    }

    #[test]
    fn trailing_terminator_does_not_add_a_line() {
        assert_eq!(lines("a\n"), vec!["a"]);
        assert_eq!(lines("a\r\n"), vec!["a"]);
        assert_eq!(lines("a\r"), vec!["a"]);
    }

    #[test]
    fn blank_lines_count_but_hold_no_words() {
        let s = stats("Hello World\n\nSecond line");
        assert_eq!(s.line_count, 3);
        assert_eq!(s.word_count, 4);
    }

    #[test]
    fn lone_terminators() {
        assert_eq!(lines("\n"), vec![""]);
        assert_eq!(lines("\r\r"), vec!["", ""]);
        assert_eq!(lines("\n\r\n"), vec!["", ""]);
        assert_eq!(lines(""), Vec::<&str>::new());
    }

    #[test]
    fn cr_then_lf_pair_is_one_boundary_but_lf_then_cr_is_two() {
        assert_eq!(lines("a\r\nb").len(), 2);
        assert_eq!(lines("a\n\rb").len(), 3);
    }

    #[test]
    fn splits_words_on_whitespace_only() {
        let s = stats("Name,Age\nJohn,30");
        assert_eq!(s.line_count, 2);
        assert_eq!(s.word_count, 2);
    }

    #[test]
    fn whitespace_runs_and_padding_are_ignored() {
        assert_eq!(count_words("  one \t two   three  "), 3);
        assert_eq!(count_words(" \t "), 0);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn non_ascii_spaces_do_not_split_words() {
        assert_eq!(count_words("你好\u{3000}世界"), 1);
        assert_eq!(count_words("a\u{00A0}b"), 1);
        assert_eq!(count_words("a\u{2003}b c"), 2);

        let s = stats("你好\u{3000}世界\na\u{00A0}b");
        assert_eq!(s.line_count, 2);
        assert_eq!(s.word_count, 2);
    }

    #[test]
    fn control_characters_are_trimmed_from_line_ends() {
        assert_eq!(count_words("\x01\x02"), 0);
        assert_eq!(count_words("\x00 word \x1f"), 1);
        assert_eq!(count_words("a\x01b"), 1);
        assert_eq!(count_words("a \x01 b"), 3);

        let s = process(b"\x01\x02\nword", DecodeMode::Lossy).unwrap();
        assert_eq!(s.line_count, 2);
        assert_eq!(s.word_count, 1);
    }

    #[test]
    fn vertical_tab_and_form_feed_separate_words() {
        assert_eq!(count_words("a\x0Bb\x0Cc"), 3);
    }

    #[test]
    fn multibyte_text_is_counted_by_words_not_bytes() {
        let s = stats("Chinese: 你好");
        assert_eq!(s.line_count, 1);
        assert_eq!(s.word_count, 2);

        let s = stats("Symbols: @#$%^&*()\nEmoji: 😀🎉");
        assert_eq!(s.line_count, 2);
        assert_eq!(s.word_count, 4);
    }

    #[test]
    fn lossy_mode_tolerates_malformed_bytes() {
        let raw = b"ok \xff\xfe bytes\nnext";
        let s = process(raw, DecodeMode::Lossy).unwrap();
        assert_eq!(s.line_count, 2);
        assert_eq!(s.word_count, 4);
    }

    #[test]
    fn strict_mode_reports_offset_of_bad_byte() {
        let raw = b"ok \xff";
        assert_eq!(
            process(raw, DecodeMode::Strict),
            Err(ProcessError::InvalidUtf8 { offset: 3 })
        );
    }

    #[test]
    fn strict_mode_accepts_valid_text() {
        let s = process("héllo wörld".as_bytes(), DecodeMode::Strict).unwrap();
        assert_eq!(s.word_count, 2);
    }

    #[test]
    fn decode_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DecodeMode::Strict).unwrap(), "\"strict\"");
        let mode: DecodeMode = serde_json::from_str("\"lossy\"").unwrap();
        assert_eq!(mode, DecodeMode::Lossy);
    }
}
