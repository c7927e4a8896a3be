//! Turning raw provider candidates into identifier suggestions
//!
//! [`normalize`] is a pure function: ignore-word filtering, case transform,
//! punctuation stripping, identifier validation, then dedupe and sort. The
//! sorted output matters because the user picks from the list by position.

use crate::case_style::CaseStyle;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Characters removed after the case transform
const STRIPPED_PUNCTUATION: [char; 8] = ['-', '.', ':', '\'', '!', '?', '/', ','];

/// The whole candidate must be ASCII letters, digits and underscores
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_]+$").expect("identifier pattern is valid"));

/// Replace `&` with `and` and drop whole tokens listed in `ignore_words`
pub fn filter_ignored(candidate: &str, ignore_words: &[String]) -> String {
    candidate
        .replace('&', "and")
        .split_whitespace()
        .filter(|token| !ignore_words.iter().any(|ignored| ignored == token))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn strip_punctuation(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

pub fn is_identifier(candidate: &str) -> bool {
    IDENTIFIER.is_match(candidate)
}

/// Render raw candidates as a sorted, deduplicated list of identifiers
pub fn normalize(candidates: &[String], ignore_words: &[String], style: CaseStyle) -> Vec<String> {
    candidates
        .iter()
        .map(|candidate| filter_ignored(candidate, ignore_words))
        .map(|phrase| strip_punctuation(&style.apply(&phrase)))
        .filter(|identifier| is_identifier(identifier))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
