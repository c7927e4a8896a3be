//! Identifier case styles
//!
//! Each style turns a plain phrase such as `"apple inc"` into one identifier
//! spelling. Transforms only touch letter case, whitespace and apostrophes;
//! other punctuation is left for the normalizer to strip.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    /// `appleInc`
    #[default]
    LowerCamelCase,
    /// `AppleInc`
    UpperCamelCase,
    /// `apple_inc`
    LowerUnderscores,
    /// `APPLE_INC`
    UpperUnderscores,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 4] = [
        CaseStyle::LowerCamelCase,
        CaseStyle::UpperCamelCase,
        CaseStyle::LowerUnderscores,
        CaseStyle::UpperUnderscores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStyle::LowerCamelCase => "lower_camel_case",
            CaseStyle::UpperCamelCase => "upper_camel_case",
            CaseStyle::LowerUnderscores => "lower_underscores",
            CaseStyle::UpperUnderscores => "upper_underscores",
        }
    }

    pub fn apply(&self, phrase: &str) -> String {
        match self {
            CaseStyle::LowerCamelCase => to_lower_camel_case(phrase),
            CaseStyle::UpperCamelCase => to_upper_camel_case(phrase),
            CaseStyle::LowerUnderscores => to_lower_underscores(phrase),
            CaseStyle::UpperUnderscores => to_upper_underscores(phrase),
        }
    }
}

impl std::fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| format!("Unknown case style: {}", s))
    }
}

/// Upper-case the first character of `word` and lower-case the rest
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lower-case the first character of `word`, leaving the rest untouched
fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn to_upper_camel_case(phrase: &str) -> String {
    phrase.split_whitespace().map(title_case).collect()
}

pub fn to_lower_camel_case(phrase: &str) -> String {
    decapitalize(&to_upper_camel_case(phrase))
}

pub fn to_lower_underscores(phrase: &str) -> String {
    phrase.replace([' ', '\''], "_").to_lowercase()
}

pub fn to_upper_underscores(phrase: &str) -> String {
    to_lower_underscores(phrase).to_uppercase()
}
