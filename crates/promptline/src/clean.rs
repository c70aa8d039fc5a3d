//! Text cleaners applied to raw input before conversion.
//!
//! A [`Cleaner`] is a pure text-to-text transform. Cleaners compose
//! left-to-right: `clean_value(v, [a, b, c])` is `c(b(a(v)))`. Cleaning
//! never fails; a cleaner that cannot improve its input returns it
//! unchanged.

use regex::{Regex, RegexBuilder};

/// A pure text-normalization step.
pub trait Cleaner {
    /// Transform the value. Must not fail.
    fn clean(&self, value: &str) -> String;
}

/// Run a value through an ordered cleaner chain.
pub fn clean_value(value: &str, cleaners: &[Box<dyn Cleaner>]) -> String {
    let mut result = value.to_string();
    for cleaner in cleaners {
        result = cleaner.clean(&result);
    }
    result
}

/// Capitalization style for [`CapitalizeCleaner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapStyle {
    /// Lowercase everything.
    Lower,
    /// Uppercase everything.
    Upper,
    /// Capitalize the first word, lowercase the rest.
    FirstWord,
    /// Capitalize the last word, leave the rest untouched.
    LastWord,
    /// Capitalize every whitespace-separated word.
    AllWords,
}

/// Fold the value's capitalization to a fixed style.
#[derive(Debug, Clone, Copy)]
pub struct CapitalizeCleaner {
    style: CapStyle,
}

impl CapitalizeCleaner {
    /// Create a cleaner for the given style.
    pub fn new(style: CapStyle) -> Self {
        Self { style }
    }
}

impl Cleaner for CapitalizeCleaner {
    fn clean(&self, value: &str) -> String {
        match self.style {
            CapStyle::Lower => value.to_lowercase(),
            CapStyle::Upper => value.to_uppercase(),
            CapStyle::FirstWord => capitalize(value),
            CapStyle::LastWord => cap_last_word(value),
            CapStyle::AllWords => value
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Capitalize only the last word, preserving everything before it.
fn cap_last_word(value: &str) -> String {
    let end = value.trim_end().len();
    let start = value[..end]
        .rfind(char::is_whitespace)
        .map(|i| i + value[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);

    let mut out = String::with_capacity(value.len());
    out.push_str(&value[..start]);
    out.push_str(&capitalize(&value[start..end]));
    out.push_str(&value[end..]);
    out
}

/// Strip whitespace from either side of the value.
///
/// Both sides are stripped by default; each side is independently
/// toggleable.
#[derive(Debug, Clone, Copy)]
pub struct StripCleaner {
    lstrip: bool,
    rstrip: bool,
}

impl StripCleaner {
    /// Strip from the chosen sides.
    pub fn new(lstrip: bool, rstrip: bool) -> Self {
        Self { lstrip, rstrip }
    }
}

impl Default for StripCleaner {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Cleaner for StripCleaner {
    fn clean(&self, value: &str) -> String {
        let mut result = value;
        if self.lstrip {
            result = result.trim_start();
        }
        if self.rstrip {
            result = result.trim_end();
        }
        result.to_string()
    }
}

/// Remove every occurrence of each pattern, in pattern order.
#[derive(Debug, Clone)]
pub struct RemoveCleaner {
    patterns: Vec<String>,
}

impl RemoveCleaner {
    /// Create a cleaner removing the given verbatim substrings.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Cleaner for RemoveCleaner {
    fn clean(&self, value: &str) -> String {
        let mut result = value.to_string();
        for pattern in &self.patterns {
            result = result.replace(pattern.as_str(), "");
        }
        result
    }
}

/// Replace occurrences of one substring with another.
#[derive(Debug, Clone)]
pub struct ReplaceCleaner {
    old: String,
    new: String,
    count: usize,
}

impl ReplaceCleaner {
    /// Replace every occurrence of `old` with `new`.
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
            count: 0,
        }
    }

    /// Replace at most `count` occurrences, left to right. Zero means all.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

impl Cleaner for ReplaceCleaner {
    fn clean(&self, value: &str) -> String {
        if self.count == 0 {
            value.replace(&self.old, &self.new)
        } else {
            value.replacen(&self.old, &self.new, self.count)
        }
    }
}

/// Regular-expression substitution.
#[derive(Debug, Clone)]
pub struct RegexCleaner {
    regex: Regex,
    replacement: String,
    count: usize,
}

impl RegexCleaner {
    /// Replace matches of `pattern` with `replacement`.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            replacement: replacement.into(),
            count: 0,
        })
    }

    /// Case-insensitive variant of [`RegexCleaner::new`].
    pub fn case_insensitive(
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: RegexBuilder::new(pattern).case_insensitive(true).build()?,
            replacement: replacement.into(),
            count: 0,
        })
    }

    /// Replace at most `count` matches. Zero means all.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

impl Cleaner for RegexCleaner {
    fn clean(&self, value: &str) -> String {
        if self.count == 0 {
            self.regex
                .replace_all(value, self.replacement.as_str())
                .into_owned()
        } else {
            self.regex
                .replacen(value, self.count, self.replacement.as_str())
                .into_owned()
        }
    }
}

/// Complete a prefix against a fixed set of candidates.
///
/// If the input is a prefix of exactly one candidate, the candidate replaces
/// it (using the candidate's own capitalization). Zero or multiple matches
/// leave the input unchanged; this is a best-effort convenience, never an
/// error.
///
/// With candidates `["blue", "brown", "green"]`: `"g"` becomes `"green"`,
/// `"br"` becomes `"brown"`, and `"b"` stays `"b"` (ambiguous).
#[derive(Debug, Clone)]
pub struct ChoiceCleaner {
    choices: Vec<String>,
    case_insensitive: bool,
}

impl ChoiceCleaner {
    /// Create a case-sensitive completion cleaner.
    pub fn new(choices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Match prefixes case-insensitively.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }
}

impl Cleaner for ChoiceCleaner {
    fn clean(&self, value: &str) -> String {
        let needle = if self.case_insensitive {
            value.to_lowercase()
        } else {
            value.to_string()
        };

        let mut matched: Option<&str> = None;
        for choice in &self.choices {
            let hit = if self.case_insensitive {
                choice.to_lowercase().starts_with(&needle)
            } else {
                choice.starts_with(&needle)
            };
            if hit {
                if matched.is_some() {
                    // Ambiguous; leave the input alone.
                    return value.to_string();
                }
                matched = Some(choice.as_str());
            }
        }

        match matched {
            Some(choice) => choice.to_string(),
            None => value.to_string(),
        }
    }
}
