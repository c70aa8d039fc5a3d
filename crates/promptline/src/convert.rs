//! Convertors: cleaned text to typed values.
//!
//! A [`Convertor`] parses cleaned input into its `Output` type. On failure
//! it does two things: it notifies the configured [`ErrorReporter`] (an
//! advisory channel, usually shown to the user) and it returns a
//! [`ConvertorError`] carrying the human-readable shape the input was
//! expected to have (the control-flow channel that drives the retry loop).

use std::collections::HashSet;
use std::fmt;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;

use crate::report::ErrorReporter;

/// A value could not be parsed into the target type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}")]
pub struct ConvertorError {
    /// Human-readable description of the expected shape, e.g.
    /// "an integer number".
    pub expected: String,
}

/// Report a conversion failure and build the matching error.
fn conversion_failure(
    expected: &str,
    value: &str,
    reporter: &dyn ErrorReporter,
    fmt: &str,
) -> ConvertorError {
    reporter.report(fmt, value, expected);
    ConvertorError {
        expected: expected.to_string(),
    }
}

/// Converts cleaned text into a typed value.
pub trait Convertor {
    /// The type produced on success.
    type Output;

    /// Human-readable description of the expected input shape.
    fn describe(&self) -> String;

    /// Parse `value`, reporting through `reporter` with `fmt` on failure.
    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<Self::Output, ConvertorError>;
}

/// The "no conversion" convertor: cleaned text is the final value.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityConvertor;

impl Convertor for IdentityConvertor {
    type Output = String;

    fn describe(&self) -> String {
        "text".to_string()
    }

    fn convert(
        &self,
        value: &str,
        _reporter: &dyn ErrorReporter,
        _fmt: &str,
    ) -> Result<String, ConvertorError> {
        Ok(value.to_string())
    }
}

/// Convert to an integer, with a configurable radix.
///
/// Radix 0 infers the base from a `0x`/`0o`/`0b` prefix and falls back to
/// decimal; otherwise the radix must be in 2..=36.
#[derive(Debug, Clone)]
pub struct IntConvertor {
    radix: u32,
    expected: String,
}

impl IntConvertor {
    /// Decimal integer convertor.
    pub fn new() -> Self {
        Self::with_radix(10)
    }

    /// Integer convertor with an explicit radix (0 to infer from prefix).
    pub fn with_radix(radix: u32) -> Self {
        Self {
            radix,
            expected: "an integer number".to_string(),
        }
    }
}

impl Default for IntConvertor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_prefixed_int(value: &str) -> Option<i64> {
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (radix, digits) = if let Some(d) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, d)
    } else if let Some(d) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8, d)
    } else if let Some(d) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2, d)
    } else {
        (10, rest)
    };
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl Convertor for IntConvertor {
    type Output = i64;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<i64, ConvertorError> {
        let parsed = if self.radix == 0 {
            parse_prefixed_int(value)
        } else {
            i64::from_str_radix(value, self.radix).ok()
        };
        parsed.ok_or_else(|| conversion_failure(&self.expected, value, reporter, fmt))
    }
}

/// Convert to a floating point number.
#[derive(Debug, Clone)]
pub struct FloatConvertor {
    expected: String,
}

impl FloatConvertor {
    /// Create a float convertor.
    pub fn new() -> Self {
        Self {
            expected: "a float number".to_string(),
        }
    }
}

impl Default for FloatConvertor {
    fn default() -> Self {
        Self::new()
    }
}

impl Convertor for FloatConvertor {
    type Output = f64;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<f64, ConvertorError> {
        value
            .parse::<f64>()
            .map_err(|_| conversion_failure(&self.expected, value, reporter, fmt))
    }
}

const TRUE_TOKENS: &[&str] = &["t", "true", "y", "yes", "1"];
const FALSE_TOKENS: &[&str] = &["f", "false", "n", "no", "0"];

/// Convert to a boolean from common true/false tokens, case-insensitive.
#[derive(Debug, Clone)]
pub struct BooleanConvertor {
    expected: String,
}

impl BooleanConvertor {
    /// Create a boolean convertor.
    pub fn new() -> Self {
        Self {
            expected: "true or false".to_string(),
        }
    }
}

impl Default for BooleanConvertor {
    fn default() -> Self {
        Self::new()
    }
}

impl Convertor for BooleanConvertor {
    type Output = bool;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<bool, ConvertorError> {
        let token = value.to_lowercase();
        if TRUE_TOKENS.contains(&token.as_str()) {
            Ok(true)
        } else if FALSE_TOKENS.contains(&token.as_str()) {
            Ok(false)
        } else {
            Err(conversion_failure(&self.expected, value, reporter, fmt))
        }
    }
}

static YES_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "y", "yes", "yeah", "yup", "aye", "oui", "si", "ja", "ken", "hai", "gee", "da", "tak",
        "affirmative",
    ]
    .into_iter()
    .collect()
});

static NO_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "n", "no", "nope", "na", "nae", "non", "negatory", "nein", "nie", "nyet", "lo",
    ]
    .into_iter()
    .collect()
});

/// Canonicalize a broad set of yes/no tokens to literal `"yes"`/`"no"`.
#[derive(Debug, Clone)]
pub struct YesNoConvertor {
    expected: String,
}

impl YesNoConvertor {
    /// Create a yes/no convertor.
    pub fn new() -> Self {
        Self {
            expected: "yes or no".to_string(),
        }
    }
}

impl Default for YesNoConvertor {
    fn default() -> Self {
        Self::new()
    }
}

impl Convertor for YesNoConvertor {
    type Output = String;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<String, ConvertorError> {
        let token = value.to_lowercase();
        if YES_TOKENS.contains(token.as_str()) {
            Ok("yes".to_string())
        } else if NO_TOKENS.contains(token.as_str()) {
            Ok("no".to_string())
        } else {
            Err(conversion_failure(&self.expected, value, reporter, fmt))
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
];

/// Permissive date/time conversion.
///
/// Accepts ISO and US slashed forms with or without a time of day,
/// month-name forms ("October 1, 2015"), and the relative words `now`,
/// `today`, `tomorrow`, and `yesterday`.
#[derive(Debug, Clone)]
pub struct DateConvertor {
    expected: String,
}

impl DateConvertor {
    /// Create a date convertor.
    pub fn new() -> Self {
        Self {
            expected: "a date".to_string(),
        }
    }
}

impl Default for DateConvertor {
    fn default() -> Self {
        Self::new()
    }
}

impl Convertor for DateConvertor {
    type Output = NaiveDateTime;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<NaiveDateTime, ConvertorError> {
        let text = value.trim();

        let today = Local::now().date_naive();
        match text.to_lowercase().as_str() {
            "now" => return Ok(Local::now().naive_local()),
            "today" => return Ok(today.and_time(NaiveTime::MIN)),
            "tomorrow" => return Ok((today + Duration::days(1)).and_time(NaiveTime::MIN)),
            "yesterday" => return Ok((today - Duration::days(1)).and_time(NaiveTime::MIN)),
            _ => {}
        }

        for pattern in DATETIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(text, pattern) {
                return Ok(parsed);
            }
        }
        for pattern in DATE_FORMATS {
            if let Ok(parsed) = NaiveDate::parse_from_str(text, pattern) {
                return Ok(parsed.and_time(NaiveTime::MIN));
            }
        }

        Err(conversion_failure(&self.expected, value, reporter, fmt))
    }
}

/// Convert delimited text to a list, optionally converting each element.
///
/// Parsing uses a CSV reader, so quoted elements may contain the delimiter.
/// When no delimiter is configured one is sniffed from the input. The first
/// element-level conversion failure aggregates into the list's failure.
pub struct ListConvertor<E = IdentityConvertor> {
    delimiter: Option<u8>,
    elem: E,
    expected: String,
}

impl ListConvertor<IdentityConvertor> {
    /// A comma-separated list of strings.
    pub fn strings() -> Self {
        Self::new(IdentityConvertor)
    }
}

impl<E: Convertor> ListConvertor<E> {
    /// A comma-separated list with each element run through `elem`.
    pub fn new(elem: E) -> Self {
        Self {
            delimiter: Some(b','),
            elem,
            expected: "a list of values".to_string(),
        }
    }

    /// Use an explicit single-byte delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sniff the delimiter from the input instead of fixing one.
    pub fn sniff_delimiter(mut self) -> Self {
        self.delimiter = None;
        self
    }
}

fn sniff(value: &str) -> u8 {
    for candidate in [b',', b';', b'\t', b'|', b' '] {
        if value.contains(candidate as char) {
            return candidate;
        }
    }
    b','
}

impl<E: Convertor> Convertor for ListConvertor<E> {
    type Output = Vec<E::Output>;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<Vec<E::Output>, ConvertorError> {
        let delimiter = self.delimiter.unwrap_or_else(|| sniff(value));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(value.as_bytes());

        let mut record = csv::StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return Ok(Vec::new()),
            Err(_) => return Err(conversion_failure(&self.expected, value, reporter, fmt)),
        }

        let mut converted = Vec::with_capacity(record.len());
        for field in record.iter() {
            match self.elem.convert(field, reporter, fmt) {
                Ok(v) => converted.push(v),
                // The element convertor already reported; surface its
                // expected shape as the list's failure.
                Err(_) => {
                    return Err(ConvertorError {
                        expected: self.elem.describe(),
                    })
                }
            }
        }
        Ok(converted)
    }
}

/// One row of a fixed lookup table: a numeric id paired with a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Numeric identifier.
    pub id: i64,
    /// Display value.
    pub value: String,
}

impl TableEntry {
    /// Create a table entry.
    pub fn new(id: i64, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

/// Which side of a [`TableEntry`] the user is expected to type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// The numeric id.
    Id,
    /// The value.
    Value,
    /// Either; a value match wins over an id match.
    Either,
}

/// Which side of the matched entry to hand back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnMode {
    /// The numeric id.
    Id,
    /// The value.
    Value,
}

/// The side of a table entry a lookup matched (or resolved to).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCell {
    /// A matched id.
    Id(i64),
    /// A matched value.
    Value(String),
}

impl fmt::Display for TableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableCell::Id(id) => write!(f, "{}", id),
            TableCell::Value(value) => f.write_str(value),
        }
    }
}

/// Convert input to a member of a fixed `(id, value)` table.
///
/// In [`LookupMode::Either`] the input is checked against values first, then
/// ids, so an input that is both a valid value and a valid id resolves to
/// the value.
#[derive(Debug, Clone)]
pub struct TableConvertor {
    entries: Vec<TableEntry>,
    mode: LookupMode,
    expected: String,
}

impl TableConvertor {
    /// Create a convertor over the given entries.
    pub fn new(entries: impl IntoIterator<Item = TableEntry>, mode: LookupMode) -> Self {
        let expected = match mode {
            LookupMode::Id => "an id from the table",
            LookupMode::Value => "a value from the table",
            LookupMode::Either => "an id or value from the table",
        };
        Self {
            entries: entries.into_iter().collect(),
            mode,
            expected: expected.to_string(),
        }
    }

    /// Override the expected-shape description used in failure reports.
    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    fn match_value(&self, value: &str) -> Option<TableCell> {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| TableCell::Value(e.value.clone()))
    }

    fn match_id(&self, value: &str) -> Option<TableCell> {
        let id = value.parse::<i64>().ok()?;
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| TableCell::Id(e.id))
    }
}

impl Convertor for TableConvertor {
    type Output = TableCell;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<TableCell, ConvertorError> {
        let matched = match self.mode {
            LookupMode::Value => self.match_value(value),
            LookupMode::Id => self.match_id(value),
            LookupMode::Either => self.match_value(value).or_else(|| self.match_id(value)),
        };
        matched.ok_or_else(|| conversion_failure(&self.expected, value, reporter, fmt))
    }
}

/// Map a matched cell to the requested side of its entry.
///
/// Returns `None` when the cell does not belong to the table.
pub fn resolve_return(
    entries: &[TableEntry],
    cell: &TableCell,
    mode: ReturnMode,
) -> Option<TableCell> {
    let entry = entries.iter().find(|e| match cell {
        TableCell::Id(id) => e.id == *id,
        TableCell::Value(value) => &e.value == value,
    })?;
    Some(match mode {
        ReturnMode::Id => TableCell::Id(entry.id),
        ReturnMode::Value => TableCell::Value(entry.value.clone()),
    })
}

/// Convert a key from an ordered key list to its zero-based position.
///
/// The selection-table engine uses this to map a typed tag back to a row
/// index.
#[derive(Debug, Clone)]
pub struct ChoiceIndexConvertor {
    keys: Vec<String>,
    expected: String,
}

impl ChoiceIndexConvertor {
    /// Create a convertor over the given ordered keys.
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            expected: "a valid row number".to_string(),
        }
    }

    /// Override the expected-shape description used in failure reports.
    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }
}

impl Convertor for ChoiceIndexConvertor {
    type Output = usize;

    fn describe(&self) -> String {
        self.expected.clone()
    }

    fn convert(
        &self,
        value: &str,
        reporter: &dyn ErrorReporter,
        fmt: &str,
    ) -> Result<usize, ConvertorError> {
        self.keys
            .iter()
            .position(|k| k == value)
            .ok_or_else(|| conversion_failure(&self.expected, value, reporter, fmt))
    }
}
