//! Validators and their ALL/ANY/NONE combinators.
//!
//! A [`Validator`] is a predicate over a converted value. On failure it
//! reports a human-readable reason through the [`ErrorReporter`] and returns
//! `false`; control flow stays with the caller.

use std::collections::HashSet;
use std::fmt::Display;
use std::marker::PhantomData;

use regex::Regex;

use crate::report::{ErrorReporter, SilentReporter};

/// A predicate over a typed value that reports a reason on failure.
pub trait Validator<T> {
    /// Return true if `value` passes; report through `reporter` otherwise.
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool;
}

/// True iff every validator passes (logical AND).
///
/// Evaluated in order, stopping at the first failure; each validator that is
/// reached reports its own failure. An empty list passes.
pub fn in_all<T>(
    value: &T,
    validators: &[Box<dyn Validator<T>>],
    reporter: &dyn ErrorReporter,
    fmt: &str,
) -> bool {
    validators.iter().all(|v| v.validate(value, reporter, fmt))
}

/// True iff at least one validator passes (logical OR).
///
/// Evaluated in order, stopping at the first success. An empty list fails.
pub fn in_any<T>(
    value: &T,
    validators: &[Box<dyn Validator<T>>],
    reporter: &dyn ErrorReporter,
    fmt: &str,
) -> bool {
    validators.iter().any(|v| v.validate(value, reporter, fmt))
}

/// True iff no validator passes (logical NOR).
///
/// The inner validators run against a silent reporter: a mismatch is the
/// expected outcome here and must not chatter at the user. Only the
/// aggregate failure is reported.
pub fn not_in<T: Display>(
    value: &T,
    validators: &[Box<dyn Validator<T>>],
    reporter: &dyn ErrorReporter,
    fmt: &str,
) -> bool {
    let matched = validators
        .iter()
        .any(|v| v.validate(value, &SilentReporter, fmt));
    if matched {
        let rendered = value.to_string();
        reporter.report(fmt, &rendered, &format!("value cannot match {}", rendered));
        false
    } else {
        true
    }
}

/// All of the wrapped validators must pass.
pub struct AllOfValidator<T> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T> AllOfValidator<T> {
    /// Wrap a validator list with AND semantics.
    pub fn new(validators: Vec<Box<dyn Validator<T>>>) -> Self {
        Self { validators }
    }
}

impl<T> Validator<T> for AllOfValidator<T> {
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        in_all(value, &self.validators, reporter, fmt)
    }
}

/// At least one of the wrapped validators must pass.
pub struct AnyOfValidator<T> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T> AnyOfValidator<T> {
    /// Wrap a validator list with OR semantics.
    pub fn new(validators: Vec<Box<dyn Validator<T>>>) -> Self {
        Self { validators }
    }
}

impl<T> Validator<T> for AnyOfValidator<T> {
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        in_any(value, &self.validators, reporter, fmt)
    }
}

/// None of the wrapped validators may pass.
pub struct NoneOfValidator<T> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T> NoneOfValidator<T> {
    /// Wrap a validator list with NOR semantics.
    pub fn new(validators: Vec<Box<dyn Validator<T>>>) -> Self {
        Self { validators }
    }
}

impl<T: Display> Validator<T> for NoneOfValidator<T> {
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        not_in(value, &self.validators, reporter, fmt)
    }
}

/// The value must equal a fixed value.
#[derive(Debug, Clone)]
pub struct EqualToValidator<T> {
    value: T,
}

impl<T> EqualToValidator<T> {
    /// Create an equality check against `value`.
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: PartialEq + Display> Validator<T> for EqualToValidator<T> {
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        if *value == self.value {
            true
        } else {
            reporter.report(
                fmt,
                &value.to_string(),
                &format!("value not equal to {}", self.value),
            );
            false
        }
    }
}

/// The value must fall in a closed range.
///
/// Either bound may be omitted. Works for any ordered, displayable type.
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> RangeValidator<T> {
    /// Create a range check; `None` disables that bound.
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Display> Validator<T> for RangeValidator<T> {
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        if let Some(min) = &self.min {
            if value < min {
                reporter.report(
                    fmt,
                    &value.to_string(),
                    &format!("too low (min_val={})", min),
                );
                return false;
            }
        }
        if let Some(max) = &self.max {
            if value > max {
                reporter.report(
                    fmt,
                    &value.to_string(),
                    &format!("too high (max_val={})", max),
                );
                return false;
            }
        }
        true
    }
}

/// The value must be a member of a fixed choice set.
#[derive(Debug, Clone)]
pub struct ChoiceValidator<T> {
    choices: Vec<T>,
}

impl<T> ChoiceValidator<T> {
    /// Create a membership check over `choices`.
    pub fn new(choices: impl IntoIterator<Item = T>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }
}

impl<T: PartialEq + Display> Validator<T> for ChoiceValidator<T> {
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        if self.choices.contains(value) {
            true
        } else {
            let rendered: Vec<String> = self.choices.iter().map(|c| c.to_string()).collect();
            reporter.report(
                fmt,
                &value.to_string(),
                &format!("value must be one of: {}", rendered.join(", ")),
            );
            false
        }
    }
}

/// Length bounds, counted in characters for strings and elements for lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthValidator {
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthValidator {
    /// Create a length check; `None` disables that bound. For an exact
    /// length, set both bounds to the same value.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Check a length directly, returning the failure reason if any.
    pub fn check(&self, len: usize) -> Result<(), String> {
        if let Some(min) = self.min {
            if len < min {
                return Err(format!("too short (min_len={})", min));
            }
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(format!("too long (max_len={})", max));
            }
        }
        Ok(())
    }
}

impl Validator<String> for LengthValidator {
    fn validate(&self, value: &String, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        match self.check(value.chars().count()) {
            Ok(()) => true,
            Err(reason) => {
                reporter.report(fmt, value, &reason);
                false
            }
        }
    }
}

/// The value must match a regular expression (searched, not anchored).
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    desc: Option<String>,
}

impl RegexValidator {
    /// Create a regex check.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            desc: None,
        })
    }

    /// Describe what the pattern recognizes, for friendlier failure reports.
    pub fn describe(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

impl Validator<String> for RegexValidator {
    fn validate(&self, value: &String, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        if self.regex.is_match(value) {
            true
        } else {
            let reason = match &self.desc {
                Some(desc) => format!("is not a valid {}", desc),
                None => format!("does not match pattern: {}", self.regex.as_str()),
            };
            reporter.report(fmt, value, &reason);
            false
        }
    }
}

/// Password composition rules.
///
/// Failure reports always name the value as `password` rather than echoing
/// the secret.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_len: Option<usize>,
    max_len: Option<usize>,
    min_lower: usize,
    min_upper: usize,
    min_digits: usize,
    min_puncts: usize,
    allowed: HashSet<char>,
    disallowed: HashSet<char>,
}

impl Default for PasswordValidator {
    fn default() -> Self {
        // Printable ASCII minus space: letters, digits, punctuation.
        let allowed = (b'!'..=b'~').map(char::from).collect();
        Self {
            min_len: None,
            max_len: None,
            min_lower: 0,
            min_upper: 0,
            min_digits: 0,
            min_puncts: 0,
            allowed,
            disallowed: HashSet::new(),
        }
    }
}

impl PasswordValidator {
    /// Create a validator with no composition requirements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least `n` characters.
    pub fn min_len(mut self, n: usize) -> Self {
        self.min_len = Some(n);
        self
    }

    /// Allow at most `n` characters.
    pub fn max_len(mut self, n: usize) -> Self {
        self.max_len = Some(n);
        self
    }

    /// Require at least `n` lowercase letters.
    pub fn min_lower(mut self, n: usize) -> Self {
        self.min_lower = n;
        self
    }

    /// Require at least `n` uppercase letters.
    pub fn min_upper(mut self, n: usize) -> Self {
        self.min_upper = n;
        self
    }

    /// Require at least `n` digits.
    pub fn min_digits(mut self, n: usize) -> Self {
        self.min_digits = n;
        self
    }

    /// Require at least `n` punctuation characters.
    pub fn min_puncts(mut self, n: usize) -> Self {
        self.min_puncts = n;
        self
    }

    /// Replace the allow-list of characters.
    pub fn allowed(mut self, chars: &str) -> Self {
        self.allowed = chars.chars().collect();
        self
    }

    /// Characters that may not appear, removed from the allow-list.
    pub fn disallowed(mut self, chars: &str) -> Self {
        self.disallowed = chars.chars().collect();
        self
    }
}

impl Validator<String> for PasswordValidator {
    fn validate(&self, value: &String, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        let effective: HashSet<char> = self.allowed.difference(&self.disallowed).copied().collect();

        let mut illegal: Vec<char> = value.chars().filter(|c| !effective.contains(c)).collect();
        if !illegal.is_empty() {
            illegal.sort_unstable();
            illegal.dedup();
            let listed: String = illegal.iter().collect();
            reporter.report(
                fmt,
                "password",
                &format!("cannot contain any of the following characters: {}", listed),
            );
            return false;
        }

        let len = value.chars().count();
        if let Some(min) = self.min_len {
            if len < min {
                reporter.report(
                    fmt,
                    "password",
                    &format!("too short (minimum length is {})", min),
                );
                return false;
            }
        }
        if let Some(max) = self.max_len {
            if len > max {
                reporter.report(
                    fmt,
                    "password",
                    &format!("too long (maximum length is {})", max),
                );
                return false;
            }
        }

        let lower = value.chars().filter(|c| c.is_ascii_lowercase()).count();
        if lower < self.min_lower {
            reporter.report(
                fmt,
                "password",
                &format!("too few lower case characters (minimum is {})", self.min_lower),
            );
            return false;
        }

        let upper = value.chars().filter(|c| c.is_ascii_uppercase()).count();
        if upper < self.min_upper {
            reporter.report(
                fmt,
                "password",
                &format!("too few upper case characters (minimum is {})", self.min_upper),
            );
            return false;
        }

        let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < self.min_digits {
            reporter.report(
                fmt,
                "password",
                &format!("too few digit characters (minimum is {})", self.min_digits),
            );
            return false;
        }

        let puncts = value.chars().filter(|c| c.is_ascii_punctuation()).count();
        if puncts < self.min_puncts {
            reporter.report(
                fmt,
                "password",
                &format!(
                    "too few punctuation characters (minimum is {})",
                    self.min_puncts
                ),
            );
            return false;
        }

        true
    }
}

/// Validate a list: its own length, and each element individually.
pub struct ListValidator<E> {
    len: Option<LengthValidator>,
    elem: Vec<Box<dyn Validator<E>>>,
}

impl<E> ListValidator<E> {
    /// Create a list validator with no rules; add them with the builder
    /// methods.
    pub fn new() -> Self {
        Self {
            len: None,
            elem: Vec::new(),
        }
    }

    /// Validate the list's own length.
    pub fn len_validator(mut self, len: LengthValidator) -> Self {
        self.len = Some(len);
        self
    }

    /// Every element must pass this validator.
    pub fn elem_validator(mut self, validator: impl Validator<E> + 'static) -> Self {
        self.elem.push(Box::new(validator));
        self
    }
}

impl<E> Default for ListValidator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Display> Validator<Vec<E>> for ListValidator<E> {
    fn validate(&self, value: &Vec<E>, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        if let Some(len) = &self.len {
            if let Err(reason) = len.check(value.len()) {
                let rendered: Vec<String> = value.iter().map(|e| e.to_string()).collect();
                reporter.report(fmt, &rendered.join(", "), &reason);
                return false;
            }
        }
        for item in value {
            if !in_all(item, &self.elem, reporter, fmt) {
                return false;
            }
        }
        true
    }
}

/// Wrap an arbitrary predicate function as a validator.
///
/// Useful for embedding external predicate libraries without writing a
/// dedicated validator type.
pub struct FnValidator<T, F> {
    func: F,
    name: String,
    _value: PhantomData<fn(&T)>,
}

impl<T, F: Fn(&T) -> bool> FnValidator<T, F> {
    /// Wrap `func`; `name` describes what a passing value is, for reports.
    pub fn new(func: F, name: impl Into<String>) -> Self {
        Self {
            func,
            name: name.into(),
            _value: PhantomData,
        }
    }
}

impl<T: Display, F: Fn(&T) -> bool> Validator<T> for FnValidator<T, F> {
    fn validate(&self, value: &T, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
        if (self.func)(value) {
            true
        } else {
            reporter.report(
                fmt,
                &value.to_string(),
                &format!("is not a valid {}", self.name),
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CapturingReporter, DEFAULT_VALIDATOR_ERROR};

    /// A validator with a fixed result, for truth-table tests.
    struct Stub(bool);

    impl Validator<String> for Stub {
        fn validate(&self, value: &String, reporter: &dyn ErrorReporter, fmt: &str) -> bool {
            if !self.0 {
                reporter.report(fmt, value, "stub failure");
            }
            self.0
        }
    }

    fn stubs(pattern: &[bool]) -> Vec<Box<dyn Validator<String>>> {
        pattern
            .iter()
            .map(|&b| Box::new(Stub(b)) as Box<dyn Validator<String>>)
            .collect()
    }

    /// Every non-empty true/false combination up to three validators.
    fn truth_patterns() -> Vec<Vec<bool>> {
        let mut patterns = Vec::new();
        for len in 1..=3usize {
            for bits in 0..(1 << len) {
                patterns.push((0..len).map(|i| bits & (1 << i) != 0).collect());
            }
        }
        patterns
    }

    #[test]
    fn in_all_matches_logical_and() {
        let value = "v".to_string();
        for pattern in truth_patterns() {
            let expected = pattern.iter().all(|&b| b);
            let result = in_all(
                &value,
                &stubs(&pattern),
                &CapturingReporter::new(),
                DEFAULT_VALIDATOR_ERROR,
            );
            assert_eq!(result, expected, "pattern {:?}", pattern);
        }
    }

    #[test]
    fn in_any_matches_logical_or() {
        let value = "v".to_string();
        for pattern in truth_patterns() {
            let expected = pattern.iter().any(|&b| b);
            let result = in_any(
                &value,
                &stubs(&pattern),
                &CapturingReporter::new(),
                DEFAULT_VALIDATOR_ERROR,
            );
            assert_eq!(result, expected, "pattern {:?}", pattern);
        }
    }

    #[test]
    fn not_in_matches_logical_nor() {
        let value = "v".to_string();
        for pattern in truth_patterns() {
            let expected = !pattern.iter().any(|&b| b);
            let result = not_in(
                &value,
                &stubs(&pattern),
                &CapturingReporter::new(),
                DEFAULT_VALIDATOR_ERROR,
            );
            assert_eq!(result, expected, "pattern {:?}", pattern);
        }
    }

    #[test]
    fn empty_lists() {
        let value = "v".to_string();
        let none: Vec<Box<dyn Validator<String>>> = Vec::new();
        let reporter = CapturingReporter::new();
        assert!(in_all(&value, &none, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!in_any(&value, &none, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(not_in(&value, &none, &reporter, DEFAULT_VALIDATOR_ERROR));
    }

    #[test]
    fn none_of_silences_inner_validators() {
        let value = "v".to_string();
        let reporter = CapturingReporter::new();

        // A failing inner validator would normally report; under NONE it
        // must not, and the aggregate passes quietly.
        assert!(not_in(
            &value,
            &stubs(&[false, false]),
            &reporter,
            DEFAULT_VALIDATOR_ERROR
        ));
        assert!(reporter.is_empty());

        // A matching inner validator fails the aggregate with exactly one
        // wrapper-level message.
        assert!(!not_in(
            &value,
            &stubs(&[true]),
            &reporter,
            DEFAULT_VALIDATOR_ERROR
        ));
        assert_eq!(reporter.messages(), vec!["\"v\" value cannot match v".to_string()]);
    }

    #[test]
    fn combinator_wrappers_delegate() {
        let value = "v".to_string();
        let reporter = CapturingReporter::new();
        assert!(AllOfValidator::new(stubs(&[true, true])).validate(
            &value,
            &reporter,
            DEFAULT_VALIDATOR_ERROR
        ));
        assert!(AnyOfValidator::new(stubs(&[false, true])).validate(
            &value,
            &reporter,
            DEFAULT_VALIDATOR_ERROR
        ));
        assert!(NoneOfValidator::new(stubs(&[false])).validate(
            &value,
            &reporter,
            DEFAULT_VALIDATOR_ERROR
        ));
    }

    #[test]
    fn equal_to() {
        let reporter = CapturingReporter::new();
        let validator = EqualToValidator::new(5i64);
        assert!(validator.validate(&5, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&6, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert_eq!(reporter.messages(), vec!["\"6\" value not equal to 5".to_string()]);
    }

    #[test]
    fn range_bounds() {
        let reporter = CapturingReporter::new();
        let validator = RangeValidator::new(Some(1i64), Some(10));
        assert!(validator.validate(&1, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(validator.validate(&10, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&0, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&11, &reporter, DEFAULT_VALIDATOR_ERROR));

        let open_ended: RangeValidator<i64> = RangeValidator::new(None, None);
        assert!(open_ended.validate(&i64::MAX, &reporter, DEFAULT_VALIDATOR_ERROR));
    }

    #[test]
    fn choice_membership() {
        let reporter = CapturingReporter::new();
        let validator = ChoiceValidator::new(["red".to_string(), "blue".to_string()]);
        assert!(validator.validate(&"red".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&"green".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert_eq!(
            reporter.messages(),
            vec!["\"green\" value must be one of: red, blue".to_string()]
        );
    }

    #[test]
    fn length_bounds() {
        let reporter = CapturingReporter::new();
        let validator = LengthValidator::new(Some(2), Some(4));
        assert!(validator.validate(&"ab".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&"a".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&"abcde".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
    }

    #[test]
    fn regex_search() {
        let reporter = CapturingReporter::new();
        let validator = RegexValidator::new(r"^\d{5}$").unwrap().describe("zip code");
        assert!(validator.validate(&"12345".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&"1234".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert_eq!(
            reporter.messages(),
            vec!["\"1234\" is not a valid zip code".to_string()]
        );
    }

    #[test]
    fn password_composition() {
        let reporter = CapturingReporter::new();
        let validator = PasswordValidator::new()
            .min_len(8)
            .min_upper(1)
            .min_digits(1)
            .disallowed("[]");

        assert!(validator.validate(&"Secret99!".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&"short".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&"nodigitshere".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&"Br[cket]s1".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
    }

    #[test]
    fn password_reports_never_echo_the_secret() {
        let reporter = CapturingReporter::new();
        let validator = PasswordValidator::new().min_len(20);
        assert!(!validator.validate(&"hunter2".to_string(), &reporter, DEFAULT_VALIDATOR_ERROR));
        for message in reporter.messages() {
            assert!(!message.contains("hunter2"));
        }
    }

    #[test]
    fn list_validator_checks_length_and_elements() {
        let reporter = CapturingReporter::new();
        let validator = ListValidator::new()
            .len_validator(LengthValidator::new(Some(2), Some(3)))
            .elem_validator(RangeValidator::new(Some(0i64), Some(100)));

        assert!(validator.validate(&vec![1, 2, 3], &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&vec![1], &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&vec![1, 200], &reporter, DEFAULT_VALIDATOR_ERROR));
    }

    #[test]
    fn fn_validator_wraps_predicates() {
        let reporter = CapturingReporter::new();
        let validator = FnValidator::new(|v: &i64| v % 2 == 0, "even number");
        assert!(validator.validate(&4, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert!(!validator.validate(&3, &reporter, DEFAULT_VALIDATOR_ERROR));
        assert_eq!(
            reporter.messages(),
            vec!["\"3\" is not a valid even number".to_string()]
        );
    }
}
