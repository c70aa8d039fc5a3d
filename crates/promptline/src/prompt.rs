//! The prompt session: one bounded-retry attempt to obtain a validated
//! value.
//!
//! [`Prompt`] wires a cleaner chain, a convertor, and a validator list into
//! a retry loop over one terminal prompt. Each attempt reads a line, runs it
//! through the pipeline, and either accepts the typed value or reports the
//! failure and re-prompts until the retry budget runs out.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clean::{clean_value, Cleaner, StripCleaner};
use crate::command::{CommandOutcome, CommandSet};
use crate::convert::{
    resolve_return, Convertor, IdentityConvertor, LookupMode, ReturnMode, TableCell,
    TableConvertor, TableEntry,
};
use crate::error::{ProcessError, PromptError};
use crate::report::{
    ErrorReporter, PrintReporter, DEFAULT_CONVERTOR_ERROR, DEFAULT_VALIDATOR_ERROR,
};
use crate::term::TerminalIO;
use crate::validate::{in_all, ChoiceValidator, Validator};

/// Run a value through cleaning, conversion, and validation.
///
/// This is the same processing a [`Prompt`] applies to terminal input, made
/// available for values that arrive some other way (a form field, a config
/// entry, a test).
pub fn process_value<T>(
    value: &str,
    cleaners: &[Box<dyn Cleaner>],
    convertor: &dyn Convertor<Output = T>,
    validators: &[Box<dyn Validator<T>>],
    reporter: &dyn ErrorReporter,
    convertor_fmt: &str,
    validator_fmt: &str,
) -> Result<T, ProcessError> {
    let cleaned = clean_value(value, cleaners);
    let converted = convertor.convert(&cleaned, reporter, convertor_fmt)?;
    if in_all(&converted, validators, reporter, validator_fmt) {
        Ok(converted)
    } else {
        Err(ProcessError::Validation { value: cleaned })
    }
}

/// A configured prompt for one typed value.
///
/// # Example
///
/// ```
/// use promptline::{IntConvertor, MockTerminal, Prompt, RangeValidator, SilentReporter};
/// use std::rc::Rc;
///
/// let mut term = MockTerminal::with_responses(["eleven", "11"]);
/// let mut prompt = Prompt::new(IntConvertor::new())
///     .prompt("Enter a number")
///     .reporter(Rc::new(SilentReporter))
///     .validator(RangeValidator::new(Some(1), Some(100)));
///
/// let value = prompt.get(&mut term).unwrap();
/// assert_eq!(value, Some(11));
/// ```
pub struct Prompt<T> {
    prompt: String,
    required: bool,
    default: Option<String>,
    default_str: Option<String>,
    hidden: bool,
    retries: Option<u32>,
    reporter: Rc<dyn ErrorReporter>,
    convertor_error_fmt: String,
    validator_error_fmt: String,
    commands: Rc<RefCell<CommandSet>>,
    cleaners: Vec<Box<dyn Cleaner>>,
    convertor: Box<dyn Convertor<Output = T>>,
    validators: Vec<Box<dyn Validator<T>>>,
}

impl Prompt<String> {
    /// A prompt whose value is the cleaned text itself.
    pub fn text() -> Self {
        Self::new(IdentityConvertor)
    }
}

impl<T> Prompt<T> {
    /// Create a prompt around a convertor. All options start at their
    /// defaults: required, unmasked, unbounded retries, printing reporter,
    /// no cleaners, no validators, no commands.
    pub fn new(convertor: impl Convertor<Output = T> + 'static) -> Self {
        Self {
            prompt: String::new(),
            required: true,
            default: None,
            default_str: None,
            hidden: false,
            retries: None,
            reporter: Rc::new(PrintReporter),
            convertor_error_fmt: DEFAULT_CONVERTOR_ERROR.to_string(),
            validator_error_fmt: DEFAULT_VALIDATOR_ERROR.to_string(),
            commands: Rc::new(RefCell::new(CommandSet::new())),
            cleaners: Vec::new(),
            convertor: Box::new(convertor),
            validators: Vec::new(),
        }
    }

    /// Set the prompt text shown before the input cursor.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Whether a value must be entered. When false, blank input resolves to
    /// "no value". Default is true.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The raw text to process when the user enters a blank line.
    ///
    /// A prompt with a default never resolves to "no value": blank input
    /// always takes the default, regardless of `required`.
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The string shown for the default, when it differs from the raw
    /// default text (e.g. show a name but process an id).
    pub fn default_str(mut self, default_str: impl Into<String>) -> Self {
        self.default_str = Some(default_str.into());
        self
    }

    /// Read input without echoing it (passwords). Default is false.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Maximum number of failed attempts before the prompt gives up.
    /// Unbounded when unset.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Replace the error-reporting strategy. Default prints to stderr.
    pub fn reporter(mut self, reporter: Rc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Format string for conversion failure reports.
    pub fn convertor_error_fmt(mut self, fmt: impl Into<String>) -> Self {
        self.convertor_error_fmt = fmt.into();
        self
    }

    /// Format string for validation failure reports.
    pub fn validator_error_fmt(mut self, fmt: impl Into<String>) -> Self {
        self.validator_error_fmt = fmt.into();
        self
    }

    /// Install an in-band command set.
    pub fn commands(mut self, commands: CommandSet) -> Self {
        self.commands = Rc::new(RefCell::new(commands));
        self
    }

    /// Share a command set owned elsewhere (the table engine shares one set
    /// across its prompts).
    pub fn commands_shared(mut self, commands: Rc<RefCell<CommandSet>>) -> Self {
        self.commands = commands;
        self
    }

    /// Append a cleaner to the chain. Cleaners run in the order added.
    pub fn cleaner(mut self, cleaner: impl Cleaner + 'static) -> Self {
        self.cleaners.push(Box::new(cleaner));
        self
    }

    /// Append a validator. Multiple validators are ANDed.
    pub fn validator(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// The full prompt line, including the default/optional suffix.
    fn prompt_line(&self) -> String {
        let suffix = if let Some(default) = &self.default {
            let shown = self.default_str.as_deref().unwrap_or(default.as_str());
            format!(" (enter for: {})", shown)
        } else if !self.required {
            " (enter to leave blank)".to_string()
        } else {
            String::new()
        };
        format!("{}{}: ", self.prompt, suffix)
    }

    fn process(&self, raw: &str) -> Result<T, ProcessError> {
        process_value(
            raw,
            &self.cleaners,
            self.convertor.as_ref(),
            &self.validators,
            self.reporter.as_ref(),
            &self.convertor_error_fmt,
            &self.validator_error_fmt,
        )
    }

    /// Prompt until a valid value is entered, the retry budget runs out, or
    /// a command cancels.
    ///
    /// Returns `Ok(None)` only when the prompt is not required and the user
    /// entered a blank line: the absence of a value, distinct from any
    /// actual value.
    pub fn get(&mut self, io: &mut dyn TerminalIO) -> Result<Option<T>, PromptError> {
        let prompt_line = self.prompt_line();
        let mut attempts: u32 = 0;

        loop {
            io.write(&prompt_line)?;

            let raw = if self.hidden {
                io.read_secure_line()?
            } else {
                let line = io.read_line()?;
                if line.is_empty() {
                    // Zero-length read means EOF (Ctrl+D).
                    return Err(PromptError::Interrupted);
                }
                line.trim_end_matches('\n').trim_end_matches('\r').to_string()
            };

            let raw = match self.commands.borrow_mut().dispatch(&raw) {
                Some(CommandOutcome::UseValue(payload)) => payload,
                Some(CommandOutcome::NoOp) => continue,
                Some(CommandOutcome::Cancel) => return Err(PromptError::Interrupted),
                Some(CommandOutcome::Navigate(nav)) => return Err(PromptError::Navigation(nav)),
                None => raw,
            };

            if raw.is_empty() {
                if let Some(default) = self.default.clone() {
                    // A broken default is a programming defect, not user
                    // error: fail immediately instead of retrying.
                    return match self.process(&default) {
                        Ok(value) => Ok(Some(value)),
                        Err(err) => Err(PromptError::Configuration(format!(
                            "default value \"{}\" failed processing: {}",
                            default, err
                        ))),
                    };
                }
                if !self.required {
                    return Ok(None);
                }
                // Required with no default: re-prompt. A blank line is not a
                // failed attempt.
                continue;
            }

            match self.process(&raw) {
                Ok(value) => return Ok(Some(value)),
                Err(_) => {
                    attempts += 1;
                    if let Some(max) = self.retries {
                        if attempts >= max {
                            return Err(PromptError::MaxRetries { attempts });
                        }
                    }
                }
            }
        }
    }
}

/// Prompt for an entry of a fixed `(id, value)` table and return the
/// requested side of the matched entry.
///
/// `input` controls what the user types (id, value, or either — value
/// preferred); `output` controls what comes back. A `default` may name
/// either side of an entry; it is shown as given and processed as the input
/// side expects.
pub fn pick_from_table(
    io: &mut dyn TerminalIO,
    entries: &[TableEntry],
    input: LookupMode,
    output: ReturnMode,
    prompt: &str,
    default: Option<&str>,
) -> Result<Option<TableCell>, PromptError> {
    let mut allowed: Vec<TableCell> = Vec::new();
    if matches!(input, LookupMode::Value | LookupMode::Either) {
        allowed.extend(entries.iter().map(|e| TableCell::Value(e.value.clone())));
    }
    if matches!(input, LookupMode::Id | LookupMode::Either) {
        allowed.extend(entries.iter().map(|e| TableCell::Id(e.id)));
    }

    let mut session = Prompt::new(TableConvertor::new(entries.iter().cloned(), input))
        .prompt(prompt)
        .cleaner(StripCleaner::default())
        .validator(ChoiceValidator::new(allowed));

    if let Some(default) = default {
        let entry = entries
            .iter()
            .find(|e| e.value == default || e.id.to_string() == default)
            .ok_or_else(|| {
                PromptError::Configuration(format!(
                    "default value \"{}\" not found in table",
                    default
                ))
            })?;
        let raw = match input {
            LookupMode::Id => entry.id.to_string(),
            LookupMode::Value | LookupMode::Either => entry.value.clone(),
        };
        session = session.default(raw).default_str(default);
    }

    let cell = session.get(io)?;
    Ok(cell.and_then(|c| resolve_return(entries, &c, output)))
}
