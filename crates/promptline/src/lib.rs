//! Typed, validated terminal prompts.
//!
//! `promptline` reads a line of text from a terminal, runs it through a
//! pipeline of cleaning, type conversion, and validation steps, and returns
//! a typed, validated value — retrying on failure up to a configurable
//! limit.
//!
//! # Quick Start
//!
//! ```ignore
//! use promptline::{IntConvertor, Prompt, RangeValidator, RealTerminal, StripCleaner};
//!
//! let mut term = RealTerminal::new();
//! let age = Prompt::new(IntConvertor::new())
//!     .prompt("Enter your age")
//!     .cleaner(StripCleaner::default())
//!     .validator(RangeValidator::new(Some(0), Some(130)))
//!     .retries(3)
//!     .get(&mut term)?;
//! ```
//!
//! # Architecture
//!
//! Raw input flows through three composable stages before it is accepted:
//!
//! ```text
//! raw text → Cleaners → Convertor → Validators → typed value
//!                 │           │           │
//!                 └── retry on conversion or validation failure ──┘
//! ```
//!
//! - [`Cleaner`]s are pure text transforms (strip, case-fold, prefix
//!   completion) applied in order.
//! - A [`Convertor`] parses the cleaned text into a typed value, reporting
//!   the expected shape on failure.
//! - [`Validator`]s are predicates over the typed value, composable with
//!   ALL/ANY/NONE semantics ([`in_all`], [`in_any`], [`not_in`]).
//! - [`Prompt`] drives the retry loop, default substitution, masked input,
//!   and in-band [`CommandSet`] handling.
//!
//! The selection-table and menu layer built on this pipeline lives in the
//! `promptline-table` crate.
//!
//! # Testing
//!
//! All terminal access goes through the [`TerminalIO`] trait;
//! [`MockTerminal`] drives a prompt from a canned sequence of lines and
//! captures output:
//!
//! ```
//! use promptline::{IntConvertor, MockTerminal, Prompt, SilentReporter};
//! use std::rc::Rc;
//!
//! let mut term = MockTerminal::with_responses(["oops", "12"]);
//! let mut prompt = Prompt::new(IntConvertor::new()).reporter(Rc::new(SilentReporter));
//! assert_eq!(prompt.get(&mut term).unwrap(), Some(12));
//! ```
//!
//! This crate is single-threaded by design: prompts, reporters, and command
//! sets share state through `Rc` and are not `Send`. One interactive
//! terminal session at a time.

pub mod clean;
pub mod command;
pub mod convert;
mod error;
pub mod prompt;
pub mod report;
pub mod term;
pub mod validate;

pub use clean::{
    clean_value, CapStyle, CapitalizeCleaner, ChoiceCleaner, Cleaner, RegexCleaner, RemoveCleaner,
    ReplaceCleaner, StripCleaner,
};
pub use command::{CommandHandler, CommandOutcome, CommandSet, NavRequest};
pub use convert::{
    resolve_return, BooleanConvertor, ChoiceIndexConvertor, Convertor, ConvertorError,
    DateConvertor, FloatConvertor, IdentityConvertor, IntConvertor, ListConvertor, LookupMode,
    ReturnMode, TableCell, TableConvertor, TableEntry, YesNoConvertor,
};
pub use error::{ProcessError, PromptError};
pub use prompt::{pick_from_table, process_value, Prompt};
pub use report::{
    render_message, CapturingReporter, ErrorReporter, LogReporter, PrintReporter, SilentReporter,
    DEFAULT_CONVERTOR_ERROR, DEFAULT_VALIDATOR_ERROR,
};
pub use term::{read_all_stdin, MockTerminal, RealTerminal, TerminalIO};
pub use validate::{
    in_all, in_any, not_in, AllOfValidator, AnyOfValidator, ChoiceValidator, EqualToValidator,
    FnValidator, LengthValidator, ListValidator, NoneOfValidator, PasswordValidator,
    RangeValidator, RegexValidator, Validator,
};
