//! Error types for prompt processing.

use crate::command::NavRequest;
use crate::convert::ConvertorError;

/// Errors that can escape a prompt call.
///
/// Conversion and validation failures are handled inside the retry loop and
/// never surface here; what does surface is the terminal outcome of the whole
/// prompt: the retry budget ran out, an in-band command cancelled the prompt,
/// the configuration itself was broken, or the terminal failed.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The retry budget was exhausted without a valid value.
    #[error("maximum retries exceeded after {attempts} failed attempts")]
    MaxRetries {
        /// Number of failed attempts consumed.
        attempts: u32,
    },

    /// An in-band command cancelled the prompt, or the terminal reached EOF.
    ///
    /// Distinguishable from [`PromptError::MaxRetries`] so callers can offer
    /// different recovery ("go back" vs "give up").
    #[error("input interrupted")]
    Interrupted,

    /// The prompt was misconfigured: a default value that fails its own
    /// pipeline, duplicate selection keys, and similar programming defects.
    /// Never retried.
    #[error("invalid prompt configuration: {0}")]
    Configuration(String),

    /// An in-band navigation command fired.
    ///
    /// The selection-table display loop consumes these entirely; they only
    /// reach other callers when navigation commands were installed on a
    /// plain prompt.
    #[error("unhandled navigation request")]
    Navigation(NavRequest),

    /// The underlying terminal read or write failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Why one pass through the clean/convert/validate pipeline failed.
///
/// Both variants are recoverable: inside a prompt they consume one attempt
/// and trigger a re-prompt. [`process_value`](crate::process_value) returns
/// them directly for callers that feed values from somewhere other than a
/// terminal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProcessError {
    /// The cleaned text could not be parsed into the target type.
    #[error(transparent)]
    Conversion(#[from] ConvertorError),

    /// The value parsed but failed a validator.
    #[error("\"{value}\" failed validation")]
    Validation {
        /// The cleaned text that failed.
        value: String,
    },
}
