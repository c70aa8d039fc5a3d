//! Error-reporting strategies.
//!
//! Convertors and validators describe failures through an [`ErrorReporter`]
//! rather than printing directly. The reporter receives a format string plus
//! the offending value and a human-readable reason, so the same pipeline can
//! print to the user, write to the log, or stay silent (the NONE combinator
//! relies on the silent strategy to suppress expected mismatches).

use std::cell::RefCell;
use std::rc::Rc;

/// Default format for conversion failures.
pub const DEFAULT_CONVERTOR_ERROR: &str = "\"{value}\" cannot be converted to {error_content}";

/// Default format for validation failures.
pub const DEFAULT_VALIDATOR_ERROR: &str = "\"{value}\" {error_content}";

/// Receives failure reports from convertors and validators.
///
/// `fmt` may reference `{value}` and `{error_content}`; use
/// [`render_message`] to produce the final text.
pub trait ErrorReporter {
    /// Report one failure.
    fn report(&self, fmt: &str, value: &str, reason: &str);
}

/// Substitute `{value}` and `{error_content}` into a report format string.
pub fn render_message(fmt: &str, value: &str, reason: &str) -> String {
    fmt.replace("{value}", value).replace("{error_content}", reason)
}

/// Print reports to stderr. The default strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintReporter;

impl ErrorReporter for PrintReporter {
    fn report(&self, fmt: &str, value: &str, reason: &str) {
        eprintln!("{}", render_message(fmt, value, reason));
    }
}

/// Send reports to the log instead of the screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, fmt: &str, value: &str, reason: &str) {
        tracing::error!("{}", render_message(fmt, value, reason));
    }
}

/// Discard reports entirely.
///
/// Used internally by the NONE combinator so that an expected mismatch does
/// not chatter at the user; also useful when the caller renders failures
/// itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ErrorReporter for SilentReporter {
    fn report(&self, _fmt: &str, _value: &str, _reason: &str) {}
}

/// Accumulate rendered reports in memory, for tests.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// prompt owns another.
#[derive(Debug, Default, Clone)]
pub struct CapturingReporter {
    messages: Rc<RefCell<Vec<String>>>,
}

impl CapturingReporter {
    /// Create an empty capturing reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages reported so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// True if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl ErrorReporter for CapturingReporter {
    fn report(&self, fmt: &str, value: &str, reason: &str) {
        self.messages
            .borrow_mut()
            .push(render_message(fmt, value, reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_both_placeholders() {
        let msg = render_message(DEFAULT_CONVERTOR_ERROR, "abc", "an integer number");
        assert_eq!(msg, "\"abc\" cannot be converted to an integer number");
    }

    #[test]
    fn render_leaves_plain_text_alone() {
        assert_eq!(render_message("nothing here", "v", "r"), "nothing here");
    }

    #[test]
    fn capturing_reporter_accumulates() {
        let reporter = CapturingReporter::new();
        assert!(reporter.is_empty());

        reporter.report(DEFAULT_VALIDATOR_ERROR, "7", "too low (min_val=10)");
        reporter.report(DEFAULT_VALIDATOR_ERROR, "99", "too high (max_val=50)");

        let messages = reporter.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "\"7\" too low (min_val=10)");
    }

    #[test]
    fn capturing_clones_share_the_buffer() {
        let reporter = CapturingReporter::new();
        let handle = reporter.clone();
        reporter.report("{value}", "x", "");
        assert_eq!(handle.messages(), vec!["x".to_string()]);
    }

    #[test]
    fn silent_reporter_discards() {
        // Nothing observable; just make sure it is callable.
        SilentReporter.report("{value}", "x", "y");
    }
}
