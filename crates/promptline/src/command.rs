//! In-band commands recognized inside raw input.
//!
//! A command is a trigger string checked against the start of the raw line
//! before any processing happens. Its handler decides what the prompt does
//! next: substitute a value, quietly re-prompt, cancel, or request a
//! navigation action that the selection-table display loop consumes.

/// What a command handler asks the prompt to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Substitute this payload for the raw input and continue processing.
    UseValue(String),
    /// Discard the line and re-prompt without consuming a retry.
    NoOp,
    /// Cancel the prompt; surfaces as an interrupted condition.
    Cancel,
    /// Request a table navigation action.
    Navigate(NavRequest),
}

/// Table navigation actions requestable through commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    /// Jump to the first page.
    FirstPage,
    /// Jump to the last page.
    LastPage,
    /// Advance one page.
    NextPage,
    /// Go back one page.
    PrevPage,
    /// Scroll one row towards the top.
    ScrollUp,
    /// Scroll one row towards the bottom.
    ScrollDown,
    /// Re-run the table's refresh and start over at the first page.
    Refresh,
}

/// A command handler: `(trigger, remainder_of_line) -> outcome`.
///
/// Any context a handler needs travels in its closure capture.
pub type CommandHandler = Box<dyn FnMut(&str, &str) -> CommandOutcome>;

/// An ordered registry of command triggers.
///
/// Triggers are matched in insertion order against the start of the raw
/// line; the first match wins and receives the trigger plus the rest of the
/// line with leading whitespace removed.
///
/// # Example
///
/// ```
/// use promptline::{CommandOutcome, CommandSet};
///
/// let mut commands = CommandSet::new();
/// commands.command("/default", |_, rest| {
///     CommandOutcome::UseValue(if rest.is_empty() { "42".into() } else { rest.into() })
/// });
/// commands.command("/cancel", |_, _| CommandOutcome::Cancel);
///
/// assert_eq!(
///     commands.dispatch("/default 7"),
///     Some(CommandOutcome::UseValue("7".to_string()))
/// );
/// assert_eq!(commands.dispatch("plain input"), None);
/// ```
#[derive(Default)]
pub struct CommandSet {
    entries: Vec<(String, CommandHandler)>,
}

impl CommandSet {
    /// Create an empty command set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command handler for `trigger`.
    pub fn command(
        &mut self,
        trigger: impl Into<String>,
        handler: impl FnMut(&str, &str) -> CommandOutcome + 'static,
    ) -> &mut Self {
        self.entries.push((trigger.into(), Box::new(handler)));
        self
    }

    /// Register a navigation command for `trigger`.
    pub fn navigation(&mut self, trigger: impl Into<String>, nav: NavRequest) -> &mut Self {
        self.command(trigger, move |_, _| CommandOutcome::Navigate(nav))
    }

    /// True if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match `line` against the registered triggers and run the handler.
    ///
    /// Returns `None` when no trigger matches; the line is then processed as
    /// ordinary input.
    pub fn dispatch(&mut self, line: &str) -> Option<CommandOutcome> {
        for (trigger, handler) in self.entries.iter_mut() {
            if line.starts_with(trigger.as_str()) {
                let rest = line[trigger.len()..].trim_start();
                return Some(handler(trigger, rest));
            }
        }
        None
    }
}

impl std::fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSet")
            .field(
                "triggers",
                &self.entries.iter().map(|(t, _)| t).collect::<Vec<_>>(),
            )
            .finish()
    }
}
