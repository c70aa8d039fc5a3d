//! Rows of a selection table.

use promptline::{PromptError, TerminalIO};
use serde_json::Value;

/// What dispatching a selected row produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionValue {
    /// The action ran and has nothing to return.
    None,
    /// The selected row's tag.
    Tag(String),
    /// A single column value.
    Value(String),
    /// The full list of column values.
    Row(Vec<String>),
    /// The resolved row itself.
    Item(Row),
}

/// A row action callback: `(selected row, action context, terminal) ->
/// value`.
///
/// The returned value propagates to the table's caller; a
/// [`PromptError::Interrupted`] error unwinds the selection (and is handled
/// by the run loop). The terminal is passed through so actions can prompt
/// in turn — installing a sub-table's `run` as an action nests menus.
pub type ActionFn<C> =
    Box<dyn FnMut(&Row, &mut C, &mut dyn TerminalIO) -> Result<ActionValue, PromptError>>;

/// What selecting a row does.
pub enum Action<C> {
    /// Defer to the table's default action.
    Default,
    /// Leave the table (exit a menu).
    Exit,
    /// Return from the table (leave a submenu).
    Return,
    /// Run a callback.
    Run(ActionFn<C>),
}

impl<C> Action<C> {
    /// Wrap a callback as a row action.
    pub fn run(
        f: impl FnMut(&Row, &mut C, &mut dyn TerminalIO) -> Result<ActionValue, PromptError> + 'static,
    ) -> Self {
        Action::Run(Box::new(f))
    }
}

/// The table-level default action, used by rows whose action is
/// [`Action::Default`].
pub enum DefaultAction<C> {
    /// Return the selected row's tag.
    Tag,
    /// Return the selected row's first column value.
    FirstValue,
    /// Return the selected row's column values.
    Row,
    /// Return the resolved row itself.
    Item,
    /// Run a callback.
    Run(ActionFn<C>),
}

impl<C> DefaultAction<C> {
    /// Wrap a callback as the default action.
    pub fn run(
        f: impl FnMut(&Row, &mut C, &mut dyn TerminalIO) -> Result<ActionValue, PromptError> + 'static,
    ) -> Self {
        DefaultAction::Run(Box::new(f))
    }
}

/// Whether the table auto-appends a terminal row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddExit {
    /// No synthetic row.
    #[default]
    None,
    /// Append an `exit` row.
    Exit,
    /// Append a `return` row.
    Return,
}

/// One authored entry of a selection table.
///
/// A table item carries its display columns, an optional selection tag
/// (assigned positionally when unset), an action, an opaque data payload
/// available to actions and filters but never displayed, and two
/// independent flags: `hidden` (not printed, still selectable) and
/// `enabled` (selectable at all).
pub struct TableItem<C> {
    pub(crate) values: Vec<String>,
    pub(crate) tag: Option<String>,
    pub(crate) action: Action<C>,
    pub(crate) data: Option<Value>,
    pub(crate) hidden: bool,
    pub(crate) enabled: bool,
}

impl<C> TableItem<C> {
    /// Create an item from its column values, with the table's default
    /// action.
    pub fn new(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            tag: None,
            action: Action::Default,
            data: None,
            hidden: false,
            enabled: true,
        }
    }

    /// Set the selection tag. Must be unique among enabled rows.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the row action.
    pub fn action(mut self, action: Action<C>) -> Self {
        self.action = action;
        self
    }

    /// Shorthand for setting a callback action.
    pub fn on_select(
        self,
        f: impl FnMut(&Row, &mut C, &mut dyn TerminalIO) -> Result<ActionValue, PromptError> + 'static,
    ) -> Self {
        self.action(Action::run(f))
    }

    /// Attach an opaque data payload (database ids, role sets, anything the
    /// actions or filters need).
    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Exclude the row from rendering. A hidden, enabled row stays
    /// selectable by its tag.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Whether the row can be selected.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The column values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The authored tag, if any.
    pub fn item_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The data payload, if any.
    pub fn item_data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// What kind of live row this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowKind {
    /// An authored item.
    Item,
    /// The synthetic or authored exit row.
    Exit,
    /// The synthetic or authored return row.
    Return,
}

/// A resolved row of the live table: tags assigned, columns interpolated,
/// filter flags applied.
///
/// This is the value handed to actions and returned through
/// [`ActionValue::Item`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// The selection tag (authored or positional).
    pub tag: String,
    /// Interpolated column values.
    pub values: Vec<String>,
    /// The source item's data payload.
    pub data: Option<Value>,
    /// Not rendered, but selectable while enabled.
    pub hidden: bool,
    /// Selectable at all.
    pub enabled: bool,
    /// Index of the authoring item, `None` for synthetic rows.
    pub(crate) source: Option<usize>,
    pub(crate) kind: RowKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_defaults() {
        let item: TableItem<()> = TableItem::new(["red"]);
        assert_eq!(item.values(), ["red".to_string()]);
        assert_eq!(item.item_tag(), None);
        assert!(!item.hidden);
        assert!(item.enabled);
        assert!(matches!(item.action, Action::Default));
    }

    #[test]
    fn item_builder() {
        let item: TableItem<()> = TableItem::new(["add user", "admin only"])
            .tag("a")
            .data(json!({"roles": ["admin"]}))
            .hidden(true)
            .enabled(false);
        assert_eq!(item.item_tag(), Some("a"));
        assert_eq!(item.item_data().unwrap()["roles"][0], "admin");
        assert!(item.hidden);
        assert!(!item.enabled);
    }

    #[test]
    fn action_constructors() {
        let action: Action<u32> = Action::run(|row, count, _io| {
            *count += 1;
            Ok(ActionValue::Tag(row.tag.clone()))
        });
        assert!(matches!(action, Action::Run(_)));
    }
}
