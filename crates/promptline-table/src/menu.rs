//! Menus: a thin specialization of [`Table`] for "choose one of N named
//! items and optionally run a callback".

use std::rc::Rc;

use promptline::{ErrorReporter, PromptError, TerminalIO};

use crate::context::ActionContext;
use crate::item::{AddExit, TableItem};
use crate::render::RuleStyle;
use crate::table::Table;

/// A simple menu over a list of labelled items.
///
/// Menus render without borders, column headers, or rules, and select by
/// tag (positional numbers unless items carry explicit tags).
///
/// # Example
///
/// ```
/// use promptline::MockTerminal;
/// use promptline_table::Menu;
///
/// let mut menu = Menu::new(["new game", "load game", "settings"]);
/// let mut term = MockTerminal::with_response("2");
/// assert_eq!(menu.get_choice(&mut term).unwrap(), Some("2".to_string()));
/// ```
pub struct Menu<C = ()> {
    table: Table<C>,
}

impl Menu<()> {
    /// Create a menu from item labels, numbered 1..N.
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let items = labels
            .into_iter()
            .map(|label| TableItem::new([label.into()]))
            .collect();
        Self::from_items(items, ())
    }
}

impl<C: ActionContext> Menu<C> {
    /// Create a menu from full items (tags, actions, data) and a context.
    pub fn from_items(items: Vec<TableItem<C>>, ctx: C) -> Self {
        let table = Table::with_context(items, ctx)
            .prompt("Choose a menu item")
            .show_border(false)
            .show_header(false)
            .hrules(RuleStyle::None)
            .vrules(RuleStyle::None);
        Self { table }
    }

    /// A title printed above the menu.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.table = self.table.title(title);
        self
    }

    /// The selection prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.table = self.table.prompt(prompt);
        self
    }

    /// Default item for blank input, matched against an item's tag first,
    /// then its label.
    pub fn default_choice(mut self, choice: impl Into<String>) -> Self {
        let choice = choice.into();
        let mut resolved = choice.clone();
        for (i, item) in self.table.items().iter().enumerate() {
            let by_tag = item.item_tag() == Some(choice.as_str());
            let by_label = item.values().first() == Some(&choice);
            if by_tag || by_label {
                resolved = item
                    .item_tag()
                    .map(str::to_string)
                    .unwrap_or_else(|| (i + 1).to_string());
                break;
            }
        }
        self.table = self.table.default_choice(resolved).default_str(choice);
        self
    }

    /// Auto-append an exit or return item.
    pub fn add_exit(mut self, add_exit: AddExit) -> Self {
        self.table = self.table.add_exit(add_exit);
        self
    }

    /// Match selections case-sensitively. Default false.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.table = self.table.case_sensitive(case_sensitive);
        self
    }

    /// Whether a selection must be made. Default true.
    pub fn required(mut self, required: bool) -> Self {
        self.table = self.table.required(required);
        self
    }

    /// Retry budget per selection. Unbounded when unset.
    pub fn retries(mut self, retries: u32) -> Self {
        self.table = self.table.retries(retries);
        self
    }

    /// Replace the error-reporting strategy.
    pub fn reporter(mut self, reporter: Rc<dyn ErrorReporter>) -> Self {
        self.table = self.table.reporter(reporter);
        self
    }

    /// Stop the run loop on interrupt instead of continuing. Default false.
    pub fn stop_on_interrupt(mut self, stop: bool) -> Self {
        self.table = self.table.stop_on_interrupt(stop);
        self
    }

    /// The underlying table, for options the menu does not surface.
    pub fn table_mut(&mut self) -> &mut Table<C> {
        &mut self.table
    }

    /// Display the menu and return the chosen item's tag, without running
    /// its action.
    ///
    /// Returns `None` when a non-required menu was left blank. Choosing an
    /// auto-appended exit/return item returns its tag (`"exit"` /
    /// `"return"`).
    pub fn get_choice(&mut self, io: &mut dyn TerminalIO) -> Result<Option<String>, PromptError> {
        match self.table.select(io)? {
            Some(idx) => Ok(Some(self.table.live_rows()[idx].tag.clone())),
            None => Ok(None),
        }
    }

    /// Loop selecting and dispatching item actions until an exit/return
    /// item is chosen.
    ///
    /// A menu's `run` can itself be installed as another menu item's action
    /// to build nested menus.
    pub fn run(&mut self, io: &mut dyn TerminalIO) -> Result<(), PromptError> {
        self.table.run(io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ActionValue;
    use promptline::{MockTerminal, SilentReporter};

    fn silent() -> Rc<SilentReporter> {
        Rc::new(SilentReporter)
    }

    #[test]
    fn numbered_labels() {
        let mut menu = Menu::new(["alpha", "beta"]).reporter(silent());
        let mut term = MockTerminal::with_response("1");
        assert_eq!(menu.get_choice(&mut term).unwrap(), Some("1".to_string()));
    }

    #[test]
    fn menu_renders_without_table_chrome() {
        let mut menu = Menu::new(["alpha", "beta"]).reporter(silent());
        let mut term = MockTerminal::with_response("1");
        menu.get_choice(&mut term).unwrap();
        let output = term.output();
        assert!(output.contains("1  alpha"));
        assert!(!output.contains('+'));
        assert!(!output.contains('|'));
        assert!(!output.contains("col 1"));
    }

    #[test]
    fn default_choice_matches_label() {
        let mut menu = Menu::new(["alpha", "beta"])
            .reporter(silent())
            .default_choice("beta");
        let mut term = MockTerminal::with_response("");
        assert_eq!(menu.get_choice(&mut term).unwrap(), Some("2".to_string()));
        assert!(term.output().contains("(enter for: beta)"));
    }

    #[test]
    fn default_choice_matches_tag() {
        let items = vec![
            TableItem::new(["alpha"]).tag("a"),
            TableItem::new(["beta"]).tag("b"),
        ];
        let mut menu = Menu::from_items(items, ())
            .reporter(silent())
            .default_choice("b");
        let mut term = MockTerminal::with_response("");
        assert_eq!(menu.get_choice(&mut term).unwrap(), Some("b".to_string()));
    }

    #[test]
    fn exit_item_is_reported_by_tag() {
        let mut menu = Menu::new(["alpha"])
            .reporter(silent())
            .add_exit(AddExit::Exit);
        let mut term = MockTerminal::with_response("exit");
        assert_eq!(
            menu.get_choice(&mut term).unwrap(),
            Some("exit".to_string())
        );
    }

    #[test]
    fn prefix_completion_works_for_named_tags() {
        let items = vec![
            TableItem::new(["database"]).tag("database"),
            TableItem::new(["display"]).tag("display"),
        ];
        let mut menu = Menu::from_items(items, ()).reporter(silent());
        let mut term = MockTerminal::with_response("data");
        assert_eq!(
            menu.get_choice(&mut term).unwrap(),
            Some("database".to_string())
        );
    }

    #[test]
    fn run_dispatches_until_exit() {
        struct Counter(u32);
        impl crate::ActionContext for Counter {}

        let items = vec![
            TableItem::new(["increment"]).on_select(|_, counter: &mut Counter, _| {
                counter.0 += 1;
                Ok(ActionValue::None)
            }),
        ];
        let mut menu = Menu::from_items(items, Counter(0))
            .reporter(silent())
            .add_exit(AddExit::Exit);

        let mut term = MockTerminal::with_responses(["1", "1", "exit"]);
        menu.run(&mut term).unwrap();
        assert_eq!(menu.table_mut().context().0, 2);
    }
}
