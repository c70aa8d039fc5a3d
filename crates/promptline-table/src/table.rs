//! The selection-table engine.
//!
//! A [`Table`] presents an ordered, paginated, optionally filtered list of
//! rows, delegates the key-entry step to a `promptline` prompt configured
//! against the currently live keys, and dispatches the selected row's
//! action.

use std::cell::RefCell;
use std::rc::Rc;

use promptline::{
    CapStyle, CapitalizeCleaner, ChoiceCleaner, ChoiceIndexConvertor, CommandOutcome, CommandSet,
    ErrorReporter, NavRequest, PrintReporter, Prompt, PromptError, RangeValidator, StripCleaner,
    TerminalIO,
};

use crate::context::{interpolate, ActionContext};
use crate::item::{Action, ActionValue, AddExit, DefaultAction, Row, RowKind, TableItem};
use crate::render::{render_table, Align, RenderOptions, RuleStyle};

/// An item filter: `(item, action context) -> (hidden, enabled)`.
///
/// Rows the filter marks hidden leave the live set entirely; rows it marks
/// disabled stay visible but cannot be selected.
pub type ItemFilter<C> = Box<dyn Fn(&TableItem<C>, &C) -> (bool, bool)>;

/// A paginated, filterable table of selectable rows.
///
/// # Example
///
/// ```
/// use promptline::MockTerminal;
/// use promptline_table::{ActionValue, Table, TableItem};
///
/// let mut table = Table::new(vec![
///     TableItem::new(["red"]),
///     TableItem::new(["green"]),
/// ])
/// .prompt("Pick a color");
///
/// let mut term = MockTerminal::with_response("2");
/// let picked = table.get_choice(&mut term).unwrap();
/// assert_eq!(picked, Some(ActionValue::Tag("2".to_string())));
/// ```
pub struct Table<C = ()> {
    items: Vec<TableItem<C>>,
    ctx: C,

    col_names: Option<Vec<String>>,
    title: Option<String>,
    prompt: String,
    default_choice: Option<String>,
    default_str: Option<String>,
    default_action: Option<DefaultAction<C>>,
    rows_per_page: usize,
    required: bool,
    tag_header: String,
    add_exit: AddExit,
    case_sensitive: bool,
    dynamic: bool,
    stop_on_interrupt: bool,
    header: Option<String>,
    footer: Option<String>,
    retries: Option<u32>,
    render: RenderOptions,
    reporter: Rc<dyn ErrorReporter>,
    commands: Rc<RefCell<CommandSet>>,
    item_filter: Option<ItemFilter<C>>,

    live: Vec<Row>,
    start: usize,
    refreshed: bool,
}

impl Table<()> {
    /// Create a table with no action context.
    pub fn new(items: Vec<TableItem<()>>) -> Self {
        Self::with_context(items, ())
    }
}

fn default_commands() -> CommandSet {
    let mut set = CommandSet::new();
    set.navigation(":first", NavRequest::FirstPage);
    set.navigation(":last", NavRequest::LastPage);
    set.navigation(":next", NavRequest::NextPage);
    set.navigation(":prev", NavRequest::PrevPage);
    set.navigation(":up", NavRequest::ScrollUp);
    set.navigation(":down", NavRequest::ScrollDown);
    set.navigation(":refresh", NavRequest::Refresh);
    set
}

impl<C: ActionContext> Table<C> {
    /// Create a table whose actions and filters share `ctx`.
    pub fn with_context(items: Vec<TableItem<C>>, ctx: C) -> Self {
        Self {
            items,
            ctx,
            col_names: None,
            title: None,
            prompt: "Choose a table item".to_string(),
            default_choice: None,
            default_str: None,
            default_action: Some(DefaultAction::Tag),
            rows_per_page: 20,
            required: true,
            tag_header: String::new(),
            add_exit: AddExit::None,
            case_sensitive: false,
            dynamic: true,
            stop_on_interrupt: false,
            header: None,
            footer: None,
            retries: None,
            render: RenderOptions::default(),
            reporter: Rc::new(PrintReporter),
            commands: Rc::new(RefCell::new(default_commands())),
            item_filter: None,
            live: Vec::new(),
            start: 0,
            refreshed: false,
        }
    }

    /// Name the value columns. Defaults to `col 1`, `col 2`, ...
    pub fn col_names(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.col_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// A title printed above the table.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The prompt shown when asking for a selection.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Default selection tag for blank input.
    pub fn default_choice(mut self, tag: impl Into<String>) -> Self {
        self.default_choice = Some(tag.into());
        self
    }

    /// Display string for the default selection.
    pub fn default_str(mut self, default_str: impl Into<String>) -> Self {
        self.default_str = Some(default_str.into());
        self
    }

    /// The action used by rows whose action is [`Action::Default`].
    /// Defaults to returning the row's tag.
    pub fn default_action(mut self, action: DefaultAction<C>) -> Self {
        self.default_action = Some(action);
        self
    }

    /// Remove the default action; selecting a default-action row then
    /// reports a recoverable message instead.
    pub fn no_default_action(mut self) -> Self {
        self.default_action = None;
        self
    }

    /// Rows shown per page. Default 20.
    pub fn rows_per_page(mut self, rows: usize) -> Self {
        self.rows_per_page = rows.max(1);
        self
    }

    /// Whether a selection must be made. When false, blank input leaves the
    /// table with no selection. Default true.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Header text for the tag column. Default empty.
    pub fn tag_header(mut self, header: impl Into<String>) -> Self {
        self.tag_header = header.into();
        self
    }

    /// Auto-append a synthetic exit/return row.
    pub fn add_exit(mut self, add_exit: AddExit) -> Self {
        self.add_exit = add_exit;
        self
    }

    /// Match selection keys case-sensitively. Default false.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Recompute row visibility and enablement on every display (dynamic
    /// tables) or only once (static). Default true.
    pub fn refresh_on_display(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Stop a [`run`](Self::run) loop when a prompt or action is
    /// interrupted, instead of reporting and continuing. Default false.
    pub fn stop_on_interrupt(mut self, stop: bool) -> Self {
        self.stop_on_interrupt = stop;
        self
    }

    /// Template printed before the table. `{name}` placeholders resolve
    /// against the action context plus `current_page`, `num_pages`, and
    /// `rows`.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Template printed after the table; same placeholders as the header.
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Retry budget for each selection prompt. Unbounded when unset.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Draw a border around the table. Default true.
    pub fn show_border(mut self, show: bool) -> Self {
        self.render.show_border = show;
        self
    }

    /// Print the column names above the rows. Default true.
    pub fn show_header(mut self, show: bool) -> Self {
        self.render.show_header = show;
        self
    }

    /// Horizontal rule style. Default frame only.
    pub fn hrules(mut self, style: RuleStyle) -> Self {
        self.render.hrules = style;
        self
    }

    /// Vertical rule style. Default frame only.
    pub fn vrules(mut self, style: RuleStyle) -> Self {
        self.render.vrules = style;
        self
    }

    /// Replace the error-reporting strategy for selection prompts.
    pub fn reporter(mut self, reporter: Rc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Register an in-band command alongside the built-in navigation
    /// commands (`:first`, `:last`, `:next`, `:prev`, `:up`, `:down`,
    /// `:refresh`).
    pub fn command(
        self,
        trigger: impl Into<String>,
        handler: impl FnMut(&str, &str) -> CommandOutcome + 'static,
    ) -> Self {
        self.commands.borrow_mut().command(trigger, handler);
        self
    }

    /// Install an item filter deciding `(hidden, enabled)` per row on every
    /// refresh.
    pub fn item_filter(mut self, filter: impl Fn(&TableItem<C>, &C) -> (bool, bool) + 'static) -> Self {
        self.item_filter = Some(Box::new(filter));
        self
    }

    /// The authored source items.
    pub fn items(&self) -> &[TableItem<C>] {
        &self.items
    }

    /// The shared action context.
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Mutable access to the shared action context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// The live rows as of the last refresh.
    pub fn live_rows(&self) -> &[Row] {
        &self.live
    }

    /// Start index of the display window into the visible rows.
    pub fn window_start(&self) -> usize {
        self.start
    }

    /// Rebuild the live row list from the source items.
    ///
    /// Runs the item filter, assigns positional tags (1-based among
    /// surviving rows), interpolates column values against the action
    /// context, appends the synthetic exit/return row, and clamps the page
    /// window.
    pub fn refresh(&mut self) {
        let mut live: Vec<Row> = Vec::new();
        let mut position = 1usize;

        for (idx, item) in self.items.iter().enumerate() {
            let (hidden, enabled) = match &self.item_filter {
                Some(filter) => filter(item, &self.ctx),
                None => (item.hidden, item.enabled),
            };
            if self.item_filter.is_some() && hidden {
                // Filter-hidden rows leave the live set entirely.
                continue;
            }

            let tag = match &item.tag {
                Some(tag) => tag.clone(),
                None => position.to_string(),
            };
            position += 1;

            let values = item
                .values
                .iter()
                .map(|v| interpolate(v, &self.ctx, &[]))
                .collect();
            let kind = match item.action {
                Action::Exit => RowKind::Exit,
                Action::Return => RowKind::Return,
                _ => RowKind::Item,
            };

            live.push(Row {
                tag,
                values,
                data: item.data.clone(),
                hidden,
                enabled,
                source: Some(idx),
                kind,
            });
        }

        let num_cols = live
            .first()
            .map(|r| r.values.len())
            .or_else(|| self.col_names.as_ref().map(|c| c.len()))
            .unwrap_or(1);
        match self.add_exit {
            AddExit::None => {}
            AddExit::Exit => live.push(Row {
                tag: "exit".to_string(),
                values: vec![String::new(); num_cols],
                data: None,
                hidden: false,
                enabled: true,
                source: None,
                kind: RowKind::Exit,
            }),
            AddExit::Return => live.push(Row {
                tag: "return".to_string(),
                values: vec![String::new(); num_cols],
                data: None,
                hidden: false,
                enabled: true,
                source: None,
                kind: RowKind::Return,
            }),
        }

        self.live = live;
        self.refreshed = true;
        // Filtering can shrink the table past the current window.
        self.show_rows(self.start);
    }

    fn refresh_if_needed(&mut self) {
        if self.dynamic || !self.refreshed {
            self.refresh();
        }
    }

    fn visible_count(&self) -> usize {
        self.live.iter().filter(|r| !r.hidden).count()
    }

    /// Move the display window, clamped to the visible rows.
    fn show_rows(&mut self, start: usize) {
        let max_start = self.visible_count().saturating_sub(self.rows_per_page);
        self.start = start.min(max_start);
    }

    fn apply_nav(&mut self, nav: NavRequest) {
        match nav {
            NavRequest::FirstPage => self.show_rows(0),
            NavRequest::LastPage => self.show_rows(usize::MAX),
            NavRequest::NextPage => self.show_rows(self.start.saturating_add(self.rows_per_page)),
            NavRequest::PrevPage => self.show_rows(self.start.saturating_sub(self.rows_per_page)),
            NavRequest::ScrollUp => self.show_rows(self.start.saturating_sub(1)),
            NavRequest::ScrollDown => self.show_rows(self.start.saturating_add(1)),
            NavRequest::Refresh => {
                self.refresh();
                self.show_rows(0);
            }
        }
    }

    fn column_headers(&self) -> Vec<String> {
        let num_cols = self
            .col_names
            .as_ref()
            .map(|c| c.len())
            .or_else(|| self.items.first().map(|i| i.values.len()))
            .unwrap_or(1);

        let mut headers = Vec::with_capacity(num_cols + 1);
        headers.push(self.tag_header.clone());
        match &self.col_names {
            Some(names) => headers.extend(names.iter().cloned()),
            None => headers.extend((1..=num_cols).map(|i| format!("col {}", i))),
        }
        headers
    }

    /// Render the header template, title, current page, and footer.
    fn render_page(&self) -> String {
        let visible: Vec<&Row> = self.live.iter().filter(|r| !r.hidden).collect();
        let window_start = self.start.min(visible.len());
        let window_end = (self.start + self.rows_per_page).min(visible.len());
        let window = &visible[window_start..window_end];

        let num_pages = if visible.is_empty() {
            1
        } else {
            (visible.len() + self.rows_per_page - 1) / self.rows_per_page
        };
        let extras = [
            ("current_page", (self.start / self.rows_per_page + 1).to_string()),
            ("num_pages", num_pages.to_string()),
            ("rows", visible.len().to_string()),
        ];

        let headers = self.column_headers();
        let mut aligns = vec![Align::Left; headers.len()];
        aligns[0] = Align::Right;

        let rows: Vec<Vec<String>> = window
            .iter()
            .map(|r| {
                let mut cells = Vec::with_capacity(headers.len());
                cells.push(r.tag.clone());
                cells.extend(r.values.iter().cloned());
                cells.resize(headers.len(), String::new());
                cells
            })
            .collect();

        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(&interpolate(header, &self.ctx, &extras));
            out.push('\n');
        }
        if let Some(title) = &self.title {
            out.push_str(title);
            out.push('\n');
        }
        out.push_str(&render_table(&headers, &aligns, &rows, self.render));
        if let Some(footer) = &self.footer {
            out.push_str(&interpolate(footer, &self.ctx, &extras));
            out.push('\n');
        }
        out
    }

    /// Selection keys of the enabled live rows, with the live index each
    /// key maps to. Duplicate keys are a configuration error.
    fn choice_keys(&self) -> Result<(Vec<String>, Vec<usize>), PromptError> {
        let mut keys = Vec::new();
        let mut targets = Vec::new();
        for (idx, row) in self.live.iter().enumerate() {
            if !row.enabled {
                continue;
            }
            let key = if self.case_sensitive {
                row.tag.clone()
            } else {
                row.tag.to_lowercase()
            };
            if keys.contains(&key) {
                return Err(PromptError::Configuration(format!(
                    "duplicate selection key \"{}\" among enabled rows",
                    key
                )));
            }
            keys.push(key);
            targets.push(idx);
        }
        Ok((keys, targets))
    }

    fn build_session(&self, keys: &[String]) -> Prompt<usize> {
        let mut session = Prompt::new(ChoiceIndexConvertor::new(keys.to_vec()))
            .prompt(self.prompt.clone())
            .required(self.required)
            .reporter(self.reporter.clone())
            .commands_shared(self.commands.clone())
            .cleaner(StripCleaner::default());
        if !self.case_sensitive {
            session = session.cleaner(CapitalizeCleaner::new(CapStyle::Lower));
        }
        session = session
            .cleaner(ChoiceCleaner::new(keys.to_vec()))
            .validator(RangeValidator::new(
                Some(0),
                Some(keys.len().saturating_sub(1)),
            ));
        if let Some(default) = &self.default_choice {
            session = session.default(default.clone());
            if let Some(default_str) = &self.default_str {
                session = session.default_str(default_str.clone());
            }
        }
        if let Some(retries) = self.retries {
            session = session.retries(retries);
        }
        session
    }

    /// Display the table and prompt for one selection.
    ///
    /// Navigation commands are consumed here: they adjust the window,
    /// redisplay, and re-prompt without counting a retry. Returns the live
    /// index of the chosen row, or `None` when a non-required table was
    /// left blank.
    pub(crate) fn select(&mut self, io: &mut dyn TerminalIO) -> Result<Option<usize>, PromptError> {
        self.refresh_if_needed();
        self.show_rows(0);

        loop {
            let (keys, targets) = self.choice_keys()?;
            let mut session = self.build_session(&keys);

            io.write(&self.render_page())?;
            match session.get(io) {
                Ok(Some(pos)) => return Ok(Some(targets[pos])),
                Ok(None) => return Ok(None),
                Err(PromptError::Navigation(nav)) => {
                    self.apply_nav(nav);
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Run the selected row's action.
    fn dispatch(
        &mut self,
        live_idx: usize,
        io: &mut dyn TerminalIO,
    ) -> Result<ActionValue, PromptError> {
        let row = self.live[live_idx].clone();
        let source = match row.source {
            Some(source) => source,
            None => return Ok(ActionValue::None),
        };

        match &mut self.items[source].action {
            Action::Run(f) => f(&row, &mut self.ctx, io),
            Action::Exit | Action::Return => Ok(ActionValue::None),
            Action::Default => match &mut self.default_action {
                Some(DefaultAction::Run(f)) => f(&row, &mut self.ctx, io),
                Some(DefaultAction::Tag) => Ok(ActionValue::Tag(row.tag.clone())),
                Some(DefaultAction::FirstValue) => Ok(ActionValue::Value(
                    row.values.first().cloned().unwrap_or_default(),
                )),
                Some(DefaultAction::Row) => Ok(ActionValue::Row(row.values.clone())),
                Some(DefaultAction::Item) => Ok(ActionValue::Item(row)),
                None => {
                    // Recoverable: tell the user, do not crash.
                    io.write("no default action configured for this table\n")?;
                    Ok(ActionValue::None)
                }
            },
        }
    }

    /// Display the table without asking for input.
    pub fn show(&mut self, io: &mut dyn TerminalIO) -> Result<(), PromptError> {
        self.refresh_if_needed();
        io.write(&self.render_page())?;
        Ok(())
    }

    /// Prompt for one selection and dispatch its action.
    ///
    /// Returns `None` when no row was chosen: blank input on a non-required
    /// table, or the exit/return row.
    pub fn get_choice(
        &mut self,
        io: &mut dyn TerminalIO,
    ) -> Result<Option<ActionValue>, PromptError> {
        match self.select(io)? {
            None => Ok(None),
            Some(idx) => match self.live[idx].kind {
                RowKind::Exit | RowKind::Return => Ok(None),
                RowKind::Item => self.dispatch(idx, io).map(Some),
            },
        }
    }

    /// Repeatedly select and dispatch until an exit/return row is chosen.
    ///
    /// An interrupted prompt or action is reported to the terminal and the
    /// loop continues, unless
    /// [`stop_on_interrupt`](Self::stop_on_interrupt) is set. Menus and
    /// nested submenus are built on this loop.
    pub fn run(&mut self, io: &mut dyn TerminalIO) -> Result<(), PromptError> {
        loop {
            let selected = match self.select(io) {
                Ok(selected) => selected,
                Err(PromptError::Interrupted) => {
                    io.write("\ninput interrupted\n")?;
                    if self.stop_on_interrupt {
                        return Err(PromptError::Interrupted);
                    }
                    continue;
                }
                Err(err) => return Err(err),
            };

            let idx = match selected {
                None => break,
                Some(idx) => idx,
            };
            match self.live[idx].kind {
                RowKind::Exit | RowKind::Return => break,
                RowKind::Item => match self.dispatch(idx, io) {
                    Ok(_) => {}
                    Err(PromptError::Interrupted) => {
                        io.write("\ninput interrupted\n")?;
                        if self.stop_on_interrupt {
                            return Err(PromptError::Interrupted);
                        }
                    }
                    Err(err) => return Err(err),
                },
            }
        }
        Ok(())
    }
}
