//! Paginated, filterable selection tables and menus, built on the
//! `promptline` input pipeline.
//!
//! A [`Table`] holds an ordered list of [`TableItem`]s, each carrying
//! display columns, a selection tag, an action, and visibility flags. The
//! table renders the current page, delegates the key-entry step to a
//! `promptline` prompt scoped to the live row keys, and dispatches the
//! selected row's action.
//!
//! # Quick Start
//!
//! ```ignore
//! use promptline::RealTerminal;
//! use promptline_table::{ActionValue, AddExit, Menu, Table, TableItem};
//!
//! let mut term = RealTerminal::new();
//!
//! // A menu that runs callbacks until the user picks "exit".
//! let mut menu = Menu::from_items(
//!     vec![
//!         TableItem::new(["List users"]).on_select(|_, db, _| { /* ... */ Ok(ActionValue::None) }),
//!         TableItem::new(["Add a user"]).on_select(|_, db, _| { /* ... */ Ok(ActionValue::None) }),
//!     ],
//!     database_handle,
//! )
//! .add_exit(AddExit::Exit);
//! menu.run(&mut term)?;
//! ```
//!
//! # Selection flow
//!
//! ```text
//! refresh → render page → prompt (strip · case-fold · tag completion
//!         → tag→index convertor → bounds validator) → dispatch action
//! ```
//!
//! Pagination is driven by in-band commands (`:next`, `:prev`, `:first`,
//! `:last`, `:up`, `:down`, `:refresh`); the table's display loop consumes
//! them and re-prompts without counting a retry.
//!
//! Like `promptline` itself, this crate is single-threaded by design: the
//! action context and the live-row cache are not protected by any lock.

mod context;
mod item;
mod menu;
mod render;
mod table;

pub use context::ActionContext;
pub use item::{Action, ActionFn, ActionValue, AddExit, DefaultAction, Row, TableItem};
pub use menu::Menu;
pub use render::RuleStyle;
pub use table::{ItemFilter, Table};
