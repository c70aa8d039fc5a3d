//! The shared action context.
//!
//! Every action and item filter of one table receives the same
//! caller-supplied context value: a database handle, user credentials,
//! whatever the actions need. The table itself only asks one thing of it —
//! optional named placeholders for header/footer/column templates.

use std::collections::HashMap;

/// Caller-supplied state shared across all actions and filters of a table.
///
/// [`placeholder`](Self::placeholder) feeds `{name}` substitution in header
/// and footer templates and in row column values; the default resolves
/// nothing.
///
/// The context is freely mutated by actions. The table imposes no locking:
/// the engine is single-threaded, one interactive session at a time.
pub trait ActionContext {
    /// Resolve a named template placeholder.
    fn placeholder(&self, _key: &str) -> Option<String> {
        None
    }
}

/// A context carrying no state.
impl ActionContext for () {}

/// String maps resolve placeholders by key.
impl ActionContext for HashMap<String, String> {
    fn placeholder(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Substitute `{name}` placeholders from `extras` first, then the context.
///
/// `{{` and `}}` escape literal braces; unknown placeholders are left in
/// place.
pub(crate) fn interpolate<C: ActionContext>(
    template: &str,
    ctx: &C,
    extras: &[(&str, String)],
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    key.push(n);
                }
                let resolved = extras
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v.clone())
                    .or_else(|| ctx.placeholder(&key));
                match resolved {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(&key);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}
