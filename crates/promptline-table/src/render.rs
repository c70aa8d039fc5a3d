//! Plain-text table rendering.
//!
//! Renders the current page of a table with `+-|` borders, width-aware
//! padding, a right-aligned tag column, and configurable horizontal and
//! vertical rules.

use unicode_width::UnicodeWidthStr;

/// Where horizontal or vertical rules are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleStyle {
    /// No rules at all.
    None,
    /// Only the outer frame.
    #[default]
    Frame,
    /// The frame plus a rule under the header.
    Header,
    /// Rules everywhere (between every row or column).
    All,
}

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Right,
}

/// Rendering options for one table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RenderOptions {
    pub show_border: bool,
    pub show_header: bool,
    pub hrules: RuleStyle,
    pub vrules: RuleStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_border: true,
            show_header: true,
            hrules: RuleStyle::Frame,
            vrules: RuleStyle::Frame,
        }
    }
}

fn pad(value: &str, width: usize, align: Align) -> String {
    let padding = width.saturating_sub(value.width());
    match align {
        Align::Left => format!("{}{}", value, " ".repeat(padding)),
        Align::Right => format!("{}{}", " ".repeat(padding), value),
    }
}

/// Render a page of rows.
///
/// `headers`, `aligns`, and every row must have the same number of columns.
pub(crate) fn render_table(
    headers: &[String],
    aligns: &[Align],
    rows: &[Vec<String>],
    opts: RenderOptions,
) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| if opts.show_header { h.width() } else { 0 })
        .collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let inner_sep = match opts.vrules {
        RuleStyle::All => " | ",
        _ => "  ",
    };
    let (left_edge, right_edge) = if opts.show_border {
        ("| ", " |")
    } else {
        ("", "")
    };

    let rule_line = |out: &mut String| {
        let joint = match opts.vrules {
            RuleStyle::All => "-+-",
            _ => "--",
        };
        let body: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let (l, r) = if opts.show_border { ("+-", "-+") } else { ("", "") };
        out.push_str(l);
        out.push_str(&body.join(joint));
        out.push_str(r);
        out.push('\n');
    };

    let emit_row = |out: &mut String, cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .take(cols)
            .map(|(i, c)| pad(c, widths[i], aligns[i]))
            .collect();
        let mut line = format!("{}{}{}", left_edge, padded.join(inner_sep), right_edge);
        if !opts.show_border {
            line.truncate(line.trim_end().len());
        }
        out.push_str(&line);
        out.push('\n');
    };

    let frame = opts.show_border && opts.hrules != RuleStyle::None;
    let mut out = String::new();

    if frame {
        rule_line(&mut out);
    }
    if opts.show_header {
        emit_row(&mut out, headers);
        if matches!(opts.hrules, RuleStyle::Header | RuleStyle::All) {
            rule_line(&mut out);
        }
    }
    for (i, row) in rows.iter().enumerate() {
        emit_row(&mut out, row);
        if opts.hrules == RuleStyle::All && i + 1 < rows.len() {
            rule_line(&mut out);
        }
    }
    if frame {
        rule_line(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<String>, Vec<Align>, Vec<Vec<String>>) {
        let headers = vec!["".to_string(), "name".to_string()];
        let aligns = vec![Align::Right, Align::Left];
        let rows = vec![
            vec!["1".to_string(), "red".to_string()],
            vec!["10".to_string(), "green".to_string()],
        ];
        (headers, aligns, rows)
    }

    #[test]
    fn bordered_table_shape() {
        let (headers, aligns, rows) = sample();
        let out = render_table(&headers, &aligns, &rows, RenderOptions::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5); // frame, header, two rows, frame
        assert!(lines[0].starts_with("+-"));
        assert_eq!(lines[2], "|  1  red   |");
        assert_eq!(lines[3], "| 10  green |");
    }

    #[test]
    fn tag_column_is_right_aligned() {
        let (headers, aligns, rows) = sample();
        let out = render_table(&headers, &aligns, &rows, RenderOptions::default());
        assert!(out.contains("  1  red"));
        assert!(out.contains(" 10  green"));
    }

    #[test]
    fn borderless_menu_shape() {
        let (headers, aligns, rows) = sample();
        let opts = RenderOptions {
            show_border: false,
            show_header: false,
            hrules: RuleStyle::None,
            vrules: RuleStyle::None,
        };
        let out = render_table(&headers, &aligns, &rows, opts);
        assert_eq!(out, " 1  red\n10  green\n");
    }

    #[test]
    fn vertical_rules_everywhere() {
        let (headers, aligns, rows) = sample();
        let opts = RenderOptions {
            vrules: RuleStyle::All,
            ..RenderOptions::default()
        };
        let out = render_table(&headers, &aligns, &rows, opts);
        assert!(out.contains("|  1 | red"));
        assert!(out.contains("+----+"));
    }

    #[test]
    fn horizontal_rules_between_rows() {
        let (headers, aligns, rows) = sample();
        let opts = RenderOptions {
            hrules: RuleStyle::All,
            ..RenderOptions::default()
        };
        let out = render_table(&headers, &aligns, &rows, opts);
        // frame, header, rule, row, rule, row, frame
        assert_eq!(out.lines().count(), 7);
    }

    #[test]
    fn header_rule_only_under_header() {
        let (headers, aligns, rows) = sample();
        let opts = RenderOptions {
            hrules: RuleStyle::Header,
            ..RenderOptions::default()
        };
        let out = render_table(&headers, &aligns, &rows, opts);
        assert_eq!(out.lines().count(), 6);
    }

    #[test]
    fn widths_account_for_wide_glyphs() {
        let headers = vec!["".to_string(), "name".to_string()];
        let aligns = vec![Align::Right, Align::Left];
        let rows = vec![vec!["1".to_string(), "日本".to_string()]];
        let out = render_table(&headers, &aligns, &rows, RenderOptions::default());
        // "日本" is four columns wide, same as "name".
        assert!(out.contains("| 1  日本 |"));
    }
}
