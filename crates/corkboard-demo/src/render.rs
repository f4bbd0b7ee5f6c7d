//! Plain-text card painter.
//!
//! Draws the visible rows as bordered cards, one per row, with the column
//! labels as headings. The selected card gets a heavy border and a `*`
//! beside its index. Widths are measured in display cells so wide glyphs
//! do not break the frame.

use corkboard::prelude::{CardGrid, PLACEHOLDER, Row};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Box-drawing characters for one card frame.
struct Border {
    top_left: &'static str,
    top_right: &'static str,
    bottom_left: &'static str,
    bottom_right: &'static str,
    horizontal: &'static str,
    vertical: &'static str,
}

const NORMAL: Border = Border {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    horizontal: "─",
    vertical: "│",
};

const THICK: Border = Border {
    top_left: "┏",
    top_right: "┓",
    bottom_left: "┗",
    bottom_right: "┛",
    horizontal: "━",
    vertical: "┃",
};

/// Render the whole view: a summary line, the active filters, and the
/// visible cards in order.
pub fn paint(grid: &CardGrid, width: usize) -> String {
    let mut lines = vec![format!(
        "{} of {} cards",
        grid.visible_len(),
        grid.dataset().rows.len()
    )];

    let controls = grid.filter_controls();
    if !controls.is_empty() {
        let summary = controls
            .iter()
            .map(|control| {
                let active = control
                    .active
                    .as_ref()
                    .map_or_else(|| "all".to_owned(), value_text);
                format!("{}={active}", control.label)
            })
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(format!("filters: {summary}"));
    }
    lines.push(String::new());

    if grid.visible_len() == 0 {
        lines.push("(no cards to show)".to_owned());
        return lines.join("\n");
    }

    let selected = grid.selection().map(|selection| selection.row);
    for (index, row) in grid.visible_rows().enumerate() {
        lines.extend(card(grid, row, index, selected == Some(index), width));
    }
    lines.join("\n")
}

/// Render one card as its constituent lines.
fn card(grid: &CardGrid, row: &Row, index: usize, selected: bool, width: usize) -> Vec<String> {
    let border = if selected { &THICK } else { &NORMAL };
    let inner = width.saturating_sub(4);

    let title = if selected {
        format!(" {index}* ")
    } else {
        format!(" {index} ")
    };
    let fill = width.saturating_sub(3 + title.width());
    let mut lines = vec![format!(
        "{}{}{title}{}{}",
        border.top_left,
        border.horizontal,
        border.horizontal.repeat(fill),
        border.top_right
    )];

    for column in &grid.dataset().columns {
        for piece in textwrap::wrap(&column.label.to_uppercase(), inner.max(1)) {
            lines.push(content_line(border, &piece, inner));
        }
        let text = row
            .display(&column.key)
            .unwrap_or_else(|| PLACEHOLDER.to_owned());
        for piece in textwrap::wrap(&text, inner.saturating_sub(2).max(1)) {
            lines.push(content_line(border, &format!("  {piece}"), inner));
        }
    }

    lines.push(format!(
        "{}{}{}",
        border.bottom_left,
        border.horizontal.repeat(width.saturating_sub(2)),
        border.bottom_right
    ));
    lines
}

fn content_line(border: &Border, text: &str, inner: usize) -> String {
    let pad = " ".repeat(inner.saturating_sub(text.width()));
    format!("{} {text}{pad} {}", border.vertical, border.vertical)
}

/// Describe every filter control: its label, key, option list, and the
/// active value if one is set.
pub fn controls_block(grid: &CardGrid) -> String {
    let controls = grid.filter_controls();
    if controls.is_empty() {
        return "(no filterable columns)".to_owned();
    }
    controls
        .iter()
        .map(|control| {
            let options = if control.options.is_empty() {
                "no options".to_owned()
            } else {
                control
                    .options
                    .iter()
                    .map(value_text)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let active = control
                .active
                .as_ref()
                .map_or_else(|| "all".to_owned(), value_text);
            format!("{} [{}]: {options} (active: {active})", control.label, control.key)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describe the option list for one column key.
pub fn options_line(grid: &CardGrid, key: &str) -> String {
    if !grid.is_filterable(key) {
        return format!("`{key}` is not a filterable column");
    }
    let options = grid.filter_options(key);
    if options.is_empty() {
        return format!("no options for `{key}`");
    }
    let list = options.iter().map(value_text).collect::<Vec<_>>().join(", ");
    format!("options for `{key}`: {list}")
}

/// A value as a human would type it: strings bare, everything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
