//! Pipe-table rendering.
//!
//! Tables are rebuilt from cell text rather than converted structurally:
//! every `tr` of the table (but not of nested tables) becomes one pipe row,
//! a separator follows the first row, and short rows are padded to the
//! widest one.

use scraper::ElementRef;

use crate::text;

/// Render `table` as a markdown pipe table, or `""` when it has no cells.
pub(crate) fn render_table(table: ElementRef<'_>) -> String {
    let rows: Vec<Vec<String>> = own_rows(table)
        .into_iter()
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(cell_text)
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        lines.push(pipe_row(row, width));
        if i == 0 {
            lines.push(format!("|{}", " --- |".repeat(width)));
        }
    }
    lines.join("\n")
}

/// Rows whose nearest `table` ancestor is `table` itself.
fn own_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|ancestor| ancestor.value().name() == "table")
                .is_some_and(|owner| owner.id() == table.id())
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    text::collapse_whitespace(&text::plain_text(cell)).replace('|', "\\|")
}

fn pipe_row(cells: &[String], width: usize) -> String {
    let mut row = String::from("|");
    for i in 0..width {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        if cell.is_empty() {
            row.push_str("  |");
        } else {
            row.push_str(&format!(" {} |", cell));
        }
    }
    row
}
