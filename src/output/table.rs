//! Plain padded table rendering.

use std::fmt::Write as _;

use super::provider::{Row, scalar};

const GUTTER: &str = "  ";

/// Renders `rows` as a column-aligned table restricted to `fields`.
///
/// Each column is as wide as the longer of its header and its widest value.
pub(super) fn render_table(rows: &[Row], fields: &[String], no_header: bool) -> String {
    let headers: Vec<String> = fields.iter().map(|field| field.to_uppercase()).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| fields.iter().map(|field| scalar(row.get(field))).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(column, header)| {
            cells
                .iter()
                .filter_map(|line| line.get(column))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut rendered = String::new();
    if !no_header {
        push_line(&mut rendered, &headers, &widths);
    }
    for line in &cells {
        push_line(&mut rendered, line, &widths);
    }
    rendered
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (index, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str(GUTTER);
        }
        write!(line, "{cell:<width$}").ok();
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
