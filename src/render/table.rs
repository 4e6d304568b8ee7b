//! Pipe table rendering.

use crate::model::{Cell, Row, Table};

/// Render a table as pipe-table lines.
///
/// One line per row, plus a `|---|` separator after the first row sized to
/// the first row's cell count. Later rows keep their own cell count.
pub fn table_lines(table: &Table) -> Vec<String> {
    let mut lines = Vec::with_capacity(table.row_count() + 1);

    for (i, row) in table.rows.iter().enumerate() {
        lines.push(row_line(row));
        if i == 0 {
            lines.push(separator_line(table.column_count()));
        }
    }

    lines
}

fn row_line(row: &Row) -> String {
    let cells: Vec<String> = row.cells.iter().map(Cell::inline_text).collect();
    format!("| {} |", cells.join(" | "))
}

fn separator_line(columns: usize) -> String {
    format!("|{}|", vec!["---"; columns].join("|"))
}
