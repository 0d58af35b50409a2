//! Bordered text tables.
//!
//! ```text
//! +------+------+
//! | Id   | Name |
//! +------+------+
//! | /s/1 | one  |
//! +------+------+
//! ```
//!
//! Every row is followed by a separator. Widths count characters, not
//! bytes.

use std::fmt::Write as _;

/// Render `rows` under `headers`.
///
/// Rows shorter than the header are padded with empty cells; extra cells
/// are dropped.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = separator(&widths);
    let mut out = String::new();
    out.push_str(&separator);
    push_row(&mut out, &widths, headers.iter().copied());
    out.push_str(&separator);
    for row in rows {
        push_row(&mut out, &widths, row.iter().map(String::as_str));
        out.push_str(&separator);
    }
    out
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn push_row<'a>(out: &mut String, widths: &[usize], mut cells: impl Iterator<Item = &'a str>) {
    out.push('|');
    for &width in widths {
        let cell = cells.next().unwrap_or("");
        let _ = write!(out, " {cell:<width$} |");
    }
    out.push('\n');
}
