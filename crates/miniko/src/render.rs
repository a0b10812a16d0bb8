//! Text and JSON output for task listings.

use std::fmt::Write as _;

use miniko_core::TaskListing;

const OPEN_HEADINGS: [&str; 3] = ["Task ID", "Task", "Created"];
const DONE_HEADINGS: [&str; 4] = ["Task ID", "Task", "Created", "Done"];

/// Render both lists as aligned text tables under "To Do" and "Done".
pub fn render_listing(listing: &TaskListing) -> String {
    let open: Vec<Vec<String>> = listing
        .open
        .iter()
        .map(|t| vec![t.id.to_string(), t.description.clone(), t.created_at.to_string()])
        .collect();
    let done: Vec<Vec<String>> = listing
        .done
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.description.clone(),
                t.created_at.to_string(),
                t.completed_at.to_string(),
            ]
        })
        .collect();

    let mut out = String::new();
    out.push_str("To Do\n");
    out.push_str(&render_table(&OPEN_HEADINGS, &open));
    out.push('\n');
    out.push_str("Done\n");
    out.push_str(&render_table(&DONE_HEADINGS, &done));
    out
}

pub fn render_json(listing: &TaskListing) -> serde_json::Result<String> {
    serde_json::to_string_pretty(listing)
}

fn render_table(headings: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut widths: Vec<usize> = headings.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, headings.iter().copied(), &widths);
    for row in rows {
        write_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::from(" ");
    for (cell, width) in cells.zip(widths.iter().copied()) {
        let _ = write!(line, " {cell:<width$} ");
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
