use crate::space::allocation::{Day, Occupancy};
use std::fmt::Write;

/// Placeholder for an unoccupied unit.
pub const FREE_CELL: char = '_';

/// Cell symbol for an owner: its first character, uppercased.
pub fn symbol_for(owner: &str) -> char {
    owner
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}

pub fn cells(capacity: usize, live: &[Occupancy]) -> Vec<char> {
    let mut cells = vec![FREE_CELL; capacity];
    for occ in live {
        let symbol = symbol_for(&occ.owner);
        let end = occ.range.end.min(capacity);
        for cell in &mut cells[occ.range.start.min(end)..end] {
            *cell = symbol;
        }
    }
    cells
}

/// Draw the space as a boxed grid of `row_width` cells per row.
///
/// Pure formatting: time is not advanced here.
pub fn render_map(day: Day, capacity: usize, row_width: usize, live: &[Occupancy]) -> String {
    let row_width = row_width.max(1);
    let cells = cells(capacity, live);
    let rows: Vec<&[char]> = cells.chunks(row_width).collect();
    let widest = rows.iter().map(|r| r.len()).max().unwrap_or(1);

    let mut out = String::new();
    let _ = writeln!(out, "Day {day} - Address Space Map:");
    let _ = writeln!(out, "┌{}┐", rule(widest, '┬'));
    for row in &rows {
        let mut line: Vec<String> = row.iter().map(|c| format!(" {c} ")).collect();
        // pad a short last row so the box closes
        line.resize(widest, "   ".to_string());
        let _ = writeln!(out, "│{}│", line.join("│"));
    }
    let _ = writeln!(out, "└{}┘", rule(widest, '┴'));
    let _ = writeln!(
        out,
        "Key: {FREE_CELL} = free unit, letter = owner's initial"
    );
    let _ = writeln!(out, "{}", "═".repeat(60));
    out
}

// Horizontal rule with a joint between every cell.
fn rule(cells: usize, joint: char) -> String {
    let joint = joint.to_string();
    vec!["───"; cells.max(1)].join(joint.as_str())
}
