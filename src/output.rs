//! Output file formatting.
//!
//! Three files come out of a clean assembly: the object file (always),
//! and the entries/externals files (only when non-empty).

use crate::encoder::ExternalRef;
use crate::symbol_table::SymbolTable;

/// Render the object file body: a `"{ic} {dc}"` header line followed by
/// one `"AAAA OOOOO"` line per word (4-digit decimal address, 5-digit
/// zero-padded octal value).
pub fn render_object_file(code: &[u16], data: &[u16], origin: u16) -> String {
    let mut lines = Vec::with_capacity(code.len() + data.len() + 1);
    lines.push(format!("{} {}", code.len(), data.len()));
    for (offset, word) in code.iter().chain(data.iter()).enumerate() {
        let address = origin + offset as u16;
        lines.push(format!("{:04} {:05o}", address, word));
    }
    lines.join("\n")
}

/// Render the `.ent` file: one `"name AAAA"` line per entry symbol, or
/// `None` if there are no entries.
pub fn render_entries_file(symbols: &SymbolTable) -> Option<String> {
    let lines: Vec<String> = symbols
        .entries()
        .map(|s| format!("{} {:04}", s.name, s.address))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Render the `.ext` file: one `"name AAAA"` line per external reference,
/// in the order they were encountered, or `None` if there are none.
pub fn render_externals_file(externals: &[ExternalRef]) -> Option<String> {
    if externals.is_empty() {
        return None;
    }
    let lines: Vec<String> = externals.iter().map(|e| format!("{} {:04}", e.name, e.address)).collect();
    Some(lines.join("\n"))
}
