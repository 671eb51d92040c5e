//! Macro pre-processor.
//!
//! Runs before the first pass. Streams the source once: discards comments
//! and blank lines, captures `macr`/`endmacr` bodies, and expands
//! invocations in place. Macro-definition errors are fatal and abort the
//! whole pipeline, unlike per-line first/second-pass errors which are
//! merely recorded and continued past.

use crate::error::{AsmError, ErrorKind};
use crate::macro_table::MacroTable;

/// Clean and macro-expand `source`, returning the text that the first and
/// second pass both re-parse.
pub fn preprocess(source: &str) -> Result<String, AsmError> {
    let cleaned = clean(source);
    expand_macros(&cleaned)
}

/// Discard comment lines (leading `;` after whitespace) and blank lines,
/// and strip each remaining line's leading whitespace.
fn clean(source: &str) -> Vec<String> {
    source
        .lines()
        .map(|line| line.trim_start())
        .filter(|line| !line.is_empty() && !line.starts_with(';'))
        .map(|line| line.to_string())
        .collect()
}

enum State {
    Outside,
    InMacro { name: String, body: Vec<String> },
}

fn expand_macros(lines: &[String]) -> Result<String, AsmError> {
    let mut macros = MacroTable::new();
    let mut state = State::Outside;
    let mut output = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let mut tokens = line.split_whitespace();
        let first = tokens.next().unwrap_or("");

        match &mut state {
            State::InMacro { body, .. } => {
                if first == "endmacr" {
                    if let State::InMacro { name, body } = std::mem::replace(&mut state, State::Outside) {
                        macros.insert(name, body);
                    }
                } else {
                    body.push(line.clone());
                }
            }
            State::Outside => {
                if first == "macr" {
                    let rest: Vec<&str> = tokens.collect();
                    let name = rest.first().copied().unwrap_or("").to_string();
                    if rest.len() > 1 {
                        return Err(AsmError::new(
                            ErrorKind::MalformedMacroName,
                            line_number,
                            "trailing text after macro name",
                        ));
                    }
                    macros.declare(&name, line_number)?;
                    state = State::InMacro { name, body: Vec::new() };
                } else if first == "endmacr" {
                    return Err(AsmError::new(
                        ErrorKind::MalformedMacroName,
                        line_number,
                        "endmacr without a matching open macro",
                    ));
                } else if let Some(found) = macros.lookup(first) {
                    output.extend(found.body.iter().cloned());
                } else {
                    output.push(line.clone());
                }
            }
        }
    }

    if let State::InMacro { name, .. } = state {
        return Err(AsmError::global(
            ErrorKind::MalformedMacroName,
            format!("macro \"{}\" has no matching endmacr", name),
        ));
    }

    Ok(output.join("\n"))
}
