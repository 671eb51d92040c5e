//! Top-level assembler driver.
//!
//! Wires the pipeline stages together: preprocess, first pass, second
//! pass, then render the three output files. A macro error aborts
//! immediately; a first- or second-pass error list is returned as-is and
//! the later stage never runs.

use std::fs;

use crate::consts::ORIGIN;
use crate::error::{AsmError, ErrorKind};
use crate::first_pass;
use crate::output;
use crate::preprocessor;
use crate::second_pass;

/// The three files a clean assembly produces. `entries`/`externals` are
/// `None` when there was nothing to report.
pub struct Assembled {
    pub object: String,
    pub entries: Option<String>,
    pub externals: Option<String>,
}

/// Assemble a file's contents into its output files.
pub fn assemble_from_file(path: &str) -> Result<Assembled, Vec<AsmError>> {
    let source = fs::read_to_string(path).map_err(|e| {
        vec![AsmError::global(ErrorKind::FileAccess, format!("could not read {}: {}", path, e))]
    })?;
    assemble(&source)
}

/// Assemble a source string into its output files.
pub fn assemble(source: &str) -> Result<Assembled, Vec<AsmError>> {
    let preprocessed = preprocessor::preprocess(source).map_err(|e| vec![e])?;

    let fp = first_pass::run(&preprocessed);
    if !fp.errors.is_empty() {
        return Err(fp.errors);
    }
    let mut symbols = fp.symbols;

    let sp = second_pass::run(&preprocessed, &mut symbols);
    if !sp.errors.is_empty() {
        return Err(sp.errors);
    }

    let object = output::render_object_file(&sp.code, &sp.data, ORIGIN);
    let entries = output::render_entries_file(&symbols);
    let externals = output::render_externals_file(&sp.externals);

    Ok(Assembled { object, entries, externals })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_register_move_and_stop() {
        let out = assemble("mov r3, r4\nstop\n").unwrap();
        let mut lines = out.object.lines();
        assert_eq!(lines.next().unwrap(), "3 0");
        assert!(out.entries.is_none());
        assert!(out.externals.is_none());
    }

    #[test]
    fn relocates_data_labels_past_code() {
        let out = assemble("LOOP: mov r1, r2\nN: .data 4, 5\nstop\n").unwrap();
        assert_eq!(out.object.lines().next().unwrap(), "3 2");
    }

    #[test]
    fn emits_externals_file_for_extern_reference() {
        let out = assemble(".extern EXT\nmov r1, EXT\nstop\n").unwrap();
        assert!(out.externals.is_some());
        assert!(out.externals.unwrap().starts_with("EXT"));
    }

    #[test]
    fn macro_is_expanded_at_every_call_site() {
        let src = "macr DOUBLE\nmov r1, r2\nendmacr\nDOUBLE\nDOUBLE\nstop\n";
        let out = assemble(src).unwrap();
        // two expansions of a 2-word mov, plus the 1-word stop
        assert_eq!(out.object.lines().next().unwrap(), "5 0");
    }

    #[test]
    fn duplicate_label_fails_the_whole_assembly() {
        let errors = assemble("A: stop\nA: stop\n").unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ErrorKind::DuplicateSymbol));
    }

    #[test]
    fn malformed_macro_definition_aborts_before_passes_run() {
        let errors = assemble("macr mov\nstop\nendmacr\n").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::MalformedMacroName);
    }
}
