//! First pass.
//!
//! Walks the preprocessed source once with `IC` starting at
//! [`crate::consts::ORIGIN`] and `DC` at 0, building the symbol table and
//! counting words. Errors are recorded and the walk continues past them
//! (only the second pass is gated on the error count being zero); macro
//! errors, by contrast, already aborted the pipeline in the preprocessor.
//!
//! Each operand's addressing mode is checked independently when counting
//! instruction words, since one operand may be absent while the other
//! still needs its own word.

use crate::consts::{MEMORY_SIZE, ORIGIN};
use crate::encoder::operands_share_word;
use crate::error::{AsmError, ErrorKind};
use crate::opcode::Opcode;
use crate::parser::{parse_line, Directive, LineKind, Pass};
use crate::symbol_table::{SymbolKind, SymbolTable};

pub struct FirstPassOutput {
    pub symbols: SymbolTable,
    pub errors: Vec<AsmError>,
    pub final_ic: u16,
}

pub fn run(source: &str) -> FirstPassOutput {
    let mut symbols = SymbolTable::new();
    let mut errors = Vec::new();
    let mut ic: u16 = ORIGIN;
    let mut dc: u16 = 0;

    for (index, text) in source.lines().enumerate() {
        let line_number = index + 1;
        let parsed = parse_line(text, line_number, Pass::First, &mut errors);

        if let Some(label) = &parsed.label {
            if label.len() > crate::consts::MAX_LABEL_LEN {
                errors.push(AsmError::new(
                    ErrorKind::LabelTooLong,
                    line_number,
                    format!("label exceeds {} characters: {}", crate::consts::MAX_LABEL_LEN, label),
                ));
            } else if Opcode::is_opcode_name(label) {
                errors.push(AsmError::new(
                    ErrorKind::LabelReserved,
                    line_number,
                    format!("label collides with a mnemonic: {}", label),
                ));
            }
        }

        match &parsed.kind {
            LineKind::Empty => {
                if let Some(label) = &parsed.label {
                    let _ = symbols.insert(label, ic, SymbolKind::Label, false, line_number);
                }
            }
            LineKind::Directive(Directive::Data(values)) => {
                if let Some(label) = &parsed.label {
                    if let Err(e) = symbols.insert(label, dc, SymbolKind::Data, true, line_number) {
                        errors.push(e);
                    }
                }
                dc += values.len() as u16;
            }
            LineKind::Directive(Directive::Str(text)) => {
                if let Some(label) = &parsed.label {
                    if let Err(e) = symbols.insert(label, dc, SymbolKind::String, true, line_number) {
                        errors.push(e);
                    }
                }
                dc += text.chars().count() as u16 + 1;
            }
            LineKind::Directive(Directive::Extern(name)) => {
                if !name.is_empty() {
                    symbols.insert_extern(name, line_number);
                }
            }
            LineKind::Directive(Directive::Entry(_)) => {
                // resolved in the second pass, once every label is known.
            }
            LineKind::Instruction { opcode, operands } => {
                if let Some(label) = &parsed.label {
                    if let Err(e) = symbols.insert(label, ic, SymbolKind::Label, false, line_number) {
                        errors.push(e);
                    }
                }
                ic += instruction_word_count(*opcode, operands);
            }
        }
    }

    let words_used = (ic + dc) as usize;
    if words_used > MEMORY_SIZE {
        errors.push(AsmError::global(
            ErrorKind::MemoryOverflow,
            format!("program uses {} words, exceeding the {}-word address space", words_used, MEMORY_SIZE),
        ));
    }

    symbols.relocate_data(ic);

    FirstPassOutput { symbols, errors, final_ic: ic }
}

/// 1 word for the instruction itself, plus one word per operand — except
/// two register-like operands, which share a single word.
fn instruction_word_count(opcode: Opcode, operands: &[crate::operand::Operand]) -> u16 {
    let base = 1u16;
    let extra = match operands {
        [a, b] if operands_share_word(Some(a), Some(b)) => 1,
        _ => operands.len() as u16,
    };
    let _ = opcode;
    base + extra
}
