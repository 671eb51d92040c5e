//! Second pass.
//!
//! Re-parses the same preprocessed source with a fresh `IC`/`DC`, this
//! time emitting words: the instruction stream, the relocated data
//! segment, `.entry` resolution, and the ordered list of external
//! references for the `.ext` file. Only runs when the first pass recorded
//! zero errors.

use crate::consts::ORIGIN;
use crate::encoder::{
    encode_instruction_word, encode_operand, encode_shared_register_word, encode_stop_word,
    operands_share_word, ExternalRef, OperandPosition,
};
use crate::error::AsmError;
use crate::opcode::Opcode;
use crate::parser::{parse_line, Directive, LineKind, Pass};
use crate::symbol_table::SymbolTable;

pub struct SecondPassOutput {
    /// Code-segment words, in address order starting at [`ORIGIN`].
    pub code: Vec<u16>,
    /// Data-segment words, appended immediately after the code segment.
    pub data: Vec<u16>,
    pub externals: Vec<ExternalRef>,
    pub errors: Vec<AsmError>,
}

pub fn run(source: &str, symbols: &mut SymbolTable) -> SecondPassOutput {
    let mut code = Vec::new();
    let mut data = Vec::new();
    let mut externals = Vec::new();
    let mut errors = Vec::new();
    let mut ic = ORIGIN;

    for (index, text) in source.lines().enumerate() {
        let line_number = index + 1;
        let mut discard = Vec::new();
        let parsed = parse_line(text, line_number, Pass::Second, &mut discard);

        match &parsed.kind {
            LineKind::Empty => {}
            LineKind::Directive(Directive::Data(values)) => {
                for value in values {
                    let truncated = (*value as i16 as u16) & crate::consts::WORD_MASK;
                    data.push(truncated);
                }
            }
            LineKind::Directive(Directive::Str(text)) => {
                for byte in text.bytes() {
                    data.push(byte as u16);
                }
                data.push(0);
            }
            LineKind::Directive(Directive::Extern(_)) => {}
            LineKind::Directive(Directive::Entry(name)) => {
                if let Err(e) = symbols.mark_entry(name, line_number) {
                    errors.push(e);
                }
            }
            LineKind::Instruction { opcode, operands } => {
                ic = encode_statement(*opcode, operands, ic, line_number, symbols, &mut code, &mut externals, &mut errors);
            }
        }
    }

    SecondPassOutput { code, data, externals, errors }
}

#[allow(clippy::too_many_arguments)]
fn encode_statement(
    opcode: Opcode,
    operands: &[crate::operand::Operand],
    ic: u16,
    line_number: usize,
    symbols: &SymbolTable,
    code: &mut Vec<u16>,
    externals: &mut Vec<ExternalRef>,
    errors: &mut Vec<AsmError>,
) -> u16 {
    if opcode == Opcode::Stop {
        code.push(encode_stop_word());
        return ic + 1;
    }

    let (src, dst) = match operands {
        [a, b] => (Some(a), Some(b)),
        [a] => (None, Some(a)),
        [] => (None, None),
        _ => (None, None),
    };

    code.push(encode_instruction_word(opcode, src, dst));
    let mut address = ic + 1;

    if operands_share_word(src, dst) {
        match encode_shared_register_word(src.unwrap(), dst.unwrap(), line_number) {
            Ok(word) => code.push(word),
            Err(e) => errors.push(e),
        }
        address += 1;
        return address;
    }

    for (operand, position) in [(src, OperandPosition::Source), (dst, OperandPosition::Destination)]
        .into_iter()
        .filter_map(|(operand, position)| operand.map(|o| (o, position)))
    {
        let lookup = |name: &str| symbols.lookup(name).cloned();
        match encode_operand(operand, position, line_number, lookup) {
            Ok((words, ext)) => {
                for word in words {
                    code.push(word);
                    if let Some(ext) = &ext {
                        externals.push(ExternalRef { name: ext.name.clone(), address });
                    }
                    address += 1;
                }
            }
            Err(e) => errors.push(e),
        }
    }

    address
}
