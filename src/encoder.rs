//! Instruction encoder.
//!
//! Turns one `(opcode, operands)` pair into the machine words that belong
//! at and after its IC slot: the instruction word itself, plus one operand
//! word per operand (two register-like operands share a single word).
//!
//! Symbols are resolved against the `&Symbol` the caller already looked
//! up; this deliberately does not re-derive anything from the head of a
//! list.

use crate::consts::are;
use crate::error::{AsmError, ErrorKind};
use crate::operand::{AddressingMode, Operand};
use crate::opcode::Opcode;
use crate::symbol_table::{Symbol, SymbolKind};

/// A single emitted machine word together with the ARE tag baked into its
/// low 3 bits (kept separate here only for clarity at the call site).
pub type Word = u16;

/// One resolved external reference: the symbol name and the address of
/// the word that refers to it, for the `.ext` output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRef {
    pub name: String,
    pub address: u16,
}

/// Encode the fixed instruction word: opcode in bits 14..11, source mode
/// in bits 10..7, destination mode in bits 6..3, ARE (always Absolute for
/// the instruction word itself) in bits 2..0.
pub fn encode_instruction_word(opcode: Opcode, src: Option<&Operand>, dst: Option<&Operand>) -> Word {
    let src_code = src.map(|o| o.mode.mode_code()).unwrap_or(0);
    let dst_code = dst.map(|o| o.mode.mode_code()).unwrap_or(0);
    ((opcode.code() as u16) << 11) | ((src_code as u16) << 7) | ((dst_code as u16) << 3) | are::ABSOLUTE
}

/// The fixed `stop` word: no operands, no addressing-mode fields set.
pub fn encode_stop_word() -> Word {
    crate::consts::STOP_WORD
}

/// Which side of the instruction an operand occupies. A register operand's
/// bit position depends on this: a source register sits in bits 8..6, a
/// destination register in bits 5..3. Non-register operands ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandPosition {
    Source,
    Destination,
}

/// Encode one operand's word(s). Returns the words to emit (one, or two
/// when register-like operands don't share) plus an external reference if
/// this operand resolved to an `extern` symbol.
///
/// `lookup` resolves a `Direct` operand's label to its `Symbol`; the
/// caller passes it in rather than this module reaching into the symbol
/// table itself, keeping pass 2's read-only borrow of the table explicit
/// at the call site.
pub fn encode_operand(
    operand: &Operand,
    position: OperandPosition,
    line: usize,
    lookup: impl Fn(&str) -> Option<Symbol>,
) -> Result<(Vec<Word>, Option<ExternalRef>), AsmError> {
    match operand.mode {
        AddressingMode::Immediate => {
            let value = operand.immediate_value().ok_or_else(|| {
                AsmError::new(ErrorKind::NonInteger, line, format!("bad immediate operand: {}", operand.raw))
            })?;
            let truncated = (value as i16 as u16) & crate::consts::IMMEDIATE_MASK;
            Ok((vec![(truncated << 3) | are::ABSOLUTE], None))
        }
        AddressingMode::Direct => {
            let symbol = lookup(&operand.raw).ok_or_else(|| {
                AsmError::new(ErrorKind::SymbolNotFound, line, format!("undefined symbol: {}", operand.raw))
            })?;
            match symbol.kind {
                SymbolKind::Extern => {
                    let word = are::EXTERNAL;
                    let ext = ExternalRef { name: symbol.name.clone(), address: 0 };
                    Ok((vec![word], Some(ext)))
                }
                _ => {
                    let word = (symbol.address << 3) | are::RELOCATABLE;
                    Ok((vec![word], None))
                }
            }
        }
        AddressingMode::Register | AddressingMode::IndirectRegister => {
            let reg = operand.register_number().ok_or_else(|| {
                AsmError::new(ErrorKind::NonInteger, line, format!("bad register operand: {}", operand.raw))
            })?;
            let shift = match position {
                OperandPosition::Source => 6,
                OperandPosition::Destination => 3,
            };
            Ok((vec![((reg as u16) << shift) | are::ABSOLUTE], None))
        }
    }
}

/// Whether `src` and `dst` are both register-like, and so share a single
/// operand word instead of emitting one each.
pub fn operands_share_word(src: Option<&Operand>, dst: Option<&Operand>) -> bool {
    match (src, dst) {
        (Some(a), Some(b)) => a.mode.is_register_like() && b.mode.is_register_like(),
        _ => false,
    }
}

/// Encode a shared register/register-indirect word: source register in
/// bits 8..6, destination register in bits 5..3, ARE in bits 2..0 — each
/// register occupies the same field it would if it stood alone.
pub fn encode_shared_register_word(src: &Operand, dst: &Operand, line: usize) -> Result<Word, AsmError> {
    let src_reg = src.register_number().ok_or_else(|| {
        AsmError::new(ErrorKind::NonInteger, line, format!("bad register operand: {}", src.raw))
    })?;
    let dst_reg = dst.register_number().ok_or_else(|| {
        AsmError::new(ErrorKind::NonInteger, line, format!("bad register operand: {}", dst.raw))
    })?;
    Ok(((src_reg as u16) << 6) | ((dst_reg as u16) << 3) | are::ABSOLUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol_table::SymbolKind;

    #[test]
    fn instruction_word_places_opcode_and_modes() {
        let src = Operand::parse("r3");
        let dst = Operand::parse("r4");
        let word = encode_instruction_word(Opcode::Mov, Some(&src), Some(&dst));
        assert_eq!(word >> 11, Opcode::Mov.code() as u16);
        assert_eq!((word >> 7) & 0xF, AddressingMode::Register.mode_code() as u16);
        assert_eq!((word >> 3) & 0xF, AddressingMode::Register.mode_code() as u16);
        assert_eq!(word & 0b111, are::ABSOLUTE);
    }

    #[test]
    fn stop_word_is_fixed_literal() {
        assert_eq!(encode_stop_word(), 30724);
    }

    #[test]
    fn immediate_operand_truncates_to_word_mask() {
        let op = Operand::parse("#-1");
        let (words, ext) = encode_operand(&op, OperandPosition::Source, 1, |_| None).unwrap();
        assert_eq!(words.len(), 1);
        assert!(ext.is_none());
        assert_eq!(words[0] & 0b111, are::ABSOLUTE);
    }

    #[test]
    fn direct_operand_to_extern_symbol_tags_external() {
        let op = Operand::parse("EXT");
        let sym = Symbol { name: "EXT".into(), address: 0, kind: SymbolKind::Extern, is_data: false, line: 1 };
        let (words, ext) = encode_operand(&op, OperandPosition::Destination, 1, move |_| Some(sym.clone())).unwrap();
        assert_eq!(words[0] & 0b111, are::EXTERNAL);
        assert_eq!(ext.unwrap().name, "EXT");
    }

    #[test]
    fn direct_operand_to_local_symbol_tags_relocatable() {
        let op = Operand::parse("LOOP");
        let sym = Symbol { name: "LOOP".into(), address: 105, kind: SymbolKind::Label, is_data: false, line: 1 };
        let (words, ext) = encode_operand(&op, OperandPosition::Destination, 1, move |_| Some(sym.clone())).unwrap();
        assert_eq!(words[0] & 0b111, are::RELOCATABLE);
        assert_eq!(words[0] >> 3, 105);
        assert!(ext.is_none());
    }

    #[test]
    fn source_register_operand_occupies_bits_6_to_8() {
        let op = Operand::parse("r1");
        let (words, _) = encode_operand(&op, OperandPosition::Source, 1, |_| None).unwrap();
        assert_eq!((words[0] >> 6) & 0b111, 1);
    }

    #[test]
    fn register_operands_can_share_a_word() {
        let src = Operand::parse("r2");
        let dst = Operand::parse("*r5");
        assert!(operands_share_word(Some(&src), Some(&dst)));
        let word = encode_shared_register_word(&src, &dst, 1).unwrap();
        assert_eq!((word >> 6) & 0b111, 2);
        assert_eq!((word >> 3) & 0b111, 5);
    }

    #[test]
    fn mixed_modes_do_not_share_a_word() {
        let src = Operand::parse("r2");
        let dst = Operand::parse("LEN");
        assert!(!operands_share_word(Some(&src), Some(&dst)));
    }
}
