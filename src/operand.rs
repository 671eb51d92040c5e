//! Addressing modes and operands.

use regex::Regex;

/// The four addressing modes, tagged separately from their wire-level
/// numeric code (kept separate rather than threading
/// raw integers as both discriminant and bitmask).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// `#123` — a literal integer.
    Immediate,
    /// `LABEL` — a bare symbol name.
    Direct,
    /// `*r0`..`*r7` — a register holding an address.
    IndirectRegister,
    /// `r0`..`r7` — a register.
    Register,
}

impl AddressingMode {
    /// The one-hot wire code used in instruction-word mode fields.
    pub fn mode_code(self) -> u8 {
        match self {
            AddressingMode::Immediate => 1,
            AddressingMode::Direct => 2,
            AddressingMode::IndirectRegister => 4,
            AddressingMode::Register => 8,
        }
    }

    /// Whether this mode is one of the two register-like modes, which can
    /// share a single operand word.
    pub fn is_register_like(self) -> bool {
        matches!(self, AddressingMode::Register | AddressingMode::IndirectRegister)
    }
}

/// One operand: its raw source text (kept for second-pass resolution) and
/// its addressing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub raw: String,
    pub mode: AddressingMode,
}

impl Operand {
    pub fn new(raw: &str, mode: AddressingMode) -> Self {
        Operand { raw: raw.to_string(), mode }
    }

    /// Classify a trimmed operand token by its leading character(s).
    pub fn classify(raw: &str) -> AddressingMode {
        let immediate = Regex::new(r"^#-?\d+$").unwrap();
        let indirect_register = Regex::new(r"^\*r[0-7]$").unwrap();
        let register = Regex::new(r"^r[0-7]$").unwrap();

        if immediate.is_match(raw) {
            AddressingMode::Immediate
        } else if indirect_register.is_match(raw) {
            AddressingMode::IndirectRegister
        } else if register.is_match(raw) {
            AddressingMode::Register
        } else {
            AddressingMode::Direct
        }
    }

    pub fn parse(raw: &str) -> Operand {
        let mode = Self::classify(raw);
        Operand::new(raw, mode)
    }

    /// Register number (0..7) parsed from the last digit of this operand's
    /// raw text, for `Register`/`IndirectRegister` operands. `*r3` -> 3,
    /// `r5` -> 5.
    pub fn register_number(&self) -> Option<u8> {
        let text = if self.raw.starts_with('*') { &self.raw[1..] } else { &self.raw[..] };
        if text.len() == 2 && text.starts_with('r') {
            text.as_bytes()[1].checked_sub(b'0').filter(|n| *n <= 7)
        } else {
            None
        }
    }

    /// The immediate value, for `Immediate` operands (`#-17` -> -17).
    pub fn immediate_value(&self) -> Option<i32> {
        self.raw.strip_prefix('#').and_then(|s| s.parse::<i32>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_immediate() {
        assert_eq!(Operand::classify("#7"), AddressingMode::Immediate);
        assert_eq!(Operand::classify("#-12"), AddressingMode::Immediate);
    }

    #[test]
    fn classifies_registers() {
        assert_eq!(Operand::classify("r0"), AddressingMode::Register);
        assert_eq!(Operand::classify("r7"), AddressingMode::Register);
        assert_eq!(Operand::classify("*r3"), AddressingMode::IndirectRegister);
    }

    #[test]
    fn classifies_direct_by_elimination() {
        assert_eq!(Operand::classify("LEN"), AddressingMode::Direct);
        assert_eq!(Operand::classify("r8"), AddressingMode::Direct); // out of range
        assert_eq!(Operand::classify("r"), AddressingMode::Direct);
    }

    #[test]
    fn mode_codes_are_one_hot() {
        assert_eq!(AddressingMode::Immediate.mode_code(), 1);
        assert_eq!(AddressingMode::Direct.mode_code(), 2);
        assert_eq!(AddressingMode::IndirectRegister.mode_code(), 4);
        assert_eq!(AddressingMode::Register.mode_code(), 8);
    }

    #[test]
    fn register_number_parses_last_digit() {
        assert_eq!(Operand::parse("r4").register_number(), Some(4));
        assert_eq!(Operand::parse("*r2").register_number(), Some(2));
        assert_eq!(Operand::parse("LEN").register_number(), None);
    }
}
