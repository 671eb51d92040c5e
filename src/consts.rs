//! Fixed constants of the target ISA.

/// Width of the address space, in words.
pub const MEMORY_SIZE: usize = 4096;

/// First address available to assembled code; addresses below this are
/// reserved for the runtime environment.
pub const ORIGIN: u16 = 100;

/// Maximum length of a label, in characters.
pub const MAX_LABEL_LEN: usize = 31;

/// Bitmask keeping a value within the 15-bit word.
pub const WORD_MASK: u16 = 0x7FFF;

/// Bitmask applied to an immediate operand's value before it is shifted
/// into its operand word, leaving room for the 3-bit ARE tag below it.
pub const IMMEDIATE_MASK: u16 = 0x1FFF;

/// Fixed encoding of the zero-operand `stop` mnemonic.
pub const STOP_WORD: u16 = 30724;

/// ARE tag bits.
pub mod are {
    pub const ABSOLUTE: u16 = 0b100;
    pub const RELOCATABLE: u16 = 0b010;
    pub const EXTERNAL: u16 = 0b001;
}
