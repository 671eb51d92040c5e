//! Macro store.
//!
//! Macros are parameterless textual inclusions; the store is an ordered
//! collection of `(name, body lines)` with name-collision detection,
//! following the same "ordered `Vec` instead of a linked list" redesign as
//! [`crate::symbol_table::SymbolTable`].

use crate::error::{AsmError, ErrorKind};
use crate::opcode::Opcode;

#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub body: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MacroTable {
    macros: Vec<Macro>,
}

impl MacroTable {
    pub fn new() -> Self {
        MacroTable { macros: Vec::new() }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.iter().any(|m| m.name == name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Macro> {
        self.macros.iter().find(|m| m.name == name)
    }

    /// Validate and register a new macro name: it must be
    /// present, must not collide with an existing macro, and must not be
    /// an opcode mnemonic. Returns the name back for convenience.
    pub fn declare(&self, name: &str, line: usize) -> Result<(), AsmError> {
        if name.is_empty() {
            return Err(AsmError::new(
                ErrorKind::MalformedMacroName,
                line,
                "macro definition is missing a name",
            ));
        }
        if self.contains(name) {
            return Err(AsmError::new(
                ErrorKind::MalformedMacroName,
                line,
                format!("macro name already defined: {}", name),
            ));
        }
        if Opcode::is_opcode_name(name) {
            return Err(AsmError::new(
                ErrorKind::MalformedMacroName,
                line,
                format!("macro name is a restricted mnemonic: {}", name),
            ));
        }
        Ok(())
    }

    pub fn insert(&mut self, name: String, body: Vec<String>) {
        self.macros.push(Macro { name, body });
    }
}
