//! Ordered symbol table.
//!
//! An insertion-ordered `Vec` indexed by name preserves declaration order
//! for output while giving near-O(1) lookup, without a linked list's
//! pointer graph.

use crate::error::{AsmError, ErrorKind};

/// What kind of thing a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Label,
    Extern,
    Entry,
    Data,
    String,
}

/// A single entry in the symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub address: u16,
    pub kind: SymbolKind,
    pub is_data: bool,
    pub line: usize,
}

/// An ordered, append-mostly collection of symbols.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { symbols: Vec::new() }
    }

    /// Insert a new symbol:
    /// - A duplicate name is rejected, *except*
    /// - a prior `Extern` may be promoted to `Entry` in place (idempotently:
    ///   promoting an already-`Entry` symbol again is a no-op, not a dup).
    pub fn insert(
        &mut self,
        name: &str,
        address: u16,
        kind: SymbolKind,
        is_data: bool,
        line: usize,
    ) -> Result<(), AsmError> {
        let name = name.trim();
        if let Some(existing) = self.lookup_mut(name) {
            let promotable = existing.kind == SymbolKind::Extern && kind == SymbolKind::Entry;
            let already_entry = existing.kind == SymbolKind::Entry && kind == SymbolKind::Entry;
            if promotable {
                existing.kind = SymbolKind::Entry;
                existing.line = line;
                return Ok(());
            }
            if already_entry {
                return Ok(());
            }
            return Err(AsmError::new(
                ErrorKind::DuplicateSymbol,
                line,
                format!("duplicate symbol: {}", name),
            ));
        }
        self.symbols.push(Symbol {
            name: name.to_string(),
            address,
            kind,
            is_data,
            line,
        });
        Ok(())
    }

    /// Duplicate `.extern` declarations are a warning, not a failure:
    /// insert only if the name isn't already known.
    pub fn insert_extern(&mut self, name: &str, line: usize) -> bool {
        let name = name.trim();
        if self.lookup(name).is_some() {
            return false;
        }
        self.symbols.push(Symbol {
            name: name.to_string(),
            address: 0,
            kind: SymbolKind::Extern,
            is_data: false,
            line,
        });
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let name = name.trim();
        self.symbols.iter().find(|s| s.name.trim() == name)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.iter_mut().find(|s| s.name.trim() == name)
    }

    /// Promote an existing symbol to `Entry` (used by `.entry`); errors if
    /// the symbol is unknown.
    pub fn mark_entry(&mut self, name: &str, line: usize) -> Result<(), AsmError> {
        let name_trim = name.trim().to_string();
        match self.lookup_mut(&name_trim) {
            Some(sym) => {
                sym.kind = SymbolKind::Entry;
                Ok(())
            }
            None => Err(AsmError::new(
                ErrorKind::SymbolNotFound,
                line,
                format!("entry symbol not found: {}", name_trim),
            )),
        }
    }

    pub fn count_data(&self) -> usize {
        self.symbols.iter().filter(|s| s.is_data).count()
    }

    /// Shift every data symbol's address by `final_ic`, so data addresses
    /// land after the code segment.
    pub fn relocate_data(&mut self, final_ic: u16) {
        for symbol in self.symbols.iter_mut().filter(|s| s.is_data) {
            symbol.address += final_ic;
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.kind == SymbolKind::Entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_plain_duplicates() {
        let mut table = SymbolTable::new();
        table.insert("X", 100, SymbolKind::Label, false, 1).unwrap();
        let err = table.insert("X", 101, SymbolKind::Label, false, 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateSymbol);
    }

    #[test]
    fn promotes_extern_to_entry() {
        let mut table = SymbolTable::new();
        table.insert_extern("EXT", 1);
        table.insert("EXT", 0, SymbolKind::Entry, false, 2).unwrap();
        assert_eq!(table.lookup("EXT").unwrap().kind, SymbolKind::Entry);
    }

    #[test]
    fn entry_promotion_is_idempotent() {
        let mut table = SymbolTable::new();
        table.insert_extern("EXT", 1);
        table.insert("EXT", 0, SymbolKind::Entry, false, 2).unwrap();
        let before = table.clone();
        table.insert("EXT", 0, SymbolKind::Entry, false, 3).unwrap();
        assert_eq!(before.lookup("EXT"), table.lookup("EXT"));
    }

    #[test]
    fn relocates_only_data_symbols() {
        let mut table = SymbolTable::new();
        table.insert("CODE", 100, SymbolKind::Label, false, 1).unwrap();
        table.insert("LEN", 0, SymbolKind::Data, true, 2).unwrap();
        table.relocate_data(102);
        assert_eq!(table.lookup("CODE").unwrap().address, 100);
        assert_eq!(table.lookup("LEN").unwrap().address, 102);
    }

    #[test]
    fn count_data_counts_only_data_symbols() {
        let mut table = SymbolTable::new();
        table.insert("CODE", 100, SymbolKind::Label, false, 1).unwrap();
        table.insert("LEN", 0, SymbolKind::Data, true, 2).unwrap();
        table.insert("MSG", 0, SymbolKind::String, true, 3).unwrap();
        assert_eq!(table.count_data(), 2);
    }

    #[test]
    fn lookup_trims_both_sides() {
        let mut table = SymbolTable::new();
        table.insert(" X ", 100, SymbolKind::Label, false, 1).unwrap();
        assert!(table.lookup("X").is_some());
    }
}
