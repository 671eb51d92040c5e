//! Line parser.
//!
//! Converts one source line into a structured [`ParsedLine`]: optional
//! label, directive or mnemonic, and its operands. The parser never
//! touches the symbol table or macro store — it only produces a record,
//! pushing validation errors into a caller-supplied sink when `pass` says
//! to (quiet on pass 2, so errors the first pass already reported aren't
//! printed twice).

use regex::Regex;

use crate::error::{AsmError, ErrorKind};
use crate::opcode::Opcode;
use crate::operand::Operand;

/// Which pass is driving the parser. Pass 2 is quiet: it re-derives the
/// same structure but does not duplicate pass-1 diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    First,
    Second,
}

/// One of the four assembler directives, already holding its parsed
/// payload (pass 2's emission is the authoritative count,
/// so both passes work from the same parsed `Vec`/`String`).
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Data(Vec<i32>),
    Str(String),
    Extern(String),
    Entry(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// A label-only or fully blank line.
    Empty,
    Directive(Directive),
    Instruction { opcode: Opcode, operands: Vec<Operand> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub label: Option<String>,
    pub kind: LineKind,
    pub text: String,
    pub line_number: usize,
    pub has_error: bool,
}

/// Parse one line of (already cleaned/macro-expanded) source.
pub fn parse_line(
    text: &str,
    line_number: usize,
    pass: Pass,
    errors: &mut Vec<AsmError>,
) -> ParsedLine {
    let mut has_error = false;
    let mut report = |err: AsmError, has_error: &mut bool| {
        *has_error = true;
        if pass == Pass::First {
            errors.push(err);
        }
    };

    let trimmed = text.trim();

    let (label, remainder) = split_label(trimmed);
    let label = match label {
        Some(Ok(name)) => Some(name),
        Some(Err(())) => {
            report(
                AsmError::new(ErrorKind::BadLabelSyntax, line_number, "empty label before ':'"),
                &mut has_error,
            );
            None
        }
        None => None,
    };

    let remainder = remainder.trim();
    if remainder.is_empty() {
        return ParsedLine { label, kind: LineKind::Empty, text: text.to_string(), line_number, has_error };
    }

    let (head, rest) = split_first_token(remainder);

    let kind = if head.starts_with('.') {
        parse_directive(head, rest, line_number, pass, errors, &mut has_error)
    } else {
        parse_instruction(head, rest, line_number, pass, errors, &mut has_error)
    };

    ParsedLine { label, kind, text: text.to_string(), line_number, has_error }
}

/// Split `"label: rest"` into `(Some(Ok(label)), rest)`, `(Some(Err(())),
/// rest)` for an empty label (`": rest"`), or `(None, line)` if there is no
/// top-level `:`.
fn split_label(line: &str) -> (Option<Result<String, ()>>, &str) {
    match line.find(':') {
        Some(idx) => {
            let label_text = line[..idx].trim();
            let remainder = &line[idx + 1..];
            if label_text.is_empty() {
                (Some(Err(())), remainder)
            } else {
                (Some(Ok(label_text.to_string())), remainder)
            }
        }
        None => (None, line),
    }
}

fn split_first_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

/// Split a comma-separated operand list, trimming each piece.
fn split_operands(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',').map(|part| part.trim().to_string()).collect()
}

fn parse_directive(
    name: &str,
    rest: &str,
    line_number: usize,
    pass: Pass,
    errors: &mut Vec<AsmError>,
    has_error: &mut bool,
) -> LineKind {
    let mut report = |err: AsmError, has_error: &mut bool| {
        *has_error = true;
        if pass == Pass::First {
            errors.push(err);
        }
    };

    match name {
        ".data" => {
            let pieces = split_operands(rest);
            if pieces.is_empty() {
                report(
                    AsmError::new(ErrorKind::MalformedData, line_number, "missing .data operands"),
                    has_error,
                );
                return LineKind::Directive(Directive::Data(Vec::new()));
            }
            let mut values = Vec::with_capacity(pieces.len());
            for piece in pieces {
                if piece.is_empty() {
                    report(
                        AsmError::new(ErrorKind::EmptyOperand, line_number, "empty .data operand"),
                        has_error,
                    );
                    values.push(0);
                    continue;
                }
                match piece.parse::<i32>() {
                    Ok(v) => values.push(v),
                    Err(_) => {
                        report(
                            AsmError::new(
                                ErrorKind::NonInteger,
                                line_number,
                                format!("non-integer .data value: {}", piece),
                            ),
                            has_error,
                        );
                        values.push(0);
                    }
                }
            }
            LineKind::Directive(Directive::Data(values))
        }
        ".string" => {
            let quoted = Regex::new("^\"([^\"]*)\"$").unwrap();
            match quoted.captures(rest.trim()) {
                Some(caps) => LineKind::Directive(Directive::Str(caps[1].to_string())),
                None => {
                    report(
                        AsmError::new(ErrorKind::MalformedString, line_number, "malformed .string operand"),
                        has_error,
                    );
                    LineKind::Directive(Directive::Str(String::new()))
                }
            }
        }
        ".extern" => {
            let name = rest.trim();
            if name.is_empty() {
                report(
                    AsmError::new(ErrorKind::EmptyOperand, line_number, "missing .extern operand"),
                    has_error,
                );
            }
            LineKind::Directive(Directive::Extern(name.to_string()))
        }
        ".entry" => {
            let name = rest.trim();
            if name.is_empty() {
                report(
                    AsmError::new(ErrorKind::EmptyOperand, line_number, "missing .entry operand"),
                    has_error,
                );
            }
            LineKind::Directive(Directive::Entry(name.to_string()))
        }
        other => {
            report(
                AsmError::new(ErrorKind::UnknownDirective, line_number, format!("unknown directive: {}", other)),
                has_error,
            );
            LineKind::Empty
        }
    }
}

fn parse_instruction(
    name: &str,
    rest: &str,
    line_number: usize,
    pass: Pass,
    errors: &mut Vec<AsmError>,
    has_error: &mut bool,
) -> LineKind {
    let mut report = |err: AsmError, has_error: &mut bool| {
        *has_error = true;
        if pass == Pass::First {
            errors.push(err);
        }
    };

    let opcode = match Opcode::from_str(name) {
        Some(op) => op,
        None => {
            report(
                AsmError::new(ErrorKind::UnknownMnemonic, line_number, format!("unknown mnemonic: {}", name)),
                has_error,
            );
            return LineKind::Empty;
        }
    };

    let pieces = split_operands(rest);
    let expected = opcode.operand_count();

    let mut operands = Vec::new();
    for (i, piece) in pieces.iter().enumerate() {
        if piece.is_empty() {
            report(
                AsmError::new(ErrorKind::EmptyOperand, line_number, format!("empty operand {}", i + 1)),
                has_error,
            );
            continue;
        }
        operands.push(Operand::parse(piece));
    }

    if operands.len() != expected {
        report(
            AsmError::new(
                ErrorKind::WrongOperandCount,
                line_number,
                format!(
                    "{} expects {} operand(s), found {}",
                    opcode.name(),
                    expected,
                    operands.len()
                ),
            ),
            has_error,
        );
    }

    LineKind::Instruction { opcode, operands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::AddressingMode;

    fn parse(text: &str) -> ParsedLine {
        let mut errors = Vec::new();
        parse_line(text, 1, Pass::First, &mut errors)
    }

    #[test]
    fn parses_label_and_instruction() {
        let line = parse("LEN: mov r3, r4");
        assert_eq!(line.label.as_deref(), Some("LEN"));
        match line.kind {
            LineKind::Instruction { opcode, ref operands } => {
                assert_eq!(opcode, Opcode::Mov);
                assert_eq!(operands.len(), 2);
                assert_eq!(operands[0].mode, AddressingMode::Register);
            }
            _ => panic!("expected instruction"),
        }
        assert!(!line.has_error);
    }

    #[test]
    fn flags_empty_label() {
        let line = parse(": mov r1, r2");
        assert!(line.has_error);
        assert_eq!(line.label, None);
    }

    #[test]
    fn flags_wrong_operand_count() {
        let line = parse("mov r1");
        assert!(line.has_error);
    }

    #[test]
    fn flags_trailing_operands() {
        let line = parse("rts r1");
        assert!(line.has_error);
    }

    #[test]
    fn parses_data_directive() {
        let line = parse(".data 5, -3, 0");
        assert_eq!(line.kind, LineKind::Directive(Directive::Data(vec![5, -3, 0])));
    }

    #[test]
    fn parses_string_directive() {
        let line = parse(r#".string "hi""#);
        assert_eq!(line.kind, LineKind::Directive(Directive::Str("hi".to_string())));
    }

    #[test]
    fn flags_malformed_string() {
        let line = parse(".string hi");
        assert!(line.has_error);
    }

    #[test]
    fn quiet_on_second_pass() {
        let mut errors = Vec::new();
        let line = parse_line("mov r1", 1, Pass::Second, &mut errors);
        assert!(line.has_error);
        assert!(errors.is_empty());
    }

    #[test]
    fn empty_line_after_label_only() {
        let line = parse("DONE:");
        assert_eq!(line.label.as_deref(), Some("DONE"));
        assert_eq!(line.kind, LineKind::Empty);
        assert!(!line.has_error);
    }
}
