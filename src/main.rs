use std::{env, fs, process};

use asm15::assembler::assemble_from_file;
use asm15::logging::asm_error;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <basename>", args[0]);
        process::exit(1);
    }

    let base = &args[1];
    if !base.ends_with(".as") {
        eprintln!("Usage: {} <basename>.as", args[0]);
        process::exit(1);
    }
    let stem = &base[..base.len() - ".as".len()];

    let assembled = assemble_from_file(base).unwrap_or_else(|errors| {
        for err in &errors {
            asm_error(err);
        }
        process::exit(2);
    });

    fs::write(format!("{}.ob", stem), assembled.object).unwrap_or_else(|e| {
        eprintln!("failed to write object file: {}", e);
        process::exit(3);
    });

    if let Some(entries) = assembled.entries {
        fs::write(format!("{}.ent", stem), entries).unwrap_or_else(|e| {
            eprintln!("failed to write entries file: {}", e);
            process::exit(3);
        });
    }

    if let Some(externals) = assembled.externals {
        fs::write(format!("{}.ext", stem), externals).unwrap_or_else(|e| {
            eprintln!("failed to write externals file: {}", e);
            process::exit(3);
        });
    }
}
