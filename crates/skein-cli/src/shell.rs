//! Interactive shell: a small command loop for running scripts.

use std::fs;
use std::io::{self, BufRead, Write};

use skein_diagnostics::formatter::DiagnosticFormatter;
use skein_diagnostics::Diagnostic;
use skein_interp::{Interpreter, RunMode};

use crate::output;
use crate::SCRIPT_EXTENSION;

/// Read commands from stdin until `exit`/`quit` or end of input.
pub fn run() {
    println!("{} {}", output::title("Skein"), env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for the command list.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", output::prompt());
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        match line.split_once(' ') {
            None => match line {
                "help" => print_help(),
                "exit" | "quit" => break,
                other => {
                    eprintln!("{}: unknown command '{}'", output::error_label(), other);
                }
            },
            Some(("run", name)) => run_script(name.trim()),
            Some((other, _)) => {
                eprintln!("{}: unknown command '{}'", output::error_label(), other);
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!(
        "  {} {}   Run a script; '{}' is appended when missing",
        output::command("run"),
        output::arg("<file>"),
        SCRIPT_EXTENSION
    );
    println!("  {}         Show this help", output::command("help"));
    println!("  {}         Leave the shell", output::command("exit"));
}

/// Each script gets a fresh interpreter; shell runs share no state.
fn run_script(name: &str) {
    let path = if name.ends_with(SCRIPT_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, SCRIPT_EXTENSION)
    };

    let source = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: can't read {}: {}", output::error_label(), path, e);
            return;
        }
    };

    let mut interp = Interpreter::new();
    interp.set_source_name(&path);

    if let Err(fault) = interp.run(&source, RunMode::Standalone) {
        let diag = Diagnostic::from(&fault);
        let formatted = DiagnosticFormatter::new(&source)
            .with_file_name(&path)
            .format(&diag);
        eprint!("{}", formatted);
    }
}
