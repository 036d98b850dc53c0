//! Skein CLI - script runner and interactive shell.

use std::env;
use std::fs;
use std::process;

use skein_diagnostics::formatter::DiagnosticFormatter;
use skein_diagnostics::json;
use skein_diagnostics::Diagnostic;
use skein_interp::{Interpreter, RunMode};

mod output;
mod shell;

/// Script files carry this extension; the shell appends it when missing.
const SCRIPT_EXTENSION: &str = ".sk";

fn main() {
    output::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        shell::run();
        return;
    }

    match args[1].as_str() {
        "run" => {
            let json = args[2..].iter().any(|a| a == "--json");
            let path = args[2..].iter().find(|a| !a.starts_with("--"));
            match path {
                Some(path) => cmd_run(path, json),
                None => {
                    eprintln!("Usage: skein run <file{}> [--json]", SCRIPT_EXTENSION);
                    process::exit(1);
                }
            }
        }
        "shell" => {
            shell::run();
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("skein {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            // Treat as filename
            if other.ends_with(SCRIPT_EXTENSION) {
                cmd_run(other, false);
            } else {
                eprintln!("Unknown command: {}", other);
                print_usage();
                process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Skein {} - a line-oriented scripting language", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: skein [command] [args]");
    println!();
    println!("Commands:");
    println!("  run <file> [--json]  Run a script; --json emits a machine-readable report");
    println!("  shell                Start the interactive shell (default with no args)");
    println!("  help                 Show this help");
    println!("  version              Show version");
}

fn cmd_run(path: &str, json: bool) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    };

    let mut interp = Interpreter::new();
    interp.set_source_name(path);

    if let Err(fault) = interp.run(&source, RunMode::Standalone) {
        let diag = Diagnostic::from(&fault);
        if json {
            let report = json::to_json_report(&[diag], &source, path);
            println!("{}", json::to_json_string(&report));
        } else {
            let formatted = DiagnosticFormatter::new(&source)
                .with_file_name(path)
                .format(&diag);
            eprint!("{}", formatted);
        }
        process::exit(1);
    }

    if json {
        let report = json::to_json_report(&[], &source, path);
        println!("{}", json::to_json_string(&report));
    }
}
