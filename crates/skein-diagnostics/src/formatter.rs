// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal formatter for diagnostics.
//!
//! Produces line-anchored, color-coded output:
//!
//! ```text
//! error[UnknownValueError]: unknown value 'speed'
//!   --> race.sk:7 (program 'setup')
//!    |
//!  7 | send speed to @OUT
//!    |
//! ```

use colored::Colorize;

use crate::{Diagnostic, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        if let Some(line_num) = diagnostic.line {
            let file = self.file_name.unwrap_or("<script>");
            let scope = match &diagnostic.program {
                Some(program) => format!(" (program '{}')", program),
                None => String::new(),
            };
            out.push_str(&format!(
                "  {} {}:{}{}\n",
                "-->".blue(),
                file,
                line_num,
                scope
            ));

            if let Some(text) = self.source.lines().nth(line_num - 1) {
                let gutter_width = line_num.to_string().len().max(2);
                let pipe = "|".blue();
                out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), pipe));
                let gutter = format!("{:>width$}", line_num, width = gutter_width + 1);
                out.push_str(&format!("{} {} {}\n", gutter.blue(), pipe, text.trim_end()));
                out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), pipe));
            }
        }

        for note in &diagnostic.notes {
            out.push_str(&format!("  {} {}: {}\n", "=".blue(), "note".bold(), note));
        }
        out
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let label = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };
        out.push_str(&format!(
            "{}{}: {}\n",
            label,
            format!("[{}]", diagnostic.kind).bold(),
            diagnostic.message.bold()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_points_at_the_failing_line() {
        colored::control::set_override(false);
        let source = "define x as 1\nsend speed to @OUT\n";
        let diag = Diagnostic::error("UnknownValueError", "unknown value 'speed'")
            .in_program("<main>")
            .on_line(2);
        let formatted = DiagnosticFormatter::new(source)
            .with_file_name("race.sk")
            .format(&diag);
        colored::control::unset_override();

        assert!(formatted.starts_with("error[UnknownValueError]: unknown value 'speed'"));
        assert!(formatted.contains("--> race.sk:2 (program '<main>')"));
        assert!(formatted.contains("send speed to @OUT"));
    }

    #[test]
    fn format_without_a_line_is_header_only() {
        colored::control::set_override(false);
        let diag = Diagnostic::error("InterpreterError", "something went wrong");
        let formatted = DiagnosticFormatter::new("").format(&diag);
        colored::control::unset_override();

        assert_eq!(formatted, "error[InterpreterError]: something went wrong\n");
    }
}
