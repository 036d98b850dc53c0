// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Quote-aware line tokenization.

/// Split a statement line into tokens.
///
/// Tokens are separated by runs of spaces, except that a double-quoted
/// span is one token no matter what it contains. A backslash immediately
/// before a quote escapes it; the quote stays part of the literal and does
/// not close it. An unterminated quote extends to the end of the line
/// without raising an error here (the malformed token fails value
/// resolution instead).
///
/// Two statement shapes keep their condition text whole: a line starting
/// with `if ` and ending with ` then` tokenizes to `["if", condition,
/// "then"]`, and `while … do` likewise, so spaces inside the condition
/// are never taken for statement-argument separators.
pub fn tokenize(line: &str) -> Vec<String> {
    if let Some(cond) = line
        .strip_prefix("if ")
        .and_then(|rest| rest.strip_suffix(" then"))
    {
        return vec!["if".into(), cond.trim().to_string(), "then".into()];
    }
    if let Some(cond) = line
        .strip_prefix("while ")
        .and_then(|rest| rest.strip_suffix(" do"))
    {
        return vec!["while".into(), cond.trim().to_string(), "do".into()];
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in line.chars() {
        match c {
            '\\' if !escaped => {
                escaped = true;
                current.push(c);
            }
            '"' => {
                if escaped {
                    escaped = false;
                } else {
                    in_quotes = !in_quotes;
                }
                current.push(c);
            }
            ' ' if !in_quotes => {
                escaped = false;
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => {
                escaped = false;
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
