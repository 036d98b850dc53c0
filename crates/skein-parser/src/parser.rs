// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The fixed-order expression grammar.

use skein_ast::{BinOp, Expr, UnaryOp};

/// Parse one expression token into a tree.
///
/// Candidate forms are checked in the grammar's fixed order: quoted
/// string, numeric literal, `true`/`false`, `~`, control tag, `f#` path,
/// then the operator scan. Whatever matches nothing becomes an
/// identifier node.
pub fn parse_expr(token: &str) -> Expr {
    let token = token.trim();

    if let Some(inner) = string_literal(token) {
        return Expr::Str(inner.to_string());
    }
    if let Some(expr) = numeric_literal(token) {
        return expr;
    }
    match token {
        "true" => return Expr::Bool(true),
        "false" => return Expr::Bool(false),
        "~" => return Expr::Nil,
        _ => {}
    }
    if token.starts_with('@') {
        return Expr::ControlTag(token.to_string());
    }
    if let Some(path) = token.strip_prefix("f#") {
        return Expr::FilePath(path.to_string());
    }

    // Operator scan. Single-token variable names contain no spaces and
    // every operator text does, so checking operators before falling back
    // to an identifier cannot shadow a variable lookup.
    if let Some(expr) = split_on_operator(token) {
        return expr;
    }

    Expr::Ident(token.to_string())
}

/// A token that starts and ends with a double quote is one string
/// literal; only the delimiting quotes are stripped, embedded escapes are
/// kept as written.
fn string_literal(token: &str) -> Option<&str> {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Digits only → integer; digits with a `.` → float. Anything else is
/// not a numeric literal (there is no sign syntax; negatives are written
/// `0 - n`).
fn numeric_literal(token: &str) -> Option<Expr> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if token.contains('.') {
        token.parse::<f64>().ok().map(Expr::Float)
    } else {
        token.parse::<i64>().ok().map(Expr::Int)
    }
}

/// Scan for the first occurrence of each operator text in check order,
/// outside quoted spans, and split once at the winning occurrence.
fn split_on_operator(token: &str) -> Option<Expr> {
    let quoted = quoted_mask(token);

    for op in BinOp::BEFORE_NOT {
        if let Some(expr) = try_split(token, op, &quoted) {
            return Some(expr);
        }
    }

    // The `not ` slot: the single prefix operator, checked between `!=`
    // and `and` per the grammar's order.
    if let Some(rest) = token.strip_prefix("not ") {
        return Some(Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(parse_expr(rest)),
        });
    }

    for op in BinOp::AFTER_NOT {
        if let Some(expr) = try_split(token, op, &quoted) {
            return Some(expr);
        }
    }

    None
}

fn try_split(token: &str, op: BinOp, quoted: &[bool]) -> Option<Expr> {
    let text = op.text();
    for (pos, _) in token.match_indices(text) {
        if quoted[pos] {
            continue;
        }
        let left = &token[..pos];
        let right = &token[pos + text.len()..];
        return Some(Expr::Binary {
            op,
            left: Box::new(parse_expr(left)),
            right: Box::new(parse_expr(right)),
        });
    }
    None
}

/// Per-byte in-quote mask, honoring backslash escapes the same way the
/// tokenizer does. Operator texts are pure ASCII, so byte positions from
/// `match_indices` index this mask directly.
fn quoted_mask(token: &str) -> Vec<bool> {
    let mut mask = vec![false; token.len()];
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, b) in token.bytes().enumerate() {
        match b {
            b'\\' if !escaped => {
                escaped = true;
                mask[i] = in_quotes;
            }
            b'"' => {
                if escaped {
                    escaped = false;
                } else {
                    in_quotes = !in_quotes;
                }
                mask[i] = true;
            }
            _ => {
                escaped = false;
                mask[i] = in_quotes;
            }
        }
    }
    mask
}
