// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression parser for the Skein language.
//!
//! Turns a single expression token into a `skein_ast::Expr` tree. The
//! grammar has no conventional precedence: a fixed list of candidate
//! forms is checked in order, and for operators the first occurrence of
//! the first matching operator text wins the split. That check order is
//! the compatibility contract and is reproduced here verbatim.
//!
//! Parsing is total. A token that matches no literal form and contains no
//! operator becomes an identifier node; whether that identifier names a
//! variable is only known at evaluation time, so unknown-value failures
//! are raised there.

mod parser;

pub use parser::parse_expr;

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ast::{BinOp, Expr, UnaryOp};

    fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn literals() {
        assert_eq!(parse_expr("\"hi there\""), Expr::Str("hi there".into()));
        assert_eq!(parse_expr("42"), Expr::Int(42));
        assert_eq!(parse_expr("4.2"), Expr::Float(4.2));
        assert_eq!(parse_expr("true"), Expr::Bool(true));
        assert_eq!(parse_expr("false"), Expr::Bool(false));
        assert_eq!(parse_expr("~"), Expr::Nil);
        assert_eq!(parse_expr("f#out.txt"), Expr::FilePath("out.txt".into()));
        assert_eq!(parse_expr("@LIST"), Expr::ControlTag("@LIST".into()));
        assert_eq!(parse_expr("counter"), Expr::Ident("counter".into()));
    }

    #[test]
    fn simple_binary() {
        assert_eq!(
            parse_expr("1 + 2"),
            bin(BinOp::Add, Expr::Int(1), Expr::Int(2))
        );
    }

    #[test]
    fn first_occurrence_of_earliest_checked_operator_wins() {
        // `<` is checked before `+`, so the split happens at `<` even
        // though `+` occurs first in the text.
        assert_eq!(
            parse_expr("1 + 2 < 4"),
            bin(
                BinOp::Lt,
                bin(BinOp::Add, Expr::Int(1), Expr::Int(2)),
                Expr::Int(4)
            )
        );
    }

    #[test]
    fn split_is_at_first_occurrence() {
        // Same operator twice: split at the first, remainder re-parsed.
        assert_eq!(
            parse_expr("1 - 2 - 3"),
            bin(
                BinOp::Sub,
                Expr::Int(1),
                bin(BinOp::Sub, Expr::Int(2), Expr::Int(3))
            )
        );
    }

    #[test]
    fn no_arithmetic_precedence() {
        // `*` is checked before `+`, so `2 + 3 * 4` splits at `*` first:
        // left `2 + 3`, right `4`.
        assert_eq!(
            parse_expr("2 + 3 * 4"),
            bin(
                BinOp::Mul,
                bin(BinOp::Add, Expr::Int(2), Expr::Int(3)),
                Expr::Int(4)
            )
        );
    }

    #[test]
    fn double_star_is_not_seen_as_mul() {
        assert_eq!(
            parse_expr("2 ** 3"),
            bin(BinOp::Pow, Expr::Int(2), Expr::Int(3))
        );
        assert_eq!(
            parse_expr("7 // 2"),
            bin(BinOp::FloorDiv, Expr::Int(7), Expr::Int(2))
        );
    }

    #[test]
    fn not_is_prefix_only() {
        assert_eq!(
            parse_expr("not ready"),
            Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(Expr::Ident("ready".into())),
            }
        );
    }

    #[test]
    fn equality_is_checked_before_not() {
        // `not a == b` splits at `==` first, so the negation binds to the
        // left operand alone.
        assert_eq!(
            parse_expr("not a == b"),
            bin(
                BinOp::Eq,
                Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(Expr::Ident("a".into())),
                },
                Expr::Ident("b".into())
            )
        );
    }

    #[test]
    fn operator_text_inside_quotes_does_not_split() {
        assert_eq!(
            parse_expr("\"a + b\" + tail"),
            bin(
                BinOp::Add,
                Expr::Str("a + b".into()),
                Expr::Ident("tail".into())
            )
        );
    }

    #[test]
    fn fully_quoted_token_is_one_literal() {
        // Starts and ends with a quote, so the literal rule wins before
        // any operator scan.
        assert_eq!(parse_expr("\"a + b\""), Expr::Str("a + b".into()));
    }

    #[test]
    fn control_tags_never_split() {
        assert_eq!(parse_expr("@RAND:1:6"), Expr::ControlTag("@RAND:1:6".into()));
    }

    #[test]
    fn unmatched_shapes_become_identifiers() {
        // Resolution failure for these is the evaluator's job.
        assert_eq!(parse_expr("foo bar"), Expr::Ident("foo bar".into()));
    }
}
