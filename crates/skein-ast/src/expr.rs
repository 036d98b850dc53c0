// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression nodes.

/// An expression in the value grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal, delimiting quotes already stripped.
    Str(String),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Boolean literal
    Bool(bool),
    /// The `~` nil literal
    Nil,
    /// An `@`-prefixed control tag, kept whole and resolved at evaluation
    /// time because tags like `@IN` and `@RUN:` have side effects.
    ControlTag(String),
    /// An `f#`-prefixed file path literal (prefix stripped).
    FilePath(String),
    /// Identifier, resolved against the variable table at evaluation time.
    Ident(String),
    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation
    Unary { op: UnaryOp, operand: Box<Expr> },
}

/// Binary operators, in the fixed order the grammar scans for them.
///
/// The scan order doubles as the precedence contract: the first operator
/// kind whose text occurs in a token wins the split. Variants are listed
/// in scan order; `BEFORE_NOT` and `AFTER_NOT` expose the two halves of
/// the sequence around the `not ` prefix check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Ne,
    And,
    Or,
    Lt,
    Gt,
    BitXor,
    BitAnd,
    BitOr,
    Pow,
    Div,
    Mod,
    FloorDiv,
    Mul,
    Sub,
    Add,
}

impl BinOp {
    /// The space-surrounded operator text scanned for in raw tokens.
    pub fn text(self) -> &'static str {
        match self {
            BinOp::Eq => " == ",
            BinOp::Ne => " != ",
            BinOp::And => " and ",
            BinOp::Or => " or ",
            BinOp::Lt => " < ",
            BinOp::Gt => " > ",
            BinOp::BitXor => " ^ ",
            BinOp::BitAnd => " & ",
            BinOp::BitOr => " | ",
            BinOp::Pow => " ** ",
            BinOp::Div => " / ",
            BinOp::Mod => " % ",
            BinOp::FloorDiv => " // ",
            BinOp::Mul => " * ",
            BinOp::Sub => " - ",
            BinOp::Add => " + ",
        }
    }

    /// The display name used in error messages.
    pub fn symbol(self) -> &'static str {
        self.text().trim()
    }

    /// Binary operators checked before the `not ` prefix slot.
    pub const BEFORE_NOT: [BinOp; 2] = [BinOp::Eq, BinOp::Ne];

    /// Binary operators checked after the `not ` prefix slot, in order.
    pub const AFTER_NOT: [BinOp; 14] = [
        BinOp::And,
        BinOp::Or,
        BinOp::Lt,
        BinOp::Gt,
        BinOp::BitXor,
        BinOp::BitAnd,
        BinOp::BitOr,
        BinOp::Pow,
        BinOp::Div,
        BinOp::Mod,
        BinOp::FloorDiv,
        BinOp::Mul,
        BinOp::Sub,
        BinOp::Add,
    ];
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Boolean negation, written `not <operand>`.
    Not,
}
