// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Control-flow resolution.
//!
//! One forward pass over the lines before execution starts pairs every
//! `if` with its `endif` (and optional `else`) and every `while` with its
//! `endwhile`. Pairings are recorded from stack pops, so a successful
//! pass proves the blocks are well nested; any unmatched closer or
//! unclosed opener fails the run before a single line executes.

use std::collections::HashMap;

use skein_lexer::Line;

use crate::errors::{Fault, RuntimeError};
use crate::context::ROOT_PROGRAM;

/// Jump tables keyed by zero-based line index. Immutable once built.
#[derive(Debug, Default)]
pub struct FlowTables {
    if_to_else: HashMap<usize, usize>,
    if_to_endif: HashMap<usize, usize>,
    else_to_endif: HashMap<usize, usize>,
    while_to_endwhile: HashMap<usize, usize>,
    endwhile_to_while: HashMap<usize, usize>,
}

impl FlowTables {
    pub fn else_of(&self, if_line: usize) -> Option<usize> {
        self.if_to_else.get(&if_line).copied()
    }

    pub fn endif_of(&self, if_line: usize) -> Option<usize> {
        self.if_to_endif.get(&if_line).copied()
    }

    pub fn endif_of_else(&self, else_line: usize) -> Option<usize> {
        self.else_to_endif.get(&else_line).copied()
    }

    pub fn endwhile_of(&self, while_line: usize) -> Option<usize> {
        self.while_to_endwhile.get(&while_line).copied()
    }

    pub fn while_of(&self, endwhile_line: usize) -> Option<usize> {
        self.endwhile_to_while.get(&endwhile_line).copied()
    }
}

/// The statement shape a line has for block pairing purposes.
fn block_shape(text: &str) -> Shape {
    if text.starts_with("if ") && text.ends_with(" then") {
        Shape::If
    } else if text == "else do" {
        Shape::Else
    } else if text == "endif" {
        Shape::Endif
    } else if text.starts_with("while ") && text.ends_with(" do") {
        Shape::While
    } else if text == "endwhile" {
        Shape::Endwhile
    } else {
        Shape::Other
    }
}

enum Shape {
    If,
    Else,
    Endif,
    While,
    Endwhile,
    Other,
}

/// An open block awaiting its closer.
enum Opener {
    If { index: usize, else_index: Option<usize> },
    While { index: usize },
}

/// Build the jump tables for a block of lines.
///
/// A single stack of open blocks enforces well-nestedness across both
/// block families: an `endwhile` closing over an open `if` (or the
/// reverse) is a resolution failure.
pub fn resolve(lines: &[Line]) -> Result<FlowTables, Fault> {
    let mut tables = FlowTables::default();
    let mut open: Vec<Opener> = Vec::new();

    let fail = |error: RuntimeError, line: Option<usize>| {
        Fault::new(error, Some(ROOT_PROGRAM.to_string()), line)
    };

    for (index, line) in lines.iter().enumerate() {
        match block_shape(&line.text) {
            Shape::If => open.push(Opener::If {
                index,
                else_index: None,
            }),
            Shape::Else => match open.last_mut() {
                Some(Opener::If { else_index, .. }) if else_index.is_none() => {
                    *else_index = Some(index);
                }
                _ => return Err(fail(RuntimeError::IfStatement(line.number), Some(line.number))),
            },
            Shape::Endif => match open.pop() {
                Some(Opener::If {
                    index: if_index,
                    else_index,
                }) => {
                    tables.if_to_endif.insert(if_index, index);
                    if let Some(else_index) = else_index {
                        tables.if_to_else.insert(if_index, else_index);
                        tables.else_to_endif.insert(else_index, index);
                    }
                }
                _ => return Err(fail(RuntimeError::IfStatement(line.number), Some(line.number))),
            },
            Shape::While => open.push(Opener::While { index }),
            Shape::Endwhile => match open.pop() {
                Some(Opener::While { index: while_index }) => {
                    tables.while_to_endwhile.insert(while_index, index);
                    tables.endwhile_to_while.insert(index, while_index);
                }
                _ => return Err(fail(RuntimeError::WhileLoop(line.number), Some(line.number))),
            },
            Shape::Other => {}
        }
    }

    if let Some(opener) = open.first() {
        return Err(match opener {
            Opener::If { index, .. } => {
                fail(RuntimeError::IfStatement(lines[*index].number), None)
            }
            Opener::While { index } => {
                fail(RuntimeError::WhileLoop(lines[*index].number), None)
            }
        });
    }

    Ok(tables)
}
