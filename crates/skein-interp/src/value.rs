// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values and operator application.

use std::path::PathBuf;

use skein_ast::BinOp;

use crate::errors::RuntimeError;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String
    Str(String),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// The nil value, written `~`
    Nil,
    /// File path, written `f#<path>`
    FilePath(PathBuf),
    /// Ordered sequence
    List(Vec<Value>),
    /// Fixed-capacity indexed sequence with an optional element constraint
    Array(Array),
    /// Last-in-first-out sequence
    Stack(Vec<Value>),
    /// Named function with its owned code block
    FunctionRef { name: String, body: String },
}

/// Variant discriminant, used for array element constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    Nil,
    FilePath,
    List,
    Array,
    Stack,
    FunctionRef,
}

impl ValueKind {
    /// The zero value for the kind; what an out-of-range array read yields.
    pub fn zero(self) -> Value {
        match self {
            ValueKind::Str => Value::Str(String::new()),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::List => Value::List(Vec::new()),
            ValueKind::Stack => Value::Stack(Vec::new()),
            _ => Value::Nil,
        }
    }
}

/// A fixed-capacity indexed sequence.
///
/// Reads outside the written range yield the element kind's zero value
/// rather than failing; writes are bounds- and constraint-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    items: Vec<Value>,
    capacity: usize,
    elem: Option<ValueKind>,
}

impl Array {
    pub fn new(capacity: usize, elem: Option<ValueKind>) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            elem,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read by index; out-of-range reads are zero-valued.
    pub fn get(&self, index: usize) -> Value {
        match self.items.get(index) {
            Some(value) => value.clone(),
            None => self.elem.map(ValueKind::zero).unwrap_or(Value::Nil),
        }
    }

    /// Write by index, padding the gap with zero values.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), RuntimeError> {
        if index >= self.capacity {
            return Err(RuntimeError::InvalidValue(format!(
                "index {} is out of range for an array of capacity {}",
                index, self.capacity
            )));
        }
        if let Some(elem) = self.elem {
            if value.kind() != elem {
                return Err(RuntimeError::InvalidValue(format!(
                    "array holds {} elements, not {}",
                    elem.zero().type_name(),
                    value.type_name()
                )));
            }
        }
        while self.items.len() <= index {
            self.items
                .push(self.elem.map(ValueKind::zero).unwrap_or(Value::Nil));
        }
        self.items[index] = value;
        Ok(())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::Str,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Nil => ValueKind::Nil,
            Value::FilePath(_) => ValueKind::FilePath,
            Value::List(_) => ValueKind::List,
            Value::Array(_) => ValueKind::Array,
            Value::Stack(_) => ValueKind::Stack,
            Value::FunctionRef { .. } => ValueKind::FunctionRef,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
            Value::FilePath(_) => "file path",
            Value::List(_) => "list",
            Value::Array(_) => "array",
            Value::Stack(_) => "stack",
            Value::FunctionRef { .. } => "function",
        }
    }

    /// Host truthiness, used by conditions, `and`/`or`, and `not`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Nil => false,
            Value::FilePath(_) => true,
            Value::List(items) => !items.is_empty(),
            Value::Array(array) => !array.is_empty(),
            Value::Stack(items) => !items.is_empty(),
            Value::FunctionRef { .. } => true,
        }
    }

    /// Structural equality for `==`/`!=`. Integers and floats compare
    /// numerically across the two kinds; otherwise differing variants are
    /// unequal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            _ => self == other,
        }
    }

    /// The element or character count for `@LEN`.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) | Value::Stack(items) => Some(items.len()),
            Value::Array(array) => Some(array.len()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "Nil"),
            Value::FilePath(p) => write!(f, "{}", p.display()),
            Value::List(items) | Value::Stack(items) => write_items(f, items),
            Value::Array(array) => write_items(f, &array.items),
            Value::FunctionRef { name, .. } => write!(f, "<function {}>", name),
        }
    }
}

fn write_items(f: &mut std::fmt::Formatter<'_>, items: &[Value]) -> std::fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

/// Apply a binary operator to two already-evaluated operands.
///
/// `and`/`or` never reach here; they short-circuit in the evaluator.
/// Every supported variant pair is matched explicitly and anything else
/// is an expression error naming both operand types.
pub fn apply_binary(op: BinOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (op, &left, &right) {
        (BinOp::Eq, _, _) => return Ok(Value::Bool(left.equals(&right))),
        (BinOp::Ne, _, _) => return Ok(Value::Bool(!left.equals(&right))),
        _ => {}
    }

    match (op, left, right) {
        // ordering
        (BinOp::Lt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Gt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Lt, Value::Float(a), Value::Float(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Gt, Value::Float(a), Value::Float(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Lt, Value::Int(a), Value::Float(b)) => Ok(Value::Bool((a as f64) < b)),
        (BinOp::Gt, Value::Int(a), Value::Float(b)) => Ok(Value::Bool((a as f64) > b)),
        (BinOp::Lt, Value::Float(a), Value::Int(b)) => Ok(Value::Bool(a < b as f64)),
        (BinOp::Gt, Value::Float(a), Value::Int(b)) => Ok(Value::Bool(a > b as f64)),
        (BinOp::Lt, Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Gt, Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a > b)),

        // arithmetic; overflow surfaces as an error, never a panic
        (BinOp::Add, Value::Int(a), Value::Int(b)) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Expression("integer overflow in '+'".into())),
        (BinOp::Sub, Value::Int(a), Value::Int(b)) => a
            .checked_sub(b)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Expression("integer overflow in '-'".into())),
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => a
            .checked_mul(b)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Expression("integer overflow in '*'".into())),
        (BinOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (BinOp::Add, Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }

        // `/` is always the host floating-point quotient
        (BinOp::Div, a, b) if a.as_number().is_some() && b.as_number().is_some() => {
            let (a, b) = (a.as_number().unwrap(), b.as_number().unwrap());
            if b == 0.0 {
                return Err(RuntimeError::Expression("division by zero".into()));
            }
            Ok(Value::Float(a / b))
        }

        (BinOp::FloorDiv, Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(RuntimeError::Expression("division by zero".into()));
            }
            if a == i64::MIN && b == -1 {
                return Err(RuntimeError::Expression("integer overflow in '//'".into()));
            }
            Ok(Value::Int(floor_div(a, b)))
        }
        (BinOp::Mod, Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(RuntimeError::Expression("division by zero".into()));
            }
            if a == i64::MIN && b == -1 {
                return Err(RuntimeError::Expression("integer overflow in '%'".into()));
            }
            Ok(Value::Int(floor_mod(a, b)))
        }
        (BinOp::FloorDiv, a, b) if a.as_number().is_some() && b.as_number().is_some() => {
            let (a, b) = (a.as_number().unwrap(), b.as_number().unwrap());
            if b == 0.0 {
                return Err(RuntimeError::Expression("division by zero".into()));
            }
            Ok(Value::Float((a / b).floor()))
        }
        (BinOp::Mod, a, b) if a.as_number().is_some() && b.as_number().is_some() => {
            let (a, b) = (a.as_number().unwrap(), b.as_number().unwrap());
            if b == 0.0 {
                return Err(RuntimeError::Expression("division by zero".into()));
            }
            Ok(Value::Float(a - b * (a / b).floor()))
        }

        (BinOp::Pow, Value::Int(a), Value::Int(b)) => {
            if b >= 0 {
                let exp = u32::try_from(b).map_err(|_| {
                    RuntimeError::Expression(format!("exponent {} is too large", b))
                })?;
                a.checked_pow(exp)
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::Expression("integer overflow in '**'".into()))
            } else {
                Ok(Value::Float((a as f64).powf(b as f64)))
            }
        }

        // remaining mixed numeric arithmetic promotes to float
        (BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Pow, a, b)
            if a.as_number().is_some() && b.as_number().is_some() =>
        {
            let (a, b) = (a.as_number().unwrap(), b.as_number().unwrap());
            Ok(Value::Float(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Pow => a.powf(b),
                _ => unreachable!(),
            }))
        }

        // bitwise, integers only
        (BinOp::BitAnd, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a & b)),
        (BinOp::BitOr, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a | b)),
        (BinOp::BitXor, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a ^ b)),

        (op, left, right) => Err(RuntimeError::Expression(format!(
            "unsupported operand types for '{}': {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

impl Value {
    /// Numeric view for float-promoting operators.
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    // --- container operations; scripts can only build lists today
    // (`@LIST`), so arrays and stacks are reached through the embedding
    // API ---

    pub fn list_push(&mut self, value: Value) -> Result<(), RuntimeError> {
        match self {
            Value::List(items) => {
                items.push(value);
                Ok(())
            }
            _ => Err(RuntimeError::InvalidValue(format!(
                "cannot push onto a {}",
                self.type_name()
            ))),
        }
    }

    pub fn stack_push(&mut self, value: Value) -> Result<(), RuntimeError> {
        match self {
            Value::Stack(items) => {
                items.push(value);
                Ok(())
            }
            _ => Err(RuntimeError::InvalidValue(format!(
                "cannot push onto a {}",
                self.type_name()
            ))),
        }
    }

    pub fn stack_pop(&mut self) -> Result<Value, RuntimeError> {
        match self {
            Value::Stack(items) => items
                .pop()
                .ok_or_else(|| RuntimeError::InvalidValue("pop from an empty stack".into())),
            _ => Err(RuntimeError::InvalidValue(format!(
                "cannot pop from a {}",
                self.type_name()
            ))),
        }
    }

    pub fn stack_peek(&self) -> Result<&Value, RuntimeError> {
        match self {
            Value::Stack(items) => items
                .last()
                .ok_or_else(|| RuntimeError::InvalidValue("peek at an empty stack".into())),
            _ => Err(RuntimeError::InvalidValue(format!(
                "cannot peek at a {}",
                self.type_name()
            ))),
        }
    }
}

/// Floor division, matching the grammar's `//` on negatives.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Modulo taking the sign of the divisor, pairing with [`floor_div`].
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic() {
        assert_eq!(
            apply_binary(BinOp::Add, Value::Int(2), Value::Int(3)).unwrap(),
            Value::Int(5)
        );
        assert_eq!(
            apply_binary(BinOp::Sub, Value::Int(2), Value::Int(5)).unwrap(),
            Value::Int(-3)
        );
        assert_eq!(
            apply_binary(BinOp::Mul, Value::Int(4), Value::Int(6)).unwrap(),
            Value::Int(24)
        );
        assert_eq!(
            apply_binary(BinOp::Pow, Value::Int(2), Value::Int(10)).unwrap(),
            Value::Int(1024)
        );
    }

    #[test]
    fn integer_overflow_is_an_expression_error() {
        let cases = [
            (BinOp::Add, i64::MAX, 1),
            (BinOp::Sub, i64::MIN, 1),
            (BinOp::Mul, i64::MAX, 2),
            (BinOp::FloorDiv, i64::MIN, -1),
            (BinOp::Mod, i64::MIN, -1),
        ];
        for (op, a, b) in cases {
            let err = apply_binary(op, Value::Int(a), Value::Int(b)).unwrap_err();
            assert_eq!(err.kind(), "ExpressionError", "{:?}", op);
        }
    }

    #[test]
    fn slash_always_yields_the_float_quotient() {
        assert_eq!(
            apply_binary(BinOp::Div, Value::Int(7), Value::Int(2)).unwrap(),
            Value::Float(3.5)
        );
    }

    #[test]
    fn floor_division_and_modulo_floor_toward_negative_infinity() {
        assert_eq!(
            apply_binary(BinOp::FloorDiv, Value::Int(7), Value::Int(2)).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            apply_binary(BinOp::FloorDiv, Value::Int(-7), Value::Int(2)).unwrap(),
            Value::Int(-4)
        );
        assert_eq!(
            apply_binary(BinOp::Mod, Value::Int(-7), Value::Int(2)).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn division_by_zero_is_an_expression_error() {
        for op in [BinOp::Div, BinOp::FloorDiv, BinOp::Mod] {
            let err = apply_binary(op, Value::Int(1), Value::Int(0)).unwrap_err();
            assert_eq!(err.kind(), "ExpressionError");
        }
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(
            apply_binary(BinOp::Add, Value::Str("ab".into()), Value::Str("cd".into())).unwrap(),
            Value::Str("abcd".into())
        );
    }

    #[test]
    fn mismatched_operands_fail_with_both_type_names() {
        let err = apply_binary(BinOp::Add, Value::Str("a".into()), Value::Int(1)).unwrap_err();
        assert!(err.to_string().contains("string and integer"));
    }

    #[test]
    fn equality_is_structural_and_numeric_across_int_float() {
        assert!(Value::Int(1).equals(&Value::Float(1.0)));
        assert!(!Value::Str("1".into()).equals(&Value::Int(1)));
        assert!(Value::List(vec![Value::Int(1)]).equals(&Value::List(vec![Value::Int(1)])));
    }

    #[test]
    fn unordered_types_fail_comparison() {
        let err = apply_binary(BinOp::Lt, Value::Bool(true), Value::Nil).unwrap_err();
        assert_eq!(err.kind(), "ExpressionError");
    }

    #[test]
    fn bitwise_requires_integers() {
        assert_eq!(
            apply_binary(BinOp::BitXor, Value::Int(6), Value::Int(3)).unwrap(),
            Value::Int(5)
        );
        assert!(apply_binary(BinOp::BitAnd, Value::Bool(true), Value::Int(1)).is_err());
    }

    #[test]
    fn truthiness() {
        assert!(Value::Int(2).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(Value::List(vec![Value::Nil]).is_truthy());
    }

    #[test]
    fn array_reads_out_of_range_are_zero_valued() {
        let mut array = Array::new(4, Some(ValueKind::Int));
        array.set(1, Value::Int(7)).unwrap();
        assert_eq!(array.get(0), Value::Int(0));
        assert_eq!(array.get(1), Value::Int(7));
        assert_eq!(array.get(99), Value::Int(0));
    }

    #[test]
    fn array_rejects_constraint_and_capacity_violations() {
        let mut array = Array::new(2, Some(ValueKind::Int));
        assert!(array.set(0, Value::Str("no".into())).is_err());
        assert!(array.set(2, Value::Int(1)).is_err());
    }

    #[test]
    fn stack_is_last_in_first_out() {
        let mut stack = Value::Stack(vec![]);
        stack.stack_push(Value::Int(1)).unwrap();
        stack.stack_push(Value::Int(2)).unwrap();
        assert_eq!(stack.stack_peek().unwrap(), &Value::Int(2));
        assert_eq!(stack.stack_pop().unwrap(), Value::Int(2));
        assert_eq!(stack.stack_pop().unwrap(), Value::Int(1));
        assert!(stack.stack_pop().is_err());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
        assert_eq!(Value::Nil.to_string(), "Nil");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Str("a".into())]).to_string(),
            "[1, a]"
        );
    }
}
