//! Binary expressions as analysis facts.
//!
//! The three expression analyses share one domain: every distinct `lhs op rhs` formed by a
//! [`InstKind::Binary`] instruction. Two instructions computing the same operator over the
//! same operands, in the same order, denote the same expression. No commutative
//! normalization is applied: `a + b` and `b + a` are different elements.

use std::fmt;

use crate::{
    dataflow::{Domain, DomainValue},
    ir::{BinaryOp, InstKind, Instruction, Value},
};

/// A binary operation over two operand values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expression {
    op: BinaryOp,
    lhs: Value,
    rhs: Value,
}

impl Expression {
    /// Creates an expression.
    #[must_use]
    pub const fn new(op: BinaryOp, lhs: Value, rhs: Value) -> Self {
        Self { op, lhs, rhs }
    }

    /// Returns the expression computed by `inst`, if it is a binary operation.
    #[must_use]
    pub fn of(inst: &Instruction) -> Option<Self> {
        match inst.kind() {
            InstKind::Binary { op, lhs, rhs } => Some(Self::new(*op, *lhs, *rhs)),
            _ => None,
        }
    }

    /// Returns the operator.
    #[must_use]
    pub const fn op(&self) -> BinaryOp {
        self.op
    }

    /// Returns the left operand.
    #[must_use]
    pub const fn lhs(&self) -> Value {
        self.lhs
    }

    /// Returns the right operand.
    #[must_use]
    pub const fn rhs(&self) -> Value {
        self.rhs
    }

    /// Returns `true` if `value` is one of the operands.
    #[must_use]
    pub fn uses(&self, value: Value) -> bool {
        self.lhs == value || self.rhs == value
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {}", self.op, self.lhs, self.rhs)
    }
}

/// Adds the expression computed by `inst`, if any, to `domain`.
pub(crate) fn discover(inst: &Instruction, domain: &mut Domain<Expression>) {
    if let Some(expr) = Expression::of(inst) {
        domain.insert(expr);
    }
}

/// Clears every expression that has the variable defined by `inst` as an operand.
pub(crate) fn kill(inst: &Instruction, domain: &Domain<Expression>, value: &mut DomainValue) {
    let Some(defined) = inst.result().filter(Value::is_variable) else {
        return;
    };
    for (index, expr) in domain.iter() {
        if expr.uses(defined) {
            value.remove(index);
        }
    }
}

/// Sets the expression computed by `inst`, if any.
pub(crate) fn generate(inst: &Instruction, domain: &Domain<Expression>, value: &mut DomainValue) {
    if let Some(index) = Expression::of(inst).and_then(|expr| domain.index_of(&expr)) {
        value.insert(index);
    }
}
