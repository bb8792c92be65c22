//! Identifiers and operand values of the host IR.
//!
//! [`BlockId`] and [`InstId`] are plain index newtypes assigned by
//! [`FunctionBuilder`](crate::ir::FunctionBuilder). [`Value`] is what an instruction operand
//! refers to: a parameter, a mutable local slot, the SSA result of another instruction, or an
//! integer constant.

use std::fmt;

/// A strongly-typed identifier for a basic block within a [`Function`](crate::ir::Function).
///
/// Block ids are dense and follow program order: block `0` is the entry block.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Creates a new `BlockId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        BlockId(index)
    }

    /// Returns the raw index value of this block identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// A strongly-typed identifier for an instruction within a [`Function`](crate::ir::Function).
///
/// Instruction ids are the stable identity the analysis fact tables are keyed by. They are
/// assigned in creation order, which need not match program order when blocks are filled
/// out of order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstId(pub(crate) usize);

impl InstId {
    /// Creates a new `InstId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        InstId(index)
    }

    /// Returns the raw index value of this instruction identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstId({})", self.0)
    }
}

impl fmt::Display for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// An instruction operand.
///
/// `Param`, `Local` and `Inst` are *variables*: they have an identity that can be defined,
/// killed, and be live. Constants carry no identity and never participate in liveness or
/// expression invalidation.
///
/// # Examples
///
/// ```rust
/// use flowscope::ir::{InstId, Value};
///
/// assert!(Value::Param(0).is_variable());
/// assert!(!Value::Const(7).is_variable());
/// assert_eq!(Value::from(InstId::new(3)).to_string(), "%3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// The n-th function parameter.
    Param(u32),
    /// The n-th mutable local slot. Locals may be assigned any number of times.
    Local(u32),
    /// The SSA result of an instruction.
    Inst(InstId),
    /// An integer constant.
    Const(i64),
}

impl Value {
    /// Returns `true` if this value has an identity (anything but a constant).
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        !matches!(self, Value::Const(_))
    }

    /// Returns the instruction this value is the result of, if any.
    #[must_use]
    pub const fn as_inst(&self) -> Option<InstId> {
        match self {
            Value::Inst(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<InstId> for Value {
    fn from(id: InstId) -> Self {
        Value::Inst(id)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Param(n) => write!(f, "%arg{n}"),
            Value::Local(n) => write!(f, "%loc{n}"),
            Value::Inst(id) => write!(f, "{id}"),
            Value::Const(c) => write!(f, "{c}"),
        }
    }
}
