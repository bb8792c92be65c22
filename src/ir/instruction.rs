//! Instructions of the host IR.
//!
//! An [`Instruction`] couples an [`InstKind`] with the block it lives in and the variable it
//! defines. Only [`InstKind::Binary`] forms an expression the expression analyses track;
//! every other value-producing kind still defines a variable and therefore still kills
//! expressions over it.

use std::fmt;

use strum::{Display, EnumCount, EnumIter};

use crate::ir::{BlockId, InstId, Value};

/// Binary arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    /// Integer addition
    Add,
    /// Integer subtraction
    Sub,
    /// Integer multiplication
    Mul,
    /// Signed division
    SDiv,
    /// Unsigned division
    UDiv,
    /// Signed remainder
    SRem,
    /// Unsigned remainder
    URem,
    /// Shift left
    Shl,
    /// Logical shift right
    LShr,
    /// Arithmetic shift right
    AShr,
    /// Bitwise and
    And,
    /// Bitwise or
    Or,
    /// Bitwise exclusive or
    Xor,
}

/// Integer comparison predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum CmpPredicate {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Signed less than
    Slt,
    /// Signed less or equal
    Sle,
    /// Signed greater than
    Sgt,
    /// Signed greater or equal
    Sge,
}

/// An incoming value of a phi node, selected when control arrives from `predecessor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiOperand {
    value: Value,
    predecessor: BlockId,
}

impl PhiOperand {
    /// Creates a new phi operand.
    ///
    /// # Arguments
    ///
    /// * `value` - The value selected along this edge
    /// * `predecessor` - The block the edge comes from
    #[must_use]
    pub const fn new(value: Value, predecessor: BlockId) -> Self {
        Self { value, predecessor }
    }

    /// Returns the value selected along this edge.
    #[must_use]
    pub const fn value(&self) -> Value {
        self.value
    }

    /// Returns the predecessor block of this edge.
    #[must_use]
    pub const fn predecessor(&self) -> BlockId {
        self.predecessor
    }
}

impl fmt::Display for PhiOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.value, self.predecessor)
    }
}

/// The operation an instruction performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstKind {
    /// `lhs op rhs`, the only kind that forms an expression.
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Value,
        /// Right operand
        rhs: Value,
    },
    /// Integer comparison producing a boolean.
    Compare {
        /// Predicate
        predicate: CmpPredicate,
        /// Left operand
        lhs: Value,
        /// Right operand
        rhs: Value,
    },
    /// Plain assignment of `src`.
    Copy {
        /// Copied value
        src: Value,
    },
    /// Opaque call.
    Call {
        /// Name of the called function
        callee: String,
        /// Arguments in order
        args: Vec<Value>,
    },
    /// Join-point selection of one incoming value per predecessor edge.
    Phi {
        /// One operand per incoming edge
        incoming: Vec<PhiOperand>,
    },
    /// Unconditional jump.
    Jump {
        /// Jump target
        target: BlockId,
    },
    /// Two-way conditional branch.
    Branch {
        /// Branch condition
        cond: Value,
        /// Target when `cond` is non-zero
        then_block: BlockId,
        /// Target when `cond` is zero
        else_block: BlockId,
    },
    /// Function return.
    Return {
        /// Returned value, if any
        value: Option<Value>,
    },
}

impl InstKind {
    /// Returns `true` for kinds that end a basic block.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            InstKind::Jump { .. } | InstKind::Branch { .. } | InstKind::Return { .. }
        )
    }

    /// Returns `true` for kinds that produce a value.
    #[must_use]
    pub const fn produces_value(&self) -> bool {
        !self.is_terminator()
    }
}

/// A single instruction of a [`Function`](crate::ir::Function).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    id: InstId,
    block: BlockId,
    kind: InstKind,
    result: Option<Value>,
}

impl Instruction {
    pub(crate) fn new(id: InstId, block: BlockId, kind: InstKind, result: Option<Value>) -> Self {
        Self {
            id,
            block,
            kind,
            result,
        }
    }

    /// Returns the identity of this instruction.
    #[must_use]
    pub const fn id(&self) -> InstId {
        self.id
    }

    /// Returns the block containing this instruction.
    #[must_use]
    pub const fn block(&self) -> BlockId {
        self.block
    }

    /// Returns the operation of this instruction.
    #[must_use]
    pub const fn kind(&self) -> &InstKind {
        &self.kind
    }

    /// Returns the variable this instruction defines.
    ///
    /// This is the destination local when one was given, otherwise the instruction's own SSA
    /// result. Terminators define nothing.
    #[must_use]
    pub const fn result(&self) -> Option<Value> {
        self.result
    }

    /// Returns `true` if this is a terminator.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        self.kind.is_terminator()
    }

    /// Returns `true` if this is a phi node.
    #[must_use]
    pub const fn is_phi(&self) -> bool {
        matches!(self.kind, InstKind::Phi { .. })
    }

    /// Returns `true` if this is a binary operation.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self.kind, InstKind::Binary { .. })
    }

    /// Returns the operand list in source order.
    ///
    /// Phi nodes report their incoming values; the edge blocks are not operands.
    #[must_use]
    pub fn operands(&self) -> Vec<Value> {
        match &self.kind {
            InstKind::Binary { lhs, rhs, .. } | InstKind::Compare { lhs, rhs, .. } => {
                vec![*lhs, *rhs]
            }
            InstKind::Copy { src } => vec![*src],
            InstKind::Call { args, .. } => args.clone(),
            InstKind::Phi { incoming } => incoming.iter().map(PhiOperand::value).collect(),
            InstKind::Jump { .. } => Vec::new(),
            InstKind::Branch { cond, .. } => vec![*cond],
            InstKind::Return { value } => value.iter().copied().collect(),
        }
    }

    /// Returns the control-flow targets if this is a terminator, in branch order.
    #[must_use]
    pub fn targets(&self) -> Vec<BlockId> {
        match &self.kind {
            InstKind::Jump { target } => vec![*target],
            InstKind::Branch {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            _ => Vec::new(),
        }
    }

    /// Returns the phi operands, or an empty slice for non-phi instructions.
    #[must_use]
    pub fn phi_operands(&self) -> &[PhiOperand] {
        match &self.kind {
            InstKind::Phi { incoming } => incoming,
            _ => &[],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(result) = self.result {
            write!(f, "{result} = ")?;
        }
        match &self.kind {
            InstKind::Binary { op, lhs, rhs } => write!(f, "{op} {lhs}, {rhs}"),
            InstKind::Compare {
                predicate,
                lhs,
                rhs,
            } => write!(f, "cmp {predicate} {lhs}, {rhs}"),
            InstKind::Copy { src } => write!(f, "copy {src}"),
            InstKind::Call { callee, args } => {
                write!(f, "call {callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            InstKind::Phi { incoming } => {
                write!(f, "phi ")?;
                for (i, operand) in incoming.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
            InstKind::Jump { target } => write!(f, "jump {target}"),
            InstKind::Branch {
                cond,
                then_block,
                else_block,
            } => write!(f, "br {cond}, {then_block}, {else_block}"),
            InstKind::Return { value: Some(v) } => write!(f, "ret {v}"),
            InstKind::Return { value: None } => write!(f, "ret"),
        }
    }
}
