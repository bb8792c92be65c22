//! Validating construction of [`Function`]s.
//!
//! Instructions may be appended to any block in any order; everything is checked once in
//! [`FunctionBuilder::finish`], which either yields a well-formed [`Function`] or an
//! [`Error::Malformed`](crate::Error::Malformed) describing the first problem found.
//!
//! # Example
//!
//! ```rust
//! use flowscope::ir::{BinaryOp, FunctionBuilder, Value};
//!
//! let mut b = FunctionBuilder::new("sum", 2);
//! let entry = b.create_block();
//! let sum = b.binary(entry, BinaryOp::Add, Value::Param(0), Value::Param(1));
//! b.ret(entry, Some(sum.into()));
//! let function = b.finish()?;
//! assert_eq!(function.instruction_count(), 2);
//! # Ok::<(), flowscope::Error>(())
//! ```

use crate::{
    ir::{
        BinaryOp, Block, BlockId, CmpPredicate, Function, InstId, InstKind, Instruction,
        PhiOperand, Value,
    },
    Result,
};

/// Incrementally assembles a [`Function`].
#[derive(Debug)]
pub struct FunctionBuilder {
    name: String,
    num_params: u32,
    num_locals: u32,
    block_count: usize,
    pending: Vec<(BlockId, InstKind, Option<Value>)>,
}

impl FunctionBuilder {
    /// Creates a builder for a function with `num_params` parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, num_params: u32) -> Self {
        Self {
            name: name.into(),
            num_params,
            num_locals: 0,
            block_count: 0,
            pending: Vec::new(),
        }
    }

    /// Allocates a fresh local slot and returns it as a value.
    pub fn add_local(&mut self) -> Value {
        let local = Value::Local(self.num_locals);
        self.num_locals += 1;
        local
    }

    /// Appends a new, empty block. The first block created is the entry block.
    pub fn create_block(&mut self) -> BlockId {
        let id = BlockId::new(self.block_count);
        self.block_count += 1;
        id
    }

    /// Appends `lhs op rhs` to `block`, defining the instruction's own SSA result.
    pub fn binary(
        &mut self,
        block: BlockId,
        op: BinaryOp,
        lhs: impl Into<Value>,
        rhs: impl Into<Value>,
    ) -> InstId {
        let kind = InstKind::Binary {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        };
        self.push(block, kind, None)
    }

    /// Appends `dest = lhs op rhs` to `block`, where `dest` is a local slot.
    pub fn binary_into(
        &mut self,
        block: BlockId,
        dest: Value,
        op: BinaryOp,
        lhs: impl Into<Value>,
        rhs: impl Into<Value>,
    ) -> InstId {
        let kind = InstKind::Binary {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        };
        self.push(block, kind, Some(dest))
    }

    /// Appends an integer comparison to `block`.
    pub fn compare(
        &mut self,
        block: BlockId,
        predicate: CmpPredicate,
        lhs: impl Into<Value>,
        rhs: impl Into<Value>,
    ) -> InstId {
        let kind = InstKind::Compare {
            predicate,
            lhs: lhs.into(),
            rhs: rhs.into(),
        };
        self.push(block, kind, None)
    }

    /// Appends the assignment `dest = src` to `block`, where `dest` is a local slot.
    pub fn assign(&mut self, block: BlockId, dest: Value, src: impl Into<Value>) -> InstId {
        self.push(block, InstKind::Copy { src: src.into() }, Some(dest))
    }

    /// Appends an opaque call to `block`.
    pub fn call(&mut self, block: BlockId, callee: impl Into<String>, args: Vec<Value>) -> InstId {
        let kind = InstKind::Call {
            callee: callee.into(),
            args,
        };
        self.push(block, kind, None)
    }

    /// Appends a phi node selecting one value per incoming edge.
    ///
    /// Phi nodes must precede every other instruction of their block.
    pub fn phi(&mut self, block: BlockId, incoming: Vec<(Value, BlockId)>) -> InstId {
        let incoming = incoming
            .into_iter()
            .map(|(value, pred)| PhiOperand::new(value, pred))
            .collect();
        self.push(block, InstKind::Phi { incoming }, None)
    }

    /// Terminates `block` with an unconditional jump.
    pub fn jump(&mut self, block: BlockId, target: BlockId) -> InstId {
        self.push(block, InstKind::Jump { target }, None)
    }

    /// Terminates `block` with a conditional branch.
    pub fn branch(
        &mut self,
        block: BlockId,
        cond: impl Into<Value>,
        then_block: BlockId,
        else_block: BlockId,
    ) -> InstId {
        let kind = InstKind::Branch {
            cond: cond.into(),
            then_block,
            else_block,
        };
        self.push(block, kind, None)
    }

    /// Terminates `block` with a return.
    pub fn ret(&mut self, block: BlockId, value: Option<Value>) -> InstId {
        self.push(block, InstKind::Return { value }, None)
    }

    fn push(&mut self, block: BlockId, kind: InstKind, dest: Option<Value>) -> InstId {
        let id = InstId::new(self.pending.len());
        self.pending.push((block, kind, dest));
        id
    }

    /// Validates the collected instructions and produces the [`Function`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) if the function has no blocks, a
    /// block is empty or not properly terminated, a phi follows a non-phi instruction, a
    /// destination is not a declared local, an operand or target does not exist, or a phi
    /// names a block that is not a predecessor.
    pub fn finish(self) -> Result<Function> {
        if self.block_count == 0 {
            return Err(malformed_error!("function '{}' has no blocks", self.name));
        }

        let mut blocks: Vec<Block> = (0..self.block_count)
            .map(|i| Block::new(BlockId::new(i)))
            .collect();
        let mut instructions = Vec::with_capacity(self.pending.len());

        for (index, (block, kind, dest)) in self.pending.into_iter().enumerate() {
            let id = InstId::new(index);
            let Some(target) = blocks.get_mut(block.index()) else {
                return Err(malformed_error!("{} placed in unknown block {}", id, block));
            };
            target.push(id);

            let result = match dest {
                Some(Value::Local(n)) if n < self.num_locals => {
                    if kind.is_terminator() {
                        return Err(malformed_error!("terminator {} cannot define a value", id));
                    }
                    Some(Value::Local(n))
                }
                Some(other) => {
                    return Err(malformed_error!(
                        "{} writes to {}, which is not a declared local",
                        id,
                        other
                    ));
                }
                None if kind.produces_value() => Some(Value::Inst(id)),
                None => None,
            };
            instructions.push(Instruction::new(id, block, kind, result));
        }

        for block in &blocks {
            Self::check_block(block, &instructions)?;
        }

        for inst in &instructions {
            for target in inst.targets() {
                if target.index() >= blocks.len() {
                    return Err(malformed_error!("{} jumps to unknown block {}", inst.id(), target));
                }
            }
            for operand in inst.operands() {
                let valid = match operand {
                    Value::Param(n) => n < self.num_params,
                    Value::Local(n) => n < self.num_locals,
                    Value::Inst(def) => instructions
                        .get(def.index())
                        .is_some_and(|d| d.result() == Some(Value::Inst(def))),
                    Value::Const(_) => true,
                };
                if !valid {
                    return Err(malformed_error!(
                        "{} uses {}, which is not defined",
                        inst.id(),
                        operand
                    ));
                }
            }
        }

        let function = Function::from_parts(
            self.name,
            self.num_params,
            self.num_locals,
            blocks,
            instructions,
        );

        for inst in function.instructions() {
            for operand in inst.phi_operands() {
                if !function.predecessors(inst.block()).contains(&operand.predecessor()) {
                    return Err(malformed_error!(
                        "phi {} names {}, which is not a predecessor of {}",
                        inst.id(),
                        operand.predecessor(),
                        inst.block()
                    ));
                }
            }
        }

        Ok(function)
    }

    fn check_block(block: &Block, instructions: &[Instruction]) -> Result<()> {
        let Some(last) = block.last() else {
            return Err(malformed_error!("block {} is empty", block.id()));
        };
        if !instructions[last.index()].is_terminator() {
            return Err(malformed_error!("block {} does not end in a terminator", block.id()));
        }

        let mut seen_non_phi = false;
        for (position, id) in block.instructions().iter().enumerate() {
            let inst = &instructions[id.index()];
            if inst.is_terminator() && position + 1 != block.len() {
                return Err(malformed_error!(
                    "terminator {} is not the last instruction of {}",
                    id,
                    block.id()
                ));
            }
            if inst.is_phi() {
                if seen_non_phi {
                    return Err(malformed_error!(
                        "phi {} follows a non-phi instruction in {}",
                        id,
                        block.id()
                    ));
                }
            } else {
                seen_non_phi = true;
            }
        }
        Ok(())
    }
}
