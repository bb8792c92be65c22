//! Functions and basic blocks.
//!
//! A [`Function`] is immutable once built. It owns an instruction arena indexed by
//! [`InstId`], the blocks in program order, and the successor/predecessor relation derived
//! from the block terminators. Predecessor lists hold one entry per edge, so a branch whose
//! two targets coincide contributes that block twice.

use std::fmt;

use crate::ir::{BlockId, InstId, Instruction};

/// A basic block: a straight-line sequence of instructions ending in a terminator.
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    instructions: Vec<InstId>,
}

impl Block {
    pub(crate) fn new(id: BlockId) -> Self {
        Self {
            id,
            instructions: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, inst: InstId) {
        self.instructions.push(inst);
    }

    /// Returns the id of this block.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Returns the instructions of this block in program order.
    #[must_use]
    pub fn instructions(&self) -> &[InstId] {
        &self.instructions
    }

    /// Returns the first instruction of the block.
    #[must_use]
    pub fn first(&self) -> Option<InstId> {
        self.instructions.first().copied()
    }

    /// Returns the last instruction (the terminator) of the block.
    #[must_use]
    pub fn last(&self) -> Option<InstId> {
        self.instructions.last().copied()
    }

    /// Returns the number of instructions in this block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the block holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Prints the block label followed by its instruction ids, e.g. `bb1 [%2, %3]`.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.id)?;
        for (i, inst) in self.instructions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{inst}")?;
        }
        write!(f, "]")
    }
}

/// A function's control-flow graph.
///
/// Built and validated by [`FunctionBuilder`](crate::ir::FunctionBuilder); every block is
/// non-empty and ends in exactly one terminator.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    num_params: u32,
    num_locals: u32,
    blocks: Vec<Block>,
    instructions: Vec<Instruction>,
    successors: Vec<Vec<BlockId>>,
    predecessors: Vec<Vec<BlockId>>,
}

impl Function {
    pub(crate) fn from_parts(
        name: String,
        num_params: u32,
        num_locals: u32,
        blocks: Vec<Block>,
        instructions: Vec<Instruction>,
    ) -> Self {
        let successors: Vec<Vec<BlockId>> = blocks
            .iter()
            .map(|block| {
                block
                    .last()
                    .map(|term| instructions[term.index()].targets())
                    .unwrap_or_default()
            })
            .collect();

        let mut predecessors = vec![Vec::new(); blocks.len()];
        for (from, targets) in successors.iter().enumerate() {
            for to in targets {
                predecessors[to.index()].push(BlockId::new(from));
            }
        }

        Self {
            name,
            num_params,
            num_locals,
            blocks,
            instructions,
            successors,
            predecessors,
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of parameters.
    #[must_use]
    pub const fn num_params(&self) -> u32 {
        self.num_params
    }

    /// Returns the number of local slots.
    #[must_use]
    pub const fn num_locals(&self) -> u32 {
        self.num_locals
    }

    /// Returns the blocks in program order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns a block by id.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns an instruction by id.
    #[must_use]
    pub fn instruction(&self, id: InstId) -> Option<&Instruction> {
        self.instructions.get(id.index())
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Iterates over all instructions in program order (block by block).
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.blocks
            .iter()
            .flat_map(|block| block.instructions.iter())
            .map(|id| &self.instructions[id.index()])
    }

    /// Iterates over the instructions of one block in program order.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this function.
    pub fn block_instructions(
        &self,
        id: BlockId,
    ) -> impl DoubleEndedIterator<Item = &Instruction> + '_ {
        self.blocks[id.index()]
            .instructions
            .iter()
            .map(|inst| &self.instructions[inst.index()])
    }

    /// Returns the control-flow successors of a block, in terminator order.
    #[must_use]
    pub fn successors(&self, id: BlockId) -> &[BlockId] {
        &self.successors[id.index()]
    }

    /// Returns the control-flow predecessors of a block, one entry per incoming edge.
    #[must_use]
    pub fn predecessors(&self, id: BlockId) -> &[BlockId] {
        &self.predecessors[id.index()]
    }

    /// Returns the entry block.
    #[must_use]
    pub const fn entry(&self) -> BlockId {
        BlockId(0)
    }

    /// Returns the blocks without successors.
    #[must_use]
    pub fn exits(&self) -> Vec<BlockId> {
        self.blocks
            .iter()
            .map(Block::id)
            .filter(|id| self.successors(*id).is_empty())
            .collect()
    }

    /// Returns every critical edge as `(from, to)`, in program order of `from`.
    ///
    /// An edge is critical when its source has more than one successor edge and its target
    /// has more than one predecessor edge.
    #[must_use]
    pub fn critical_edges(&self) -> Vec<(BlockId, BlockId)> {
        let mut edges = Vec::new();
        for block in &self.blocks {
            let from = block.id();
            if self.successors(from).len() < 2 {
                continue;
            }
            for &to in self.successors(from) {
                if self.predecessors(to).len() > 1 {
                    edges.push((from, to));
                }
            }
        }
        edges
    }

    /// Returns `true` if the CFG contains at least one critical edge.
    #[must_use]
    pub fn has_critical_edges(&self) -> bool {
        !self.critical_edges().is_empty()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "function {}({} params, {} locals) {{",
            self.name, self.num_params, self.num_locals
        )?;
        for block in &self.blocks {
            writeln!(f, "{}:", block.id())?;
            for inst in self.block_instructions(block.id()) {
                writeln!(f, "    {inst}")?;
            }
        }
        write!(f, "}}")
    }
}
