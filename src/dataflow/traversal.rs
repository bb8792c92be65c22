//! CFG traversal order for forward and backward analyses.
//!
//! The solver never looks at the control-flow relation directly. It asks the analysis'
//! [`Direction`] for the order to visit blocks in, the order to visit instructions within a
//! block, which neighbors to meet over, and which instruction of a neighbor holds the value
//! flowing across the edge.

use strum::Display;

use crate::ir::{Block, BlockId, Function, InstId, Instruction};

/// Direction of data flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Facts flow from entry to exit.
    ///
    /// Blocks are visited in program order and instructions front-to-back. A block meets
    /// over its control-flow predecessors.
    ///
    /// Examples: available expressions, will-be-available expressions.
    Forward,

    /// Facts flow from exit to entry.
    ///
    /// Blocks are visited in reverse program order and instructions back-to-front. A block
    /// meets over its control-flow successors.
    ///
    /// Examples: liveness, anticipated expressions.
    Backward,
}

impl Direction {
    /// Returns the blocks of `function` in visiting order.
    #[must_use]
    pub fn block_order(self, function: &Function) -> Vec<&Block> {
        match self {
            Direction::Forward => function.blocks().iter().collect(),
            Direction::Backward => function.blocks().iter().rev().collect(),
        }
    }

    /// Returns the instructions of `block` in visiting order.
    pub fn instruction_order<'f>(
        self,
        function: &'f Function,
        block: BlockId,
    ) -> Box<dyn Iterator<Item = &'f Instruction> + 'f> {
        match self {
            Direction::Forward => Box::new(function.block_instructions(block)),
            Direction::Backward => Box::new(function.block_instructions(block).rev()),
        }
    }

    /// Returns the neighbors a block meets over: predecessors going forward, successors
    /// going backward. Contains one entry per edge.
    #[must_use]
    pub fn meet_neighbors(self, function: &Function, block: BlockId) -> &[BlockId] {
        match self {
            Direction::Forward => function.predecessors(block),
            Direction::Backward => function.successors(block),
        }
    }

    /// Returns the instruction of `neighbor` whose fact flows into the adjacent block.
    ///
    /// Going forward that is the predecessor's terminator, going backward the successor's
    /// first instruction.
    #[must_use]
    pub fn edge_instruction(self, neighbor: &Block) -> Option<InstId> {
        match self {
            Direction::Forward => neighbor.last(),
            Direction::Backward => neighbor.first(),
        }
    }

    /// Returns the instruction a block's boundary value precedes in traversal order.
    #[must_use]
    pub fn entry_instruction(self, block: &Block) -> Option<InstId> {
        match self {
            Direction::Forward => block.first(),
            Direction::Backward => block.last(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FunctionBuilder, Value};

    fn diamond() -> Function {
        let mut b = FunctionBuilder::new("diamond", 1);
        let entry = b.create_block();
        let left = b.create_block();
        let right = b.create_block();
        let join = b.create_block();
        b.branch(entry, Value::Param(0), left, right);
        b.jump(left, join);
        b.jump(right, join);
        b.ret(join, None);
        b.finish().unwrap()
    }

    #[test]
    fn test_block_order() {
        let f = diamond();
        let forward: Vec<_> = Direction::Forward
            .block_order(&f)
            .iter()
            .map(|b| b.id().index())
            .collect();
        let backward: Vec<_> = Direction::Backward
            .block_order(&f)
            .iter()
            .map(|b| b.id().index())
            .collect();
        assert_eq!(forward, vec![0, 1, 2, 3]);
        assert_eq!(backward, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_meet_neighbors() {
        let f = diamond();
        let join = BlockId::new(3);
        assert_eq!(Direction::Forward.meet_neighbors(&f, join).len(), 2);
        assert!(Direction::Backward.meet_neighbors(&f, join).is_empty());
        assert!(Direction::Forward.meet_neighbors(&f, f.entry()).is_empty());
    }

    #[test]
    fn test_instruction_order() {
        let mut b = FunctionBuilder::new("straight", 2);
        let entry = b.create_block();
        let add = b.binary(entry, crate::ir::BinaryOp::Add, Value::Param(0), Value::Param(1));
        let ret = b.ret(entry, Some(add.into()));
        let f = b.finish().unwrap();

        let forward: Vec<_> = Direction::Forward
            .instruction_order(&f, entry)
            .map(Instruction::id)
            .collect();
        let backward: Vec<_> = Direction::Backward
            .instruction_order(&f, entry)
            .map(Instruction::id)
            .collect();
        assert_eq!(forward, vec![add, ret]);
        assert_eq!(backward, vec![ret, add]);

        let block = f.block(entry).unwrap();
        assert_eq!(Direction::Forward.edge_instruction(block), Some(ret));
        assert_eq!(Direction::Backward.edge_instruction(block), Some(add));
        assert_eq!(Direction::Forward.entry_instruction(block), Some(add));
        assert_eq!(Direction::Backward.entry_instruction(block), Some(ret));
    }

    #[test]
    fn test_display() {
        assert_eq!(Direction::Forward.to_string(), "forward");
        assert_eq!(Direction::Backward.to_string(), "backward");
    }
}
