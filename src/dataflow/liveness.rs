//! Liveness analysis.
//!
//! A variable is *live* at a program point if some path from that point reads it before it
//! is redefined. The domain holds every variable (parameter, local, or instruction result)
//! used as an operand somewhere in the function.
//!
//! # Transfer
//!
//! `in = (out - def) ∪ use`. The defined variable is killed before the operands are added,
//! so `x = x + 1` keeps `x` live above the instruction.
//!
//! # Phi Nodes
//!
//! A phi reads each of its operands only along the matching incoming edge. The phi's
//! transfer marks every operand live, so the value flowing back across an edge is rebuilt
//! instead: the fact below the block's phi prefix, minus the phi results, plus the phi
//! operands selected on that edge. Values read again further down the block stay live on
//! every edge.

use crate::{
    dataflow::{DataFlowAnalysis, Direction, Domain, DomainValue, FactTable, Union},
    ir::{BlockId, Function, Instruction, Value},
};

/// Backward may analysis of live variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveVariables;

impl DataFlowAnalysis for LiveVariables {
    type Element = Value;
    type Meet = Union;
    const DIRECTION: Direction = Direction::Backward;
    const NAME: &'static str = "liveness";

    fn discover(&self, _function: &Function, inst: &Instruction, domain: &mut Domain<Value>) {
        for operand in inst.operands() {
            if operand.is_variable() {
                domain.insert(operand);
            }
        }
    }

    fn transfer(
        &self,
        _function: &Function,
        inst: &Instruction,
        input: &DomainValue,
        domain: &Domain<Value>,
    ) -> DomainValue {
        let mut output = input.clone();

        if let Some(index) = inst.result().and_then(|def| domain.index_of(&def)) {
            output.remove(index);
        }
        for operand in inst.operands() {
            if let Some(index) = domain.index_of(&operand) {
                output.insert(index);
            }
        }
        output
    }

    fn edge_value(
        &self,
        function: &Function,
        block: BlockId,
        neighbor: BlockId,
        value: DomainValue,
        facts: &FactTable,
        domain: &Domain<Value>,
    ) -> DomainValue {
        let phis: Vec<&Instruction> = function
            .block_instructions(neighbor)
            .take_while(|inst| inst.is_phi())
            .collect();
        if phis.is_empty() {
            return value;
        }

        // live below the phi prefix
        let Some(mut live) = function
            .block(neighbor)
            .and_then(|b| b.instructions().get(phis.len()))
            .and_then(|&first| facts.get(first))
            .cloned()
        else {
            return value;
        };

        for phi in &phis {
            if let Some(index) = phi.result().and_then(|def| domain.index_of(&def)) {
                live.remove(index);
            }
        }
        for operand in phis
            .iter()
            .flat_map(|phi| phi.phi_operands())
            .filter(|operand| operand.predecessor() == block)
        {
            if let Some(index) = domain.index_of(&operand.value()) {
                live.insert(index);
            }
        }
        live
    }
}
