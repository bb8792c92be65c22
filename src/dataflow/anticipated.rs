//! Anticipated expressions analysis.
//!
//! An expression is *anticipated* (very busy) at a program point if every path from that
//! point to the exit evaluates it before any of its operands is redefined. This is the first
//! stage of lazy code motion.
//!
//! The analysis runs backward with the same kill and gen sets as
//! [`AvailableExpressions`](crate::dataflow::AvailableExpressions). Phi nodes define a
//! variable like any other instruction, so a phi kills every expression over its result.
//!
//! # Critical Edges
//!
//! Results are only meaningful on a CFG without critical edges. The analysis refuses to run
//! with [`Error::CriticalEdge`] if one is present.

use crate::{
    dataflow::{expression, DataFlowAnalysis, Direction, Domain, DomainValue, Expression, Intersect},
    ir::{Function, Instruction},
    Error, Result,
};

/// Backward must analysis of anticipated binary expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnticipatedExpressions;

/// Fails with the first critical edge of `function`, in program order.
pub(crate) fn require_no_critical_edges(function: &Function) -> Result<()> {
    match function.critical_edges().first() {
        Some(&(from, to)) => Err(Error::CriticalEdge { from, to }),
        None => Ok(()),
    }
}

impl DataFlowAnalysis for AnticipatedExpressions {
    type Element = Expression;
    type Meet = Intersect;
    const DIRECTION: Direction = Direction::Backward;
    const NAME: &'static str = "anticipated-expressions";

    fn check_preconditions(&self, function: &Function) -> Result<()> {
        require_no_critical_edges(function)
    }

    fn discover(&self, _function: &Function, inst: &Instruction, domain: &mut Domain<Expression>) {
        expression::discover(inst, domain);
    }

    fn transfer(
        &self,
        _function: &Function,
        inst: &Instruction,
        input: &DomainValue,
        domain: &Domain<Expression>,
    ) -> DomainValue {
        let mut output = input.clone();
        expression::kill(inst, domain, &mut output);
        expression::generate(inst, domain, &mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataflow::DataFlowSolver,
        ir::{BinaryOp, BlockId, FunctionBuilder, Value},
    };

    #[test]
    fn test_anticipated_on_all_paths() {
        // entry -> (left | right) -> join; `mul` is computed on both arms, `sub` on one
        let mut b = FunctionBuilder::new("busy", 2);
        let entry = b.create_block();
        let left = b.create_block();
        let right = b.create_block();
        let join = b.create_block();
        let br = b.branch(entry, Value::Param(0), left, right);
        b.binary(left, BinaryOp::Mul, Value::Param(0), Value::Param(1));
        b.binary(left, BinaryOp::Sub, Value::Param(0), Value::Param(1));
        b.jump(left, join);
        b.binary(right, BinaryOp::Mul, Value::Param(0), Value::Param(1));
        b.jump(right, join);
        b.ret(join, None);
        let f = b.finish().unwrap();

        let results = DataFlowSolver::new(AnticipatedExpressions).solve(&f).unwrap();
        let mul = Expression::new(BinaryOp::Mul, Value::Param(0), Value::Param(1));
        let sub = Expression::new(BinaryOp::Sub, Value::Param(0), Value::Param(1));
        assert!(results.holds(br, &mul));
        assert!(!results.holds(br, &sub));

        // nothing is anticipated at the exit
        assert!(results.boundary(join).is_some_and(DomainValue::none));
        // the branch defines nothing, so its fact is the meet over both arms
        assert_eq!(results.boundary(BlockId::new(0)), results.fact(br));
    }

    #[test]
    fn test_phi_kills_expressions_over_its_result() {
        let mut b = FunctionBuilder::new("phi", 1);
        let entry = b.create_block();
        let left = b.create_block();
        let right = b.create_block();
        let join = b.create_block();
        b.branch(entry, Value::Param(0), left, right);
        b.jump(left, join);
        b.jump(right, join);
        let phi = b.phi(join, vec![(Value::Const(1), left), (Value::Const(2), right)]);
        let add = b.binary(join, BinaryOp::Add, phi, Value::Param(0));
        b.ret(join, Some(add.into()));
        let f = b.finish().unwrap();

        let results = DataFlowSolver::new(AnticipatedExpressions).solve(&f).unwrap();
        let expr = Expression::new(BinaryOp::Add, Value::Inst(phi), Value::Param(0));
        // anticipated right before it is computed
        assert!(results.holds(add, &expr));
        // the phi redefines its operand, so it is not anticipated above the join
        assert!(!results.holds(phi, &expr));
        assert!(results.boundary(left).is_some_and(DomainValue::none));
    }

    #[test]
    fn test_refuses_critical_edges() {
        let mut b = FunctionBuilder::new("critical", 1);
        let entry = b.create_block();
        let side = b.create_block();
        let join = b.create_block();
        b.branch(entry, Value::Param(0), side, join);
        b.jump(side, join);
        b.ret(join, None);
        let f = b.finish().unwrap();

        let err = DataFlowSolver::new(AnticipatedExpressions)
            .solve(&f)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::CriticalEdge { from, to } if from == entry && to == join
        ));
    }

    #[test]
    fn test_transfer_is_monotone() {
        let mut b = FunctionBuilder::new("mono", 1);
        let a = b.add_local();
        let entry = b.create_block();
        b.binary(entry, BinaryOp::Shl, a, Value::Param(0));
        b.binary(entry, BinaryOp::And, Value::Param(0), Value::Const(3));
        b.binary_into(entry, a, BinaryOp::Or, a, Value::Const(1));
        b.ret(entry, Some(a));
        let f = b.finish().unwrap();

        let mut domain = Domain::new();
        for inst in f.instructions() {
            AnticipatedExpressions.discover(&f, inst, &mut domain);
        }
        domain.freeze();
        assert_eq!(domain.len(), 3);

        let values: Vec<_> = (0u8..8)
            .map(|bits| DomainValue::from_bools(&[bits & 1 != 0, bits & 2 != 0, bits & 4 != 0]))
            .collect();
        for inst in f.instructions() {
            for small in &values {
                for large in values.iter().filter(|v| small.is_subset(v)) {
                    let lo = AnticipatedExpressions.transfer(&f, inst, small, &domain);
                    let hi = AnticipatedExpressions.transfer(&f, inst, large, &domain);
                    assert!(lo.is_subset(&hi), "{inst}: {small} -> {lo}, {large} -> {hi}");
                }
            }
        }
    }
}
