//! Available expressions analysis.
//!
//! An expression is *available* at a program point if it has been computed on every path
//! from the entry to that point and none of its operands has been redefined since.
//!
//! # Transfer
//!
//! `out = (in - kill) ∪ gen`, where an instruction kills every expression over the variable
//! it defines and generates the expression it computes. An instruction that computes an
//! expression over its own destination (`a = a + b`) kills it and does not regenerate it.

use crate::{
    dataflow::{expression, DataFlowAnalysis, Direction, Domain, DomainValue, Expression, Intersect},
    ir::{Function, Instruction},
};

/// Forward must analysis of available binary expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailableExpressions;

impl DataFlowAnalysis for AvailableExpressions {
    type Element = Expression;
    type Meet = Intersect;
    const DIRECTION: Direction = Direction::Forward;
    const NAME: &'static str = "available-expressions";

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

        let self_referencing = match (Expression::of(inst), inst.result()) {
            (Some(expr), Some(defined)) => expr.uses(defined),
            _ => false,
        };
        if !self_referencing {
            expression::generate(inst, domain, &mut output);
        }
        output
    }
}
