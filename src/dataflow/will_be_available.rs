//! Will-be-available expressions analysis.
//!
//! The second stage of lazy code motion. An expression *will be available* at a point if it
//! is anticipated there, or if it was anticipated earlier on every incoming path and none of
//! its operands has been redefined since.
//!
//! The forward pass only kills; anticipation is folded in afterwards by OR-ing the
//! anticipated fact of each instruction into the solved one:
//!
//! ```text
//! will_be_available[i] = solved[i] ∨ anticipated[i]
//! ```
//!
//! The composition is position-wise, so both results must share the same domain in the same
//! order. Discovery walks program order for every expression analysis, which guarantees this
//! when both ran over the same function.

use crate::{
    dataflow::{
        anticipated::require_no_critical_edges, expression, AnalysisResults, DataFlowAnalysis,
        DataFlowSolver, Direction, Domain, DomainValue, Expression, Intersect,
    },
    ir::{Function, Instruction},
    Error, Result,
};

/// Forward must analysis of will-be-available expressions.
///
/// Takes the anticipated expressions of the same function as an explicit input.
///
/// # Example
///
/// ```rust
/// use flowscope::dataflow::{AnticipatedExpressions, DataFlowSolver, WillBeAvailableExpressions};
/// use flowscope::ir::{BinaryOp, FunctionBuilder, Value};
///
/// let mut b = FunctionBuilder::new("f", 2);
/// let entry = b.create_block();
/// let sum = b.binary(entry, BinaryOp::Add, Value::Param(0), Value::Param(1));
/// b.ret(entry, Some(sum.into()));
/// let function = b.finish()?;
///
/// let anticipated = DataFlowSolver::new(AnticipatedExpressions).solve(&function)?;
/// let results = WillBeAvailableExpressions::new(&anticipated).run(&function)?;
/// assert!(results.fact(sum).is_some_and(|fact| fact.all()));
/// # Ok::<(), flowscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WillBeAvailableExpressions<'a> {
    anticipated: &'a AnalysisResults<Expression>,
}

impl<'a> WillBeAvailableExpressions<'a> {
    /// Creates the analysis over the anticipated expressions of the function to analyze.
    #[must_use]
    pub const fn new(anticipated: &'a AnalysisResults<Expression>) -> Self {
        Self { anticipated }
    }

    /// Solves the forward pass over `function` and folds in the anticipated expressions.
    ///
    /// # Errors
    ///
    /// - [`Error::CriticalEdge`] if `function` has a critical edge
    /// - [`Error::ResultMismatch`] if the anticipated results belong to another function
    /// - [`Error::DomainMismatch`] if the two domains do not list the same expressions in the
    ///   same order
    pub fn run(self, function: &Function) -> Result<AnalysisResults<Expression>> {
        let anticipated = self.anticipated;
        let mut results = DataFlowSolver::new(self).solve(function)?;
        compose(function, &mut results, anticipated)?;
        Ok(results)
    }
}

/// ORs the anticipated fact of every instruction into `results`.
///
/// A block's boundary is the point before its first instruction, where the anticipated fact
/// of that instruction holds, so it is folded in as well.
fn compose(
    function: &Function,
    results: &mut AnalysisResults<Expression>,
    anticipated: &AnalysisResults<Expression>,
) -> Result<()> {
    if !results.domain().is_congruent(anticipated.domain()) {
        return Err(Error::DomainMismatch {
            expected: results.domain().len(),
            found: anticipated.domain().len(),
        });
    }

    for (inst, anticipated_fact) in anticipated.facts().iter() {
        if let Some(fact) = results.facts_mut().get_mut(inst) {
            fact.union_with(anticipated_fact);
        }
    }

    let boundaries = results.boundaries_mut();
    for block in function.blocks() {
        let entry = block.first().and_then(|first| anticipated.fact(first));
        if let (Some(boundary), Some(entry)) = (boundaries.get_mut(block.id().index()), entry) {
            boundary.union_with(entry);
        }
    }
    Ok(())
}

impl DataFlowAnalysis for WillBeAvailableExpressions<'_> {
    type Element = Expression;
    type Meet = Intersect;
    const DIRECTION: Direction = Direction::Forward;
    const NAME: &'static str = "will-be-available-expressions";

    fn check_preconditions(&self, function: &Function) -> Result<()> {
        require_no_critical_edges(function)?;
        let found = self.anticipated.facts().len();
        if found != function.instruction_count() {
            return Err(Error::ResultMismatch {
                expected: function.instruction_count(),
                found,
            });
        }
        Ok(())
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
        output
    }
}
