//! Round-robin fixed-point solver.
//!
//! # Algorithm
//!
//! 1. Check the analysis' structural preconditions.
//! 2. Discover the domain over every instruction in program order, then freeze it.
//! 3. Initialize every instruction's fact to the meet identity. The boundary value is only
//!    used for blocks without neighbors and is kept apart from the identity.
//! 4. Repeat full passes until one changes nothing:
//!    a. Visit blocks in traversal order. A block's boundary value is the meet over the
//!       edge facts of its neighbors, or the analysis' boundary value if it has none.
//!    b. Visit the block's instructions in traversal order, applying the transfer function
//!       to the running value. A fact is only stored when it differs from the stored one.
//!
//! # Termination
//!
//! Facts live in a finite lattice. With monotone transfer functions every stored fact moves
//! in one direction only, so the number of passes is bounded by the lattice height.

use log::{debug, trace};

use crate::{
    dataflow::{
        AnalysisResults, DataFlowAnalysis, Domain, DomainValue, FactTable, MeetOperator,
    },
    ir::{Block, Function},
    Result,
};

/// Instruction-level fixed-point solver for a [`DataFlowAnalysis`].
///
/// A solver is consumed by [`solve`](Self::solve); every run owns its own domain and fact
/// table.
///
/// # Usage
///
/// ```rust
/// use flowscope::dataflow::{AvailableExpressions, DataFlowSolver};
/// use flowscope::ir::{BinaryOp, FunctionBuilder, Value};
///
/// let mut b = FunctionBuilder::new("f", 2);
/// let entry = b.create_block();
/// let sum = b.binary(entry, BinaryOp::Add, Value::Param(0), Value::Param(1));
/// b.ret(entry, Some(sum.into()));
/// let function = b.finish()?;
///
/// let results = DataFlowSolver::new(AvailableExpressions).solve(&function)?;
/// assert_eq!(results.domain().len(), 1);
/// assert!(results.fact(sum).is_some_and(|fact| fact.all()));
/// # Ok::<(), flowscope::Error>(())
/// ```
pub struct DataFlowSolver<A: DataFlowAnalysis> {
    /// The analysis being solved.
    analysis: A,
    /// The meet operator of the analysis.
    meet: A::Meet,
    /// Number of full passes performed.
    passes: usize,
}

impl<A: DataFlowAnalysis> DataFlowSolver<A> {
    /// Creates a new solver for the given analysis.
    #[must_use]
    pub fn new(analysis: A) -> Self {
        Self {
            analysis,
            meet: A::Meet::default(),
            passes: 0,
        }
    }

    /// Solves the analysis over `function` to a fixed point.
    ///
    /// # Errors
    ///
    /// Returns the error reported by
    /// [`DataFlowAnalysis::check_preconditions`] if the function is not eligible.
    ///
    /// # Panics
    ///
    /// Panics if the analysis produces a value whose length differs from the domain size.
    pub fn solve(mut self, function: &Function) -> Result<AnalysisResults<A::Element>> {
        self.analysis.check_preconditions(function)?;

        let domain = self.discover(function);
        let size = domain.len();
        let boundary = self.analysis.boundary(&domain);
        assert_eq!(
            boundary.len(),
            size,
            "boundary value of {} does not match the domain size",
            A::NAME
        );

        debug!(
            "{}: solving `{}` ({} direction, {} meet, {} blocks, {} domain elements)",
            A::NAME,
            function.name(),
            A::DIRECTION,
            <A::Meet as MeetOperator>::NAME,
            function.block_count(),
            size
        );

        let mut facts = FactTable::new(vec![
            self.meet.identity(size);
            function.instruction_count()
        ]);
        let mut boundaries = vec![boundary.clone(); function.block_count()];
        let order = A::DIRECTION.block_order(function);

        loop {
            self.passes += 1;
            let changed = self.run_pass(
                function,
                &order,
                &domain,
                &boundary,
                &mut facts,
                &mut boundaries,
            );
            trace!(
                "{}: pass {} over `{}` changed {} facts",
                A::NAME,
                self.passes,
                function.name(),
                changed
            );
            if changed == 0 {
                break;
            }
        }

        debug!(
            "{}: `{}` converged after {} passes",
            A::NAME,
            function.name(),
            self.passes
        );

        Ok(AnalysisResults::new(
            A::NAME,
            A::DIRECTION,
            domain,
            facts,
            boundaries,
            self.passes,
        ))
    }

    /// Returns the number of passes performed so far.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    fn discover(&self, function: &Function) -> Domain<A::Element> {
        let mut domain = Domain::new();
        for inst in function.instructions() {
            self.analysis.discover(function, inst, &mut domain);
        }
        domain.freeze();
        domain
    }

    /// Runs one full traversal and returns the number of stored facts that changed.
    fn run_pass(
        &self,
        function: &Function,
        order: &[&Block],
        domain: &Domain<A::Element>,
        boundary: &DomainValue,
        facts: &mut FactTable,
        boundaries: &mut [DomainValue],
    ) -> usize {
        let mut changed = 0;

        for block in order {
            let mut running = self.block_input(function, block, domain, boundary, facts);
            boundaries[block.id().index()] = running.clone();

            for inst in A::DIRECTION.instruction_order(function, block.id()) {
                let output = self.analysis.transfer(function, inst, &running, domain);
                if let Some(stored) = facts.get_mut(inst.id()) {
                    if output.differs(stored) {
                        *stored = output.clone();
                        changed += 1;
                    }
                }
                running = output;
            }
        }

        changed
    }

    /// Meets the edge facts of `block`'s neighbors, or returns the boundary value if it has
    /// none.
    fn block_input(
        &self,
        function: &Function,
        block: &Block,
        domain: &Domain<A::Element>,
        boundary: &DomainValue,
        facts: &FactTable,
    ) -> DomainValue {
        let neighbors = A::DIRECTION.meet_neighbors(function, block.id());
        if neighbors.is_empty() {
            return boundary.clone();
        }

        let values: Vec<DomainValue> = neighbors
            .iter()
            .filter_map(|&neighbor| {
                let fact = function
                    .block(neighbor)
                    .and_then(|b| A::DIRECTION.edge_instruction(b))
                    .and_then(|inst| facts.get(inst))?;
                Some(self.analysis.edge_value(
                    function,
                    block.id(),
                    neighbor,
                    fact.clone(),
                    facts,
                    domain,
                ))
            })
            .collect();
        self.meet.meet_all(domain.len(), &values)
    }
}
