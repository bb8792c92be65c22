//! Data flow analysis framework trait and result types.
//!
//! A concrete analysis implements [`DataFlowAnalysis`] to say which elements make up its
//! domain and how a single instruction transforms the facts flowing through it. The
//! [`DataFlowSolver`](crate::dataflow::DataFlowSolver) drives the traversal and returns an
//! [`AnalysisResults`] holding the frozen domain and one fact per instruction.

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    ops::Index,
};

use crate::{
    dataflow::{Direction, Domain, DomainValue, MeetOperator},
    ir::{BlockId, Function, InstId, Instruction},
    Result,
};

/// An instruction-level bit-vector data flow analysis.
///
/// Implementations supply the domain discovery and the transfer function; the solver handles
/// traversal order, meets at block boundaries and iteration to a fixed point. The direction
/// and meet operator are independent of each other and are chosen per analysis.
///
/// # Monotonicity
///
/// The solver only terminates if [`transfer`](Self::transfer) is monotone with respect to the
/// meet operator's order: feeding it a value with more facts (under [`Union`]) or fewer facts
/// (under [`Intersect`]) must never produce an output that moves the other way. This is not
/// checked at runtime.
///
/// [`Union`]: crate::dataflow::Union
/// [`Intersect`]: crate::dataflow::Intersect
///
/// # Example
///
/// ```rust
/// use flowscope::dataflow::{DataFlowAnalysis, Direction, Domain, DomainValue, Union};
/// use flowscope::ir::{Function, Instruction};
///
/// /// Which call targets may have been reached so far.
/// struct CalledFunctions;
///
/// impl DataFlowAnalysis for CalledFunctions {
///     type Element = String;
///     type Meet = Union;
///     const DIRECTION: Direction = Direction::Forward;
///     const NAME: &'static str = "called-functions";
///
///     fn discover(&self, _: &Function, inst: &Instruction, domain: &mut Domain<String>) {
///         if let flowscope::ir::InstKind::Call { callee, .. } = inst.kind() {
///             domain.insert(callee.clone());
///         }
///     }
///
///     fn transfer(
///         &self,
///         _: &Function,
///         inst: &Instruction,
///         input: &DomainValue,
///         domain: &Domain<String>,
///     ) -> DomainValue {
///         let mut output = input.clone();
///         if let flowscope::ir::InstKind::Call { callee, .. } = inst.kind() {
///             if let Some(index) = domain.index_of(callee) {
///                 output.insert(index);
///             }
///         }
///         output
///     }
/// }
/// ```
pub trait DataFlowAnalysis {
    /// The facts tracked by this analysis.
    type Element: Clone + Eq + Hash + Debug + Display + Send + Sync;

    /// How facts from several neighbors are combined.
    type Meet: MeetOperator;

    /// The direction facts flow in.
    const DIRECTION: Direction;

    /// Short name used in logs and dumps.
    const NAME: &'static str;

    /// Checks structural requirements on the CFG before anything is computed.
    ///
    /// An analysis that cannot produce correct results for `function` returns an error here
    /// and the solver refuses to run. The default accepts every function.
    ///
    /// # Errors
    ///
    /// Returns an error describing the violated requirement.
    fn check_preconditions(&self, _function: &Function) -> Result<()> {
        Ok(())
    }

    /// Adds the elements contributed by `inst` to `domain`.
    ///
    /// Called once per instruction, in program order, before the domain is frozen.
    fn discover(&self, function: &Function, inst: &Instruction, domain: &mut Domain<Self::Element>);

    /// Returns the value assumed at a block without neighbors in the traversal direction.
    ///
    /// Defaults to all-false ("nothing known"). This is never replaced by the meet identity.
    fn boundary(&self, domain: &Domain<Self::Element>) -> DomainValue {
        DomainValue::new(domain.len())
    }

    /// Computes the fact after `inst` (in traversal direction) from the fact before it.
    ///
    /// The returned value must have the same length as `input`.
    fn transfer(
        &self,
        function: &Function,
        inst: &Instruction,
        input: &DomainValue,
        domain: &Domain<Self::Element>,
    ) -> DomainValue;

    /// Adjusts the value flowing from `neighbor` into `block` before it is met.
    ///
    /// `neighbor` is a predecessor of `block` for forward analyses and a successor for
    /// backward ones. `value` is the fact of `neighbor`'s edge instruction; `facts` gives
    /// access to the rest of the current table. The default passes `value` through unchanged.
    fn edge_value(
        &self,
        _function: &Function,
        _block: BlockId,
        _neighbor: BlockId,
        value: DomainValue,
        _facts: &FactTable,
        _domain: &Domain<Self::Element>,
    ) -> DomainValue {
        value
    }
}

/// One fact per instruction, indexed by [`InstId`].
///
/// The fact stored for an instruction is its post-state in traversal direction: the state
/// after it for forward analyses and the state before it for backward ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactTable {
    facts: Vec<DomainValue>,
}

impl FactTable {
    pub(crate) fn new(facts: Vec<DomainValue>) -> Self {
        Self { facts }
    }

    /// Returns the fact stored for `inst`.
    #[must_use]
    pub fn get(&self, inst: InstId) -> Option<&DomainValue> {
        self.facts.get(inst.index())
    }

    pub(crate) fn get_mut(&mut self, inst: InstId) -> Option<&mut DomainValue> {
        self.facts.get_mut(inst.index())
    }

    /// Returns the number of entries, which equals the function's instruction count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterates over `(instruction, fact)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (InstId, &DomainValue)> + '_ {
        self.facts
            .iter()
            .enumerate()
            .map(|(index, fact)| (InstId::new(index), fact))
    }
}

impl Index<InstId> for FactTable {
    type Output = DomainValue;

    fn index(&self, inst: InstId) -> &Self::Output {
        &self.facts[inst.index()]
    }
}

/// The outcome of one analysis run over one function.
///
/// Owns the frozen domain, the fact table and the per-block boundary values of the final
/// pass. Nothing is shared with other runs.
#[derive(Debug, Clone)]
pub struct AnalysisResults<E> {
    name: &'static str,
    direction: Direction,
    domain: Domain<E>,
    facts: FactTable,
    boundaries: Vec<DomainValue>,
    passes: usize,
}

impl<E: Clone + Eq + Hash> AnalysisResults<E> {
    pub(crate) fn new(
        name: &'static str,
        direction: Direction,
        domain: Domain<E>,
        facts: FactTable,
        boundaries: Vec<DomainValue>,
        passes: usize,
    ) -> Self {
        Self {
            name,
            direction,
            domain,
            facts,
            boundaries,
            passes,
        }
    }

    /// Returns the name of the analysis that produced these results.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the direction the analysis ran in.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the frozen domain; position `i` of every fact refers to element `i`.
    #[must_use]
    pub const fn domain(&self) -> &Domain<E> {
        &self.domain
    }

    /// Returns the fact table.
    #[must_use]
    pub const fn facts(&self) -> &FactTable {
        &self.facts
    }

    pub(crate) fn facts_mut(&mut self) -> &mut FactTable {
        &mut self.facts
    }

    pub(crate) fn boundaries_mut(&mut self) -> &mut [DomainValue] {
        &mut self.boundaries
    }

    /// Returns the fact stored for `inst`.
    #[must_use]
    pub fn fact(&self, inst: InstId) -> Option<&DomainValue> {
        self.facts.get(inst)
    }

    /// Returns the boundary value `block` received in the final pass.
    #[must_use]
    pub fn boundary(&self, block: BlockId) -> Option<&DomainValue> {
        self.boundaries.get(block.index())
    }

    /// Returns the number of full traversals made, including the final one that changed
    /// nothing.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Returns the fact flowing into `inst` in traversal direction.
    ///
    /// That is the fact of the previous instruction in traversal order, or the block's
    /// boundary value for the first one.
    #[must_use]
    pub fn fact_before(&self, function: &Function, inst: InstId) -> Option<&DomainValue> {
        let block = function.instruction(inst)?.block();
        let mut previous = None;
        for candidate in self.direction.instruction_order(function, block) {
            if candidate.id() == inst {
                return match previous {
                    Some(id) => self.fact(id),
                    None => self.boundary(block),
                };
            }
            previous = Some(candidate.id());
        }
        None
    }

    /// Returns `true` if `element` is in the domain and holds in the fact of `inst`.
    #[must_use]
    pub fn holds(&self, inst: InstId, element: &E) -> bool {
        match (self.domain.index_of(element), self.fact(inst)) {
            (Some(index), Some(fact)) => fact.contains(index),
            _ => false,
        }
    }

    /// Returns the domain elements contained in the fact of `inst`, in domain order.
    #[must_use]
    pub fn elements_at(&self, inst: InstId) -> Vec<&E> {
        self.fact(inst)
            .map(|fact| {
                fact.iter()
                    .filter_map(|index| self.domain.get(index))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Value;

    fn results() -> (Function, AnalysisResults<&'static str>) {
        let mut b = crate::ir::FunctionBuilder::new("f", 0);
        let local = b.add_local();
        let entry = b.create_block();
        b.assign(entry, local, Value::Const(1));
        b.ret(entry, Some(local));
        let function = b.finish().unwrap();

        let mut domain = Domain::new();
        domain.insert("x");
        domain.insert("y");
        domain.freeze();
        let facts = FactTable::new(vec![
            DomainValue::from_bools(&[true, false]),
            DomainValue::from_bools(&[true, true]),
        ]);
        let boundaries = vec![DomainValue::new(2)];
        let results = AnalysisResults::new(
            "test",
            Direction::Forward,
            domain,
            facts,
            boundaries,
            2,
        );
        (function, results)
    }

    #[test]
    fn test_queries() {
        let (function, results) = results();
        let first = InstId::new(0);
        let second = InstId::new(1);

        assert!(results.holds(first, &"x"));
        assert!(!results.holds(first, &"y"));
        assert!(!results.holds(first, &"z"));
        assert_eq!(results.elements_at(second), vec![&"x", &"y"]);
        assert!(results.elements_at(InstId::new(9)).is_empty());

        assert_eq!(results.fact_before(&function, first), results.boundary(function.entry()));
        assert_eq!(results.fact_before(&function, second), results.fact(first));
        assert_eq!(results.passes(), 2);
        assert_eq!(results.direction(), Direction::Forward);
    }

    #[test]
    fn test_fact_table_index() {
        let (_, results) = results();
        assert_eq!(results.facts().len(), 2);
        assert_eq!(results.facts()[InstId::new(1)].count(), 2);
        assert_eq!(results.facts().iter().count(), 2);
    }
}
