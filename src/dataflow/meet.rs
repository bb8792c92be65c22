//! Meet operators.
//!
//! A meet operator combines the facts arriving along several control-flow paths into one.
//! It is stateless, commutative and associative, and has an identity element (the lattice
//! "top") that also serves as the optimistic starting value of every instruction.
//!
//! - [`Intersect`] is used by *must* analyses: a fact holds at a join only if it holds on
//!   every incoming path. Identity is all-true.
//! - [`Union`] is used by *may* analyses: a fact holds if it holds on any incoming path.
//!   Identity is all-false.
//!
//! Meeting an empty operand list is deliberately not defined here. A block without
//! neighbors in the traversal direction receives the analysis' boundary value instead,
//! see [`DataFlowAnalysis::boundary`](crate::dataflow::DataFlowAnalysis::boundary).

use std::fmt::Debug;

use crate::dataflow::DomainValue;

/// A binary combination of domain values with a neutral element.
///
/// Implementations must satisfy, for equally sized values:
///
/// - **Commutative**: `combine(a, b) == combine(b, a)`
/// - **Associative**: `combine(a, combine(b, c)) == combine(combine(a, b), c)`
/// - **Identity**: `combine(x, identity(len)) == x`
pub trait MeetOperator: Debug + Default {
    /// Short name used in logs and dumps.
    const NAME: &'static str;

    /// Combines two values of equal length.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[must_use]
    fn combine(&self, lhs: &DomainValue, rhs: &DomainValue) -> DomainValue;

    /// Returns the neutral element for a domain of `len` elements.
    #[must_use]
    fn identity(&self, len: usize) -> DomainValue;

    /// Meets every operand, starting from the identity.
    ///
    /// Callers handle the empty case themselves; for an empty list this returns the identity.
    #[must_use]
    fn meet_all<'a, I>(&self, len: usize, operands: I) -> DomainValue
    where
        I: IntoIterator<Item = &'a DomainValue>,
    {
        operands
            .into_iter()
            .fold(self.identity(len), |acc, operand| self.combine(&acc, operand))
    }
}

/// Elementwise AND; identity is all-true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intersect;

impl MeetOperator for Intersect {
    const NAME: &'static str = "intersect";

    fn combine(&self, lhs: &DomainValue, rhs: &DomainValue) -> DomainValue {
        let mut result = lhs.clone();
        result.intersect_with(rhs);
        result
    }

    fn identity(&self, len: usize) -> DomainValue {
        DomainValue::full(len)
    }
}

/// Elementwise OR; identity is all-false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Union;

impl MeetOperator for Union {
    const NAME: &'static str = "union";

    fn combine(&self, lhs: &DomainValue, rhs: &DomainValue) -> DomainValue {
        let mut result = lhs.clone();
        result.union_with(rhs);
        result
    }

    fn identity(&self, len: usize) -> DomainValue {
        DomainValue::new(len)
    }
}
