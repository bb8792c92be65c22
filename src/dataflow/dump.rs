//! Human-readable dump of analysis results.
//!
//! The dump lists the domain, then every block with its instructions, each followed by the
//! set of domain elements its fact contains. The block's boundary value is printed in front
//! of the instruction it flows into: the first instruction for forward analyses, the last
//! one for backward analyses.
//!
//! ```text
//! available-expressions over `f` (forward, 1 elements, 1 passes)
//! domain: {add %loc0, %loc1, }
//! bb0:
//!     boundary {}
//!     %0 = add %loc0, %loc1
//!         {add %loc0, %loc1, }
//!     ret %0
//!         {add %loc0, %loc1, }
//! ```

use std::{fmt, hash::Hash};

use crate::{dataflow::AnalysisResults, ir::Function};

/// [`Display`](fmt::Display) adapter returned by [`AnalysisResults::display`].
pub struct ResultsDisplay<'a, E> {
    results: &'a AnalysisResults<E>,
    function: &'a Function,
}

impl<E: Clone + Eq + Hash> AnalysisResults<E> {
    /// Returns an adapter that formats these results against the function they were
    /// computed for.
    #[must_use]
    pub fn display<'a>(&'a self, function: &'a Function) -> ResultsDisplay<'a, E> {
        ResultsDisplay {
            results: self,
            function,
        }
    }
}

impl<E: Clone + Eq + Hash + fmt::Display> fmt::Display for ResultsDisplay<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results = self.results;
        let domain = results.domain();

        writeln!(
            f,
            "{} over `{}` ({}, {} elements, {} passes)",
            results.name(),
            self.function.name(),
            results.direction(),
            domain.len(),
            results.passes()
        )?;
        write!(f, "domain: {{")?;
        for (_, element) in domain.iter() {
            write!(f, "{element}, ")?;
        }
        writeln!(f, "}}")?;

        for block in self.function.blocks() {
            writeln!(f, "{}:", block.id())?;
            let entry = results.direction().entry_instruction(block);
            for inst in self.function.block_instructions(block.id()) {
                if Some(inst.id()) == entry {
                    if let Some(boundary) = results.boundary(block.id()) {
                        writeln!(f, "    boundary {}", domain.format_mask(boundary))?;
                    }
                }
                writeln!(f, "    {inst}")?;
                if let Some(fact) = results.fact(inst.id()) {
                    writeln!(f, "        {}", domain.format_mask(fact))?;
                }
            }
        }
        Ok(())
    }
}
