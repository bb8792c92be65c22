//! The analysis pipeline driver.

use std::fmt;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::{
    dataflow::{
        AnalysisResults, AnticipatedExpressions, AvailableExpressions, DataFlowSolver,
        Expression, LiveVariables, WillBeAvailableExpressions,
    },
    ir::{Function, Module, Value},
    pipeline::{AnalysisSet, PipelineConfig},
    Result,
};

/// Results of every analysis the pipeline ran over one function.
///
/// An analysis that was not requested, or was skipped because of a critical edge, is `None`.
#[derive(Debug, Clone)]
pub struct FunctionReport {
    function: Function,
    available: Option<AnalysisResults<Expression>>,
    anticipated: Option<AnalysisResults<Expression>>,
    will_be_available: Option<AnalysisResults<Expression>>,
    liveness: Option<AnalysisResults<Value>>,
}

impl FunctionReport {
    fn new(function: &Function) -> Self {
        Self {
            function: function.clone(),
            available: None,
            anticipated: None,
            will_be_available: None,
            liveness: None,
        }
    }

    /// Returns the name of the analyzed function.
    #[must_use]
    pub fn name(&self) -> &str {
        self.function.name()
    }

    /// Returns the analyzed function.
    #[must_use]
    pub const fn function(&self) -> &Function {
        &self.function
    }

    /// Returns the available expressions, if computed.
    #[must_use]
    pub const fn available(&self) -> Option<&AnalysisResults<Expression>> {
        self.available.as_ref()
    }

    /// Returns the anticipated expressions, if requested.
    #[must_use]
    pub const fn anticipated(&self) -> Option<&AnalysisResults<Expression>> {
        self.anticipated.as_ref()
    }

    /// Returns the will-be-available expressions, if computed.
    #[must_use]
    pub const fn will_be_available(&self) -> Option<&AnalysisResults<Expression>> {
        self.will_be_available.as_ref()
    }

    /// Returns the live variables, if computed.
    #[must_use]
    pub const fn liveness(&self) -> Option<&AnalysisResults<Value>> {
        self.liveness.as_ref()
    }

    /// Returns the number of analyses holding results.
    #[must_use]
    pub fn analysis_count(&self) -> usize {
        usize::from(self.available.is_some())
            + usize::from(self.anticipated.is_some())
            + usize::from(self.will_be_available.is_some())
            + usize::from(self.liveness.is_some())
    }
}

impl fmt::Display for FunctionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expressions = [&self.available, &self.anticipated, &self.will_be_available];
        for results in expressions.into_iter().flatten() {
            writeln!(f, "{}", results.display(&self.function))?;
        }
        if let Some(results) = &self.liveness {
            writeln!(f, "{}", results.display(&self.function))?;
        }
        Ok(())
    }
}

/// Runs the configured analyses over functions and modules.
///
/// Every function is analyzed independently with its own domains and fact tables.
/// Will-be-available expressions receive the anticipated expressions of the same function
/// as an explicit input.
///
/// # Example
///
/// ```rust
/// use flowscope::ir::{BinaryOp, FunctionBuilder, Value};
/// use flowscope::pipeline::{AnalysisPipeline, AnalysisSet, PipelineConfig};
///
/// let mut b = FunctionBuilder::new("f", 2);
/// let entry = b.create_block();
/// let sum = b.binary(entry, BinaryOp::Add, Value::Param(0), Value::Param(1));
/// b.ret(entry, Some(sum.into()));
/// let function = b.finish()?;
///
/// let config = PipelineConfig::new().with_analyses(AnalysisSet::LIVENESS);
/// let report = AnalysisPipeline::new(config).run(&function)?;
/// assert!(report.liveness().is_some());
/// assert!(report.available().is_none());
/// # Ok::<(), flowscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalysisPipeline {
    config: PipelineConfig,
}

impl AnalysisPipeline {
    /// Creates a pipeline with the given configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the configured analyses over one function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CriticalEdge`](crate::Error::CriticalEdge) if anticipated or
    /// will-be-available expressions are requested, the function has a critical edge, and
    /// [`PipelineConfig::require_no_critical_edges`] is set.
    pub fn run(&self, function: &Function) -> Result<FunctionReport> {
        let analyses = self.config.analyses;
        let mut report = FunctionReport::new(function);

        if analyses.contains(AnalysisSet::AVAILABLE) {
            report.available = Some(DataFlowSolver::new(AvailableExpressions).solve(function)?);
        }

        if analyses.needs_anticipated() {
            if function.has_critical_edges() && !self.config.require_no_critical_edges {
                warn!(
                    "skipping anticipated and will-be-available expressions for `{}`: {} critical edges",
                    function.name(),
                    function.critical_edges().len()
                );
            } else {
                let anticipated = DataFlowSolver::new(AnticipatedExpressions).solve(function)?;
                if analyses.contains(AnalysisSet::WILL_BE_AVAILABLE) {
                    report.will_be_available =
                        Some(WillBeAvailableExpressions::new(&anticipated).run(function)?);
                }
                if analyses.contains(AnalysisSet::ANTICIPATED) {
                    report.anticipated = Some(anticipated);
                }
            }
        }

        if analyses.contains(AnalysisSet::LIVENESS) {
            report.liveness = Some(DataFlowSolver::new(LiveVariables).solve(function)?);
        }

        info!(
            "analyzed `{}`: {} blocks, {} instructions, {} analyses",
            function.name(),
            function.block_count(),
            function.instruction_count(),
            report.analysis_count()
        );
        if self.config.dump_results {
            debug!("{report}");
        }

        Ok(report)
    }

    /// Runs the configured analyses over every function of `module`.
    ///
    /// Reports are returned in module order. Functions are analyzed in parallel when
    /// [`PipelineConfig::parallel`] is set.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; no reports are returned in that case.
    pub fn run_module(&self, module: &Module) -> Result<Vec<FunctionReport>> {
        if self.config.parallel {
            module
                .functions()
                .par_iter()
                .map(|function| self.run(function))
                .collect()
        } else {
            module
                .functions()
                .iter()
                .map(|function| self.run(function))
                .collect()
        }
    }
}
