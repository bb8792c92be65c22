//! Configuration for the analysis pipeline.
//!
//! This module provides the configuration type controlling which analyses run, whether
//! module functions are analyzed in parallel, and how critical edges are treated.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Selection of analyses to run
    pub struct AnalysisSet: u8 {
        /// Available expressions
        const AVAILABLE = 0x01;
        /// Anticipated expressions
        const ANTICIPATED = 0x02;
        /// Will-be-available expressions, which also computes anticipated expressions
        const WILL_BE_AVAILABLE = 0x04;
        /// Liveness
        const LIVENESS = 0x08;
    }
}

impl AnalysisSet {
    /// Returns `true` if anticipated expressions have to be computed, either because they
    /// were requested or because will-be-available expressions depend on them.
    #[must_use]
    pub fn needs_anticipated(self) -> bool {
        self.intersects(Self::ANTICIPATED | Self::WILL_BE_AVAILABLE)
    }
}

impl Default for AnalysisSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Analyses to run (default: all).
    pub analyses: AnalysisSet,

    /// Emit the per-analysis dump through `log` at debug level (default: false).
    pub dump_results: bool,

    /// Analyze the functions of a module in parallel (default: true).
    pub parallel: bool,

    /// Fail when a critical edge prevents anticipated or will-be-available expressions
    /// (default: true).
    ///
    /// When disabled those two analyses are skipped for the offending function and a
    /// warning is logged instead.
    pub require_no_critical_edges: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            analyses: AnalysisSet::all(),
            dump_results: false,
            parallel: true,
            require_no_critical_edges: true,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the analyses to run.
    #[must_use]
    pub fn with_analyses(mut self, analyses: AnalysisSet) -> Self {
        self.analyses = analyses;
        self
    }

    /// Enables or disables the debug dump of every result.
    #[must_use]
    pub fn with_dump_results(mut self, enabled: bool) -> Self {
        self.dump_results = enabled;
        self
    }

    /// Enables or disables parallel analysis of module functions.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets whether critical edges are an error or cause the affected analyses to be skipped.
    #[must_use]
    pub fn with_require_no_critical_edges(mut self, required: bool) -> Self {
        self.require_no_critical_edges = required;
        self
    }
}
