//! # flowscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the flowscope library. Import this module to get quick access to the IR builder,
//! the solver and the bundled analyses.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all flowscope operations
pub use crate::Error;

/// The result type used throughout flowscope
pub use crate::Result;

// ================================================================================================
// Host IR
// ================================================================================================

/// Functions, blocks and their construction
pub use crate::ir::{Block, BlockId, Function, FunctionBuilder, Module};

/// Instructions and operands
pub use crate::ir::{BinaryOp, CmpPredicate, InstId, InstKind, Instruction, PhiOperand, Value};

// ================================================================================================
// Data Flow Framework
// ================================================================================================

/// Engine building blocks
pub use crate::dataflow::{
    AnalysisResults, DataFlowAnalysis, DataFlowSolver, Direction, Domain, DomainValue,
    FactTable, Intersect, MeetOperator, Union,
};

/// Bundled analyses
pub use crate::dataflow::{
    AnticipatedExpressions, AvailableExpressions, Expression, LiveVariables,
    WillBeAvailableExpressions,
};

// ================================================================================================
// Pipeline
// ================================================================================================

/// Driving analyses over functions and modules
pub use crate::pipeline::{AnalysisPipeline, AnalysisSet, FunctionReport, PipelineConfig};
