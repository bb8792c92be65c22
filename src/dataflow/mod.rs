//! Bit-vector data flow analysis framework.
//!
//! This module provides a generic engine for computing per-instruction facts that propagate
//! along control flow edges, and four analyses built on it.
//!
//! # Architecture
//!
//! The framework is built around a handful of small, orthogonal pieces:
//!
//! - **Domain**: The finite, ordered set of facts an analysis tracks ([`Domain`])
//! - **Value**: One bit per domain element at a program point ([`DomainValue`])
//! - **Meet**: How facts from several neighbors combine ([`Intersect`], [`Union`])
//! - **Direction**: Which way facts flow and in which order the CFG is visited ([`Direction`])
//! - **Analysis**: Domain discovery and the per-instruction transfer function
//!   ([`DataFlowAnalysis`])
//! - **Solver**: Round-robin iteration to a fixed point ([`DataFlowSolver`])
//!
//! Direction and meet operator are chosen independently by each analysis.
//!
//! # Analyses Provided
//!
//! - [`AvailableExpressions`]: Forward, intersect. Expressions computed on every path
//! - [`AnticipatedExpressions`]: Backward, intersect. Expressions evaluated on every path ahead
//! - [`WillBeAvailableExpressions`]: Forward, intersect, composed with anticipated expressions
//! - [`LiveVariables`]: Backward, union. Variables read before being redefined
//!
//! # Example
//!
//! ```rust
//! use flowscope::dataflow::{DataFlowSolver, LiveVariables};
//! use flowscope::ir::{BinaryOp, FunctionBuilder, Value};
//!
//! let mut b = FunctionBuilder::new("square", 1);
//! let entry = b.create_block();
//! let sq = b.binary(entry, BinaryOp::Mul, Value::Param(0), Value::Param(0));
//! b.ret(entry, Some(sq.into()));
//! let function = b.finish()?;
//!
//! let results = DataFlowSolver::new(LiveVariables).solve(&function)?;
//! assert!(results.holds(sq, &Value::Param(0)));
//! println!("{}", results.display(&function));
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are `Send` and `Sync`. A single run is strictly sequential;
//! independent runs over different functions may proceed in parallel.

mod anticipated;
mod available;
mod domain;
mod dump;
mod expression;
mod framework;
mod liveness;
mod meet;
mod solver;
mod traversal;
mod value;
mod will_be_available;

pub use anticipated::AnticipatedExpressions;
pub use available::AvailableExpressions;
pub use domain::Domain;
pub use dump::ResultsDisplay;
pub use expression::Expression;
pub use framework::{AnalysisResults, DataFlowAnalysis, FactTable};
pub use liveness::LiveVariables;
pub use meet::{Intersect, MeetOperator, Union};
pub use solver::DataFlowSolver;
pub use traversal::Direction;
pub use value::{DomainValue, DomainValueIter};
pub use will_be_available::WillBeAvailableExpressions;
