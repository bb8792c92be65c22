// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]

//! # flowscope
//!
//! A bit-vector data flow analysis framework over a small control-flow-graph IR.
//!
//! `flowscope` computes, for every instruction of a function, which facts of a finite domain
//! hold at that point. The engine is generic over the direction facts flow in and the meet
//! operator used at join points; concrete analyses only describe their domain and a
//! per-instruction transfer function.
//!
//! ## Features
//!
//! - **Generic engine** - Forward and backward analyses, intersect and union meets
//! - **Expression analyses** - Available, anticipated and will-be-available expressions
//! - **Liveness** - With per-edge handling of phi operands
//! - **Validated IR** - A minimal CFG with SSA and non-SSA (local slot) support
//! - **Pipeline** - Runs several analyses per function and whole modules in parallel
//!
//! ## Quick Start
//!
//! ```rust
//! use flowscope::prelude::*;
//!
//! // t1 = a + b; t2 = a + b; a = 0; t3 = a + b
//! let mut b = FunctionBuilder::new("example", 0);
//! let a = b.add_local();
//! let c = b.add_local();
//! let entry = b.create_block();
//! let t1 = b.binary(entry, BinaryOp::Add, a, c);
//! let t2 = b.binary(entry, BinaryOp::Add, a, c);
//! let reset = b.assign(entry, a, Value::Const(0));
//! let t3 = b.binary(entry, BinaryOp::Add, a, c);
//! b.ret(entry, Some(t3.into()));
//! let function = b.finish()?;
//!
//! let results = DataFlowSolver::new(AvailableExpressions).solve(&function)?;
//! let sum = Expression::new(BinaryOp::Add, a, c);
//! assert!(results.holds(t1, &sum));
//! assert!(results.holds(t2, &sum));
//! assert!(!results.holds(reset, &sum));
//! assert!(results.holds(t3, &sum));
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - Functions, blocks, instructions and the validating builder
//! - [`dataflow`] - Domains, bit vectors, meet operators, the solver and the analyses
//! - [`pipeline`] - Configuration and a driver running analyses over functions and modules
//!
//! ## Error Handling
//!
//! Recoverable failures are reported through [`Error`]: malformed IR, critical edges in the
//! way of an analysis that cannot handle them, and composing incompatible results. Broken
//! internal invariants, such as mixing bit vectors of different lengths, panic.
//!
//! ## Logging
//!
//! The library logs through the [`log`](https://docs.rs/log) facade and never installs a
//! logger. The solver reports each run at `debug` and each pass at `trace`; the pipeline
//! reports each analyzed function at `info`.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use flowscope::prelude::*;
///
/// let mut b = FunctionBuilder::new("id", 1);
/// let entry = b.create_block();
/// b.ret(entry, Some(Value::Param(0)));
/// let function = b.finish()?;
/// let live = DataFlowSolver::new(LiveVariables).solve(&function)?;
/// assert_eq!(live.domain().len(), 1);
/// # Ok::<(), flowscope::Error>(())
/// ```
pub mod prelude;

/// The host IR the analyses run on.
///
/// # Key Types
///
/// - [`ir::Function`] - An immutable control-flow graph
/// - [`ir::FunctionBuilder`] - Validating construction of functions
/// - [`ir::Instruction`] - A single instruction with its operands and defined variable
/// - [`ir::Module`] - A collection of functions
pub mod ir;

/// The data flow framework and the analyses built on it.
///
/// # Key Types
///
/// - [`dataflow::DataFlowAnalysis`] - Trait implemented by every analysis
/// - [`dataflow::DataFlowSolver`] - Fixed-point solver
/// - [`dataflow::AnalysisResults`] - Domain and per-instruction facts of one run
pub mod dataflow;

/// Running several analyses over functions and modules.
pub mod pipeline;

/// `flowscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
///
/// # Examples
///
/// ```rust
/// use flowscope::{ir::{Function, FunctionBuilder}, Result};
///
/// fn trivial() -> Result<Function> {
///     let mut b = FunctionBuilder::new("trivial", 0);
///     let entry = b.create_block();
///     b.ret(entry, None);
///     b.finish()
/// }
/// # trivial().unwrap();
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `flowscope` Error type
///
/// The main error type for all fallible operations in this crate.
///
/// # Examples
///
/// ```rust
/// use flowscope::{dataflow::{AnticipatedExpressions, DataFlowSolver}, ir::*, Error};
///
/// let mut b = FunctionBuilder::new("critical", 1);
/// let entry = b.create_block();
/// let side = b.create_block();
/// let join = b.create_block();
/// b.branch(entry, Value::Param(0), side, join);
/// b.jump(side, join);
/// b.ret(join, None);
/// let function = b.finish()?;
///
/// match DataFlowSolver::new(AnticipatedExpressions).solve(&function) {
///     Err(Error::CriticalEdge { from, to }) => println!("split {from} -> {to} first"),
///     Err(e) => println!("Error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// # Ok::<(), flowscope::Error>(())
/// ```
pub use error::Error;
