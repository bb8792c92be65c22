//! Driving several analyses over functions and modules.
//!
//! The [`AnalysisPipeline`] owns a [`PipelineConfig`] and runs the selected analyses over a
//! function, wiring the anticipated expressions into the will-be-available expressions
//! explicitly. Over a [`Module`](crate::ir::Module) it analyzes functions independently,
//! optionally in parallel, and returns one [`FunctionReport`] per function in module order.
//!
//! # Example
//!
//! ```rust
//! use flowscope::ir::{BinaryOp, FunctionBuilder, Module, Value};
//! use flowscope::pipeline::{AnalysisPipeline, PipelineConfig};
//!
//! let mut module = Module::new();
//! for name in ["f", "g"] {
//!     let mut b = FunctionBuilder::new(name, 2);
//!     let entry = b.create_block();
//!     let diff = b.binary(entry, BinaryOp::Sub, Value::Param(0), Value::Param(1));
//!     b.ret(entry, Some(diff.into()));
//!     module.add_function(b.finish()?);
//! }
//!
//! let reports = AnalysisPipeline::new(PipelineConfig::default()).run_module(&module)?;
//! for report in &reports {
//!     println!("{report}");
//! }
//! # Ok::<(), flowscope::Error>(())
//! ```

mod config;
mod engine;

pub use config::{AnalysisSet, PipelineConfig};
pub use engine::{AnalysisPipeline, FunctionReport};
