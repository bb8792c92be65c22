//! Minimal host IR the analyses run on.
//!
//! The dataflow engine only needs an ordered sequence of blocks, each an ordered sequence of
//! instructions with operand lists, stable identities, and a successor relation. This module
//! provides exactly that and nothing more: there is no parser, printer format, or mutation API
//! beyond the validating [`FunctionBuilder`].
//!
//! # Key Components
//!
//! - [`Function`] / [`Block`] - Immutable CFG with derived predecessor lists
//! - [`Instruction`] / [`InstKind`] - Instructions and their operations
//! - [`Value`] - Operands: parameters, locals, SSA results, and constants
//! - [`FunctionBuilder`] - Validating construction
//! - [`Module`] - A set of functions driven together
//!
//! # SSA and Non-SSA Input
//!
//! Both styles are supported. An instruction created without a destination defines its own
//! SSA result ([`Value::Inst`]); one created with a destination local ([`Value::Local`]) defines
//! that local instead, which may be written many times.

mod builder;
mod function;
mod instruction;
mod module;
mod value;

pub use builder::FunctionBuilder;
pub use function::{Block, Function};
pub use instruction::{BinaryOp, CmpPredicate, InstKind, Instruction, PhiOperand};
pub use module::Module;
pub use value::{BlockId, InstId, Value};
