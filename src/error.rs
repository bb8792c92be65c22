use thiserror::Error;

use crate::ir::BlockId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every recoverable failure this library reports.
///
/// Only conditions a caller can act on are represented here. Broken internal invariants,
/// such as combining two [`crate::dataflow::DomainValue`]s of different lengths or querying
/// a [`crate::dataflow::Domain`] before it has been frozen, abort with a panic instead.
///
/// # Error Categories
///
/// ## IR Construction
/// - [`Error::Malformed`] - The function handed to [`crate::ir::FunctionBuilder::finish`] is invalid
///
/// ## Analysis Preconditions
/// - [`Error::CriticalEdge`] - A backward expression analysis was asked to run on a CFG that
///   still contains critical edges
///
/// ## Result Composition
/// - [`Error::DomainMismatch`] - Two results were composed whose domains disagree
/// - [`Error::ResultMismatch`] - Two results were composed that belong to different functions
///
/// # Examples
///
/// ```rust
/// use flowscope::{Error, ir::FunctionBuilder};
///
/// let builder = FunctionBuilder::new("empty", 0);
/// match builder.finish() {
///     Ok(_) => unreachable!(),
///     Err(Error::Malformed { message, .. }) => println!("rejected: {message}"),
///     Err(e) => println!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The function is structurally invalid and could not be built.
    ///
    /// The error includes the source location where the problem was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The CFG contains a critical edge.
    ///
    /// Anticipated expressions (and everything composed from them) are only correct when
    /// every edge is the sole out-edge of its source or the sole in-edge of its target.
    /// The edge splitting pass has to run before these analyses are requested.
    #[error("Critical edge from {from} to {to}, split critical edges before running this analysis")]
    CriticalEdge {
        /// Source block of the offending edge
        from: BlockId,
        /// Target block of the offending edge
        to: BlockId,
    },

    /// Two analysis results were composed over domains that are not identical.
    ///
    /// Bit positions only mean the same thing when both domains list the same
    /// elements in the same order.
    #[error("Domain mismatch - expected {expected} elements in matching order, found {found}")]
    DomainMismatch {
        /// Number of elements in the domain being composed into
        expected: usize,
        /// Number of elements in the foreign domain
        found: usize,
    },

    /// An analysis result was composed with a function it was not computed for.
    #[error("Result belongs to a different function - expected {expected} instructions, found {found}")]
    ResultMismatch {
        /// Instruction count of the function being analyzed
        expected: usize,
        /// Instruction count recorded in the foreign result
        found: usize,
    },
}
