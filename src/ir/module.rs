//! A collection of functions analyzed together.

use crate::ir::Function;

/// An ordered set of functions.
///
/// The module is the unit the [`AnalysisPipeline`](crate::pipeline::AnalysisPipeline) fans out
/// over. Functions never share analysis state, so they can be processed independently.
#[derive(Debug, Clone, Default)]
pub struct Module {
    functions: Vec<Function>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a function.
    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    /// Returns the functions in insertion order.
    #[must_use]
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Returns the number of functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if the module holds no functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<Function> for Module {
    fn from_iter<T: IntoIterator<Item = Function>>(iter: T) -> Self {
        Self {
            functions: iter.into_iter().collect(),
        }
    }
}
