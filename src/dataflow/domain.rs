//! The ordered, finite set of facts an analysis tracks.
//!
//! A [`Domain`] is populated once per analyzed function during discovery and then frozen.
//! Every element keeps the index it was assigned on insertion for the rest of the run, so a
//! [`DomainValue`](crate::dataflow::DomainValue) position always names the same element.
//!
//! Discovery order is deterministic: the solver always walks instructions in program order,
//! and insertion deduplicates through a hash index without disturbing order. Discovering
//! twice over the same function therefore yields identical domains, which is what makes
//! composing two analyses position-wise meaningful.

use std::{collections::HashMap, fmt, hash::Hash};

/// An insertion-ordered set of analysis facts with stable indices.
#[derive(Debug, Clone)]
pub struct Domain<E> {
    elements: Vec<E>,
    index: HashMap<E, usize>,
    frozen: bool,
}

impl<E> Default for Domain<E> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            index: HashMap::new(),
            frozen: false,
        }
    }
}

impl<E: Clone + Eq + Hash> Domain<E> {
    /// Creates an empty, unfrozen domain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `element` if it is not yet present and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the domain is already frozen.
    pub fn insert(&mut self, element: E) -> usize {
        assert!(!self.frozen, "cannot add elements to a frozen domain");
        if let Some(&index) = self.index.get(&element) {
            return index;
        }
        let index = self.elements.len();
        self.index.insert(element.clone(), index);
        self.elements.push(element);
        index
    }

    /// Ends discovery. No element can be added afterwards.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns `true` once discovery has completed.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the index of `element`, or `None` if it is not part of the domain.
    ///
    /// # Panics
    ///
    /// Panics if called before the domain is frozen: positions are only meaningful once
    /// discovery has completed.
    #[must_use]
    pub fn index_of(&self, element: &E) -> Option<usize> {
        assert!(self.frozen, "domain queried before discovery completed");
        self.index.get(element).copied()
    }

    /// Returns the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }

    /// Returns the elements in index order.
    #[must_use]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Iterates over `(index, element)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &E)> + '_ {
        self.elements.iter().enumerate()
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the domain has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns `true` if `other` lists exactly the same elements in the same order.
    #[must_use]
    pub fn is_congruent(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<E: fmt::Display> Domain<E> {
    /// Formats the elements selected by `mask` as `{a, b, }`.
    ///
    /// # Panics
    ///
    /// Panics if `mask` is not as long as the domain.
    #[must_use]
    pub fn format_mask(&self, mask: &crate::dataflow::DomainValue) -> String {
        assert_eq!(
            mask.len(),
            self.elements.len(),
            "the size of the mask must equal the size of the domain"
        );
        let mut out = String::from("{");
        for index in mask.iter() {
            out.push_str(&self.elements[index].to_string());
            out.push_str(", ");
        }
        out.push('}');
        out
    }
}
