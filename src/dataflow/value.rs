//! Bit-vector encoding of analysis facts.
//!
//! A [`DomainValue`] records, for every element of a frozen [`Domain`](crate::dataflow::Domain),
//! whether that element holds at one program point. Position `i` corresponds to domain
//! element `i`.
//!
//! # Length Invariant
//!
//! All values combined or compared within one analysis run have the same length. Every
//! binary operation here asserts this; a mismatch is a programming error and panics.
//!
//! # Example
//!
//! ```rust
//! use flowscope::dataflow::DomainValue;
//!
//! let mut value = DomainValue::new(70);
//! value.insert(3);
//! value.insert(68);
//!
//! assert!(value.contains(68));
//! assert_eq!(value.count(), 2);
//! assert_eq!(value.iter().collect::<Vec<_>>(), vec![3, 68]);
//! ```

use std::fmt;

/// A fixed-length sequence of booleans aligned with a domain.
///
/// Stored as 64-bit words; bits beyond `len` are always zero so that word-wise equality is
/// element-wise equality.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DomainValue {
    words: Vec<u64>,
    len: usize,
}

impl DomainValue {
    /// Creates a value of `len` positions with every position false.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Creates a value of `len` positions with every position true.
    #[must_use]
    pub fn full(len: usize) -> Self {
        let mut value = Self {
            words: vec![u64::MAX; len.div_ceil(64)],
            len,
        };
        value.mask_tail();
        value
    }

    /// Creates a value from an explicit sequence of booleans.
    #[must_use]
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut value = Self::new(bits.len());
        for (index, &bit) in bits.iter().enumerate() {
            if bit {
                value.insert(index);
            }
        }
        value
    }

    fn mask_tail(&mut self) {
        if !self.len.is_multiple_of(64) {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << (self.len % 64)) - 1;
            }
        }
    }

    /// Returns the number of positions, which equals the domain size.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the value has zero positions (an empty domain).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if no position is set.
    #[must_use]
    pub fn none(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns `true` if every position is set.
    #[must_use]
    pub fn all(&self) -> bool {
        self.count() == self.len
    }

    /// Sets position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) {
        assert!(index < self.len, "domain index {index} out of bounds ({})", self.len);
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// Clears position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove(&mut self, index: usize) {
        assert!(index < self.len, "domain index {index} out of bounds ({})", self.len);
        self.words[index / 64] &= !(1u64 << (index % 64));
    }

    /// Sets or clears position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn set(&mut self, index: usize, bit: bool) {
        if bit {
            self.insert(index);
        } else {
            self.remove(index);
        }
    }

    /// Returns whether position `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        assert!(index < self.len, "domain index {index} out of bounds ({})", self.len);
        (self.words[index / 64] & (1u64 << (index % 64))) != 0
    }

    /// Returns the number of set positions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Elementwise OR with `other`, in place. Returns `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn union_with(&mut self, other: &Self) -> bool {
        self.combine_with(other, |a, b| a | b)
    }

    /// Elementwise AND with `other`, in place. Returns `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        self.combine_with(other, |a, b| a & b)
    }

    /// Clears every position set in `other`, in place. Returns `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn difference_with(&mut self, other: &Self) -> bool {
        self.combine_with(other, |a, b| a & !b)
    }

    fn combine_with(&mut self, other: &Self, op: impl Fn(u64, u64) -> u64) -> bool {
        self.assert_same_len(other);
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            let old = *a;
            *a = op(*a, *b);
            changed |= old != *a;
        }
        changed
    }

    /// Returns `true` if every position set in `self` is also set in `other`.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.assert_same_len(other);
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    /// Exact element-wise comparison used by the solver to detect change.
    ///
    /// Unlike `!=`, this treats a length mismatch as the broken invariant it is.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[must_use]
    pub fn differs(&self, other: &Self) -> bool {
        self.assert_same_len(other);
        self.words != other.words
    }

    fn assert_same_len(&self, other: &Self) {
        assert_eq!(
            self.len, other.len,
            "domain values must have the same length"
        );
    }

    /// Returns an iterator over the indices of set positions, ascending.
    pub fn iter(&self) -> DomainValueIter<'_> {
        DomainValueIter {
            value: self,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Returns the value as one boolean per position.
    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.len).map(|i| self.contains(i)).collect()
    }
}

impl fmt::Debug for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainValue(")?;
        for i in 0..self.len {
            write!(f, "{}", u8::from(self.contains(i)))?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            write!(f, "{}", u8::from(self.contains(i)))?;
        }
        Ok(())
    }
}

/// Iterator over the set positions of a [`DomainValue`].
#[derive(Debug)]
pub struct DomainValueIter<'a> {
    value: &'a DomainValue,
    word_idx: usize,
    current: u64,
}

impl Iterator for DomainValueIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * 64 + bit);
            }
            self.word_idx += 1;
            self.current = *self.value.words.get(self.word_idx)?;
        }
    }
}
