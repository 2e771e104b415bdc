// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Finite integer domains and the variables that own them.
//!
//! A [`Domain`] is a compact bitset over the values `0..=63`, where bit `v`
//! is set when `v` is still a candidate. Every tatami variable (coordinates
//! and extents) fits in that range, and a single `u64` word is exactly what
//! the trail stores, so narrowing a domain costs one trail entry.
//!
//! # Examples
//!
//! ```
//! use tatami_search::domain::Domain;
//!
//! let mut domain = Domain::range(0, 4);
//! assert_eq!(domain.len(), 4);
//!
//! domain = domain.retain_range(1, 2);
//! assert_eq!(domain.iter().collect::<Vec<_>>(), vec![1, 2]);
//! assert_eq!(format!("{}", domain), "{1,2}");
//! ```

pub mod store;

pub use store::{Checkpoint, DomainExhausted, DomainStore};

use std::fmt;
use thiserror::Error;

/// Stable identity of a variable: its declaration index in the model.
///
/// Search branches on variables in increasing `VarId` order and solutions
/// list values in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// The declaration index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Why an initial candidate set was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The candidate set has no values.
    #[error("variable domain is empty")]
    Empty,

    /// A candidate lies outside the representable range.
    #[error("domain value {value} is outside 0..={max}", max = Domain::MAX_VALUE)]
    OutOfRange { value: i64 },
}

/// A set of candidate values represented as a bitset.
///
/// Bit `v` (counting from LSB) is set if value `v` is in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Domain(u64);

impl Domain {
    /// Largest value a domain can hold.
    pub const MAX_VALUE: i32 = 63;

    /// The empty domain.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The two-valued domain `{0, 1}` used for reified truth values.
    pub const fn boolean() -> Self {
        Self(0b11)
    }

    /// Create a domain from a raw bit value (as stored on the trail).
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Create a domain holding exactly one value.
    ///
    /// Values outside `0..=MAX_VALUE` give the empty domain.
    pub fn singleton(value: i32) -> Self {
        Self::empty().with(value)
    }

    /// Create a domain from an explicit candidate list.
    pub fn from_values<I>(values: I) -> Result<Self, DomainError>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let mut bits = 0u64;
        for value in values {
            let value = value.into();
            if !(0..=i64::from(Self::MAX_VALUE)).contains(&value) {
                return Err(DomainError::OutOfRange { value });
            }
            bits |= 1 << value;
        }
        if bits == 0 {
            return Err(DomainError::Empty);
        }
        Ok(Self(bits))
    }

    /// Create the half-open range `[start, end)`, clamped to the
    /// representable values.
    pub fn range(start: i32, end: i32) -> Self {
        if end <= start {
            return Self::empty();
        }
        Self(u64::MAX).retain_range(i64::from(start), i64::from(end) - 1)
    }

    /// Get the underlying bitset value.
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Check if the domain contains a specific value.
    pub fn contains(self, value: i32) -> bool {
        (0..=Self::MAX_VALUE).contains(&value) && (self.0 >> value) & 1 != 0
    }

    /// Number of candidates left.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if no candidate is left.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if exactly one candidate is left.
    pub fn is_singleton(self) -> bool {
        self.0 != 0 && self.0 & (self.0 - 1) == 0
    }

    /// Smallest candidate.
    pub fn min(self) -> Option<i32> {
        (self.0 != 0).then(|| self.0.trailing_zeros() as i32)
    }

    /// Largest candidate.
    pub fn max(self) -> Option<i32> {
        (self.0 != 0).then(|| 63 - self.0.leading_zeros() as i32)
    }

    /// The value of a singleton domain.
    pub fn value(self) -> Option<i32> {
        if self.is_singleton() {
            self.min()
        } else {
            None
        }
    }

    /// This domain with `value` added.
    pub fn with(self, value: i32) -> Self {
        if (0..=Self::MAX_VALUE).contains(&value) {
            Self(self.0 | 1 << value)
        } else {
            self
        }
    }

    /// This domain with `value` removed.
    pub fn without(self, value: i32) -> Self {
        if (0..=Self::MAX_VALUE).contains(&value) {
            Self(self.0 & !(1 << value))
        } else {
            self
        }
    }

    /// Keep only the candidates in the closed range `[lo, hi]`.
    pub fn retain_range(self, lo: i64, hi: i64) -> Self {
        let max = i64::from(Self::MAX_VALUE);
        if hi < 0 || lo > max || lo > hi {
            return Self::empty();
        }
        let lo = lo.max(0) as u32;
        let hi = hi.min(max) as u32;
        let upper = if hi == 63 { u64::MAX } else { (1u64 << (hi + 1)) - 1 };
        let lower = !((1u64 << lo) - 1);
        Self(self.0 & upper & lower)
    }

    /// Keep only the candidates accepted by `keep`.
    pub fn retain(self, mut keep: impl FnMut(i32) -> bool) -> Self {
        let mut bits = self.0;
        for value in self.iter() {
            if !keep(value) {
                bits &= !(1 << value);
            }
        }
        Self(bits)
    }

    /// Iterate over all candidates in ascending order.
    pub fn iter(self) -> DomainIter {
        DomainIter { bits: self.0 }
    }
}

/// Iterator over the values of a [`Domain`], smallest first.
#[derive(Debug, Clone)]
pub struct DomainIter {
    bits: u64,
}

impl Iterator for DomainIter {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let value = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(value as i32)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for DomainIter {}

impl IntoIterator for Domain {
    type Item = i32;
    type IntoIter = DomainIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Domain {
    /// Format a domain as "{0,1,2}".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "}}")
    }
}
