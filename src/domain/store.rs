// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Working domains for one search, tracked on the trail.
//!
//! The store owns a private copy of every variable's domain, so the model it
//! was created from is never mutated. Alongside the domains it keeps one flag
//! per constraint recording that the constraint is entailed by the current
//! domains; the flag is trailed too, so it is cleared again on backtrack.
//!
//! Trail cell ids `0..num_vars` name domains, ids from `num_vars` on name
//! entailment flags.

use super::{Domain, VarId};
use crate::trail::{Trail, TrailRestore};
use std::fmt;
use thiserror::Error;

/// A variable lost its last candidate.
///
/// Raised by every narrowing operation of [`DomainStore`]. Propagation turns
/// it into a local failure; it never reaches the caller of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("domain of {var} is exhausted")]
pub struct DomainExhausted {
    pub var: VarId,
}

/// A position in the store's history that [`DomainStore::rollback`] returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Trail position of the checkpoint.
    pub fn position(self) -> usize {
        self.0
    }
}

/// The trailed cells: domains followed by entailment flags.
#[derive(Debug, Clone)]
struct Cells {
    domains: Vec<Domain>,
    entailed: Vec<bool>,
}

impl TrailRestore for Cells {
    fn restore(&mut self, id: usize, old_value: u64) {
        let num_vars = self.domains.len();
        if id < num_vars {
            self.domains[id] = Domain::from_bits(old_value);
        } else {
            self.entailed[id - num_vars] = old_value != 0;
        }
    }
}

/// Mutable domains of one search.
#[derive(Debug)]
pub struct DomainStore {
    cells: Cells,
    trail: Trail,
    /// Variables narrowed since the last `take_changed`, in order, deduplicated.
    changed: Vec<VarId>,
    is_changed: Vec<bool>,
}

impl DomainStore {
    /// Create a store from initial domains and a constraint count.
    pub fn new(domains: Vec<Domain>, num_constraints: usize) -> Self {
        let num_vars = domains.len();
        Self {
            cells: Cells {
                domains,
                entailed: vec![false; num_constraints],
            },
            trail: Trail::new(),
            changed: Vec::new(),
            is_changed: vec![false; num_vars],
        }
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.cells.domains.len()
    }

    /// Current domain of `var`.
    pub fn domain(&self, var: VarId) -> Domain {
        self.cells.domains[var.0]
    }

    /// All current domains in declaration order.
    pub fn domains(&self) -> &[Domain] {
        &self.cells.domains
    }

    /// `(min, max)` of the current domain of `var`.
    ///
    /// Domains are never empty between propagation steps; an empty domain
    /// reports `(0, -1)`, an empty interval.
    pub fn bounds(&self, var: VarId) -> (i64, i64) {
        let domain = self.domain(var);
        match (domain.min(), domain.max()) {
            (Some(lo), Some(hi)) => (i64::from(lo), i64::from(hi)),
            _ => (0, -1),
        }
    }

    /// Check if `var` is fixed to a single value.
    pub fn is_fixed(&self, var: VarId) -> bool {
        self.domain(var).is_singleton()
    }

    /// Check if every variable is fixed.
    pub fn all_fixed(&self) -> bool {
        self.cells.domains.iter().all(|d| d.is_singleton())
    }

    /// First variable, in declaration order, with more than one candidate.
    pub fn first_unfixed(&self) -> Option<VarId> {
        self.cells
            .domains
            .iter()
            .position(|d| !d.is_singleton())
            .map(VarId)
    }

    /// The full assignment, if every variable is fixed.
    pub fn assignment(&self) -> Option<Vec<i32>> {
        self.cells.domains.iter().map(|d| d.value()).collect()
    }

    /// Replace the domain of `var` with `new`, which must be a subset of the
    /// current domain.
    ///
    /// Returns whether the domain changed.
    fn narrow(&mut self, var: VarId, new: Domain) -> Result<bool, DomainExhausted> {
        let old = self.cells.domains[var.0];
        if new == old {
            return Ok(false);
        }
        if new.is_empty() {
            return Err(DomainExhausted { var });
        }
        self.trail.record_change(var.0, old.bits());
        self.cells.domains[var.0] = new;
        if !self.is_changed[var.0] {
            self.is_changed[var.0] = true;
            self.changed.push(var);
        }
        Ok(true)
    }

    /// Remove every candidate of `var` rejected by `keep`.
    pub fn restrict(
        &mut self,
        var: VarId,
        keep: impl FnMut(i32) -> bool,
    ) -> Result<bool, DomainExhausted> {
        let new = self.domain(var).retain(keep);
        self.narrow(var, new)
    }

    /// Keep only the candidates of `var` in `[lo, hi]`.
    pub fn restrict_range(
        &mut self,
        var: VarId,
        lo: i64,
        hi: i64,
    ) -> Result<bool, DomainExhausted> {
        let new = self.domain(var).retain_range(lo, hi);
        self.narrow(var, new)
    }

    /// Remove a single candidate.
    pub fn remove_value(&mut self, var: VarId, value: i32) -> Result<bool, DomainExhausted> {
        let new = self.domain(var).without(value);
        self.narrow(var, new)
    }

    /// Force `var` to `value`.
    pub fn assign(&mut self, var: VarId, value: i32) -> Result<bool, DomainExhausted> {
        let new = self.domain(var).retain_range(i64::from(value), i64::from(value));
        self.narrow(var, new)
    }

    /// Check if constraint `index` is flagged as entailed.
    pub fn is_entailed(&self, index: usize) -> bool {
        self.cells.entailed[index]
    }

    /// Flag constraint `index` as entailed until the next rollback past here.
    pub fn set_entailed(&mut self, index: usize) {
        if !self.cells.entailed[index] {
            self.trail.record_change(self.num_vars() + index, 0);
            self.cells.entailed[index] = true;
        }
    }

    /// Drain the variables narrowed since the previous call.
    pub fn take_changed(&mut self) -> Vec<VarId> {
        for var in &self.changed {
            self.is_changed[var.0] = false;
        }
        std::mem::take(&mut self.changed)
    }

    /// Capture the current state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.trail.checkpoint())
    }

    /// Restore the state captured by `checkpoint` exactly.
    ///
    /// Pending change notifications are dropped: they describe state that no
    /// longer exists.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.trail.rewind_to(checkpoint.0, &mut self.cells);
        self.take_changed();
    }

    /// Number of trail entries recorded so far.
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

impl fmt::Display for DomainStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, domain) in self.cells.domains.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "v{}={}", i, domain)?;
        }
        Ok(())
    }
}
