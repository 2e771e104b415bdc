// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context combining the model and the per-search state.
//!
//! The SearchContext is the data structure passed to every predicate. It
//! combines:
//! - The model (immutable, borrowed for the duration of the search)
//! - The domain store (mutable, trail-based backtracking)
//! - Statistics and the cancellation token
//!
//! Because the model is only borrowed, several contexts can search the same
//! model independently, and each search starts from the model's initial
//! domains.
//!
//! # Example
//!
//! ```
//! use tatami_search::context::SearchContext;
//! use tatami_search::model::{Constraint, ModelBuilder};
//!
//! let mut builder = ModelBuilder::new();
//! let x = builder.new_var(0..4).unwrap();
//! builder.post(Constraint::greater_equal(x, 2));
//! let model = builder.build();
//!
//! let mut ctx = SearchContext::new(&model);
//! let checkpoint = ctx.checkpoint();
//! ctx.propagate_all().unwrap();
//! assert_eq!(ctx.store.domain(x).min(), Some(2));
//!
//! ctx.rollback(checkpoint);
//! assert_eq!(ctx.store.domain(x).min(), Some(0));
//! ```

use crate::domain::{Checkpoint, DomainStore};
use crate::engine::CancelToken;
use crate::model::Model;
use crate::propagation::{self, PropagationFailure};
use crate::state::Statistics;

/// State for one search over one model.
#[derive(Debug)]
pub struct SearchContext<'m> {
    /// The model being solved (shared, never mutated)
    pub model: &'m Model,
    /// Working domains, restored on backtrack
    pub store: DomainStore,
    /// Counters that survive backtracking
    pub statistics: Statistics,
    /// Polled by the engine before every step
    pub cancel: CancelToken,
    /// Most recent solution not yet taken by the caller
    solution: Option<Vec<i32>>,
}

impl<'m> SearchContext<'m> {
    /// Create a context starting from the model's initial domains.
    pub fn new(model: &'m Model) -> Self {
        Self::with_cancel(model, CancelToken::new())
    }

    /// Create a context whose search stops when `cancel` says so.
    pub fn with_cancel(model: &'m Model, cancel: CancelToken) -> Self {
        Self {
            model,
            store: DomainStore::new(model.domains().to_vec(), model.constraints().len()),
            statistics: Statistics::new(),
            cancel,
            solution: None,
        }
    }

    /// Capture the current domains.
    pub fn checkpoint(&self) -> Checkpoint {
        self.store.checkpoint()
    }

    /// Restore the domains captured by `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.store.rollback(checkpoint);
    }

    /// Propagate every live constraint to a fixpoint.
    pub fn propagate_all(&mut self) -> Result<(), PropagationFailure> {
        propagation::propagate_all(self.model, &mut self.store, &mut self.statistics)
    }

    /// Propagate the consequences of the latest domain changes.
    pub fn propagate_changes(&mut self) -> Result<(), PropagationFailure> {
        propagation::propagate_changes(self.model, &mut self.store, &mut self.statistics)
    }

    /// Record a complete assignment for the caller to collect.
    pub fn record_solution(&mut self, values: Vec<i32>) {
        self.solution = Some(values);
    }

    /// Take the recorded solution, if any.
    pub fn take_solution(&mut self) -> Option<Vec<i32>> {
        self.solution.take()
    }
}
