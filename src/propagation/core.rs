// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Core propagation orchestration functions.
//!
//! This module contains the main entry points for constraint propagation:
//! - `propagate_all` - Run every live constraint to a fixpoint (search root)
//! - `propagate_changes` - Wake only constraints watching narrowed variables

use std::collections::VecDeque;

use crate::domain::DomainStore;
use crate::model::{Model, Propagation};
use crate::state::{Counters, Statistics};

use super::errors::PropagationFailure;

/// FIFO of constraint indices, each queued at most once.
#[derive(Debug)]
struct PropagationQueue {
    pending: VecDeque<usize>,
    queued: Vec<bool>,
}

impl PropagationQueue {
    fn new(num_constraints: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            queued: vec![false; num_constraints],
        }
    }

    fn push(&mut self, index: usize) {
        if !self.queued[index] {
            self.queued[index] = true;
            self.pending.push_back(index);
        }
    }

    fn pop(&mut self) -> Option<usize> {
        let index = self.pending.pop_front()?;
        self.queued[index] = false;
        Some(index)
    }

    /// Queue every non-entailed constraint watching a variable narrowed
    /// since the last wake.
    fn wake(&mut self, model: &Model, store: &mut DomainStore) {
        for var in store.take_changed() {
            for &index in model.watchers(var) {
                if !store.is_entailed(index) {
                    self.push(index);
                }
            }
        }
    }
}

/// Propagate every constraint not yet known to be entailed.
pub fn propagate_all(
    model: &Model,
    store: &mut DomainStore,
    statistics: &mut Statistics,
) -> Result<(), PropagationFailure> {
    let mut queue = PropagationQueue::new(model.constraints().len());
    // Everything is queued anyway
    store.take_changed();
    for index in 0..model.constraints().len() {
        if !store.is_entailed(index) {
            queue.push(index);
        }
    }
    run_to_fixpoint(model, store, statistics, queue)
}

/// Propagate the consequences of the domain changes made since the last
/// propagation, such as a branching decision.
pub fn propagate_changes(
    model: &Model,
    store: &mut DomainStore,
    statistics: &mut Statistics,
) -> Result<(), PropagationFailure> {
    let mut queue = PropagationQueue::new(model.constraints().len());
    queue.wake(model, store);
    run_to_fixpoint(model, store, statistics, queue)
}

fn run_to_fixpoint(
    model: &Model,
    store: &mut DomainStore,
    statistics: &mut Statistics,
    mut queue: PropagationQueue,
) -> Result<(), PropagationFailure> {
    while let Some(index) = queue.pop() {
        if store.is_entailed(index) {
            continue;
        }
        statistics.increment_counter(Counters::Propagations);
        match model.constraints()[index].propagate(store)? {
            Propagation::Violated => {
                return Err(PropagationFailure::ConstraintViolated { constraint: index });
            }
            Propagation::Entailed => store.set_entailed(index),
            Propagation::Narrowed | Propagation::Unchanged => {}
        }
        queue.wake(model, store);
    }
    Ok(())
}
