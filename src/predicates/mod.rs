// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search predicates.
//!
//! This module contains the predicates used in the search algorithm.
//! A complete solve runs the program
//!
//! ```text
//! Initialize -> Labeling (one round per decision) -> Solution
//! ```
//!
//! # Organization
//!
//! - `initialize`: InitializePredicate, propagation at the search root
//! - `labeling`: LabelingPredicate, binary branching on the first open variable
//! - `solution`: SolutionPredicate, ground-truth check and suspension
//! - Built-in predicates: `FailPredicate`

pub mod initialize;
pub mod labeling;
pub mod solution;

// Re-export main predicates for convenience
pub use initialize::InitializePredicate;
pub use labeling::LabelingPredicate;
pub use solution::SolutionPredicate;

use crate::context::SearchContext;
use crate::engine::{Predicate, PredicateResult, TerminalPredicate};
use crate::propagation::PropagationFailure;

/// Built-in fail predicate (Prolog's `fail.`).
///
/// This predicate always fails, forcing backtracking. Ending a program with
/// it explores the whole search space in one run, with earlier predicates
/// observing each branch through side effects.
///
/// # Example
///
/// ```
/// use tatami_search::context::SearchContext;
/// use tatami_search::engine::{EngineBuilder, SearchStatus};
/// use tatami_search::model::ModelBuilder;
/// use tatami_search::predicates::{FailPredicate, LabelingPredicate};
///
/// let mut builder = ModelBuilder::new();
/// builder.new_var(0..3).unwrap();
/// let model = builder.build();
///
/// let mut ctx = SearchContext::new(&model);
/// let engine = EngineBuilder::new()
///     .add(Box::new(LabelingPredicate::new()))
///     .terminal(Box::new(FailPredicate))
///     .build();
///
/// // Engine will label every value then fail
/// assert!(matches!(engine.search(&mut ctx), SearchStatus::Exhausted));
/// ```
#[derive(Debug)]
pub struct FailPredicate;

impl Predicate for FailPredicate {
    fn try_pred(&mut self, _ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
        PredicateResult::Failure
    }

    fn retry_pred(
        &mut self,
        _ctx: &mut SearchContext<'_>,
        _round: usize,
        _choice: usize,
    ) -> PredicateResult {
        PredicateResult::Failure
    }

    fn name(&self) -> &str {
        "Fail"
    }
}

/// FailPredicate is a terminal predicate (like Prolog's fail.).
impl TerminalPredicate for FailPredicate {}

/// Count and log a propagation failure, then fail the predicate.
fn fail_with(
    ctx: &mut SearchContext<'_>,
    predicate: &str,
    failure: PropagationFailure,
) -> PredicateResult {
    ctx.statistics.record_failure(&failure);
    log::trace!("{}: {}", predicate, failure);
    PredicateResult::Failure
}
