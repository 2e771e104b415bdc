// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! LabelingPredicate - Branches on variables until every domain is fixed.
//!
//! Each round makes one decision on the first variable, in declaration
//! order, that still has more than one candidate. With `v` its smallest
//! candidate, the two choices are:
//!
//! 0. `var = v`
//! 1. `var != v`
//!
//! Both choices re-propagate. Choice 1 leaves the variable open when more
//! candidates remain, so the next round branches on it again with its new
//! smallest value. Exploring choice 0 first makes solutions come out in
//! lexicographic order of their value vectors.

use super::fail_with;
use crate::context::SearchContext;
use crate::domain::VarId;
use crate::engine::{Predicate, PredicateResult};
use crate::propagation::PropagationFailure;
use crate::state::Counters;

/// Depth-first labeling with binary branching.
#[derive(Debug, Default)]
pub struct LabelingPredicate {
    /// Decision of each round: the variable and the value branched on.
    decisions: Vec<(VarId, i32)>,
}

impl LabelingPredicate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Predicate for LabelingPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, round: usize) -> PredicateResult {
        let Some(var) = ctx.store.first_unfixed() else {
            // Every variable is fixed: hand over to the next predicate
            return PredicateResult::Success;
        };
        let Some(value) = ctx.store.domain(var).min() else {
            return PredicateResult::Failure;
        };

        self.decisions.truncate(round);
        self.decisions.push((var, value));
        PredicateResult::Choices(2)
    }

    fn retry_pred(
        &mut self,
        ctx: &mut SearchContext<'_>,
        round: usize,
        choice: usize,
    ) -> PredicateResult {
        let (var, value) = self.decisions[round];
        ctx.statistics.increment_counter(Counters::Decisions);

        let decided = match choice {
            0 => ctx.store.assign(var, value),
            1 => ctx.store.remove_value(var, value),
            _ => return PredicateResult::Failure,
        };
        let outcome = decided
            .map_err(PropagationFailure::from)
            .and_then(|_| ctx.propagate_changes());

        match outcome {
            Ok(()) => PredicateResult::SuccessSamePredicate,
            Err(failure) => fail_with(ctx, self.name(), failure),
        }
    }

    fn name(&self) -> &str {
        "Labeling"
    }
}
