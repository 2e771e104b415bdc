// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! SolutionPredicate - Reports a complete assignment and suspends.

use crate::context::SearchContext;
use crate::engine::{Predicate, PredicateResult, TerminalPredicate};
use crate::state::Counters;

/// Terminal predicate that publishes each solution.
///
/// Propagation is only an optimisation, so the assignment is re-checked
/// against every constraint with exact arithmetic before it is published.
/// The engine suspends here; resuming backtracks and continues the search
/// for the next solution.
#[derive(Debug)]
pub struct SolutionPredicate;

impl Predicate for SolutionPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
        let Some(values) = ctx.store.assignment() else {
            return PredicateResult::Failure;
        };
        if let Some(index) = ctx.model.first_violated(&values) {
            log::error!(
                "propagation accepted {:?}, which violates constraint {}: {}",
                values,
                index,
                ctx.model.constraints()[index]
            );
            return PredicateResult::Failure;
        }

        ctx.statistics.increment_counter(Counters::Solutions);
        ctx.record_solution(values);
        PredicateResult::Suspend
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
        "Solution"
    }
}

impl TerminalPredicate for SolutionPredicate {}
