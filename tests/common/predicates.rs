// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Small predicates for driving the engine without a real model.
//!
//! `try_pred` announces the choices, `retry_pred` takes one; programs end in
//! [`SuspendPredicate`] to hand each branch back to the caller, or in
//! `FailPredicate` to walk every branch in one run.

use tatami_search::context::SearchContext;
use tatami_search::domain::VarId;
use tatami_search::engine::{Predicate, PredicateResult, TerminalPredicate};

pub use tatami_search::predicates::FailPredicate as AlwaysFailPredicate;

/// One choice per integer in `start..end`. Touches no state.
#[derive(Debug)]
pub struct IntegerRangePredicate {
    start: i32,
    end: i32,
}

impl IntegerRangePredicate {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

impl Predicate for IntegerRangePredicate {
    fn try_pred(&mut self, _ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
        match (self.end - self.start).max(0) as usize {
            0 => PredicateResult::Failure,
            n => PredicateResult::Choices(n),
        }
    }

    fn retry_pred(
        &mut self,
        _ctx: &mut SearchContext<'_>,
        _round: usize,
        choice: usize,
    ) -> PredicateResult {
        if self.start + (choice as i32) < self.end {
            PredicateResult::Success
        } else {
            PredicateResult::Failure
        }
    }

    fn name(&self) -> &str {
        "IntegerRange"
    }
}

/// Assign each value of one variable in turn, without propagating.
#[derive(Debug)]
pub struct AssignEachPredicate {
    var: VarId,
    candidates: Vec<i32>,
}

impl AssignEachPredicate {
    pub fn new(var: VarId) -> Self {
        Self {
            var,
            candidates: Vec::new(),
        }
    }
}

impl Predicate for AssignEachPredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
        self.candidates = ctx.store.domain(self.var).iter().collect();
        match self.candidates.len() {
            0 => PredicateResult::Failure,
            n => PredicateResult::Choices(n),
        }
    }

    fn retry_pred(
        &mut self,
        ctx: &mut SearchContext<'_>,
        _round: usize,
        choice: usize,
    ) -> PredicateResult {
        let value = self.candidates[choice];
        match ctx.store.assign(self.var, value) {
            Ok(_) => PredicateResult::Success,
            Err(_) => PredicateResult::Failure,
        }
    }

    fn name(&self) -> &str {
        "AssignEach"
    }
}

/// Hand control back to the caller.
#[derive(Debug)]
pub struct SuspendPredicate;

impl Predicate for SuspendPredicate {
    fn try_pred(&mut self, _ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
        PredicateResult::Suspend
    }

    fn name(&self) -> &str {
        "Suspend"
    }
}

impl TerminalPredicate for SuspendPredicate {}

/// Deterministic for `rounds` rounds, then advance.
#[derive(Debug)]
pub struct MultiRoundPredicate {
    rounds: usize,
}

impl MultiRoundPredicate {
    pub fn new(rounds: usize) -> Self {
        Self { rounds }
    }
}

impl Predicate for MultiRoundPredicate {
    fn try_pred(&mut self, _ctx: &mut SearchContext<'_>, round: usize) -> PredicateResult {
        match (round + 1).cmp(&self.rounds) {
            std::cmp::Ordering::Less => PredicateResult::SuccessSamePredicate,
            std::cmp::Ordering::Equal => PredicateResult::Success,
            std::cmp::Ordering::Greater => PredicateResult::Failure,
        }
    }

    fn name(&self) -> &str {
        "MultiRound"
    }
}
