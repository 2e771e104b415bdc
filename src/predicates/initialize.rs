// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! InitializePredicate - Propagates every constraint at the search root.

use super::fail_with;
use crate::context::SearchContext;
use crate::engine::{Predicate, PredicateResult};

/// InitializePredicate brings the initial domains to a propagation fixpoint.
///
/// This predicate is deterministic and runs exactly once (round=0 only).
/// It never produces choices. If the root fixpoint already fails, the whole
/// search is exhausted without a single decision.
#[derive(Debug)]
pub struct InitializePredicate;

impl Predicate for InitializePredicate {
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, round: usize) -> PredicateResult {
        assert_eq!(
            round, 0,
            "InitializePredicate must be called exactly once with round=0"
        );

        match ctx.propagate_all() {
            Ok(()) => PredicateResult::Success,
            Err(failure) => fail_with(ctx, self.name(), failure),
        }
    }

    fn name(&self) -> &str {
        "Initialize"
    }
}
