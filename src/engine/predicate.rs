// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Predicate trait for non-deterministic search.
//!
//! The search engine works by trying predicates in sequence. Each predicate
//! represents a step of the search: propagating, branching on a variable,
//! or reporting a solution. Predicates can succeed, fail, offer choices, or
//! suspend the search.
//!
//! # Example
//!
//! ```
//! use tatami_search::engine::{Predicate, PredicateResult};
//! use tatami_search::context::SearchContext;
//!
//! #[derive(Debug)]
//! struct TwoWayPredicate;
//!
//! impl Predicate for TwoWayPredicate {
//!     fn try_pred(&mut self, _ctx: &mut SearchContext<'_>, _round: usize) -> PredicateResult {
//!         // Return Choices(2) to try two alternatives
//!         PredicateResult::Choices(2)
//!     }
//!
//!     fn retry_pred(
//!         &mut self,
//!         _ctx: &mut SearchContext<'_>,
//!         _round: usize,
//!         choice: usize,
//!     ) -> PredicateResult {
//!         if choice < 2 {
//!             PredicateResult::Success  // This choice works
//!         } else {
//!             PredicateResult::Failure  // No more options
//!         }
//!     }
//!
//!     fn name(&self) -> &str {
//!         "TwoWay"
//!     }
//! }
//! ```

use crate::context::SearchContext;
use std::fmt::Debug;

/// Result of attempting a predicate.
///
/// Predicates can return:
/// - `Success`: Move to next predicate in the sequence
/// - `SuccessSamePredicate`: Stay at same predicate, increment round
/// - `Failure`: Backtrack to previous predicate
/// - `Choices(n)`: Predicate has n choices to explore via retry_pred
/// - `Suspend`: Pause execution and hand control back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateResult {
    /// Predicate succeeded. Move to next predicate in sequence.
    Success,

    /// Predicate succeeded but stay at same predicate with next round.
    /// Labeling uses one round per branching decision.
    SuccessSamePredicate,

    /// Predicate has no (more) valid choices. Backtrack to previous predicate.
    Failure,

    /// Predicate has multiple choices to explore.
    /// Engine will call retry_pred(round, choice) for each choice in 0..n.
    Choices(usize),

    /// Suspend execution. Engine returns control with state preserved.
    /// Resuming backtracks out of the suspending predicate.
    Suspend,
}

/// A terminal predicate that ends a program.
///
/// Terminal predicates fail or suspend; they never return Success.
/// [`EngineBuilder::terminal`](super::EngineBuilder::terminal) only accepts
/// this trait, so every program built with the builder ends properly.
pub trait TerminalPredicate: Predicate {}

/// Trait for search predicates in the non-deterministic engine.
///
/// The engine calls `try_pred` to attempt the predicate for the first time,
/// and `retry_pred` to try each alternative it offered.
///
/// # Lifecycle
///
/// 1. Engine calls `try_pred` when first encountering the predicate
/// 2. If Success: engine advances to next predicate
/// 3. If Failure: engine backtracks to previous predicate
/// 4. If Choices(n): engine calls `retry_pred` for choice 0, then on
///    backtrack for choice 1, and so on
/// 5. Once every choice is spent, engine backtracks to previous predicate
///
/// # Trail Integration
///
/// Predicates narrow domains through `ctx.store`. The engine takes a
/// checkpoint for every stack entry and rolls back to it before each retry
/// and on backtrack, so a predicate never has to undo its own changes.
pub trait Predicate: Debug {
    /// Try this predicate for a given round.
    ///
    /// The round starts at 0 and increments each time the predicate returns
    /// `SuccessSamePredicate`.
    fn try_pred(&mut self, ctx: &mut SearchContext<'_>, round: usize) -> PredicateResult;

    /// Retry this predicate with a specific choice.
    ///
    /// Called after try_pred returns Choices(n), for each choice in 0..n.
    /// The store has already been rolled back to the state left by
    /// `try_pred`.
    ///
    /// Note: retry_pred cannot return Choices or Suspend (we're already in choice mode).
    #[allow(unused)]
    fn retry_pred(
        &mut self,
        ctx: &mut SearchContext<'_>,
        round: usize,
        choice: usize,
    ) -> PredicateResult {
        // Predicates that return Choices must implement this.
        panic!("{}::retry_pred should never be called", self.name());
    }

    /// Optional: Get a name for this predicate (for debugging).
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
