// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Non-deterministic search engine.
//!
//! This module implements a backtracking search engine that runs predicates
//! in sequence. The engine coordinates with the domain store's trail to
//! provide automatic state restoration on backtracking.
//!
//! # Architecture
//!
//! The engine maintains a stack of predicate execution states. Each stack entry tracks:
//! - Which predicate is executing
//! - Current round number (for predicates that execute multiple times)
//! - Choice mode state (whether we're trying alternatives)
//! - Current choice index (when in choice mode)
//! - The store checkpoint to roll back to
//!
//! Execution follows a WAM-like model:
//! 1. Call try_pred(round) on each predicate
//! 2. If Success: advance to next predicate
//! 3. If SuccessSamePredicate: increment round, stay at same predicate
//! 4. If Choices(n): enter choice mode, call retry_pred(round, 0..n-1)
//! 5. If Failure: backtrack to previous stack entry
//! 6. If Suspend: pause and return control to caller
//!
//! A predicate that succeeded without offering choices is never re-entered:
//! backtracking into it continues straight to the entry below.
//!
//! Resuming a suspended engine backtracks out of the suspending predicate,
//! so a program ending in a suspending predicate yields one result per
//! resumption until the search space is exhausted.
//!
//! # Example
//!
//! ```
//! use tatami_search::context::SearchContext;
//! use tatami_search::engine::{EngineBuilder, SearchStatus};
//! use tatami_search::model::ModelBuilder;
//! use tatami_search::predicates::{LabelingPredicate, SolutionPredicate};
//!
//! let mut builder = ModelBuilder::new();
//! builder.new_var(1..4).unwrap();
//! let model = builder.build();
//!
//! let mut ctx = SearchContext::new(&model);
//! let mut engine = EngineBuilder::new()
//!     .add(Box::new(LabelingPredicate::new()))
//!     .terminal(Box::new(SolutionPredicate))
//!     .build();
//!
//! // One suspension per value, then exhaustion
//! let mut suspensions = 0;
//! while let SearchStatus::Suspended(next) = engine.search(&mut ctx) {
//!     suspensions += 1;
//!     engine = next;
//! }
//! assert_eq!(suspensions, 3);
//! ```

pub mod cancel;
pub mod predicate;

pub use cancel::CancelToken;
pub use predicate::{Predicate, PredicateResult, TerminalPredicate};

use crate::context::SearchContext;
use crate::domain::Checkpoint;

/// Expected depth of the predicate stack; the stack grows past it if needed.
const INITIAL_STACK_SIZE: usize = 1000;

/// Stack entry tracking the state of one predicate execution.
#[derive(Debug)]
struct StackEntry {
    /// Index of the predicate in the predicates list.
    predicate_index: usize,

    /// Current round number (incremented by SuccessSamePredicate).
    round: usize,

    /// Whether we're in choice mode (exploring alternatives).
    in_choice_mode: bool,

    /// Next choice to try (when in_choice_mode is true).
    current_choice: usize,

    /// Total number of choices (when in_choice_mode is true).
    num_choices: usize,

    /// Store checkpoint for this stack entry.
    trail_checkpoint: Checkpoint,
}

impl StackEntry {
    fn new(predicate_index: usize, round: usize, trail_checkpoint: Checkpoint) -> Self {
        Self {
            predicate_index,
            round,
            in_choice_mode: false,
            current_choice: 0,
            num_choices: 0,
            trail_checkpoint,
        }
    }

    /// Mark a deterministic success: there is nothing left to retry.
    fn exhaust(&mut self) {
        self.in_choice_mode = true;
        self.current_choice = 0;
        self.num_choices = 0;
    }
}

/// Outcome of running the engine.
#[derive(Debug)]
pub enum SearchStatus {
    /// A predicate suspended; call `search` on the engine to continue.
    Suspended(SearchEngine),
    /// Backtracked past the first predicate: nothing is left to explore.
    Exhausted,
    /// The context's cancellation token stopped the search.
    Cancelled,
}

impl SearchStatus {
    /// Check if the engine suspended.
    pub fn is_suspended(&self) -> bool {
        matches!(self, SearchStatus::Suspended(_))
    }
}

/// Search engine that coordinates predicate execution and backtracking.
///
/// The engine runs predicates in sequence, managing rounds, choices, and
/// backtracking automatically via the store's trail.
#[derive(Debug)]
pub struct SearchEngine {
    /// List of predicates to execute in sequence.
    predicates: Vec<Box<dyn Predicate>>,

    /// Stack of predicate execution states.
    stack: Vec<StackEntry>,

    /// Whether the last run ended in a suspension.
    suspended: bool,

    /// Statistics: number of try_pred calls.
    try_count: u64,

    /// Statistics: number of retry_pred calls.
    retry_count: u64,
}

impl SearchEngine {
    /// Create a new search engine with the given predicates.
    ///
    /// Predicates will be tried in the order given. Prefer [`EngineBuilder`],
    /// which guarantees that the sequence ends with a terminal predicate.
    pub fn new(predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self {
            predicates,
            stack: Vec::with_capacity(INITIAL_STACK_SIZE),
            suspended: false,
            try_count: 0,
            retry_count: 0,
        }
    }

    /// Run the search until it suspends, is exhausted or is cancelled.
    ///
    /// Consumes the engine; a suspended engine is handed back inside
    /// [`SearchStatus::Suspended`] and continues where it stopped when
    /// `search` is called on it again with the same context.
    ///
    /// Results are communicated through side effects on `ctx`.
    ///
    /// # Panics
    ///
    /// Panics if the predicate sequence is invalid (reaches the end without
    /// a terminal predicate), or if `retry_pred` returns Choices or Suspend.
    pub fn search(mut self, ctx: &mut SearchContext<'_>) -> SearchStatus {
        if self.suspended {
            // Backtrack out of the suspending predicate
            self.suspended = false;
            self.stack.pop();
        } else {
            if self.predicates.is_empty() {
                return SearchStatus::Exhausted;
            }
            self.stack.push(StackEntry::new(0, 0, ctx.checkpoint()));
        }

        loop {
            if ctx.cancel.should_stop(self.try_count + self.retry_count) {
                log::debug!(
                    "search cancelled after {} tries, {} retries",
                    self.try_count,
                    self.retry_count
                );
                return SearchStatus::Cancelled;
            }

            // Backtracked past the first predicate
            let Some(entry) = self.stack.last_mut() else {
                return SearchStatus::Exhausted;
            };

            // Rewind the store to this entry's checkpoint
            ctx.rollback(entry.trail_checkpoint);

            if !entry.in_choice_mode {
                // Call mode: try_pred
                let pred_idx = entry.predicate_index;
                let round = entry.round;
                self.try_count += 1;
                let result = self.predicates[pred_idx].try_pred(ctx, round);

                match result {
                    PredicateResult::Success => {
                        self.exhaust_top();
                        self.push_next_predicate(ctx);
                    }
                    PredicateResult::SuccessSamePredicate => {
                        self.exhaust_top();
                        self.push_same_predicate(ctx);
                    }
                    PredicateResult::Failure => {
                        self.stack.pop();
                    }
                    PredicateResult::Choices(n) => {
                        let checkpoint = ctx.checkpoint();
                        if let Some(entry) = self.stack.last_mut() {
                            entry.in_choice_mode = true;
                            entry.current_choice = 0;
                            entry.num_choices = n;
                            entry.trail_checkpoint = checkpoint;
                        }
                    }
                    PredicateResult::Suspend => {
                        self.suspended = true;
                        return SearchStatus::Suspended(self);
                    }
                }
            } else {
                // Choice mode: retry_pred
                if entry.current_choice >= entry.num_choices {
                    // All choices spent
                    self.stack.pop();
                    continue;
                }

                let pred_idx = entry.predicate_index;
                let round = entry.round;
                let choice = entry.current_choice;
                entry.current_choice += 1;
                self.retry_count += 1;
                let result = self.predicates[pred_idx].retry_pred(ctx, round, choice);

                match result {
                    PredicateResult::Success => {
                        self.push_next_predicate(ctx);
                    }
                    PredicateResult::SuccessSamePredicate => {
                        self.push_same_predicate(ctx);
                    }
                    PredicateResult::Failure => {
                        // Try next choice (loop continues)
                    }
                    PredicateResult::Choices(_) | PredicateResult::Suspend => {
                        panic!("retry_pred returned invalid result: {:?}", result);
                    }
                }
            }
        }
    }

    fn exhaust_top(&mut self) {
        if let Some(entry) = self.stack.last_mut() {
            entry.exhaust();
        }
    }

    /// Push a new stack entry for the next predicate in sequence.
    ///
    /// Panics if we've reached the end of the predicate sequence, as this
    /// indicates an invalid program.
    fn push_next_predicate(&mut self, ctx: &SearchContext<'_>) {
        let next_index = self.stack.last().map_or(0, |e| e.predicate_index + 1);

        if next_index >= self.predicates.len() {
            panic!(
                "Invalid predicate sequence: reached end without a terminal predicate. \
                 Every program must end with a predicate that fails or suspends."
            );
        }

        self.stack
            .push(StackEntry::new(next_index, 0, ctx.checkpoint()));
    }

    /// Push a new stack entry for the same predicate with incremented round.
    fn push_same_predicate(&mut self, ctx: &SearchContext<'_>) {
        let (pred_index, next_round) = self
            .stack
            .last()
            .map_or((0, 0), |e| (e.predicate_index, e.round + 1));

        self.stack
            .push(StackEntry::new(pred_index, next_round, ctx.checkpoint()));
    }

    /// Get statistics about the search.
    ///
    /// Returns (try_count, retry_count) showing how many times predicates
    /// were tried and retried, accumulated over every resumption.
    pub fn statistics(&self) -> (u64, u64) {
        (self.try_count, self.retry_count)
    }

    /// Current depth of the predicate stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Builder for a predicate program that always ends in a terminal predicate.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    predicates: Vec<Box<dyn Predicate>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate.
    pub fn add(mut self, predicate: Box<dyn Predicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append the terminal predicate, closing the program.
    pub fn terminal<P: TerminalPredicate + 'static>(
        mut self,
        predicate: Box<P>,
    ) -> TerminatedProgram {
        self.predicates.push(predicate);
        TerminatedProgram {
            predicates: self.predicates,
        }
    }
}

/// A program closed by a terminal predicate, ready to build.
#[derive(Debug)]
pub struct TerminatedProgram {
    predicates: Vec<Box<dyn Predicate>>,
}

impl TerminatedProgram {
    pub fn build(self) -> SearchEngine {
        SearchEngine::new(self.predicates)
    }
}
