// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumerating solutions.
//!
//! [`Solutions`] runs the search program
//! `Initialize -> Labeling -> Solution` lazily: each call to `next` resumes
//! the engine until it suspends on the next solution. Dropping the iterator
//! abandons the rest of the search. Once the iterator is finished,
//! [`Solutions::completion`] says whether the search space was exhausted or
//! the search was cut short.
//!
//! # Example
//!
//! ```
//! use tatami_search::solver::{solve_all, Completion};
//! use tatami_search::tatami::Room;
//! use tatami_search::SearchConfig;
//!
//! let result = solve_all(Room::new(4, 3), &SearchConfig::default()).unwrap();
//! assert_eq!(result.completion, Completion::Exhausted);
//! assert_eq!(result.solutions.len(), 2);
//! assert_eq!(result.solutions[0].tiles()[0].rect(), (0, 0, 2, 1));
//! ```

use crate::config::SearchConfig;
use crate::context::SearchContext;
use crate::engine::{CancelToken, EngineBuilder, SearchEngine, SearchStatus};
use crate::error::TatamiError;
use crate::model::Model;
use crate::predicates::{InitializePredicate, LabelingPredicate, SolutionPredicate};
use crate::state::Statistics;
use crate::tatami::{build_model, Room, Tile};
use std::fmt;

/// One complete assignment, in variable declaration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Solution {
    values: Vec<i32>,
}

impl Solution {
    pub fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<i32> {
        self.values
    }

    /// Decode a tatami solution into its tiles.
    pub fn tiles(&self) -> Vec<Tile> {
        Tile::decode(&self.values)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

/// How an enumeration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every solution was produced.
    Exhausted,
    /// The cancellation token fired; more solutions may exist.
    Cancelled,
    /// The solution limit was reached; more solutions may exist.
    Stopped,
}

/// Solutions collected by a finished enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub solutions: Vec<Solution>,
    pub completion: Completion,
}

impl Enumeration {
    /// Check if `solutions` is the complete solution set.
    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Exhausted
    }
}

/// Lazy, resumable enumeration of the solutions of a model.
#[derive(Debug)]
pub struct Solutions<'m> {
    ctx: SearchContext<'m>,
    engine: Option<SearchEngine>,
    completion: Option<Completion>,
    solution_limit: Option<usize>,
    produced: usize,
}

impl<'m> Solutions<'m> {
    /// Enumerate without limits.
    pub fn new(model: &'m Model) -> Self {
        Self::with_cancel(model, CancelToken::new())
    }

    /// Enumerate under the limits in `config`. The timeout starts now.
    pub fn with_config(model: &'m Model, config: &SearchConfig) -> Self {
        let mut solutions = Self::with_cancel(model, config.cancel_token());
        solutions.solution_limit = config.solution_limit;
        solutions
    }

    /// Enumerate until `cancel` fires.
    pub fn with_cancel(model: &'m Model, cancel: CancelToken) -> Self {
        let engine = EngineBuilder::new()
            .add(Box::new(InitializePredicate))
            .add(Box::new(LabelingPredicate::new()))
            .terminal(Box::new(SolutionPredicate))
            .build();
        Self {
            ctx: SearchContext::with_cancel(model, cancel),
            engine: Some(engine),
            completion: None,
            solution_limit: None,
            produced: 0,
        }
    }

    /// A handle that cancels this enumeration, usable from any thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.ctx.cancel.clone()
    }

    /// How the enumeration ended, or `None` while it can still produce
    /// solutions.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// Search counters so far.
    pub fn statistics(&self) -> &Statistics {
        &self.ctx.statistics
    }

    /// Drain the remaining solutions.
    pub fn collect_all(mut self) -> Enumeration {
        let solutions: Vec<Solution> = self.by_ref().collect();
        Enumeration {
            solutions,
            completion: self.completion.unwrap_or(Completion::Exhausted),
        }
    }

    fn finish(&mut self, completion: Completion) {
        log::info!(
            "search {}: {}",
            match completion {
                Completion::Exhausted => "exhausted",
                Completion::Cancelled => "cancelled",
                Completion::Stopped => "stopped",
            },
            self.ctx.statistics
        );
        self.engine = None;
        self.completion = Some(completion);
    }
}

impl Iterator for Solutions<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        if self.completion.is_some() {
            return None;
        }
        if self.solution_limit.is_some_and(|limit| self.produced >= limit) {
            self.finish(Completion::Stopped);
            return None;
        }
        loop {
            let Some(engine) = self.engine.take() else {
                self.finish(Completion::Exhausted);
                return None;
            };
            match engine.search(&mut self.ctx) {
                SearchStatus::Suspended(engine) => {
                    self.engine = Some(engine);
                    if let Some(values) = self.ctx.take_solution() {
                        self.produced += 1;
                        return Some(Solution::new(values));
                    }
                }
                SearchStatus::Exhausted => {
                    self.finish(Completion::Exhausted);
                    return None;
                }
                SearchStatus::Cancelled => {
                    self.finish(Completion::Cancelled);
                    return None;
                }
            }
        }
    }
}

/// Enumerate the tatami layouts of `room` under `config`.
///
/// Fails before searching if the room cannot be modelled.
pub fn solve_all(room: Room, config: &SearchConfig) -> Result<Enumeration, TatamiError> {
    let tatami = build_model(room)?;
    Ok(Solutions::with_config(tatami.model(), config).collect_all())
}
