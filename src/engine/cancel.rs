// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cooperative cancellation of a running search.
//!
//! The engine polls its [`CancelToken`] before every predicate step. A token
//! stops the search when any of the following holds:
//! - `cancel()` was called on it or on any clone of it
//! - its deadline has passed
//! - the engine has taken more steps than its node limit
//!
//! Clones share the cancellation flag, so a token handed to another thread
//! can stop a search running elsewhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A shareable request to stop searching.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
}

impl CancelToken {
    /// A token that only stops on an explicit `cancel()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop once `timeout` has elapsed from now.
    ///
    /// A timeout too long to be represented as an `Instant` sets no deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Stop after `limit` engine steps.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Request cancellation. Visible to every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check if `cancel()` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Check if a search that has taken `nodes` steps must stop now.
    pub fn should_stop(&self, nodes: u64) -> bool {
        self.is_cancelled()
            || self.node_limit.is_some_and(|limit| nodes >= limit)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
