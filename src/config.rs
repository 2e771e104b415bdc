// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search limits.

use crate::engine::CancelToken;
use std::time::Duration;

/// Limits applied to one enumeration. Every limit is off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Stop after this many engine steps.
    pub node_limit: Option<u64>,
    /// Stop once this much wall-clock time has passed since the search began.
    pub timeout: Option<Duration>,
    /// Stop after producing this many solutions.
    pub solution_limit: Option<usize>,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_solution_limit(mut self, limit: usize) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    /// A fresh token enforcing the node limit and timeout.
    ///
    /// The timeout is measured from this call, so create the token when the
    /// search starts.
    pub fn cancel_token(&self) -> CancelToken {
        let mut token = CancelToken::new();
        if let Some(limit) = self.node_limit {
            token = token.with_node_limit(limit);
        }
        if let Some(timeout) = self.timeout {
            token = token.with_timeout(timeout);
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_limits() {
        let config = SearchConfig::default();
        assert_eq!(config.node_limit, None);
        assert!(!config.cancel_token().should_stop(1_000_000));
    }

    #[test]
    fn test_token_carries_limits() {
        let config = SearchConfig::new().with_node_limit(5);
        let token = config.cancel_token();
        assert!(!token.should_stop(4));
        assert!(token.should_stop(5));

        let config = SearchConfig::new().with_timeout(Duration::ZERO);
        assert!(config.cancel_token().should_stop(0));
    }

    #[test]
    fn test_huge_timeout_is_unlimited() {
        let config = SearchConfig::new().with_timeout(Duration::MAX);
        assert!(!config.cancel_token().should_stop(0));
    }
}
