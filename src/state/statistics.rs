// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Statistics are stored in the context, and are incremented by the
//! predicates and by propagation as the search runs.

use crate::propagation::PropagationFailure;
use std::fmt;
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

#[derive(EnumCountMacro, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Complete assignments accepted by the ground-truth check.
    Solutions,
    /// Branching decisions taken by labeling.
    Decisions,
    /// Individual constraint propagation steps.
    Propagations,
}

const COUNT: usize = Counters::COUNT + PropagationFailure::COUNT;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub(crate) fn increment_counter(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Count one failure of the given kind.
    pub(crate) fn record_failure(&mut self, failure: &PropagationFailure) {
        self.stats[Counters::COUNT + failure.kind_index()] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Failures whose kind matches `failure` (field values are ignored).
    pub fn failures(&self, failure: &PropagationFailure) -> u64 {
        self.stats[Counters::COUNT + failure.kind_index()]
    }

    /// Failures of every kind.
    pub fn total_failures(&self) -> u64 {
        self.stats[Counters::COUNT..].iter().sum()
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} solutions, {} decisions, {} propagations, {} failures",
            self.get(Counters::Solutions),
            self.get(Counters::Decisions),
            self.get(Counters::Propagations),
            self.total_failures()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VarId;

    #[test]
    fn test_counters_are_independent() {
        let mut stats = Statistics::new();
        stats.increment_counter(Counters::Decisions);
        stats.increment_counter(Counters::Decisions);
        stats.increment_counter(Counters::Solutions);

        assert_eq!(stats.get(Counters::Decisions), 2);
        assert_eq!(stats.get(Counters::Solutions), 1);
        assert_eq!(stats.get(Counters::Propagations), 0);
    }

    #[test]
    fn test_failures_by_kind() {
        let mut stats = Statistics::new();
        stats.record_failure(&PropagationFailure::DomainExhausted { var: VarId(3) });
        stats.record_failure(&PropagationFailure::ConstraintViolated { constraint: 1 });
        stats.record_failure(&PropagationFailure::ConstraintViolated { constraint: 7 });

        assert_eq!(
            stats.failures(&PropagationFailure::ConstraintViolated { constraint: 0 }),
            2
        );
        assert_eq!(stats.total_failures(), 3);
        assert_eq!(stats.get(Counters::Solutions), 0);
    }
}
