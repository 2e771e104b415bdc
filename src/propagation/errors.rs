// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for constraint propagation.

use crate::domain::{DomainExhausted, VarId};
use std::fmt;
use strum_macros::EnumCount as EnumCountMacro;

/// Why propagation rejected the current branch.
///
/// Both kinds are local: the search backtracks and the failure is only
/// counted and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCountMacro)]
pub enum PropagationFailure {
    /// A variable has no remaining candidates.
    DomainExhausted { var: VarId },

    /// A constraint cannot hold under the current domains.
    ConstraintViolated { constraint: usize },
}

impl PropagationFailure {
    /// Position of this failure kind among the statistics counters.
    pub(crate) fn kind_index(&self) -> usize {
        match self {
            PropagationFailure::DomainExhausted { .. } => 0,
            PropagationFailure::ConstraintViolated { .. } => 1,
        }
    }
}

impl From<DomainExhausted> for PropagationFailure {
    fn from(err: DomainExhausted) -> Self {
        PropagationFailure::DomainExhausted { var: err.var }
    }
}

impl fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationFailure::DomainExhausted { var } => {
                write!(f, "Variable {} has no remaining values", var)
            }
            PropagationFailure::ConstraintViolated { constraint } => {
                write!(f, "Constraint {} is violated", constraint)
            }
        }
    }
}
