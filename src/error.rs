// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Errors visible to callers of the solver.
//!
//! Only request validation can fail. Failures inside the search
//! ([`DomainExhausted`](crate::domain::DomainExhausted) and
//! [`PropagationFailure`](crate::propagation::PropagationFailure)) are
//! recovered by backtracking and never reach this type; cancellation is an
//! outcome, reported through [`Completion`](crate::solver::Completion).

use crate::domain::DomainError;
use thiserror::Error;

/// Why a room cannot be searched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TatamiError {
    /// Tiles cover two cells each, so the room area must be even.
    #[error("the room area must be an even number: {area}")]
    OddArea { xmax: u32, ymax: u32, area: u64 },

    /// A side is longer than a variable domain can represent.
    #[error(
        "room {xmax}x{ymax} is too large: sides are limited to {max}",
        max = crate::tatami::MAX_SIDE
    )]
    RoomTooLarge { xmax: u32, ymax: u32 },

    /// A variable was declared with an unusable candidate set.
    #[error("invalid variable domain: {0}")]
    InvalidDomain(#[from] DomainError),
}
