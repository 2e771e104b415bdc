// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-search state that is not part of the trailed domains.
//!
//! Variable domains live in [`DomainStore`](crate::domain::DomainStore);
//! this module holds the bookkeeping that survives backtracking.

pub mod statistics;

pub use statistics::{Counters, Statistics};
