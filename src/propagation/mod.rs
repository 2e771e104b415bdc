// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constraint propagation to a fixpoint.
//!
//! Each constraint narrows the domains of its own variables. Narrowing one
//! variable can enable further narrowing elsewhere, so propagation runs as a
//! work queue:
//!
//! 1. Queue the constraints to (re)check
//! 2. Pop one and call its propagator
//! 3. Queue every constraint watching a variable it narrowed
//! 4. Stop when the queue is empty (fixpoint) or on the first failure
//!
//! A constraint found entailed is flagged in the store and skipped from then
//! on. The flag is trailed, so backtracking past the point where it was set
//! makes the constraint live again.
//!
//! Failures are reported as [`PropagationFailure`]; they are local to the
//! branch being explored and never reach the caller of a solve.

mod core;
mod errors;

pub use self::core::{propagate_all, propagate_changes};
pub use errors::PropagationFailure;
