// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration of tatami layouts by propagating backtracking search.
//!
//! A rectangular room `xmax × ymax` is to be covered with tiles of combined
//! side length 3: each tile is either 1×2 or 2×1. A layout is valid when the
//! tiles cover the room exactly and no four tiles meet at a point. Layouts
//! that differ only by renumbering the tiles, or by a reflection of a square
//! room, are reported once.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: Model (Immutable)
//!
//! Built once per room and never changed during search:
//! - Initial variable domains ([`domain::Domain`] bitsets)
//! - Constraints over linear expressions ([`model::Constraint`])
//! - Watch lists from variables to the constraints that read them
//!
//! ## Tier 2: Search state (Mutable)
//!
//! Owned by one search and tracked on the trail:
//! - Trail - records domain changes for O(1) backtracking
//! - Working domains and per-constraint entailment flags
//!
//! # Search Algorithm
//!
//! The search runs three predicates on the backtracking engine:
//!
//! 1. **InitializePredicate**: propagate every constraint to a fixpoint
//! 2. **LabelingPredicate**: branch on the first open variable, assigning or
//!    excluding its smallest value, and re-propagate
//! 3. **SolutionPredicate**: check the full assignment exactly and suspend
//!
//! Resuming the engine after each suspension continues the depth-first
//! search, so solutions are produced lazily and in lexicographic order.
//!
//! # Example
//!
//! ```
//! use tatami_search::{build_model, Room, Solutions};
//!
//! let tatami = build_model(Room::new(3, 2)).unwrap();
//! let mut solutions = Solutions::new(tatami.model());
//!
//! let first = solutions.next().unwrap();
//! assert_eq!(first.values(), &[0, 0, 2, 0, 1, 0, 2, 2, 1]);
//! assert_eq!(solutions.count(), 2);
//! ```

pub mod config;
pub mod context;
pub mod domain;
pub mod engine;
pub mod error;
pub mod model;
pub mod predicates;
pub mod propagation;
pub mod solver;
pub mod state;
pub mod tatami;
pub mod trail;

// Re-export commonly used types
pub use config::SearchConfig;
pub use context::SearchContext;
pub use engine::{CancelToken, Predicate, PredicateResult, SearchEngine, SearchStatus};
pub use error::TatamiError;
pub use solver::{solve_all, Completion, Enumeration, Solution, Solutions};
pub use tatami::{build_model, Room, Tile};
pub use trail::Trail;
