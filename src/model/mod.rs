// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constraint models: variables, expressions and constraints.
//!
//! A [`Model`] is immutable once built. It holds the initial domain of every
//! variable and the list of constraints, plus a watch list mapping each
//! variable to the constraints that read it. Searches never mutate a model;
//! each search copies the initial domains into its own
//! [`DomainStore`](crate::domain::DomainStore), so one model can be solved
//! any number of times, and separate models can be solved on separate
//! threads.
//!
//! # Example
//!
//! ```
//! use tatami_search::model::{Constraint, ModelBuilder};
//!
//! let mut builder = ModelBuilder::new();
//! let x = builder.new_var(0..3).unwrap();
//! let y = builder.new_var(0..3).unwrap();
//! builder.post(Constraint::less_than(x, y));
//! let model = builder.build();
//!
//! assert_eq!(model.num_vars(), 2);
//! assert!(model.is_satisfied(&[0, 2]));
//! assert!(!model.is_satisfied(&[2, 2]));
//! ```

pub mod constraint;
pub mod expr;

pub use constraint::{CmpOp, Comparison, Constraint, Propagation};
pub use expr::LinExpr;

use crate::domain::{Domain, DomainError, VarId};

/// An immutable constraint satisfaction model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    domains: Vec<Domain>,
    constraints: Vec<Constraint>,
    /// For each variable, the indices of the constraints that read it.
    watchers: Vec<Vec<usize>>,
}

impl Model {
    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.domains.len()
    }

    /// Initial domains in declaration order.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// All constraints, indexed as the watch lists index them.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Indices of the constraints that read `var`.
    pub fn watchers(&self, var: VarId) -> &[usize] {
        &self.watchers[var.index()]
    }

    /// Index of the first constraint `values` violates, if any.
    ///
    /// Values outside a variable's initial domain are reported as
    /// violating nothing here; use [`Model::is_satisfied`] for the full check.
    pub fn first_violated(&self, values: &[i32]) -> Option<usize> {
        self.constraints.iter().position(|c| !c.is_satisfied(values))
    }

    /// Exact check of a full assignment against every domain and constraint.
    pub fn is_satisfied(&self, values: &[i32]) -> bool {
        values.len() == self.domains.len()
            && self
                .domains
                .iter()
                .zip(values)
                .all(|(domain, &value)| domain.contains(value))
            && self.first_violated(values).is_none()
    }
}

/// Incremental construction of a [`Model`].
#[derive(Debug, Default)]
pub struct ModelBuilder {
    domains: Vec<Domain>,
    constraints: Vec<Constraint>,
}

impl ModelBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable over the given candidate values.
    ///
    /// Variables are numbered in declaration order.
    pub fn new_var<I>(&mut self, values: I) -> Result<VarId, DomainError>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let domain = Domain::from_values(values)?;
        self.domains.push(domain);
        Ok(VarId(self.domains.len() - 1))
    }

    /// Add a constraint.
    pub fn post(&mut self, constraint: Constraint) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// Number of constraints posted so far.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Finish the model, computing the watch lists.
    pub fn build(self) -> Model {
        let mut watchers = vec![Vec::new(); self.domains.len()];
        for (index, constraint) in self.constraints.iter().enumerate() {
            for var in constraint.vars() {
                watchers[var.index()].push(index);
            }
        }
        Model {
            domains: self.domains,
            constraints: self.constraints,
            watchers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_var_numbering() {
        let mut builder = ModelBuilder::new();
        let a = builder.new_var(0..4).unwrap();
        let b = builder.new_var([1, 2]).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn test_new_var_rejects_empty_domain() {
        let mut builder = ModelBuilder::new();
        assert_eq!(builder.new_var(0..0), Err(DomainError::Empty));
        assert_eq!(
            builder.new_var([70]),
            Err(DomainError::OutOfRange { value: 70 })
        );
    }

    #[test]
    fn test_watchers() {
        let mut builder = ModelBuilder::new();
        let x = builder.new_var(0..3).unwrap();
        let y = builder.new_var(0..3).unwrap();
        let z = builder.new_var(0..3).unwrap();
        builder
            .post(Constraint::less_than(x, y))
            .post(Constraint::not_equal(y, z));
        let model = builder.build();

        assert_eq!(model.watchers(x), &[0]);
        assert_eq!(model.watchers(y), &[0, 1]);
        assert_eq!(model.watchers(z), &[1]);
    }

    #[test]
    fn test_is_satisfied_checks_domains() {
        let mut builder = ModelBuilder::new();
        builder.new_var(0..3).unwrap();
        let model = builder.build();

        assert!(model.is_satisfied(&[2]));
        assert!(!model.is_satisfied(&[3]));
        assert!(!model.is_satisfied(&[]));
    }

    #[test]
    fn test_empty_model() {
        let model = ModelBuilder::new().build();
        assert_eq!(model.num_vars(), 0);
        assert!(model.is_satisfied(&[]));
    }
}
