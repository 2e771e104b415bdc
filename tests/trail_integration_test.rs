// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the trail-based backtracking system.
//!
//! These tests verify that the trail works correctly when integrated with
//! `DomainStore` and `SearchContext`, demonstrating the checkpoint and
//! rollback behavior that the search engine depends on.

use tatami_search::context::SearchContext;
use tatami_search::domain::{Domain, DomainStore, VarId};
use tatami_search::model::{Constraint, Model, ModelBuilder};

fn two_var_model() -> (Model, VarId, VarId) {
    // x < y over {0..4}
    let mut builder = ModelBuilder::new();
    let x = builder.new_var(0..4).unwrap();
    let y = builder.new_var(0..4).unwrap();
    builder.post(Constraint::less_than(x, y));
    (builder.build(), x, y)
}

#[test]
fn test_search_context_simple_backtracking() {
    let (model, x, _) = two_var_model();
    let mut ctx = SearchContext::new(&model);

    // Initial state
    assert_eq!(ctx.store.domain(x), Domain::range(0, 4));

    let checkpoint = ctx.checkpoint();
    ctx.store.assign(x, 2).unwrap();

    assert_eq!(ctx.store.domain(x).value(), Some(2));
    assert_eq!(ctx.store.trail_len(), 1);

    // Rollback restores old value automatically
    ctx.rollback(checkpoint);
    assert_eq!(ctx.store.domain(x), Domain::range(0, 4));
    assert_eq!(ctx.store.trail_len(), 0);
}

#[test]
fn test_nested_checkpoints() {
    let (model, x, y) = two_var_model();
    let mut ctx = SearchContext::new(&model);

    let cp1 = ctx.checkpoint();
    assert_eq!(cp1.position(), 0);

    ctx.store.restrict_range(x, 1, 3).unwrap();
    ctx.store.remove_value(y, 0).unwrap();
    assert_eq!(ctx.store.trail_len(), 2);

    let cp2 = ctx.checkpoint();
    assert_eq!(cp2.position(), 2);

    ctx.store.assign(x, 1).unwrap();
    ctx.store.assign(y, 3).unwrap();
    assert_eq!(ctx.store.assignment(), Some(vec![1, 3]));

    // Rollback to cp2
    ctx.rollback(cp2);
    assert_eq!(ctx.store.domain(x).to_string(), "{1,2,3}");
    assert_eq!(ctx.store.domain(y).to_string(), "{1,2,3}");
    assert_eq!(ctx.store.trail_len(), 2);

    // Rollback to cp1
    ctx.rollback(cp1);
    assert_eq!(ctx.store.domains(), model.domains());
    assert_eq!(ctx.store.trail_len(), 0);
}

#[test]
fn test_propagation_is_undone_by_rollback() {
    let (model, x, y) = two_var_model();
    let mut ctx = SearchContext::new(&model);

    ctx.propagate_all().unwrap();
    // x < y removes 3 from x and 0 from y
    assert_eq!(ctx.store.to_string(), "v0={0,1,2} v1={1,2,3}");

    let checkpoint = ctx.checkpoint();
    ctx.store.assign(y, 1).unwrap();
    ctx.propagate_changes().unwrap();
    assert_eq!(ctx.store.assignment(), Some(vec![0, 1]));
    // Fully fixed, so the constraint is flagged as entailed
    assert!(ctx.store.is_entailed(0));

    ctx.rollback(checkpoint);
    assert_eq!(ctx.store.to_string(), "v0={0,1,2} v1={1,2,3}");
    assert!(!ctx.store.is_entailed(0));
    assert_eq!(ctx.store.domain(x).len(), 3);
}

#[test]
fn test_failed_propagation_rolls_back_cleanly() {
    let (model, x, y) = two_var_model();
    let mut ctx = SearchContext::new(&model);
    ctx.propagate_all().unwrap();

    let checkpoint = ctx.checkpoint();
    ctx.store.assign(x, 2).unwrap();
    ctx.store.assign(y, 1).unwrap();
    assert!(ctx.propagate_changes().is_err());

    ctx.rollback(checkpoint);
    assert_eq!(ctx.store.to_string(), "v0={0,1,2} v1={1,2,3}");

    // The pending changes were dropped with the rollback
    assert!(ctx.store.take_changed().is_empty());
    ctx.store.assign(x, 2).unwrap();
    ctx.propagate_changes().unwrap();
    assert_eq!(ctx.store.assignment(), Some(vec![2, 3]));
}

#[test]
fn test_independent_search_contexts() {
    let (model, x, _) = two_var_model();
    let mut ctx1 = SearchContext::new(&model);
    let mut ctx2 = SearchContext::new(&model);

    ctx1.store.assign(x, 0).unwrap();
    ctx2.store.assign(x, 3).unwrap();

    assert_eq!(ctx1.store.domain(x).value(), Some(0));
    assert_eq!(ctx2.store.domain(x).value(), Some(3));
    assert_eq!(ctx1.store.trail_len(), 1);
    assert_eq!(ctx2.store.trail_len(), 1);

    // Both share the one immutable model
    assert_eq!(model.domains()[x.index()], Domain::range(0, 4));
}

#[test]
fn test_unchanged_domain_is_not_recorded() {
    let mut builder = ModelBuilder::new();
    let var = builder.new_var(0..8).unwrap();
    let model = builder.build();
    let mut store = DomainStore::new(model.domains().to_vec(), 0);

    assert_eq!(store.restrict_range(var, 0, 7), Ok(false));
    assert_eq!(store.remove_value(var, 9), Ok(false));
    assert_eq!(store.trail_len(), 0);
}

#[test]
fn test_deep_nesting() {
    let mut builder = ModelBuilder::new();
    let var = builder.new_var(0..64).unwrap();
    let model = builder.build();
    let mut store = DomainStore::new(model.domains().to_vec(), 0);
    let mut checkpoints = Vec::new();

    // Peel one value per level
    for value in 0..63 {
        checkpoints.push(store.checkpoint());
        store.remove_value(var, value).unwrap();
    }
    assert_eq!(store.domain(var).value(), Some(63));
    assert_eq!(store.trail_len(), 63);

    // Rewinding level by level restores one value at a time
    for (level, checkpoint) in checkpoints.into_iter().enumerate().rev() {
        store.rollback(checkpoint);
        assert_eq!(store.domain(var).min(), Some(level as i32));
        assert_eq!(store.trail_len(), level);
    }
    assert_eq!(store.domain(var).len(), 64);
}
