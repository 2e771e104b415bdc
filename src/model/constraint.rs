// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Relational constraints and their propagators.
//!
//! A constraint is built once and never changes. During search it is
//! evaluated over and over against the shrinking domains in a
//! [`DomainStore`]:
//!
//! - [`Constraint::propagate`] removes values that cannot take part in any
//!   solution and reports what happened
//! - [`Constraint::reify`] reads the constraint's truth value as a 0/1 domain
//!   without changing anything
//! - [`Constraint::is_satisfied`] is the exact check on a full assignment,
//!   the definition that propagation must agree with
//!
//! Comparisons are normalised to `expr op 0`. Disjunctions propagate only
//! once every disjunct but one is refuted; the survivor is then enforced.

use super::expr::LinExpr;
use crate::domain::{Domain, DomainExhausted, DomainStore, VarId};
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Comparison of a linear expression against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl CmpOp {
    fn holds(self, value: i64) -> bool {
        match self {
            CmpOp::LessEqual => value <= 0,
            CmpOp::GreaterEqual => value >= 0,
            CmpOp::Equal => value == 0,
            CmpOp::NotEqual => value != 0,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CmpOp::LessEqual => "<=",
            CmpOp::GreaterEqual => ">=",
            CmpOp::Equal => "==",
            CmpOp::NotEqual => "!=",
        }
    }
}

/// Outcome of one propagation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// No assignment of the current domains satisfies the constraint.
    Violated,
    /// Every assignment of the current domains satisfies the constraint.
    Entailed,
    /// Some domains shrank; constraints sharing those variables must be rechecked.
    Narrowed,
    /// Nothing could be deduced.
    Unchanged,
}

/// `expr op 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    expr: LinExpr,
    op: CmpOp,
}

impl Comparison {
    /// The left-hand side, compared against zero.
    pub fn expr(&self) -> &LinExpr {
        &self.expr
    }

    /// The comparison operator.
    pub fn op(&self) -> CmpOp {
        self.op
    }

    /// Minimum of `sign * expr` over the current domains.
    fn signed_min(&self, store: &DomainStore, sign: i64) -> i64 {
        self.expr
            .terms()
            .iter()
            .fold(sign * self.expr.constant_part(), |acc, &(coef, var)| {
                acc + LinExpr::term_bounds(sign * coef, var, store).0
            })
    }

    /// Enforce `sign * expr <= 0` by bounds reasoning on every term.
    fn narrow_upper(&self, store: &mut DomainStore, sign: i64) -> Result<bool, DomainExhausted> {
        let mut narrowed = false;
        for &(coef, var) in self.expr.terms() {
            let c = sign * coef;
            let total_min = self.signed_min(store, sign);
            let term_min = LinExpr::term_bounds(c, var, store).0;
            // c * var <= -(minimum of every other term)
            let limit = term_min - total_min;
            narrowed |= if c > 0 {
                store.restrict_range(var, i64::MIN, div_floor(limit, c))?
            } else {
                store.restrict_range(var, div_ceil(limit, c), i64::MAX)?
            };
        }
        Ok(narrowed)
    }

    /// If exactly one term is unfixed, that term with the sum of the rest.
    fn lone_unfixed(&self, store: &DomainStore) -> Option<(i64, VarId, i64)> {
        let mut unfixed = None;
        let mut rest = self.expr.constant_part();
        for &(coef, var) in self.expr.terms() {
            match store.domain(var).value() {
                Some(value) => rest += coef * i64::from(value),
                None if unfixed.is_none() => unfixed = Some((coef, var)),
                None => return None,
            }
        }
        unfixed.map(|(coef, var)| (coef, var, rest))
    }

    /// The value `var` must take for `coef * var + rest == 0`, if any.
    fn zero_of(coef: i64, rest: i64) -> Option<i32> {
        if rest % coef != 0 {
            return None;
        }
        i32::try_from(-rest / coef).ok()
    }

    fn truth(&self, store: &DomainStore) -> Option<bool> {
        let (lo, hi) = self.expr.bounds(store);
        match self.op {
            CmpOp::LessEqual if hi <= 0 => Some(true),
            CmpOp::LessEqual if lo > 0 => Some(false),
            CmpOp::GreaterEqual if lo >= 0 => Some(true),
            CmpOp::GreaterEqual if hi < 0 => Some(false),
            CmpOp::Equal if lo == 0 && hi == 0 => Some(true),
            CmpOp::Equal if lo > 0 || hi < 0 => Some(false),
            CmpOp::NotEqual if lo > 0 || hi < 0 => Some(true),
            CmpOp::NotEqual if lo == hi => Some(false),
            CmpOp::NotEqual => match self.lone_unfixed(store) {
                Some((coef, var, rest)) => match Self::zero_of(coef, rest) {
                    Some(value) if store.domain(var).contains(value) => None,
                    _ => Some(true),
                },
                None => None,
            },
            _ => None,
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, DomainExhausted> {
        match self.truth(store) {
            Some(true) => return Ok(Propagation::Entailed),
            Some(false) => return Ok(Propagation::Violated),
            None => {}
        }
        let narrowed = match self.op {
            CmpOp::LessEqual => self.narrow_upper(store, 1)?,
            CmpOp::GreaterEqual => self.narrow_upper(store, -1)?,
            CmpOp::Equal => {
                let below = self.narrow_upper(store, 1)?;
                let above = self.narrow_upper(store, -1)?;
                below || above
            }
            CmpOp::NotEqual => match self.lone_unfixed(store) {
                Some((coef, var, rest)) => match Self::zero_of(coef, rest) {
                    Some(value) => store.remove_value(var, value)?,
                    None => false,
                },
                None => false,
            },
        };
        Ok(match self.truth(store) {
            Some(true) => Propagation::Entailed,
            Some(false) => Propagation::Violated,
            None if narrowed => Propagation::Narrowed,
            None => Propagation::Unchanged,
        })
    }
}

/// A relation over variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `expr op 0`.
    Compare(Comparison),
    /// At least one sub-constraint holds.
    Or(Vec<Constraint>),
    /// Every sub-constraint holds.
    And(Vec<Constraint>),
}

impl Constraint {
    fn compare(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>, op: CmpOp) -> Self {
        let expr: LinExpr = lhs.into();
        Constraint::Compare(Comparison {
            expr: expr - rhs,
            op,
        })
    }

    /// `lhs <= rhs`
    pub fn less_equal(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        Self::compare(lhs, rhs, CmpOp::LessEqual)
    }

    /// `lhs >= rhs`
    pub fn greater_equal(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        Self::compare(lhs, rhs, CmpOp::GreaterEqual)
    }

    /// `lhs == rhs`
    pub fn equal(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        Self::compare(lhs, rhs, CmpOp::Equal)
    }

    /// `lhs != rhs`
    pub fn not_equal(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        Self::compare(lhs, rhs, CmpOp::NotEqual)
    }

    /// `lhs < rhs`, stated over integers as `lhs + 1 <= rhs`.
    pub fn less_than(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        let lhs: LinExpr = lhs.into();
        Self::less_equal(lhs + 1, rhs)
    }

    /// `lhs > rhs`, stated over integers as `lhs >= rhs + 1`.
    pub fn greater_than(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        let rhs: LinExpr = rhs.into();
        Self::greater_equal(lhs, rhs + 1)
    }

    /// Disjunction of `constraints`.
    pub fn or(constraints: Vec<Constraint>) -> Self {
        Constraint::Or(constraints)
    }

    /// Conjunction of `constraints`.
    pub fn and(constraints: Vec<Constraint>) -> Self {
        Constraint::And(constraints)
    }

    /// Every variable the constraint reads, without duplicates.
    pub fn vars(&self) -> Vec<VarId> {
        let mut vars = Vec::new();
        self.collect_vars(&mut vars);
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    fn collect_vars(&self, out: &mut Vec<VarId>) {
        match self {
            Constraint::Compare(cmp) => out.extend(cmp.expr.vars()),
            Constraint::Or(cs) | Constraint::And(cs) => {
                for c in cs {
                    c.collect_vars(out);
                }
            }
        }
    }

    /// `Some(true)` if entailed, `Some(false)` if violated, `None` if open.
    pub fn truth(&self, store: &DomainStore) -> Option<bool> {
        match self {
            Constraint::Compare(cmp) => cmp.truth(store),
            Constraint::Or(cs) => {
                let mut open = false;
                for c in cs {
                    match c.truth(store) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => open = true,
                    }
                }
                if open {
                    None
                } else {
                    Some(false)
                }
            }
            Constraint::And(cs) => {
                let mut open = false;
                for c in cs {
                    match c.truth(store) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => open = true,
                    }
                }
                if open {
                    None
                } else {
                    Some(true)
                }
            }
        }
    }

    /// The constraint's truth value as a 0/1 domain: `{1}` entailed,
    /// `{0}` violated, `{0,1}` undetermined.
    pub fn reify(&self, store: &DomainStore) -> Domain {
        match self.truth(store) {
            Some(true) => Domain::singleton(1),
            Some(false) => Domain::singleton(0),
            None => Domain::boolean(),
        }
    }

    /// Narrow the domains of the constraint's variables.
    ///
    /// An `Err` means a variable ran out of candidates; the caller treats it
    /// exactly like [`Propagation::Violated`].
    pub fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, DomainExhausted> {
        match self {
            Constraint::Compare(cmp) => cmp.propagate(store),
            Constraint::Or(cs) => {
                let mut open = None;
                let mut open_count = 0;
                for c in cs {
                    let truth = c.reify(store);
                    if truth == Domain::singleton(1) {
                        return Ok(Propagation::Entailed);
                    }
                    if truth == Domain::boolean() {
                        open_count += 1;
                        open = Some(c);
                    }
                }
                match (open_count, open) {
                    (0, _) => Ok(Propagation::Violated),
                    (1, Some(forced)) => forced.propagate(store),
                    _ => Ok(Propagation::Unchanged),
                }
            }
            Constraint::And(cs) => {
                let mut narrowed = false;
                let mut entailed = true;
                for c in cs {
                    match c.propagate(store)? {
                        Propagation::Violated => return Ok(Propagation::Violated),
                        Propagation::Entailed => {}
                        Propagation::Narrowed => {
                            narrowed = true;
                            entailed = false;
                        }
                        Propagation::Unchanged => entailed = false,
                    }
                }
                Ok(if entailed {
                    Propagation::Entailed
                } else if narrowed {
                    Propagation::Narrowed
                } else {
                    Propagation::Unchanged
                })
            }
        }
    }

    /// Exact check against a full assignment indexed by [`VarId`].
    pub fn is_satisfied(&self, values: &[i32]) -> bool {
        match self {
            Constraint::Compare(cmp) => cmp.op.holds(cmp.expr.evaluate(values)),
            Constraint::Or(cs) => cs.iter().any(|c| c.is_satisfied(values)),
            Constraint::And(cs) => cs.iter().all(|c| c.is_satisfied(values)),
        }
    }
}

impl BitOr for Constraint {
    type Output = Constraint;

    fn bitor(self, rhs: Constraint) -> Constraint {
        let mut parts = match self {
            Constraint::Or(cs) => cs,
            other => vec![other],
        };
        match rhs {
            Constraint::Or(cs) => parts.extend(cs),
            other => parts.push(other),
        }
        Constraint::Or(parts)
    }
}

impl BitAnd for Constraint {
    type Output = Constraint;

    fn bitand(self, rhs: Constraint) -> Constraint {
        let mut parts = match self {
            Constraint::And(cs) => cs,
            other => vec![other],
        };
        match rhs {
            Constraint::And(cs) => parts.extend(cs),
            other => parts.push(other),
        }
        Constraint::And(parts)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cs, sep) = match self {
            Constraint::Compare(cmp) => {
                return write!(f, "{} {} 0", cmp.expr, cmp.op.symbol());
            }
            Constraint::Or(cs) => (cs, " | "),
            Constraint::And(cs) => (cs, " & "),
        };
        write!(f, "(")?;
        for (i, c) in cs.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", sep)?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(domains: &[Domain]) -> DomainStore {
        DomainStore::new(domains.to_vec(), 0)
    }

    const X: VarId = VarId(0);
    const Y: VarId = VarId(1);

    #[test]
    fn test_division_rounding() {
        assert_eq!(div_floor(7, 2), 3);
        assert_eq!(div_floor(-7, 2), -4);
        assert_eq!(div_floor(7, -2), -4);
        assert_eq!(div_ceil(7, 2), 4);
        assert_eq!(div_ceil(-7, 2), -3);
        assert_eq!(div_ceil(-7, -2), 4);
        assert_eq!(div_ceil(6, -2), -3);
    }

    #[test]
    fn test_less_equal_narrows_both_sides() {
        // x + y <= 4 with x in 0..4, y in 3..6
        let mut store = store(&[Domain::range(0, 4), Domain::range(3, 6)]);
        let c = Constraint::less_equal(X + Y, 4);

        assert_eq!(c.propagate(&mut store), Ok(Propagation::Narrowed));
        assert_eq!(store.domain(X), Domain::range(0, 2));
        assert_eq!(store.domain(Y), Domain::range(3, 5));
    }

    #[test]
    fn test_less_equal_with_negative_coefficient() {
        // y + 3 - w <= 4, i.e. y <= 1 + w, with w in {1,2}
        let mut store = store(&[Domain::range(0, 5), Domain::from_values([1, 2]).unwrap()]);
        let c = Constraint::less_equal(X + 3 - Y, 4);
        assert_eq!(c.propagate(&mut store), Ok(Propagation::Narrowed));
        assert_eq!(store.domain(X), Domain::range(0, 4));

        // Forcing x = 3 leaves only w = 2
        store.assign(X, 3).unwrap();
        assert_eq!(c.propagate(&mut store), Ok(Propagation::Entailed));
        assert_eq!(store.domain(Y).value(), Some(2));
    }

    #[test]
    fn test_entailed_and_violated() {
        let mut store = store(&[Domain::range(0, 3), Domain::range(5, 8)]);
        assert_eq!(
            Constraint::less_than(X, Y).propagate(&mut store),
            Ok(Propagation::Entailed)
        );
        assert_eq!(
            Constraint::greater_equal(X, Y).propagate(&mut store),
            Ok(Propagation::Violated)
        );
    }

    #[test]
    fn test_equal_fixes_value() {
        let mut store = store(&[Domain::range(0, 4), Domain::singleton(2)]);
        let c = Constraint::equal(X + Y, 5);
        assert_eq!(c.propagate(&mut store), Ok(Propagation::Entailed));
        assert_eq!(store.domain(X).value(), Some(3));
    }

    #[test]
    fn test_equal_exhausts_domain() {
        // Bounds admit x == 1 but the domain has a hole there
        let mut store = store(&[Domain::from_values([0, 2]).unwrap()]);
        let c = Constraint::equal(X, 1);
        assert_eq!(c.propagate(&mut store), Err(DomainExhausted { var: X }));
    }

    #[test]
    fn test_not_equal_removes_value() {
        let mut store = store(&[Domain::range(0, 4), Domain::singleton(1)]);
        // x + w != 2 removes x = 1
        let c = Constraint::not_equal(X + Y, 2);
        assert_eq!(c.propagate(&mut store), Ok(Propagation::Entailed));
        assert!(!store.domain(X).contains(1));
        assert_eq!(store.domain(X).len(), 3);
    }

    #[test]
    fn test_not_equal_open_until_fixed() {
        let store = store(&[Domain::range(0, 4), Domain::range(0, 4)]);
        let c = Constraint::not_equal(X, Y);
        assert_eq!(c.truth(&store), None);
        assert_eq!(c.reify(&store), Domain::boolean());
    }

    #[test]
    fn test_or_forces_last_open_disjunct() {
        // (x >= 5) | (y <= 1): the first disjunct is refuted, so y <= 1
        let mut store = store(&[Domain::range(0, 3), Domain::range(0, 4)]);
        let c = Constraint::greater_equal(X, 5) | Constraint::less_equal(Y, 1);

        assert_eq!(c.propagate(&mut store), Ok(Propagation::Entailed));
        assert_eq!(store.domain(Y), Domain::range(0, 2));
    }

    #[test]
    fn test_or_waits_while_two_disjuncts_open() {
        let mut store = store(&[Domain::range(0, 4), Domain::range(0, 4)]);
        let c = Constraint::less_equal(X, 1) | Constraint::less_equal(Y, 1);
        assert_eq!(c.propagate(&mut store), Ok(Propagation::Unchanged));
        assert_eq!(c.reify(&store), Domain::boolean());
    }

    #[test]
    fn test_or_all_refuted() {
        let mut store = store(&[Domain::singleton(2)]);
        let c = Constraint::equal(X, 0) | Constraint::equal(X, 1);
        assert_eq!(c.propagate(&mut store), Ok(Propagation::Violated));
        assert_eq!(c.reify(&store), Domain::singleton(0));
    }

    #[test]
    fn test_and_propagates_every_conjunct() {
        let mut store = store(&[Domain::range(0, 4), Domain::range(0, 4)]);
        let c = Constraint::equal(X, Y) & Constraint::less_than(Y, 2);
        assert_eq!(c.propagate(&mut store), Ok(Propagation::Narrowed));
        assert_eq!(store.domain(Y), Domain::range(0, 2));
    }

    #[test]
    fn test_ordering_disjunction() {
        // (x0 < x1) | (x0 == x1 & y0 < y1) over fixed x0 = x1 forces y0 < y1
        let (x0, x1, y0, y1) = (VarId(0), VarId(1), VarId(2), VarId(3));
        let mut store = store(&[
            Domain::singleton(1),
            Domain::singleton(1),
            Domain::range(0, 3),
            Domain::range(0, 3),
        ]);
        let c = Constraint::less_than(x0, x1)
            | (Constraint::equal(x0, x1) & Constraint::less_than(y0, y1));

        assert_eq!(c.propagate(&mut store), Ok(Propagation::Narrowed));
        assert_eq!(store.domain(y0), Domain::range(0, 2));
        assert_eq!(store.domain(y1), Domain::range(1, 3));
    }

    #[test]
    fn test_is_satisfied() {
        let c = Constraint::less_than(X, Y) | Constraint::equal(X, 7);
        assert!(c.is_satisfied(&[1, 2]));
        assert!(c.is_satisfied(&[7, 0]));
        assert!(!c.is_satisfied(&[3, 2]));
    }

    #[test]
    fn test_vars_are_deduplicated() {
        let c = Constraint::less_equal(Y + X, 3) | Constraint::not_equal(X, 0);
        assert_eq!(c.vars(), vec![X, Y]);
    }

    #[test]
    fn test_display() {
        let c = Constraint::less_equal(X, Y) | Constraint::not_equal(X, 2);
        assert_eq!(format!("{}", c), "(v0 - v1 <= 0 | v0 - 2 != 0)");
    }
}
