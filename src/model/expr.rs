// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Linear expressions over variables.
//!
//! An expression is `Σ coef·var + constant`. It has no domain of its own:
//! its bounds are derived from the current domains of its variables, and
//! narrowing it means narrowing those variables.
//!
//! ```
//! use tatami_search::model::{LinExpr, ModelBuilder};
//!
//! let mut builder = ModelBuilder::new();
//! let x = builder.new_var(0..4).unwrap();
//! let w = builder.new_var([1, 2]).unwrap();
//!
//! // Far edge of a tile: x + w, and its height 3 - w
//! let x_end = x + w;
//! let height = LinExpr::constant(3) - w;
//! assert_eq!(x_end.evaluate(&[2, 1]), 3);
//! assert_eq!(height.evaluate(&[2, 1]), 2);
//! ```

use crate::domain::{DomainStore, VarId};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// `Σ coef·var + constant`, with like terms merged and zero terms dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinExpr {
    terms: Vec<(i64, VarId)>,
    constant: i64,
}

impl LinExpr {
    /// The constant expression `value`.
    pub fn constant(value: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// The expression `coef·var`.
    pub fn term(coef: i64, var: VarId) -> Self {
        Self::constant(0).plus_term(coef, var)
    }

    /// Non-zero terms, in order of first appearance.
    pub fn terms(&self) -> &[(i64, VarId)] {
        &self.terms
    }

    /// The constant part.
    pub fn constant_part(&self) -> i64 {
        self.constant
    }

    /// Variables this expression reads.
    pub fn vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.terms.iter().map(|&(_, var)| var)
    }

    fn plus_term(mut self, coef: i64, var: VarId) -> Self {
        if let Some(pos) = self.terms.iter().position(|&(_, v)| v == var) {
            self.terms[pos].0 += coef;
            if self.terms[pos].0 == 0 {
                self.terms.remove(pos);
            }
        } else if coef != 0 {
            self.terms.push((coef, var));
        }
        self
    }

    /// `(min, max)` of one term over the current domain of its variable.
    pub(crate) fn term_bounds(coef: i64, var: VarId, store: &DomainStore) -> (i64, i64) {
        let (lo, hi) = store.bounds(var);
        if coef >= 0 {
            (coef * lo, coef * hi)
        } else {
            (coef * hi, coef * lo)
        }
    }

    /// `(min, max)` over the current domains.
    pub fn bounds(&self, store: &DomainStore) -> (i64, i64) {
        self.terms
            .iter()
            .fold((self.constant, self.constant), |(lo, hi), &(coef, var)| {
                let (t_lo, t_hi) = Self::term_bounds(coef, var, store);
                (lo + t_lo, hi + t_hi)
            })
    }

    /// Exact value on a full assignment indexed by [`VarId`].
    pub fn evaluate(&self, values: &[i32]) -> i64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(coef, var)| {
                acc + coef * i64::from(values[var.index()])
            })
    }
}

impl From<VarId> for LinExpr {
    fn from(var: VarId) -> Self {
        Self::term(1, var)
    }
}

impl From<i64> for LinExpr {
    fn from(value: i64) -> Self {
        Self::constant(value)
    }
}

impl From<i32> for LinExpr {
    fn from(value: i32) -> Self {
        Self::constant(i64::from(value))
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;

    fn neg(mut self) -> LinExpr {
        for term in &mut self.terms {
            term.0 = -term.0;
        }
        self.constant = -self.constant;
        self
    }
}

impl<T: Into<LinExpr>> Add<T> for LinExpr {
    type Output = LinExpr;

    fn add(self, rhs: T) -> LinExpr {
        let rhs: LinExpr = rhs.into();
        let mut out = self;
        out.constant += rhs.constant;
        for (coef, var) in rhs.terms {
            out = out.plus_term(coef, var);
        }
        out
    }
}

impl<T: Into<LinExpr>> Sub<T> for LinExpr {
    type Output = LinExpr;

    fn sub(self, rhs: T) -> LinExpr {
        let rhs: LinExpr = rhs.into();
        self + -rhs
    }
}

impl<T: Into<LinExpr>> Add<T> for VarId {
    type Output = LinExpr;

    fn add(self, rhs: T) -> LinExpr {
        LinExpr::from(self) + rhs
    }
}

impl<T: Into<LinExpr>> Sub<T> for VarId {
    type Output = LinExpr;

    fn sub(self, rhs: T) -> LinExpr {
        LinExpr::from(self) - rhs
    }
}

impl fmt::Display for LinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for &(coef, var) in &self.terms {
            let sign = if coef < 0 { "-" } else { "+" };
            if first {
                if coef < 0 {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {} ", sign)?;
            }
            if coef.abs() != 1 {
                write!(f, "{}*", coef.abs())?;
            }
            write!(f, "{}", var)?;
            first = false;
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant > 0 {
            write!(f, " + {}", self.constant)
        } else if self.constant < 0 {
            write!(f, " - {}", -self.constant)
        } else {
            Ok(())
        }
    }
}
