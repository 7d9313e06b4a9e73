//! The update algebra: delayed, symbolic assignment.
//!
//! An update is a total substitution from identifiers to expressions:
//! `u(x)` is the value `x` would hold after the assignments accumulated so
//! far, written in terms of the original state. Executing nothing, an
//! assignment statement rewrites the update instead of touching any state.
//! The defining law, restated per syntactic category, is
//! `eval(s, u(e)) == eval(apply_state(u, s), e)`.

use crate::ast::{BExpr, Expr, ExprX, Formula, Ident};
use crate::ast_util::ident_var;
use crate::interpreter::{eval_expr, State};
use crate::visitor::{map_bexpr_expr_visitor, map_expr_visitor, map_formula_expr_visitor};
use im::OrdMap;

/// Totality over the conceptually infinite identifier domain is simulated
/// by a finite override map plus a default: an absent identifier maps to
/// its own variable reference (`default == None`, the identity update) or
/// to one fixed expression (`default == Some(e)`). `assign` never stores
/// an entry equal to the default at its key, so the derived equality
/// compares observable content, not storage layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    entries: OrdMap<Ident, Expr>,
    default: Option<Expr>,
}

impl Update {
    /// Maps every identifier to its own variable reference.
    pub fn identity() -> Update {
        Update { entries: OrdMap::new(), default: None }
    }

    /// Maps every identifier to the same expression.
    pub fn constant(e: &Expr) -> Update {
        Update { entries: OrdMap::new(), default: Some(e.clone()) }
    }

    fn default_at(&self, x: &Ident) -> Expr {
        match &self.default {
            None => ident_var(x),
            Some(e) => e.clone(),
        }
    }

    /// Total lookup: the expression `x` currently stands for.
    pub fn lookup(&self, x: &Ident) -> Expr {
        match self.entries.get(x) {
            Some(e) => e.clone(),
            None => self.default_at(x),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.default.is_none() && self.entries.is_empty()
    }

    /// The update after additionally performing `x := e`. The right-hand
    /// side is read under `self`, so sequential assignments accumulate
    /// symbolically. Returns a new update; `self` is unchanged.
    pub fn assign(&self, x: &Ident, e: &Expr) -> Update {
        let rhs = self.apply_expr(e);
        let mut entries = self.entries.clone();
        if rhs == self.default_at(x) {
            entries.remove(x);
        } else {
            entries.insert(x.clone(), rhs);
        }
        Update { entries, default: self.default.clone() }
    }

    /// A distinct update whose logical content equals `self`'s at the
    /// moment of the call; subsequent `assign`s on either are invisible to
    /// the other. O(1) by structure sharing, so branching on a conditional
    /// is free. Each branch of an `if` must start from its own snapshot.
    pub fn snapshot(&self) -> Update {
        self.clone()
    }

    /// Homomorphic substitution: every variable occurrence is replaced by
    /// what it stands for under `self`.
    pub fn apply_expr(&self, expr: &Expr) -> Expr {
        map_expr_visitor(expr, &mut |e| match &**e {
            ExprX::Var(x) => self.lookup(x),
            _ => e.clone(),
        })
    }

    pub fn apply_bexpr(&self, bexpr: &BExpr) -> BExpr {
        map_bexpr_expr_visitor(bexpr, &mut |e| match &**e {
            ExprX::Var(x) => self.lookup(x),
            _ => e.clone(),
        })
    }

    pub fn apply_formula(&self, formula: &Formula) -> Formula {
        map_formula_expr_visitor(formula, &mut |e| match &**e {
            ExprX::Var(x) => self.lookup(x),
            _ => e.clone(),
        })
    }

    /// The state reached by performing the delayed assignments:
    /// `x ↦ eval(state, u(x))`.
    pub fn apply_state(&self, state: &State) -> State {
        let mut out = match &self.default {
            None => state.clone(),
            Some(e) => State::constant(eval_expr(state, e)),
        };
        for (x, e) in self.entries.iter() {
            out = out.set(x, eval_expr(state, e));
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Expr)> {
        self.entries.iter()
    }

    pub fn default_expr(&self) -> Option<&Expr> {
        self.default.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, CmpOp};
    use crate::ast_util::{b_cmp, f_cmp, int_const, mk_bin, str_ident, str_var};
    use crate::interpreter::{eval_bexpr, satisfies};
    use num_bigint::BigInt;

    #[test]
    fn identity_is_identity() {
        let u = Update::identity();
        let x = str_ident("x");
        assert!(u.is_identity());
        assert_eq!(u.lookup(&x), ident_var(&x));
        let e = mk_bin(BinaryOp::Add, &str_var("x"), &int_const(3));
        assert_eq!(u.apply_expr(&e), e);
        let b = b_cmp(CmpOp::Lt, &str_var("x"), &str_var("y"));
        assert_eq!(u.apply_bexpr(&b), b);
        let p = f_cmp(CmpOp::Eq, &str_var("x"), &str_var("y"));
        assert_eq!(u.apply_formula(&p), p);
        let s = State::zero().set(&x, BigInt::from(7));
        assert_eq!(u.apply_state(&s), s);
    }

    #[test]
    fn assign_is_functional() {
        let x = str_ident("x");
        let u = Update::identity();
        let u1 = u.snapshot().assign(&x, &int_const(5));
        assert!(u.is_identity());
        assert_eq!(u1.lookup(&x), int_const(5));
    }

    #[test]
    fn assign_back_to_default_restores_equality() {
        let x = str_ident("x");
        let u = Update::identity().assign(&x, &str_var("x"));
        assert_eq!(u, Update::identity());
    }

    #[test]
    fn correctness_law_on_samples() {
        let x = str_ident("x");
        let y = str_ident("y");
        let u = Update::identity()
            .assign(&x, &mk_bin(BinaryOp::Add, &str_var("x"), &str_var("y")))
            .assign(&y, &mk_bin(BinaryOp::Mul, &str_var("x"), &int_const(2)));
        let e = mk_bin(BinaryOp::Sub, &str_var("x"), &str_var("y"));
        let b = b_cmp(CmpOp::Le, &str_var("y"), &str_var("x"));
        let p = f_cmp(CmpOp::Gt, &str_var("x"), &int_const(0));
        for i in -2i64..=2 {
            for j in -2i64..=2 {
                let s = State::zero().set(&x, BigInt::from(i)).set(&y, BigInt::from(j));
                let s1 = u.apply_state(&s);
                assert_eq!(eval_expr(&s, &u.apply_expr(&e)), eval_expr(&s1, &e));
                assert_eq!(eval_bexpr(&s, &u.apply_bexpr(&b)), eval_bexpr(&s1, &b));
                assert_eq!(satisfies(&s, &u.apply_formula(&p)), satisfies(&s1, &p));
            }
        }
    }
}
