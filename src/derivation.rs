//! The free and annotation-directed inference systems, represented as
//! derivation trees.
//!
//! Both systems share one rule skeleton: one rule per statement shape,
//! four rules that peel the head of a sequence, and one that re-associates
//! nested sequences (strictly decreasing `ast_util::stmt_size`). They
//! differ only at loops: the free system may use any invariant formula,
//! the annotation-directed system must use the one written on the loop.
//! Checking a derivation yields its leaf proof obligations; the judgment
//! holds iff some derivation checks and all of its obligations are valid.
//! The caller brings the validity oracle, typically an external prover.

use crate::ast::{Formula, Stmt, StmtX, Triple};
use crate::ast_util::{b_not, f_and, f_bool, f_implies, mk_seq};
use crate::update::Update;
use crate::vcgen::{Vc, VcReason};
use std::sync::Arc;

pub type CheckError = String;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// loop rules may use any invariant formula
    Free,
    /// loop rules must use the invariant annotated on the loop itself
    Annotated,
}

pub type Derivation = Arc<DerivationX>;
#[derive(Clone, Debug)]
pub enum DerivationX {
    Skip,
    Assign,
    If(Derivation, Derivation),
    While { inv: Formula, body: Derivation },
    SeqSkip(Derivation),
    SeqAssign(Derivation),
    SeqIf(Derivation, Derivation),
    SeqWhile { inv: Formula, body: Derivation, rest: Derivation },
    SeqSeq(Derivation),
}

fn shape_error(rule: &str, stmt: &Stmt) -> CheckError {
    format!(
        "rule {} does not apply to statement {}",
        rule,
        crate::printer::node_to_string(&crate::printer::stmt_to_node(stmt))
    )
}

fn check_inv(mode: Mode, inv: &Formula, annotated: &Formula) -> Result<(), CheckError> {
    if mode == Mode::Annotated && inv != annotated {
        Err("loop rule uses an invariant that differs from the loop's annotation".to_string())
    } else {
        Ok(())
    }
}

/// Checks that `d` is a derivation of the triple and collects its leaf
/// obligations. `Err` means the tree does not fit the statement (or, in
/// `Mode::Annotated`, uses a foreign invariant) -- it never means an
/// obligation is invalid; deciding obligations is the caller's business.
pub fn obligations(d: &Derivation, mode: Mode, triple: &Triple) -> Result<Vec<Vc>, CheckError> {
    let Triple { pre, update, stmt, post } = triple;
    check(d, mode, pre, update, stmt, post)
}

fn check(
    d: &Derivation,
    mode: Mode,
    p: &Formula,
    u: &Update,
    c: &Stmt,
    q: &Formula,
) -> Result<Vec<Vc>, CheckError> {
    match (&**d, &**c) {
        (DerivationX::Skip, StmtX::Skip) => {
            Ok(vec![Vc::new(VcReason::Post, f_implies(p, &u.apply_formula(q)))])
        }
        (DerivationX::Skip, _) => Err(shape_error("skip", c)),
        (DerivationX::Assign, StmtX::Assign(x, e)) => {
            let u1 = u.assign(x, e);
            Ok(vec![Vc::new(VcReason::Post, f_implies(p, &u1.apply_formula(q)))])
        }
        (DerivationX::Assign, _) => Err(shape_error("assign", c)),
        (DerivationX::If(d1, d2), StmtX::If(b, c1, c2)) => {
            let p1 = f_and(p, &f_bool(&u.apply_bexpr(b)));
            let p2 = f_and(p, &f_bool(&u.apply_bexpr(&b_not(b))));
            let mut vcs = check(d1, mode, &p1, &u.snapshot(), c1, q)?;
            vcs.extend(check(d2, mode, &p2, &u.snapshot(), c2, q)?);
            Ok(vcs)
        }
        (DerivationX::If(_, _), _) => Err(shape_error("if", c)),
        (DerivationX::While { inv, body }, StmtX::While(b, annotated, cbody)) => {
            check_inv(mode, inv, annotated)?;
            let mut vcs = vec![
                Vc::new(VcReason::InvariantEstablish, f_implies(p, &u.apply_formula(inv))),
                Vc::new(VcReason::InvariantExit, f_implies(&f_and(inv, &f_bool(&b_not(b))), q)),
            ];
            vcs.extend(check(body, mode, &f_and(inv, &f_bool(b)), &Update::identity(), cbody, inv)?);
            Ok(vcs)
        }
        (DerivationX::While { .. }, _) => Err(shape_error("while", c)),
        (DerivationX::SeqSkip(d1), StmtX::Seq(c1, c2)) => match &**c1 {
            StmtX::Skip => check(d1, mode, p, u, c2, q),
            _ => Err(shape_error("seq-skip", c)),
        },
        (DerivationX::SeqSkip(_), _) => Err(shape_error("seq-skip", c)),
        (DerivationX::SeqAssign(d1), StmtX::Seq(c1, c2)) => match &**c1 {
            StmtX::Assign(x, e) => check(d1, mode, p, &u.assign(x, e), c2, q),
            _ => Err(shape_error("seq-assign", c)),
        },
        (DerivationX::SeqAssign(_), _) => Err(shape_error("seq-assign", c)),
        (DerivationX::SeqIf(d1, d2), StmtX::Seq(c1, c2)) => match &**c1 {
            StmtX::If(b, ct, ce) => {
                let p1 = f_and(p, &f_bool(&u.apply_bexpr(b)));
                let p2 = f_and(p, &f_bool(&u.apply_bexpr(&b_not(b))));
                let mut vcs = check(d1, mode, &p1, &u.snapshot(), &mk_seq(ct, c2), q)?;
                vcs.extend(check(d2, mode, &p2, &u.snapshot(), &mk_seq(ce, c2), q)?);
                Ok(vcs)
            }
            _ => Err(shape_error("seq-if", c)),
        },
        (DerivationX::SeqIf(_, _), _) => Err(shape_error("seq-if", c)),
        (DerivationX::SeqWhile { inv, body, rest }, StmtX::Seq(c1, c2)) => match &**c1 {
            StmtX::While(b, annotated, cbody) => {
                check_inv(mode, inv, annotated)?;
                let mut vcs =
                    vec![Vc::new(VcReason::InvariantEstablish, f_implies(p, &u.apply_formula(inv)))];
                vcs.extend(check(
                    body,
                    mode,
                    &f_and(inv, &f_bool(b)),
                    &Update::identity(),
                    cbody,
                    inv,
                )?);
                vcs.extend(check(
                    rest,
                    mode,
                    &f_and(inv, &f_bool(&b_not(b))),
                    &Update::identity(),
                    c2,
                    q,
                )?);
                Ok(vcs)
            }
            _ => Err(shape_error("seq-while", c)),
        },
        (DerivationX::SeqWhile { .. }, _) => Err(shape_error("seq-while", c)),
        (DerivationX::SeqSeq(d1), StmtX::Seq(c1, c2)) => match &**c1 {
            StmtX::Seq(ca, cb) => check(d1, mode, p, u, &mk_seq(ca, &mk_seq(cb, c2)), q),
            _ => Err(shape_error("seq-seq", c)),
        },
        (DerivationX::SeqSeq(_), _) => Err(shape_error("seq-seq", c)),
    }
}

/// The canonical derivation the annotation-directed system assigns to any
/// statement; its obligations under `Mode::Annotated` coincide with the
/// output of `vcgen::vcgen`.
pub fn annotated_derivation(c: &Stmt) -> Derivation {
    match &**c {
        StmtX::Skip => Arc::new(DerivationX::Skip),
        StmtX::Assign(_, _) => Arc::new(DerivationX::Assign),
        StmtX::If(_, c1, c2) => {
            Arc::new(DerivationX::If(annotated_derivation(c1), annotated_derivation(c2)))
        }
        StmtX::While(_, inv, body) => Arc::new(DerivationX::While {
            inv: inv.clone(),
            body: annotated_derivation(body),
        }),
        StmtX::Seq(c1, c2) => match &**c1 {
            StmtX::Skip => Arc::new(DerivationX::SeqSkip(annotated_derivation(c2))),
            StmtX::Assign(_, _) => Arc::new(DerivationX::SeqAssign(annotated_derivation(c2))),
            StmtX::If(_, ct, ce) => Arc::new(DerivationX::SeqIf(
                annotated_derivation(&mk_seq(ct, c2)),
                annotated_derivation(&mk_seq(ce, c2)),
            )),
            StmtX::While(_, inv, body) => Arc::new(DerivationX::SeqWhile {
                inv: inv.clone(),
                body: annotated_derivation(body),
                rest: annotated_derivation(c2),
            }),
            StmtX::Seq(ca, cb) => {
                Arc::new(DerivationX::SeqSeq(annotated_derivation(&mk_seq(ca, &mk_seq(cb, c2)))))
            }
        },
    }
}
