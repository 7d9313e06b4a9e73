//! The verification condition generator.
//!
//! `vcgen` turns the annotation-directed proof system into a deterministic
//! formula-emitting function: if every emitted formula is valid, the triple
//! is derivable with the written annotations, and conversely every emitted
//! formula is valid whenever the triple is so derivable. Weak invariants
//! make some emitted formula invalid; that is a failed proof attempt, not
//! an error, and `vcgen` still terminates normally.
//!
//! Every recursive call strictly decreases `ast_util::stmt_size`; the
//! asymmetric sequence weighting is what makes the
//! `seq(seq(c1, c2), c3) -> seq(c1, seq(c2, c3))` case decrease.

use crate::ast::{BExpr, Formula, Stmt, StmtX};
use crate::ast_util::{b_not, f_and, f_bool, f_implies, mk_seq};
use crate::update::Update;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Why an obligation was emitted, so a caller can report a rejected
/// condition precisely.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VcReason {
    /// the precondition must imply the postcondition under the accumulated
    /// update
    Post,
    /// the precondition must establish a loop invariant
    InvariantEstablish,
    /// a loop invariant plus the negated guard must imply what follows
    InvariantExit,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Vc {
    pub reason: VcReason,
    pub formula: Formula,
}

impl Vc {
    pub fn new(reason: VcReason, formula: Formula) -> Vc {
        Vc { reason, formula }
    }
}

fn branch_pre(p: &Formula, u: &Update, b: &BExpr) -> Formula {
    f_and(p, &f_bool(&u.apply_bexpr(b)))
}

pub fn vcgen(p: &Formula, u: &Update, c: &Stmt, q: &Formula) -> Vec<Vc> {
    match &**c {
        StmtX::Skip => vec![Vc::new(VcReason::Post, f_implies(p, &u.apply_formula(q)))],
        StmtX::Assign(x, e) => {
            let u1 = u.assign(x, e);
            vec![Vc::new(VcReason::Post, f_implies(p, &u1.apply_formula(q)))]
        }
        StmtX::If(b, c1, c2) => {
            // each branch evolves its own snapshot of the pre-branch update
            let mut vcs = vcgen(&branch_pre(p, u, b), &u.snapshot(), c1, q);
            vcs.extend(vcgen(&branch_pre(p, u, &b_not(b)), &u.snapshot(), c2, q));
            vcs
        }
        StmtX::While(b, inv, body) => {
            let mut vcs = vec![
                Vc::new(VcReason::InvariantEstablish, f_implies(p, &u.apply_formula(inv))),
                Vc::new(VcReason::InvariantExit, f_implies(&f_and(inv, &f_bool(&b_not(b))), q)),
            ];
            // the invariant abstracts over the pre-loop update history, so
            // the body is checked under a fresh identity update
            vcs.extend(vcgen(&f_and(inv, &f_bool(b)), &Update::identity(), body, inv));
            vcs
        }
        StmtX::Seq(c1, c2) => match &**c1 {
            StmtX::Skip => vcgen(p, u, c2, q),
            StmtX::Assign(x, e) => vcgen(p, &u.assign(x, e), c2, q),
            StmtX::If(b, ct, ce) => {
                let mut vcs = vcgen(&branch_pre(p, u, b), &u.snapshot(), &mk_seq(ct, c2), q);
                vcs.extend(vcgen(
                    &branch_pre(p, u, &b_not(b)),
                    &u.snapshot(),
                    &mk_seq(ce, c2),
                    q,
                ));
                vcs
            }
            StmtX::While(b, inv, body) => {
                let mut vcs =
                    vec![Vc::new(VcReason::InvariantEstablish, f_implies(p, &u.apply_formula(inv)))];
                vcs.extend(vcgen(&f_and(inv, &f_bool(b)), &Update::identity(), body, inv));
                vcs.extend(vcgen(
                    &f_and(inv, &f_bool(&b_not(b))),
                    &Update::identity(),
                    c2,
                    q,
                ));
                vcs
            }
            StmtX::Seq(ca, cb) => vcgen(p, u, &mk_seq(ca, &mk_seq(cb, c2)), q),
        },
    }
}

/// The finite obligation set of a triple: duplicates collapsed, iteration
/// order deterministic but otherwise immaterial.
pub fn vcs(p: &Formula, u: &Update, c: &Stmt, q: &Formula) -> IndexSet<Formula> {
    vcgen(p, u, c, q).into_iter().map(|vc| vc.formula).collect()
}
