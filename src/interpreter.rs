//! The reference semantics: total states, evaluation, and big-step
//! execution. This is the correctness oracle for everything else; the VC
//! generator never calls into it.

use crate::ast::{
    BExpr, BExprX, BinaryOp, BoolOp, CmpOp, Expr, ExprX, Formula, FormulaOp, FormulaX, Ident, Stmt,
    StmtX, Triple,
};
use im::OrdMap;
use num_bigint::BigInt;
use num_traits::Zero;

/// A total valuation of program variables. Identifiers outside the finite
/// support all hold `default`, so the conceptually infinite domain stays
/// finitely represented. `set` is functional and never stores an entry
/// equal to the default, which makes derived equality compare observable
/// content rather than storage layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    vals: OrdMap<Ident, BigInt>,
    default: BigInt,
}

impl State {
    pub fn zero() -> State {
        State::constant(BigInt::zero())
    }

    pub fn constant(n: BigInt) -> State {
        State { vals: OrdMap::new(), default: n }
    }

    pub fn get(&self, x: &Ident) -> BigInt {
        match self.vals.get(x) {
            Some(n) => n.clone(),
            None => self.default.clone(),
        }
    }

    pub fn set(&self, x: &Ident, n: BigInt) -> State {
        let mut vals = self.vals.clone();
        if n == self.default {
            vals.remove(x);
        } else {
            vals.insert(x.clone(), n);
        }
        State { vals, default: self.default.clone() }
    }
}

pub fn eval_expr(state: &State, expr: &Expr) -> BigInt {
    match &**expr {
        ExprX::Const(n) => n.clone(),
        ExprX::Var(x) => state.get(x),
        ExprX::Binary(op, e1, e2) => {
            let n1 = eval_expr(state, e1);
            let n2 = eval_expr(state, e2);
            match op {
                BinaryOp::Add => n1 + n2,
                BinaryOp::Sub => n1 - n2,
                BinaryOp::Mul => n1 * n2,
            }
        }
    }
}

fn eval_cmp(op: CmpOp, n1: &BigInt, n2: &BigInt) -> bool {
    match op {
        CmpOp::Eq => n1 == n2,
        CmpOp::Lt => n1 < n2,
        CmpOp::Le => n1 <= n2,
        CmpOp::Gt => n1 > n2,
        CmpOp::Ge => n1 >= n2,
    }
}

pub fn eval_bexpr(state: &State, bexpr: &BExpr) -> bool {
    match &**bexpr {
        BExprX::Const(b) => *b,
        BExprX::Cmp(op, e1, e2) => eval_cmp(*op, &eval_expr(state, e1), &eval_expr(state, e2)),
        BExprX::Not(b) => !eval_bexpr(state, b),
        BExprX::Binary(BoolOp::And, b1, b2) => eval_bexpr(state, b1) && eval_bexpr(state, b2),
        BExprX::Binary(BoolOp::Or, b1, b2) => eval_bexpr(state, b1) || eval_bexpr(state, b2),
    }
}

pub fn satisfies(state: &State, formula: &Formula) -> bool {
    match &**formula {
        FormulaX::Const(b) => *b,
        FormulaX::Cmp(op, e1, e2) => eval_cmp(*op, &eval_expr(state, e1), &eval_expr(state, e2)),
        FormulaX::Bool(b) => eval_bexpr(state, b),
        FormulaX::Not(p) => !satisfies(state, p),
        FormulaX::Binary(FormulaOp::And, p1, p2) => {
            satisfies(state, p1) && satisfies(state, p2)
        }
        FormulaX::Binary(FormulaOp::Or, p1, p2) => satisfies(state, p1) || satisfies(state, p2),
        FormulaX::Binary(FormulaOp::Implies, p1, p2) => {
            !satisfies(state, p1) || satisfies(state, p2)
        }
    }
}

/// Big-step execution. Assignment updates one binding by direct
/// evaluation, never through the update algebra. A loop whose guard never
/// turns false simply does not return; divergence has no distinguished
/// value in the semantics.
pub fn exec(state: &State, stmt: &Stmt) -> State {
    match &**stmt {
        StmtX::Skip => state.clone(),
        StmtX::Assign(x, e) => state.set(x, eval_expr(state, e)),
        StmtX::If(b, c1, c2) => {
            if eval_bexpr(state, b) {
                exec(state, c1)
            } else {
                exec(state, c2)
            }
        }
        StmtX::While(b, _inv, body) => {
            let mut s = state.clone();
            while eval_bexpr(&s, b) {
                s = exec(&s, body);
            }
            s
        }
        StmtX::Seq(c1, c2) => exec(&exec(state, c1), c2),
    }
}

/// Fuel-bounded execution for tests that must stay total; one unit of fuel
/// is spent per loop iteration. `None` means the fuel ran out, never an
/// error.
pub fn exec_bounded(state: &State, stmt: &Stmt, fuel: &mut u64) -> Option<State> {
    match &**stmt {
        StmtX::Skip => Some(state.clone()),
        StmtX::Assign(x, e) => Some(state.set(x, eval_expr(state, e))),
        StmtX::If(b, c1, c2) => {
            if eval_bexpr(state, b) {
                exec_bounded(state, c1, fuel)
            } else {
                exec_bounded(state, c2, fuel)
            }
        }
        StmtX::While(b, _inv, body) => {
            let mut s = state.clone();
            while eval_bexpr(&s, b) {
                if *fuel == 0 {
                    return None;
                }
                *fuel -= 1;
                s = exec_bounded(&s, body, fuel)?;
            }
            Some(s)
        }
        StmtX::Seq(c1, c2) => {
            let s = exec_bounded(state, c1, fuel)?;
            exec_bounded(&s, c2, fuel)
        }
    }
}

/// Hoare validity of a triple, checked pointwise over a supplied family of
/// initial states. Validity proper quantifies over all states; callers
/// instantiate it over whatever family they can enumerate.
pub fn valid_triple_on<'a, I>(states: I, triple: &Triple) -> bool
where
    I: IntoIterator<Item = &'a State>,
{
    let Triple { pre, update, stmt, post } = triple;
    for s in states {
        if satisfies(s, pre) {
            let s1 = exec(&update.apply_state(s), stmt);
            if !satisfies(&s1, post) {
                return false;
            }
        }
    }
    true
}
