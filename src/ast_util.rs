use crate::ast::{
    BExpr, BExprX, BinaryOp, CmpOp, Expr, ExprX, Formula, FormulaOp, FormulaX, Ident, Stmt, StmtX,
};
use indexmap::IndexSet;
use num_bigint::BigInt;
use std::sync::Arc;

pub fn str_ident(x: &str) -> Ident {
    Arc::new(x.to_string())
}

pub fn ident_var(x: &Ident) -> Expr {
    Arc::new(ExprX::Var(x.clone()))
}

pub fn str_var(x: &str) -> Expr {
    Arc::new(ExprX::Var(Arc::new(x.to_string())))
}

pub fn int_const(i: i64) -> Expr {
    Arc::new(ExprX::Const(BigInt::from(i)))
}

pub fn mk_bin(op: BinaryOp, e1: &Expr, e2: &Expr) -> Expr {
    Arc::new(ExprX::Binary(op, e1.clone(), e2.clone()))
}

pub fn b_cmp(op: CmpOp, e1: &Expr, e2: &Expr) -> BExpr {
    Arc::new(BExprX::Cmp(op, e1.clone(), e2.clone()))
}

pub fn b_not(b: &BExpr) -> BExpr {
    Arc::new(BExprX::Not(b.clone()))
}

pub fn f_cmp(op: CmpOp, e1: &Expr, e2: &Expr) -> Formula {
    Arc::new(FormulaX::Cmp(op, e1.clone(), e2.clone()))
}

pub fn f_bool(b: &BExpr) -> Formula {
    Arc::new(FormulaX::Bool(b.clone()))
}

pub fn f_and(p1: &Formula, p2: &Formula) -> Formula {
    Arc::new(FormulaX::Binary(FormulaOp::And, p1.clone(), p2.clone()))
}

pub fn f_implies(p1: &Formula, p2: &Formula) -> Formula {
    Arc::new(FormulaX::Binary(FormulaOp::Implies, p1.clone(), p2.clone()))
}

pub fn mk_skip() -> Stmt {
    Arc::new(StmtX::Skip)
}

pub fn mk_assign(x: &Ident, e: &Expr) -> Stmt {
    Arc::new(StmtX::Assign(x.clone(), e.clone()))
}

pub fn mk_if(b: &BExpr, c1: &Stmt, c2: &Stmt) -> Stmt {
    Arc::new(StmtX::If(b.clone(), c1.clone(), c2.clone()))
}

pub fn mk_while(b: &BExpr, inv: &Formula, body: &Stmt) -> Stmt {
    Arc::new(StmtX::While(b.clone(), inv.clone(), body.clone()))
}

pub fn mk_seq(c1: &Stmt, c2: &Stmt) -> Stmt {
    Arc::new(StmtX::Seq(c1.clone(), c2.clone()))
}

/// Termination measure for every sequence-normalizing recursion over
/// statements. The left operand of a sequence is weighted double so that
/// re-associating `seq(seq(c1, c2), c3)` to `seq(c1, seq(c2, c3))` strictly
/// decreases the measure; naive node counting would leave it unchanged.
pub fn stmt_size(stmt: &Stmt) -> u64 {
    match &**stmt {
        StmtX::Skip => 1,
        StmtX::Assign(_, _) => 1,
        StmtX::If(_, c1, c2) => 1 + stmt_size(c1) + stmt_size(c2),
        StmtX::While(_, _, body) => 1 + stmt_size(body),
        StmtX::Seq(c1, c2) => 1 + 2 * stmt_size(c1) + stmt_size(c2),
    }
}

pub fn expr_vars(expr: &Expr, vars: &mut IndexSet<Ident>) {
    match &**expr {
        ExprX::Const(_) => {}
        ExprX::Var(x) => {
            vars.insert(x.clone());
        }
        ExprX::Binary(_, e1, e2) => {
            expr_vars(e1, vars);
            expr_vars(e2, vars);
        }
    }
}

pub fn bexpr_vars(bexpr: &BExpr, vars: &mut IndexSet<Ident>) {
    match &**bexpr {
        BExprX::Const(_) => {}
        BExprX::Cmp(_, e1, e2) => {
            expr_vars(e1, vars);
            expr_vars(e2, vars);
        }
        BExprX::Not(b) => bexpr_vars(b, vars),
        BExprX::Binary(_, b1, b2) => {
            bexpr_vars(b1, vars);
            bexpr_vars(b2, vars);
        }
    }
}

pub fn formula_vars(formula: &Formula, vars: &mut IndexSet<Ident>) {
    match &**formula {
        FormulaX::Const(_) => {}
        FormulaX::Cmp(_, e1, e2) => {
            expr_vars(e1, vars);
            expr_vars(e2, vars);
        }
        FormulaX::Bool(b) => bexpr_vars(b, vars),
        FormulaX::Not(p) => formula_vars(p, vars),
        FormulaX::Binary(_, p1, p2) => {
            formula_vars(p1, vars);
            formula_vars(p2, vars);
        }
    }
}

pub fn stmt_vars(stmt: &Stmt, vars: &mut IndexSet<Ident>) {
    match &**stmt {
        StmtX::Skip => {}
        StmtX::Assign(x, e) => {
            vars.insert(x.clone());
            expr_vars(e, vars);
        }
        StmtX::If(b, c1, c2) => {
            bexpr_vars(b, vars);
            stmt_vars(c1, vars);
            stmt_vars(c2, vars);
        }
        StmtX::While(b, inv, body) => {
            bexpr_vars(b, vars);
            formula_vars(inv, vars);
            stmt_vars(body, vars);
        }
        StmtX::Seq(c1, c2) => {
            stmt_vars(c1, vars);
            stmt_vars(c2, vars);
        }
    }
}
