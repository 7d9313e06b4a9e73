use crate::update::Update;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Program variables are opaque atoms; ordering and hashing are all the
/// core ever asks of them.
pub type Ident = Arc<String>;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

pub type Expr = Arc<ExprX>;
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExprX {
    Const(BigInt),
    Var(Ident),
    Binary(BinaryOp, Expr, Expr),
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

pub type BExpr = Arc<BExprX>;
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BExprX {
    Const(bool),
    Cmp(CmpOp, Expr, Expr),
    Not(BExpr),
    Binary(BoolOp, BExpr, BExpr),
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FormulaOp {
    And,
    Or,
    Implies,
}

/// Quantifier-free assertions over program states. A strict superset of
/// BExpr: a Boolean program expression embeds via FormulaX::Bool.
pub type Formula = Arc<FormulaX>;
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FormulaX {
    Const(bool),
    Cmp(CmpOp, Expr, Expr),
    Bool(BExpr),
    Not(Formula),
    Binary(FormulaOp, Formula, Formula),
}

pub type Stmt = Arc<StmtX>;
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StmtX {
    Skip,
    Assign(Ident, Expr),
    If(BExpr, Stmt, Stmt),
    // the Formula is the loop invariant annotation; execution ignores it,
    // only the annotation-directed system and the VC generator read it
    While(BExpr, Formula, Stmt),
    Seq(Stmt, Stmt),
}

/// A Hoare triple with an explicit update sitting between the precondition
/// and the statement: `{pre} update statement {post}`. Built ad hoc per
/// judgment, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    pub pre: Formula,
    pub update: Update,
    pub stmt: Stmt,
    pub post: Formula,
}

impl Triple {
    pub fn new(pre: &Formula, update: &Update, stmt: &Stmt, post: &Formula) -> Triple {
        Triple {
            pre: pre.clone(),
            update: update.clone(),
            stmt: stmt.clone(),
            post: post.clone(),
        }
    }
}
