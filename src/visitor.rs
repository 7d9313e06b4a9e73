use crate::ast::{BExpr, BExprX, Expr, ExprX, Formula, FormulaX};
use std::sync::Arc;

pub(crate) fn map_expr_visitor<F: FnMut(&Expr) -> Expr>(expr: &Expr, f: &mut F) -> Expr {
    match &**expr {
        ExprX::Const(_) => f(expr),
        ExprX::Var(_) => f(expr),
        ExprX::Binary(op, e1, e2) => {
            let expr1 = map_expr_visitor(e1, f);
            let expr2 = map_expr_visitor(e2, f);
            let expr = Arc::new(ExprX::Binary(*op, expr1, expr2));
            f(&expr)
        }
    }
}

pub(crate) fn map_bexpr_expr_visitor<F: FnMut(&Expr) -> Expr>(bexpr: &BExpr, f: &mut F) -> BExpr {
    match &**bexpr {
        BExprX::Const(_) => bexpr.clone(),
        BExprX::Cmp(op, e1, e2) => {
            let expr1 = map_expr_visitor(e1, f);
            let expr2 = map_expr_visitor(e2, f);
            Arc::new(BExprX::Cmp(*op, expr1, expr2))
        }
        BExprX::Not(b) => Arc::new(BExprX::Not(map_bexpr_expr_visitor(b, f))),
        BExprX::Binary(op, b1, b2) => {
            let bexpr1 = map_bexpr_expr_visitor(b1, f);
            let bexpr2 = map_bexpr_expr_visitor(b2, f);
            Arc::new(BExprX::Binary(*op, bexpr1, bexpr2))
        }
    }
}

pub(crate) fn map_formula_expr_visitor<F: FnMut(&Expr) -> Expr>(
    formula: &Formula,
    f: &mut F,
) -> Formula {
    match &**formula {
        FormulaX::Const(_) => formula.clone(),
        FormulaX::Cmp(op, e1, e2) => {
            let expr1 = map_expr_visitor(e1, f);
            let expr2 = map_expr_visitor(e2, f);
            Arc::new(FormulaX::Cmp(*op, expr1, expr2))
        }
        FormulaX::Bool(b) => Arc::new(FormulaX::Bool(map_bexpr_expr_visitor(b, f))),
        FormulaX::Not(p) => Arc::new(FormulaX::Not(map_formula_expr_visitor(p, f))),
        FormulaX::Binary(op, p1, p2) => {
            let formula1 = map_formula_expr_visitor(p1, f);
            let formula2 = map_formula_expr_visitor(p2, f);
            Arc::new(FormulaX::Binary(*op, formula1, formula2))
        }
    }
}
