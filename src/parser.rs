use crate::ast::{
    BExpr, BExprX, BinaryOp, BoolOp, CmpOp, Expr, ExprX, Formula, FormulaX, Ident, Stmt, StmtX,
};
use crate::ast_util::{mk_seq, str_ident};
use crate::printer::node_to_string;
use num_bigint::BigInt;
use sise::Node;
use std::sync::Arc;

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "~!@$%^&_.?".contains(c)
}

fn is_symbol(s: &String) -> bool {
    match s.chars().next() {
        None => false,
        Some(c) => !c.is_ascii_digit() && s.chars().all(is_symbol_char),
    }
}

fn is_integer(s: &String) -> bool {
    let digits = if s.starts_with('-') { &s[1..] } else { &s[..] };
    digits.len() > 0 && digits.chars().all(|c| c.is_ascii_digit())
}

fn node_to_cmp(node: &Node) -> Option<CmpOp> {
    match node {
        Node::Atom(s) if s.to_string() == "=" => Some(CmpOp::Eq),
        Node::Atom(s) if s.to_string() == "<" => Some(CmpOp::Lt),
        Node::Atom(s) if s.to_string() == "<=" => Some(CmpOp::Le),
        Node::Atom(s) if s.to_string() == ">" => Some(CmpOp::Gt),
        Node::Atom(s) if s.to_string() == ">=" => Some(CmpOp::Ge),
        _ => None,
    }
}

pub fn node_to_expr(node: &Node) -> Result<Expr, String> {
    match node {
        Node::Atom(s) if is_integer(s) => {
            let n = s.parse::<BigInt>().map_err(|_| format!("integer out of form: {}", s))?;
            Ok(Arc::new(ExprX::Const(n)))
        }
        Node::Atom(s) if is_symbol(s) => Ok(Arc::new(ExprX::Var(str_ident(s)))),
        Node::List(nodes) if nodes.len() == 3 => {
            let op = match &nodes[0] {
                Node::Atom(s) if s.to_string() == "+" => Some(BinaryOp::Add),
                Node::Atom(s) if s.to_string() == "-" => Some(BinaryOp::Sub),
                Node::Atom(s) if s.to_string() == "*" => Some(BinaryOp::Mul),
                _ => None,
            };
            match op {
                Some(op) => {
                    let e1 = node_to_expr(&nodes[1])?;
                    let e2 = node_to_expr(&nodes[2])?;
                    Ok(Arc::new(ExprX::Binary(op, e1, e2)))
                }
                None => Err(format!("expected expression, found: {}", node_to_string(node))),
            }
        }
        _ => Err(format!("expected expression, found: {}", node_to_string(node))),
    }
}

pub fn node_to_bexpr(node: &Node) -> Result<BExpr, String> {
    match node {
        Node::Atom(s) if s.to_string() == "true" => Ok(Arc::new(BExprX::Const(true))),
        Node::Atom(s) if s.to_string() == "false" => Ok(Arc::new(BExprX::Const(false))),
        Node::List(nodes) if nodes.len() > 0 => {
            if let (Some(op), 3) = (node_to_cmp(&nodes[0]), nodes.len()) {
                let e1 = node_to_expr(&nodes[1])?;
                let e2 = node_to_expr(&nodes[2])?;
                return Ok(Arc::new(BExprX::Cmp(op, e1, e2)));
            }
            match &nodes[0] {
                Node::Atom(s) if s.to_string() == "not" && nodes.len() == 2 => {
                    Ok(Arc::new(BExprX::Not(node_to_bexpr(&nodes[1])?)))
                }
                Node::Atom(s) if s.to_string() == "and" && nodes.len() >= 3 => {
                    fold_bexpr(BoolOp::And, &nodes[1..])
                }
                Node::Atom(s) if s.to_string() == "or" && nodes.len() >= 3 => {
                    fold_bexpr(BoolOp::Or, &nodes[1..])
                }
                _ => Err(format!(
                    "expected boolean expression, found: {}",
                    node_to_string(node)
                )),
            }
        }
        _ => Err(format!("expected boolean expression, found: {}", node_to_string(node))),
    }
}

fn fold_bexpr(op: BoolOp, nodes: &[Node]) -> Result<BExpr, String> {
    let mut b = node_to_bexpr(&nodes[nodes.len() - 1])?;
    for node in nodes[..nodes.len() - 1].iter().rev() {
        b = Arc::new(BExprX::Binary(op, node_to_bexpr(node)?, b));
    }
    Ok(b)
}

pub fn node_to_formula(node: &Node) -> Result<Formula, String> {
    match node {
        Node::Atom(s) if s.to_string() == "true" => Ok(Arc::new(FormulaX::Const(true))),
        Node::Atom(s) if s.to_string() == "false" => Ok(Arc::new(FormulaX::Const(false))),
        Node::List(nodes) if nodes.len() > 0 => {
            if let (Some(op), 3) = (node_to_cmp(&nodes[0]), nodes.len()) {
                let e1 = node_to_expr(&nodes[1])?;
                let e2 = node_to_expr(&nodes[2])?;
                return Ok(Arc::new(FormulaX::Cmp(op, e1, e2)));
            }
            match &nodes[0] {
                Node::Atom(s) if s.to_string() == "bool" && nodes.len() == 2 => {
                    Ok(Arc::new(FormulaX::Bool(node_to_bexpr(&nodes[1])?)))
                }
                Node::Atom(s) if s.to_string() == "not" && nodes.len() == 2 => {
                    Ok(Arc::new(FormulaX::Not(node_to_formula(&nodes[1])?)))
                }
                Node::Atom(s) if s.to_string() == "and" && nodes.len() >= 3 => {
                    fold_formula(crate::ast::FormulaOp::And, &nodes[1..])
                }
                Node::Atom(s) if s.to_string() == "or" && nodes.len() >= 3 => {
                    fold_formula(crate::ast::FormulaOp::Or, &nodes[1..])
                }
                Node::Atom(s) if s.to_string() == "=>" && nodes.len() >= 3 => {
                    fold_formula(crate::ast::FormulaOp::Implies, &nodes[1..])
                }
                _ => Err(format!("expected formula, found: {}", node_to_string(node))),
            }
        }
        _ => Err(format!("expected formula, found: {}", node_to_string(node))),
    }
}

fn fold_formula(op: crate::ast::FormulaOp, nodes: &[Node]) -> Result<Formula, String> {
    let mut p = node_to_formula(&nodes[nodes.len() - 1])?;
    for node in nodes[..nodes.len() - 1].iter().rev() {
        p = Arc::new(FormulaX::Binary(op, node_to_formula(node)?, p));
    }
    Ok(p)
}

fn node_to_ident(node: &Node) -> Result<Ident, String> {
    match node {
        Node::Atom(s) if is_symbol(s) => Ok(str_ident(s)),
        _ => Err(format!("expected identifier, found: {}", node_to_string(node))),
    }
}

/// `(seq c1 c2 ...)` with three or more statements folds to the right, so
/// a left-nested sequence must be written with explicit nesting.
pub fn node_to_stmt(node: &Node) -> Result<Stmt, String> {
    match node {
        Node::Atom(s) if s.to_string() == "skip" => Ok(Arc::new(StmtX::Skip)),
        Node::List(nodes) if nodes.len() > 0 => match &nodes[0] {
            Node::Atom(s) if s.to_string() == ":=" && nodes.len() == 3 => {
                let x = node_to_ident(&nodes[1])?;
                let e = node_to_expr(&nodes[2])?;
                Ok(Arc::new(StmtX::Assign(x, e)))
            }
            Node::Atom(s) if s.to_string() == "if" && nodes.len() == 4 => {
                let b = node_to_bexpr(&nodes[1])?;
                let c1 = node_to_stmt(&nodes[2])?;
                let c2 = node_to_stmt(&nodes[3])?;
                Ok(Arc::new(StmtX::If(b, c1, c2)))
            }
            Node::Atom(s) if s.to_string() == "while" && nodes.len() == 4 => {
                let b = node_to_bexpr(&nodes[1])?;
                let inv = node_to_formula(&nodes[2])?;
                let body = node_to_stmt(&nodes[3])?;
                Ok(Arc::new(StmtX::While(b, inv, body)))
            }
            Node::Atom(s) if s.to_string() == "seq" && nodes.len() >= 3 => {
                let mut c = node_to_stmt(&nodes[nodes.len() - 1])?;
                for node in nodes[1..nodes.len() - 1].iter().rev() {
                    c = mk_seq(&node_to_stmt(node)?, &c);
                }
                Ok(c)
            }
            _ => Err(format!("expected statement, found: {}", node_to_string(node))),
        },
        _ => Err(format!("expected statement, found: {}", node_to_string(node))),
    }
}
