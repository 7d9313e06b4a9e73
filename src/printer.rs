use crate::ast::{
    BExpr, BExprX, BinaryOp, BoolOp, CmpOp, Expr, ExprX, Formula, FormulaOp, FormulaX, Stmt, StmtX,
};
use crate::update::Update;
use sise::{Node, Writer};

pub fn str_to_node(s: &str) -> Node {
    Node::Atom(s.to_string())
}

fn cmp_str(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "=",
        CmpOp::Lt => "<",
        CmpOp::Le => "<=",
        CmpOp::Gt => ">",
        CmpOp::Ge => ">=",
    }
}

pub fn expr_to_node(expr: &Expr) -> Node {
    match &**expr {
        ExprX::Const(n) => Node::Atom(n.to_string()),
        ExprX::Var(x) => Node::Atom(x.to_string()),
        ExprX::Binary(op, e1, e2) => {
            let sop = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
            };
            Node::List(vec![str_to_node(sop), expr_to_node(e1), expr_to_node(e2)])
        }
    }
}

pub fn bexpr_to_node(bexpr: &BExpr) -> Node {
    match &**bexpr {
        BExprX::Const(b) => Node::Atom(b.to_string()),
        BExprX::Cmp(op, e1, e2) => {
            Node::List(vec![str_to_node(cmp_str(*op)), expr_to_node(e1), expr_to_node(e2)])
        }
        BExprX::Not(b) => Node::List(vec![str_to_node("not"), bexpr_to_node(b)]),
        BExprX::Binary(op, b1, b2) => {
            let sop = match op {
                BoolOp::And => "and",
                BoolOp::Or => "or",
            };
            Node::List(vec![str_to_node(sop), bexpr_to_node(b1), bexpr_to_node(b2)])
        }
    }
}

pub fn formula_to_node(formula: &Formula) -> Node {
    match &**formula {
        FormulaX::Const(b) => Node::Atom(b.to_string()),
        FormulaX::Cmp(op, e1, e2) => {
            Node::List(vec![str_to_node(cmp_str(*op)), expr_to_node(e1), expr_to_node(e2)])
        }
        FormulaX::Bool(b) => Node::List(vec![str_to_node("bool"), bexpr_to_node(b)]),
        FormulaX::Not(p) => Node::List(vec![str_to_node("not"), formula_to_node(p)]),
        FormulaX::Binary(op, p1, p2) => {
            let sop = match op {
                FormulaOp::And => "and",
                FormulaOp::Or => "or",
                FormulaOp::Implies => "=>",
            };
            Node::List(vec![str_to_node(sop), formula_to_node(p1), formula_to_node(p2)])
        }
    }
}

pub fn stmt_to_node(stmt: &Stmt) -> Node {
    match &**stmt {
        StmtX::Skip => str_to_node("skip"),
        StmtX::Assign(x, e) => {
            Node::List(vec![str_to_node(":="), Node::Atom(x.to_string()), expr_to_node(e)])
        }
        StmtX::If(b, c1, c2) => Node::List(vec![
            str_to_node("if"),
            bexpr_to_node(b),
            stmt_to_node(c1),
            stmt_to_node(c2),
        ]),
        StmtX::While(b, inv, body) => Node::List(vec![
            str_to_node("while"),
            bexpr_to_node(b),
            formula_to_node(inv),
            stmt_to_node(body),
        ]),
        StmtX::Seq(c1, c2) => {
            Node::List(vec![str_to_node("seq"), stmt_to_node(c1), stmt_to_node(c2)])
        }
    }
}

pub fn update_to_node(update: &Update) -> Node {
    let mut nodes: Vec<Node> = Vec::new();
    nodes.push(str_to_node("update"));
    if let Some(e) = update.default_expr() {
        nodes.push(Node::List(vec![str_to_node("default"), expr_to_node(e)]));
    }
    for (x, e) in update.iter() {
        nodes.push(Node::List(vec![Node::Atom(x.to_string()), expr_to_node(e)]));
    }
    Node::List(nodes)
}

pub(crate) fn write_node(
    writer: &mut sise::SpacedStringWriter,
    node: &Node,
    break_len: usize,
    brk: bool,
) {
    let opts =
        sise::SpacedStringWriterNodeOptions { break_line_len: if brk { 0 } else { break_len } };
    match node {
        Node::Atom(a) => {
            writer.write_atom(a, opts).unwrap();
        }
        Node::List(l) => {
            writer.begin_list(opts).unwrap();
            let mut brk = false;
            for n in l {
                write_node(writer, n, break_len + 1, brk);
                match n {
                    Node::Atom(a)
                        if a == "=>" || a == "and" || a == "or" || a == "seq" || a == "while"
                            || a == "if" || a == "update" =>
                    {
                        brk = true;
                    }
                    _ => {}
                }
            }
            writer.end_list(()).unwrap();
        }
    }
}

pub fn node_to_string(node: &Node) -> String {
    let line_break = "\n".to_string();
    let style = sise::SpacedStringWriterStyle { line_break: &line_break, indentation: " " };
    let mut result = String::new();
    let mut string_writer = sise::SpacedStringWriter::new(style, &mut result);
    write_node(&mut string_writer, node, 80, false);
    string_writer.finish(()).unwrap();
    result
}
