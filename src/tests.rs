use crate::ast::{Formula, Ident, Stmt, Triple};
use crate::ast_util::{
    formula_vars, ident_var, int_const, mk_assign, mk_if, mk_seq, mk_skip, mk_while, stmt_size,
    stmt_vars, str_ident,
};
use crate::derivation::{annotated_derivation, obligations, DerivationX, Mode};
use crate::interpreter::{exec, exec_bounded, satisfies, valid_triple_on, State};
use crate::parser::{node_to_bexpr, node_to_expr, node_to_formula, node_to_stmt};
use crate::print_parse::macro_push_node;
use crate::printer::{node_to_string, stmt_to_node, update_to_node};
use crate::update::Update;
use crate::vcgen::{vcgen, vcs, VcReason};
use indexmap::IndexSet;
use num_bigint::BigInt;
use sise::Node;
use std::sync::Arc;

macro_rules! expr {
    ( $x:tt ) => {
        node_to_expr(&node!($x)).unwrap()
    };
}

macro_rules! bexpr {
    ( $x:tt ) => {
        node_to_bexpr(&node!($x)).unwrap()
    };
}

macro_rules! formula {
    ( $x:tt ) => {
        node_to_formula(&node!($x)).unwrap()
    };
}

macro_rules! stmt {
    ( $x:tt ) => {
        node_to_stmt(&node!($x)).unwrap()
    };
}

/// Every variable a triple over `c` can observe, in discovery order.
fn gather_vars(pre: &Formula, c: &Stmt, post: &Formula) -> IndexSet<Ident> {
    let mut vars = IndexSet::new();
    formula_vars(pre, &mut vars);
    stmt_vars(c, &mut vars);
    formula_vars(post, &mut vars);
    vars
}

fn pool_vars(pool: &[Stmt]) -> IndexSet<Ident> {
    let mut vars = IndexSet::new();
    for c in pool.iter() {
        stmt_vars(c, &mut vars);
    }
    vars
}

/// All assignments of values in lo..=hi to the given variables; every
/// other identifier holds zero.
fn grid(vars: &IndexSet<Ident>, lo: i64, hi: i64) -> Vec<State> {
    let mut states = vec![State::zero()];
    for x in vars {
        let mut next = Vec::new();
        for s in states.iter() {
            for n in lo..=hi {
                next.push(s.set(x, BigInt::from(n)));
            }
        }
        states = next;
    }
    states
}

fn valid_on(states: &[State], f: &Formula) -> bool {
    states.iter().all(|s| satisfies(s, f))
}

#[test]
fn assign_over_constant_update() {
    let x = str_ident("x");
    let u = Update::constant(&int_const(2));
    let u1 = u.assign(&x, &expr!((+ x 13)));
    assert_eq!(u1.lookup(&x), expr!((+ 2 13)));
}

#[test]
fn assign_accumulates_symbolically() {
    let x = str_ident("x");
    let u = Update::identity().assign(&x, &expr!((+ x 10))).assign(&x, &expr!((+ x 20)));
    assert_eq!(u.lookup(&x), expr!((+ (+ x 10) 20)));
}

#[test]
fn symbolic_swap_through_temporary() {
    let x = str_ident("x");
    let y = str_ident("y");
    let t = str_ident("t");
    let u = Update::identity()
        .assign(&t, &ident_var(&x))
        .assign(&x, &ident_var(&y))
        .assign(&y, &ident_var(&t));
    assert_eq!(u.lookup(&y), ident_var(&x));
    assert_eq!(u.lookup(&x), ident_var(&y));
    assert_eq!(u.lookup(&t), ident_var(&x));
}

#[test]
fn swap_triple_either_association() {
    let pre = formula!((and (= x a) (= y b)));
    let post = formula!((and (= y a) (= x b)));
    let right = stmt!((seq (:= t x) (seq (:= x y) (:= y t))));
    let left = stmt!((seq (seq (:= t x) (:= x y)) (:= y t)));
    let u = Update::identity();
    let states = grid(&gather_vars(&pre, &right, &post), -1, 1);
    assert!(valid_triple_on(states.iter(), &Triple::new(&pre, &u, &right, &post)));
    assert!(valid_triple_on(states.iter(), &Triple::new(&pre, &u, &left, &post)));
    let vcs_right = vcs(&pre, &u, &right, &post);
    let vcs_left = vcs(&pre, &u, &left, &post);
    assert_eq!(vcs_right, vcs_left);
    for f in vcs_right.iter() {
        assert!(valid_on(&states, f), "invalid vc: {}", node_to_string(&crate::printer::formula_to_node(f)));
    }
}

#[test]
fn annotated_loop_emits_three_obligations() {
    let c = stmt!((while (< i n) (<= i n) (:= i (+ i 1))));
    let pre = formula!((<= i n));
    let post = formula!((= i n));
    let u = Update::identity();
    let out = vcgen(&pre, &u, &c, &post);
    let reasons: Vec<VcReason> = out.iter().map(|vc| vc.reason).collect();
    assert_eq!(
        reasons,
        vec![VcReason::InvariantEstablish, VcReason::InvariantExit, VcReason::Post]
    );
    let states = grid(&gather_vars(&pre, &c, &post), -3, 3);
    for vc in out.iter() {
        assert!(valid_on(&states, &vc.formula));
    }
    let triple = Triple::new(&pre, &u, &c, &post);
    assert!(valid_triple_on(states.iter(), &triple));
    let d = annotated_derivation(&c);
    assert_eq!(obligations(&d, Mode::Annotated, &triple).unwrap(), out);
}

#[test]
fn weak_invariant_fails_obligations_without_error() {
    // the invariant `true` is too weak for this postcondition; vcgen must
    // still terminate and return a set containing an invalid formula
    let c = stmt!((while (< i n) true (:= i (+ i 1))));
    let pre = formula!((<= i n));
    let post = formula!((= i n));
    let u = Update::identity();
    let out = vcgen(&pre, &u, &c, &post);
    let states = grid(&gather_vars(&pre, &c, &post), -3, 3);
    assert!(out.iter().any(|vc| !valid_on(&states, &vc.formula)));
    // the triple itself is still semantically valid: the program is simply
    // not well-annotated for it
    assert!(valid_triple_on(states.iter(), &Triple::new(&pre, &u, &c, &post)));
}

#[test]
fn loop_then_assignment() {
    let c = stmt!((seq (while (< i n) (<= i n) (:= i (+ i 1))) (:= r i)));
    let pre = formula!((<= i n));
    let post = formula!((= r n));
    let u = Update::identity();
    let out = vcgen(&pre, &u, &c, &post);
    let states = grid(&gather_vars(&pre, &c, &post), -2, 2);
    for vc in out.iter() {
        assert!(valid_on(&states, &vc.formula));
    }
    let triple = Triple::new(&pre, &u, &c, &post);
    assert!(valid_triple_on(states.iter(), &triple));
    let d = annotated_derivation(&c);
    assert_eq!(obligations(&d, Mode::Annotated, &triple).unwrap(), out);
}

#[test]
fn conditional_branches_are_independent() {
    let c = stmt!((seq (if (< x 0) (:= y (- 0 x)) (:= y x)) (:= z y)));
    let pre = formula!(true);
    let post = formula!((>= z 0));
    let u = Update::identity();
    let states = grid(&gather_vars(&pre, &c, &post), -2, 2);
    for f in vcs(&pre, &u, &c, &post).iter() {
        assert!(valid_on(&states, f));
    }
    let triple = Triple::new(&pre, &u, &c, &post);
    assert!(valid_triple_on(states.iter(), &triple));
    assert_eq!(obligations(&annotated_derivation(&c), Mode::Annotated, &triple).unwrap(),
               vcgen(&pre, &u, &c, &post));
}

#[test]
fn duplicate_obligations_collapse() {
    let w = stmt!((while (< x 0) (<= 0 x) skip));
    let c = mk_seq(&w, &w);
    let pre = formula!((<= 0 x));
    let post = formula!((<= 0 x));
    let u = Update::identity();
    let listed = vcgen(&pre, &u, &c, &post);
    let set = vcs(&pre, &u, &c, &post);
    assert!(set.len() < listed.len());
}

fn statement_pool() -> Vec<Stmt> {
    vec![
        stmt!(skip),
        stmt!((:= x (+ x 1))),
        stmt!((:= y (* x 2))),
        stmt!((if (< x y) (:= x y) (:= y (+ x 1)))),
        stmt!((while (< x 2) true (:= x (+ x 1)))),
        stmt!((seq (:= x (+ x 1)) (:= y (- y 1)))),
    ]
}

#[test]
fn execution_is_deterministic() {
    let pool = statement_pool();
    let states = grid(&pool_vars(&pool), -1, 1);
    for c in pool {
        for s in states.iter() {
            let s1 = exec(s, &c);
            let s2 = exec(s, &c);
            assert_eq!(s1, s2);
            let mut fuel = 1000;
            assert_eq!(exec_bounded(s, &c, &mut fuel), Some(s1));
        }
    }
}

#[test]
fn sequencing_is_associative() {
    let pool = statement_pool();
    let states = grid(&pool_vars(&pool), -1, 1);
    for c1 in pool.iter() {
        for c2 in pool.iter() {
            for c3 in pool.iter() {
                let l = mk_seq(&mk_seq(c1, c2), c3);
                let r = mk_seq(c1, &mk_seq(c2, c3));
                for s in states.iter() {
                    assert_eq!(exec(s, &l), exec(s, &r));
                }
            }
        }
    }
}

#[test]
fn size_metric_decreases_under_normalization() {
    let pool = statement_pool();
    for c in pool.iter() {
        assert!(stmt_size(c) >= 1);
    }
    for c1 in pool.iter() {
        for c2 in pool.iter() {
            for c3 in pool.iter() {
                // re-association
                assert!(
                    stmt_size(&mk_seq(&mk_seq(c1, c2), c3))
                        > stmt_size(&mk_seq(c1, &mk_seq(c2, c3)))
                );
                // peeling a skip or assignment head
                assert!(stmt_size(&mk_seq(&mk_skip(), c2)) > stmt_size(c2));
                let asn = mk_assign(&str_ident("x"), &int_const(0));
                assert!(stmt_size(&mk_seq(&asn, c2)) > stmt_size(c2));
                // branching into a conditional head
                let b = bexpr!((< x y));
                let iff = mk_if(&b, c1, c2);
                assert!(stmt_size(&mk_seq(&iff, c3)) > stmt_size(&mk_seq(c1, c3)));
                assert!(stmt_size(&mk_seq(&iff, c3)) > stmt_size(&mk_seq(c2, c3)));
                // splitting off a loop head
                let inv = formula!(true);
                let w = mk_while(&b, &inv, c1);
                assert!(stmt_size(&mk_seq(&w, c3)) > stmt_size(c1));
                assert!(stmt_size(&mk_seq(&w, c3)) > stmt_size(c3));
                assert!(stmt_size(&w) > stmt_size(c1));
                assert!(stmt_size(&iff) > stmt_size(c1));
                assert!(stmt_size(&iff) > stmt_size(c2));
            }
        }
    }
}

#[test]
fn grid_ranges_over_collected_variables() {
    let c = stmt!((while (< i n) (<= (+ i k) n) (:= i (+ i 1))));
    let vars = gather_vars(&formula!(true), &c, &formula!((= i n)));
    let names: Vec<&str> = vars.iter().map(|x| x.as_str()).collect();
    assert_eq!(names, vec!["i", "n", "k"]);
    assert_eq!(grid(&vars, 0, 1).len(), 8);
}

#[test]
fn free_mode_accepts_foreign_invariants() {
    let c = stmt!((while (< i n) (<= i n) (:= i (+ i 1))));
    let pre = formula!((<= i n));
    let post = formula!((= i n));
    let triple = Triple::new(&pre, &Update::identity(), &c, &post);
    // logically equivalent but syntactically different from the annotation
    let d = Arc::new(DerivationX::While {
        inv: formula!((and (<= i n) true)),
        body: Arc::new(DerivationX::Assign),
    });
    assert!(obligations(&d, Mode::Free, &triple).is_ok());
    assert!(obligations(&d, Mode::Annotated, &triple).is_err());
}

#[test]
fn derivation_shape_mismatch_is_an_error() {
    let c = stmt!((:= x 1));
    let triple = Triple::new(&formula!(true), &Update::identity(), &c, &formula!(true));
    let d = Arc::new(DerivationX::Skip);
    assert!(obligations(&d, Mode::Annotated, &triple).is_err());
}

#[test]
fn print_parse_round_trips() {
    let c = stmt!((seq (:= t x) (seq (if (< x y) skip (:= x y)) (while (< x 2) true (:= x (+ x 1))))));
    assert_eq!(node_to_stmt(&stmt_to_node(&c)).unwrap(), c);
    let p = formula!((=> (and (= x a) (bool (< x 3))) (or (= y b) (not false))));
    assert_eq!(node_to_formula(&crate::printer::formula_to_node(&p)).unwrap(), p);
    let rendered = node_to_string(&stmt_to_node(&c));
    assert!(rendered.contains("while"));
}

#[test]
fn update_rendering_smoke() {
    let x = str_ident("x");
    let u = Update::identity().assign(&x, &expr!((+ x 1)));
    let rendered = node_to_string(&update_to_node(&u));
    assert!(rendered.contains("update"));
    assert!(rendered.contains("x"));
}
