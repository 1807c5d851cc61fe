//! Integer arithmetic operators and their rewrite rules.
//!
//! Addition and subtraction share a linear-term collector: a nested
//! `+`/`-`/`neg`/constant-multiple tree is flattened into a constant plus a
//! coefficient per distinct term, then rebuilt in canonical order. The
//! rebuild only replaces the original when it is no larger, so every firing
//! either shrinks the tree or lands directly on the canonical form.

use super::traits::Operator;
use crate::tree::{node_cmp, walk, Node, Tree};
use crate::types::{Type, Value};
use anyhow::{bail, Result};
use std::sync::Arc;

fn int_pair(args: &[Value]) -> Result<(i64, i64)> {
    match args {
        [Value::Integer(a), Value::Integer(b)] => Ok((*a, *b)),
        _ => bail!("expected two integer arguments"),
    }
}

fn binary_integer() -> Vec<Type> {
    vec![Type::integer(), Type::integer()]
}

// --- Linear-term collection ---

/// Flatten an additive tree into (constant, distinct terms with signed
/// coefficients). Anything that is not a `+`, `-`, `neg` or constant
/// multiple is an opaque term.
fn collect_linear(tree: &Tree, sign: i64, constant: &mut i64, terms: &mut Vec<(Tree, i64)>) {
    match tree.as_ref() {
        Node::Constant {
            value: Value::Integer(c),
            ..
        } => *constant = constant.wrapping_add(sign.wrapping_mul(*c)),
        Node::Function { op, children } => match op.symbol() {
            "+" => {
                collect_linear(&children[0], sign, constant, terms);
                collect_linear(&children[1], sign, constant, terms);
            }
            "-" => {
                collect_linear(&children[0], sign, constant, terms);
                collect_linear(&children[1], sign.wrapping_neg(), constant, terms);
            }
            "neg" => collect_linear(&children[0], sign.wrapping_neg(), constant, terms),
            "*" => match (
                children[0].as_integer_constant(),
                children[1].as_integer_constant(),
            ) {
                (Some(c), None) => add_term(terms, &children[1], sign.wrapping_mul(c)),
                (None, Some(c)) => add_term(terms, &children[0], sign.wrapping_mul(c)),
                _ => add_term(terms, tree, sign),
            },
            _ => add_term(terms, tree, sign),
        },
        _ => add_term(terms, tree, sign),
    }
}

fn add_term(terms: &mut Vec<(Tree, i64)>, tree: &Tree, coefficient: i64) {
    for (existing, coeff) in terms.iter_mut() {
        if existing.as_ref() == tree.as_ref() {
            *coeff = coeff.wrapping_add(coefficient);
            return;
        }
    }
    terms.push((tree.clone(), coefficient));
}

fn scaled_term(tree: Tree, coefficient: i64) -> Tree {
    match coefficient {
        1 => tree,
        -1 => Node::call(Arc::new(Neg), vec![tree]),
        c => Node::call(Arc::new(Mul), vec![Node::integer(c), tree]),
    }
}

/// Canonical rebuild of collected linear terms: the constant first, then
/// terms in structural order, left-folded over `+`.
fn rebuild_linear(constant: i64, mut terms: Vec<(Tree, i64)>) -> Tree {
    terms.retain(|(_, coeff)| *coeff != 0);
    terms.sort_by(|(a, _), (b, _)| node_cmp(a.as_ref(), b.as_ref()));

    let mut acc = if constant != 0 || terms.is_empty() {
        Some(Node::integer(constant))
    } else {
        None
    };
    for (tree, coeff) in terms {
        let term = scaled_term(tree, coeff);
        acc = Some(match acc {
            None => term,
            Some(sum) => Node::call(Arc::new(Add), vec![sum, term]),
        });
    }
    acc.unwrap_or_else(|| Node::integer(0))
}

/// Shared rule body for `+` and `-`: fires when the canonical linear form
/// differs from the original without growing it.
fn simplify_additive(original: &Tree, lhs_sign: i64, rhs_sign: i64) -> Option<Tree> {
    let children = original.children();
    let mut constant = 0i64;
    let mut terms = Vec::new();
    collect_linear(&children[0], lhs_sign, &mut constant, &mut terms);
    collect_linear(&children[1], rhs_sign, &mut constant, &mut terms);

    let rebuilt = rebuild_linear(constant, terms);
    if rebuilt.as_ref() != original.as_ref() && walk::size(&rebuilt) <= walk::size(original) {
        Some(rebuilt)
    } else {
        None
    }
}

// --- Operators ---

#[derive(Debug, Clone, Copy)]
pub struct Add;

impl Operator for Add {
    fn name(&self) -> &'static str {
        "Add"
    }
    fn symbol(&self) -> &'static str {
        "+"
    }
    fn return_type(&self) -> Type {
        Type::integer()
    }
    fn input_types(&self) -> Vec<Type> {
        binary_integer()
    }
    fn commutative(&self) -> bool {
        true
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Integer(a.wrapping_add(b)))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let original = Node::call(Arc::new(Add), children.to_vec());
        simplify_additive(&original, 1, 1)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sub;

impl Operator for Sub {
    fn name(&self) -> &'static str {
        "Sub"
    }
    fn symbol(&self) -> &'static str {
        "-"
    }
    fn return_type(&self) -> Type {
        Type::integer()
    }
    fn input_types(&self) -> Vec<Type> {
        binary_integer()
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Integer(a.wrapping_sub(b)))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let original = Node::call(Arc::new(Sub), children.to_vec());
        simplify_additive(&original, 1, -1)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Mul;

impl Operator for Mul {
    fn name(&self) -> &'static str {
        "Mul"
    }
    fn symbol(&self) -> &'static str {
        "*"
    }
    fn return_type(&self) -> Type {
        Type::integer()
    }
    fn input_types(&self) -> Vec<Type> {
        binary_integer()
    }
    fn commutative(&self) -> bool {
        true
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Integer(a.wrapping_mul(b)))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        match (a.as_integer_constant(), b.as_integer_constant()) {
            (Some(x), Some(y)) => return Some(Node::integer(x.wrapping_mul(y))),
            (Some(0), _) | (_, Some(0)) => return Some(Node::integer(0)),
            (Some(1), _) => return Some(b.clone()),
            (_, Some(1)) => return Some(a.clone()),
            _ => {}
        }
        // fold a constant factor through a nested constant multiple
        for (c, other) in [(a, b), (b, a)] {
            if let Some(x) = c.as_integer_constant() {
                if let Node::Function { op, children } = other.as_ref() {
                    if op.symbol() == "*" {
                        if let Some(y) = children[0].as_integer_constant() {
                            return Some(Node::call(
                                Arc::new(Mul),
                                vec![Node::integer(x.wrapping_mul(y)), children[1].clone()],
                            ));
                        }
                        if let Some(y) = children[1].as_integer_constant() {
                            return Some(Node::call(
                                Arc::new(Mul),
                                vec![Node::integer(x.wrapping_mul(y)), children[0].clone()],
                            ));
                        }
                    }
                }
            }
        }
        if node_cmp(a.as_ref(), b.as_ref()) == std::cmp::Ordering::Greater {
            return Some(Node::call(Arc::new(Mul), vec![b.clone(), a.clone()]));
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Div;

impl Operator for Div {
    fn name(&self) -> &'static str {
        "Div"
    }
    fn symbol(&self) -> &'static str {
        "/"
    }
    fn return_type(&self) -> Type {
        Type::integer()
    }
    fn input_types(&self) -> Vec<Type> {
        binary_integer()
    }
    /// Protected division: a zero divisor yields zero.
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Integer(if b == 0 { 0 } else { a.wrapping_div(b) }))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        match (a.as_integer_constant(), b.as_integer_constant()) {
            (_, Some(0)) => return Some(Node::integer(0)),
            (Some(x), Some(y)) => return Some(Node::integer(x.wrapping_div(y))),
            (Some(0), _) => return Some(Node::integer(0)),
            (_, Some(1)) => return Some(a.clone()),
            _ => {}
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Neg;

impl Operator for Neg {
    fn name(&self) -> &'static str {
        "Neg"
    }
    fn symbol(&self) -> &'static str {
        "neg"
    }
    fn return_type(&self) -> Type {
        Type::integer()
    }
    fn input_types(&self) -> Vec<Type> {
        vec![Type::integer()]
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::Integer(a)] => Ok(Value::Integer(a.wrapping_neg())),
            _ => bail!("expected one integer argument"),
        }
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let child = &children[0];
        if let Some(c) = child.as_integer_constant() {
            return Some(Node::integer(c.wrapping_neg()));
        }
        if let Node::Function { op, children } = child.as_ref() {
            if op.symbol() == "neg" {
                return Some(children[0].clone());
            }
        }
        None
    }
}
