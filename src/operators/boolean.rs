//! Boolean operators: constant absorption, duplicate and opposite collapse,
//! absorption across and/or, and canonical argument ordering so that
//! structurally equivalent expressions normalize to one tree.

use super::traits::Operator;
use crate::tree::{node_cmp, Node, Tree};
use crate::types::{Type, Value};
use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::sync::Arc;

fn bool_pair(args: &[Value]) -> Result<(bool, bool)> {
    match args {
        [Value::Bool(a), Value::Bool(b)] => Ok((*a, *b)),
        _ => bail!("expected two boolean arguments"),
    }
}

fn binary_boolean() -> Vec<Type> {
    vec![Type::boolean(), Type::boolean()]
}

/// `a` and `b` are logical opposites when one is the negation of the other.
fn opposites(a: &Tree, b: &Tree) -> bool {
    let negated = |x: &Tree, y: &Tree| {
        matches!(x.as_ref(), Node::Function { op, children }
            if op.symbol() == "not" && children[0].as_ref() == y.as_ref())
    };
    negated(a, b) || negated(b, a)
}

/// Whether `clause` is an application of `symbol` with `sub` among its
/// arguments; drives the absorption rules.
fn has_argument(clause: &Tree, symbol: &str, sub: &Tree) -> bool {
    matches!(clause.as_ref(), Node::Function { op, children }
        if op.symbol() == symbol && children.iter().any(|c| c.as_ref() == sub.as_ref()))
}

fn reorder(op: Arc<dyn Operator>, a: &Tree, b: &Tree) -> Option<Tree> {
    if node_cmp(a.as_ref(), b.as_ref()) == Ordering::Greater {
        Some(Node::call(op, vec![b.clone(), a.clone()]))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct And;

impl Operator for And {
    fn name(&self) -> &'static str {
        "And"
    }
    fn symbol(&self) -> &'static str {
        "and"
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        binary_boolean()
    }
    fn commutative(&self) -> bool {
        true
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = bool_pair(args)?;
        Ok(Value::Bool(a && b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        for (x, other) in [(a, b), (b, a)] {
            match x.as_bool_constant() {
                Some(false) => return Some(Node::boolean(false)),
                Some(true) => return Some(other.clone()),
                None => {}
            }
            // x and (x or y) -> x
            if has_argument(other, "or", x) {
                return Some(x.clone());
            }
        }
        if a.as_ref() == b.as_ref() {
            return Some(a.clone());
        }
        if opposites(a, b) {
            return Some(Node::boolean(false));
        }
        reorder(Arc::new(And), a, b)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Or;

impl Operator for Or {
    fn name(&self) -> &'static str {
        "Or"
    }
    fn symbol(&self) -> &'static str {
        "or"
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        binary_boolean()
    }
    fn commutative(&self) -> bool {
        true
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = bool_pair(args)?;
        Ok(Value::Bool(a || b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        for (x, other) in [(a, b), (b, a)] {
            match x.as_bool_constant() {
                Some(true) => return Some(Node::boolean(true)),
                Some(false) => return Some(other.clone()),
                None => {}
            }
            // x or (x and y) -> x
            if has_argument(other, "and", x) {
                return Some(x.clone());
            }
        }
        if a.as_ref() == b.as_ref() {
            return Some(a.clone());
        }
        if opposites(a, b) {
            return Some(Node::boolean(true));
        }
        reorder(Arc::new(Or), a, b)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Xor;

impl Operator for Xor {
    fn name(&self) -> &'static str {
        "Xor"
    }
    fn symbol(&self) -> &'static str {
        "xor"
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        binary_boolean()
    }
    fn commutative(&self) -> bool {
        true
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = bool_pair(args)?;
        Ok(Value::Bool(a ^ b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        for (x, other) in [(a, b), (b, a)] {
            match x.as_bool_constant() {
                Some(false) => return Some(other.clone()),
                Some(true) => return Some(Node::call(Arc::new(Not), vec![other.clone()])),
                None => {}
            }
        }
        if a.as_ref() == b.as_ref() {
            return Some(Node::boolean(false));
        }
        if opposites(a, b) {
            return Some(Node::boolean(true));
        }
        reorder(Arc::new(Xor), a, b)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Not;

impl Operator for Not {
    fn name(&self) -> &'static str {
        "Not"
    }
    fn symbol(&self) -> &'static str {
        "not"
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        vec![Type::boolean()]
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::Bool(a)] => Ok(Value::Bool(!a)),
            _ => bail!("expected one boolean argument"),
        }
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let child = &children[0];
        if let Some(c) = child.as_bool_constant() {
            return Some(Node::boolean(!c));
        }
        if let Node::Function { op, children } = child.as_ref() {
            if op.symbol() == "not" {
                return Some(children[0].clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::simplify::simplify;

    fn var(id: usize) -> Tree {
        Node::variable(id, Type::boolean())
    }

    #[test]
    fn test_constant_absorption() {
        let t = Node::call(Arc::new(And), vec![Node::boolean(true), var(0)]);
        assert_eq!(simplify(&t).to_string(), "v0");
        let t = Node::call(Arc::new(And), vec![Node::boolean(false), var(0)]);
        assert_eq!(simplify(&t).to_string(), "false");
        let t = Node::call(Arc::new(Or), vec![var(0), Node::boolean(true)]);
        assert_eq!(simplify(&t).to_string(), "true");
    }

    #[test]
    fn test_duplicate_and_opposite_collapse() {
        let t = Node::call(Arc::new(Xor), vec![var(0), var(0)]);
        assert_eq!(simplify(&t).to_string(), "false");
        let t = Node::call(
            Arc::new(And),
            vec![var(0), Node::call(Arc::new(Not), vec![var(0)])],
        );
        assert_eq!(simplify(&t).to_string(), "false");
        let t = Node::call(
            Arc::new(Or),
            vec![Node::call(Arc::new(Not), vec![var(0)]), var(0)],
        );
        assert_eq!(simplify(&t).to_string(), "true");
    }

    #[test]
    fn test_absorption() {
        // v0 or (v0 and v1) -> v0
        let inner = Node::call(Arc::new(And), vec![var(0), var(1)]);
        let t = Node::call(Arc::new(Or), vec![var(0), inner]);
        assert_eq!(simplify(&t).to_string(), "v0");
    }

    #[test]
    fn test_commutative_canonical_ordering() {
        let a = Node::call(Arc::new(And), vec![var(1), var(0)]);
        let b = Node::call(Arc::new(And), vec![var(0), var(1)]);
        assert_eq!(*simplify(&a), *simplify(&b));
    }

    #[test]
    fn test_double_negation() {
        let t = Node::call(Arc::new(Not), vec![Node::call(Arc::new(Not), vec![var(0)])]);
        assert_eq!(simplify(&t).to_string(), "v0");
    }
}
