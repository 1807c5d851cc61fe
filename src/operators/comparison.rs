//! Integer comparisons. `x OP x` folds to its constant truth value, and the
//! asymmetric pair `>`/`>=` rewrites to `<`/`<=` with swapped arguments so
//! only one direction carries simplification logic.

use super::traits::Operator;
use crate::tree::{node_cmp, Node, Tree};
use crate::types::{Type, Value};
use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::sync::Arc;

fn int_pair(args: &[Value]) -> Result<(i64, i64)> {
    match args {
        [Value::Integer(a), Value::Integer(b)] => Ok((*a, *b)),
        _ => bail!("expected two integer arguments"),
    }
}

fn comparison_inputs() -> Vec<Type> {
    vec![Type::integer(), Type::integer()]
}

#[derive(Debug, Clone, Copy)]
pub struct Eq;

impl Operator for Eq {
    fn name(&self) -> &'static str {
        "Eq"
    }
    fn symbol(&self) -> &'static str {
        "="
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        comparison_inputs()
    }
    fn commutative(&self) -> bool {
        true
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Bool(a == b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        if a.as_ref() == b.as_ref() {
            return Some(Node::boolean(true));
        }
        if let (Some(x), Some(y)) = (a.as_integer_constant(), b.as_integer_constant()) {
            return Some(Node::boolean(x == y));
        }
        if node_cmp(a.as_ref(), b.as_ref()) == Ordering::Greater {
            return Some(Node::call(Arc::new(Eq), vec![b.clone(), a.clone()]));
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ne;

impl Operator for Ne {
    fn name(&self) -> &'static str {
        "Ne"
    }
    fn symbol(&self) -> &'static str {
        "!="
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        comparison_inputs()
    }
    fn commutative(&self) -> bool {
        true
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Bool(a != b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        if a.as_ref() == b.as_ref() {
            return Some(Node::boolean(false));
        }
        if let (Some(x), Some(y)) = (a.as_integer_constant(), b.as_integer_constant()) {
            return Some(Node::boolean(x != y));
        }
        if node_cmp(a.as_ref(), b.as_ref()) == Ordering::Greater {
            return Some(Node::call(Arc::new(Ne), vec![b.clone(), a.clone()]));
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Lt;

impl Operator for Lt {
    fn name(&self) -> &'static str {
        "Lt"
    }
    fn symbol(&self) -> &'static str {
        "<"
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        comparison_inputs()
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Bool(a < b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        if a.as_ref() == b.as_ref() {
            return Some(Node::boolean(false));
        }
        if let (Some(x), Some(y)) = (a.as_integer_constant(), b.as_integer_constant()) {
            return Some(Node::boolean(x < y));
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Le;

impl Operator for Le {
    fn name(&self) -> &'static str {
        "Le"
    }
    fn symbol(&self) -> &'static str {
        "<="
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        comparison_inputs()
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Bool(a <= b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (a, b) = (&children[0], &children[1]);
        if a.as_ref() == b.as_ref() {
            return Some(Node::boolean(true));
        }
        if let (Some(x), Some(y)) = (a.as_integer_constant(), b.as_integer_constant()) {
            return Some(Node::boolean(x <= y));
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Gt;

impl Operator for Gt {
    fn name(&self) -> &'static str {
        "Gt"
    }
    fn symbol(&self) -> &'static str {
        ">"
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        comparison_inputs()
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Bool(a > b))
    }
    /// `(> a b)` is `(< b a)`; canonicalizing to one direction keeps all
    /// ordering rules in a single place.
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        Some(Node::call(
            Arc::new(Lt),
            vec![children[1].clone(), children[0].clone()],
        ))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ge;

impl Operator for Ge {
    fn name(&self) -> &'static str {
        "Ge"
    }
    fn symbol(&self) -> &'static str {
        ">="
    }
    fn return_type(&self) -> Type {
        Type::boolean()
    }
    fn input_types(&self) -> Vec<Type> {
        comparison_inputs()
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let (a, b) = int_pair(args)?;
        Ok(Value::Bool(a >= b))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        Some(Node::call(
            Arc::new(Le),
            vec![children[1].clone(), children[0].clone()],
        ))
    }
}
