//! Conditional selection. `If` is instantiated per branch type so its
//! signature stays concrete for catalog indexing.

use super::traits::Operator;
use crate::tree::{Node, Tree};
use crate::types::{Type, Value};
use anyhow::{bail, Result};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct If {
    ty: Type,
}

impl If {
    pub fn new(ty: Type) -> Self {
        Self { ty }
    }
}

impl Operator for If {
    fn name(&self) -> &'static str {
        "If"
    }
    fn symbol(&self) -> &'static str {
        "if"
    }
    fn return_type(&self) -> Type {
        self.ty.clone()
    }
    fn input_types(&self) -> Vec<Type> {
        vec![Type::boolean(), self.ty.clone(), self.ty.clone()]
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::Bool(cond), on_true, on_false] => {
                Ok(if *cond { on_true.clone() } else { on_false.clone() })
            }
            _ => bail!("expected (boolean, value, value) arguments"),
        }
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let (cond, on_true, on_false) = (&children[0], &children[1], &children[2]);

        if let Some(c) = cond.as_bool_constant() {
            return Some(if c { on_true.clone() } else { on_false.clone() });
        }
        if on_true.as_ref() == on_false.as_ref() {
            return Some(on_true.clone());
        }

        // a branch retesting the same condition keeps only the arm the
        // outer test already decided
        if let Some((arm_true, _)) = split_if(on_true, cond) {
            return Some(Node::call(
                Arc::new(self.clone()),
                vec![cond.clone(), arm_true, on_false.clone()],
            ));
        }
        if let Some((_, arm_false)) = split_if(on_false, cond) {
            return Some(Node::call(
                Arc::new(self.clone()),
                vec![cond.clone(), on_true.clone(), arm_false],
            ));
        }

        // (if (not c) a b) -> (if c b a)
        if let Node::Function { op, children: neg } = cond.as_ref() {
            if op.symbol() == "not" {
                return Some(Node::call(
                    Arc::new(self.clone()),
                    vec![neg[0].clone(), on_false.clone(), on_true.clone()],
                ));
            }
        }
        None
    }
}

/// If `branch` is an `if` over the same condition, yields its two arms.
fn split_if(branch: &Tree, cond: &Tree) -> Option<(Tree, Tree)> {
    match branch.as_ref() {
        Node::Function { op, children }
            if op.symbol() == "if" && children[0].as_ref() == cond.as_ref() =>
        {
            Some((children[1].clone(), children[2].clone()))
        }
        _ => None,
    }
}
