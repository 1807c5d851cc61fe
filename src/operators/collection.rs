//! List operators. `sort` and `dedup` are idempotent unary wrappers: a
//! repeated application collapses to a single one.

use super::traits::Operator;
use crate::tree::{value_cmp, Node, Tree};
use crate::types::{Type, Value};
use anyhow::{bail, Result};

fn list_arg(args: &[Value]) -> Result<&[Value]> {
    match args {
        [Value::List(items)] => Ok(items),
        _ => bail!("expected one list argument"),
    }
}

/// Collapse `(sym (sym x))` to `(sym x)`.
fn collapse_idempotent(symbol: &str, child: &Tree) -> Option<Tree> {
    match child.as_ref() {
        Node::Function { op, .. } if op.symbol() == symbol => Some(child.clone()),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Sort {
    element: Type,
}

impl Sort {
    pub fn new(element: Type) -> Self {
        Self { element }
    }
}

impl Operator for Sort {
    fn name(&self) -> &'static str {
        "Sort"
    }
    fn symbol(&self) -> &'static str {
        "sort"
    }
    fn return_type(&self) -> Type {
        Type::list(self.element.clone())
    }
    fn input_types(&self) -> Vec<Type> {
        vec![Type::list(self.element.clone())]
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let mut items = list_arg(args)?.to_vec();
        items.sort_by(value_cmp);
        Ok(Value::List(items))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let child = &children[0];
        if let Some(collapsed) = collapse_idempotent("sort", child) {
            return Some(collapsed);
        }
        // dedup already produces sorted output
        if let Some(collapsed) = collapse_idempotent("dedup", child) {
            return Some(collapsed);
        }
        if let Some(Value::List(items)) = child.as_constant() {
            let mut sorted = items.clone();
            sorted.sort_by(value_cmp);
            return Some(Node::constant(Value::List(sorted), child.ty()));
        }
        None
    }
}

/// Set semantics over a list: sorted unique elements.
#[derive(Debug, Clone)]
pub struct Dedup {
    element: Type,
}

impl Dedup {
    pub fn new(element: Type) -> Self {
        Self { element }
    }
}

impl Operator for Dedup {
    fn name(&self) -> &'static str {
        "Dedup"
    }
    fn symbol(&self) -> &'static str {
        "dedup"
    }
    fn return_type(&self) -> Type {
        Type::list(self.element.clone())
    }
    fn input_types(&self) -> Vec<Type> {
        vec![Type::list(self.element.clone())]
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        let mut items = list_arg(args)?.to_vec();
        items.sort_by(value_cmp);
        items.dedup();
        Ok(Value::List(items))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let child = &children[0];
        if let Some(collapsed) = collapse_idempotent("dedup", child) {
            return Some(collapsed);
        }
        // (dedup (sort x)) -> (dedup x)
        if let Node::Function { op, children: inner } = child.as_ref() {
            if op.symbol() == "sort" {
                return Some(Node::call(
                    std::sync::Arc::new(self.clone()),
                    vec![inner[0].clone()],
                ));
            }
        }
        if let Some(Value::List(items)) = child.as_constant() {
            let mut unique = items.clone();
            unique.sort_by(value_cmp);
            unique.dedup();
            return Some(Node::constant(Value::List(unique), child.ty()));
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct Size {
    element: Type,
}

impl Size {
    pub fn new(element: Type) -> Self {
        Self { element }
    }
}

impl Operator for Size {
    fn name(&self) -> &'static str {
        "Size"
    }
    fn symbol(&self) -> &'static str {
        "size"
    }
    fn return_type(&self) -> Type {
        Type::integer()
    }
    fn input_types(&self) -> Vec<Type> {
        vec![Type::list(self.element.clone())]
    }
    fn apply(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::Integer(list_arg(args)?.len() as i64))
    }
    fn simplify(&self, children: &[Tree]) -> Option<Tree> {
        let child = &children[0];
        if let Some(Value::List(items)) = child.as_constant() {
            return Some(Node::integer(items.len() as i64));
        }
        // sorting does not change length
        if let Node::Function { op, children: inner } = child.as_ref() {
            if op.symbol() == "sort" {
                return Some(Node::call(
                    std::sync::Arc::new(self.clone()),
                    vec![inner[0].clone()],
                ));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::simplify::simplify;
    use std::sync::Arc;

    fn int_list(values: &[i64]) -> Tree {
        Node::constant(
            Value::List(values.iter().map(|v| Value::Integer(*v)).collect()),
            Type::list(Type::integer()),
        )
    }

    fn list_var(id: usize) -> Tree {
        Node::variable(id, Type::list(Type::integer()))
    }

    #[test]
    fn test_sort_apply() {
        let sorted = Sort::new(Type::integer())
            .apply(&[Value::List(vec![
                Value::Integer(3),
                Value::Integer(1),
                Value::Integer(2),
            ])])
            .unwrap();
        assert_eq!(
            sorted,
            Value::List(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ])
        );
    }

    #[test]
    fn test_repeated_sort_collapses() {
        let sort = Arc::new(Sort::new(Type::integer()));
        let t = Node::call(
            sort.clone(),
            vec![Node::call(sort.clone(), vec![list_var(0)])],
        );
        assert_eq!(simplify(&t).to_string(), "(sort v0)");
    }

    #[test]
    fn test_repeated_dedup_collapses() {
        let dedup = Arc::new(Dedup::new(Type::integer()));
        let t = Node::call(
            dedup.clone(),
            vec![Node::call(dedup.clone(), vec![list_var(0)])],
        );
        assert_eq!(simplify(&t).to_string(), "(dedup v0)");
    }

    #[test]
    fn test_sort_of_dedup_collapses() {
        let sort = Arc::new(Sort::new(Type::integer()));
        let dedup = Arc::new(Dedup::new(Type::integer()));
        let t = Node::call(sort, vec![Node::call(dedup, vec![list_var(0)])]);
        assert_eq!(simplify(&t).to_string(), "(dedup v0)");
    }

    #[test]
    fn test_constant_folding() {
        let size = Arc::new(Size::new(Type::integer()));
        let sort = Arc::new(Sort::new(Type::integer()));
        let t = Node::call(size, vec![Node::call(sort, vec![int_list(&[3, 1, 2])])]);
        assert_eq!(simplify(&t).to_string(), "3");
    }
}
