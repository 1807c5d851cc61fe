//! Tree evaluation against a positional assignment vector. This is the
//! contract consumed by external fitness functions; the engine itself never
//! interprets the resulting values.

use crate::error::{Result, TreeLangError};
use crate::tree::{Node, Tree};
use crate::types::Value;
use rayon::prelude::*;

/// Evaluate `tree` with variable `vN` bound to `assignment[N]`.
pub fn evaluate(tree: &Node, assignment: &[Value]) -> Result<Value> {
    match tree {
        Node::Constant { value, .. } => Ok(value.clone()),
        Node::Variable { id, .. } => assignment.get(*id).cloned().ok_or_else(|| {
            TreeLangError::Evaluation(format!(
                "variable v{} has no assignment (vector length {})",
                id,
                assignment.len()
            ))
        }),
        Node::Function { op, children } => {
            let args = children
                .iter()
                .map(|child| evaluate(child, assignment))
                .collect::<Result<Vec<Value>>>()?;
            op.apply(&args)
                .map_err(|e| TreeLangError::Evaluation(format!("{}: {}", op.name(), e)))
        }
    }
}

/// Evaluate many trees against one assignment in parallel. Trees are
/// immutable and shared, so no synchronization is needed.
pub fn evaluate_batch(trees: &[Tree], assignment: &[Value]) -> Vec<Result<Value>> {
    trees
        .par_iter()
        .map(|tree| evaluate(tree, assignment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Add, Lt, Mul};
    use crate::types::Type;
    use std::sync::Arc;

    #[test]
    fn test_evaluate_arithmetic() {
        // (* (+ v0 2) v1)
        let t = Node::call(
            Arc::new(Mul),
            vec![
                Node::call(
                    Arc::new(Add),
                    vec![Node::variable(0, Type::integer()), Node::integer(2)],
                ),
                Node::variable(1, Type::integer()),
            ],
        );
        let result = evaluate(&t, &[Value::Integer(3), Value::Integer(4)]).unwrap();
        assert_eq!(result, Value::Integer(20));
    }

    #[test]
    fn test_evaluate_comparison() {
        let t = Node::call(
            Arc::new(Lt),
            vec![Node::variable(0, Type::integer()), Node::integer(10)],
        );
        assert_eq!(
            evaluate(&t, &[Value::Integer(5)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            evaluate(&t, &[Value::Integer(15)]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_missing_assignment_is_an_error() {
        let t = Node::variable(3, Type::integer());
        let err = evaluate(&t, &[Value::Integer(1)]).unwrap_err();
        assert!(err.to_string().contains("v3"));
    }

    #[test]
    fn test_evaluate_batch() {
        let trees: Vec<Tree> = (0..8)
            .map(|i| {
                Node::call(
                    Arc::new(Add),
                    vec![Node::variable(0, Type::integer()), Node::integer(i)],
                )
            })
            .collect();
        let results = evaluate_batch(&trees, &[Value::Integer(100)]);
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap(), Value::Integer(100 + i as i64));
        }
    }
}
