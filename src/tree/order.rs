//! A total order over node structure, used to canonicalize the argument
//! order of commutative operators and to detect duplicate sub-expressions.

use super::node::Node;
use crate::types::Value;
use std::cmp::Ordering;

/// Constants sort before variables, variables before function applications;
/// ties break on value / id / operator symbol, then on children
/// lexicographically.
pub fn node_cmp(a: &Node, b: &Node) -> Ordering {
    match (a, b) {
        (Node::Constant { value: va, .. }, Node::Constant { value: vb, .. }) => {
            value_cmp(va, vb)
        }
        (Node::Constant { .. }, _) => Ordering::Less,
        (_, Node::Constant { .. }) => Ordering::Greater,
        (Node::Variable { id: ia, .. }, Node::Variable { id: ib, .. }) => ia.cmp(ib),
        (Node::Variable { .. }, Node::Function { .. }) => Ordering::Less,
        (Node::Function { .. }, Node::Variable { .. }) => Ordering::Greater,
        (
            Node::Function {
                op: oa,
                children: ca,
            },
            Node::Function {
                op: ob,
                children: cb,
            },
        ) => oa
            .symbol()
            .cmp(ob.symbol())
            .then_with(|| children_cmp(ca, cb)),
    }
}

fn children_cmp(a: &[std::sync::Arc<Node>], b: &[std::sync::Arc<Node>]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = node_cmp(x.as_ref(), y.as_ref());
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Total order over runtime values; floats compare via `total_cmp`.
pub fn value_cmp(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Bool(_) => 0,
            Value::Integer(_) => 1,
            Value::Float(_) => 2,
            Value::Str(_) => 3,
            Value::List(_) => 4,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::List(x), Value::List(y)) => {
            for (i, j) in x.iter().zip(y) {
                let ord = value_cmp(i, j);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::arithmetic::Add;
    use crate::types::Type;
    use std::sync::Arc;

    #[test]
    fn test_constants_sort_before_variables_and_functions() {
        let c = Node::integer(5);
        let v = Node::variable(0, Type::integer());
        let f = Node::call(Arc::new(Add), vec![Node::integer(1), Node::integer(2)]);
        assert_eq!(node_cmp(&c, &v), Ordering::Less);
        assert_eq!(node_cmp(&v, &f), Ordering::Less);
        assert_eq!(node_cmp(&f, &c), Ordering::Greater);
    }

    #[test]
    fn test_order_is_consistent_with_structural_equality() {
        let a = Node::call(Arc::new(Add), vec![Node::integer(1), Node::integer(2)]);
        let b = Node::call(Arc::new(Add), vec![Node::integer(1), Node::integer(2)]);
        assert_eq!(node_cmp(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_children_break_ties() {
        let a = Node::call(Arc::new(Add), vec![Node::integer(1), Node::integer(2)]);
        let b = Node::call(Arc::new(Add), vec![Node::integer(1), Node::integer(3)]);
        assert_eq!(node_cmp(&a, &b), Ordering::Less);
    }
}
