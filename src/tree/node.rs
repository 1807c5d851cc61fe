use crate::operators::OpRef;
use crate::types::{Type, Value};
use std::fmt;
use std::sync::Arc;

/// A reference-counted, structurally shared expression tree. Nodes are
/// never mutated after construction; every transformation builds a new
/// tree that shares untouched subtrees with the original.
pub type Tree = Arc<Node>;

/// A single node of a typed expression tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Immutable literal value
    Constant { value: Value, ty: Type },
    /// Positional reference into an external assignment vector
    Variable { id: usize, ty: Type },
    /// Operator application with a fixed-arity child sequence
    Function { op: OpRef, children: Vec<Tree> },
}

impl Node {
    pub fn constant(value: Value, ty: Type) -> Tree {
        Arc::new(Node::Constant { value, ty })
    }

    pub fn integer(v: i64) -> Tree {
        Node::constant(Value::Integer(v), Type::integer())
    }

    pub fn boolean(v: bool) -> Tree {
        Node::constant(Value::Bool(v), Type::boolean())
    }

    pub fn variable(id: usize, ty: Type) -> Tree {
        Arc::new(Node::Variable { id, ty })
    }

    /// Build a function node. Child count and child types violating the
    /// operator's signature are caller bugs.
    pub fn call(op: OpRef, children: Vec<Tree>) -> Tree {
        debug_assert_eq!(
            children.len(),
            op.arity(),
            "arity mismatch for operator {}",
            op.name()
        );
        debug_assert!(
            children
                .iter()
                .zip(op.input_types())
                .all(|(c, t)| c.ty().satisfies(&t)),
            "child type mismatch for operator {}",
            op.name()
        );
        Arc::new(Node::Function { op, children })
    }

    pub fn ty(&self) -> Type {
        match self {
            Node::Constant { ty, .. } | Node::Variable { ty, .. } => ty.clone(),
            Node::Function { op, .. } => op.return_type(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Node::Function { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Node::Function { .. })
    }

    pub fn children(&self) -> &[Tree] {
        match self {
            Node::Function { children, .. } => children,
            _ => &[],
        }
    }

    pub fn op(&self) -> Option<&OpRef> {
        match self {
            Node::Function { op, .. } => Some(op),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Node::Constant { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_integer_constant(&self) -> Option<i64> {
        self.as_constant().and_then(Value::as_integer)
    }

    pub fn as_bool_constant(&self) -> Option<bool> {
        self.as_constant().and_then(Value::as_bool)
    }
}

/// Structural equality: functions compare operator symbol and children
/// recursively, constants compare value and type, variables compare by id
/// alone.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Node::Constant { value: a, ty: ta },
                Node::Constant { value: b, ty: tb },
            ) => a == b && ta == tb,
            (Node::Variable { id: a, .. }, Node::Variable { id: b, .. }) => a == b,
            (
                Node::Function {
                    op: oa,
                    children: ca,
                },
                Node::Function {
                    op: ob,
                    children: cb,
                },
            ) => oa.symbol() == ob.symbol() && ca == cb,
            _ => false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant { value, .. } => write!(f, "{}", value),
            Node::Variable { id, .. } => write!(f, "v{}", id),
            Node::Function { op, children } => {
                write!(f, "({}", op.symbol())?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::arithmetic::Add;

    #[test]
    fn test_structural_equality() {
        let a = Node::call(Arc::new(Add), vec![Node::integer(1), Node::integer(2)]);
        let b = Node::call(Arc::new(Add), vec![Node::integer(1), Node::integer(2)]);
        let c = Node::call(Arc::new(Add), vec![Node::integer(2), Node::integer(1)]);
        assert_eq!(*a, *b);
        assert_ne!(*a, *c);
    }

    #[test]
    fn test_variables_compare_by_id() {
        let a = Node::variable(3, Type::integer());
        let b = Node::variable(3, Type::integer());
        let c = Node::variable(4, Type::integer());
        assert_eq!(*a, *b);
        assert_ne!(*a, *c);
    }

    #[test]
    fn test_display_sexpr() {
        let t = Node::call(
            Arc::new(Add),
            vec![Node::integer(9), Node::variable(3, Type::integer())],
        );
        assert_eq!(t.to_string(), "(+ 9 v3)");
    }
}
