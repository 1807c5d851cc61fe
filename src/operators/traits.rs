use crate::tree::Tree;
use crate::types::{Signature, Type, Value};
use anyhow::Result;
use std::sync::Arc;

/// An operator usable as the head of a function node.
///
/// Implementations are stateless values shared behind an `Arc`; identity
/// for structural tree comparison is the `symbol`.
pub trait Operator: Send + Sync + std::fmt::Debug {
    /// Display name
    fn name(&self) -> &'static str;

    /// Symbol used in the textual S-expression format
    fn symbol(&self) -> &'static str;

    /// Return type
    fn return_type(&self) -> Type;

    /// Argument types, in order
    fn input_types(&self) -> Vec<Type>;

    /// Number of children a node with this operator has
    fn arity(&self) -> usize {
        self.input_types().len()
    }

    fn signature(&self) -> Signature {
        Signature::new(self.return_type(), self.input_types())
    }

    /// Whether argument order is irrelevant; commutative operators get their
    /// children canonically ordered by the simplification engine.
    fn commutative(&self) -> bool {
        false
    }

    /// Apply the operator to fully evaluated arguments.
    fn apply(&self, args: &[Value]) -> Result<Value>;

    /// Local rewrite rule. Children are assumed already simplified; returns
    /// `None` when no semantics-preserving reduction applies at this node.
    fn simplify(&self, _children: &[Tree]) -> Option<Tree> {
        None
    }
}

pub type OpRef = Arc<dyn Operator>;
