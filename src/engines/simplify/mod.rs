//! Term-rewriting simplification driver.
//!
//! Rules live on the operators themselves ([`Operator::simplify`]); the
//! driver applies them bottom-up: children are simplified first, the node is
//! rebuilt over them, then its own rule runs. A firing rule hands back a
//! replacement that is re-simplified in full, so chains of enabled rewrites
//! run to a fixpoint. Every replacement either shrinks the tree or steps
//! onto a canonical form its own rule no longer touches, so the driver
//! terminates.

use crate::tree::{Node, Tree};
use std::sync::Arc;

/// Simplify a tree to a fixpoint. The result evaluates identically to the
/// input for every assignment; shares any subtree no rule touched.
pub fn simplify(tree: &Tree) -> Tree {
    let (op, children) = match tree.as_ref() {
        Node::Function { op, children } => (op, children),
        _ => return tree.clone(),
    };

    let simplified: Vec<Tree> = children.iter().map(simplify).collect();
    let rebuilt = if simplified
        .iter()
        .zip(children)
        .all(|(a, b)| Arc::ptr_eq(a, b))
    {
        tree.clone()
    } else {
        Node::call(op.clone(), simplified)
    };

    if let Some(replacement) = rebuilt
        .op()
        .and_then(|op| op.simplify(rebuilt.children()))
    {
        // a rule returning its own input would never make progress
        if replacement.as_ref() != rebuilt.as_ref() {
            return simplify(&replacement);
        }
    }
    rebuilt
}
