//! Pure tree-walk utilities: counting, indexed lookup and indexed/predicated
//! replacement over shared trees.
//!
//! The canonical traversal visits a function node's children left-to-right
//! and counts the node itself only after all of its children; a node owns
//! the positions not claimed by any of its subtrees. Terminals own
//! position 0 of their own subtree.

use super::node::{Node, Tree};
use std::sync::Arc;

pub type NodePredicate<'a> = &'a dyn Fn(&Node) -> bool;

pub fn any_node(_: &Node) -> bool {
    true
}

pub fn is_terminal(node: &Node) -> bool {
    node.is_terminal()
}

pub fn is_function(node: &Node) -> bool {
    node.is_function()
}

/// Number of nodes satisfying `pred`.
pub fn node_count(tree: &Node, pred: NodePredicate) -> usize {
    let own = usize::from(pred(tree));
    tree.children()
        .iter()
        .map(|c| node_count(c, pred))
        .sum::<usize>()
        + own
}

/// Total node count.
pub fn size(tree: &Node) -> usize {
    node_count(tree, &any_node)
}

/// Height of the tree: 1 for a terminal, 1 + max child height otherwise.
pub fn height(tree: &Node) -> usize {
    1 + tree
        .children()
        .iter()
        .map(|c| height(c))
        .max()
        .unwrap_or(0)
}

/// The subtree rooted at the `index`-th node satisfying `pred`.
/// An out-of-range index is a programming error.
pub fn node_at<'a>(tree: &'a Tree, index: usize, pred: NodePredicate) -> &'a Tree {
    match locate(tree, index, pred) {
        Ok(node) => node,
        Err(_) => panic!("node index {} out of range", index),
    }
}

fn locate<'a>(
    tree: &'a Tree,
    mut index: usize,
    pred: NodePredicate,
) -> Result<&'a Tree, usize> {
    for child in tree.children() {
        match locate(child, index, pred) {
            Ok(found) => return Ok(found),
            Err(remaining) => index = remaining,
        }
    }
    if pred(tree) {
        if index == 0 {
            return Ok(tree);
        }
        index -= 1;
    }
    Err(index)
}

/// Depth (1-based, root = 1) of the `index`-th node satisfying `pred`.
pub fn depth_at(tree: &Tree, index: usize, pred: NodePredicate) -> usize {
    match locate_depth(tree, index, 1, pred) {
        Ok(depth) => depth,
        Err(_) => panic!("node index {} out of range", index),
    }
}

fn locate_depth(
    tree: &Tree,
    mut index: usize,
    depth: usize,
    pred: NodePredicate,
) -> Result<usize, usize> {
    for child in tree.children() {
        match locate_depth(child, index, depth + 1, pred) {
            Ok(found) => return Ok(found),
            Err(remaining) => index = remaining,
        }
    }
    if pred(tree) {
        if index == 0 {
            return Ok(depth);
        }
        index -= 1;
    }
    Err(index)
}

/// A new tree with the `index`-th node satisfying `pred` replaced by
/// `replacement(old)`. Untouched branches are shared with the original.
pub fn replace_at(
    tree: &Tree,
    index: usize,
    replacement: &dyn Fn(&Tree) -> Tree,
    pred: NodePredicate,
) -> Tree {
    match rebuild(tree, index, replacement, pred) {
        Ok(new_tree) => new_tree,
        Err(_) => panic!("node index {} out of range", index),
    }
}

fn rebuild(
    tree: &Tree,
    mut index: usize,
    replacement: &dyn Fn(&Tree) -> Tree,
    pred: NodePredicate,
) -> Result<Tree, usize> {
    if let Node::Function { op, children } = tree.as_ref() {
        for (i, child) in children.iter().enumerate() {
            match rebuild(child, index, replacement, pred) {
                Ok(new_child) => {
                    let mut new_children = children.clone();
                    new_children[i] = new_child;
                    return Ok(Node::call(op.clone(), new_children));
                }
                Err(remaining) => index = remaining,
            }
        }
    }
    if pred(tree) {
        if index == 0 {
            return Ok(replacement(tree));
        }
        index -= 1;
    }
    Err(index)
}

/// Rewrite every node satisfying `pred` bottom-up in a single pass;
/// freshly produced replacements are not re-visited.
pub fn replace_all(
    tree: &Tree,
    pred: NodePredicate,
    replacement: &dyn Fn(&Tree) -> Tree,
) -> Tree {
    let rebuilt = match tree.as_ref() {
        Node::Function { op, children } => {
            let new_children: Vec<Tree> = children
                .iter()
                .map(|c| replace_all(c, pred, replacement))
                .collect();
            if new_children
                .iter()
                .zip(children)
                .all(|(a, b)| Arc::ptr_eq(a, b))
            {
                tree.clone()
            } else {
                Node::call(op.clone(), new_children)
            }
        }
        _ => tree.clone(),
    };
    if pred(&rebuilt) {
        replacement(&rebuilt)
    } else {
        rebuilt
    }
}

/// All subtrees, in the canonical traversal order.
pub fn subtrees(tree: &Tree) -> Vec<&Tree> {
    let mut out = Vec::new();
    collect_subtrees(tree, &mut out);
    out
}

fn collect_subtrees<'a>(tree: &'a Tree, out: &mut Vec<&'a Tree>) {
    for child in tree.children() {
        collect_subtrees(child, out);
    }
    out.push(tree);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::arithmetic::{Add, Mul};
    use crate::types::Type;

    // (+ (* 1 2) v0)
    fn sample() -> Tree {
        let product = Node::call(Arc::new(Mul), vec![Node::integer(1), Node::integer(2)]);
        Node::call(
            Arc::new(Add),
            vec![product, Node::variable(0, Type::integer())],
        )
    }

    #[test]
    fn test_node_count() {
        let t = sample();
        assert_eq!(size(&t), 5);
        assert_eq!(node_count(&t, &is_terminal), 3);
        assert_eq!(node_count(&t, &is_function), 2);
    }

    #[test]
    fn test_height() {
        let t = sample();
        assert_eq!(height(&t), 3);
        assert_eq!(height(&Node::integer(7)), 1);
    }

    #[test]
    fn test_node_at_children_first_order() {
        let t = sample();
        assert_eq!(node_at(&t, 0, &any_node).to_string(), "1");
        assert_eq!(node_at(&t, 1, &any_node).to_string(), "2");
        assert_eq!(node_at(&t, 2, &any_node).to_string(), "(* 1 2)");
        assert_eq!(node_at(&t, 3, &any_node).to_string(), "v0");
        assert_eq!(node_at(&t, 4, &any_node).to_string(), "(+ (* 1 2) v0)");
    }

    #[test]
    fn test_node_at_with_predicate() {
        let t = sample();
        assert_eq!(node_at(&t, 0, &is_function).to_string(), "(* 1 2)");
        assert_eq!(node_at(&t, 1, &is_function).to_string(), "(+ (* 1 2) v0)");
        assert_eq!(node_at(&t, 2, &is_terminal).to_string(), "v0");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_node_at_out_of_range_panics() {
        let t = sample();
        node_at(&t, 5, &any_node);
    }

    #[test]
    fn test_depth_at() {
        let t = sample();
        assert_eq!(depth_at(&t, 0, &any_node), 3); // leaf 1
        assert_eq!(depth_at(&t, 2, &any_node), 2); // (* 1 2)
        assert_eq!(depth_at(&t, 4, &any_node), 1); // root
    }

    #[test]
    fn test_replace_at_shares_untouched_branches() {
        let t = sample();
        let replaced = replace_at(&t, 3, &|_| Node::integer(9), &any_node);
        assert_eq!(replaced.to_string(), "(+ (* 1 2) 9)");
        // the untouched product subtree is the same allocation
        assert!(Arc::ptr_eq(&t.children()[0], &replaced.children()[0]));
    }

    #[test]
    fn test_replace_all_bottom_up() {
        let t = sample();
        let doubled = replace_all(
            &t,
            &|n| n.as_integer_constant().is_some(),
            &|n| Node::integer(n.as_integer_constant().unwrap() * 10),
        );
        assert_eq!(doubled.to_string(), "(+ (* 10 20) v0)");
    }

    #[test]
    fn test_subtrees_order() {
        let t = sample();
        let subs = subtrees(&t);
        assert_eq!(subs.len(), 5);
        assert_eq!(subs[0].to_string(), "1");
        assert_eq!(subs[4].to_string(), "(+ (* 1 2) v0)");
    }
}
