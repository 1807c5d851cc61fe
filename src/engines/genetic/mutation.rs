//! Mutation operators. Every operator returns a new tree and falls back to
//! the unchanged input in its documented degenerate case; catalog failures
//! (no primitive of a required type) surface as configuration errors.

use crate::catalog::{PrimitiveCatalog, TreeGenerator};
use crate::error::Result;
use crate::tree::{walk, Node, Tree};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Replace one node's operator with a signature-compatible alternative
/// (children kept), or one terminal with an alternative terminal of its
/// type. No alternative in the catalog means no change.
pub fn point_mutation<R: Rng>(
    tree: &Tree,
    catalog: &PrimitiveCatalog,
    rng: &mut R,
) -> Result<Tree> {
    let index = rng.gen_range(0..walk::size(tree));
    let target = walk::node_at(tree, index, &walk::any_node);

    let replacement = match target.as_ref() {
        Node::Function { op, children } => {
            let alternative = catalog.next_alternative_function(op, rng);
            if alternative.symbol() == op.symbol() {
                return Ok(tree.clone());
            }
            // the catalog indexes by full signature, so this cannot fire
            // unless it was populated inconsistently
            assert_eq!(
                alternative.return_type(),
                op.return_type(),
                "alternative operator {} changes the return type",
                alternative.name()
            );
            Node::call(alternative, children.clone())
        }
        _ => {
            let alternative = catalog.next_alternative_terminal(target, rng);
            if Arc::ptr_eq(&alternative, target) {
                return Ok(tree.clone());
            }
            alternative
        }
    };
    Ok(walk::replace_at(
        tree,
        index,
        &|_| replacement.clone(),
        &walk::any_node,
    ))
}

/// Replace a uniformly chosen node with a freshly grown subtree of the same
/// type, bounded by the replaced node's own height.
pub fn subtree_mutation<R: Rng>(
    tree: &Tree,
    generator: &TreeGenerator,
    rng: &mut R,
) -> Result<Tree> {
    let index = rng.gen_range(0..walk::size(tree));
    let target = walk::node_at(tree, index, &walk::any_node);
    let grown = generator.grow(&target.ty(), walk::height(target), rng)?;
    Ok(walk::replace_at(tree, index, &|_| grown.clone(), &walk::any_node))
}

/// Replace a uniformly chosen terminal with a freshly grown height-2
/// subtree of its type, turning a leaf into a small function expression.
pub fn constant_to_function_mutation<R: Rng>(
    tree: &Tree,
    generator: &TreeGenerator,
    rng: &mut R,
) -> Result<Tree> {
    let terminals = walk::node_count(tree, &walk::is_terminal);
    let index = rng.gen_range(0..terminals);
    let target = walk::node_at(tree, index, &walk::is_terminal);
    let grown = generator.grow(&target.ty(), 2, rng)?;
    Ok(walk::replace_at(
        tree,
        index,
        &|_| grown.clone(),
        &walk::is_terminal,
    ))
}

/// Promote a uniformly chosen root-typed subtree to be the whole tree.
/// When the root type occurs nowhere below the root this is a no-op and
/// the identical tree is returned.
pub fn hoist_mutation<R: Rng>(tree: &Tree, rng: &mut R) -> Result<Tree> {
    let root_ty = tree.ty();
    let candidates: Vec<&Tree> = walk::subtrees(tree)
        .into_iter()
        .filter(|sub| sub.ty() == root_ty)
        .collect();
    if candidates.len() <= 1 {
        return Ok(tree.clone());
    }
    Ok((*candidates.choose(rng).expect("candidates are non-empty")).clone())
}

/// Replace a uniformly chosen function node with a terminal of its type.
/// A tree that is already a terminal is returned unchanged.
pub fn shrink_mutation<R: Rng>(
    tree: &Tree,
    catalog: &PrimitiveCatalog,
    rng: &mut R,
) -> Result<Tree> {
    let functions = walk::node_count(tree, &walk::is_function);
    if functions == 0 {
        return Ok(tree.clone());
    }
    let index = rng.gen_range(0..functions);
    let target = walk::node_at(tree, index, &walk::is_function);
    let terminal = catalog.next_alternative_terminal(target, rng);
    if Arc::ptr_eq(&terminal, target) {
        // no terminal of this type exists; leave the tree alone
        return Ok(tree.clone());
    }
    Ok(walk::replace_at(
        tree,
        index,
        &|_| terminal.clone(),
        &walk::is_function,
    ))
}
