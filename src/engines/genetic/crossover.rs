//! Crossover operators. Both take two parents and return one child, always
//! type-correct by construction, degrading to an unchanged parent when no
//! valid crossover point exists.

use crate::tree::{walk, Node, Tree};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Swap a uniformly chosen subtree of `parent1` for a type- and
/// height-compatible subtree of `parent2`. The height filter keeps the
/// child within `max_depth`.
pub fn subtree_crossover<R: Rng>(
    parent1: &Tree,
    parent2: &Tree,
    max_depth: usize,
    rng: &mut R,
) -> Tree {
    let index = rng.gen_range(0..walk::size(parent1));
    let target = walk::node_at(parent1, index, &walk::any_node);
    let target_ty = target.ty();
    let depth = walk::depth_at(parent1, index, &walk::any_node);
    let height_budget = (max_depth + 1).saturating_sub(depth);

    let candidates: Vec<&Tree> = walk::subtrees(parent2)
        .into_iter()
        .filter(|sub| sub.ty() == target_ty && walk::height(sub) <= height_budget)
        .collect();

    match candidates.choose(rng) {
        Some(replacement) => {
            let replacement = (*replacement).clone();
            walk::replace_at(parent1, index, &|_| replacement.clone(), &walk::any_node)
        }
        None => {
            debug!(
                "no crossover candidate of type {} within height {}",
                target_ty, height_budget
            );
            parent1.clone()
        }
    }
}

/// Size of the common region of two trees: the maximal set of structurally
/// aligned positions. Two nodes align when both are functions with the same
/// operator (then their children align pairwise) or both are terminals of
/// equal type; any mismatch contributes nothing and stops alignment for the
/// whole branch beneath it.
pub fn common_region_size(a: &Node, b: &Node) -> usize {
    match (a, b) {
        (
            Node::Function {
                op: op_a,
                children: children_a,
            },
            Node::Function {
                op: op_b,
                children: children_b,
            },
        ) => {
            if op_a.symbol() != op_b.symbol() || children_a.len() != children_b.len() {
                return 0;
            }
            1 + children_a
                .iter()
                .zip(children_b)
                .map(|(x, y)| common_region_size(x, y))
                .sum::<usize>()
        }
        (a, b) if a.is_terminal() && b.is_terminal() && a.ty() == b.ty() => 1,
        _ => 0,
    }
}

/// One-point (homologous) crossover: swap the subtree at a uniformly chosen
/// position of the common region. A common region smaller than 2 leaves
/// only the whole-tree swap, so `parent2` is returned as-is.
pub fn one_point_crossover<R: Rng>(parent1: &Tree, parent2: &Tree, rng: &mut R) -> Tree {
    let region = common_region_size(parent1, parent2);
    if region < 2 {
        return parent2.clone();
    }
    one_point_crossover_at(parent1, parent2, rng.gen_range(0..region))
}

/// Deterministic one-point crossover at a fixed common-region offset,
/// counted in the canonical children-first order.
pub fn one_point_crossover_at(parent1: &Tree, parent2: &Tree, offset: usize) -> Tree {
    match swap_aligned(parent1, parent2, offset) {
        Ok(child) => child,
        Err(_) => parent1.clone(),
    }
}

fn swap_aligned(a: &Tree, b: &Tree, mut offset: usize) -> Result<Tree, usize> {
    if let (
        Node::Function {
            op: op_a,
            children: children_a,
        },
        Node::Function {
            op: op_b,
            children: children_b,
        },
    ) = (a.as_ref(), b.as_ref())
    {
        if op_a.symbol() != op_b.symbol() || children_a.len() != children_b.len() {
            return Err(offset);
        }
        for (i, (x, y)) in children_a.iter().zip(children_b).enumerate() {
            match swap_aligned(x, y, offset) {
                Ok(new_child) => {
                    let mut new_children = children_a.clone();
                    new_children[i] = new_child;
                    return Ok(Node::call(op_a.clone(), new_children));
                }
                Err(remaining) => offset = remaining,
            }
        }
        if offset == 0 {
            return Ok(take_aligned(a, b));
        }
        return Err(offset - 1);
    }

    if a.is_terminal() && b.is_terminal() && a.ty() == b.ty() {
        if offset == 0 {
            return Ok(take_aligned(a, b));
        }
        return Err(offset - 1);
    }
    Err(offset)
}

/// The selected aligned subtree is taken from `parent2`, falling back to
/// `parent1`'s own subtree if the two no longer align by type.
fn take_aligned(a: &Tree, b: &Tree) -> Tree {
    if b.ty() == a.ty() {
        b.clone()
    } else {
        a.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Add, Mul, Sub};
    use crate::types::Type;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn plus(a: Tree, b: Tree) -> Tree {
        Node::call(Arc::new(Add), vec![a, b])
    }

    #[test]
    fn test_common_region_scenario() {
        // (+ (+ 1 2) (+ 3 4)) vs (+ 7 (+ 8 9)) -> 4
        let t1 = plus(
            plus(Node::integer(1), Node::integer(2)),
            plus(Node::integer(3), Node::integer(4)),
        );
        let t2 = plus(Node::integer(7), plus(Node::integer(8), Node::integer(9)));
        assert_eq!(common_region_size(&t1, &t2), 4);
    }

    #[test]
    fn test_common_region_bounded_by_smaller_tree() {
        let t1 = plus(Node::integer(1), Node::integer(2));
        let t2 = plus(
            plus(Node::integer(1), Node::integer(2)),
            plus(Node::integer(3), Node::integer(4)),
        );
        let region = common_region_size(&t1, &t2);
        assert!(region <= walk::size(&t1).min(walk::size(&t2)));
    }

    #[test]
    fn test_mismatch_voids_whole_branch() {
        // roots differ: nothing aligns even though leaves would
        let t1 = plus(Node::integer(1), Node::integer(2));
        let t2 = Node::call(Arc::new(Sub), vec![Node::integer(1), Node::integer(2)]);
        assert_eq!(common_region_size(&t1, &t2), 0);
    }

    #[test]
    fn test_one_point_offsets_swap_single_aligned_subtrees() {
        let t1 = plus(
            plus(Node::integer(1), Node::integer(2)),
            plus(Node::integer(3), Node::integer(4)),
        );
        let t2 = plus(Node::integer(7), plus(Node::integer(8), Node::integer(9)));

        assert_eq!(
            one_point_crossover_at(&t1, &t2, 0).to_string(),
            "(+ (+ 1 2) (+ 8 4))"
        );
        assert_eq!(
            one_point_crossover_at(&t1, &t2, 1).to_string(),
            "(+ (+ 1 2) (+ 3 9))"
        );
        assert_eq!(
            one_point_crossover_at(&t1, &t2, 2).to_string(),
            "(+ (+ 1 2) (+ 8 9))"
        );
        assert_eq!(one_point_crossover_at(&t1, &t2, 3).to_string(), t2.to_string());
    }

    #[test]
    fn test_one_point_small_region_returns_parent2() {
        let t1 = plus(Node::integer(1), Node::integer(2));
        let t2 = Node::integer(9);
        let mut rng = StdRng::seed_from_u64(11);
        let child = one_point_crossover(&t1, &t2, &mut rng);
        assert!(Arc::ptr_eq(&child, &t2));
    }

    #[test]
    fn test_subtree_crossover_preserves_type_and_depth() {
        let t1 = plus(Node::integer(9), Node::integer(5));
        let t2 = Node::call(
            Arc::new(Mul),
            vec![
                Node::integer(7),
                Node::call(
                    Arc::new(Sub),
                    vec![Node::integer(8), Node::variable(5, Type::integer())],
                ),
            ],
        );
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            let child = subtree_crossover(&t1, &t2, 6, &mut rng);
            assert_eq!(child.ty(), Type::integer());
            assert!(walk::height(&child) <= 6);
        }
    }

    #[test]
    fn test_subtree_crossover_produces_expected_substitution() {
        // (+ 9 5) x (* 7 (- 8 v5)) can yield (+ 9 (- 8 v5))
        let t1 = plus(Node::integer(9), Node::integer(5));
        let t2 = Node::call(
            Arc::new(Mul),
            vec![
                Node::integer(7),
                Node::call(
                    Arc::new(Sub),
                    vec![Node::integer(8), Node::variable(5, Type::integer())],
                ),
            ],
        );
        let mut rng = StdRng::seed_from_u64(13);
        let seen = (0..300)
            .map(|_| subtree_crossover(&t1, &t2, 6, &mut rng).to_string())
            .collect::<std::collections::HashSet<_>>();
        assert!(seen.contains("(+ 9 (- 8 v5))"));
    }
}
