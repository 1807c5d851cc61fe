//! Multi-branch programs: a tuple of independently-typed trees (main branch
//! plus automatically defined functions). Genetic operators act on one
//! branch at a time, chosen with probability proportional to its node
//! count, and splice the result back in place.

use crate::error::Result;
use crate::tree::{walk, Tree};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    branches: Vec<Tree>,
}

impl Program {
    pub fn new(branches: Vec<Tree>) -> Self {
        assert!(!branches.is_empty(), "a program needs at least one branch");
        Self { branches }
    }

    pub fn branches(&self) -> &[Tree] {
        &self.branches
    }

    pub fn branch(&self, index: usize) -> &Tree {
        &self.branches[index]
    }

    pub fn node_count(&self) -> usize {
        self.branches.iter().map(|b| walk::size(b)).sum()
    }

    /// Pick a branch index weighted by branch node count.
    fn pick_branch<R: Rng>(&self, rng: &mut R) -> usize {
        let total = self.node_count();
        let mut roll = rng.gen_range(0..total);
        for (index, branch) in self.branches.iter().enumerate() {
            let nodes = walk::size(branch);
            if roll < nodes {
                return index;
            }
            roll -= nodes;
        }
        self.branches.len() - 1
    }

    fn with_branch(&self, index: usize, tree: Tree) -> Program {
        let mut branches = self.branches.clone();
        branches[index] = tree;
        Program { branches }
    }

    /// Apply a single-tree mutation operator to one weighted-random branch.
    pub fn mutate<R, F>(&self, rng: &mut R, operator: F) -> Result<Program>
    where
        R: Rng,
        F: FnOnce(&Tree, &mut R) -> Result<Tree>,
    {
        let index = self.pick_branch(rng);
        let mutated = operator(&self.branches[index], rng)?;
        Ok(self.with_branch(index, mutated))
    }

    /// Apply a single-tree crossover operator between one weighted-random
    /// branch of `self` and the corresponding branch of `other`.
    pub fn crossover<R, F>(&self, other: &Program, rng: &mut R, operator: F) -> Result<Program>
    where
        R: Rng,
        F: FnOnce(&Tree, &Tree, &mut R) -> Result<Tree>,
    {
        assert_eq!(
            self.branches.len(),
            other.branches.len(),
            "programs must have the same branch structure"
        );
        let index = self.pick_branch(rng);
        let child = operator(&self.branches[index], &other.branches[index], rng)?;
        Ok(self.with_branch(index, child))
    }
}
