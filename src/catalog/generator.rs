use super::PrimitiveCatalog;
use crate::config::GenerationConfig;
use crate::error::{Result, TreeLangError};
use crate::tree::{Node, Tree};
use crate::types::Type;
use log::debug;
use rand::Rng;
use std::sync::Arc;

/// Depth-bounded random tree construction against a shared catalog.
#[derive(Debug, Clone)]
pub struct TreeGenerator {
    catalog: Arc<PrimitiveCatalog>,
    config: GenerationConfig,
}

impl TreeGenerator {
    pub fn new(catalog: Arc<PrimitiveCatalog>, config: GenerationConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Arc<PrimitiveCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Grow a random tree of `ty` with height at most `max_height`.
    /// Terminal selection is certain once the height budget reaches 1 (or
    /// no function of `ty` exists); otherwise a terminal is chosen with the
    /// configured ratio.
    pub fn grow<R: Rng>(&self, ty: &Type, max_height: usize, rng: &mut R) -> Result<Tree> {
        if max_height <= 1 || !self.catalog.has_functions(ty) {
            return self.catalog.next_terminal(ty, rng);
        }
        if self.catalog.has_terminals(ty) && rng.gen::<f64>() < self.config.terminal_ratio {
            return self.catalog.next_terminal(ty, rng);
        }
        let op = self.catalog.next_function(ty, rng)?;
        let children = op
            .input_types()
            .iter()
            .map(|child_ty| self.grow(child_ty, max_height - 1, rng))
            .collect::<Result<Vec<Tree>>>()?;
        Ok(Node::call(op, children))
    }

    /// Grow a full-depth tree of `ty` for the configured maximum.
    pub fn grow_default<R: Rng>(&self, ty: &Type, rng: &mut R) -> Result<Tree> {
        self.grow(ty, self.config.max_depth, rng)
    }

    /// Grow `count` independent trees; the first catalog failure aborts
    /// generation.
    pub fn initial_population<R: Rng>(
        &self,
        ty: &Type,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Tree>> {
        if !self.catalog.has_terminals(ty) && !self.catalog.has_functions(ty) {
            return Err(TreeLangError::Generation(format!(
                "catalog has no primitives of type {}",
                ty
            )));
        }
        debug!("growing initial population of {} trees of type {}", count, ty);
        (0..count).map(|_| self.grow_default(ty, rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::operators::{Add, Mul, OpRef, Sub};
    use crate::tree::walk;
    use crate::types::Value;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator() -> TreeGenerator {
        let catalog = CatalogBuilder::default()
            .functions([
                Arc::new(Add) as OpRef,
                Arc::new(Sub) as OpRef,
                Arc::new(Mul) as OpRef,
            ])
            .constant(Value::Integer(1))
            .constant(Value::Integer(2))
            .variable(Type::integer())
            .build();
        TreeGenerator::new(catalog, GenerationConfig::default())
    }

    #[test]
    fn test_grow_respects_height_bound() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(7);
        for max_height in 1..6 {
            for _ in 0..50 {
                let tree = gen.grow(&Type::integer(), max_height, &mut rng).unwrap();
                assert!(walk::height(&tree) <= max_height);
                assert_eq!(tree.ty(), Type::integer());
            }
        }
    }

    #[test]
    fn test_grow_height_one_is_terminal() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let tree = gen.grow(&Type::integer(), 1, &mut rng).unwrap();
            assert!(tree.is_terminal());
        }
    }

    #[test]
    fn test_grow_unsatisfiable_type_fails() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(gen.grow(&Type::boolean(), 3, &mut rng).is_err());
    }

    #[test]
    fn test_initial_population() {
        let gen = generator();
        let mut rng = StdRng::seed_from_u64(10);
        let trees = gen
            .initial_population(&Type::integer(), 25, &mut rng)
            .unwrap();
        assert_eq!(trees.len(), 25);
        assert!(trees.iter().all(|t| t.ty() == Type::integer()));
    }
}
