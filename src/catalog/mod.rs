//! Read-only indexes of the functions, constants and variables available to
//! tree generation and mutation, built once per run and shared via `Arc`.

pub mod generator;

pub use generator::TreeGenerator;

use crate::error::{Result, TreeLangError};
use crate::operators::OpRef;
use crate::tree::{Node, Tree};
use crate::types::{Signature, Type, Value};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// Functions indexed by return type and by full signature.
#[derive(Debug, Default)]
pub struct FunctionSet {
    all: Vec<OpRef>,
    by_return: HashMap<Type, Vec<OpRef>>,
    by_signature: HashMap<Signature, Vec<OpRef>>,
}

impl FunctionSet {
    pub fn new(ops: Vec<OpRef>) -> Self {
        let mut by_return: HashMap<Type, Vec<OpRef>> = HashMap::new();
        let mut by_signature: HashMap<Signature, Vec<OpRef>> = HashMap::new();
        for op in &ops {
            by_return
                .entry(op.return_type())
                .or_default()
                .push(op.clone());
            by_signature
                .entry(op.signature())
                .or_default()
                .push(op.clone());
        }
        Self {
            all: ops,
            by_return,
            by_signature,
        }
    }

    pub fn all(&self) -> &[OpRef] {
        &self.all
    }

    pub fn has(&self, ty: &Type) -> bool {
        self.by_return.contains_key(ty)
    }

    pub fn of_type(&self, ty: &Type) -> &[OpRef] {
        self.by_return.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn with_signature(&self, signature: &Signature) -> &[OpRef] {
        self.by_signature
            .get(signature)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Constant terminals indexed by type; stored as shared nodes.
#[derive(Debug, Default)]
pub struct ConstantSet {
    by_type: HashMap<Type, Vec<Tree>>,
}

impl ConstantSet {
    pub fn new(constants: Vec<(Value, Type)>) -> Self {
        let mut by_type: HashMap<Type, Vec<Tree>> = HashMap::new();
        for (value, ty) in constants {
            by_type
                .entry(ty.clone())
                .or_default()
                .push(Node::constant(value, ty));
        }
        Self { by_type }
    }

    pub fn has(&self, ty: &Type) -> bool {
        self.by_type.contains_key(ty)
    }

    pub fn of_type(&self, ty: &Type) -> &[Tree] {
        self.by_type.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Variable terminals indexed by type. Ids are positions into the external
/// assignment vector, assigned in declaration order.
#[derive(Debug, Default)]
pub struct VariableSet {
    all: Vec<Tree>,
    by_type: HashMap<Type, Vec<Tree>>,
}

impl VariableSet {
    pub fn new(types: Vec<Type>) -> Self {
        let mut all = Vec::with_capacity(types.len());
        let mut by_type: HashMap<Type, Vec<Tree>> = HashMap::new();
        for (id, ty) in types.into_iter().enumerate() {
            let var = Node::variable(id, ty.clone());
            by_type.entry(ty).or_default().push(var.clone());
            all.push(var);
        }
        Self { all, by_type }
    }

    /// All variables in id order.
    pub fn all(&self) -> &[Tree] {
        &self.all
    }

    pub fn has(&self, ty: &Type) -> bool {
        self.by_type.contains_key(ty)
    }

    pub fn of_type(&self, ty: &Type) -> &[Tree] {
        self.by_type.get(ty).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The combined read-only primitive indexes plus the terminal-sampling
/// policy shared by generation and mutation.
#[derive(Debug)]
pub struct PrimitiveCatalog {
    functions: FunctionSet,
    constants: ConstantSet,
    variables: VariableSet,
    ratio_variables: f64,
}

impl PrimitiveCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn functions(&self) -> &FunctionSet {
        &self.functions
    }

    pub fn constants(&self) -> &ConstantSet {
        &self.constants
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    pub fn has_terminals(&self, ty: &Type) -> bool {
        self.constants.has(ty) || self.variables.has(ty)
    }

    pub fn has_functions(&self, ty: &Type) -> bool {
        self.functions.has(ty)
    }

    /// Random terminal of `ty`: a variable with probability
    /// `ratio_variables`, otherwise a constant, falling back to the other
    /// category when the chosen one is empty.
    pub fn next_terminal<R: Rng>(&self, ty: &Type, rng: &mut R) -> Result<Tree> {
        let variables = self.variables.of_type(ty);
        let constants = self.constants.of_type(ty);
        let pick_variable = if variables.is_empty() {
            false
        } else if constants.is_empty() {
            true
        } else {
            rng.gen::<f64>() < self.ratio_variables
        };
        let pool = if pick_variable { variables } else { constants };
        pool.choose(rng).cloned().ok_or_else(|| {
            TreeLangError::Generation(format!("no terminals of type {}", ty))
        })
    }

    /// Uniformly random function returning `ty`.
    pub fn next_function<R: Rng>(&self, ty: &Type, rng: &mut R) -> Result<OpRef> {
        self.functions.of_type(ty).choose(rng).cloned().ok_or_else(|| {
            TreeLangError::Generation(format!("no functions of type {}", ty))
        })
    }

    /// A terminal of `current`'s type different from `current`, or
    /// `current` itself when no alternative exists. Mutation operators rely
    /// on the returned reference to detect "nothing changed".
    pub fn next_alternative_terminal<R: Rng>(&self, current: &Tree, rng: &mut R) -> Tree {
        let ty = current.ty();
        let candidates: Vec<&Tree> = self
            .variables
            .of_type(&ty)
            .iter()
            .chain(self.constants.of_type(&ty))
            .filter(|t| t.as_ref() != current.as_ref())
            .collect();
        match candidates.choose(rng) {
            Some(alternative) => (*alternative).clone(),
            None => current.clone(),
        }
    }

    /// A function sharing `current`'s signature but not its symbol, or
    /// `current` itself when it is the only one.
    pub fn next_alternative_function<R: Rng>(&self, current: &OpRef, rng: &mut R) -> OpRef {
        let candidates: Vec<&OpRef> = self
            .functions
            .with_signature(&current.signature())
            .iter()
            .filter(|op| op.symbol() != current.symbol())
            .collect();
        match candidates.choose(rng) {
            Some(alternative) => (*alternative).clone(),
            None => current.clone(),
        }
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    functions: Vec<OpRef>,
    constants: Vec<(Value, Type)>,
    variables: Vec<Type>,
    ratio_variables: Option<f64>,
}

impl CatalogBuilder {
    pub fn function(mut self, op: OpRef) -> Self {
        self.functions.push(op);
        self
    }

    pub fn functions(mut self, ops: impl IntoIterator<Item = OpRef>) -> Self {
        self.functions.extend(ops);
        self
    }

    pub fn constant(mut self, value: Value) -> Self {
        let ty = value.type_of();
        self.constants.push((value, ty));
        self
    }

    pub fn typed_constant(mut self, value: Value, ty: Type) -> Self {
        self.constants.push((value, ty));
        self
    }

    /// Declare a variable; its id is the next free position in the
    /// assignment vector.
    pub fn variable(mut self, ty: Type) -> Self {
        self.variables.push(ty);
        self
    }

    pub fn ratio_variables(mut self, ratio: f64) -> Self {
        self.ratio_variables = Some(ratio);
        self
    }

    pub fn build(self) -> Arc<PrimitiveCatalog> {
        let ratio = self.ratio_variables.unwrap_or(0.5);
        Arc::new(PrimitiveCatalog {
            functions: FunctionSet::new(self.functions),
            constants: ConstantSet::new(self.constants),
            variables: VariableSet::new(self.variables),
            ratio_variables: ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Add, Mul, Sub};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> Arc<PrimitiveCatalog> {
        PrimitiveCatalog::builder()
            .functions([
                Arc::new(Add) as OpRef,
                Arc::new(Sub) as OpRef,
                Arc::new(Mul) as OpRef,
            ])
            .constant(Value::Integer(0))
            .constant(Value::Integer(1))
            .variable(Type::integer())
            .variable(Type::integer())
            .build()
    }

    #[test]
    fn test_existence_checks() {
        let c = catalog();
        assert!(c.has_terminals(&Type::integer()));
        assert!(c.has_functions(&Type::integer()));
        assert!(!c.has_terminals(&Type::boolean()));
        assert!(!c.has_functions(&Type::boolean()));
    }

    #[test]
    fn test_next_terminal_unsatisfiable_type_fails() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let err = c.next_terminal(&Type::boolean(), &mut rng).unwrap_err();
        assert!(err.to_string().contains("no terminals of type boolean"));
    }

    #[test]
    fn test_next_function_respects_return_type() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let op = c.next_function(&Type::integer(), &mut rng).unwrap();
            assert_eq!(op.return_type(), Type::integer());
        }
    }

    #[test]
    fn test_alternative_terminal_differs_when_possible() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        let current = Node::integer(0);
        for _ in 0..20 {
            let alt = c.next_alternative_terminal(&current, &mut rng);
            assert_ne!(*alt, *current);
        }
    }

    #[test]
    fn test_alternative_terminal_no_op_without_candidates() {
        let only = PrimitiveCatalog::builder()
            .constant(Value::Integer(7))
            .build();
        let mut rng = StdRng::seed_from_u64(4);
        let current = Node::integer(7);
        let alt = only.next_alternative_terminal(&current, &mut rng);
        assert!(Arc::ptr_eq(&alt, &current));
    }

    #[test]
    fn test_alternative_function_no_op_when_single_candidate() {
        let only = PrimitiveCatalog::builder()
            .function(Arc::new(Add) as OpRef)
            .build();
        let mut rng = StdRng::seed_from_u64(5);
        let current: OpRef = Arc::new(Add);
        let alt = only.next_alternative_function(&current, &mut rng);
        assert_eq!(alt.symbol(), current.symbol());
    }
}
