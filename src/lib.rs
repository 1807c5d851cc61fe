//! Strongly typed expression trees with genetic operators and a
//! term-rewriting simplifier.
//!
//! The crate is split into a few layers:
//!
//! - [`types`] and [`tree`] define the type model and the immutable,
//!   structurally shared expression trees.
//! - [`operators`] holds the built-in function nodes together with their
//!   local rewrite rules.
//! - [`catalog`] indexes the primitives available to generation and mutation
//!   and grows random trees from them.
//! - [`engines`] contains the evaluator, the simplification driver and the
//!   type-aware crossover and mutation operators.

pub mod catalog;
pub mod config;
pub mod engines;
pub mod error;
pub mod operators;
pub mod tree;
pub mod types;

pub use catalog::{CatalogBuilder, PrimitiveCatalog, TreeGenerator};
pub use config::GenerationConfig;
pub use engines::{evaluate, evaluate_batch, simplify};
pub use error::{Result, TreeLangError};
pub use tree::{Node, Tree};
pub use types::{Signature, Type, Value};
