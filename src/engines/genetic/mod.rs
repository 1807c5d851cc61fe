pub mod crossover;
pub mod mutation;
pub mod program;

pub use crossover::{
    common_region_size, one_point_crossover, one_point_crossover_at, subtree_crossover,
};
pub use mutation::{
    constant_to_function_mutation, hoist_mutation, point_mutation, shrink_mutation,
    subtree_mutation,
};
pub use program::Program;
