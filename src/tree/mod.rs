pub mod node;
pub mod order;
pub mod sexpr;
pub mod walk;

pub use node::{Node, Tree};
pub use order::{node_cmp, value_cmp};
pub use sexpr::SymbolTable;
pub use walk::{
    any_node, depth_at, height, is_function, is_terminal, node_at, node_count, replace_all,
    replace_at, size, subtrees, NodePredicate,
};
