pub mod evaluation;
pub mod genetic;
pub mod simplify;

pub use evaluation::{evaluate, evaluate_batch};
pub use simplify::simplify;
