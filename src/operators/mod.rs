pub mod arithmetic;
pub mod boolean;
pub mod collection;
pub mod comparison;
pub mod selection;
pub mod traits;

pub use arithmetic::{Add, Div, Mul, Neg, Sub};
pub use boolean::{And, Not, Or, Xor};
pub use collection::{Dedup, Size, Sort};
pub use comparison::{Eq, Ge, Gt, Le, Lt, Ne};
pub use selection::If;
pub use traits::{OpRef, Operator};
