//! Term, value and expression types shared by the registry and the compiler.

pub mod expression;
pub mod term;
pub mod value;

pub use expression::{Bindings, Expression, VARIABLE_SIGIL};
pub use term::Term;
pub use value::Value;
