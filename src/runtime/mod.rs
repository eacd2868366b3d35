//! Runtime: lexical scopes and the expression evaluator.

pub mod eval;
pub mod scope;

pub use eval::{eval, EvalContext};
pub use scope::Scope;
