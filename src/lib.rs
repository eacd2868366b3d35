pub use crate::errors::{ErrorKind, SourceContext, TesseraError};

pub mod ast;
pub mod atoms;
pub mod cli;
pub mod errors;
pub mod harness;
pub mod prelude;
pub mod runtime;
pub mod syntax;
