//! Common imports for tessera modules.

pub use crate::ast::value::Value;
pub use crate::ast::{AstNode, Expr, Span, WithSpan};
pub use crate::errors::{
    to_source_span, ErrorKind, ErrorReporting, SourceContext, TesseraError,
};
