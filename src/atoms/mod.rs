//! # Tessera Atom System
//!
//! Atoms are the named primitives available to check scripts.
//!
//! ## Module Structure
//!
//! - **`math`**: arithmetic (`+`, `-`, `*`, `/`, `mod`, `abs`, `min`, `max`)
//! - **`logic`**: comparison and boolean operations (`=`, `not`, `<`, ...)
//! - **`collections`**: list/string operations (`list`, `len`, `nth`, `str`)
//! - **`special_forms`**: binding and control (`define`, `lambda`, `let`,
//!   `if`, `do`, `and`, `or`, `print`)
//! - **`checks`**: the assertion primitives producing check outcomes
//!
//! ## Calling Conventions
//!
//! `Pure` atoms receive eagerly evaluated values and may not touch scope or
//! output. `Special` atoms receive unevaluated nodes and manage their own
//! evaluation; all binding forms and the check atoms are special because
//! they need the scope, the call span, or control over operand errors.

pub mod checks;
pub mod collections;
pub mod logic;
pub mod math;
pub mod special_forms;

use im::HashMap;
use once_cell::sync::Lazy;

use crate::ast::value::Value;
use crate::ast::{AstNode, Span};
use crate::errors::{ErrorKind, TesseraError};
use crate::runtime::eval::EvalContext;
use crate::runtime::scope::Scope;

// ============================================================================
// CORE TYPES AND TRAITS
// ============================================================================

/// Pure atoms: operate only on values.
pub type PureFn = fn(args: &[Value]) -> Result<Value, ErrorKind>;

/// Special forms: receive unevaluated nodes plus the scope, the evaluation
/// context, and the span of the whole call expression.
pub type SpecialFn = fn(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError>;

/// The unified atom representation.
#[derive(Clone, Copy)]
pub enum Atom {
    Pure(PureFn),
    Special(SpecialFn),
}

/// Output sink for `print`, making script I/O testable and injectable.
pub trait OutputSink {
    fn emit(&mut self, text: &str, span: Option<&Span>);
}

/// A null output sink for running without output.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str, _span: Option<&Span>) {}
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Registry for all atoms, inspectable at runtime.
#[derive(Default, Clone)]
pub struct AtomRegistry {
    atoms: HashMap<String, Atom>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Atom> {
        self.atoms.get(name)
    }

    pub fn register(&mut self, name: &str, atom: Atom) {
        self.atoms.insert(name.to_string(), atom);
    }

    pub fn has(&self, name: &str) -> bool {
        self.atoms.contains_key(name)
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.atoms.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

static CANONICAL: Lazy<AtomRegistry> = Lazy::new(build_canonical_registry);

/// The canonical registry with every builtin atom installed.
pub fn canonical_registry() -> &'static AtomRegistry {
    &CANONICAL
}

fn build_canonical_registry() -> AtomRegistry {
    let mut registry = AtomRegistry::new();
    math::register(&mut registry);
    logic::register(&mut registry);
    collections::register(&mut registry);
    special_forms::register(&mut registry);
    checks::register(&mut registry);
    registry
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Extract a number operand or produce a type error for `atom_name`.
pub(crate) fn expect_number(value: &Value, atom_name: &str) -> Result<f64, ErrorKind> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(ErrorKind::TypeMismatch {
            expected: format!("Number (in '{}')", atom_name),
            actual: other.type_name().to_string(),
        }),
    }
}

/// Arity error for a pure atom.
pub(crate) fn arity(name: &str, expected: &str, actual: usize) -> ErrorKind {
    ErrorKind::ArityMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        actual,
    }
}
