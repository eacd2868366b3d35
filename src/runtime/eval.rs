//! The tessera expression evaluator.
//!
//! Translates AST nodes into runtime values against a lexical scope.
//! Dispatch order for a call head: special forms and pure atoms from the
//! registry first, then scope bindings (lambdas). All errors go through
//! the unified `TesseraError` type via the `ErrorReporting` trait.

use miette::SourceSpan;

use crate::ast::value::{Lambda, Value};
use crate::ast::{AstNode, Expr};
use crate::atoms::{Atom, AtomRegistry, OutputSink};
use crate::errors::{
    to_source_span, DiagnosticInfo, ErrorKind, ErrorReporting, SourceContext, SourceInfo,
    TesseraError,
};
use crate::runtime::scope::Scope;

// ============================================================================
// EVALUATION CONTEXT
// ============================================================================

/// Per-file evaluation state: everything except the scope itself.
pub struct EvalContext<'a> {
    pub registry: &'a AtomRegistry,
    pub output: &'a mut dyn OutputSink,
    pub source: SourceContext,
    pub depth: usize,
    pub max_depth: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        registry: &'a AtomRegistry,
        output: &'a mut dyn OutputSink,
        source: SourceContext,
    ) -> Self {
        Self {
            registry,
            output,
            source,
            depth: 0,
            max_depth: 512,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn span_for(&self, node: &AstNode) -> SourceSpan {
        to_source_span(node.span)
    }
}

impl ErrorReporting for EvalContext<'_> {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> TesseraError {
        let error_code = format!("tessera::eval::{}", kind.code_suffix());
        TesseraError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: "eval".into(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

// ============================================================================
// CORE EVALUATION
// ============================================================================

/// Evaluate one node. The public entry point; guards the recursion limit.
pub fn eval(
    node: &AstNode,
    scope: &mut Scope,
    ctx: &mut EvalContext,
) -> Result<Value, TesseraError> {
    if ctx.depth >= ctx.max_depth {
        return Err(ctx.report(ErrorKind::RecursionLimit, ctx.span_for(node)));
    }
    ctx.depth += 1;
    let result = eval_inner(node, scope, ctx);
    ctx.depth -= 1;
    result
}

fn eval_inner(
    node: &AstNode,
    scope: &mut Scope,
    ctx: &mut EvalContext,
) -> Result<Value, TesseraError> {
    match &*node.value {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::String(s) => Ok(Value::String(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Symbol(name) => match scope.lookup(name) {
            Some(value) => Ok(value.clone()),
            None => Err(ctx.undefined_symbol(name, ctx.span_for(node))),
        },
        Expr::List(items) => eval_call(node, items, scope, ctx),
    }
}

fn eval_call(
    node: &AstNode,
    items: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
) -> Result<Value, TesseraError> {
    let Some(head) = items.first() else {
        return Ok(Value::Nil);
    };
    let args = &items[1..];

    if let Expr::Symbol(name) = &*head.value {
        match ctx.registry.get(name) {
            Some(Atom::Special(f)) => return f(args, scope, ctx, &node.span),
            Some(Atom::Pure(f)) => {
                let values = eval_args(args, scope, ctx)?;
                return f(&values).map_err(|kind| ctx.report(kind, ctx.span_for(node)));
            }
            None => {}
        }
        return match scope.lookup(name).cloned() {
            Some(Value::Lambda(lambda)) => call_lambda(&lambda, name, args, scope, ctx, node),
            Some(other) => Err(ctx.report(
                ErrorKind::NotCallable {
                    value: other.type_name().to_string(),
                },
                ctx.span_for(head),
            )),
            None => Err(ctx.undefined_symbol(name, ctx.span_for(head))),
        };
    }

    // Call through an arbitrary head expression, e.g. ((lambda (x) x) 1).
    match eval(head, scope, ctx)? {
        Value::Lambda(lambda) => call_lambda(&lambda, "<lambda>", args, scope, ctx, node),
        other => Err(ctx.report(
            ErrorKind::NotCallable {
                value: other.type_name().to_string(),
            },
            ctx.span_for(head),
        )),
    }
}

/// Evaluate a slice of argument nodes left to right.
pub fn eval_args(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
) -> Result<Vec<Value>, TesseraError> {
    args.iter().map(|a| eval(a, scope, ctx)).collect()
}

fn call_lambda(
    lambda: &std::sync::Arc<Lambda>,
    name: &str,
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call: &AstNode,
) -> Result<Value, TesseraError> {
    if args.len() != lambda.params.len() {
        return Err(ctx.arity_mismatch(
            name,
            &lambda.params.len().to_string(),
            args.len(),
            ctx.span_for(call),
        ));
    }
    let values = eval_args(args, scope, ctx)?;
    let mut env = lambda.env.child();
    // Rebind the call name so a defined lambda can recurse into itself;
    // the closure env was captured before `define` installed it.
    if name != "<lambda>" {
        env.define(name, Value::Lambda(lambda.clone()));
    }
    for (param, value) in lambda.params.iter().zip(values) {
        env.define(param, value);
    }
    eval(&lambda.body, &mut env, ctx)
}
