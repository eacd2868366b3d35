//! Binding and control special forms.
//!
//! These receive unevaluated nodes: they create bindings, control
//! evaluation order, or write to the output sink.

use std::sync::Arc;

use crate::ast::value::Lambda;
use crate::atoms::{collections::display_raw, Atom, AtomRegistry};
use crate::prelude::*;
use crate::runtime::eval::{eval, eval_args, EvalContext};
use crate::runtime::scope::Scope;

pub fn register(registry: &mut AtomRegistry) {
    registry.register("define", Atom::Special(define));
    registry.register("lambda", Atom::Special(lambda));
    registry.register("let", Atom::Special(let_form));
    registry.register("if", Atom::Special(if_form));
    registry.register("do", Atom::Special(do_form));
    registry.register("and", Atom::Special(and_form));
    registry.register("or", Atom::Special(or_form));
    registry.register("print", Atom::Special(print));
}

// ============================================================================
// HELPERS
// ============================================================================

fn symbol_name<'n>(
    node: &'n AstNode,
    what: &str,
    ctx: &EvalContext,
) -> Result<&'n str, TesseraError> {
    match &*node.value {
        Expr::Symbol(name) => Ok(name),
        other => Err(ctx.type_mismatch(
            &format!("symbol ({})", what),
            other.kind_name(),
            ctx.span_for(node),
        )),
    }
}

fn exact_arity(
    name: &str,
    expected: usize,
    args: &[AstNode],
    ctx: &EvalContext,
    call_span: &Span,
) -> Result<(), TesseraError> {
    if args.len() != expected {
        return Err(ctx.arity_mismatch(
            name,
            &expected.to_string(),
            args.len(),
            to_source_span(*call_span),
        ));
    }
    Ok(())
}

// ============================================================================
// BINDING FORMS
// ============================================================================

/// `(define name expr)`: bind in the current scope, return nil.
fn define(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    exact_arity("define", 2, args, ctx, call_span)?;
    let name = symbol_name(&args[0], "binding name", ctx)?.to_string();
    let value = eval(&args[1], scope, ctx)?;
    scope.define(&name, value);
    Ok(Value::Nil)
}

/// `(lambda (params...) body)`: capture the defining scope.
fn lambda(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    exact_arity("lambda", 2, args, ctx, call_span)?;
    let Expr::List(param_nodes) = &*args[0].value else {
        return Err(ctx.type_mismatch(
            "parameter list",
            args[0].value.kind_name(),
            ctx.span_for(&args[0]),
        ));
    };
    let params: Result<Vec<String>, TesseraError> = param_nodes
        .iter()
        .map(|p| symbol_name(p, "parameter", ctx).map(str::to_string))
        .collect();
    Ok(Value::Lambda(Arc::new(Lambda {
        params: params?,
        body: args[1].clone(),
        env: scope.clone(),
    })))
}

/// `(let ((name expr)...) body)`: bindings live in a child scope.
fn let_form(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    exact_arity("let", 2, args, ctx, call_span)?;
    let Expr::List(bindings) = &*args[0].value else {
        return Err(ctx.type_mismatch(
            "binding list",
            args[0].value.kind_name(),
            ctx.span_for(&args[0]),
        ));
    };
    let mut local = scope.child();
    for binding in bindings {
        let Expr::List(pair) = &*binding.value else {
            return Err(ctx.type_mismatch(
                "(name expr) binding",
                binding.value.kind_name(),
                ctx.span_for(binding),
            ));
        };
        if pair.len() != 2 {
            return Err(ctx.arity_mismatch("let binding", "2", pair.len(), ctx.span_for(binding)));
        }
        let name = symbol_name(&pair[0], "binding name", ctx)?.to_string();
        let value = eval(&pair[1], &mut local, ctx)?;
        local.define(&name, value);
    }
    eval(&args[1], &mut local, ctx)
}

// ============================================================================
// CONTROL FORMS
// ============================================================================

/// `(if cond then else?)`: the else branch defaults to nil.
fn if_form(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(ctx.arity_mismatch("if", "2..3", args.len(), to_source_span(*call_span)));
    }
    let cond = eval(&args[0], scope, ctx)?;
    if cond.is_truthy() {
        eval(&args[1], scope, ctx)
    } else if let Some(else_branch) = args.get(2) {
        eval(else_branch, scope, ctx)
    } else {
        Ok(Value::Nil)
    }
}

/// `(do expr...)`: evaluate in order, return the last value.
fn do_form(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    _call_span: &Span,
) -> Result<Value, TesseraError> {
    let mut last = Value::Nil;
    for node in args {
        last = eval(node, scope, ctx)?;
    }
    Ok(last)
}

/// `(and expr...)`: short-circuit, true for the empty form.
fn and_form(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    _call_span: &Span,
) -> Result<Value, TesseraError> {
    for node in args {
        if !eval(node, scope, ctx)?.is_truthy() {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// `(or expr...)`: short-circuit, false for the empty form.
fn or_form(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    _call_span: &Span,
) -> Result<Value, TesseraError> {
    for node in args {
        if eval(node, scope, ctx)?.is_truthy() {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

/// `(print expr...)`: write to the injected sink, return nil.
fn print(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    let values = eval_args(args, scope, ctx)?;
    let text = values
        .iter()
        .map(display_raw)
        .collect::<Vec<_>>()
        .join(" ");
    ctx.output.emit(&text, Some(call_span));
    Ok(Value::Nil)
}
