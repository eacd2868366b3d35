//! Assertion atoms.
//!
//! Every check takes a label string first and produces a `Value::Check`
//! carrying the raw outcome. A check never raises for a failed
//! comparison; an error raised while evaluating an operand is caught
//! here and folded into an Error-class outcome, so one broken check does
//! not take down the rest of the file.

use std::sync::Arc;

use difference::{Changeset, Difference};

use crate::atoms::{Atom, AtomRegistry};
use crate::harness::outcome::{CheckOutcome, SourceRef};
use crate::prelude::*;
use crate::runtime::eval::{eval, EvalContext};
use crate::runtime::scope::Scope;

pub fn register(registry: &mut AtomRegistry) {
    registry.register("check-equal", Atom::Special(check_equal));
    registry.register("check-true", Atom::Special(check_true));
    registry.register("check-false", Atom::Special(check_false));
    registry.register("fail", Atom::Special(fail));
    registry.register("skip", Atom::Special(skip));
    registry.register("warn", Atom::Special(warn));
    registry.register("harness-active?", Atom::Pure(harness_active));
}

/// `(harness-active?)`: true while a suite run holds the process-wide
/// harness flag.
fn harness_active(args: &[Value]) -> Result<Value, ErrorKind> {
    if !args.is_empty() {
        return Err(crate::atoms::arity("harness-active?", "0", args.len()));
    }
    Ok(Value::Bool(crate::harness::active()))
}

// ============================================================================
// HELPERS
// ============================================================================

fn check_location(ctx: &EvalContext, call_span: &Span) -> Option<SourceRef> {
    Some(SourceRef {
        file: ctx.source.name.clone(),
        line: call_span.line,
    })
}

/// The label must be a literal string: a malformed check is a script bug,
/// reported as a hard error rather than a failed outcome.
fn literal_label(
    name: &str,
    args: &[AstNode],
    ctx: &EvalContext,
    call_span: &Span,
) -> Result<String, TesseraError> {
    let Some(first) = args.first() else {
        return Err(ctx.arity_mismatch(name, "label + operands", 0, to_source_span(*call_span)));
    };
    match &*first.value {
        Expr::String(s) => Ok(s.clone()),
        other => Err(ctx.type_mismatch(
            &format!("literal label string (in '{}')", name),
            other.kind_name(),
            ctx.span_for(first),
        )),
    }
}

fn exact_operands(
    name: &str,
    expected: usize,
    args: &[AstNode],
    ctx: &EvalContext,
    call_span: &Span,
) -> Result<(), TesseraError> {
    // +1 for the label
    if args.len() != expected + 1 {
        return Err(ctx.arity_mismatch(
            name,
            &(expected + 1).to_string(),
            args.len(),
            to_source_span(*call_span),
        ));
    }
    Ok(())
}

/// Evaluate a check operand, folding interpreter errors into an
/// Error-class outcome instead of propagating them.
fn eval_operand(
    node: &AstNode,
    label: &str,
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, Box<CheckOutcome>> {
    match eval(node, scope, ctx) {
        Ok(value) => Ok(value),
        Err(e) => Err(Box::new(CheckOutcome::error(
            label.to_string(),
            check_location(ctx, call_span),
            e.to_string(),
            None,
        ))),
    }
}

/// Line diff between the rendered expected and actual values.
fn render_diff(expected: &str, actual: &str) -> String {
    let changeset = Changeset::new(expected, actual, "\n");
    let mut out = String::new();
    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => {
                for line in text.lines() {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Difference::Rem(text) => {
                for line in text.lines() {
                    out.push_str("- ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Difference::Add(text) => {
                for line in text.lines() {
                    out.push_str("+ ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
    out.trim_end().to_string()
}

fn wrap(check: CheckOutcome) -> Value {
    Value::Check(Arc::new(check))
}

// ============================================================================
// CHECK ATOMS
// ============================================================================

/// `(check-equal "label" expected actual)`
fn check_equal(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    let label = literal_label("check-equal", args, ctx, call_span)?;
    exact_operands("check-equal", 2, args, ctx, call_span)?;
    let location = check_location(ctx, call_span);

    let expected = match eval_operand(&args[1], &label, scope, ctx, call_span) {
        Ok(v) => v,
        Err(errored) => return Ok(wrap(*errored)),
    };
    let actual = match eval_operand(&args[2], &label, scope, ctx, call_span) {
        Ok(v) => v,
        Err(errored) => return Ok(wrap(*errored)),
    };

    if expected == actual {
        return Ok(wrap(CheckOutcome::pass(label, location)));
    }
    let message = format!("expected {}, got {}", expected, actual);
    let detail = render_diff(&expected.to_string(), &actual.to_string());
    Ok(wrap(CheckOutcome::fail(
        label,
        location,
        message,
        Some(detail),
    )))
}

/// `(check-true "label" expr)`
fn check_true(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    check_bool("check-true", true, args, scope, ctx, call_span)
}

/// `(check-false "label" expr)`
fn check_false(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    check_bool("check-false", false, args, scope, ctx, call_span)
}

fn check_bool(
    name: &str,
    want: bool,
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    let label = literal_label(name, args, ctx, call_span)?;
    exact_operands(name, 1, args, ctx, call_span)?;
    let location = check_location(ctx, call_span);

    let value = match eval_operand(&args[1], &label, scope, ctx, call_span) {
        Ok(v) => v,
        Err(errored) => return Ok(wrap(*errored)),
    };

    if value == Value::Bool(want) {
        return Ok(wrap(CheckOutcome::pass(label, location)));
    }
    let message = format!("expected {}, got {}", want, value);
    Ok(wrap(CheckOutcome::fail(label, location, message, None)))
}

/// `(fail "label" message?)`: an unconditional failure.
fn fail(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    let label = literal_label("fail", args, ctx, call_span)?;
    let location = check_location(ctx, call_span);
    let message = optional_text(args.get(1), &label, scope, ctx, call_span)?
        .unwrap_or_else(|| "failed unconditionally".to_string());
    Ok(wrap(CheckOutcome::fail(label, location, message, None)))
}

/// `(skip "label" reason?)`: counted, never detailed.
fn skip(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    let label = literal_label("skip", args, ctx, call_span)?;
    let location = check_location(ctx, call_span);
    let reason = optional_text(args.get(1), &label, scope, ctx, call_span)?
        .unwrap_or_else(|| "skipped".to_string());
    Ok(wrap(CheckOutcome::skip(label, location, reason)))
}

/// `(warn "label" message?)`: counted, never detailed.
fn warn(
    args: &[AstNode],
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Value, TesseraError> {
    let label = literal_label("warn", args, ctx, call_span)?;
    let location = check_location(ctx, call_span);
    let message = optional_text(args.get(1), &label, scope, ctx, call_span)?
        .unwrap_or_else(|| "warning".to_string());
    Ok(wrap(CheckOutcome::warn(label, location, message)))
}

fn optional_text(
    node: Option<&AstNode>,
    label: &str,
    scope: &mut Scope,
    ctx: &mut EvalContext,
    call_span: &Span,
) -> Result<Option<String>, TesseraError> {
    let Some(node) = node else {
        return Ok(None);
    };
    match eval_operand(node, label, scope, ctx, call_span) {
        Ok(Value::String(s)) => Ok(Some(s)),
        Ok(other) => Ok(Some(other.to_string())),
        // A blown-up message expression degrades to its error text.
        Err(errored) => Ok(Some(errored.message().to_string())),
    }
}
