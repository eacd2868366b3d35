//! Mathematical atoms.
//!
//! All pure: no scope access, no output.

use crate::ast::value::Value;
use crate::atoms::{arity, expect_number, Atom, AtomRegistry};
use crate::errors::ErrorKind;

pub fn register(registry: &mut AtomRegistry) {
    registry.register("+", Atom::Pure(add));
    registry.register("-", Atom::Pure(sub));
    registry.register("*", Atom::Pure(mul));
    registry.register("/", Atom::Pure(div));
    registry.register("mod", Atom::Pure(modulo));
    registry.register("abs", Atom::Pure(abs));
    registry.register("min", Atom::Pure(min));
    registry.register("max", Atom::Pure(max));
}

fn numbers(args: &[Value], atom_name: &str) -> Result<Vec<f64>, ErrorKind> {
    args.iter().map(|v| expect_number(v, atom_name)).collect()
}

fn add(args: &[Value]) -> Result<Value, ErrorKind> {
    let ns = numbers(args, "+")?;
    Ok(Value::Number(ns.iter().sum()))
}

fn sub(args: &[Value]) -> Result<Value, ErrorKind> {
    let ns = numbers(args, "-")?;
    match ns.split_first() {
        None => Err(arity("-", "1+", 0)),
        Some((first, [])) => Ok(Value::Number(-first)),
        Some((first, rest)) => Ok(Value::Number(rest.iter().fold(*first, |acc, n| acc - n))),
    }
}

fn mul(args: &[Value]) -> Result<Value, ErrorKind> {
    let ns = numbers(args, "*")?;
    Ok(Value::Number(ns.iter().product()))
}

fn div(args: &[Value]) -> Result<Value, ErrorKind> {
    let ns = numbers(args, "/")?;
    let Some((first, rest)) = ns.split_first() else {
        return Err(arity("/", "1+", 0));
    };
    if rest.is_empty() {
        return Ok(Value::Number(*first));
    }
    let mut acc = *first;
    for n in rest {
        if *n == 0.0 {
            return Err(ErrorKind::DivisionByZero);
        }
        acc /= n;
    }
    Ok(Value::Number(acc))
}

fn modulo(args: &[Value]) -> Result<Value, ErrorKind> {
    if args.len() != 2 {
        return Err(arity("mod", "2", args.len()));
    }
    let a = expect_number(&args[0], "mod")?;
    let b = expect_number(&args[1], "mod")?;
    if b == 0.0 {
        return Err(ErrorKind::DivisionByZero);
    }
    Ok(Value::Number(a.rem_euclid(b)))
}

fn abs(args: &[Value]) -> Result<Value, ErrorKind> {
    if args.len() != 1 {
        return Err(arity("abs", "1", args.len()));
    }
    Ok(Value::Number(expect_number(&args[0], "abs")?.abs()))
}

fn min(args: &[Value]) -> Result<Value, ErrorKind> {
    let ns = numbers(args, "min")?;
    ns.into_iter()
        .reduce(f64::min)
        .map(Value::Number)
        .ok_or_else(|| arity("min", "1+", 0))
}

fn max(args: &[Value]) -> Result<Value, ErrorKind> {
    let ns = numbers(args, "max")?;
    ns.into_iter()
        .reduce(f64::max)
        .map(Value::Number)
        .ok_or_else(|| arity("max", "1+", 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_by_zero_is_an_error() {
        let err = div(&[Value::Number(1.0), Value::Number(0.0)]).unwrap_err();
        assert!(matches!(err, ErrorKind::DivisionByZero));
    }

    #[test]
    fn sub_negates_a_single_operand() {
        assert_eq!(sub(&[Value::Number(4.0)]).unwrap(), Value::Number(-4.0));
    }

    #[test]
    fn non_numbers_report_type_mismatch() {
        let err = add(&[Value::String("x".into())]).unwrap_err();
        assert!(matches!(err, ErrorKind::TypeMismatch { .. }));
    }
}
