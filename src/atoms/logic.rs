//! Logic and comparison atoms.

use crate::ast::value::Value;
use crate::atoms::{arity, expect_number, Atom, AtomRegistry};
use crate::errors::ErrorKind;

pub fn register(registry: &mut AtomRegistry) {
    registry.register("=", Atom::Pure(eq));
    registry.register("not", Atom::Pure(not));
    registry.register("<", Atom::Pure(lt));
    registry.register(">", Atom::Pure(gt));
    registry.register("<=", Atom::Pure(le));
    registry.register(">=", Atom::Pure(ge));
}

fn eq(args: &[Value]) -> Result<Value, ErrorKind> {
    if args.len() < 2 {
        return Err(arity("=", "2+", args.len()));
    }
    Ok(Value::Bool(args.windows(2).all(|w| w[0] == w[1])))
}

fn not(args: &[Value]) -> Result<Value, ErrorKind> {
    if args.len() != 1 {
        return Err(arity("not", "1", args.len()));
    }
    Ok(Value::Bool(!args[0].is_truthy()))
}

fn compare(
    args: &[Value],
    name: &str,
    ordered: fn(f64, f64) -> bool,
) -> Result<Value, ErrorKind> {
    if args.len() < 2 {
        return Err(arity(name, "2+", args.len()));
    }
    let ns: Vec<f64> = args
        .iter()
        .map(|v| expect_number(v, name))
        .collect::<Result<_, _>>()?;
    Ok(Value::Bool(ns.windows(2).all(|w| ordered(w[0], w[1]))))
}

fn lt(args: &[Value]) -> Result<Value, ErrorKind> {
    compare(args, "<", |a, b| a < b)
}

fn gt(args: &[Value]) -> Result<Value, ErrorKind> {
    compare(args, ">", |a, b| a > b)
}

fn le(args: &[Value]) -> Result<Value, ErrorKind> {
    compare(args, "<=", |a, b| a <= b)
}

fn ge(args: &[Value]) -> Result<Value, ErrorKind> {
    compare(args, ">=", |a, b| a >= b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_chains() {
        let t = eq(&[Value::Number(1.0), Value::Number(1.0), Value::Number(1.0)]).unwrap();
        assert_eq!(t, Value::Bool(true));
        let f = eq(&[Value::Number(1.0), Value::Number(2.0)]).unwrap();
        assert_eq!(f, Value::Bool(false));
    }

    #[test]
    fn comparisons_chain() {
        let t = lt(&[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]).unwrap();
        assert_eq!(t, Value::Bool(true));
    }
}
