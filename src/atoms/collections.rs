//! Collection and string atoms.

use crate::ast::value::Value;
use crate::atoms::{arity, Atom, AtomRegistry};
use crate::errors::ErrorKind;

pub fn register(registry: &mut AtomRegistry) {
    registry.register("list", Atom::Pure(list));
    registry.register("len", Atom::Pure(len));
    registry.register("nth", Atom::Pure(nth));
    registry.register("str", Atom::Pure(str_concat));
}

/// Render a value for string building: strings contribute their raw
/// content, everything else its display form.
pub(crate) fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn list(args: &[Value]) -> Result<Value, ErrorKind> {
    Ok(Value::List(args.to_vec()))
}

fn len(args: &[Value]) -> Result<Value, ErrorKind> {
    if args.len() != 1 {
        return Err(arity("len", "1", args.len()));
    }
    let n = match &args[0] {
        Value::List(items) => items.len(),
        Value::String(s) => s.chars().count(),
        Value::Map(map) => map.len(),
        other => {
            return Err(ErrorKind::TypeMismatch {
                expected: "List, String, or Map (in 'len')".into(),
                actual: other.type_name().into(),
            })
        }
    };
    Ok(Value::Number(n as f64))
}

fn nth(args: &[Value]) -> Result<Value, ErrorKind> {
    if args.len() != 2 {
        return Err(arity("nth", "2", args.len()));
    }
    let Value::List(items) = &args[0] else {
        return Err(ErrorKind::TypeMismatch {
            expected: "List (in 'nth')".into(),
            actual: args[0].type_name().into(),
        });
    };
    let Value::Number(index) = &args[1] else {
        return Err(ErrorKind::TypeMismatch {
            expected: "Number (in 'nth')".into(),
            actual: args[1].type_name().into(),
        });
    };
    let i = *index as usize;
    Ok(items.get(i).cloned().unwrap_or(Value::Nil))
}

fn str_concat(args: &[Value]) -> Result<Value, ErrorKind> {
    let mut out = String::new();
    for arg in args {
        out.push_str(&display_raw(arg));
    }
    Ok(Value::String(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nth_out_of_range_is_nil() {
        let v = nth(&[Value::List(vec![Value::Number(1.0)]), Value::Number(5.0)]).unwrap();
        assert!(v.is_nil());
    }

    #[test]
    fn str_joins_raw_content() {
        let v = str_concat(&[
            Value::String("n = ".into()),
            Value::Number(3.0),
        ])
        .unwrap();
        assert_eq!(v, Value::String("n = 3".into()));
    }
}
