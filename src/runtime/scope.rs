//! Lexical scopes.
//!
//! A scope is an immutable-map environment. `child()` is a structurally
//! shared clone: bindings added to the child are invisible to the parent,
//! and a child holds the parent's bindings at the moment of the split.
//! Discarding the child discards everything it defined. This is what makes
//! per-file isolation in the harness a property of the data structure
//! rather than of runner discipline.

use im::HashMap;

use crate::ast::value::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// The base scope shared by a whole suite: only `nil` is pre-bound.
    pub fn base() -> Self {
        let mut scope = Self::new();
        scope.define("nil", Value::Nil);
        scope
    }

    /// A scope seeded with this scope's bindings. Cheap: structural sharing.
    pub fn child(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
        }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_defines_do_not_leak_to_parent() {
        let mut parent = Scope::base();
        parent.define("shared", Value::Number(1.0));

        let mut child = parent.child();
        child.define("local", Value::Number(2.0));

        assert!(child.lookup("shared").is_some());
        assert!(child.lookup("local").is_some());
        assert!(parent.lookup("local").is_none());
    }

    #[test]
    fn child_snapshot_ignores_later_parent_changes() {
        let mut parent = Scope::base();
        let child = parent.child();
        parent.define("late", Value::Bool(true));
        assert!(child.lookup("late").is_none());
    }
}
