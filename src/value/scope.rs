use std::collections::HashMap;

use super::Value;

/// Name to value bindings for the global scope or a single function call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    values: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Scope {
        Default::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_a_snapshot() {
        let mut scope = Scope::new();
        scope.define("xs", Value::List(vec![Value::Number(1.0)]));
        let snapshot = scope.clone();

        if let Some(Value::List(elements)) = scope.get_mut("xs") {
            elements.push(Value::Number(2.0));
        }
        scope.define("y", Value::Nil);

        assert_eq!(snapshot.get("xs"), Some(&Value::List(vec![Value::Number(1.0)])));
        assert!(!snapshot.contains("y"));
        assert_eq!(scope.len(), 2);
    }
}
