use std::collections::HashMap;
use std::rc::Rc;

use super::scope::Scope;
use crate::interpreter::lines::SourceLine;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<SourceLine>,
    /// The defining scope as it was when `def` ran.
    pub captured: Scope,
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Rc<FunctionDefinition>>,
}

impl FunctionRegistry {
    pub fn define(&mut self, definition: FunctionDefinition) {
        self.functions
            .insert(definition.name.clone(), Rc::new(definition));
    }

    pub fn get(&self, name: &str) -> Option<Rc<FunctionDefinition>> {
        self.functions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
