use std::fmt;

use indexmap::IndexMap;

use crate::function::Function;

/// Reserved name of the program entry point.
pub const ROOT_FUNCTION: &str = "\"main\".main";

/// The set of function definitions of a program, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    funcs: IndexMap<String, Function>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` unless a function with the same name exists.
    ///
    /// The first registration wins; returns whether `f` was added.
    pub fn add_function(&mut self, f: Function) -> bool {
        if self.funcs.contains_key(&f.name) {
            return false;
        }
        self.funcs.insert(f.name.clone(), f);
        true
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.funcs.get(name)
    }

    pub fn function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.funcs.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.funcs.values()
    }

    pub fn functions_mut(&mut self) -> impl Iterator<Item = &mut Function> {
        self.funcs.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.funcs.keys().map(String::as_str)
    }

    /// Remove a function, keeping the order of the others.
    pub fn remove_function(&mut self, name: &str) -> Option<Function> {
        self.funcs.shift_remove(name)
    }

    /// Keep only functions for which `keep` holds; returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Function) -> bool) -> usize {
        let before = self.funcs.len();
        self.funcs.retain(|_, f| keep(f));
        before - self.funcs.len()
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Materialize `tau` into every empty function body.
    pub fn normalize(&mut self) {
        for f in self.funcs.values_mut() {
            f.normalize();
        }
    }
}

/// Plain rendering: every non-empty function in registration order.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for func in self.funcs.values().filter(|func| !func.is_empty()) {
            write!(f, "{func}")?;
        }
        Ok(())
    }
}
