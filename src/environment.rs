/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
 * Lexically Nested Environments
 * -----------------------------
 * An Environment is a mutable name→value table with a pointer to its
 * enclosing scope. It triples as:
 *
 *  - variable scope (walk-outward reads and writes)
 *  - closure capture (a function can hold its defining environment alive)
 *  - the control-flow side channel: `_return`, `_break` and `_continue`
 *    are ordinary entries that block and loop evaluation watch for
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 * Email:    sam@fang-lang.com
 * Website:  https://www.fang-lang.com
 * Github:   https://github.com/samwilcox/fang
 *
 * License:
 * This file is part of the FANG scripting language project.
 *
 * FANG is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *    https://license.fang-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

pub type EnvRef = Rc<RefCell<Environment>>;

/// Return-value channel. Created (as `Undefined`) when a function-typed
/// block is entered; written by `return`.
pub const RETURN: &str = "_return";

/// Loop-break channel, observed and cleared by the nearest loop.
pub const BREAK: &str = "_break";

/// Loop-continue channel, observed and cleared by the nearest loop.
pub const CONTINUE: &str = "_continue";

/// The nameless per-scope slot holding the last expression value; `:=`
/// writes it and a block falls back to it as its result. The name sits in
/// the reserved `___…___` namespace so scripts can never collide with it.
const RESULT: &str = "___result___";

/// Names with three leading and three trailing underscores are reserved
/// for the engine and unassignable by user code.
pub fn is_reserved_name(name: &str) -> bool {
    name.len() >= 3 && name.starts_with("___") && name.ends_with("___")
}

#[derive(Debug)]
pub struct Environment {
    /// Insertion-ordered so that a block built from a scope's bindings
    /// lists entries in definition order.
    values: IndexMap<String, Value>,
    parent: Option<EnvRef>,
}

/// Walks outward from `env` and returns the value together with the scope
/// that actually holds it. Parameter aliases need the holding scope: the
/// alias must be resolved against the environment it was bound in, not
/// against the scope that happened to read it.
pub fn lookup(env: &EnvRef, name: &str) -> Option<(Value, EnvRef)> {
    let mut current = env.clone();
    loop {
        let next = {
            let scope = current.borrow();
            if scope.contains_local(name) {
                let value = scope.get_local(name);
                drop(scope);
                return Some((value, current.clone()));
            }
            scope.enclosing()
        };
        current = next?;
    }
}

impl Environment {
    pub fn new(parent: Option<EnvRef>) -> Self {
        Self {
            values: IndexMap::new(),
            parent,
        }
    }

    /// Convenience for the common "fresh child scope" pattern.
    pub fn new_ref(parent: Option<EnvRef>) -> EnvRef {
        Rc::new(RefCell::new(Self::new(parent)))
    }

    /// The enclosing scope, or `None` for the root.
    pub fn enclosing(&self) -> Option<EnvRef> {
        self.parent.clone()
    }

    /// Walks outward until `name` is found; `Undefined` when no scope in
    /// the chain contains it. Composite values come back as shared
    /// handles; deep-copy discipline is the *writer's* job.
    pub fn get(&self, name: &str) -> Value {
        if let Some(value) = self.values.get(name) {
            return value.clone();
        }
        match &self.parent {
            Some(parent) => parent.borrow().get(name),
            None => Value::Undefined,
        }
    }

    /// Reads `name` in this scope only.
    pub fn get_local(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::Undefined)
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True when any scope in the chain contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        if self.values.contains_key(name) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow().contains(name),
            None => false,
        }
    }

    /// Writes `name` in this scope, shadowing any outer binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Overwrites `name` in the nearest enclosing scope that already
    /// contains it, falling back to this scope when none does.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Err(value) = self.assign_existing(name, value) {
            self.values.insert(name.to_string(), value);
        }
    }

    fn assign_existing(&mut self, name: &str, value: Value) -> Result<(), Value> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign_existing(name, value),
            None => Err(value),
        }
    }

    /// Deletes `name` from the nearest enclosing scope containing it.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.values.shift_remove(name).is_some() {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().remove(name),
            None => false,
        }
    }

    // -----------------------------------------------------------------
    // Implicit last-expression slot
    // -----------------------------------------------------------------

    /// Reads this scope's implicit slot.
    pub fn result(&self) -> Value {
        self.get_local(RESULT)
    }

    /// Writes this scope's implicit slot.
    pub fn set_result(&mut self, value: Value) {
        self.values.insert(RESULT.to_string(), value);
    }

    /// The scope's user-visible bindings as block entries, in an
    /// unspecified order. Engine-internal names (`_return`, the implicit
    /// slot, …) are filtered out; this is what a constructor-style block
    /// evaluates to when it neither returns nor yields an expression.
    pub fn bindings(&self) -> Vec<(String, Value)> {
        self.values
            .iter()
            .filter(|(name, value)| {
                !is_reserved_name(name)
                    && !matches!(name.as_str(), RETURN | BREAK | CONTINUE)
                    && !matches!(value, Value::Undefined | Value::Expr(_))
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_walks_outward() {
        let root = Environment::new_ref(None);
        root.borrow_mut().define("a", Value::Int(1));

        let child = Environment::new_ref(Some(root.clone()));
        assert_eq!(child.borrow().get("a"), Value::Int(1));
        assert!(child.borrow().get("missing").is_undefined());
    }

    #[test]
    fn set_overwrites_nearest_enclosing() {
        let root = Environment::new_ref(None);
        root.borrow_mut().define("a", Value::Int(1));

        let child = Environment::new_ref(Some(root.clone()));
        child.borrow_mut().set("a", Value::Int(2));

        assert_eq!(root.borrow().get("a"), Value::Int(2));
        assert!(!child.borrow().contains_local("a"));
    }

    #[test]
    fn set_falls_back_to_current_scope() {
        let root = Environment::new_ref(None);
        let child = Environment::new_ref(Some(root.clone()));

        child.borrow_mut().set("fresh", Value::Int(3));

        assert!(child.borrow().contains_local("fresh"));
        assert!(root.borrow().get("fresh").is_undefined());
    }

    #[test]
    fn define_shadows_outer_binding() {
        let root = Environment::new_ref(None);
        root.borrow_mut().define("a", Value::Int(1));

        let child = Environment::new_ref(Some(root.clone()));
        child.borrow_mut().define("a", Value::Int(10));

        assert_eq!(child.borrow().get("a"), Value::Int(10));
        assert_eq!(root.borrow().get("a"), Value::Int(1));
    }

    #[test]
    fn remove_deletes_from_nearest_scope() {
        let root = Environment::new_ref(None);
        root.borrow_mut().define("a", Value::Int(1));

        let child = Environment::new_ref(Some(root.clone()));
        assert!(child.borrow_mut().remove("a"));
        assert!(root.borrow().get("a").is_undefined());
        assert!(!child.borrow_mut().remove("a"));
    }

    #[test]
    fn reserved_names() {
        assert!(is_reserved_name("___result___"));
        assert!(is_reserved_name("___"));
        assert!(!is_reserved_name("_return"));
        assert!(!is_reserved_name("___leading"));
        assert!(!is_reserved_name("plain"));
    }

    #[test]
    fn bindings_filter_engine_slots() {
        let env = Environment::new_ref(None);
        {
            let mut env = env.borrow_mut();
            env.define("a", Value::Int(1));
            env.define(RETURN, Value::Undefined);
            env.set_result(Value::Int(9));
        }
        let names: Vec<String> = env.borrow().bindings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a"]);
    }
}
