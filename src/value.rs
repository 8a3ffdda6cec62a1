/*
 * ==========================================================================
 * FANG - JSON with Teeth!
 * ==========================================================================
 *
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
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as SerError, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::ast::{Callee, Node};
use crate::environment::EnvRef;

/// Shared handle to an array's elements.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared handle to a block's entries. Blocks preserve insertion order,
/// which is what `print`/`string()` iterate in.
pub type BlockRef = Rc<RefCell<IndexMap<String, Value>>>;

/// FANG runtime value representation.
///
/// This is the core type that flows through the interpreter.
/// Every expression ultimately evaluates to one of these.
///
/// Arrays and blocks are held through `Rc<RefCell<_>>` handles, but value
/// semantics still rule: assignment, `:=` returns and ordinary argument
/// binding all go through [`Value::deep_copy`]. The two paths that share a
/// handle on purpose are `reference` parameters and environments captured
/// by closures.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(ArrayRef),
    Block(BlockRef),

    /// A registered function: the definition plus an optional captured
    /// environment (closures) and a flag telling the originals apart from
    /// shared registrations.
    Function(FunctionValue),

    /// A deferred AST fragment. Parameter names are bound to one of these
    /// (an alias into the `_` argument array), and `function`-modifier
    /// arguments arrive as their unevaluated expression. Never observable
    /// by scripts as a plain value.
    Expr(Rc<Node>),

    /// Internal sentinel: declared-but-unset slots, and "no value" as
    /// distinct from an explicit `null`. Never observable by scripts.
    Undefined,
}

/// Runtime wrapper around a function definition.
#[derive(Clone)]
pub struct FunctionValue {
    pub callee: Rc<Callee>,

    /// Environment captured when the function was returned out of its
    /// defining scope. Calls re-enter this environment instead of a fresh
    /// child of the caller's.
    pub captured: Option<EnvRef>,

    /// False on the original registration, true on every shared copy.
    pub is_reference: bool,
}

impl FunctionValue {
    pub fn new(callee: Rc<Callee>) -> Self {
        Self {
            callee,
            captured: None,
            is_reference: false,
        }
    }

    /// A shared registration of the same definition, optionally closing
    /// over `env`.
    pub fn reference(&self, captured: Option<EnvRef>) -> Self {
        Self {
            callee: Rc::clone(&self.callee),
            captured: captured.or_else(|| self.captured.clone()),
            is_reference: true,
        }
    }
}

impl Value {
    pub fn array(values: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    pub fn block(entries: IndexMap<String, Value>) -> Value {
        Value::Block(Rc::new(RefCell::new(entries)))
    }

    pub fn empty_block() -> Value {
        Value::block(IndexMap::new())
    }

    /// The script-visible type name, as reported by `type(x)`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Block(_) => "block",
            Value::Function(_) => "function",
            Value::Expr(_) => "expression",
            Value::Undefined => "undefined",
        }
    }

    /// FANG truthiness: null, false and numeric zero are false.
    /// Everything else is true, including empty arrays, empty blocks,
    /// the empty string and the string "0".
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null | Value::Undefined => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            _ => true,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Rebuilds composite values so the copy shares no handles with the
    /// original. Scalars and functions pass through; a function's captured
    /// environment is identity by design.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Array(values) => {
                let copied = values.borrow().iter().map(Value::deep_copy).collect();
                Value::array(copied)
            }
            Value::Block(entries) => {
                let copied = entries
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy()))
                    .collect();
                Value::block(copied)
            }
            other => other.clone(),
        }
    }

    /// Strict structural equality: arrays compare element-wise, blocks
    /// compare as key→value sets independent of insertion order, mixed
    /// Int/Float compares as Float, and functions compare by definition
    /// identity. Booleans only equal booleans here; the `==` operator's
    /// top-level truthiness coercion lives in the operator table.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::String(a), Value::String(b)) => a == b,

            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }

            (Value::Block(a), Value::Block(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.get(key).map(|other| value.equals(other)).unwrap_or(false)
                    })
            }

            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(&a.callee, &b.callee),

            _ => false,
        }
    }

    // -----------------------------------------------------------------
    // Typed host accessors
    // -----------------------------------------------------------------

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockRef> {
        match self {
            Value::Block(entries) => Some(entries),
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Host value conversion (injection path)
    // -----------------------------------------------------------------

    /// Normalizes a host-supplied JSON value into a runtime value.
    ///
    /// Integers map to `Int`, floats to `Float`, containers are rebuilt
    /// recursively (a fresh deep structure, never shared with the host
    /// document). Unsigned values beyond `i64` fall back to `Float`.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::block(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Float(n) => write!(f, "Float({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(values) => write!(f, "Array({:?})", values.borrow()),
            Value::Block(entries) => {
                write!(f, "Block{{")?;
                for (i, (k, v)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {:?}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "[function {}]", func.callee.name),
            Value::Expr(_) => write!(f, "[expression]"),
            Value::Undefined => write!(f, "Undefined"),
        }
    }
}

// ---------------------------------------------------------------------
// From conversions for host ergonomics
// ---------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::array(values)
    }
}

// ---------------------------------------------------------------------
// JSON mapping (serde)
// ---------------------------------------------------------------------

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Undefined => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(values) => {
                let values = values.borrow();
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values.iter() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Block(entries) => {
                let entries = entries.borrow();
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Function(func) => Err(S::Error::custom(format!(
                "function '{}' is not representable in JSON",
                func.callee.name
            ))),
            Value::Expr(_) => Err(S::Error::custom(
                "deferred expression is not representable in JSON",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from_json(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_table() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
        assert!(Value::String("0".into()).is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert!(Value::empty_block().is_truthy());
    }

    #[test]
    fn deep_copy_is_independent() {
        let original = Value::array(vec![Value::Int(1), Value::array(vec![Value::Int(2)])]);
        let copy = original.deep_copy();

        if let Value::Array(values) = &copy {
            values.borrow_mut().push(Value::Int(3));
            if let Value::Array(inner) = &values.borrow()[1] {
                inner.borrow_mut().push(Value::Int(4));
            }
        }

        if let Value::Array(values) = &original {
            assert_eq!(values.borrow().len(), 2);
            if let Value::Array(inner) = &values.borrow()[1] {
                assert_eq!(inner.borrow().len(), 1);
            }
        }
    }

    #[test]
    fn structural_equality_ignores_block_order() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": [1, 2]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": [1, 2], "x": 1}"#).unwrap();
        assert!(a.equals(&b));
    }

    #[test]
    fn mixed_numeric_equality() {
        assert!(Value::Int(2).equals(&Value::Float(2.0)));
        assert!(!Value::Int(2).equals(&Value::Float(2.5)));
        // Nested equality never coerces booleans.
        assert!(!Value::Bool(true).equals(&Value::Int(1)));
    }

    #[test]
    fn json_round_trip() {
        let source = r#"{"a": 3, "b": [2, 1], "c": {"d": null, "e": true}, "f": 1.5}"#;
        let value: Value = serde_json::from_str(source).unwrap();
        let text = serde_json::to_string(&value).unwrap();
        let again: Value = serde_json::from_str(&text).unwrap();
        assert!(value.equals(&again));
    }

    #[test]
    fn block_preserves_insertion_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        if let Value::Block(entries) = &value {
            let keys: Vec<String> = entries.borrow().keys().cloned().collect();
            assert_eq!(keys, vec!["z", "a", "m"]);
        } else {
            panic!("expected a block");
        }
    }
}
