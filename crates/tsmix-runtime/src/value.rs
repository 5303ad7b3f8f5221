//! Dynamic values, symbols and property keys.

use crate::error::{RuntimeError, RuntimeResult};
use crate::function::FunctionRef;
use crate::object::{ObjectRef, Property};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use tsmix_common::{Atom, intern};

static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(1);

/// A unique, non-string property key.
///
/// Two symbols with the same description are still distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: u32,
    description: Atom,
}

impl Symbol {
    pub fn new(description: &str) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: intern(description),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> Atom {
        self.description
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(Atom),
    Symbol(Symbol),
}

impl PropertyKey {
    pub fn as_atom(&self) -> Option<Atom> {
        match self {
            Self::String(atom) => Some(*atom),
            Self::Symbol(_) => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(atom) => write!(f, "{atom}"),
            Self::Symbol(symbol) => write!(f, "[{symbol}]"),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        Self::String(intern(name))
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        Self::String(intern(&name))
    }
}

impl From<Atom> for PropertyKey {
    fn from(atom: Atom) -> Self {
        Self::String(atom)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<&Symbol> for PropertyKey {
    fn from(symbol: &Symbol) -> Self {
        Self::Symbol(symbol.clone())
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

/// Keys arriving as dynamic values are validated here, before any lookup.
impl TryFrom<&Value> for PropertyKey {
    type Error = RuntimeError;

    fn try_from(value: &Value) -> RuntimeResult<Self> {
        match value {
            Value::String(s) => Ok(Self::String(intern(s))),
            Value::Symbol(symbol) => Ok(Self::Symbol(symbol.clone())),
            other => Err(RuntimeError::MalformedKey {
                found: other.type_name(),
            }),
        }
    }
}

/// A dynamically typed value.
///
/// `Undefined` doubles as "absent": reading a key nothing owns yields it.
/// Objects and functions compare by identity.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Symbol(Symbol),
    Object(ObjectRef),
    Function(FunctionRef),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Self::String(Rc::from(s))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Self::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn expect_object(&self) -> RuntimeResult<&ObjectRef> {
        self.as_object().ok_or(RuntimeError::NotAnObject {
            found: self.type_name(),
        })
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
        match self {
            Self::Function(func) => func.call(this, args),
            other => Err(RuntimeError::NotCallable {
                callee: other.to_string(),
            }),
        }
    }

    // =========================================================================
    // Property access with `self` as the receiver
    // =========================================================================

    pub fn get(&self, key: impl Into<PropertyKey>) -> RuntimeResult<Value> {
        self.expect_object()?.get(&key.into(), self)
    }

    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> RuntimeResult<()> {
        self.expect_object()?.set(&key.into(), value.into(), self)
    }

    /// Define a writable field directly on the object, the way a class field
    /// initializer does. On a composite this lands in its own storage
    /// regardless of which component already owns the key.
    pub fn define_field(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> RuntimeResult<()> {
        self.expect_object()?.define_own(key, Property::data(value));
        Ok(())
    }

    pub fn has(&self, key: impl Into<PropertyKey>) -> RuntimeResult<bool> {
        self.expect_object()?.has_property(&key.into())
    }

    pub fn delete(&self, key: impl Into<PropertyKey>) -> RuntimeResult<bool> {
        Ok(self.expect_object()?.delete(&key.into()))
    }

    pub fn own_keys(&self) -> RuntimeResult<Vec<PropertyKey>> {
        Ok(self.expect_object()?.own_keys())
    }

    /// Read `key` and call it with `self` as the receiver.
    pub fn invoke(&self, key: impl Into<PropertyKey>, args: &[Value]) -> RuntimeResult<Value> {
        let key = key.into();
        match self.get(&key)? {
            Value::Function(func) => func.call(self, args),
            _ => Err(RuntimeError::NotCallable {
                callee: key.to_string(),
            }),
        }
    }

    // =========================================================================
    // Dynamic-key entry points
    // =========================================================================

    pub fn get_value(&self, key: &Value) -> RuntimeResult<Value> {
        let key = PropertyKey::try_from(key)?;
        self.get(key)
    }

    pub fn set_value(&self, key: &Value, value: Value) -> RuntimeResult<()> {
        let key = PropertyKey::try_from(key)?;
        self.set(key, value)
    }

    pub fn has_value(&self, key: &Value) -> RuntimeResult<bool> {
        let key = PropertyKey::try_from(key)?;
        self.has(key)
    }

    pub fn delete_value(&self, key: &Value) -> RuntimeResult<bool> {
        let key = PropertyKey::try_from(key)?;
        self.delete(key)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_number() == Some(*other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Symbol(symbol) => write!(f, "{symbol}"),
            Self::Object(obj) => write!(f, "{obj}"),
            Self::Function(func) => write!(f, "{func}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }
}

impl From<FunctionRef> for Value {
    fn from(func: FunctionRef) -> Self {
        Self::Function(func)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

#[cfg(test)]
#[path = "tests/value_tests.rs"]
mod tests;
