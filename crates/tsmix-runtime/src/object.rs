//! Heap objects: ordered own properties plus a prototype link.
//!
//! An object is either *ordinary* or a *composite*. Ordinary objects follow
//! the usual prototype-chain rules. A composite owns no properties itself;
//! every operation is forwarded to its [`CompositeTrap`], which resolves the
//! key across the component instances and prototypes.
//!
//! No `RefCell` borrow is held while user code (getters, setters, methods)
//! runs, so user code may freely mutate the objects it is called on.

use crate::error::{RuntimeError, RuntimeResult};
use crate::function::FunctionRef;
use crate::trap::{CompositeTrap, Source};
use crate::value::{PropertyKey, Value};
use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tsmix_common::Atom;
use tsmix_common::limits::MAX_PROTOTYPE_CHAIN_DEPTH;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        const WRITABLE = 1 << 0;
        const ENUMERABLE = 1 << 1;
    }
}

#[derive(Clone, Debug)]
pub enum Property {
    Data {
        value: Value,
        flags: PropertyFlags,
    },
    Accessor {
        get: Option<FunctionRef>,
        set: Option<FunctionRef>,
        flags: PropertyFlags,
    },
}

impl Property {
    /// A plain writable, enumerable field.
    pub fn data(value: impl Into<Value>) -> Self {
        Self::Data {
            value: value.into(),
            flags: PropertyFlags::WRITABLE | PropertyFlags::ENUMERABLE,
        }
    }

    pub fn readonly(value: impl Into<Value>) -> Self {
        Self::Data {
            value: value.into(),
            flags: PropertyFlags::ENUMERABLE,
        }
    }

    /// A method slot: writable, not enumerable.
    pub fn method(func: FunctionRef) -> Self {
        Self::Data {
            value: Value::Function(func),
            flags: PropertyFlags::WRITABLE,
        }
    }

    pub fn accessor(get: Option<FunctionRef>, set: Option<FunctionRef>) -> Self {
        Self::Accessor {
            get,
            set,
            flags: PropertyFlags::empty(),
        }
    }

    pub fn flags(&self) -> PropertyFlags {
        match self {
            Self::Data { flags, .. } | Self::Accessor { flags, .. } => *flags,
        }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }

    /// Produce the value a read observes, invoking a getter with `receiver`.
    pub(crate) fn read(self, receiver: &Value) -> RuntimeResult<Value> {
        match self {
            Self::Data { value, .. } => Ok(value),
            Self::Accessor { get: Some(get), .. } => get.call(receiver, &[]),
            Self::Accessor { get: None, .. } => Ok(Value::Undefined),
        }
    }
}

pub(crate) enum ObjectKind {
    Ordinary,
    Composite(Rc<CompositeTrap>),
}

pub(crate) struct ObjectData {
    class_name: Option<Atom>,
    prototype: Option<ObjectRef>,
    properties: IndexMap<PropertyKey, Property, FxBuildHasher>,
    kind: ObjectKind,
}

/// Shared handle to a heap object. Clones alias the same object.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    pub fn new() -> Self {
        Self::with_prototype(None)
    }

    pub fn with_prototype(prototype: Option<ObjectRef>) -> Self {
        Self::from_data(ObjectData {
            class_name: None,
            prototype,
            properties: IndexMap::default(),
            kind: ObjectKind::Ordinary,
        })
    }

    pub(crate) fn composite(trap: CompositeTrap, class_name: Atom) -> Self {
        Self::from_data(ObjectData {
            class_name: Some(class_name),
            prototype: None,
            properties: IndexMap::default(),
            kind: ObjectKind::Composite(Rc::new(trap)),
        })
    }

    fn from_data(data: ObjectData) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Name of the class that constructed this object, for diagnostics.
    pub fn class_name(&self) -> Option<Atom> {
        self.0.borrow().class_name
    }

    pub(crate) fn set_class_name(&self, name: Atom) {
        self.0.borrow_mut().class_name = Some(name);
    }

    pub(crate) fn trap(&self) -> Option<Rc<CompositeTrap>> {
        match &self.0.borrow().kind {
            ObjectKind::Ordinary => None,
            ObjectKind::Composite(trap) => Some(Rc::clone(trap)),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Composite(_))
    }

    /// The instance a composite holds for auxiliary component `index`.
    pub fn auxiliary_instance(&self, index: usize) -> Option<ObjectRef> {
        self.trap()?.auxiliaries().get(index).cloned()
    }

    /// Which source of a composite answers for `key`.
    ///
    /// `None` when no source owns the key, or when `self` is not a composite.
    pub fn resolution_of(&self, key: &PropertyKey) -> RuntimeResult<Option<Source>> {
        match self.trap() {
            Some(trap) => trap.resolution_of(key),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Prototype link
    // =========================================================================

    pub fn prototype(&self) -> Option<ObjectRef> {
        if let Some(trap) = self.trap() {
            return trap.target().prototype();
        }
        self.0.borrow().prototype.clone()
    }

    /// Replace the prototype link. Rejects links that would close a cycle.
    pub fn set_prototype(&self, prototype: Option<ObjectRef>) -> RuntimeResult<()> {
        if let Some(trap) = self.trap() {
            return trap.target().set_prototype(prototype);
        }
        let mut current = prototype.clone();
        let mut depth = 0;
        while let Some(obj) = current {
            if obj.ptr_eq(self) || obj.trap().is_some_and(|t| t.target().ptr_eq(self)) {
                return Err(RuntimeError::PrototypeCycle {
                    object: self.to_string(),
                });
            }
            depth += 1;
            if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
                return Err(RuntimeError::PrototypeChainTooDeep {
                    limit: MAX_PROTOTYPE_CHAIN_DEPTH,
                });
            }
            current = obj.prototype();
        }
        self.0.borrow_mut().prototype = prototype;
        Ok(())
    }

    // =========================================================================
    // Own properties
    // =========================================================================

    /// Define or replace an own property. Composites define on their own
    /// storage.
    pub fn define_own(&self, key: impl Into<PropertyKey>, property: Property) {
        if let Some(trap) = self.trap() {
            trap.target().define_own(key, property);
            return;
        }
        self.0.borrow_mut().properties.insert(key.into(), property);
    }

    pub fn get_own_property(&self, key: &PropertyKey) -> Option<Property> {
        if let Some(trap) = self.trap() {
            return trap.get_own_property(key);
        }
        self.0.borrow().properties.get(key).cloned()
    }

    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.get_own_property(key).is_some()
    }

    /// Own keys in insertion order.
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        if let Some(trap) = self.trap() {
            return trap.own_keys();
        }
        self.0.borrow().properties.keys().cloned().collect()
    }

    /// Remove an own property. Never touches prototypes.
    pub fn delete(&self, key: &PropertyKey) -> bool {
        if let Some(trap) = self.trap() {
            return trap.delete(key);
        }
        self.0.borrow_mut().properties.shift_remove(key).is_some()
    }

    // =========================================================================
    // Chain-walking operations
    // =========================================================================

    /// Find `key` on this object or its prototype chain, returning the
    /// object holding it. A composite met on the way resolves through its
    /// trap.
    pub(crate) fn find_property(&self, key: &PropertyKey) -> RuntimeResult<Option<(ObjectRef, Property)>> {
        let mut current = self.clone();
        for _ in 0..MAX_PROTOTYPE_CHAIN_DEPTH {
            if let Some(trap) = current.trap() {
                return Ok(trap.lookup(key)?.map(|found| (found.holder, found.property)));
            }
            let (own, next) = {
                let data = current.0.borrow();
                (data.properties.get(key).cloned(), data.prototype.clone())
            };
            if let Some(property) = own {
                return Ok(Some((current, property)));
            }
            match next {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Err(RuntimeError::PrototypeChainTooDeep {
            limit: MAX_PROTOTYPE_CHAIN_DEPTH,
        })
    }

    pub fn has_property(&self, key: &PropertyKey) -> RuntimeResult<bool> {
        Ok(self.find_property(key)?.is_some())
    }

    /// Read `key`, running getters with `receiver` as `this`.
    pub fn get(&self, key: &PropertyKey, receiver: &Value) -> RuntimeResult<Value> {
        if let Some(trap) = self.trap() {
            return trap.get(key, receiver);
        }
        match self.find_property(key)? {
            Some((_, property)) => property.read(receiver),
            None => Ok(Value::Undefined),
        }
    }

    /// Write `key`.
    ///
    /// Own data properties are overwritten in place. An inherited setter is
    /// called with `receiver`; anything else creates an own data property,
    /// leaving the prototype untouched.
    pub fn set(&self, key: &PropertyKey, value: Value, receiver: &Value) -> RuntimeResult<()> {
        if let Some(trap) = self.trap() {
            return trap.set(key, value, receiver);
        }

        let own = self.0.borrow().properties.get(key).cloned();
        let existing = match own {
            Some(property) => Some(property),
            None => match self.prototype() {
                Some(proto) => proto.find_property(key)?.map(|(_, property)| property),
                None => None,
            },
        };
        let is_own = self.0.borrow().properties.contains_key(key);

        match existing {
            Some(Property::Accessor { set: Some(setter), .. }) => {
                setter.call(receiver, &[value])?;
                Ok(())
            }
            Some(Property::Accessor { set: None, .. }) => Err(RuntimeError::NoSetter {
                key: key.to_string(),
            }),
            Some(Property::Data { flags, .. }) if !flags.contains(PropertyFlags::WRITABLE) => {
                Err(RuntimeError::ReadOnly {
                    key: key.to_string(),
                })
            }
            Some(Property::Data { flags, .. }) if is_own => {
                self.0
                    .borrow_mut()
                    .properties
                    .insert(key.clone(), Property::Data { value, flags });
                Ok(())
            }
            _ => {
                self.define_own(key, Property::data(value));
                Ok(())
            }
        }
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow().ok().and_then(|data| data.class_name) {
            Some(name) => write!(f, "[object {name}]"),
            None => f.write_str("[object Object]"),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(data) = self.0.try_borrow() else {
            return f.write_str("Object(<borrowed>)");
        };
        let mut s = f.debug_struct("Object");
        s.field("class", &data.class_name.map(|name| name.as_str()));
        match &data.kind {
            ObjectKind::Ordinary => {
                let keys: Vec<String> = data.properties.keys().map(ToString::to_string).collect();
                s.field("keys", &keys);
            }
            ObjectKind::Composite(trap) => {
                s.field("composite", &trap.name().as_str());
            }
        }
        s.finish()
    }
}

#[cfg(test)]
#[path = "tests/object_tests.rs"]
mod tests;
