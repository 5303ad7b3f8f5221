//! Property resolution for composite instances.
//!
//! A composite instance is a façade over:
//!
//! - **own storage**: the object the primary class constructed (the *target*),
//!   whose prototype chain starts at the composite's (or its subclass's)
//!   prototype and ends in the primary prototype chain;
//! - one **auxiliary instance** per auxiliary class, each constructed on its
//!   own with its own prototype;
//! - the component **class prototypes**.
//!
//! Every key is resolved against these sources in a fixed order, and the
//! first source that has the key answers:
//!
//! ```text
//! 1. own storage            target's own properties
//! 2. inherited storage      target's prototype chain above the primary prototype
//! 3. auxiliary instances    own properties, last auxiliary first
//! 4. primary prototype      primary class prototype chain
//! 5. auxiliary prototypes   each auxiliary class prototype chain, first first
//! ```
//!
//! Inherited storage holds the prototypes of classes that extend the
//! composite, so a subclass's methods and accessors shadow every composed
//! member. The composite's own prototype is empty.
//!
//! Functions read from an auxiliary instance are bound to that instance, so
//! `this` inside them sees the auxiliary's own state. Functions from any other
//! source are bound to the composite itself.

use crate::class::ClassRef;
use crate::composer::WritePolicy;
use crate::error::{RuntimeError, RuntimeResult};
use crate::object::{ObjectRef, Property, PropertyFlags};
use crate::value::{PropertyKey, Value};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use tracing::trace;
use tsmix_common::Atom;
use tsmix_common::limits::MAX_PROTOTYPE_CHAIN_DEPTH;

/// Where a composite found a key.
///
/// Auxiliary indices count auxiliary components only: `AuxInstance(0)` is the
/// instance of the first class after the primary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum Source {
    OwnStorage,
    InheritedStorage,
    AuxInstance(usize),
    PrimaryPrototype,
    AuxPrototype(usize),
}

impl Source {
    /// Index into the component list of the class this source belongs to.
    /// Own and inherited storage belong to the primary.
    pub fn component_index(self) -> usize {
        match self {
            Self::OwnStorage | Self::InheritedStorage | Self::PrimaryPrototype => 0,
            Self::AuxInstance(i) | Self::AuxPrototype(i) => i + 1,
        }
    }

    pub fn is_prototype(self) -> bool {
        matches!(
            self,
            Self::InheritedStorage | Self::PrimaryPrototype | Self::AuxPrototype(_)
        )
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnStorage => f.write_str("own storage"),
            Self::AuxInstance(i) => write!(f, "auxiliary instance #{i}"),
            Self::InheritedStorage => f.write_str("inherited storage"),
            Self::PrimaryPrototype => f.write_str("primary prototype"),
            Self::AuxPrototype(i) => write!(f, "auxiliary prototype #{i}"),
        }
    }
}

/// A resolved key: the source, the object that physically holds the
/// property, and a snapshot of the property.
pub(crate) struct Resolved {
    pub source: Source,
    pub holder: ObjectRef,
    pub property: Property,
}

pub struct CompositeTrap {
    name: Atom,
    target: ObjectRef,
    auxiliaries: SmallVec<[ObjectRef; 4]>,
    components: SmallVec<[ClassRef; 4]>,
    write_policy: WritePolicy,
}

impl CompositeTrap {
    pub(crate) fn new(
        name: Atom,
        target: ObjectRef,
        auxiliaries: SmallVec<[ObjectRef; 4]>,
        components: SmallVec<[ClassRef; 4]>,
        write_policy: WritePolicy,
    ) -> Self {
        debug_assert_eq!(auxiliaries.len() + 1, components.len());
        Self {
            name,
            target,
            auxiliaries,
            components,
            write_policy,
        }
    }

    pub fn name(&self) -> Atom {
        self.name
    }

    pub(crate) fn target(&self) -> &ObjectRef {
        &self.target
    }

    pub(crate) fn components(&self) -> &[ClassRef] {
        &self.components
    }

    pub(crate) fn auxiliaries(&self) -> &[ObjectRef] {
        &self.auxiliaries
    }

    /// Walk the sources in resolution order and report the first holder.
    pub(crate) fn lookup(&self, key: &PropertyKey) -> RuntimeResult<Option<Resolved>> {
        if let Some(property) = self.target.get_own_property(key) {
            return Ok(Some(self.resolved(key, Source::OwnStorage, self.target.clone(), property)));
        }

        if let Some((holder, property)) = self.find_inherited(key)? {
            return Ok(Some(self.resolved(key, Source::InheritedStorage, holder, property)));
        }

        for (i, aux) in self.auxiliaries.iter().enumerate().rev() {
            if let Some(property) = aux.get_own_property(key) {
                return Ok(Some(self.resolved(key, Source::AuxInstance(i), aux.clone(), property)));
            }
        }

        for (i, class) in self.components.iter().enumerate() {
            if let Some((holder, property)) = class.lookup_prototype(key)? {
                let source = match i {
                    0 => Source::PrimaryPrototype,
                    i => Source::AuxPrototype(i - 1),
                };
                return Ok(Some(self.resolved(key, source, holder, property)));
            }
        }

        trace!(composite = %self.name, key = %key, "resolve: unowned");
        Ok(None)
    }

    /// Walk the target's prototype chain up to, not including, the primary
    /// prototype. That covers subclass prototypes and the composite's own.
    fn find_inherited(&self, key: &PropertyKey) -> RuntimeResult<Option<(ObjectRef, Property)>> {
        let boundary = self.components.first().map(ClassRef::prototype);
        let mut current = self.target.prototype();
        for _ in 0..MAX_PROTOTYPE_CHAIN_DEPTH {
            let Some(obj) = current else {
                return Ok(None);
            };
            if boundary.is_some_and(|b| b.ptr_eq(&obj)) {
                return Ok(None);
            }
            if let Some(property) = obj.get_own_property(key) {
                return Ok(Some((obj, property)));
            }
            current = obj.prototype();
        }
        Err(RuntimeError::PrototypeChainTooDeep {
            limit: MAX_PROTOTYPE_CHAIN_DEPTH,
        })
    }

    fn resolved(&self, key: &PropertyKey, source: Source, holder: ObjectRef, property: Property) -> Resolved {
        trace!(composite = %self.name, key = %key, source = %source, "resolve");
        Resolved {
            source,
            holder,
            property,
        }
    }

    pub(crate) fn resolution_of(&self, key: &PropertyKey) -> RuntimeResult<Option<Source>> {
        Ok(self.lookup(key)?.map(|found| found.source))
    }

    /// Instance-level view used when this composite is itself a component:
    /// own storage, then auxiliary instances.
    pub(crate) fn get_own_property(&self, key: &PropertyKey) -> Option<Property> {
        self.target.get_own_property(key).or_else(|| {
            self.auxiliaries
                .iter()
                .rev()
                .find_map(|aux| aux.get_own_property(key))
        })
    }

    pub(crate) fn get(&self, key: &PropertyKey, receiver: &Value) -> RuntimeResult<Value> {
        let Some(found) = self.lookup(key)? else {
            return Ok(Value::Undefined);
        };
        match found.source {
            Source::AuxInstance(_) => {
                let aux = Value::Object(found.holder.clone());
                let value = found.holder.get(key, &aux)?;
                Ok(bind_functions(value, &aux))
            }
            Source::OwnStorage => {
                let value = self.target.get(key, receiver)?;
                Ok(bind_functions(value, receiver))
            }
            _ => {
                let value = found.property.read(receiver)?;
                Ok(bind_functions(value, receiver))
            }
        }
    }

    /// Write `key` through the composite.
    ///
    /// The instance that owns the key is written in place. Prototypes are
    /// never mutated: an inherited setter runs against `receiver`, and an
    /// inherited data or method slot is shadowed in own storage.
    pub(crate) fn set(&self, key: &PropertyKey, value: Value, receiver: &Value) -> RuntimeResult<()> {
        let Some(found) = self.lookup(key)? else {
            return match self.write_policy {
                WritePolicy::FallbackToPrimary => {
                    self.target.define_own(key, Property::data(value));
                    Ok(())
                }
                WritePolicy::Reject => Err(RuntimeError::UnknownProperty {
                    key: key.to_string(),
                    composite: self.name.to_string(),
                }),
            };
        };

        match (found.source, found.property) {
            (Source::OwnStorage, _) => self.target.set(key, value, receiver),
            (Source::AuxInstance(_), _) => {
                let aux = Value::Object(found.holder.clone());
                found.holder.set(key, value, &aux)
            }
            (_, Property::Accessor { set: Some(setter), .. }) => {
                setter.call(receiver, &[value])?;
                Ok(())
            }
            (_, Property::Accessor { set: None, .. }) => Err(RuntimeError::NoSetter {
                key: key.to_string(),
            }),
            (_, Property::Data { flags, .. }) if !flags.contains(PropertyFlags::WRITABLE) => {
                Err(RuntimeError::ReadOnly {
                    key: key.to_string(),
                })
            }
            (_, Property::Data { .. }) => {
                self.target.define_own(key, Property::data(value));
                Ok(())
            }
        }
    }

    /// Delete only ever affects own storage.
    pub(crate) fn delete(&self, key: &PropertyKey) -> bool {
        self.target.delete(key)
    }

    /// Union of own storage keys and auxiliary instance keys, without
    /// duplicates, in resolution order.
    pub(crate) fn own_keys(&self) -> Vec<PropertyKey> {
        let mut keys: IndexSet<PropertyKey, FxBuildHasher> = self.target.own_keys().into_iter().collect();
        for aux in self.auxiliaries.iter().rev() {
            keys.extend(aux.own_keys());
        }
        keys.into_iter().collect()
    }
}

fn bind_functions(value: Value, this: &Value) -> Value {
    match value {
        Value::Function(func) => Value::Function(func.bind(this.clone())),
        other => other,
    }
}

#[cfg(test)]
#[path = "tests/trap_tests.rs"]
mod tests;
