//! Type interning for structural deduplication.
//!
//! Converts `TypeData` structures into lightweight `TypeId` handles:
//! - O(1) type equality (just compare TypeId values)
//! - Each unique structure stored once

use crate::types::*;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};
use tsmix_common::{Atom, intern};

/// Read/construct access to interned types.
///
/// Builders and resolvers take `&dyn TypeDatabase` so they can run against
/// any interner (tests use a fresh one per case).
pub trait TypeDatabase {
    fn intern(&self, data: TypeData) -> TypeId;
    fn lookup(&self, id: TypeId) -> Option<TypeData>;

    fn intern_string(&self, s: &str) -> Atom {
        intern(s)
    }

    /// Intern an object type with properties.
    fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        self.object_with_shape(ObjectShape {
            flags: ObjectFlags::empty(),
            properties,
            symbol: None,
        })
    }

    /// Intern an object type with flags and nominal symbol.
    fn object_with_shape(&self, mut shape: ObjectShape) -> TypeId {
        // Sort by property name for consistent hashing
        shape.properties.sort_by_key(|p| p.name);
        shape.properties.dedup_by_key(|p| p.name);
        self.intern(TypeData::Object(Arc::new(shape)))
    }

    fn callable(&self, mut shape: CallableShape) -> TypeId {
        shape.properties.sort_by_key(|p| p.name);
        shape.properties.dedup_by_key(|p| p.name);
        self.intern(TypeData::Callable(Arc::new(shape)))
    }

    /// A plain function type with a single call signature.
    fn function(&self, signature: CallSignature) -> TypeId {
        self.callable(CallableShape {
            call_signatures: vec![signature],
            ..Default::default()
        })
    }

    fn tuple(&self, elements: Vec<TupleElement>) -> TypeId {
        self.intern(TypeData::Tuple(elements.into()))
    }
}

struct InternState {
    map: FxHashMap<TypeData, TypeId>,
    types: Vec<TypeData>,
}

/// Default `TypeDatabase`: a lock-protected table of interned types.
pub struct TypeInterner {
    state: RwLock<InternState>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        for (kind, id) in IntrinsicKind::ALL {
            map.insert(TypeData::Intrinsic(kind), id);
        }
        TypeInterner {
            state: RwLock::new(InternState {
                map,
                types: Vec::new(),
            }),
        }
    }

    /// Number of non-intrinsic types interned so far.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.types.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDatabase for TypeInterner {
    fn intern(&self, data: TypeData) -> TypeId {
        if let Ok(state) = self.state.read() {
            if let Some(&id) = state.map.get(&data) {
                return id;
            }
        }

        let Ok(mut state) = self.state.write() else {
            return TypeId::ERROR;
        };
        if let Some(&id) = state.map.get(&data) {
            return id;
        }
        let id = TypeId(TypeId::FIRST_USER + state.types.len() as u32);
        state.types.push(data.clone());
        state.map.insert(data, id);
        id
    }

    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() {
            return IntrinsicKind::ALL
                .iter()
                .find(|(_, intrinsic)| *intrinsic == id)
                .map(|(kind, _)| TypeData::Intrinsic(*kind));
        }

        let index = id.0.checked_sub(TypeId::FIRST_USER)?;
        let state = self.state.read().ok()?;
        state.types.get(index as usize).cloned()
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod tests;
