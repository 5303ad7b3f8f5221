//! Read-only queries over interned types.

use crate::intern::TypeDatabase;
use crate::types::*;
use std::sync::Arc;
use tsmix_common::Atom;

pub fn get_object_shape(db: &dyn TypeDatabase, type_id: TypeId) -> Option<Arc<ObjectShape>> {
    match db.lookup(type_id)? {
        TypeData::Object(shape) => Some(shape),
        _ => None,
    }
}

pub fn get_callable_shape(db: &dyn TypeDatabase, type_id: TypeId) -> Option<Arc<CallableShape>> {
    match db.lookup(type_id)? {
        TypeData::Callable(shape) => Some(shape),
        _ => None,
    }
}

pub fn get_tuple_elements(db: &dyn TypeDatabase, type_id: TypeId) -> Option<Arc<[TupleElement]>> {
    match db.lookup(type_id)? {
        TypeData::Tuple(elements) => Some(elements),
        _ => None,
    }
}

/// Members of an object-like type; empty for anything else.
pub fn get_properties(db: &dyn TypeDatabase, type_id: TypeId) -> Vec<PropertyInfo> {
    match db.lookup(type_id) {
        Some(TypeData::Object(shape)) => shape.properties.clone(),
        Some(TypeData::Callable(shape)) => shape.properties.clone(),
        _ => Vec::new(),
    }
}

pub fn find_property(db: &dyn TypeDatabase, type_id: TypeId, name: Atom) -> Option<PropertyInfo> {
    get_properties(db, type_id)
        .into_iter()
        .find(|prop| prop.name == name)
}

/// Objects and callables can carry members and be merged.
pub fn is_object_like(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    matches!(
        db.lookup(type_id),
        Some(TypeData::Object(_) | TypeData::Callable(_))
    )
}

pub fn is_callable(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    get_callable_shape(db, type_id).is_some_and(|shape| !shape.call_signatures.is_empty())
}

pub fn is_constructable(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    get_callable_shape(db, type_id).is_some_and(|shape| !shape.construct_signatures.is_empty())
}

/// Call and construct signatures of a type, `(call, construct)`.
pub fn get_signatures(
    db: &dyn TypeDatabase,
    type_id: TypeId,
) -> (Vec<CallSignature>, Vec<CallSignature>) {
    match get_callable_shape(db, type_id) {
        Some(shape) => (
            shape.call_signatures.clone(),
            shape.construct_signatures.clone(),
        ),
        None => (Vec::new(), Vec::new()),
    }
}
