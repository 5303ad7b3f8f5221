//! Class Type Construction
//!
//! Builds the instance and constructor types of a single class declaration.
//!
//! Responsibilities:
//! - Merge base class properties with derived class members
//! - Handle property overrides and shadowing
//! - Inherit the base constructor signature when a class declares none
//!
//! The base may be an ordinary class or a composite (see `MixinTypeResolver`);
//! either way its instance type is just an object type here.

use crate::intern::TypeDatabase;
use crate::queries::get_properties;
use crate::types::{CallSignature, CallableShape, ObjectFlags, ObjectShape, ParamInfo, PropertyInfo, TypeId};
use rustc_hash::FxHashMap;
use tsmix_common::Atom;

/// Everything the solver knows about one class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassType {
    pub name: Atom,
    pub instance_type: TypeId,
    pub constructor_params: Vec<ParamInfo>,
    pub constructor_type: TypeId,
    /// Composite nesting level; 0 for ordinary classes.
    pub depth: u32,
}

/// Builder for constructing class instance types.
///
/// This is a pure type computation. It takes a base type and a list of
/// member properties, and produces the merged instance type.
pub struct ClassTypeBuilder<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> ClassTypeBuilder<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    /// Creates a class instance type by merging base class properties with own members.
    ///
    /// # Arguments
    /// * `base_type` - The instance type of the base class, if any
    /// * `own_members` - Fields and methods declared directly in this class
    /// * `class_name` - Stamped on own members and used as the nominal symbol
    pub fn create_instance_type(
        &self,
        base_type: Option<TypeId>,
        own_members: Vec<PropertyInfo>,
        class_name: Atom,
    ) -> TypeId {
        let base_props = match base_type {
            // An errored base contributes nothing; own members still type-check.
            Some(base) if !base.is_error() => get_properties(self.db, base),
            _ => Vec::new(),
        };

        let merged = self.merge_properties(base_props, own_members, class_name);

        self.db.object_with_shape(ObjectShape {
            flags: ObjectFlags::CLASS_INSTANCE,
            properties: merged,
            symbol: Some(class_name),
        })
    }

    /// Creates a class constructor type: a callable with one construct
    /// signature returning the instance type.
    pub fn create_constructor_type(
        &self,
        constructor_params: Vec<ParamInfo>,
        instance_type: TypeId,
        class_name: Atom,
    ) -> TypeId {
        self.db.callable(CallableShape {
            call_signatures: Vec::new(),
            construct_signatures: vec![CallSignature::new(constructor_params, instance_type)],
            properties: Vec::new(),
            symbol: Some(class_name),
        })
    }

    /// Full class type for a declaration.
    ///
    /// `constructor_params` of `None` means the class declares no constructor
    /// and inherits the base's parameters (or takes none without a base).
    pub fn class_type(
        &self,
        class_name: Atom,
        base: Option<&ClassType>,
        own_members: Vec<PropertyInfo>,
        constructor_params: Option<Vec<ParamInfo>>,
    ) -> ClassType {
        let instance_type =
            self.create_instance_type(base.map(|b| b.instance_type), own_members, class_name);
        let constructor_params = constructor_params
            .or_else(|| base.map(|b| b.constructor_params.clone()))
            .unwrap_or_default();
        let constructor_type =
            self.create_constructor_type(constructor_params.clone(), instance_type, class_name);

        tracing::trace!(
            class = %class_name,
            instance_type = instance_type.0,
            params = constructor_params.len(),
            "class_type"
        );

        ClassType {
            name: class_name,
            instance_type,
            constructor_params,
            constructor_type,
            depth: base.map(|b| b.depth).unwrap_or(0),
        }
    }

    /// Merge base properties with own members.
    ///
    /// Own members override base properties and are stamped with the
    /// current class as their parent.
    fn merge_properties(
        &self,
        base: Vec<PropertyInfo>,
        own: Vec<PropertyInfo>,
        current_class: Atom,
    ) -> Vec<PropertyInfo> {
        let mut result_map: FxHashMap<Atom, PropertyInfo> = FxHashMap::default();

        for prop in base {
            result_map.insert(prop.name, prop);
        }

        for mut prop in own {
            prop.parent_id = Some(current_class);
            result_map.insert(prop.name, prop);
        }

        result_map.into_values().collect()
    }
}

#[cfg(test)]
#[path = "tests/class_hierarchy_tests.rs"]
mod tests;
