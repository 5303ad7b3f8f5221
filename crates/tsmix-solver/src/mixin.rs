//! Composite (mixin) type resolution.
//!
//! Given the class types of `(Primary, Aux1, .., AuxN)`, computes the type a
//! checker should assign to the composite:
//!
//! ```text
//! instance  = merge(Primary, merge(Aux1, .. merge(AuxN-1, AuxN)))
//! ctor args = [PrimaryParams, Aux1Params, .., AuxNParams]
//! ```
//!
//! The fold runs from the last class to the first, and at every step the
//! class closer to the front wins member-name collisions. That is the same
//! member the runtime trap layer hands back for properties present at
//! construction time.

use crate::class_hierarchy::{ClassType, ClassTypeBuilder};
use crate::intern::TypeDatabase;
use crate::queries::{get_properties, get_signatures, is_object_like};
use crate::types::*;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tsmix_common::limits::MAX_MERGE_DEPTH;
use tsmix_common::{Atom, composite_name};

pub struct MixinTypeResolver<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> MixinTypeResolver<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    /// Merge two instance types; members of `preferred` win collisions.
    ///
    /// - `any` on either side absorbs the merge.
    /// - A non-object side contributes nothing.
    /// - Call and construct signatures are concatenated, `preferred` first,
    ///   so its overloads are the ones picked on a call.
    pub fn merge(&self, preferred: TypeId, fallback: TypeId) -> TypeId {
        if preferred == fallback {
            return preferred;
        }
        if preferred == TypeId::ANY || fallback == TypeId::ANY {
            return TypeId::ANY;
        }
        if preferred.is_error() || fallback.is_error() {
            return TypeId::ERROR;
        }

        let preferred_object = is_object_like(self.db, preferred);
        let fallback_object = is_object_like(self.db, fallback);
        match (preferred_object, fallback_object) {
            (true, true) => {}
            (true, false) => return preferred,
            (false, true) => return fallback,
            (false, false) => return preferred,
        }

        let mut seen: FxHashSet<Atom> = FxHashSet::default();
        let mut properties = Vec::new();
        for prop in get_properties(self.db, preferred)
            .into_iter()
            .chain(get_properties(self.db, fallback))
        {
            if seen.insert(prop.name) {
                properties.push(prop);
            } else {
                tracing::trace!(member = %prop.name, "merge: shadowed by preferred member");
            }
        }

        let (mut call_signatures, mut construct_signatures) = get_signatures(self.db, preferred);
        let (fallback_calls, fallback_constructs) = get_signatures(self.db, fallback);
        call_signatures.extend(fallback_calls);
        construct_signatures.extend(fallback_constructs);

        if call_signatures.is_empty() && construct_signatures.is_empty() {
            self.db.object_with_shape(ObjectShape {
                flags: ObjectFlags::COMPOSITE,
                properties,
                symbol: None,
            })
        } else {
            self.db.callable(CallableShape {
                call_signatures,
                construct_signatures,
                properties,
                symbol: None,
            })
        }
    }

    /// Combined instance type of `classes`, first class most preferred.
    pub fn composite_instance_type(&self, classes: &[ClassType]) -> TypeId {
        let Some((last, rest)) = classes.split_last() else {
            return self.db.object(Vec::new());
        };
        if Self::nesting_depth(classes) > MAX_MERGE_DEPTH {
            tracing::warn!(
                depth = Self::nesting_depth(classes),
                limit = MAX_MERGE_DEPTH,
                "composite instance type nested too deeply"
            );
            return TypeId::ERROR;
        }

        rest.iter()
            .rev()
            .fold(last.instance_type, |acc, class| self.merge(class.instance_type, acc))
    }

    /// Tuple of per-component constructor tuples, in component order.
    pub fn composite_constructor_args(&self, classes: &[ClassType]) -> TypeId {
        let elements = classes
            .iter()
            .map(|class| TupleElement::named(class.name, self.params_tuple(class)))
            .collect();
        self.db.tuple(elements)
    }

    /// Class type of the composite itself.
    ///
    /// Its constructor takes one parameter per component (that component's
    /// argument tuple), so it can be composed again or used as a base in
    /// `ClassTypeBuilder::class_type`.
    pub fn composite_class(&self, classes: &[ClassType]) -> ClassType {
        let names: SmallVec<[Atom; 4]> = classes.iter().map(|c| c.name).collect();
        let name = self.db.intern_string(&composite_name(&names));
        let instance_type = self.composite_instance_type(classes);
        let constructor_params: Vec<ParamInfo> = classes
            .iter()
            .map(|class| ParamInfo::required(class.name, self.params_tuple(class)))
            .collect();
        let constructor_type = ClassTypeBuilder::new(self.db).create_constructor_type(
            constructor_params.clone(),
            instance_type,
            name,
        );

        tracing::debug!(
            composite = %name,
            components = classes.len(),
            instance_type = instance_type.0,
            "composite_class"
        );

        ClassType {
            name,
            instance_type,
            constructor_params,
            constructor_type,
            depth: Self::nesting_depth(classes),
        }
    }

    fn params_tuple(&self, class: &ClassType) -> TypeId {
        self.db
            .tuple(class.constructor_params.iter().map(TupleElement::from).collect())
    }

    fn nesting_depth(classes: &[ClassType]) -> u32 {
        classes.iter().map(|c| c.depth).max().unwrap_or(0) + 1
    }
}
