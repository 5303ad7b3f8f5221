//! Runtime classes: a prototype object plus a constructor.

use crate::composer::{self, ComposeOptions};
use crate::error::{RuntimeError, RuntimeResult};
use crate::function::FunctionRef;
use crate::object::{ObjectRef, Property};
use crate::value::{PropertyKey, Value};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;
use tsmix_common::{Atom, intern};

/// Constructor arguments.
///
/// Ordinary classes take a positional list. Composites take one argument
/// list per component, in component order.
#[derive(Clone, Debug, PartialEq)]
pub enum Args {
    Positional(Vec<Value>),
    PerComponent(Vec<Args>),
}

impl Args {
    pub fn none() -> Self {
        Self::Positional(Vec::new())
    }

    /// Positional argument `index`, or `undefined` when missing.
    pub fn get(&self, index: usize) -> Value {
        match self {
            Self::Positional(values) => values.get(index).cloned().unwrap_or_default(),
            Self::PerComponent(_) => Value::Undefined,
        }
    }

    pub fn positional(&self) -> &[Value] {
        match self {
            Self::Positional(values) => values,
            Self::PerComponent(_) => &[],
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Positional(values) => format!("{} positional argument(s)", values.len()),
            Self::PerComponent(lists) => format!("{} argument list(s)", lists.len()),
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::Positional(values)
    }
}

/// Runs after the instance exists; `this` is the new instance.
pub type Initializer = dyn Fn(&Value, &Args) -> RuntimeResult<()>;

/// Maps a subclass's constructor arguments to its parent's.
pub type ArgMapper = dyn Fn(&Args) -> Args;

pub(crate) struct CompositeClass {
    pub components: SmallVec<[ClassRef; 4]>,
    pub options: ComposeOptions,
    pub depth: u32,
}

pub(crate) enum ClassKind {
    Ordinary {
        init: Option<Rc<Initializer>>,
        super_args: Option<Rc<ArgMapper>>,
    },
    Composite(CompositeClass),
}

pub(crate) struct Class {
    name: Atom,
    prototype: ObjectRef,
    parent: Option<ClassRef>,
    kind: ClassKind,
}

#[derive(Clone)]
pub struct ClassRef(Rc<Class>);

impl ClassRef {
    pub(crate) fn composite(name: Atom, prototype: ObjectRef, layout: CompositeClass) -> Self {
        prototype.set_class_name(name);
        Self(Rc::new(Class {
            name,
            prototype,
            parent: None,
            kind: ClassKind::Composite(layout),
        }))
    }

    pub fn name(&self) -> Atom {
        self.0.name
    }

    pub fn prototype(&self) -> &ObjectRef {
        &self.0.prototype
    }

    pub fn parent(&self) -> Option<&ClassRef> {
        self.0.parent.as_ref()
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.0.kind, ClassKind::Composite(_))
    }

    /// Components of a composite class, primary first. Empty otherwise.
    pub fn components(&self) -> &[ClassRef] {
        match &self.0.kind {
            ClassKind::Composite(layout) => &layout.components,
            ClassKind::Ordinary { .. } => &[],
        }
    }

    pub fn ptr_eq(&self, other: &ClassRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The nearest composite in this class's parent chain, itself included.
    pub(crate) fn composite_base(&self) -> Option<&CompositeClass> {
        match &self.0.kind {
            ClassKind::Composite(layout) => Some(layout),
            ClassKind::Ordinary { .. } => self.0.parent.as_ref()?.composite_base(),
        }
    }

    /// How many composite layers this class sits on. Zero for plain classes.
    pub fn composition_depth(&self) -> u32 {
        self.composite_base().map_or(0, |layout| layout.depth)
    }

    /// True if `self` is `other`, extends it, or composes it at any depth.
    pub fn is_derived_from(&self, other: &ClassRef) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.components().iter().any(|c| c.is_derived_from(other)) {
            return true;
        }
        self.parent().is_some_and(|parent| parent.is_derived_from(other))
    }

    /// Prototype-level lookup: the class prototype chain, then, for
    /// composites, each auxiliary component's prototypes.
    pub(crate) fn lookup_prototype(
        &self,
        key: &PropertyKey,
    ) -> RuntimeResult<Option<(ObjectRef, Property)>> {
        if let Some(found) = self.0.prototype.find_property(key)? {
            return Ok(Some(found));
        }
        if let Some(layout) = self.composite_base() {
            for aux in layout.components.iter().skip(1) {
                if let Some(found) = aux.lookup_prototype(key)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    pub fn construct(&self, args: Args) -> RuntimeResult<Value> {
        self.construct_with(args, self.prototype())
    }

    /// Construct with `prototype` as the new instance's prototype, the way a
    /// subclass constructor runs its parent's.
    pub fn construct_with(&self, args: Args, prototype: &ObjectRef) -> RuntimeResult<Value> {
        match &self.0.kind {
            ClassKind::Composite(layout) => composer::instantiate(self, layout, args, prototype),
            ClassKind::Ordinary { init, super_args } => {
                let this = match &self.0.parent {
                    Some(parent) => {
                        let parent_args = match super_args {
                            Some(map) => map(&args),
                            None => args.clone(),
                        };
                        parent.construct_with(parent_args, prototype)?
                    }
                    None => {
                        if let Args::PerComponent(_) = args {
                            return Err(RuntimeError::ArgumentShape {
                                class: self.0.name.to_string(),
                                expected: "positional arguments".to_string(),
                                found: args.describe(),
                            });
                        }
                        Value::Object(ObjectRef::with_prototype(Some(prototype.clone())))
                    }
                };
                this.expect_object()?.set_class_name(self.0.name);
                if let Some(init) = init {
                    init(&this, &args)?;
                }
                Ok(this)
            }
        }
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.0.name.as_str())
            .field("composite", &self.is_composite())
            .finish()
    }
}

/// Builder for ordinary classes.
///
/// ```ignore
/// let point = ClassBuilder::new("Point")
///     .init(|this, args| {
///         this.set("x", args.get(0))?;
///         this.set("y", args.get(1))
///     })
///     .method("norm", |this, _| { .. })
///     .build();
/// ```
pub struct ClassBuilder {
    name: Atom,
    parent: Option<ClassRef>,
    members: Vec<(PropertyKey, Property)>,
    init: Option<Rc<Initializer>>,
    super_args: Option<Rc<ArgMapper>>,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: intern(name),
            parent: None,
            members: Vec::new(),
            init: None,
            super_args: None,
        }
    }

    pub fn extends(mut self, parent: &ClassRef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn method(
        mut self,
        name: impl Into<PropertyKey>,
        f: impl Fn(&Value, &[Value]) -> RuntimeResult<Value> + 'static,
    ) -> Self {
        let key = name.into();
        let func = FunctionRef::native(&key.to_string(), f);
        self.members.push((key, Property::method(func)));
        self
    }

    pub fn getter(
        self,
        name: impl Into<PropertyKey>,
        get: impl Fn(&Value) -> RuntimeResult<Value> + 'static,
    ) -> Self {
        let key = name.into();
        let get = FunctionRef::native(&format!("get {key}"), move |this, _| get(this));
        self.accessor(key, Some(get), None)
    }

    pub fn setter(
        self,
        name: impl Into<PropertyKey>,
        set: impl Fn(&Value, Value) -> RuntimeResult<()> + 'static,
    ) -> Self {
        let key = name.into();
        let set = FunctionRef::native(&format!("set {key}"), move |this, args| {
            set(this, args.first().cloned().unwrap_or_default())?;
            Ok(Value::Undefined)
        });
        self.accessor(key, None, Some(set))
    }

    /// Add an accessor. A getter and a setter added separately for the same
    /// key are merged into one accessor.
    pub fn accessor(
        mut self,
        name: impl Into<PropertyKey>,
        get: Option<FunctionRef>,
        set: Option<FunctionRef>,
    ) -> Self {
        let key = name.into();
        let existing = self
            .members
            .iter_mut()
            .find(|entry| entry.0 == key && entry.1.is_accessor());
        if let Some((_, Property::Accessor { get: g, set: s, .. })) = existing {
            if get.is_some() {
                *g = get;
            }
            if set.is_some() {
                *s = set;
            }
            return self;
        }
        self.members.push((key, Property::accessor(get, set)));
        self
    }

    /// A non-function value shared through the prototype.
    pub fn prototype_value(mut self, name: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.members.push((name.into(), Property::data(value)));
        self
    }

    pub fn init(mut self, f: impl Fn(&Value, &Args) -> RuntimeResult<()> + 'static) -> Self {
        self.init = Some(Rc::new(f));
        self
    }

    /// Arguments handed to the parent constructor. Defaults to passing the
    /// subclass's own arguments through unchanged.
    pub fn super_args(mut self, f: impl Fn(&Args) -> Args + 'static) -> Self {
        self.super_args = Some(Rc::new(f));
        self
    }

    pub fn build(self) -> ClassRef {
        let prototype =
            ObjectRef::with_prototype(self.parent.as_ref().map(|p| p.prototype().clone()));
        prototype.set_class_name(self.name);
        for (key, property) in self.members {
            prototype.define_own(key, property);
        }
        ClassRef(Rc::new(Class {
            name: self.name,
            prototype,
            parent: self.parent,
            kind: ClassKind::Ordinary {
                init: self.init,
                super_args: self.super_args,
            },
        }))
    }
}

#[cfg(test)]
#[path = "tests/class_tests.rs"]
mod tests;
