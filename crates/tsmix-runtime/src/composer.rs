//! Composite class construction.
//!
//! [`mix`] (or a [`Composer`] when options are needed) turns a primary class
//! and any number of auxiliary classes into one composite class. The
//! composite class is an ordinary class value: it can be constructed,
//! subclassed, and used as a component of a further composite.
//!
//! Constructing a composite constructs every component once:
//!
//! - the primary with the composite's own prototype, so its instance becomes
//!   the composite's own storage and subclass prototypes stay in its chain;
//! - every auxiliary on its own, each with its argument list and prototype.
//!
//! The resulting instance routes every property operation through a
//! [`CompositeTrap`](crate::trap::CompositeTrap).

use crate::class::{Args, ClassRef, CompositeClass};
use crate::error::{RuntimeError, RuntimeResult};
use crate::object::{ObjectRef, Property};
use crate::trap::CompositeTrap;
use crate::value::{PropertyKey, Value};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};
use tsmix_common::limits::{MAX_COMPONENTS, MAX_COMPOSITION_DEPTH, MAX_PROTOTYPE_CHAIN_DEPTH};
use tsmix_common::{Atom, composite_name, intern};

/// What a write to a key that no source owns does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WritePolicy {
    /// Create the property in the composite's own storage.
    #[default]
    FallbackToPrimary,
    /// Fail with [`RuntimeError::UnknownProperty`].
    Reject,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposeOptions {
    pub unresolved_write: WritePolicy,
    /// Method invoked on every component, with the composite as receiver,
    /// once all components are constructed. Components whose prototype does
    /// not define it are skipped.
    pub init_hook: Option<String>,
}

pub struct Composer {
    primary: ClassRef,
    auxiliaries: SmallVec<[ClassRef; 4]>,
    options: ComposeOptions,
}

impl Composer {
    pub fn new(primary: &ClassRef) -> Self {
        Self {
            primary: primary.clone(),
            auxiliaries: SmallVec::new(),
            options: ComposeOptions::default(),
        }
    }

    pub fn with(mut self, auxiliary: &ClassRef) -> Self {
        self.auxiliaries.push(auxiliary.clone());
        self
    }

    pub fn with_all<'a>(mut self, auxiliaries: impl IntoIterator<Item = &'a ClassRef>) -> Self {
        self.auxiliaries.extend(auxiliaries.into_iter().cloned());
        self
    }

    pub fn options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.options.unresolved_write = policy;
        self
    }

    pub fn init_hook(mut self, method: &str) -> Self {
        self.options.init_hook = Some(method.to_string());
        self
    }

    pub fn build(self) -> RuntimeResult<ClassRef> {
        let mut components: SmallVec<[ClassRef; 4]> = SmallVec::with_capacity(self.auxiliaries.len() + 1);
        components.push(self.primary);
        components.extend(self.auxiliaries);

        if components.len() > MAX_COMPONENTS {
            return Err(RuntimeError::TooManyComponents {
                limit: MAX_COMPONENTS,
                found: components.len(),
            });
        }

        let depth = components
            .iter()
            .map(ClassRef::composition_depth)
            .max()
            .unwrap_or(0)
            + 1;
        if depth > MAX_COMPOSITION_DEPTH {
            return Err(RuntimeError::CompositionTooDeep {
                limit: MAX_COMPOSITION_DEPTH,
            });
        }

        let names: SmallVec<[Atom; 4]> = components.iter().map(ClassRef::name).collect();
        let name = intern(&composite_name(&names));
        let prototype = ObjectRef::with_prototype(Some(components[0].prototype().clone()));

        debug!(composite = %name, components = components.len(), depth, "mix");
        Ok(ClassRef::composite(
            name,
            prototype,
            CompositeClass {
                components,
                options: self.options,
                depth,
            },
        ))
    }
}

/// Build the composite class of `primary` and `auxiliaries` with default
/// options.
pub fn mix(primary: &ClassRef, auxiliaries: &[ClassRef]) -> RuntimeResult<ClassRef> {
    Composer::new(primary).with_all(auxiliaries).build()
}

/// Build the composite class and construct it in one step.
pub fn compose(
    primary: &ClassRef,
    auxiliaries: &[ClassRef],
    primary_args: Args,
    auxiliary_args: Vec<Args>,
) -> RuntimeResult<Value> {
    let class = mix(primary, auxiliaries)?;
    let mut per_component = Vec::with_capacity(auxiliary_args.len() + 1);
    per_component.push(primary_args);
    per_component.extend(auxiliary_args);
    class.construct(Args::PerComponent(per_component))
}

/// Construct a composite instance. `prototype` is the composite's prototype
/// or, when a subclass is being constructed, the subclass's.
pub(crate) fn instantiate(
    class: &ClassRef,
    layout: &CompositeClass,
    args: Args,
    prototype: &ObjectRef,
) -> RuntimeResult<Value> {
    let per_component = match args {
        Args::PerComponent(lists) if lists.len() == layout.components.len() => lists,
        other => {
            return Err(RuntimeError::ArgumentShape {
                class: class.name().to_string(),
                expected: format!("{} argument list(s)", layout.components.len()),
                found: other.describe(),
            });
        }
    };

    let mut instances: SmallVec<[ObjectRef; 4]> = SmallVec::with_capacity(layout.components.len());
    for (i, (component, component_args)) in layout.components.iter().zip(per_component).enumerate() {
        let component_prototype = if i == 0 { prototype } else { component.prototype() };
        let instance = component.construct_with(component_args, component_prototype)?;
        instances.push(instance.expect_object()?.clone());
    }

    let mut instances = instances.into_iter();
    let target = instances.next().ok_or_else(|| RuntimeError::ArgumentShape {
        class: class.name().to_string(),
        expected: "a primary component".to_string(),
        found: "none".to_string(),
    })?;

    let trap = CompositeTrap::new(
        class.name(),
        target,
        instances.collect(),
        layout.components.clone(),
        layout.options.unresolved_write,
    );
    let instance = Value::Object(ObjectRef::composite(trap, class.name()));

    if let Some(hook) = &layout.options.init_hook {
        run_init_hook(&instance, &layout.components, &PropertyKey::from(hook.as_str()))?;
    }

    debug!(composite = %class.name(), "construct");
    Ok(instance)
}

/// Invoke `hook` from each component's prototype, primary first, with the
/// composite as the receiver.
fn run_init_hook(instance: &Value, components: &[ClassRef], hook: &PropertyKey) -> RuntimeResult<()> {
    for component in components {
        if let Some((_, Property::Data { value: Value::Function(func), .. })) =
            component.lookup_prototype(hook)?
        {
            trace!(component = %component.name(), hook = %hook, "init hook");
            func.call(instance, &[])?;
        }
    }
    Ok(())
}

/// True if `value` was built from `class`: as the class itself, a subclass,
/// or a composite with `class` among its components at any depth.
pub fn has_mixin(value: &Value, class: &ClassRef) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if let Some(trap) = obj.trap() {
        if trap.components().iter().any(|c| c.is_derived_from(class)) {
            return true;
        }
    }
    instance_of(value, class)
}

/// Prototype-chain membership: `class.prototype` appears in the chain of
/// `value`.
pub fn instance_of(value: &Value, class: &ClassRef) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let target = class.prototype();
    let mut current = obj.prototype();
    for _ in 0..MAX_PROTOTYPE_CHAIN_DEPTH {
        match current {
            Some(proto) if proto.ptr_eq(target) => return true,
            Some(proto) => current = proto.prototype(),
            None => return false,
        }
    }
    false
}
