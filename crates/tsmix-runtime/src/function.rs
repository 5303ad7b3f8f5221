//! Callable values: native closures and receiver-bound functions.

use crate::error::RuntimeResult;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;
use tsmix_common::{Atom, intern};

/// Signature of a native function: `(this, args) -> result`.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> RuntimeResult<Value>;

enum FunctionKind {
    Native(Rc<NativeFn>),
    /// Calls `target` with a fixed receiver, ignoring the caller's.
    Bound { target: FunctionRef, this: Value },
}

struct Function {
    name: Atom,
    kind: FunctionKind,
}

#[derive(Clone)]
pub struct FunctionRef(Rc<Function>);

impl FunctionRef {
    pub fn native(
        name: &str,
        f: impl Fn(&Value, &[Value]) -> RuntimeResult<Value> + 'static,
    ) -> Self {
        Self(Rc::new(Function {
            name: intern(name),
            kind: FunctionKind::Native(Rc::new(f)),
        }))
    }

    pub fn name(&self) -> Atom {
        self.0.name
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> RuntimeResult<Value> {
        match &self.0.kind {
            FunctionKind::Native(f) => f(this, args),
            FunctionKind::Bound { target, this } => target.call(this, args),
        }
    }

    /// A new function that always runs with `this` as its receiver.
    ///
    /// Binding an already bound function keeps the innermost receiver.
    pub fn bind(&self, this: Value) -> FunctionRef {
        Self(Rc::new(Function {
            name: self.0.name,
            kind: FunctionKind::Bound {
                target: self.clone(),
                this,
            },
        }))
    }

    /// The receiver this function is effectively bound to, if any.
    pub fn bound_this(&self) -> Option<&Value> {
        match &self.0.kind {
            FunctionKind::Native(_) => None,
            FunctionKind::Bound { target, this } => target.bound_this().or(Some(this)),
        }
    }

    /// The unbound function at the bottom of any bind chain.
    pub fn unbound(&self) -> &FunctionRef {
        match &self.0.kind {
            FunctionKind::Native(_) => self,
            FunctionKind::Bound { target, .. } => target.unbound(),
        }
    }

    pub fn ptr_eq(&self, other: &FunctionRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function {}]", self.0.name)
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = matches!(self.0.kind, FunctionKind::Bound { .. });
        f.debug_struct("Function")
            .field("name", &self.0.name)
            .field("bound", &bound)
            .finish()
    }
}
