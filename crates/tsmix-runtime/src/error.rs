//! Errors raised by the object model and the composite engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A key reached the property boundary that is neither a string nor a symbol.
    #[error("property key must be a string or a symbol, found {found}")]
    MalformedKey { found: &'static str },

    #[error("expected an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("{callee} is not a function")]
    NotCallable { callee: String },

    /// Constructor arguments do not match the shape the class expects.
    #[error("constructor of {class} expects {expected}, found {found}")]
    ArgumentShape {
        class: String,
        expected: String,
        found: String,
    },

    /// A write to a key no component owns, under the rejecting write policy.
    #[error("cannot create property '{key}' on {composite}: no component owns it")]
    UnknownProperty { key: String, composite: String },

    #[error("cannot set property '{key}' which has only a getter")]
    NoSetter { key: String },

    #[error("cannot assign to read-only property '{key}'")]
    ReadOnly { key: String },

    #[error("cyclic prototype chain on {object}")]
    PrototypeCycle { object: String },

    #[error("prototype chain is longer than {limit} links")]
    PrototypeChainTooDeep { limit: usize },

    #[error("composites nest more than {limit} levels deep")]
    CompositionTooDeep { limit: u32 },

    #[error("a composite takes at most {limit} components, found {found}")]
    TooManyComponents { limit: usize, found: usize },

    /// Raised by user code (constructors, methods, accessors).
    #[error("{0}")]
    Thrown(String),
}

impl RuntimeError {
    pub fn thrown(message: impl Into<String>) -> Self {
        Self::Thrown(message.into())
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
