//! Structural type representation.
//!
//! Every shape is immutable once interned; `TypeData` is the interning key and
//! `TypeId` the handle passed around.

use bitflags::bitflags;
use serde::Serialize;
use std::sync::Arc;
use tsmix_common::Atom;

/// Handle to an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(1);
    pub const UNKNOWN: TypeId = TypeId(2);
    pub const NEVER: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const BOOLEAN: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    pub const SYMBOL: TypeId = TypeId(9);
    pub const VOID: TypeId = TypeId(10);
    /// Produced when a computation gives up (e.g. nesting limit exceeded).
    pub const ERROR: TypeId = TypeId(11);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 100;

    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Void,
    Error,
}

impl IntrinsicKind {
    pub const ALL: [(IntrinsicKind, TypeId); 11] = [
        (IntrinsicKind::Any, TypeId::ANY),
        (IntrinsicKind::Unknown, TypeId::UNKNOWN),
        (IntrinsicKind::Never, TypeId::NEVER),
        (IntrinsicKind::Undefined, TypeId::UNDEFINED),
        (IntrinsicKind::Null, TypeId::NULL),
        (IntrinsicKind::Boolean, TypeId::BOOLEAN),
        (IntrinsicKind::Number, TypeId::NUMBER),
        (IntrinsicKind::String, TypeId::STRING),
        (IntrinsicKind::Symbol, TypeId::SYMBOL),
        (IntrinsicKind::Void, TypeId::VOID),
        (IntrinsicKind::Error, TypeId::ERROR),
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Number => "number",
            IntrinsicKind::String => "string",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Error => "error",
        }
    }

    pub fn from_name(name: &str) -> Option<IntrinsicKind> {
        Self::ALL
            .iter()
            .map(|(kind, _)| *kind)
            .find(|kind| kind.name() == name)
    }

    pub fn type_id(self) -> TypeId {
        Self::ALL
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, id)| *id)
            .unwrap_or(TypeId::ERROR)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Instance type of a declared class.
        const CLASS_INSTANCE = 1 << 0;
        /// Produced by merging component instance types.
        const COMPOSITE = 1 << 1;
    }
}

/// A named member of an object or callable type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
    pub readonly: bool,
    /// Declared as a method (lives on the prototype at runtime).
    pub is_method: bool,
    /// Class that declared (or last overrode) this member.
    pub parent_id: Option<Atom>,
}

impl PropertyInfo {
    pub fn new(name: Atom, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            optional: false,
            readonly: false,
            is_method: false,
            parent_id: None,
        }
    }

    pub fn method(name: Atom, type_id: TypeId) -> Self {
        Self {
            is_method: true,
            ..Self::new(name, type_id)
        }
    }

    pub fn opt(name: Atom, type_id: TypeId) -> Self {
        Self {
            optional: true,
            ..Self::new(name, type_id)
        }
    }

    pub fn readonly(name: Atom, type_id: TypeId) -> Self {
        Self {
            readonly: true,
            ..Self::new(name, type_id)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub flags: ObjectFlags,
    pub properties: Vec<PropertyInfo>,
    /// Nominal identity (class name) when the shape is a class instance.
    pub symbol: Option<Atom>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Option<Atom>,
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

impl ParamInfo {
    pub fn required(name: Atom, type_id: TypeId) -> Self {
        Self {
            name: Some(name),
            type_id,
            optional: false,
            rest: false,
        }
    }

    pub fn optional(name: Atom, type_id: TypeId) -> Self {
        Self {
            optional: true,
            ..Self::required(name, type_id)
        }
    }

    pub fn unnamed(type_id: TypeId) -> Self {
        Self {
            name: None,
            type_id,
            optional: false,
            rest: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSignature {
    pub params: Vec<ParamInfo>,
    pub this_type: Option<TypeId>,
    pub return_type: TypeId,
    pub is_method: bool,
}

impl CallSignature {
    pub fn new(params: Vec<ParamInfo>, return_type: TypeId) -> Self {
        Self {
            params,
            this_type: None,
            return_type,
            is_method: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CallableShape {
    pub call_signatures: Vec<CallSignature>,
    pub construct_signatures: Vec<CallSignature>,
    pub properties: Vec<PropertyInfo>,
    pub symbol: Option<Atom>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub type_id: TypeId,
    pub name: Option<Atom>,
    pub optional: bool,
    pub rest: bool,
}

impl TupleElement {
    pub fn new(type_id: TypeId) -> Self {
        Self {
            type_id,
            name: None,
            optional: false,
            rest: false,
        }
    }

    pub fn named(name: Atom, type_id: TypeId) -> Self {
        Self {
            name: Some(name),
            ..Self::new(type_id)
        }
    }
}

impl From<&ParamInfo> for TupleElement {
    fn from(param: &ParamInfo) -> Self {
        Self {
            type_id: param.type_id,
            name: param.name,
            optional: param.optional,
            rest: param.rest,
        }
    }
}

/// Interning key for every non-intrinsic type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Object(Arc<ObjectShape>),
    Callable(Arc<CallableShape>),
    Tuple(Arc<[TupleElement]>),
}
