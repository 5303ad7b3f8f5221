//! Runtime object model and composite instance engine.
//!
//! The object model is a small prototype-based one: [`ObjectRef`] heap
//! objects with ordered own properties and a prototype link, native
//! [`FunctionRef`] closures, and [`ClassRef`] classes built with
//! [`ClassBuilder`].
//!
//! On top of it, [`mix`] combines a primary class with auxiliary classes
//! into a composite class. Each instance of the composite holds one
//! instance of every component and resolves every property access across
//! them in a fixed order (see [`trap`]).
//!
//! The [`typed`] module adds compile-time checked constructor arguments.

pub mod class;
pub mod composer;
pub mod error;
pub mod function;
pub mod object;
pub mod trap;
pub mod typed;
pub mod value;

pub use class::{Args, ClassBuilder, ClassRef};
pub use composer::{ComposeOptions, Composer, WritePolicy, compose, has_mixin, instance_of, mix};
pub use error::{RuntimeError, RuntimeResult};
pub use function::FunctionRef;
pub use object::{ObjectRef, Property, PropertyFlags};
pub use trap::Source;
pub use value::{PropertyKey, Symbol, Value};

