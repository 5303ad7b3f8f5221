//! Structural Type Solver for Composites
//!
//! This crate computes, without running anything, what a composite of
//! several classes looks like to a type checker:
//!
//! - **Instance type**: the recursive merge of every component's instance
//!   type, folded from the last component to the first so that earlier
//!   components win on member-name collisions.
//! - **Constructor arguments**: a tuple whose element *i* is the
//!   constructor-parameter tuple of component *i*.
//!
//! Types are interned (`TypeId` comparison is O(1)); class instance types are
//! built with [`ClassTypeBuilder`] and composed with [`MixinTypeResolver`].
mod class_hierarchy;
mod format;
mod intern;
mod mixin;
pub mod queries;
pub mod types;

pub use class_hierarchy::*;
pub use format::TypeFormatter;
pub use intern::{TypeDatabase, TypeInterner};
pub use mixin::*;
pub use types::*;
pub use tsmix_common::composite_name;
