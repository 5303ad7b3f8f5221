//! Common types and utilities for the tsmix composition engine.
//!
//! This crate provides foundational types used across all tsmix crates:
//! - String interning (`Atom`, `ShardedInterner`, process-global `intern`/`resolve`)
//! - Centralized limits and thresholds

// String interning for property names and class names
pub mod interner;
pub use interner::{Atom, ShardedInterner, intern, resolve};

// Centralized limits and thresholds
pub mod limits;

/// Synthesized diagnostic name for a composite of classes named `names`.
///
/// Shared by the runtime (composite class names) and the solver (composite
/// class types) so both report the same identity.
pub fn composite_name(names: &[Atom]) -> String {
    let parts: Vec<std::sync::Arc<str>> = names.iter().map(|name| name.as_str()).collect();
    format!("Composite({})", parts.join(", "))
}
