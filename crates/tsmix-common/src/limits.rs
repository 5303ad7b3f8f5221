//! Centralized limits and thresholds for the composition engine.
//!
//! Prototype chains and composite nesting are both caller-built structures,
//! so every walk over them is bounded. Keeping the bounds here means the
//! runtime and the type solver agree on how deep a composition may go.

// =============================================================================
// Runtime Limits
// =============================================================================

/// Maximum number of prototype links followed by a single lookup.
///
/// `set_prototype` rejects cycles, so this only trips on absurdly deep
/// class hierarchies. Exceeding it is reported as an error instead of
/// overflowing the stack.
pub const MAX_PROTOTYPE_CHAIN_DEPTH: usize = 1_000;

/// Maximum nesting of composites inside composites.
///
/// A composite may be a component of another composite (or the base of a
/// subclass that is then composed again). Each level adds one trap layer to
/// every lookup, so nesting is capped.
///
/// ```text
/// mix(mix(mix(A, [B]), [C]), [D])   // depth 3
/// ```
pub const MAX_COMPOSITION_DEPTH: u32 = 32;

/// Maximum number of components in a single composite.
pub const MAX_COMPONENTS: usize = 64;

// =============================================================================
// Solver Limits
// =============================================================================

/// Maximum depth for merging class instance types.
///
/// Mirrors `MAX_COMPOSITION_DEPTH`; a composite class type used as a
/// component nests one merge fold inside another.
pub const MAX_MERGE_DEPTH: u32 = MAX_COMPOSITION_DEPTH;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_are_consistent() {
        assert_eq!(MAX_MERGE_DEPTH, MAX_COMPOSITION_DEPTH);
        assert!(MAX_COMPONENTS > 1);
        assert!(MAX_PROTOTYPE_CHAIN_DEPTH >= MAX_COMPOSITION_DEPTH as usize);
    }
}
