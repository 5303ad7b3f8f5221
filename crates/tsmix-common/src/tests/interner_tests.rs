use super::*;

#[test]
fn test_intern_deduplicates() {
    let interner = ShardedInterner::new();
    let a1 = interner.intern("hello");
    let a2 = interner.intern("hello");
    let a3 = interner.intern("world");

    assert_eq!(a1, a2);
    assert_ne!(a1, a3);
    assert_eq!(&*interner.resolve(a1), "hello");
    assert_eq!(&*interner.resolve(a3), "world");
}

#[test]
fn test_empty_string_is_none() {
    let interner = ShardedInterner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(&*interner.resolve(Atom::NONE), "");
    assert!(interner.is_empty());
}

#[test]
fn test_intern_owned_matches_borrowed() {
    let interner = ShardedInterner::new();
    let borrowed = interner.intern("greet");
    let owned = interner.intern_owned(String::from("greet"));
    assert_eq!(borrowed, owned);
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_many_strings_spread_over_shards() {
    let interner = ShardedInterner::new();
    let atoms: Vec<Atom> = (0..500).map(|i| interner.intern(&format!("field{i}"))).collect();

    for (i, atom) in atoms.iter().enumerate() {
        assert_eq!(&*interner.resolve(*atom), format!("field{i}"));
    }
    // 500 strings plus the reserved empty string
    assert_eq!(interner.len(), 501);
}

#[test]
fn test_global_pool_round_trip() {
    let atom = intern("resolutionOrder");
    assert_eq!(&*resolve(atom), "resolutionOrder");
    assert_eq!(atom.to_string(), "resolutionOrder");
    assert_eq!(Atom::from("resolutionOrder"), atom);
    assert_eq!(Atom::from(String::from("resolutionOrder")), atom);
}

#[test]
fn test_unknown_atom_resolves_empty() {
    let interner = ShardedInterner::new();
    assert!(interner.try_resolve(Atom(u32::MAX)).is_none());
    assert_eq!(&*interner.resolve(Atom(u32::MAX)), "");
}

#[test]
fn test_composite_name_lists_components_in_order() {
    let names = [intern("Walker"), intern("Swimmer")];
    assert_eq!(crate::composite_name(&names), "Composite(Walker, Swimmer)");
    assert_eq!(crate::composite_name(&[]), "Composite()");
}
