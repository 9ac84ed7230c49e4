use super::{seed_for, stable_hash, InvocationCache, ResolveError, SeedResolver};
use crate::random::SeededRandom;
use crate::testing::{fresh_cache, FailingRandom, PercentileRandom};
use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn same_slot_shares_one_instance_across_phases() {
    let resolver = SeedResolver::new();
    let mut cache = fresh_cache();

    // A setup callback and the test body request the same slot.
    let from_setup = resolver
        .resolve::<SeededRandom>(0, "test [1]", &mut cache)
        .unwrap();
    let from_body = resolver
        .resolve::<SeededRandom>(0, "test [1]", &mut cache)
        .unwrap();

    assert!(Rc::ptr_eq(&from_setup, &from_body));
    assert_eq!(cache.len(), 1);
}

#[test]
fn different_slots_get_distinct_instances_and_seeds() {
    let resolver = SeedResolver::new();
    let mut cache = fresh_cache();

    let first = resolver
        .resolve::<SeededRandom>(0, "test [1]", &mut cache)
        .unwrap();
    let second = resolver
        .resolve::<SeededRandom>(1, "test [1]", &mut cache)
        .unwrap();

    assert!(!Rc::ptr_eq(&first, &second));
    assert_ne!(
        first.borrow().initial_seed(),
        second.borrow().initial_seed()
    );
    assert_eq!(cache.len(), 2);
}

#[test]
fn different_invocations_diverge() {
    let resolver = SeedResolver::new();
    let mut cache_one = fresh_cache();
    let mut cache_two = fresh_cache();

    let first = resolver
        .resolve::<SeededRandom>(0, "test [1]", &mut cache_one)
        .unwrap();
    let second = resolver
        .resolve::<SeededRandom>(0, "test [2]", &mut cache_two)
        .unwrap();

    assert!(!Rc::ptr_eq(&first, &second));
    assert_ne!(
        first.borrow().initial_seed(),
        second.borrow().initial_seed()
    );
}

#[test]
fn repeated_invocations_never_repeat_a_seed() {
    // Mirrors a @RepeatedTest-style run: each repetition gets a fresh cache
    // and a display name embedding the repetition index.
    let resolver = SeedResolver::new();
    let mut seeds = Vec::new();
    for repetition in 1..=8 {
        let mut cache = fresh_cache();
        let name = format!("test_something [{repetition}]");
        let random = resolver
            .resolve::<SeededRandom>(0, &name, &mut cache)
            .unwrap();
        seeds.push(random.borrow().initial_seed());
    }
    let mut deduped = seeds.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), seeds.len(), "seeds collided: {seeds:?}");
}

#[test]
fn seed_follows_the_documented_formula() {
    let name = "test_something [3]";
    assert_eq!(
        seed_for(name, 0),
        1i64.wrapping_shl(32).wrapping_add(stable_hash(name))
    );
    assert_eq!(
        seed_for(name, 4),
        5i64.wrapping_shl(32).wrapping_add(stable_hash(name))
    );

    let resolver = SeedResolver::new();
    let mut cache = fresh_cache();
    let random = resolver
        .resolve::<SeededRandom>(2, name, &mut cache)
        .unwrap();
    assert_eq!(random.borrow().initial_seed(), seed_for(name, 2));
}

#[test]
fn stable_hash_is_deterministic_and_fits_the_low_word() {
    assert_eq!(stable_hash("test [1]"), stable_hash("test [1]"));
    assert_ne!(stable_hash("test [1]"), stable_hash("test [2]"));
    for name in ["", "a", "test_something [12]", "unicode \u{1f3b2}"] {
        let hash = stable_hash(name);
        // Sign-extended low 32 bits only, leaving the high word to the slot.
        assert_eq!(hash, i64::from(hash as i32), "hash of {name:?}");
    }
}

#[test]
fn shared_instance_draws_one_continuous_sequence() {
    let resolver = SeedResolver::new();
    let mut cache = fresh_cache();
    let name = "test [1]";

    let handle = resolver
        .resolve::<SeededRandom>(0, name, &mut cache)
        .unwrap();
    let setup_draw = handle.borrow_mut().next_long();

    // The body's handle continues where setup left off.
    let again = resolver
        .resolve::<SeededRandom>(0, name, &mut cache)
        .unwrap();
    let body_draw = again.borrow_mut().next_long();

    let mut replay = SeededRandom::new(seed_for(name, 0));
    assert_eq!(replay.next_long(), setup_draw);
    assert_eq!(replay.next_long(), body_draw);
}

#[test]
fn supports_reflects_the_registry() {
    let mut resolver = SeedResolver::new();
    assert!(resolver.supports::<SeededRandom>());
    assert!(resolver.supports_id(TypeId::of::<SeededRandom>()));
    assert!(!resolver.supports::<PercentileRandom>());

    resolver.register::<PercentileRandom>();
    assert!(resolver.supports::<PercentileRandom>());
}

#[test]
fn registered_subtypes_resolve_with_the_same_formula() {
    let mut resolver = SeedResolver::new();
    resolver.register::<PercentileRandom>();
    let mut cache = fresh_cache();
    let name = "test [1]";

    let percentile = resolver
        .resolve::<PercentileRandom>(0, name, &mut cache)
        .unwrap();
    assert_eq!(percentile.borrow().initial_seed(), seed_for(name, 0));

    let value = percentile.borrow_mut().percentile().unwrap();
    assert!((0..100).contains(&value));
}

#[test]
fn unregistered_types_are_rejected() {
    let resolver = SeedResolver::new();
    let mut cache = fresh_cache();
    let err = resolver
        .resolve::<PercentileRandom>(0, "test [1]", &mut cache)
        .unwrap_err();
    match err {
        ResolveError::UnsupportedType { type_name } => {
            assert!(type_name.contains("PercentileRandom"), "{type_name}");
        }
        other => panic!("expected UnsupportedType, got: {other:?}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn construction_failure_names_the_type_and_seed() {
    let mut resolver = SeedResolver::new();
    resolver.register::<FailingRandom>();
    let mut cache = fresh_cache();
    let name = "test [1]";

    let err = resolver
        .resolve::<FailingRandom>(0, name, &mut cache)
        .unwrap_err();
    match err {
        ResolveError::Construction {
            type_name, seed, ..
        } => {
            assert!(type_name.contains("FailingRandom"), "{type_name}");
            assert_eq!(seed, seed_for(name, 0));
        }
        other => panic!("expected Construction, got: {other:?}"),
    }
    // A failed construction leaves the cache untouched.
    assert!(cache.is_empty());
}

#[test]
fn slot_resolved_as_one_type_rejects_another() {
    let mut resolver = SeedResolver::new();
    resolver.register::<PercentileRandom>();
    let mut cache = fresh_cache();

    let _ = resolver
        .resolve::<SeededRandom>(0, "test [1]", &mut cache)
        .unwrap();
    let err = resolver
        .resolve::<PercentileRandom>(0, "test [1]", &mut cache)
        .unwrap_err();
    match err {
        ResolveError::CacheTypeMismatch { key, type_name } => {
            assert_eq!(key, "p1");
            assert!(type_name.contains("PercentileRandom"), "{type_name}");
        }
        other => panic!("expected CacheTypeMismatch, got: {other:?}"),
    }
}

#[test]
fn resolve_dyn_shares_the_typed_path_cache() {
    let resolver = SeedResolver::new();
    let mut cache = fresh_cache();
    let name = "test [1]";

    let erased = resolver
        .resolve_dyn(TypeId::of::<SeededRandom>(), 0, name, &mut cache)
        .unwrap();
    let typed = resolver
        .resolve::<SeededRandom>(0, name, &mut cache)
        .unwrap();

    let downcast = erased.downcast::<RefCell<SeededRandom>>().unwrap();
    assert!(Rc::ptr_eq(&downcast, &typed));
}

#[test]
fn resolver_holds_no_state_across_invocations() {
    let resolver = SeedResolver::new();
    let name = "test [1]";

    let mut first_cache = fresh_cache();
    let first = resolver
        .resolve::<SeededRandom>(0, name, &mut first_cache)
        .unwrap();
    drop(first_cache);

    // A new invocation with the same name reproduces the seed but not the
    // instance: everything invocation-scoped lived in the discarded cache.
    let mut second_cache = fresh_cache();
    let second = resolver
        .resolve::<SeededRandom>(0, name, &mut second_cache)
        .unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(
        first.borrow().initial_seed(),
        second.borrow().initial_seed()
    );
}

#[test]
fn cache_starts_empty_and_tracks_slots() {
    let cache = InvocationCache::new();
    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);
    assert_eq!(format!("{cache:?}"), "InvocationCache { slots: [] }");
}
