//! Property map cache behaviour.

mod common;

use common::*;
use flowsdk_values::{EntityRef, PropertyCache};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn first_lookup_populates_the_cache() {
    let registry = registry();
    let cache = PropertyCache::new();
    assert!(cache.is_empty());

    let properties = cache.properties(&registry, EntityRef::of::<Person>()).unwrap();
    assert_eq!(cache.len(), 1);
    let names: Vec<&str> = properties.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Name", "Age", "Active"]);
}

#[test]
fn repeated_lookups_share_one_mapping() {
    let registry = registry();
    let cache = PropertyCache::new();

    let first = cache.properties(&registry, EntityRef::of::<Order>()).unwrap();
    let second = cache.properties(&registry, EntityRef::of::<Order>()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn cached_mapping_matches_the_registry() {
    let registry = registry();
    let cache = PropertyCache::new();

    let cached = cache.properties(&registry, EntityRef::of::<Account>()).unwrap();
    let registered = registry.find_type_properties::<Account>().unwrap();
    assert_eq!(cached.len(), registered.len());
    for (name, property) in registered {
        assert!(Arc::ptr_eq(property, &cached[name]));
    }
}

#[test]
fn unregistered_type_is_not_cached() {
    #[derive(Default)]
    struct Stranger {
        id: String,
    }
    impl flowsdk_values::Entity for Stranger {
        fn declare() -> flowsdk_values::EntityDeclaration<Self> {
            flowsdk_values::EntityDeclaration::new("Stranger")
                .identifier(flowsdk_values::field!(Stranger, id))
        }
    }

    let cache = PropertyCache::new();
    assert!(
        cache
            .properties(&registry(), EntityRef::of::<Stranger>())
            .is_err()
    );
    assert!(cache.is_empty());
}

#[test]
fn clear_empties_the_cache() {
    let registry = registry();
    let cache = PropertyCache::new();
    cache.properties(&registry, EntityRef::of::<Person>()).unwrap();
    cache.properties(&registry, EntityRef::of::<Line>()).unwrap();
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn concurrent_lookups_agree() {
    let registry = registry();
    let cache = PropertyCache::new();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = &registry;
                let cache = &cache;
                scope.spawn(move || {
                    let entity = if i % 2 == 0 {
                        EntityRef::of::<Person>()
                    } else {
                        EntityRef::of::<Order>()
                    };
                    cache.properties(registry, entity).unwrap().len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, len) in results.into_iter().enumerate() {
        assert_eq!(len, if i % 2 == 0 { 3 } else { 5 });
    }
    assert_eq!(cache.len(), 2);
}

#[test]
fn parser_shares_across_threads() {
    let parser = parser();
    let object = person_object("p1", "Ada", "37", "true");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let person: Person = parser.from_object(&object).unwrap();
                assert_eq!(person.name, "Ada");
            });
        }
    });
    assert_eq!(parser.cache().len(), 1);
}
