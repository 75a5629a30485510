//! Property-based tests for the version cache
//!
//! These tests verify version monotonicity, stability under repeated
//! resolution, and per-key serialization under concurrent callers.

use proptest::prelude::*;
use sheetcheck_cache::VersionCache;
use sheetcheck_hash::Fingerprint;
use sheetcheck_types::EntityId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Strategy for a sequence of content revisions drawn from a small alphabet,
/// so the same content regularly reappears.
fn arb_revisions() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..8, 1..64)
}

proptest! {
    #[test]
    fn versions_are_dense_and_assigned_in_first_seen_order(revisions in arb_revisions()) {
        let cache = VersionCache::new();
        let entity = EntityId::new("INS1");
        let mut expected: HashMap<u8, u32> = HashMap::new();

        for content in revisions {
            let fingerprint = Fingerprint::from_data(&[content]);
            let resolved = cache.resolve_version(&entity, "a.xlsx", &fingerprint).unwrap();

            let next = u32::try_from(expected.len()).unwrap() + 1;
            let version = *expected.entry(content).or_insert(next);

            prop_assert_eq!(resolved.version, version);
            prop_assert_eq!(resolved.is_new, version == next);
        }

        let latest = cache.latest_version(&entity, "a.xlsx");
        prop_assert_eq!(latest, Some(u32::try_from(expected.len()).unwrap()));
    }

    #[test]
    fn resolving_known_content_never_changes_state(revisions in arb_revisions(), repeats in 1usize..5) {
        let cache = VersionCache::new();
        let entity = EntityId::new("INS1");

        for content in &revisions {
            cache
                .resolve_version(&entity, "a.xlsx", &Fingerprint::from_data(&[*content]))
                .unwrap();
        }
        let snapshot = cache.records();

        for _ in 0..repeats {
            for content in &revisions {
                let resolved = cache
                    .resolve_version(&entity, "a.xlsx", &Fingerprint::from_data(&[*content]))
                    .unwrap();
                prop_assert!(!resolved.is_new);
            }
        }

        prop_assert_eq!(cache.records(), snapshot);
    }

    #[test]
    fn exported_records_reload_into_identical_cache(revisions in arb_revisions()) {
        let cache = VersionCache::new();
        let entity = EntityId::new("INS1");
        for content in &revisions {
            cache
                .resolve_version(&entity, "a.xlsx", &Fingerprint::from_data(&[*content]))
                .unwrap();
        }

        let restored = VersionCache::new();
        restored.load_history(cache.records()).unwrap();
        prop_assert_eq!(restored.records(), cache.records());
        prop_assert_eq!(restored.statistics(), cache.statistics());
    }
}

#[test]
fn concurrent_distinct_content_gets_distinct_versions() {
    let cache = Arc::new(VersionCache::new());
    let entity = EntityId::new("INS1");

    let handles: Vec<_> = (0u8..16)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let entity = entity.clone();
            std::thread::spawn(move || {
                cache
                    .resolve_version(&entity, "a.xlsx", &Fingerprint::from_data(&[i]))
                    .unwrap()
                    .version
            })
        })
        .collect();

    let versions: HashSet<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(versions, (1..=16).collect());
}

#[test]
fn concurrent_identical_content_is_new_exactly_once() {
    let cache = Arc::new(VersionCache::new());
    let entity = EntityId::new("INS1");
    let fingerprint = Fingerprint::from_data(b"same");

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let entity = entity.clone();
            let fingerprint = fingerprint.clone();
            std::thread::spawn(move || {
                cache
                    .resolve_version(&entity, "a.xlsx", &fingerprint)
                    .unwrap()
            })
        })
        .collect();

    let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(resolved.iter().filter(|r| r.is_new).count(), 1);
    assert!(resolved.iter().all(|r| r.version == 1));
}
