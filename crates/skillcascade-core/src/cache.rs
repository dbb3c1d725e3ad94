//! Memoized health projections.
//!
//! `HealthCache` is a concurrent map from an input fingerprint to a computed
//! health map, backed by `DashMap`. The fingerprint covers the engine's
//! revision, every rating and every override target, so a change to any of
//! them yields a new key. Cached values are shared via `Arc` and cloned out of
//! the map, so no `DashMap` guard outlives a call.
//!
//! Only projections of the most recent assessment are retained: the first
//! request for a different engine or assessment drops every older entry.
//! Within one assessment the cache holds at most `capacity` override sets and
//! evicts the oldest insert beyond that.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use skillcascade_types::assessment::Assessment;
use skillcascade_types::catalog::DomainId;
use skillcascade_types::health::DomainHealth;

use crate::engine::CascadeEngine;
use crate::hash::ContentHasher;

pub type HealthMap = BTreeMap<DomainId, DomainHealth>;

/// Override sets kept per assessment unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 64;

struct CachedHealth {
    scope: String,
    seq: u64,
    health: Arc<HealthMap>,
}

/// Content-addressed cache of `CascadeEngine::project` results.
pub struct HealthCache<H: ContentHasher> {
    hasher: H,
    capacity: usize,
    entries: DashMap<String, CachedHealth>,
    current_scope: Mutex<Option<String>>,
    next_seq: AtomicU64,
}

impl<H: ContentHasher> HealthCache<H> {
    pub fn new(hasher: H) -> Self {
        Self::with_capacity(hasher, DEFAULT_CAPACITY)
    }

    /// Cache holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(hasher: H, capacity: usize) -> Self {
        Self {
            hasher,
            capacity: capacity.max(1),
            entries: DashMap::new(),
            current_scope: Mutex::new(None),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fingerprint of an engine plus assessment, shared by all override sets.
    ///
    /// Ratings come from an ordered map, so the canonical text is independent
    /// of insertion order.
    pub fn scope(&self, engine: &CascadeEngine, assessment: &Assessment) -> String {
        let mut canonical = format!("e:{};", engine.revision());
        for (skill, rating) in assessment.iter() {
            let _ = write!(canonical, "s:{skill}={rating};");
        }
        self.hasher.compute_hash(&canonical)
    }

    /// Stable fingerprint of an engine, assessment and override set.
    ///
    /// Targets are encoded by bit pattern.
    pub fn fingerprint(
        &self,
        engine: &CascadeEngine,
        assessment: &Assessment,
        overrides: &BTreeMap<DomainId, f64>,
    ) -> String {
        self.key(&self.scope(engine, assessment), overrides)
    }

    fn key(&self, scope: &str, overrides: &BTreeMap<DomainId, f64>) -> String {
        let mut canonical = format!("a:{scope};");
        for (domain, target) in overrides {
            let _ = write!(canonical, "o:{domain}={:016x};", target.to_bits());
        }
        self.hasher.compute_hash(&canonical)
    }

    /// Projected health for the inputs, computing it on first request.
    pub fn get_or_compute(
        &self,
        engine: &CascadeEngine,
        assessment: &Assessment,
        overrides: &BTreeMap<DomainId, f64>,
    ) -> Arc<HealthMap> {
        let scope = self.scope(engine, assessment);
        self.retire_other_scopes(&scope);

        let key = self.key(&scope, overrides);
        if let Some(hit) = self.entries.get(&key) {
            tracing::trace!(key = %key, "health cache hit");
            return Arc::clone(&hit.health);
        }

        let health = Arc::new(engine.project(assessment, overrides));
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let stored = Arc::clone(
            &self
                .entries
                .entry(key)
                .or_insert_with(|| CachedHealth { scope, seq, health })
                .health,
        );
        self.evict_over_capacity();
        stored
    }

    /// Drop entries computed for any other engine or assessment.
    fn retire_other_scopes(&self, scope: &str) {
        let mut current = match self.current_scope.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if current.as_deref() == Some(scope) {
            return;
        }
        if current.is_some() {
            let before = self.entries.len();
            self.entries.retain(|_, entry| entry.scope == scope);
            tracing::debug!(evicted = before - self.entries.len(), "assessment changed, health cache retired");
        }
        *current = Some(scope.to_string());
    }

    fn evict_over_capacity(&self) {
        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.seq)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drop one entry. Returns true if it was present.
    pub fn invalidate(
        &self,
        engine: &CascadeEngine,
        assessment: &Assessment,
        overrides: &BTreeMap<DomainId, f64>,
    ) -> bool {
        let key = self.fingerprint(engine, assessment, overrides);
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
        match self.current_scope.lock() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{nine_domain_engine, overrides, rate_domain};
    use skillcascade_types::catalog::DependencyEdge;

    /// Identity "hash" so keys are readable in assertions.
    struct PlainHasher;

    impl ContentHasher for PlainHasher {
        fn compute_hash(&self, content: &str) -> String {
            content.to_string()
        }
    }

    fn rated_d1(rating: u8) -> Assessment {
        let mut a = Assessment::new();
        rate_domain(&mut a, "d1", rating);
        a
    }

    #[test]
    fn test_fingerprint_distinguishes_inputs() {
        let engine = nine_domain_engine(vec![]);
        let cache = HealthCache::new(PlainHasher);
        let a = rated_d1(2);
        let mut b = a.clone();
        b.rate("d1.s1", 3).unwrap();

        let none = BTreeMap::new();
        assert_eq!(
            cache.fingerprint(&engine, &a, &none),
            cache.fingerprint(&engine, &a.clone(), &none)
        );
        assert_ne!(cache.fingerprint(&engine, &a, &none), cache.fingerprint(&engine, &b, &none));
        assert_ne!(
            cache.fingerprint(&engine, &a, &overrides(&[("d1", 1.0)])),
            cache.fingerprint(&engine, &a, &overrides(&[("d1", 1.5)]))
        );

        let other = nine_domain_engine(vec![DependencyEdge::requires("d1", "d2")]);
        assert_ne!(cache.fingerprint(&engine, &a, &none), cache.fingerprint(&other, &a, &none));
    }

    #[test]
    fn test_get_or_compute_reuses_entry() {
        let engine = nine_domain_engine(vec![DependencyEdge::requires("d1", "d2")]);
        let cache = HealthCache::new(PlainHasher);
        let a = rated_d1(3);
        let what_if = overrides(&[("d1", 1.0)]);

        let first = cache.get_or_compute(&engine, &a, &what_if);
        let second = cache.get_or_compute(&engine, &a, &what_if);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(*first, engine.project(&a, &what_if));

        cache.get_or_compute(&engine, &a, &BTreeMap::new());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_assessment_change_evicts_previous_entries() {
        let engine = nine_domain_engine(vec![DependencyEdge::requires("d1", "d2")]);
        let cache = HealthCache::new(PlainHasher);
        let before = rated_d1(3);
        let none = BTreeMap::new();

        let stale = cache.get_or_compute(&engine, &before, &none);
        cache.get_or_compute(&engine, &before, &overrides(&[("d1", 1.0)]));
        assert_eq!(cache.len(), 2);

        let after = rated_d1(1);
        let fresh = cache.get_or_compute(&engine, &after, &none);
        assert_eq!(cache.len(), 1);
        assert_eq!(*fresh, engine.project(&after, &none));

        let recomputed = cache.get_or_compute(&engine, &before, &none);
        assert!(!Arc::ptr_eq(&stale, &recomputed));
        assert_eq!(*stale, *recomputed);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest_override_set() {
        let engine = nine_domain_engine(vec![DependencyEdge::requires("d1", "d2")]);
        let cache = HealthCache::with_capacity(PlainHasher, 2);
        let a = rated_d1(2);

        let first = cache.get_or_compute(&engine, &a, &overrides(&[("d1", 0.5)]));
        cache.get_or_compute(&engine, &a, &overrides(&[("d1", 1.0)]));
        cache.get_or_compute(&engine, &a, &overrides(&[("d1", 1.5)]));
        assert_eq!(cache.len(), 2);

        let again = cache.get_or_compute(&engine, &a, &overrides(&[("d1", 0.5)]));
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 2);
        assert_eq!(HealthCache::with_capacity(PlainHasher, 0).capacity(), 1);
    }

    #[test]
    fn test_shared_cache_keeps_engines_apart() {
        let linked = nine_domain_engine(vec![DependencyEdge::requires("d1", "d2")]);
        let unlinked = nine_domain_engine(vec![]);
        let cache = HealthCache::new(PlainHasher);
        let a = rated_d1(3);
        let what_if = overrides(&[("d1", 0.0)]);

        let from_linked = cache.get_or_compute(&linked, &a, &what_if);
        let from_unlinked = cache.get_or_compute(&unlinked, &a, &what_if);
        assert_eq!(*from_linked, linked.project(&a, &what_if));
        assert_eq!(*from_unlinked, unlinked.project(&a, &what_if));
        assert_ne!(*from_linked, *from_unlinked);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let engine = nine_domain_engine(vec![]);
        let cache = HealthCache::new(PlainHasher);
        let a = Assessment::new();
        let none = BTreeMap::new();

        cache.get_or_compute(&engine, &a, &none);
        assert!(cache.invalidate(&engine, &a, &none));
        assert!(!cache.invalidate(&engine, &a, &none));
        assert!(cache.is_empty());

        cache.get_or_compute(&engine, &a, &none);
        cache.clear();
        assert!(cache.is_empty());
    }
}
