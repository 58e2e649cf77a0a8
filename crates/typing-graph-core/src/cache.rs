//! The inspection cache: `(raw identity, config fingerprint) -> Node`,
//! read-mostly and safe for concurrent readers.
//!
//! The engine is generic over `ReflectionAdapter`, so there is no single
//! concrete type a hidden global cache could be keyed on; instead an
//! [`Engine`](crate::Engine) owns one `Cache` for its adapter's `Id` type.
//! Constructing one `Engine` per process and reusing it gives process-wide
//! cache behavior without an implicit static.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::config::ConfigFingerprint;
use crate::node::Node;

/// `cache_info()`'s return shape. This cache is unbounded and append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,
    pub currsize: usize,
}

pub struct Cache<Id> {
    entries: DashMap<(Id, ConfigFingerprint), Node>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<Id> Default for Cache<Id>
where
    Id: std::hash::Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> Cache<Id>
where
    Id: std::hash::Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, raw_identity: &Id, fingerprint: ConfigFingerprint) -> Option<Node>
    where
        Id: Clone,
    {
        // DashMap has no borrow-by-tuple-of-refs lookup without an owned
        // key; identities are cheap to clone (they're meant to be small
        // hashable keys, not the raw type itself).
        let key = (raw_identity.clone(), fingerprint);
        let hit = self.entries.get(&key).map(|entry| entry.value().clone());
        if hit.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Insert a freshly-built node. If a concurrent miss already inserted
    /// one for the same key, that earlier value wins and is returned
    /// instead.
    pub fn insert(&self, raw_identity: Id, fingerprint: ConfigFingerprint, node: Node) -> Node {
        match self.entries.entry((raw_identity, fingerprint)) {
            dashmap::mapref::entry::Entry::Occupied(existing) => existing.get().clone(),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(node.clone());
                node
            }
        }
    }

    pub fn info(&self) -> CacheInfo {
        CacheInfo {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            currsize: self.entries.len(),
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;
    use crate::node::NodeKind;

    fn sample_node() -> Node {
        Node::new(NodeData::leaf(NodeKind::Concrete {
            class_ref: "int".to_string(),
        }))
    }

    #[test]
    fn miss_then_hit() {
        let cache: Cache<u32> = Cache::new();
        let fp = crate::config::Config::default().fingerprint();
        assert!(cache.get(&1, fp).is_none());
        let node = cache.insert(1, fp, sample_node());
        let fetched = cache.get(&1, fp).unwrap();
        assert!(fetched.ptr_eq(&node));
        let info = cache.info();
        assert_eq!(info.hits, 1);
        assert_eq!(info.misses, 1);
        assert_eq!(info.currsize, 1);
    }

    #[test]
    fn concurrent_insert_keeps_first_value() {
        let cache: Cache<u32> = Cache::new();
        let fp = crate::config::Config::default().fingerprint();
        let first = cache.insert(1, fp, sample_node());
        let second = cache.insert(1, fp, sample_node());
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn clear_resets_everything() {
        let cache: Cache<u32> = Cache::new();
        let fp = crate::config::Config::default().fingerprint();
        cache.insert(1, fp, sample_node());
        cache.clear();
        assert_eq!(cache.info().currsize, 0);
    }
}
