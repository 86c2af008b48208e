//! Thread-safe, fixed-capacity LRU cache of tour lengths.
//!
//! [`FitnessCache`] maps a [`CanonicalKey`] to the length of the tour it
//! identifies. One `parking_lot::Mutex` guards both the hash index and the
//! recency list, so a lookup and its recency update happen as one step.
//!
//! # Layout
//!
//! Entries live in a slab (`Vec<Node>`) and are linked into a doubly linked
//! recency list by `usize` indices instead of pointers. The head is the
//! most recently used entry, the tail the least. The slab grows until it
//! reaches capacity; after that, eviction reuses the tail slot in place.

use crate::tour::CanonicalKey;
use parking_lot::Mutex;
use std::collections::HashMap;

const NIL: usize = usize::MAX;

/// Counters describing cache behavior since construction or the last
/// [`FitnessCache::clear`].
///
/// `hits` and `misses` count every [`FitnessCache::get`], including
/// existence probes made while breeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0.0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct Node {
    key: CanonicalKey,
    value: f64,
    prev: usize,
    next: usize,
}

#[derive(Debug)]
struct Lru {
    capacity: usize,
    index: HashMap<CanonicalKey, usize>,
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Lru {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity.min(1 << 16)),
            nodes: Vec::with_capacity(capacity.min(1 << 16)),
            head: NIL,
            tail: NIL,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Unlinks `idx` from the recency list, leaving the slot in place.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn touch(&mut self, idx: usize) {
        if self.head != idx {
            self.detach(idx);
            self.push_front(idx);
        }
    }

    fn get(&mut self, key: &CanonicalKey) -> Option<f64> {
        match self.index.get(key).copied() {
            Some(idx) => {
                self.hits += 1;
                self.touch(idx);
                Some(self.nodes[idx].value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn put(&mut self, key: CanonicalKey, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&idx) = self.index.get(&key) {
            self.nodes[idx].value = value;
            self.touch(idx);
            return;
        }

        let idx = if self.nodes.len() < self.capacity {
            self.nodes.push(Node {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        } else {
            // Full: recycle the least recently used slot.
            let victim = self.tail;
            self.detach(victim);
            let old = std::mem::replace(&mut self.nodes[victim].key, key.clone());
            self.index.remove(&old);
            self.nodes[victim].value = value;
            self.evictions += 1;
            victim
        };

        self.push_front(idx);
        self.index.insert(key, idx);
    }

    fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    fn keys_by_recency(&self) -> Vec<CanonicalKey> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut cur = self.head;
        while cur != NIL {
            out.push(self.nodes[cur].key.clone());
            cur = self.nodes[cur].next;
        }
        out
    }
}

/// Fixed-capacity least-recently-used map from tour key to tour length.
///
/// Safe to share between threads (`&FitnessCache` is `Sync`). Every method
/// takes the internal lock for its whole duration, so concurrent callers
/// observe a single consistent order of operations.
///
/// A capacity of 0 produces a cache that stores nothing.
///
/// # Examples
///
/// ```
/// use tsp_evolve::cache::FitnessCache;
/// use tsp_evolve::tour::CanonicalKey;
///
/// let cache = FitnessCache::new(2);
/// cache.put(CanonicalKey::from("a"), 1.0);
/// cache.put(CanonicalKey::from("b"), 2.0);
/// cache.put(CanonicalKey::from("c"), 3.0);
///
/// assert_eq!(cache.get(&CanonicalKey::from("a")), None);
/// assert_eq!(cache.get(&CanonicalKey::from("b")), Some(2.0));
/// assert_eq!(cache.get(&CanonicalKey::from("c")), Some(3.0));
/// ```
#[derive(Debug)]
pub struct FitnessCache {
    inner: Mutex<Lru>,
}

impl FitnessCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Lru::new(capacity)),
        }
    }

    /// Looks up `key`, marking it most recently used on a hit.
    ///
    /// A miss has no effect on the stored entries.
    pub fn get(&self, key: &CanonicalKey) -> Option<f64> {
        self.inner.lock().get(key)
    }

    /// Inserts or overwrites `key`, marking it most recently used.
    ///
    /// Inserting a new key into a full cache first evicts the least
    /// recently used entry.
    pub fn put(&self, key: CanonicalKey, value: f64) {
        self.inner.lock().put(key, value);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let lru = self.inner.lock();
        CacheStats {
            hits: lru.hits,
            misses: lru.misses,
            evictions: lru.evictions,
            len: lru.index.len(),
        }
    }

    /// Keys ordered from most to least recently used.
    ///
    /// Taken under the lock, so it is a consistent snapshot.
    pub fn keys_by_recency(&self) -> Vec<CanonicalKey> {
        self.inner.lock().keys_by_recency()
    }
}
