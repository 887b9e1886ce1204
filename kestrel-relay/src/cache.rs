//! Fixed-capacity, insertion-ordered caches with stable positions.
//!
//! Both relay endpoints maintain mirrored caches of recently exchanged
//! transactions, and `CACHE_ID` mode addresses entries by their *position*:
//! the count of insertions that happened before them, starting from zero at
//! version negotiation. Positions are monotone and never reused, so an
//! index on the wire stays unambiguous until its entry is evicted or
//! consumed. Eviction is FIFO: inserting into a full cache drops the
//! oldest live entry without disturbing anyone else's position.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A bounded insertion-ordered map from key to value.
///
/// Backed by a monotone position counter, a position-indexed ring of
/// slots (`None` marks a removed entry), and a key-to-position index.
#[derive(Debug)]
pub struct BoundedMap<K, V> {
    capacity: usize,
    /// Position of `slots[0]`.
    front: u64,
    slots: VecDeque<Option<(K, V)>>,
    index: HashMap<K, u64>,
    live: usize,
}

impl<K, V> BoundedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a map that holds at most `capacity` live entries.
    pub fn new(capacity: usize) -> BoundedMap<K, V> {
        assert!(capacity > 0, "bounded caches must have room for one entry");
        BoundedMap {
            capacity,
            front: 0,
            slots: VecDeque::new(),
            index: HashMap::new(),
            live: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the map holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// The position the next insertion will receive.
    pub fn next_position(&self) -> u64 {
        self.front + self.slots.len() as u64
    }

    /// Whether `key` is live in the map.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Insert `key -> value`, evicting the oldest entry if full.
    ///
    /// Returns `false` (and changes nothing) if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.contains(&key) {
            return false;
        }
        if self.live == self.capacity {
            self.evict_oldest();
        }
        let position = self.next_position();
        self.index.insert(key.clone(), position);
        self.slots.push_back(Some((key, value)));
        self.live += 1;
        true
    }

    /// Remove `key`. Returns `false` if it was not live.
    pub fn remove(&mut self, key: &K) -> bool {
        let position = match self.index.remove(key) {
            Some(position) => position,
            None => return false,
        };
        let slot = (position - self.front) as usize;
        self.slots[slot] = None;
        self.live -= 1;
        self.trim_front();
        true
    }

    /// Borrow the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let position = *self.index.get(key)?;
        self.entry_at(position).map(|(_, value)| value)
    }

    /// The position of `key`, if live.
    pub fn position_of(&self, key: &K) -> Option<u64> {
        self.index.get(key).copied()
    }

    /// Borrow the entry at `position`. Evicted, removed, and never-issued
    /// positions are all absent.
    pub fn entry_at(&self, position: u64) -> Option<(&K, &V)> {
        if position < self.front {
            return None;
        }
        let slot = (position - self.front) as usize;
        self.slots
            .get(slot)?
            .as_ref()
            .map(|(key, value)| (key, value))
    }

    /// Remove and return the value at `position`.
    pub fn take_at(&mut self, position: u64) -> Option<V> {
        if position < self.front {
            return None;
        }
        let slot = (position - self.front) as usize;
        let (key, value) = self.slots.get_mut(slot)?.take()?;
        self.index.remove(&key);
        self.live -= 1;
        self.trim_front();
        Some(value)
    }

    /// Drop the oldest live entry. Its position is retired, never reissued.
    fn evict_oldest(&mut self) {
        while let Some(slot) = self.slots.pop_front() {
            self.front += 1;
            if let Some((key, _)) = slot {
                self.index.remove(&key);
                self.live -= 1;
                return;
            }
        }
    }

    /// Shed leading holes so memory stays proportional to `capacity`.
    fn trim_front(&mut self) {
        while matches!(self.slots.front(), Some(None)) {
            self.slots.pop_front();
            self.front += 1;
        }
    }
}

/// A bounded insertion-ordered set with the same position semantics as
/// [`BoundedMap`].
#[derive(Debug)]
pub struct BoundedSet<K>(BoundedMap<K, ()>);

impl<K> BoundedSet<K>
where
    K: Eq + Hash + Clone,
{
    /// Create a set that holds at most `capacity` live keys.
    pub fn new(capacity: usize) -> BoundedSet<K> {
        BoundedSet(BoundedMap::new(capacity))
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no live keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The position the next insertion will receive.
    pub fn next_position(&self) -> u64 {
        self.0.next_position()
    }

    /// Whether `key` is live in the set.
    pub fn contains(&self, key: &K) -> bool {
        self.0.contains(key)
    }

    /// Insert `key`, evicting the oldest key if full. Returns `false` if
    /// already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.0.insert(key, ())
    }

    /// Remove `key`. Returns `false` if it was not live.
    pub fn remove(&mut self, key: &K) -> bool {
        self.0.remove(key)
    }

    /// The position of `key`, if live.
    pub fn position_of(&self, key: &K) -> Option<u64> {
        self.0.position_of(key)
    }

    /// Borrow the key at `position`.
    pub fn get_at(&self, position: u64) -> Option<&K> {
        self.0.entry_at(position).map(|(key, ())| key)
    }
}
