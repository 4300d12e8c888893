//! Bounded in-memory store of encoded tile bytes.

use std::collections::{HashMap, VecDeque};

use bytes::Bytes;

use crate::tile_schema::TileKey;

/// Default memory budget of the cache: 22 MiB.
pub const DEFAULT_MEMORY_CACHE_CAPACITY: usize = 22 * 1024 * 1024;

/// Encoded tile images keyed by [`TileKey`] with a byte budget.
///
/// Adding never evicts: the cache may grow above its capacity until
/// [`remove_overloaded`](Self::remove_overloaded) is called, which drops the oldest inserted
/// entries first. The struct itself is not synchronized.
#[derive(Debug)]
pub struct MemoryTileCache {
    entries: HashMap<TileKey, Bytes, ahash::RandomState>,
    insertion_order: VecDeque<TileKey>,
    capacity: usize,
    current_size: usize,
}

impl Default for MemoryTileCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CACHE_CAPACITY)
    }
}

impl MemoryTileCache {
    /// Creates an empty cache with the given budget in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::default(),
            insertion_order: VecDeque::new(),
            capacity,
            current_size: 0,
        }
    }

    /// Returns the cached bytes of the tile.
    pub fn try_get(&self, key: &TileKey) -> Option<Bytes> {
        self.entries.get(key).cloned()
    }

    /// Returns true if the tile is cached.
    pub fn contains(&self, key: &TileKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores the tile bytes unless the key is already present or the data is empty.
    ///
    /// Returns true if the entry was added.
    pub fn add(&mut self, key: TileKey, data: Bytes) -> bool {
        if data.is_empty() || self.entries.contains_key(&key) {
            return false;
        }

        self.current_size += data.len();
        self.entries.insert(key, data);
        self.insertion_order.push_back(key);
        true
    }

    /// Memory budget in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sets the memory budget. Takes effect on the next
    /// [`remove_overloaded`](Self::remove_overloaded).
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Total size of cached bytes.
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evicts the oldest entries while the cache is above its capacity. The last remaining
    /// entry is kept even if it alone exceeds the capacity.
    ///
    /// Returns the number of evicted entries.
    pub fn remove_overloaded(&mut self) -> usize {
        let mut evicted = 0;
        while self.current_size > self.capacity && self.entries.len() > 1 {
            let Some(key) = self.insertion_order.pop_front() else {
                break;
            };

            if let Some(data) = self.entries.remove(&key) {
                self.current_size -= data.len();
                evicted += 1;
            }
        }

        if evicted > 0 {
            log::debug!(
                "Evicted {evicted} tiles from memory cache, {} bytes left",
                self.current_size
            );
        }

        evicted
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
        self.current_size = 0;
    }
}
