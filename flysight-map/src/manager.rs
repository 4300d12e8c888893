//! Shared access to tile bytes: memory cache first, then the tile fetcher.

use std::sync::Arc;

use bytes::Bytes;

use crate::cache::MemoryTileCache;
use crate::decoded_image::{DecodedImage, ImageDecoder};
use crate::error::MapError;
use crate::fetcher::TileFetcher;
use crate::map_type::MapType;
use crate::sync::FastRwLock;
use crate::tile_schema::{TileIndex, TileKey};

/// Owner of the memory tile cache and of the tile source. One instance is shared by the
/// controller and all loader threads.
pub struct TileManager {
    memory_cache: FastRwLock<MemoryTileCache>,
    fetcher: Box<dyn TileFetcher>,
    decoder: Box<dyn ImageDecoder>,
}

impl std::fmt::Debug for TileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileManager")
            .field("memory_cache", &self.memory_cache)
            .finish_non_exhaustive()
    }
}

impl TileManager {
    /// Creates a manager with an empty memory cache of the given capacity in bytes.
    pub fn new(
        fetcher: impl TileFetcher + 'static,
        decoder: impl ImageDecoder + 'static,
        memory_cache_capacity: usize,
    ) -> Self {
        Self::from_boxed(Box::new(fetcher), Box::new(decoder), memory_cache_capacity)
    }

    pub(crate) fn from_boxed(
        fetcher: Box<dyn TileFetcher>,
        decoder: Box<dyn ImageDecoder>,
        memory_cache_capacity: usize,
    ) -> Self {
        Self {
            memory_cache: FastRwLock::new(MemoryTileCache::with_capacity(memory_cache_capacity)),
            fetcher,
            decoder,
        }
    }

    /// Memory cache budget in bytes.
    pub fn memory_cache_capacity(&self) -> usize {
        self.memory_cache.read().capacity()
    }

    /// Sets the memory cache budget in bytes and evicts tiles above it.
    pub fn set_memory_cache_capacity(&self, capacity: usize) {
        let mut cache = self.memory_cache.write();
        cache.set_capacity(capacity);
        cache.remove_overloaded();
    }

    /// Bytes currently held in the memory cache.
    pub fn memory_cache_size(&self) -> usize {
        self.memory_cache.read().current_size()
    }

    /// Returns the cached bytes of the tile.
    pub fn get_tile_from_memory_cache(&self, key: &TileKey) -> Option<Bytes> {
        self.memory_cache.read().try_get(key)
    }

    /// Stores tile bytes in the memory cache unless they are already there.
    pub fn add_tile_to_memory_cache(&self, key: TileKey, data: Bytes) -> bool {
        self.memory_cache.write().add(key, data)
    }

    /// Returns the decoded image of a layer tile.
    ///
    /// Looks in the memory cache first and falls back to the fetcher. Downloaded bytes are
    /// put into the memory cache only if they decode.
    pub fn get_image(
        &self,
        map_type: MapType,
        index: TileIndex,
    ) -> Result<Arc<DecodedImage>, MapError> {
        let key = TileKey::new(map_type, index);
        if let Some(data) = self.get_tile_from_memory_cache(&key) {
            if let Some(image) = self.decoder.decode(&data) {
                return Ok(Arc::new(image));
            }

            log::debug!("Cached bytes of {key:?} cannot be decoded, loading again");
        }

        let data = self.fetcher.fetch_tile(map_type, index)?;
        let image = self.decoder.decode(&data).ok_or(MapError::Decoding)?;
        self.add_tile_to_memory_cache(key, data);

        Ok(Arc::new(image))
    }

    /// Evicts the oldest tiles while the memory cache is above its budget.
    pub fn remove_memory_overload(&self) -> usize {
        self.memory_cache.write().remove_overloaded()
    }

    /// Removes all tiles from the memory cache.
    pub fn clear_memory_cache(&self) {
        self.memory_cache.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;

    use super::*;

    fn decoder(bytes: &[u8]) -> Option<DecodedImage> {
        if bytes == b"garbage" {
            return None;
        }
        DecodedImage::from_raw(vec![0; 4], 1, 1).ok()
    }

    fn manager(payload: &'static [u8], calls: Arc<AtomicUsize>) -> TileManager {
        TileManager::new(
            move |_: MapType, _: TileIndex| -> Result<Bytes, MapError> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Bytes::from_static(payload))
            },
            decoder,
            1_000,
        )
    }

    #[test]
    fn second_request_is_served_from_memory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = manager(b"tile", calls.clone());

        manager
            .get_image(MapType::Street, TileIndex::new(1, 2, 3))
            .expect("image");
        manager
            .get_image(MapType::Street, TileIndex::new(1, 2, 3))
            .expect("image");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.memory_cache_size(), 4);
        assert!(manager
            .get_tile_from_memory_cache(&TileKey::new(
                MapType::Street,
                TileIndex::new(1, 2, 3)
            ))
            .is_some());
    }

    #[test]
    fn undecodable_bytes_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = manager(b"garbage", calls.clone());

        assert_matches!(
            manager.get_image(MapType::Street, TileIndex::new(0, 0, 1)),
            Err(MapError::Decoding)
        );
        assert_eq!(manager.memory_cache_size(), 0);
    }

    #[test]
    fn fetch_errors_are_returned() {
        let manager = TileManager::new(
            |_: MapType, _: TileIndex| -> Result<Bytes, MapError> {
                Err(MapError::HttpStatus(404))
            },
            decoder,
            1_000,
        );

        assert_matches!(
            manager.get_image(MapType::Satellite, TileIndex::new(0, 0, 1)),
            Err(MapError::HttpStatus(404))
        );
    }

    #[test]
    fn capacity_change_evicts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = manager(b"tile", calls);
        for x in 0..5 {
            manager
                .get_image(MapType::Street, TileIndex::new(x, 0, 4))
                .expect("image");
        }
        assert_eq!(manager.memory_cache_size(), 20);

        manager.set_memory_cache_capacity(10);
        assert_eq!(manager.memory_cache_capacity(), 10);
        assert_eq!(manager.memory_cache_size(), 8);

        manager.clear_memory_cache();
        assert_eq!(manager.memory_cache_size(), 0);
        assert_eq!(manager.remove_memory_overload(), 0);
    }
}
