//! Tunable parameters of the tile engine.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::cache::DEFAULT_MEMORY_CACHE_CAPACITY;

/// Parameters of the tile engine. Durations are (de)serialized as milliseconds; missing fields
/// take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Budget of the memory tile cache in bytes.
    pub memory_cache_capacity: usize,
    /// Number of zoom levels above and below the current one kept in the tile matrix.
    pub levels_keep_in_memory: u32,
    /// Additional attempts after a failed layer load.
    pub retry_load_tile: u32,
    /// Pause between two attempts to load a layer.
    #[serde(with = "duration_ms")]
    pub retry_delay: Duration,
    /// Number of tile loader threads.
    pub worker_pool_size: usize,
    /// Load visible tiles in random order instead of column by column.
    pub shuffle_tiles_on_load: bool,
    /// Connect timeout of tile requests. The whole request may take six times as long.
    #[serde(with = "duration_ms")]
    pub request_timeout: Duration,
    /// Time an idle loader thread waits for work before it exits.
    #[serde(with = "duration_ms")]
    pub worker_idle_timeout: Duration,
    /// Minimum time between two redraw requests while tiles are loading.
    #[serde(with = "duration_ms")]
    pub invalidation_interval: Duration,
    /// Tile edge in pixels.
    pub tile_size: u32,
    /// Smallest zoom level the map can show.
    pub min_zoom: u32,
    /// Largest zoom level the map can show.
    pub max_zoom: u32,
    /// User agent of tile requests.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_cache_capacity: DEFAULT_MEMORY_CACHE_CAPACITY,
            levels_keep_in_memory: 5,
            retry_load_tile: 0,
            retry_delay: Duration::from_millis(1111),
            worker_pool_size: 5,
            shuffle_tiles_on_load: true,
            request_timeout: Duration::from_secs(30),
            worker_idle_timeout: Duration::from_secs(300),
            invalidation_interval: Duration::from_millis(111),
            tile_size: 256,
            min_zoom: 2,
            max_zoom: 17,
            user_agent: format!("flysight-map/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.memory_cache_capacity, 23_068_672);
        assert_eq!(config.levels_keep_in_memory, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(1111));
        assert_eq!(config.worker_pool_size, 5);
        assert_eq!((config.min_zoom, config.max_zoom), (2, 17));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "retry_load_tile": 2, "retry_delay": 50, "shuffle_tiles_on_load": false }"#,
        )
        .expect("valid config");

        assert_eq!(config.retry_load_tile, 2);
        assert_eq!(config.retry_delay, Duration::from_millis(50));
        assert!(!config.shuffle_tiles_on_load);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.tile_size, 256);
    }

    #[test]
    fn durations_are_milliseconds() {
        let json = serde_json::to_value(EngineConfig::default()).expect("serializable");
        assert_eq!(json["invalidation_interval"], 111);
        assert_eq!(json["worker_idle_timeout"], 300_000);
    }
}
