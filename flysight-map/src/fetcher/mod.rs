//! Boundary between the tile loader and the source of encoded tile bytes.

use bytes::Bytes;

use crate::error::MapError;
use crate::map_type::MapType;
use crate::tile_schema::TileIndex;

pub mod file_cache;
#[cfg(feature = "http")]
pub mod http;

pub use file_cache::FileCacheController;
#[cfg(feature = "http")]
pub use http::HttpTileFetcher;

/// Source of encoded tile images.
///
/// Called from the tile loader threads; a call may block for as long as the download takes.
pub trait TileFetcher: Send + Sync {
    /// Loads encoded bytes of one layer tile.
    fn fetch_tile(&self, map_type: MapType, index: TileIndex) -> Result<Bytes, MapError>;
}

impl<F> TileFetcher for F
where
    F: Fn(MapType, TileIndex) -> Result<Bytes, MapError> + Send + Sync,
{
    fn fetch_tile(&self, map_type: MapType, index: TileIndex) -> Result<Bytes, MapError> {
        self(map_type, index)
    }
}

/// Function to get the url of a layer tile. `None` means the layer has no source.
pub trait UrlSource: (Fn(MapType, &TileIndex) -> Option<String>) + Send + Sync {}
impl<T> UrlSource for T where T: Fn(MapType, &TileIndex) -> Option<String> + Send + Sync {}

/// Persistent storage of downloaded data, consulted before the network.
pub trait PersistentCacheController<Key: ?Sized, Data>: Send + Sync {
    /// Returns the stored data.
    fn get(&self, key: &Key) -> Option<Data>;
    /// Stores the data.
    fn insert(&self, key: &Key, data: &Data) -> Result<(), MapError>;
}

impl<Key: ?Sized, Data> PersistentCacheController<Key, Data>
    for Box<dyn PersistentCacheController<Key, Data>>
{
    fn get(&self, key: &Key) -> Option<Data> {
        (**self).get(key)
    }

    fn insert(&self, key: &Key, data: &Data) -> Result<(), MapError> {
        (**self).insert(key, data)
    }
}

/// Builds a [`UrlSource`] from a template with `{x}`, `{y}` and `{z}` placeholders. Tiles
/// of other map types than `map_type` have no url.
pub fn url_template(map_type: MapType, template: impl Into<String>) -> impl UrlSource {
    let template = template.into();
    move |requested: MapType, index: &TileIndex| {
        (requested == map_type).then(|| {
            template
                .replace("{x}", &index.x.to_string())
                .replace("{y}", &index.y.to_string())
                .replace("{z}", &index.z.to_string())
        })
    }
}
