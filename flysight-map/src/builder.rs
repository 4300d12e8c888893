//! Construction of the tile engine from a tile source and options.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use flysight_map_types::MercatorProjection;

use crate::config::EngineConfig;
use crate::decoded_image::ImageDecoder;
use crate::error::MapError;
use crate::fetcher::file_cache::FileCachePathModifier;
use crate::fetcher::{FileCacheController, PersistentCacheController, TileFetcher, UrlSource};
use crate::manager::TileManager;
use crate::map_core::MapCore;
use crate::messenger::Messenger;

/// Constructor of the tile engine: the shared [`TileManager`] and the [`MapCore`] using it.
///
/// ```no_run
/// use flysight_map::{MapType, TileEngineBuilder};
/// use flysight_map::fetcher::url_template;
///
/// let (_manager, mut core) = TileEngineBuilder::new_rest(url_template(
///     MapType::Street,
///     "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
/// ))
/// .with_file_cache("target/tiles")
/// .build()?;
///
/// core.on_map_size_changed(800, 600);
/// core.set_map_type(MapType::Street);
/// core.start_system();
/// # Ok::<(), flysight_map::MapError>(())
/// ```
pub struct TileEngineBuilder {
    source: SourceType,
    config: EngineConfig,
    decoder: Option<Box<dyn ImageDecoder>>,
    messenger: Option<Arc<dyn Messenger>>,
    cache: CacheType,
    offline_mode: bool,
    referer: Option<String>,
}

enum SourceType {
    Rest(Box<dyn UrlSource>),
    Custom(Box<dyn TileFetcher>),
}

enum CacheType {
    None,
    File(PathBuf, Option<Box<FileCachePathModifier>>),
    Custom(Box<dyn PersistentCacheController<str, Bytes>>),
}

impl TileEngineBuilder {
    /// Initializes a builder for an engine that downloads tiles from the urls given by the url
    /// source.
    pub fn new_rest(url_source: impl UrlSource + 'static) -> Self {
        Self::with_source(SourceType::Rest(Box::new(url_source)))
    }

    /// Initializes a builder for an engine that loads tiles with the given fetcher.
    pub fn new_with_fetcher(fetcher: impl TileFetcher + 'static) -> Self {
        Self::with_source(SourceType::Custom(Box::new(fetcher)))
    }

    fn with_source(source: SourceType) -> Self {
        Self {
            source,
            config: EngineConfig::default(),
            decoder: None,
            messenger: None,
            cache: CacheType::None,
            offline_mode: false,
            referer: None,
        }
    }

    /// Sets the engine parameters. Defaults to [`EngineConfig::default()`].
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Stores downloaded tiles in the given folder. The folder is created if it doesn't exist;
    /// building fails if that is not possible.
    ///
    /// Cannot be used with a custom fetcher. Replaces the value set by
    /// [`with_cache_controller`](Self::with_cache_controller).
    pub fn with_file_cache(mut self, path: impl AsRef<Path>) -> Self {
        self.cache = CacheType::File(path.as_ref().into(), None);
        self
    }

    /// Same as [`with_file_cache`](Self::with_file_cache), but the file path of every tile is
    /// modified by the given function.
    pub fn with_file_cache_modifier(
        mut self,
        path: impl AsRef<Path>,
        modifier: Box<FileCachePathModifier>,
    ) -> Self {
        self.cache = CacheType::File(path.as_ref().into(), Some(modifier));
        self
    }

    /// Stores downloaded tiles in the given persistent cache.
    ///
    /// Cannot be used with a custom fetcher. Replaces the value set by
    /// [`with_file_cache`](Self::with_file_cache).
    pub fn with_cache_controller(
        mut self,
        cache: impl PersistentCacheController<str, Bytes> + 'static,
    ) -> Self {
        self.cache = CacheType::Custom(Box::new(cache));
        self
    }

    /// Only use cached tiles and never go to the network. Requires a cache.
    pub fn with_offline_mode(mut self) -> Self {
        self.offline_mode = true;
        self
    }

    /// Sends the `Referer` header with tile requests.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Sets the decoder of tile images. Defaults to
    /// [`RasterImageDecoder`](crate::decoded_image::RasterImageDecoder) when the `image` feature
    /// is enabled; without it a decoder must be set.
    pub fn with_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Sets the receiver of the map events.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Arc::new(messenger));
        self
    }

    /// Consumes the builder and constructs the engine.
    ///
    /// Fails if the config is invalid, the options contradict each other or the cache cannot
    /// be initialized.
    pub fn build(self) -> Result<(Arc<TileManager>, MapCore), MapError> {
        let Self {
            source,
            config,
            decoder,
            messenger,
            cache,
            offline_mode,
            referer,
        } = self;

        validate_config(&config)?;

        let cache_controller: Option<Box<dyn PersistentCacheController<str, Bytes>>> =
            match cache {
                CacheType::None => None,
                CacheType::File(path, modifier) => {
                    Some(Box::new(FileCacheController::new(&path, modifier)?))
                }
                CacheType::Custom(controller) => Some(controller),
            };

        if cache_controller.is_none() && offline_mode {
            return Err(MapError::Configuration(
                "offline mode cannot be used without cache".into(),
            ));
        }

        let fetcher: Box<dyn TileFetcher> = match source {
            SourceType::Rest(url_source) => {
                rest_fetcher(url_source, &config, cache_controller, offline_mode, referer)?
            }
            SourceType::Custom(fetcher) => {
                if cache_controller.is_some() {
                    return Err(MapError::Configuration(
                        "custom tile fetcher cannot be used together with a cache controller"
                            .into(),
                    ));
                }

                fetcher
            }
        };

        let decoder = match decoder {
            Some(decoder) => decoder,
            None => default_decoder()?,
        };

        let manager = Arc::new(TileManager::from_boxed(
            fetcher,
            decoder,
            config.memory_cache_capacity,
        ));
        let core = MapCore::new(manager.clone(), config, messenger);

        Ok((manager, core))
    }
}

fn validate_config(config: &EngineConfig) -> Result<(), MapError> {
    if config.tile_size == 0 {
        return Err(MapError::Configuration("tile size must be positive".into()));
    }

    if config.min_zoom > config.max_zoom {
        return Err(MapError::Configuration(format!(
            "min zoom {} is larger than max zoom {}",
            config.min_zoom, config.max_zoom
        )));
    }

    if config.worker_pool_size == 0 {
        return Err(MapError::Configuration(
            "at least one tile loader thread is required".into(),
        ));
    }

    MercatorProjection::validate_zoom(config.max_zoom)?;
    Ok(())
}

#[cfg(feature = "http")]
fn rest_fetcher(
    url_source: Box<dyn UrlSource>,
    config: &EngineConfig,
    cache: Option<Box<dyn PersistentCacheController<str, Bytes>>>,
    offline_mode: bool,
    referer: Option<String>,
) -> Result<Box<dyn TileFetcher>, MapError> {
    let mut fetcher = crate::fetcher::HttpTileFetcher::new(url_source, config)?;
    if let Some(cache) = cache {
        fetcher = fetcher.with_cache(cache);
    }
    if let Some(referer) = referer {
        fetcher = fetcher.with_referer(referer);
    }
    fetcher.set_offline(offline_mode);

    Ok(Box::new(fetcher))
}

#[cfg(not(feature = "http"))]
fn rest_fetcher(
    _url_source: Box<dyn UrlSource>,
    _config: &EngineConfig,
    _cache: Option<Box<dyn PersistentCacheController<str, Bytes>>>,
    _offline_mode: bool,
    _referer: Option<String>,
) -> Result<Box<dyn TileFetcher>, MapError> {
    Err(MapError::Configuration(
        "downloading tiles requires the `http` feature".into(),
    ))
}

#[cfg(feature = "image")]
fn default_decoder() -> Result<Box<dyn ImageDecoder>, MapError> {
    Ok(Box::new(crate::decoded_image::RasterImageDecoder))
}

#[cfg(not(feature = "image"))]
fn default_decoder() -> Result<Box<dyn ImageDecoder>, MapError> {
    Err(MapError::Configuration(
        "no image decoder set and the `image` feature is disabled".into(),
    ))
}
