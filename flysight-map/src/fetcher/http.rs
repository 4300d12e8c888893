//! Tile fetcher that downloads tiles over HTTP.

use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use reqwest::blocking::Client;
use reqwest::header::REFERER;

use crate::config::EngineConfig;
use crate::error::MapError;
use crate::fetcher::{PersistentCacheController, TileFetcher, UrlSource};
use crate::map_type::MapType;
use crate::tile_schema::TileIndex;

/// Ratio between the total request timeout and the connect timeout.
const READ_WRITE_TIMEOUT_FACTOR: u32 = 6;

/// Downloads tiles with a blocking HTTP client, optionally through a persistent cache.
pub struct HttpTileFetcher {
    client: Client,
    url_source: Box<dyn UrlSource>,
    cache: Option<Box<dyn PersistentCacheController<str, Bytes>>>,
    referer: Option<String>,
    offline: AtomicBool,
}

impl std::fmt::Debug for HttpTileFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTileFetcher")
            .field("referer", &self.referer)
            .field("offline", &self.offline)
            .finish_non_exhaustive()
    }
}

impl HttpTileFetcher {
    /// Creates a fetcher. The user agent and the request timeout are taken from the config:
    /// connecting may take `request_timeout`, the whole request six times as long.
    pub fn new(
        url_source: impl UrlSource + 'static,
        config: &EngineConfig,
    ) -> Result<Self, MapError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout * READ_WRITE_TIMEOUT_FACTOR)
            .build()?;

        Ok(Self {
            client,
            url_source: Box::new(url_source),
            cache: None,
            referer: None,
            offline: AtomicBool::new(false),
        })
    }

    /// Stores downloaded tiles in the given cache and reads them back from it before going to
    /// the network.
    pub fn with_cache(
        mut self,
        cache: impl PersistentCacheController<str, Bytes> + 'static,
    ) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Sends the given `Referer` header with every request.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// In offline mode only the persistent cache is used.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Returns true if the network is not used.
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }

    fn download(&self, url: &str) -> Result<Bytes, MapError> {
        let mut request = self.client.get(url);
        if let Some(referer) = &self.referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes()?;
        log::info!("Loaded {} bytes from {url}", bytes.len());

        Ok(bytes)
    }
}

impl TileFetcher for HttpTileFetcher {
    fn fetch_tile(&self, map_type: MapType, index: TileIndex) -> Result<Bytes, MapError> {
        let Some(url) = (self.url_source)(map_type, &index) else {
            return Err(MapError::NotFound);
        };

        if let Some(data) = self.cache.as_ref().and_then(|cache| cache.get(&url)) {
            log::debug!("Tile {url} loaded from the persistent cache");
            return Ok(data);
        }

        if self.is_offline() {
            return Err(MapError::NotFound);
        }

        let data = self.download(&url)?;

        if let Some(cache) = &self.cache {
            if let Err(error) = cache.insert(&url, &data) {
                log::warn!("Failed to write persistent cache entry: {error:?}");
            }
        }

        Ok(data)
    }
}
