use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::debug;

use crate::error::MapError;
use crate::fetcher::PersistentCacheController;

/// Function to modify the default file path of a cached tile.
pub type FileCachePathModifier = dyn Fn(&str) -> String + Send + Sync;

/// Modifier that drops the query string from the file path.
/// Can be used as a [`FileCachePathModifier`].
pub fn remove_parameters_modifier(path: &str) -> String {
    path.split('?').next().unwrap_or(path).to_owned()
}

/// Keeps downloaded tiles as files in a folder, one file per tile url.
///
/// Tiles are never evicted from disk.
pub struct FileCacheController {
    folder_path: PathBuf,
    file_path_modifier: Option<Box<FileCachePathModifier>>,
}

impl std::fmt::Debug for FileCacheController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCacheController")
            .field("folder_path", &self.folder_path)
            .finish_non_exhaustive()
    }
}

impl PersistentCacheController<str, Bytes> for FileCacheController {
    fn get(&self, url: &str) -> Option<Bytes> {
        std::fs::read(self.file_path(url)).ok().map(Bytes::from)
    }

    fn insert(&self, url: &str, data: &Bytes) -> Result<(), MapError> {
        let file_path = self.file_path(url);
        let Some(folder) = file_path.parent() else {
            return Err(MapError::FsIo(format!(
                "no parent folder for cache file {file_path:?}"
            )));
        };

        std::fs::create_dir_all(folder).map_err(|err| {
            MapError::FsIo(format!("failed to create cache folder {folder:?}: {err}"))
        })?;
        std::fs::write(&file_path, data)?;
        debug!("Tile {url} saved to cache file {file_path:?}");

        Ok(())
    }
}

impl FileCacheController {
    /// Creates a cache in the given folder, creating the folder if needed. Each tile is
    /// stored under a nested path built from its url without the scheme; the path can be
    /// altered with `file_path_modifier`.
    pub fn new(
        path: impl AsRef<Path>,
        file_path_modifier: Option<Box<FileCachePathModifier>>,
    ) -> Result<Self, MapError> {
        std::fs::create_dir_all(path.as_ref()).map_err(|err| {
            MapError::FsIo(format!(
                "failed to initialize file cache folder {:?}: {err}",
                path.as_ref()
            ))
        })?;

        Ok(Self {
            folder_path: path.as_ref().into(),
            file_path_modifier,
        })
    }

    fn file_path(&self, url: &str) -> PathBuf {
        let stripped = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .unwrap_or(url);

        match &self.file_path_modifier {
            Some(modifier) => self.folder_path.join(modifier(stripped)),
            None => self.folder_path.join(stripped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_folder(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "flysight-map-cache-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        path
    }

    #[test]
    fn stores_and_reads_tiles() {
        let folder = temp_folder("roundtrip");
        let cache = FileCacheController::new(&folder, None).expect("cache folder");
        let url = "https://tiles.test/3/1/2.png";

        assert!(cache.get(url).is_none());
        cache
            .insert(url, &Bytes::from_static(b"png"))
            .expect("write cache");
        assert_eq!(cache.get(url), Some(Bytes::from_static(b"png")));
        assert!(folder.join("tiles.test/3/1/2.png").exists());

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[test]
    fn modifier_drops_query() {
        let folder = temp_folder("modifier");
        let cache =
            FileCacheController::new(&folder, Some(Box::new(remove_parameters_modifier)))
                .expect("cache folder");

        cache
            .insert("http://tiles.test/1/0/0.png?key=abc", &Bytes::from_static(b"a"))
            .expect("write cache");
        assert!(folder.join("tiles.test/1/0/0.png").exists());
        assert_eq!(
            cache.get("http://tiles.test/1/0/0.png?key=other"),
            Some(Bytes::from_static(b"a"))
        );

        let _ = std::fs::remove_dir_all(&folder);
    }
}
