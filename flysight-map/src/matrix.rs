//! Decoded tiles ready for drawing, grouped by zoom level.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::decoded_image::DecodedImage;
use crate::sync::FastRwLock;
use crate::tile_schema::TileIndex;

/// A decoded map tile: one image per layer of the map type, drawn bottom first.
#[derive(Debug)]
pub struct Tile {
    index: TileIndex,
    overlays: Mutex<Vec<Arc<DecodedImage>>>,
}

impl Tile {
    /// Creates a tile without overlays.
    pub fn new(index: TileIndex) -> Self {
        Self {
            index,
            overlays: Mutex::new(Vec::new()),
        }
    }

    /// Index of the tile.
    pub fn index(&self) -> TileIndex {
        self.index
    }

    /// Adds an image on top of the existing ones.
    pub fn add_overlay(&self, image: Arc<DecodedImage>) {
        self.overlays.lock().push(image);
    }

    /// Snapshot of the overlays, bottom first.
    pub fn overlays(&self) -> Vec<Arc<DecodedImage>> {
        self.overlays.lock().clone()
    }

    /// Number of overlays.
    pub fn overlay_count(&self) -> usize {
        self.overlays.lock().len()
    }

    /// Returns true if the tile has anything to draw.
    pub fn has_overlays(&self) -> bool {
        !self.overlays.lock().is_empty()
    }

    /// Removes all overlays.
    pub fn clear(&self) {
        self.overlays.lock().clear();
    }
}

type Level = HashMap<(i32, i32), Arc<Tile>, ahash::RandomState>;

#[derive(Debug, Default)]
struct Levels {
    window: Option<(u32, u32)>,
    tiles: BTreeMap<u32, Level>,
}

impl Levels {
    fn in_window(&self, zoom: u32) -> bool {
        self.window
            .map_or(true, |(min, max)| (min..=max).contains(&zoom))
    }

    fn clear_below(&mut self, zoom: u32) {
        self.tiles = self.tiles.split_off(&zoom);
    }

    fn clear_above(&mut self, zoom: u32) {
        if let Some(next) = zoom.checked_add(1) {
            self.tiles.split_off(&next);
        }
    }
}

/// Decoded tiles by zoom level and position.
///
/// Tiles without overlays are never stored. When a retention window is set, tiles of zoom
/// levels outside of it are refused too. The window and the tiles share one lock, so a tile
/// is checked against the window it is inserted under.
#[derive(Debug, Default)]
pub struct TileMatrix {
    levels: FastRwLock<Levels>,
}

impl TileMatrix {
    /// Creates an empty matrix that accepts tiles of any zoom level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tile at the index.
    pub fn get_tile(&self, index: TileIndex) -> Option<Arc<Tile>> {
        self.levels
            .read()
            .tiles
            .get(&index.z)
            .and_then(|level| level.get(&index.position()))
            .cloned()
    }

    /// Stores the tile, replacing a tile at the same index.
    ///
    /// Returns false and stores nothing if the tile has no overlays or its zoom level is
    /// outside of the retention window.
    pub fn set_tile(&self, tile: Arc<Tile>) -> bool {
        if !tile.has_overlays() {
            return false;
        }

        let z = tile.index().z;
        let mut levels = self.levels.write();
        if !levels.in_window(z) {
            log::debug!("Tile {:?} is outside of the kept zoom levels", tile.index());
            return false;
        }

        levels
            .tiles
            .entry(z)
            .or_default()
            .insert(tile.index().position(), tile);
        true
    }

    /// Removes all levels below `zoom`.
    pub fn clear_levels_below(&self, zoom: u32) {
        self.levels.write().clear_below(zoom);
    }

    /// Removes all levels above `zoom`.
    pub fn clear_levels_above(&self, zoom: u32) {
        self.levels.write().clear_above(zoom);
    }

    /// Removes tiles of the `zoom` level that are not in `keep`.
    pub fn clear_level_and_points_not_in(&self, zoom: u32, keep: &[TileIndex]) {
        let keep: HashSet<(i32, i32)> = keep
            .iter()
            .filter(|index| index.z == zoom)
            .map(TileIndex::position)
            .collect();

        let mut levels = self.levels.write();
        if let Some(level) = levels.tiles.get_mut(&zoom) {
            level.retain(|position, _| keep.contains(position));
            if level.is_empty() {
                levels.tiles.remove(&zoom);
            }
        }
    }

    /// Keeps only the levels in `[zoom - levels, zoom + levels]` and refuses tiles of other
    /// levels until the window is moved again.
    pub fn retain_levels_around(&self, zoom: u32, levels: u32) {
        let min = zoom.saturating_sub(levels);
        let max = zoom.saturating_add(levels);

        let mut guard = self.levels.write();
        guard.window = Some((min, max));
        guard.clear_below(min);
        guard.clear_above(max);
    }

    /// Removes all tiles.
    pub fn clear_all_levels(&self) {
        self.levels.write().tiles.clear();
    }

    /// Total number of stored tiles.
    pub fn len(&self) -> usize {
        self.levels.read().tiles.values().map(HashMap::len).sum()
    }

    /// Returns true if no tiles are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tiles of the zoom level.
    pub fn level_len(&self, zoom: u32) -> usize {
        self.levels.read().tiles.get(&zoom).map_or(0, HashMap::len)
    }

    /// Zoom levels that have tiles, ascending.
    pub fn levels(&self) -> Vec<u32> {
        self.levels.read().tiles.keys().copied().collect()
    }
}
