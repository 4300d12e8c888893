//! Tile addressing: [`TileIndex`], the cache key [`TileKey`], the load queue item [`LoadTask`]
//! and enumeration of the tiles around the view center.

use flysight_map_types::{Point, Projection, Size};
use serde::{Deserialize, Serialize};

use crate::map_type::MapType;

/// Tile index.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: u32,
}

impl TileIndex {
    /// Create a new index instance.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Position of the tile inside its zoom level.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Index of the tile `levels` zoom levels above that covers this tile. `None` if that
    /// would go above zoom 0.
    pub fn parent(&self, levels: u32) -> Option<TileIndex> {
        let z = self.z.checked_sub(levels)?;
        let scale = 1i32.checked_shl(levels)?;
        Some(TileIndex::new(
            self.x.div_euclid(scale),
            self.y.div_euclid(scale),
            z,
        ))
    }
}

/// Key of the raw tile bytes in the memory cache.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct TileKey {
    /// Layer the bytes belong to.
    pub map_type: MapType,
    /// Tile index.
    pub index: TileIndex,
}

impl TileKey {
    /// Creates a new key.
    pub fn new(map_type: MapType, index: TileIndex) -> Self {
        Self { map_type, index }
    }
}

/// Request to load one tile of the map type that was active when the request was created.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct LoadTask {
    /// Map type to load; composite types load all their layers.
    pub map_type: MapType,
    /// Tile index.
    pub index: TileIndex,
}

impl LoadTask {
    /// Creates a new task.
    pub fn new(map_type: MapType, index: TileIndex) -> Self {
        Self { map_type, index }
    }
}

/// Valid tile coordinates of one zoom level, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileBounds {
    /// Smallest tile coordinate.
    pub min: Point,
    /// Largest tile coordinate.
    pub max: Point,
}

impl TileBounds {
    /// Tile bounds of `zoom` according to the projection.
    pub fn for_zoom(projection: &dyn Projection, zoom: u32) -> Self {
        Self {
            min: projection.tile_matrix_min_xy(zoom),
            max: projection.tile_matrix_max_xy(zoom),
        }
    }

    /// Returns true if the tile coordinate is inside the bounds.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.min.x && y >= self.min.y && x <= self.max.x && y <= self.max.y
    }
}

/// Number of tiles to load on each side of the center tile so that the whole view is covered.
///
/// A rotated view uses the diagonal for both directions, so the corners stay covered at any
/// bearing.
pub fn tile_area_radius(view_size: Size, tile_size: Size, rotated: bool) -> Size {
    if tile_size.is_zero() {
        return Size::new(1, 1);
    }

    if rotated {
        let width = view_size.width() as f64;
        let height = view_size.height() as f64;
        let diagonal = ((width * width + height * height).sqrt() / tile_size.width() as f64)
            .round() as i64;
        Size::new(1 + diagonal / 2, 1 + diagonal / 2)
    } else {
        Size::new(
            1 + (view_size.width() / tile_size.width()) / 2,
            1 + (view_size.height() / tile_size.height()) / 2,
        )
    }
}

/// Tiles in the `[-radius, radius]` rectangle around `center` that are inside `bounds`.
///
/// Tiles are listed column by column, every tile at most once.
pub fn tiles_around(center: Point, radius: Size, bounds: TileBounds, zoom: u32) -> Vec<TileIndex> {
    let mut tiles = Vec::new();
    for i in -radius.width()..=radius.width() {
        for j in -radius.height()..=radius.height() {
            let x = center.x + i;
            let y = center.y + j;

            if bounds.contains(x, y) {
                tiles.push(TileIndex::new(x as i32, y as i32, zoom));
            }
        }
    }

    tiles
}
