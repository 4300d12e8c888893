//! What the map control has to paint for each visible tile.

use std::sync::Arc;

use flysight_map_types::{Point, Rect, Size};

use crate::error::MapError;
use crate::map_core::MapCore;
use crate::matrix::Tile;
use crate::tile_schema::{LoadTask, TileIndex};

/// Text drawn over tiles that failed to load.
pub const EMPTY_TILE_TEXT: &str =
    "We are sorry, but we don't\nhave imagery at this zoom\nlevel for this region.";

/// Content of a tile slot on the screen.
#[derive(Debug, Clone)]
pub enum TileContent {
    /// The tile is loaded. Draw its overlays bottom first.
    Tile(Arc<Tile>),
    /// The tile is not loaded yet, but a tile of a lower zoom level covering it is. Draw the
    /// part of the parent given by [`TileContent::source_rect`], scaled up.
    Substitute {
        /// Loaded tile of a lower zoom level.
        parent: Arc<Tile>,
        /// Number of zoom levels between the parent and the tile.
        levels: u32,
        /// Position of the tile inside the parent, in tiles of the current zoom.
        offset: (u32, u32),
    },
    /// Loading failed. Draw a placeholder with the error and [`EMPTY_TILE_TEXT`].
    Failed(Arc<MapError>),
    /// Nothing to draw yet.
    Empty,
}

impl TileContent {
    /// For a [`TileContent::Substitute`], the part of a parent image of the given size that
    /// covers the tile, as `(x, y, width, height)`.
    pub fn source_rect(
        &self,
        image_width: u32,
        image_height: u32,
    ) -> Option<(u32, u32, u32, u32)> {
        let TileContent::Substitute { levels, offset, .. } = self else {
            return None;
        };

        let scale = 1u32.checked_shl(*levels)?;
        let width = image_width / scale;
        let height = image_height / scale;
        Some((offset.0 * width, offset.1 * height, width, height))
    }
}

/// One tile slot of the view.
#[derive(Debug, Clone)]
pub struct TileDraw {
    /// Index of the tile.
    pub index: TileIndex,
    /// Position of the tile on the screen.
    pub rect: Rect,
    /// What to paint.
    pub content: TileContent,
}

impl MapCore {
    /// Lists what to paint for every tile of the drawing list that intersects the view.
    ///
    /// Missing tiles are substituted by loaded tiles of up to
    /// [`levels_keep_in_memory`](crate::EngineConfig::levels_keep_in_memory) lower zoom
    /// levels.
    pub fn draw_plan(&self) -> Vec<TileDraw> {
        if self.map_type().is_none() {
            return Vec::new();
        }

        let tile_size = self.config().tile_size as i64;
        let offset = self.render_offset();
        let view = Rect::new(Point::ZERO, self.view_size());

        self.drawing_list()
            .iter()
            .filter_map(|index| {
                let rect = Rect::new(
                    Point::new(
                        index.x as i64 * tile_size + offset.x,
                        index.y as i64 * tile_size + offset.y,
                    ),
                    Size::new(tile_size, tile_size),
                );

                if !self.is_rotated() && !rect.intersects(&view) {
                    return None;
                }

                Some(TileDraw {
                    index: *index,
                    rect,
                    content: self.tile_content(*index),
                })
            })
            .collect()
    }

    fn tile_content(&self, index: TileIndex) -> TileContent {
        if let Some(tile) = self.matrix().get_tile(index) {
            return TileContent::Tile(tile);
        }

        let max_levels = self.config().levels_keep_in_memory.min(index.z);
        for levels in 1..=max_levels {
            let Some(parent_index) = index.parent(levels) else {
                break;
            };

            if let Some(parent) = self.matrix().get_tile(parent_index) {
                let scale = 1i64 << levels;
                let offset = (
                    (index.x as i64 - parent_index.x as i64 * scale).unsigned_abs() as u32,
                    (index.y as i64 - parent_index.y as i64 * scale).unsigned_abs() as u32,
                );

                return TileContent::Substitute {
                    parent,
                    levels,
                    offset,
                };
            }
        }

        match self
            .loader()
            .failed_load(&LoadTask::new(self.map_type(), index))
        {
            Some(error) => TileContent::Failed(error),
            None => TileContent::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bytes::Bytes;
    use flysight_map_types::LatLng;

    use super::*;
    use crate::config::EngineConfig;
    use crate::decoded_image::DecodedImage;
    use crate::loader::tests::{test_config, test_image, RecordingMessenger};
    use crate::manager::TileManager;
    use crate::map_type::MapType;

    fn core_with_pool(pool_size: usize, messenger: Arc<RecordingMessenger>) -> MapCore {
        let manager = Arc::new(TileManager::new(
            |_: MapType, _: TileIndex| -> Result<Bytes, MapError> { Err(MapError::NotFound) },
            test_image,
            1_000,
        ));
        let mut core = MapCore::new(
            manager,
            EngineConfig {
                shuffle_tiles_on_load: false,
                ..test_config(pool_size)
            },
            Some(messenger),
        );
        core.on_map_size_changed(800, 600);
        core.set_map_type(MapType::Street);
        core.set_zoom(10);
        core.set_position(LatLng::new(0.0, 0.0));
        core.start_system();
        core
    }

    fn core() -> MapCore {
        core_with_pool(0, Arc::new(RecordingMessenger::default()))
    }

    fn loaded(index: TileIndex) -> Arc<Tile> {
        let tile = Tile::new(index);
        tile.add_overlay(Arc::new(
            DecodedImage::from_raw(vec![0; 4], 1, 1).expect("image"),
        ));
        Arc::new(tile)
    }

    #[test]
    fn plan_covers_visible_tiles() {
        let core = core();
        let plan = core.draw_plan();

        // of the 5x5 loaded tiles, the last column and row are outside of the view
        assert_eq!(plan.len(), 16);
        assert!(plan.iter().all(|d| matches!(d.content, TileContent::Empty)));

        let center = plan
            .iter()
            .find(|d| d.index == TileIndex::new(512, 512, 10))
            .expect("center tile");
        assert_eq!(center.rect.origin, Point::new(400, 300));
        assert_eq!(center.rect.size.width(), 256);
    }

    #[test]
    fn loaded_and_substituted_tiles() {
        let core = core();
        core.matrix().set_tile(loaded(TileIndex::new(512, 512, 10)));
        core.matrix().set_tile(loaded(TileIndex::new(127, 128, 8)));

        let plan = core.draw_plan();
        let content = |x, y| {
            plan.iter()
                .find(|d| d.index == TileIndex::new(x, y, 10))
                .map(|d| d.content.clone())
                .expect("planned tile")
        };

        assert_matches!(content(512, 512), TileContent::Tile(_));
        let substitute = content(511, 513);
        assert_matches!(
            substitute,
            TileContent::Substitute {
                levels: 2,
                offset: (3, 1),
                ..
            }
        );
        assert_eq!(substitute.source_rect(256, 256), Some((192, 64, 64, 64)));
        assert_matches!(content(513, 512), TileContent::Empty);
    }

    #[test]
    fn world_tile_substitutes_missing_tiles() {
        let manager = Arc::new(TileManager::new(
            |_: MapType, _: TileIndex| -> Result<Bytes, MapError> { Err(MapError::NotFound) },
            test_image,
            1_000,
        ));
        let mut core = MapCore::new(
            manager,
            EngineConfig {
                shuffle_tiles_on_load: false,
                ..test_config(0)
            },
            None,
        );
        core.on_map_size_changed(800, 600);
        core.set_map_type(MapType::Street);
        core.start_system();
        assert_eq!(core.zoom(), 2);

        core.matrix().set_tile(loaded(TileIndex::new(0, 0, 0)));
        let plan = core.draw_plan();
        let tile = plan
            .iter()
            .find(|d| d.index == TileIndex::new(3, 1, 2))
            .expect("planned tile");

        assert_matches!(
            tile.content,
            TileContent::Substitute {
                levels: 2,
                offset: (3, 1),
                ..
            }
        );
    }

    #[test]
    fn failed_tiles_get_placeholder() {
        let messenger = Arc::new(RecordingMessenger::default());
        let core = core_with_pool(1, messenger.clone());
        messenger.wait_for_completed(1);

        let plan = core.draw_plan();
        assert_eq!(plan.len(), 16);
        assert!(plan.iter().all(|d| matches!(
            &d.content,
            TileContent::Failed(error) if matches!(**error, MapError::NotFound)
        )));
        assert!(EMPTY_TILE_TEXT.contains("imagery"));
    }

    #[test]
    fn nothing_to_draw_without_map_type() {
        let mut core = core();
        core.set_map_type(MapType::None);
        assert!(core.draw_plan().is_empty());
    }
}
