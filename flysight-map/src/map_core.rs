//! Viewport controller of the map.

use std::sync::Arc;

use flysight_map_types::{LatLng, MercatorProjection, Point, Projection, RectLatLng, Size};
use rand::seq::SliceRandom;

use crate::config::EngineConfig;
use crate::error::MapError;
use crate::loader::TileLoader;
use crate::manager::TileManager;
use crate::map_type::MapType;
use crate::matrix::TileMatrix;
use crate::messenger::Messenger;
use crate::tile_schema::{tile_area_radius, tiles_around, TileBounds, TileIndex};

/// Extra pixels a rectangle may exceed the view by and still be considered fitting.
const FIT_TOLERANCE: i64 = 10;

/// Keeps the state of the map view (position, zoom, size, drag offset and map type) and
/// decides which tiles have to be loaded for it.
///
/// All methods are meant to be called from the UI thread. Loading happens on the threads of
/// the [`TileLoader`], which reports back through the [`Messenger`].
pub struct MapCore {
    config: EngineConfig,
    projection: MercatorProjection,
    loader: TileLoader,
    messenger: Option<Arc<dyn Messenger>>,

    position: LatLng,
    position_pixel: Point,
    zoom: u32,
    map_type: MapType,
    bearing: f64,

    view_size: Size,
    area_radius: Size,
    tile_bounds: TileBounds,
    render_offset: Point,
    drag_point: Point,
    center_tile: Point,
    last_center_tile: Option<Point>,
    drawing_list: Vec<TileIndex>,

    started: bool,
    dragging: bool,
}

impl std::fmt::Debug for MapCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCore")
            .field("position", &self.position)
            .field("zoom", &self.zoom)
            .field("map_type", &self.map_type)
            .field("view_size", &self.view_size)
            .field("render_offset", &self.render_offset)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl MapCore {
    /// Creates a stopped controller at zero position and minimal zoom. Prefer
    /// [`TileEngineBuilder`](crate::TileEngineBuilder), which also validates the config.
    pub fn new(
        manager: Arc<TileManager>,
        config: EngineConfig,
        messenger: Option<Arc<dyn Messenger>>,
    ) -> Self {
        let projection = MercatorProjection::new(config.tile_size);
        let loader = TileLoader::new(manager, Arc::new(TileMatrix::new()), &config);
        if let Some(messenger) = &messenger {
            loader.set_messenger(messenger.clone());
        }

        let zoom = config.min_zoom;
        let position = LatLng::default();
        let view_size = Size::default();

        Self {
            area_radius: tile_area_radius(view_size, projection.tile_size(), false),
            tile_bounds: TileBounds::for_zoom(&projection, zoom),
            position_pixel: projection.from_latlng_to_pixel(position, zoom),
            config,
            projection,
            loader,
            messenger,
            position,
            zoom,
            map_type: MapType::None,
            bearing: 0.0,
            view_size,
            render_offset: Point::ZERO,
            drag_point: Point::ZERO,
            center_tile: Point::ZERO,
            last_center_tile: None,
            drawing_list: Vec::new(),
            started: false,
            dragging: false,
        }
    }

    /// Starts loading tiles for the current view.
    pub fn start_system(&mut self) {
        if !self.started {
            self.started = true;
            self.loader.start();
            self.go_to_current_position();
        }
    }

    /// Stops loading and drops all loaded tiles. The core can be started again with
    /// [`start_system`](Self::start_system).
    pub fn on_map_close(&mut self) {
        self.cancel_async_tasks();
        self.started = false;
        self.loader.shutdown();
        self.loader.matrix().clear_all_levels();
        self.loader.clear_failed_loads();
    }

    /// Drops all loaded tiles and loads the view again.
    pub fn reload_map(&mut self) -> Result<(), MapError> {
        if !self.started {
            return Err(MapError::NotStarted);
        }

        log::debug!("Reloading map");
        self.loader.clear();
        self.loader.matrix().clear_all_levels();
        self.loader.clear_failed_loads();

        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }

        self.update_bounds();
        Ok(())
    }

    /// Drops queued tile loads.
    pub fn cancel_async_tasks(&self) {
        if self.started {
            self.loader.clear();
        }
    }

    /// Current zoom level.
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Smallest zoom level.
    pub fn min_zoom(&self) -> u32 {
        self.config.min_zoom
    }

    /// Largest zoom level.
    pub fn max_zoom(&self) -> u32 {
        self.config.max_zoom
    }

    /// Changes the zoom level. The value is clamped to the zoom range; the call is ignored while
    /// the map is being dragged.
    pub fn set_zoom(&mut self, zoom: u32) {
        let zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        if zoom == self.zoom || self.dragging {
            return;
        }

        self.zoom = zoom;
        self.tile_bounds = TileBounds::for_zoom(&self.projection, zoom);
        self.position_pixel = self.projection.from_latlng_to_pixel(self.position, zoom);

        if self.started {
            self.loader.clear();
            self.loader
                .matrix()
                .retain_levels_around(zoom, self.config.levels_keep_in_memory);
            self.loader.clear_failed_loads();

            self.go_to_current_position_on_zoom();
            self.update_bounds();

            if let Some(messenger) = &self.messenger {
                messenger.zoom_changed(zoom);
            }
        }
    }

    /// Position at the center of the map.
    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Moves the map so that `position` is in the center. While dragging only the stored
    /// position changes.
    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
        self.position_pixel = self.projection.from_latlng_to_pixel(position, self.zoom);

        if self.started {
            if !self.dragging {
                self.go_to_current_position();
            }

            if let Some(messenger) = &self.messenger {
                messenger.position_changed(position);
            }
        }
    }

    /// Current map type.
    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    /// Switches the map type and reloads all tiles.
    pub fn set_map_type(&mut self, map_type: MapType) {
        if map_type == self.map_type && !map_type.is_none() {
            return;
        }

        self.map_type = map_type;
        self.tile_bounds = TileBounds::for_zoom(&self.projection, self.zoom);
        self.position_pixel = self.projection.from_latlng_to_pixel(self.position, self.zoom);

        if self.started {
            self.cancel_async_tasks();
            self.update_area_radius();
            self.update_center_tile();

            if let Err(err) = self.reload_map() {
                log::warn!("Failed to reload map: {err}");
            }

            if let Some(messenger) = &self.messenger {
                messenger.map_type_changed(map_type);
            }
        }
    }

    /// Size of the map control in pixels.
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Must be called when the map control is resized.
    pub fn on_map_size_changed(&mut self, width: u32, height: u32) {
        self.view_size = Size::new(width as i64, height as i64);
        self.update_area_radius();
        log::debug!(
            "Map size changed to {width}x{height}, tile radius {:?}",
            self.area_radius
        );

        self.update_center_tile();

        if self.started {
            self.update_bounds();

            if let Some(messenger) = &self.messenger {
                messenger.position_changed(self.position);
            }
        }
    }

    /// Rotation of the map in degrees.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Sets the rotation of the map in degrees. A rotated map loads enough tiles to cover the
    /// view at any angle.
    pub fn set_bearing(&mut self, bearing: f64) {
        let bearing = bearing.rem_euclid(360.0);
        let was_rotated = self.is_rotated();
        self.bearing = bearing;

        if was_rotated != self.is_rotated() {
            self.update_area_radius();
            if self.started {
                self.update_bounds();
            }
        }
    }

    /// Returns true if the map has a non-zero bearing.
    pub fn is_rotated(&self) -> bool {
        self.bearing != 0.0
    }

    /// Number of tiles loaded on each side of the center tile.
    pub fn tile_area_radius(&self) -> Size {
        self.area_radius
    }

    /// Tile in the center of the view.
    pub fn center_tile(&self) -> TileIndex {
        TileIndex::new(self.center_tile.x as i32, self.center_tile.y as i32, self.zoom)
    }

    /// Offset of the global pixel grid of the zoom level relative to the view.
    pub fn render_offset(&self) -> Point {
        self.render_offset
    }

    /// Returns true if the core is loading tiles.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns true between [`begin_drag`](Self::begin_drag) and [`end_drag`](Self::end_drag).
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Engine parameters.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Loader of the map tiles.
    pub fn loader(&self) -> &TileLoader {
        &self.loader
    }

    /// Loaded tiles.
    pub fn matrix(&self) -> &Arc<TileMatrix> {
        self.loader.matrix()
    }

    /// Tiles currently shown by the map, as last sent for loading.
    pub fn drawing_list(&self) -> &[TileIndex] {
        &self.drawing_list
    }

    /// Tiles around the center tile that cover the view, clipped to the valid tiles of the
    /// zoom level.
    pub fn visible_tiles(&self) -> Vec<TileIndex> {
        let mut tiles = tiles_around(
            self.center_tile,
            self.area_radius,
            self.tile_bounds,
            self.zoom,
        );

        if self.config.shuffle_tiles_on_load {
            tiles.shuffle(&mut rand::thread_rng());
        }

        tiles
    }

    /// Largest zoom level at which the whole rectangle fits into the view.
    pub fn max_zoom_to_fit_rect(&self, rect: &RectLatLng) -> u32 {
        let mut fitting = self.config.min_zoom;
        for zoom in self.config.min_zoom..=self.config.max_zoom {
            let top_left = self.projection.from_latlng_to_pixel(rect.top_left(), zoom);
            let bottom_right = self
                .projection
                .from_latlng_to_pixel(rect.bottom_right(), zoom);

            if bottom_right.x - top_left.x <= self.view_size.width() + FIT_TOLERANCE
                && bottom_right.y - top_left.y <= self.view_size.height() + FIT_TOLERANCE
            {
                fitting = zoom;
            } else {
                break;
            }
        }

        fitting
    }

    /// Centers the map on the rectangle and zooms in as far as it still fits.
    ///
    /// Returns false if no zoom level was found.
    pub fn set_zoom_to_fit_rect(&mut self, rect: &RectLatLng) -> bool {
        let zoom = self.max_zoom_to_fit_rect(rect);
        if zoom == 0 {
            return false;
        }

        self.set_position(rect.center());
        self.set_zoom(zoom.min(self.config.max_zoom));
        true
    }

    /// Starts dragging the map from the `point` of the view.
    pub fn begin_drag(&mut self, point: Point) {
        self.drag_point = point - self.render_offset;
        self.dragging = true;
    }

    /// Moves the map so that the point given to [`begin_drag`](Self::begin_drag) is under
    /// `point`.
    pub fn drag(&mut self, point: Point) {
        self.render_offset = point - self.drag_point;
        self.on_render_offset_changed();

        if self.dragging {
            self.update_position_from_view();
            if let Some(messenger) = &self.messenger {
                messenger.map_drag();
            }
        }
    }

    /// Moves the map by `offset` pixels.
    pub fn drag_offset(&mut self, offset: Point) {
        self.render_offset.offset(offset);
        self.on_render_offset_changed();
        self.update_position_from_view();

        if let Some(messenger) = &self.messenger {
            messenger.map_drag();
        }
    }

    /// Finishes dragging.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }

    /// Moves the current position into the center of the view.
    pub fn go_to_current_position(&mut self) {
        self.render_offset = Point::ZERO;
        self.last_center_tile = None;
        self.drag_point = Point::ZERO;

        self.drag(self.centering_offset());
    }

    /// Geographic position of a point of the view.
    pub fn from_local_to_latlng(&self, local: Point) -> LatLng {
        self.projection
            .from_pixel_to_latlng(local - self.render_offset, self.zoom)
    }

    /// Point of the view showing the geographic position.
    pub fn from_latlng_to_local(&self, position: LatLng) -> Point {
        self.projection.from_latlng_to_pixel(position, self.zoom) + self.render_offset
    }

    /// Geographic area covered by the view.
    pub fn current_view_area(&self) -> RectLatLng {
        let origin = Point::ZERO - self.render_offset;
        let top_left = self.projection.from_pixel_to_latlng(origin, self.zoom);
        let right = self
            .projection
            .from_pixel_to_latlng(origin + Point::new(self.view_size.width(), 0), self.zoom)
            .lng();
        let bottom = self
            .projection
            .from_pixel_to_latlng(origin + Point::new(0, self.view_size.height()), self.zoom)
            .lat();

        RectLatLng::from_ltrb(top_left.lng(), top_left.lat(), right, bottom)
    }

    /// Meters per pixel at the current position and zoom.
    pub fn ground_resolution(&self) -> f64 {
        self.projection
            .ground_resolution(self.zoom, self.position.lat())
    }

    fn centering_offset(&self) -> Point {
        Point::new(
            -(self.position_pixel.x - self.view_size.half_width()),
            -(self.position_pixel.y - self.view_size.half_height()),
        )
    }

    fn go_to_current_position_on_zoom(&mut self) {
        self.drag_point = Point::ZERO;
        self.render_offset = self.centering_offset();
        self.update_center_tile();
        self.last_center_tile = Some(self.center_tile);
    }

    fn on_render_offset_changed(&mut self) {
        self.update_center_tile();
        if self.last_center_tile != Some(self.center_tile) {
            self.last_center_tile = Some(self.center_tile);
            self.update_bounds();
        }
    }

    fn update_position_from_view(&mut self) {
        let center = Point::new(self.view_size.half_width(), self.view_size.half_height());
        self.position = self.from_local_to_latlng(center);
        self.position_pixel = self.projection.from_latlng_to_pixel(self.position, self.zoom);

        if self.started {
            if let Some(messenger) = &self.messenger {
                messenger.position_changed(self.position);
            }
        }
    }

    fn update_area_radius(&mut self) {
        self.area_radius = tile_area_radius(
            self.view_size,
            self.projection.tile_size(),
            self.is_rotated(),
        );
    }

    fn update_center_tile(&mut self) {
        let center = Point::new(
            self.view_size.half_width() - self.render_offset.x,
            self.view_size.half_height() - self.render_offset.y,
        );
        let tile = self.projection.from_pixel_to_tile_xy(center);
        let bounds = self.tile_bounds;

        self.center_tile = Point::new(
            tile.x.clamp(bounds.min.x, bounds.max.x),
            tile.y.clamp(bounds.min.y, bounds.max.y),
        );
    }

    fn update_bounds(&mut self) {
        if !self.started || self.map_type.is_none() {
            return;
        }

        let tiles = self.visible_tiles();
        self.drawing_list.clone_from(&tiles);
        self.loader.load_visible(self.zoom, self.map_type, tiles);
    }
}
