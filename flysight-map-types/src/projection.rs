//! Conversion between geographic coordinates and the pixel/tile grid of a zoom level.

use std::f64::consts::PI;

use crate::cartesian::{Point, Size};
use crate::error::MapTypesError;
use crate::geo::{Datum, LatLng};

/// Projection of the globe onto the tile pyramid.
///
/// Pixel coordinates are global for the given zoom: `(0, 0)` is the top-left corner of the
/// top-left tile. Tile coordinates are pixel coordinates divided by the tile size.
pub trait Projection: std::fmt::Debug + Send + Sync {
    /// Size of a single tile in pixels.
    fn tile_size(&self) -> Size;

    /// Converts a geographic point into pixel coordinates at the given zoom.
    fn from_latlng_to_pixel(&self, point: LatLng, zoom: u32) -> Point;

    /// Converts pixel coordinates at the given zoom back into a geographic point.
    fn from_pixel_to_latlng(&self, pixel: Point, zoom: u32) -> LatLng;

    /// Smallest valid tile coordinate at the given zoom.
    fn tile_matrix_min_xy(&self, zoom: u32) -> Point;

    /// Largest valid tile coordinate at the given zoom.
    fn tile_matrix_max_xy(&self, zoom: u32) -> Point;

    /// Meters per pixel at the given zoom and latitude.
    fn ground_resolution(&self, zoom: u32, lat: f64) -> f64;

    /// Tile containing the given pixel.
    fn from_pixel_to_tile_xy(&self, pixel: Point) -> Point {
        let size = self.tile_size();
        Point::new(
            pixel.x.div_euclid(size.width()),
            pixel.y.div_euclid(size.height()),
        )
    }

    /// Pixel of the top-left corner of the given tile.
    fn from_tile_xy_to_pixel(&self, tile: Point) -> Point {
        let size = self.tile_size();
        Point::new(tile.x * size.width(), tile.y * size.height())
    }
}

/// Spherical (web) Mercator projection with square tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    tile_size: Size,
    datum: Datum,
}

impl MercatorProjection {
    /// Latitude limit of the projection.
    pub const MAX_LATITUDE: f64 = 85.05112878;
    /// Longitude limit of the projection.
    pub const MAX_LONGITUDE: f64 = 180.0;
    /// Highest zoom level whose tile coordinates still fit into `i32`.
    pub const MAX_ZOOM: u32 = 30;

    /// Creates a projection with square tiles of `tile_size` pixels.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: Size::new(tile_size as i64, tile_size as i64),
            datum: Datum::WGS84,
        }
    }

    /// Fails if the zoom level is too deep to be addressed by the projection.
    pub fn validate_zoom(zoom: u32) -> Result<(), MapTypesError> {
        if zoom > Self::MAX_ZOOM {
            return Err(MapTypesError::InvalidZoom(zoom));
        }

        Ok(())
    }

    fn map_size(&self, zoom: u32) -> Size {
        Size::new(
            self.tile_size.width() << zoom,
            self.tile_size.height() << zoom,
        )
    }
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self::new(256)
    }
}

fn clip(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

impl Projection for MercatorProjection {
    fn tile_size(&self) -> Size {
        self.tile_size
    }

    fn from_latlng_to_pixel(&self, point: LatLng, zoom: u32) -> Point {
        let lat = clip(point.lat(), -Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        let lng = clip(point.lng(), -Self::MAX_LONGITUDE, Self::MAX_LONGITUDE);

        let x = (lng + 180.0) / 360.0;
        let sin_lat = lat.to_radians().sin();
        let y = 0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI);

        let map_size = self.map_size(zoom);
        let width = map_size.width() as f64;
        let height = map_size.height() as f64;

        Point::new(
            clip(x * width + 0.5, 0.0, width - 1.0) as i64,
            clip(y * height + 0.5, 0.0, height - 1.0) as i64,
        )
    }

    fn from_pixel_to_latlng(&self, pixel: Point, zoom: u32) -> LatLng {
        let map_size = self.map_size(zoom);
        let width = map_size.width() as f64;
        let height = map_size.height() as f64;

        let x = clip(pixel.x as f64, 0.0, width - 1.0) / width - 0.5;
        let y = 0.5 - clip(pixel.y as f64, 0.0, height - 1.0) / height;

        let lat = 90.0 - 360.0 * (-y * 2.0 * PI).exp().atan() / PI;
        let lng = 360.0 * x;

        LatLng::new(lat, lng)
    }

    fn tile_matrix_min_xy(&self, _zoom: u32) -> Point {
        Point::ZERO
    }

    fn tile_matrix_max_xy(&self, zoom: u32) -> Point {
        let max = (1i64 << zoom) - 1;
        Point::new(max, max)
    }

    fn ground_resolution(&self, zoom: u32, lat: f64) -> f64 {
        let lat = clip(lat, -Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        lat.to_radians().cos() * 2.0 * PI * self.datum.semimajor()
            / self.map_size(zoom).width() as f64
    }
}
