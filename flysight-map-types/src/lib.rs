//! Value types shared by the FlySight map engine: geographic coordinates ([`LatLng`],
//! [`RectLatLng`]), integer pixel geometry ([`Point`], [`Size`]) and the [`Projection`] that
//! converts between them at a given zoom level.

pub mod cartesian;
pub mod error;
pub mod geo;
pub mod projection;

pub use cartesian::{Point, Rect, Size};
pub use geo::{Datum, LatLng, RectLatLng};
pub use projection::{MercatorProjection, Projection};

/// Creates a [`LatLng`] from latitude and longitude in degrees.
///
/// ```
/// use flysight_map_types::latlng;
///
/// let point = latlng!(54.68, 25.28);
/// assert_eq!(point.lat(), 54.68);
/// ```
#[macro_export]
macro_rules! latlng {
    ($lat:expr, $lng:expr) => {
        $crate::geo::LatLng::new($lat, $lng)
    };
}
