//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// Point on the surface of the Earth, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Creates a point without validating the range.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Geographic rectangle given by its top-left corner and its extent in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct RectLatLng {
    top: f64,
    left: f64,
    width_lng: f64,
    height_lat: f64,
}

impl RectLatLng {
    /// Creates a rectangle from its left, top, right and bottom edges.
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            width_lng: right - left,
            height_lat: top - bottom,
        }
    }

    /// Top-left corner.
    pub fn top_left(&self) -> LatLng {
        LatLng::new(self.top, self.left)
    }

    /// Bottom-right corner.
    pub fn bottom_right(&self) -> LatLng {
        LatLng::new(self.top - self.height_lat, self.left + self.width_lng)
    }

    /// Center of the rectangle.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            self.top - self.height_lat / 2.0,
            self.left + self.width_lng / 2.0,
        )
    }

    /// Width in degrees of longitude.
    pub fn width_lng(&self) -> f64 {
        self.width_lng
    }

    /// Height in degrees of latitude.
    pub fn height_lat(&self) -> f64 {
        self.height_lat
    }

    /// Returns true if the point is inside the rectangle or on its border.
    pub fn contains(&self, point: &LatLng) -> bool {
        let bottom_right = self.bottom_right();
        point.lat() <= self.top
            && point.lat() >= bottom_right.lat()
            && point.lng() >= self.left
            && point.lng() <= bottom_right.lng()
    }
}

/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
}

impl Datum {
    /// WGS84 ellipsoid.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
    };

    /// Semimajor axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}
