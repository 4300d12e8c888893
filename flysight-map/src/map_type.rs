//! Map types and the tile layers they are composed of.

use serde::{Deserialize, Serialize};

/// Kind of map shown by the control. Composite types are made of several layers that are
/// loaded separately and drawn on top of each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapType {
    /// No map is shown and no tiles are loaded.
    #[default]
    None,
    /// Street map.
    Street,
    /// Satellite imagery.
    Satellite,
    /// Transparent labels overlay.
    Labels,
    /// Terrain relief.
    Terrain,
    /// Satellite imagery with labels on top.
    Hybrid,
}

impl MapType {
    /// Layers the map type is composited from, bottom first.
    pub fn layers(&self) -> &'static [MapType] {
        match self {
            MapType::None => &[],
            MapType::Street => &[MapType::Street],
            MapType::Satellite => &[MapType::Satellite],
            MapType::Labels => &[MapType::Labels],
            MapType::Terrain => &[MapType::Terrain],
            MapType::Hybrid => &[MapType::Satellite, MapType::Labels],
        }
    }

    /// Returns true for [`MapType::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, MapType::None)
    }
}
