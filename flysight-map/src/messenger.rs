//! Notifications the engine sends to the UI that hosts the map.

use flysight_map_types::LatLng;
use web_time::Duration;

use crate::map_type::MapType;
use crate::tile_schema::TileIndex;

/// Receiver of map engine events.
///
/// Methods are called from the controller thread and from tile loader threads alike, so
/// implementations should only record the event or post it to the UI event loop.
pub trait Messenger: Send + Sync {
    /// Some tiles changed and the map should be repainted.
    fn request_redraw(&self);

    /// A new set of visible tiles was queued for loading.
    fn tile_load_started(&self) {}

    /// The load queue was drained. `elapsed` is the time since the last load start.
    fn tile_load_completed(&self, _elapsed: Duration) {}

    /// A tile failed to load. Called once per tile until failed loads are cleared.
    fn empty_tile_error(&self, _index: TileIndex) {}

    /// Center position of the map changed.
    fn position_changed(&self, _position: LatLng) {}

    /// Zoom level changed.
    fn zoom_changed(&self, _zoom: u32) {}

    /// Map type changed.
    fn map_type_changed(&self, _map_type: MapType) {}

    /// The map was dragged.
    fn map_drag(&self) {}
}

/// Messenger that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}

impl<T: Messenger + ?Sized> Messenger for std::sync::Arc<T> {
    fn request_redraw(&self) {
        (**self).request_redraw();
    }

    fn tile_load_started(&self) {
        (**self).tile_load_started();
    }

    fn tile_load_completed(&self, elapsed: Duration) {
        (**self).tile_load_completed(elapsed);
    }

    fn empty_tile_error(&self, index: TileIndex) {
        (**self).empty_tile_error(index);
    }

    fn position_changed(&self, position: LatLng) {
        (**self).position_changed(position);
    }

    fn zoom_changed(&self, zoom: u32) {
        (**self).zoom_changed(zoom);
    }

    fn map_type_changed(&self, map_type: MapType) {
        (**self).map_type_changed(map_type);
    }

    fn map_drag(&self) {
        (**self).map_drag();
    }
}
