//! Loads the tiles of one screen into a file cache and prints what would be drawn.
//!
//! ```text
//! cargo run --example load_tiles -- "https://tile.openstreetmap.org/{z}/{x}/{y}.png" 54.68 25.28 12
//! ```

use std::sync::mpsc::{channel, Sender};
use std::sync::Mutex;
use std::time::Duration;

use flysight_map::fetcher::file_cache::remove_parameters_modifier;
use flysight_map::fetcher::url_template;
use flysight_map::flysight_map_types::latlng;
use flysight_map::{EngineConfig, MapType, Messenger, TileContent, TileEngineBuilder, TileIndex};

struct ChannelMessenger(Mutex<Sender<Duration>>);

impl Messenger for ChannelMessenger {
    fn request_redraw(&self) {}

    fn tile_load_completed(&self, elapsed: Duration) {
        let _ = self.0.lock().map(|sender| sender.send(elapsed));
    }

    fn empty_tile_error(&self, index: TileIndex) {
        log::warn!("No imagery for tile {index:?}");
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let template = args
        .next()
        .unwrap_or_else(|| "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string());
    let lat = args.next().and_then(|v| v.parse().ok()).unwrap_or(54.68);
    let lng = args.next().and_then(|v| v.parse().ok()).unwrap_or(25.28);
    let zoom = args.next().and_then(|v| v.parse().ok()).unwrap_or(12);

    let (sender, receiver) = channel();
    let (manager, mut core) = TileEngineBuilder::new_rest(url_template(MapType::Street, template))
        .with_config(EngineConfig {
            worker_pool_size: 4,
            ..EngineConfig::default()
        })
        .with_file_cache_modifier(
            "target/tile_cache",
            Box::new(remove_parameters_modifier),
        )
        .with_messenger(ChannelMessenger(Mutex::new(sender)))
        .build()
        .expect("failed to build the tile engine");

    core.on_map_size_changed(1024, 768);
    core.set_map_type(MapType::Street);
    core.set_position(latlng!(lat, lng));
    core.set_zoom(zoom);
    core.start_system();

    match receiver.recv_timeout(Duration::from_secs(120)) {
        Ok(elapsed) => println!("Tiles loaded in {elapsed:?}"),
        Err(_) => println!("Tiles are still loading, showing what is ready"),
    }

    for tile in core.draw_plan() {
        let state = match &tile.content {
            TileContent::Tile(tile) => format!("{} image(s)", tile.overlay_count()),
            TileContent::Substitute { levels, .. } => format!("scaled from {levels} level(s) up"),
            TileContent::Failed(error) => format!("failed: {error}"),
            TileContent::Empty => "empty".to_string(),
        };
        println!(
            "{:>4} {:>4} at {:>5} {:>5}: {state}",
            tile.index.x, tile.index.y, tile.rect.origin.x, tile.rect.origin.y
        );
    }

    println!("Memory cache holds {} bytes", manager.memory_cache_size());
    core.on_map_close();
}
