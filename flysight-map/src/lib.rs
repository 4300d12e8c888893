//! Flysight-map is the slippy map tile engine of the FlySight viewer. It keeps track of the
//! visible part of a Web Mercator map, loads the tiles covering it on background threads and
//! tells the drawing code what to paint.
//!
//! # Quick start
//!
//! ```no_run
//! use flysight_map::{EngineConfig, MapType, TileEngineBuilder};
//! use flysight_map::fetcher::url_template;
//! use flysight_map::flysight_map_types::latlng;
//!
//! let (_manager, mut core) = TileEngineBuilder::new_rest(url_template(
//!     MapType::Street,
//!     "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
//! ))
//! .with_config(EngineConfig {
//!     worker_pool_size: 2,
//!     ..EngineConfig::default()
//! })
//! .with_file_cache("tiles")
//! .build()?;
//!
//! core.on_map_size_changed(1024, 768);
//! core.set_map_type(MapType::Street);
//! core.set_position(latlng!(54.68, 25.28));
//! core.set_zoom(12);
//! core.start_system();
//!
//! for tile in core.draw_plan() {
//!     println!("{:?} at {:?}", tile.index, tile.rect);
//! }
//! # Ok::<(), flysight_map::MapError>(())
//! ```
//!
//! # Main components
//!
//! * [`MapCore`] holds the view state (position, zoom, map type, view size, drag) and decides
//!   which tiles are needed. It is built together with the other parts by the
//!   [`TileEngineBuilder`].
//! * [`TileLoader`] runs a pool of loader threads that turn load tasks into tiles of the
//!   [`TileMatrix`].
//! * [`TileManager`] is shared by all threads: it serves tile bytes from the memory cache or
//!   asks its [`fetcher`](fetcher::TileFetcher) for them.
//! * A [`Messenger`] is notified when the map needs to be redrawn and about the progress of
//!   tile loading.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod builder;
pub mod cache;
mod config;
pub mod decoded_image;
pub mod error;
pub mod fetcher;
mod loader;
mod manager;
mod map_core;
mod map_type;
mod matrix;
mod messenger;
mod render;
pub(crate) mod sync;
pub mod tile_schema;

pub use builder::TileEngineBuilder;
pub use config::EngineConfig;
pub use decoded_image::{DecodedImage, ImageDecoder};
pub use error::MapError;
pub use loader::TileLoader;
pub use manager::TileManager;
pub use map_core::MapCore;
pub use map_type::MapType;
pub use matrix::{Tile, TileMatrix};
pub use messenger::{DummyMessenger, Messenger};
pub use render::{TileContent, TileDraw, EMPTY_TILE_TEXT};
pub use tile_schema::{LoadTask, TileIndex, TileKey};

// Reexport flysight_map_types
pub use flysight_map_types;
