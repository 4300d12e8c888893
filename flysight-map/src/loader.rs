//! Background loading of map tiles.
//!
//! [`TileLoader`] keeps a queue of [`LoadTask`]s and a pool of OS threads draining it. Each
//! task loads every layer of its map type through the [`TileManager`] and puts the composed
//! [`Tile`] into the [`TileMatrix`]. When the whole pool has found the queue empty, one of the
//! workers does the housekeeping of the finished batch: it asks for a redraw, trims the memory
//! cache, drops matrix tiles that are no longer visible and reports the load time.

use std::collections::{HashMap, HashSet, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use web_time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::decoded_image::DecodedImage;
use crate::error::MapError;
use crate::manager::TileManager;
use crate::map_type::MapType;
use crate::matrix::{Tile, TileMatrix};
use crate::messenger::Messenger;
use crate::sync::FastRwLock;
use crate::tile_schema::{LoadTask, TileIndex};

#[derive(Debug, Default)]
struct LoadQueue {
    tasks: VecDeque<LoadTask>,
    queued: HashSet<LoadTask, ahash::RandomState>,
    workers: usize,
    idle: usize,
    drained: bool,
    stopped: bool,
    next_worker_id: usize,
}

#[derive(Debug, Default)]
struct DrawingList {
    zoom: u32,
    map_type: MapType,
    tiles: Vec<TileIndex>,
}

#[derive(Debug)]
struct LoadTiming {
    load_start: Instant,
    last_invalidation: Instant,
}

#[derive(Debug, Clone, Copy)]
struct LoaderSettings {
    pool_size: usize,
    retry_load_tile: u32,
    retry_delay: Duration,
    idle_timeout: Duration,
    invalidation_interval: Duration,
}

impl From<&EngineConfig> for LoaderSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            pool_size: config.worker_pool_size,
            retry_load_tile: config.retry_load_tile,
            retry_delay: config.retry_delay,
            idle_timeout: config.worker_idle_timeout,
            invalidation_interval: config.invalidation_interval,
        }
    }
}

struct Shared {
    settings: LoaderSettings,
    manager: Arc<TileManager>,
    matrix: Arc<TileMatrix>,
    queue: Mutex<LoadQueue>,
    task_available: Condvar,
    drawing: FastRwLock<DrawingList>,
    failed_loads: Mutex<HashMap<LoadTask, Arc<MapError>, ahash::RandomState>>,
    timing: Mutex<LoadTiming>,
    messenger: RwLock<Option<Arc<dyn Messenger>>>,
}

/// Load queue with its pool of worker threads.
///
/// Worker threads are started on demand and exit after staying idle for
/// [`EngineConfig::worker_idle_timeout`]. Dropping the loader stops all workers once they
/// finish their current task.
pub struct TileLoader {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for TileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLoader")
            .field("settings", &self.shared.settings)
            .field("queue", &*self.shared.queue.lock())
            .finish_non_exhaustive()
    }
}

impl TileLoader {
    /// Creates a loader without running workers.
    pub fn new(manager: Arc<TileManager>, matrix: Arc<TileMatrix>, config: &EngineConfig) -> Self {
        let now = Instant::now();
        Self {
            shared: Arc::new(Shared {
                settings: config.into(),
                manager,
                matrix,
                queue: Mutex::new(LoadQueue::default()),
                task_available: Condvar::new(),
                drawing: FastRwLock::new(DrawingList::default()),
                failed_loads: Mutex::new(HashMap::default()),
                timing: Mutex::new(LoadTiming {
                    load_start: now,
                    last_invalidation: now,
                }),
                messenger: RwLock::new(None),
            }),
        }
    }

    /// Sets the receiver of load events.
    pub fn set_messenger(&self, messenger: Arc<dyn Messenger>) {
        *self.shared.messenger.write() = Some(messenger);
    }

    /// Tile manager the workers load images through.
    pub fn manager(&self) -> &Arc<TileManager> {
        &self.shared.manager
    }

    /// Matrix the loaded tiles are put into.
    pub fn matrix(&self) -> &Arc<TileMatrix> {
        &self.shared.matrix
    }

    /// Adds the task to the queue unless an equal task is already waiting.
    ///
    /// Returns true if the task was queued.
    pub fn enqueue(&self, task: LoadTask) -> bool {
        let mut queue = self.shared.queue.lock();
        if !self.shared.push_task(&mut queue, task) {
            return false;
        }

        queue.drained = false;
        Shared::ensure_workers(&self.shared, &mut queue);
        drop(queue);

        self.shared.task_available.notify_one();
        true
    }

    /// Replaces the set of tiles the map shows and queues them for loading.
    pub fn load_visible(&self, zoom: u32, map_type: MapType, tiles: Vec<TileIndex>) {
        let tasks: Vec<_> = tiles
            .iter()
            .map(|index| LoadTask::new(map_type, *index))
            .collect();

        *self.shared.drawing.write() = DrawingList {
            zoom,
            map_type,
            tiles,
        };

        let mut queue = self.shared.queue.lock();
        let queued = tasks
            .into_iter()
            .filter(|task| self.shared.push_task(&mut queue, *task))
            .count();
        queue.drained = false;
        Shared::ensure_workers(&self.shared, &mut queue);
        drop(queue);

        self.shared.timing.lock().load_start = Instant::now();
        self.shared.task_available.notify_all();

        log::debug!("Queued {queued} tiles of {map_type:?} at zoom {zoom}");
        if let Some(messenger) = self.shared.messenger() {
            messenger.tile_load_started();
        }
    }

    /// Drops all queued tasks. Tasks being loaded are finished.
    pub fn clear(&self) {
        let mut queue = self.shared.queue.lock();
        queue.tasks.clear();
        queue.queued.clear();
    }

    /// Forgets all failed loads so the tiles are reported again when they fail next time.
    pub fn clear_failed_loads(&self) {
        self.shared.failed_loads.lock().clear();
    }

    /// Error of the failed task, if it failed.
    pub fn failed_load(&self, task: &LoadTask) -> Option<Arc<MapError>> {
        self.shared.failed_loads.lock().get(task).cloned()
    }

    /// Number of failed tasks.
    pub fn failed_loads_len(&self) -> usize {
        self.shared.failed_loads.lock().len()
    }

    /// Number of tasks waiting in the queue.
    pub fn queued_len(&self) -> usize {
        self.shared.queue.lock().tasks.len()
    }

    /// Number of running worker threads.
    pub fn worker_count(&self) -> usize {
        self.shared.queue.lock().workers
    }

    /// Accepts tasks again after [`shutdown`](Self::shutdown).
    pub fn start(&self) {
        self.shared.queue.lock().stopped = false;
    }

    /// Returns true if the loader accepts tasks.
    pub fn is_running(&self) -> bool {
        !self.shared.queue.lock().stopped
    }

    /// Drops queued tasks and stops the workers once they finish the current task. No new
    /// tasks are accepted until [`start`](Self::start).
    pub fn shutdown(&self) {
        let mut queue = self.shared.queue.lock();
        queue.stopped = true;
        queue.tasks.clear();
        queue.queued.clear();
        drop(queue);

        self.shared.task_available.notify_all();
    }
}

impl Drop for TileLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    fn messenger(&self) -> Option<Arc<dyn Messenger>> {
        self.messenger.read().clone()
    }

    fn push_task(&self, queue: &mut LoadQueue, task: LoadTask) -> bool {
        if queue.stopped || !queue.queued.insert(task) {
            return false;
        }

        queue.tasks.push_back(task);
        true
    }

    fn ensure_workers(shared: &Arc<Self>, queue: &mut LoadQueue) {
        while queue.workers < shared.settings.pool_size && !queue.stopped {
            let id = queue.next_worker_id;
            queue.next_worker_id += 1;

            let worker_shared = shared.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("tile-loader-{id}"))
                .spawn(move || worker_shared.run_worker());

            match spawned {
                Ok(_) => {
                    queue.workers += 1;
                    log::info!("Started tile loader {id}");
                }
                Err(err) => {
                    log::warn!("Failed to start tile loader thread: {err}");
                    break;
                }
            }
        }
    }

    fn run_worker(&self) {
        while let Some(task) = self.next_task() {
            let result = std::panic::catch_unwind(AssertUnwindSafe(|| self.process_task(task)));
            if let Err(payload) = result {
                let message = panic_message(payload.as_ref());
                log::warn!("Loading of {task:?} panicked: {message}");
                self.record_failure(task, MapError::WorkerPanic(message));
            }
        }

        log::info!(
            "Tile loader {} stopped",
            std::thread::current().name().unwrap_or_default()
        );
    }

    /// Blocks until there is a task. Returns `None` when the worker should exit, which
    /// happens on shutdown or after the idle timeout.
    fn next_task(&self) -> Option<LoadTask> {
        let mut queue = self.queue.lock();
        loop {
            if queue.stopped {
                queue.workers -= 1;
                return None;
            }

            if let Some(task) = queue.tasks.pop_front() {
                queue.queued.remove(&task);
                return Some(task);
            }

            if !queue.drained && queue.idle + 1 >= queue.workers {
                queue.drained = true;
                MutexGuard::unlocked(&mut queue, || self.on_queue_drained());
                continue;
            }

            queue.idle += 1;
            let timeout = self
                .task_available
                .wait_for(&mut queue, self.settings.idle_timeout);
            queue.idle -= 1;

            if timeout.timed_out() && queue.tasks.is_empty() && !queue.stopped {
                queue.workers -= 1;
                return None;
            }
        }
    }

    fn on_queue_drained(&self) {
        let messenger = self.messenger();
        if let Some(messenger) = &messenger {
            messenger.request_redraw();
        }

        self.manager.remove_memory_overload();

        let (zoom, visible) = {
            let drawing = self.drawing.read();
            (drawing.zoom, drawing.tiles.clone())
        };
        self.matrix.clear_level_and_points_not_in(zoom, &visible);

        let elapsed = self.timing.lock().load_start.elapsed();
        log::debug!("Tiles loaded in {} ms", elapsed.as_millis());
        if let Some(messenger) = &messenger {
            messenger.tile_load_completed(elapsed);
        }
    }

    fn process_task(&self, task: LoadTask) {
        if self
            .matrix
            .get_tile(task.index)
            .is_some_and(|tile| tile.has_overlays())
        {
            return;
        }

        let tile = Tile::new(task.index);
        for layer in task.map_type.layers() {
            match self.load_layer(*layer, task.index) {
                Ok(image) => tile.add_overlay(image),
                Err(err) => {
                    log::debug!("Failed to load {layer:?} layer of {:?}: {err}", task.index);
                    self.record_failure(task, err);
                }
            }
        }

        if tile.has_overlays() {
            if self.drawing.read().map_type == task.map_type {
                self.matrix.set_tile(Arc::new(tile));
            } else {
                log::debug!("Dropping stale tile {task:?}");
            }
        }

        self.invalidate();
    }

    fn load_layer(&self, layer: MapType, index: TileIndex) -> Result<Arc<DecodedImage>, MapError> {
        let attempts = self.settings.retry_load_tile + 1;
        let mut attempt = 1;
        loop {
            match self.manager.get_image(layer, index) {
                Ok(image) => return Ok(image),
                Err(err) if attempt >= attempts || self.queue.lock().stopped => return Err(err),
                Err(err) => {
                    log::debug!("Attempt {attempt} to load {layer:?} {index:?} failed: {err}");
                    attempt += 1;
                    std::thread::sleep(self.settings.retry_delay);
                }
            }
        }
    }

    fn record_failure(&self, task: LoadTask, error: MapError) {
        let first = {
            let mut failed = self.failed_loads.lock();
            if failed.contains_key(&task) {
                false
            } else {
                failed.insert(task, Arc::new(error));
                true
            }
        };

        if first {
            if let Some(messenger) = self.messenger() {
                messenger.empty_tile_error(task.index);
            }
        }
    }

    fn invalidate(&self) {
        let due = {
            let mut timing = self.timing.lock();
            if timing.last_invalidation.elapsed() >= self.settings.invalidation_interval {
                timing.last_invalidation = Instant::now();
                true
            } else {
                false
            }
        };

        if due {
            if let Some(messenger) = self.messenger() {
                messenger.request_redraw();
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use bytes::Bytes;

    use super::*;
    use crate::fetcher::TileFetcher;

    #[derive(Default)]
    pub(crate) struct RecordingMessenger {
        pub redraws: AtomicUsize,
        pub started: AtomicUsize,
        pub completed: AtomicUsize,
        pub errors: Mutex<Vec<TileIndex>>,
        pub zooms: Mutex<Vec<u32>>,
        pub map_types: Mutex<Vec<MapType>>,
        pub drags: AtomicUsize,
    }

    impl Messenger for RecordingMessenger {
        fn request_redraw(&self) {
            self.redraws.fetch_add(1, Ordering::SeqCst);
        }

        fn tile_load_started(&self) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn tile_load_completed(&self, _elapsed: Duration) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }

        fn empty_tile_error(&self, index: TileIndex) {
            self.errors.lock().push(index);
        }

        fn zoom_changed(&self, zoom: u32) {
            self.zooms.lock().push(zoom);
        }

        fn map_type_changed(&self, map_type: MapType) {
            self.map_types.lock().push(map_type);
        }

        fn map_drag(&self) {
            self.drags.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl RecordingMessenger {
        pub fn wait_for_completed(&self, count: usize) {
            let deadline = Instant::now() + Duration::from_secs(10);
            while self.completed.load(Ordering::SeqCst) < count {
                assert!(Instant::now() < deadline, "tile loading did not complete");
                std::thread::sleep(Duration::from_millis(2));
            }
        }
    }

    pub(crate) fn test_image(bytes: &[u8]) -> Option<DecodedImage> {
        if bytes.is_empty() || bytes == b"garbage" {
            return None;
        }
        DecodedImage::from_raw(vec![0; 4], 1, 1).ok()
    }

    pub(crate) fn test_config(pool_size: usize) -> EngineConfig {
        EngineConfig {
            worker_pool_size: pool_size,
            retry_delay: Duration::from_millis(1),
            invalidation_interval: Duration::ZERO,
            ..EngineConfig::default()
        }
    }

    fn loader(
        fetcher: impl TileFetcher + 'static,
        config: &EngineConfig,
    ) -> (TileLoader, Arc<RecordingMessenger>) {
        let manager = Arc::new(TileManager::new(fetcher, test_image, 1_000_000));
        let loader = TileLoader::new(manager, Arc::new(TileMatrix::new()), config);
        let messenger = Arc::new(RecordingMessenger::default());
        loader.set_messenger(messenger.clone());
        (loader, messenger)
    }

    fn ok_fetcher(_: MapType, _: TileIndex) -> Result<Bytes, MapError> {
        Ok(Bytes::from_static(b"tile"))
    }

    #[test]
    fn equal_tasks_are_queued_once() {
        let (loader, _) = loader(ok_fetcher, &test_config(0));
        let task = LoadTask::new(MapType::Street, TileIndex::new(1, 1, 3));

        assert!(loader.enqueue(task));
        assert!(!loader.enqueue(task));
        assert!(loader.enqueue(LoadTask::new(MapType::Satellite, TileIndex::new(1, 1, 3))));
        assert_eq!(loader.queued_len(), 2);
        assert_eq!(loader.worker_count(), 0);

        loader.clear();
        assert_eq!(loader.queued_len(), 0);
        assert!(loader.enqueue(task));
    }

    #[test]
    fn stopped_loader_refuses_tasks() {
        let (loader, _) = loader(ok_fetcher, &test_config(0));
        loader.shutdown();
        assert!(!loader.is_running());
        assert!(!loader.enqueue(LoadTask::new(MapType::Street, TileIndex::new(0, 0, 1))));

        loader.start();
        assert!(loader.enqueue(LoadTask::new(MapType::Street, TileIndex::new(0, 0, 1))));
    }

    #[test]
    fn loads_visible_tiles() {
        let (loader, messenger) = loader(ok_fetcher, &test_config(3));
        let tiles: Vec<_> = (0..4).map(|x| TileIndex::new(x, 0, 4)).collect();

        loader.load_visible(4, MapType::Street, tiles.clone());
        messenger.wait_for_completed(1);

        assert_eq!(messenger.started.load(Ordering::SeqCst), 1);
        assert!(messenger.redraws.load(Ordering::SeqCst) > 0);
        assert_eq!(loader.matrix().level_len(4), 4);
        for index in tiles {
            let tile = loader.matrix().get_tile(index).expect("loaded tile");
            assert_eq!(tile.overlay_count(), 1);
        }
        assert!(loader.worker_count() <= 3);
        assert_eq!(loader.queued_len(), 0);
    }

    #[test]
    fn failed_layer_is_retried_and_reported_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetcher = move |_: MapType, _: TileIndex| -> Result<Bytes, MapError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(MapError::Io("connection reset".into()))
        };
        let config = EngineConfig {
            retry_load_tile: 2,
            ..test_config(1)
        };
        let (loader, messenger) = loader(fetcher, &config);
        let index = TileIndex::new(2, 2, 5);
        let task = LoadTask::new(MapType::Street, index);

        loader.load_visible(5, MapType::Street, vec![index]);
        messenger.wait_for_completed(1);

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(*messenger.errors.lock(), vec![index]);
        assert_matches!(loader.failed_load(&task).as_deref(), Some(MapError::Io(_)));
        assert!(loader.matrix().get_tile(index).is_none());

        assert!(loader.enqueue(task));
        messenger.wait_for_completed(2);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(messenger.errors.lock().len(), 1);

        loader.clear_failed_loads();
        assert_eq!(loader.failed_loads_len(), 0);
    }

    #[test]
    fn hybrid_tile_keeps_loaded_layer() {
        let fetcher = |map_type: MapType, _: TileIndex| -> Result<Bytes, MapError> {
            match map_type {
                MapType::Labels => Err(MapError::HttpStatus(500)),
                _ => Ok(Bytes::from_static(b"tile")),
            }
        };
        let (loader, messenger) = loader(fetcher, &test_config(2));
        let index = TileIndex::new(3, 4, 6);

        loader.load_visible(6, MapType::Hybrid, vec![index]);
        messenger.wait_for_completed(1);

        let tile = loader.matrix().get_tile(index).expect("satellite layer");
        assert_eq!(tile.overlay_count(), 1);
        assert_matches!(
            loader
                .failed_load(&LoadTask::new(MapType::Hybrid, index))
                .as_deref(),
            Some(MapError::HttpStatus(500))
        );
    }

    #[test]
    fn undecodable_layer_is_omitted() {
        let fetcher = |_: MapType, _: TileIndex| -> Result<Bytes, MapError> {
            Ok(Bytes::from_static(b"garbage"))
        };
        let (loader, messenger) = loader(fetcher, &test_config(1));
        let index = TileIndex::new(0, 0, 3);

        loader.load_visible(3, MapType::Street, vec![index]);
        messenger.wait_for_completed(1);

        assert!(loader.matrix().is_empty());
        assert_matches!(
            loader
                .failed_load(&LoadTask::new(MapType::Street, index))
                .as_deref(),
            Some(MapError::Decoding)
        );
        assert_eq!(loader.manager().memory_cache_size(), 0);
    }

    #[test]
    fn worker_survives_panicking_fetcher() {
        let fetcher = |_: MapType, index: TileIndex| -> Result<Bytes, MapError> {
            if index.x == 0 {
                panic!("broken tile source");
            }
            Ok(Bytes::from_static(b"tile"))
        };
        let (loader, messenger) = loader(fetcher, &test_config(1));
        let broken = TileIndex::new(0, 0, 4);
        let fine = TileIndex::new(1, 0, 4);

        loader.load_visible(4, MapType::Street, vec![broken, fine]);
        messenger.wait_for_completed(1);

        assert_matches!(
            loader
                .failed_load(&LoadTask::new(MapType::Street, broken))
                .as_deref(),
            Some(MapError::WorkerPanic(message)) if message.contains("broken tile source")
        );
        assert!(loader.matrix().get_tile(fine).is_some());
        assert_eq!(loader.worker_count(), 1);
    }

    #[test]
    fn redraws_are_coalesced() {
        let config = EngineConfig {
            invalidation_interval: Duration::from_secs(1),
            ..test_config(2)
        };
        let (loader, messenger) = loader(ok_fetcher, &config);
        let tiles: Vec<_> = (0..64).map(|x| TileIndex::new(x, 0, 6)).collect();

        loader.load_visible(6, MapType::Street, tiles);
        messenger.wait_for_completed(1);

        assert_eq!(loader.matrix().level_len(6), 64);
        let redraws = messenger.redraws.load(Ordering::SeqCst);
        assert!(redraws >= 1);
        assert!(redraws <= 5, "{redraws} redraws for 64 tiles");
    }

    #[test]
    fn idle_workers_retire_and_pool_is_refilled() {
        let config = EngineConfig {
            worker_idle_timeout: Duration::from_millis(100),
            ..test_config(3)
        };
        let (loader, messenger) = loader(ok_fetcher, &config);

        loader.load_visible(5, MapType::Street, vec![TileIndex::new(0, 0, 5)]);
        assert_eq!(loader.worker_count(), 3);
        messenger.wait_for_completed(1);

        let deadline = Instant::now() + Duration::from_secs(10);
        while loader.worker_count() > 0 {
            assert!(Instant::now() < deadline, "idle workers did not exit");
            std::thread::sleep(Duration::from_millis(10));
        }

        loader.load_visible(5, MapType::Street, vec![TileIndex::new(1, 0, 5)]);
        assert_eq!(loader.worker_count(), 3);
        messenger.wait_for_completed(2);
        assert!(loader.matrix().get_tile(TileIndex::new(1, 0, 5)).is_some());
    }

    #[test]
    fn drain_prunes_invisible_tiles() {
        let (loader, messenger) = loader(ok_fetcher, &test_config(2));
        let stale = Tile::new(TileIndex::new(9, 9, 4));
        stale.add_overlay(Arc::new(DecodedImage::from_raw(vec![0; 4], 1, 1).expect("image")));
        loader.matrix().set_tile(Arc::new(stale));

        loader.load_visible(4, MapType::Street, vec![TileIndex::new(1, 1, 4)]);
        messenger.wait_for_completed(1);

        assert!(loader.matrix().get_tile(TileIndex::new(9, 9, 4)).is_none());
        assert!(loader.matrix().get_tile(TileIndex::new(1, 1, 4)).is_some());
    }

    #[test]
    fn result_of_previous_map_type_is_dropped() {
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let (started_tx, started_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);
        let started_tx = Mutex::new(started_tx);
        let fetcher = move |_: MapType, _: TileIndex| -> Result<Bytes, MapError> {
            let _ = started_tx.lock().send(());
            let _ = release_rx.lock().recv();
            Ok(Bytes::from_static(b"tile"))
        };
        let (loader, messenger) = loader(fetcher, &test_config(1));
        let index = TileIndex::new(1, 1, 5);

        loader.load_visible(5, MapType::Street, vec![index]);
        started_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("fetch started");
        loader.load_visible(5, MapType::Satellite, vec![]);
        release_tx.send(()).expect("worker waits");

        messenger.wait_for_completed(1);
        assert!(loader.matrix().get_tile(index).is_none());
    }
}
