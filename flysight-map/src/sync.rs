//! Lightweight reader/writer lock for the tile cache, the tile matrix and the list of visible
//! tiles.
//!
//! [`RawFastRwLock`] spins instead of parking the thread: it keeps a `busy` flag and a reader
//! counter. A reader holds `busy` only while it increments the counter, so readers never wait
//! for each other. A writer claims `busy` and then waits until the reader counter drains to
//! zero. Critical sections guarded by it are short in-memory updates, never I/O.
//!
//! Read locks are not reentrant: a thread that already holds a read lock must not take another
//! one while a writer may be waiting.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::lock_api::{self, GuardSend, RawRwLock};

const SPIN_LIMIT: u32 = 64;

/// Raw spinning reader/writer lock. Use it through [`FastRwLock`].
#[derive(Debug)]
pub struct RawFastRwLock {
    busy: AtomicBool,
    readers: AtomicUsize,
}

/// Reader/writer lock backed by [`RawFastRwLock`].
pub type FastRwLock<T> = lock_api::RwLock<RawFastRwLock, T>;

fn backoff(spins: &mut u32) {
    if *spins < SPIN_LIMIT {
        *spins += 1;
        std::hint::spin_loop();
    } else {
        std::thread::yield_now();
    }
}

impl RawFastRwLock {
    fn try_claim_busy(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    fn claim_busy(&self) {
        let mut spins = 0;
        while self
            .busy
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            backoff(&mut spins);
        }
    }

    fn release_busy(&self) {
        self.busy.store(false, Ordering::Release);
    }
}

unsafe impl RawRwLock for RawFastRwLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        busy: AtomicBool::new(false),
        readers: AtomicUsize::new(0),
    };

    type GuardMarker = GuardSend;

    fn lock_shared(&self) {
        self.claim_busy();
        self.readers.fetch_add(1, Ordering::Acquire);
        self.release_busy();
    }

    fn try_lock_shared(&self) -> bool {
        if !self.try_claim_busy() {
            return false;
        }

        self.readers.fetch_add(1, Ordering::Acquire);
        self.release_busy();
        true
    }

    unsafe fn unlock_shared(&self) {
        self.readers.fetch_sub(1, Ordering::Release);
    }

    fn lock_exclusive(&self) {
        self.claim_busy();

        let mut spins = 0;
        while self.readers.load(Ordering::Acquire) != 0 {
            backoff(&mut spins);
        }
    }

    fn try_lock_exclusive(&self) -> bool {
        if !self.try_claim_busy() {
            return false;
        }

        if self.readers.load(Ordering::Acquire) != 0 {
            self.release_busy();
            return false;
        }

        true
    }

    unsafe fn unlock_exclusive(&self) {
        self.release_busy();
    }

    fn is_locked(&self) -> bool {
        self.busy.load(Ordering::Relaxed) || self.readers.load(Ordering::Relaxed) != 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn readers_share_the_lock() {
        let lock = FastRwLock::new(5);
        let a = lock.read();
        let b = lock.read();
        assert_eq!(*a + *b, 10);
        assert!(lock.try_write().is_none());
        assert!(lock.try_read().is_some());

        drop(a);
        drop(b);
        assert!(lock.try_write().is_some());
    }

    #[test]
    fn writer_is_exclusive() {
        let lock = FastRwLock::new(0);
        let mut guard = lock.write();
        *guard += 1;
        assert!(lock.try_read().is_none());
        assert!(lock.try_write().is_none());
        assert!(lock.is_locked());

        drop(guard);
        assert!(!lock.is_locked());
        assert_eq!(*lock.read(), 1);
    }

    #[test]
    fn writer_never_overlaps_readers() {
        const READERS: usize = 6;
        const WRITES: usize = 2_000;

        let lock = FastRwLock::new((0usize, 0usize));
        let active_readers = AtomicUsize::new(0);
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            for _ in 0..READERS {
                scope.spawn(|| {
                    while !done.load(Ordering::Relaxed) {
                        let guard = lock.read();
                        active_readers.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(guard.0, guard.1);
                        active_readers.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }

            scope.spawn(|| {
                for _ in 0..WRITES {
                    let mut guard = lock.write();
                    assert_eq!(active_readers.load(Ordering::SeqCst), 0);
                    guard.0 += 1;
                    std::thread::yield_now();
                    guard.1 += 1;
                }
                done.store(true, Ordering::Relaxed);
            });
        });

        assert_eq!(*lock.read(), (WRITES, WRITES));
    }
}
