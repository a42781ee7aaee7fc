//! Spin-lock primitive used to guard the buddy and slab allocator state.
//!
//! Like the original, this lock is "pure": it only provides the lock semantic and does
//! not own or wrap the data it guards. Callers manipulate raw pointers while holding the
//! guard, which mirrors the header/list manipulation the allocators perform.

use core::sync::atomic::{AtomicBool, Ordering};

#[repr(C)]
pub struct SpinLock {
    lock: AtomicBool,
}

impl SpinLock {
    #[inline]
    pub const fn new() -> Self {
        Self { lock: AtomicBool::new(false) }
    }

    #[inline]
    pub fn lock(&self) {
        while self.lock.compare_exchange_weak(
            false, true, Ordering::AcqRel, Ordering::Relaxed).is_err() {}
    }

    #[inline]
    pub fn unlock(&self) {
        self.lock.store(false, Ordering::Release);
    }

    #[inline]
    pub fn lock_guard(&self) -> SpinLockGuard {
        self.lock();
        SpinLockGuard { lock: self }
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SpinLockGuard<'a> {
    lock: &'a SpinLock,
}

impl<'a> Drop for SpinLockGuard<'a> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
