//! Top-level allocator: composes the buddy allocator with one [`SlabManager`]
//! per CPU and dispatches each request to whichever backs the requested size.
//!
//! The per-CPU manager table is carved as raw memory from the head of the
//! heap region before the buddy claims the remainder, mirroring the original
//! kernel's `struct slab_manager *SlabManagers` array — no `alloc` crate
//! dependency is needed to stand the allocator up.

use core::marker::PhantomData;
use core::mem::size_of;
use core::ptr::null_mut;

use crate::buddy::BuddyAllocator;
use crate::config::{MAX_REQUEST, PAGE_SIZE};
use crate::platform::Platform;
use crate::slab::{self, SlabManager};
use crate::util::align;

pub struct Pmm<P: Platform> {
    buddy: BuddyAllocator,
    managers: *mut SlabManager,
    cpu_count: usize,
    _platform: PhantomData<P>,
}

// SAFETY: all mutable state behind `managers` and `buddy` is guarded by their
// own internal spin locks; `Pmm` itself adds no unsynchronized mutable state.
unsafe impl<P: Platform> Sync for Pmm<P> {}
unsafe impl<P: Platform> Send for Pmm<P> {}

impl<P: Platform> Pmm<P> {
    pub const fn new() -> Self {
        Self {
            buddy: BuddyAllocator::new(),
            managers: null_mut(),
            cpu_count: 0,
            _platform: PhantomData,
        }
    }

    /// Carve the slab manager table from `[heap_start, heap_end)`, hand the
    /// remainder to the buddy allocator, then reserve each manager's INITIAL
    /// chunks. Must be called exactly once, with `self` already at its final
    /// (never-moved-again) address, before any other call.
    pub fn init(&mut self, heap_start: usize, heap_end: usize) {
        let cpu_count = P::cpu_count().max(1);
        let table_bytes = size_of::<SlabManager>() * cpu_count;
        let table_start = align::align_up_of::<SlabManager>(heap_start);
        let table_end = table_start + table_bytes;
        debug_assert!(table_end <= heap_end, "heap too small for the slab manager table");
        log::debug!(
            "pmm: reserving slab manager table for {} cpu(s), {} bytes at {:#x}",
            cpu_count, table_bytes, table_start
        );

        let managers = table_start as *mut SlabManager;
        for i in 0..cpu_count {
            unsafe { managers.add(i).write(SlabManager::new()) };
        }
        self.managers = managers;
        self.cpu_count = cpu_count;

        self.buddy.init(table_end, heap_end);
        log::debug!("pmm: buddy heap spans {:#x}..{:#x}", table_end, heap_end);

        for i in 0..cpu_count {
            unsafe { (*managers.add(i)).init(&self.buddy) };
        }
    }

    fn manager(&self) -> &SlabManager {
        let id = P::cpu_current();
        debug_assert!(id < self.cpu_count, "cpu id out of range for the manager table");
        unsafe { &*self.managers.add(id) }
    }

    /// Allocate `size` bytes. A `size` of `0` is serviced as a class-8 cell
    /// (the smallest slab class), so it returns a valid, freeable, non-null
    /// pointer rather than a null one. Returns `0` for `size > MAX_REQUEST` or
    /// on exhaustion of the relevant pool.
    pub fn alloc(&self, size: usize) -> usize {
        if size > MAX_REQUEST {
            return 0;
        }
        let size = size.max(1);
        let addr = if let Some(class) = slab::class_of(size) {
            self.manager().allocate(class, &self.buddy)
        } else {
            // Clamp up to a full page first, as the original does
            // (`size = size >= PAGE_SIZE ? size : PAGE_SIZE;`), so the
            // returned pointer is page-aligned rather than aligned to the
            // next power of two above an arbitrary sub-page `size`.
            self.buddy.allocate(size.max(PAGE_SIZE))
        };
        if addr == 0 {
            log::warn!("pmm: allocation of {} bytes failed", size);
        }
        addr
    }

    /// Free a pointer returned by [`Self::alloc`]. A null pointer, a pointer
    /// not recognized by either allocator, or a double free is logged and
    /// silently ignored; the facade never panics on a bad `free`.
    pub fn free(&self, addr: usize) {
        if addr == 0 {
            return;
        }
        let header = slab::probe_header(addr);
        if header != 0 {
            match slab::deallocate(header, addr, &self.buddy) {
                Ok(()) => return,
                Err(e) => log::warn!("pmm: slab free of {:#x} declined: {}", addr, e),
            }
        }
        if let Err(e) = self.buddy.deallocate(addr) {
            log::warn!("pmm: buddy free of {:#x} declined: {}", addr, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SingleCpu;
    use std::boxed::Box;

    fn new_pmm(heap_size: usize) -> Box<Pmm<SingleCpu>> {
        let mem = vec![0u8; heap_size].leak();
        let start = mem.as_mut_ptr() as usize;
        let end = start + mem.len();
        let mut pmm = Box::new(Pmm::<SingleCpu>::new());
        pmm.init(start, end);
        pmm
    }

    #[test]
    fn small_request_round_trips_through_slab() {
        let pmm = new_pmm(1 << 24);
        let p = pmm.alloc(16);
        assert_ne!(p, 0);
        assert_eq!(p % 16, 0);
        pmm.free(p);
    }

    #[test]
    fn large_request_round_trips_through_buddy() {
        let pmm = new_pmm(1 << 24);
        let p = pmm.alloc(4096);
        assert_ne!(p, 0);
        pmm.free(p);
    }

    #[test]
    fn zero_size_request_is_serviced_as_class_8() {
        let pmm = new_pmm(1 << 20);
        let p = pmm.alloc(0);
        assert_ne!(p, 0);
        assert_eq!(p % 8, 0);
        pmm.free(p);
    }

    #[test]
    fn oversized_request_returns_null() {
        let pmm = new_pmm(1 << 20);
        assert_eq!(pmm.alloc(MAX_REQUEST + 1), 0);
    }

    #[test]
    fn double_free_is_silently_declined() {
        let pmm = new_pmm(1 << 22);
        let p = pmm.alloc(32);
        assert_ne!(p, 0);
        pmm.free(p);
        pmm.free(p); // must not panic
    }

    #[test]
    fn free_of_misaligned_pointer_is_silently_declined() {
        let pmm = new_pmm(1 << 22);
        let p = pmm.alloc(64);
        assert_ne!(p, 0);
        pmm.free(p + 1); // must not panic, and must not corrupt the real block
        pmm.free(p);
    }
}
