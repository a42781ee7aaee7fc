//! A buddy-and-slab physical memory manager.
//!
//! Three layers, leaf first: [`buddy`] carves the managed heap into
//! power-of-two blocks; [`slab`] carves buddy-supplied chunks into fixed-size
//! cells for small, frequent allocations; [`facade`] ties the two together
//! with size-class dispatch on `alloc` and owner-identification on `free`.
//!
//! Two ways to use it: instantiate [`facade::Pmm`] directly (generic over a
//! [`platform::Platform`] impl, so tests and embedders can run several
//! independent instances side by side), or use the process-wide singleton
//! exposed at the crate root (`init`/`alloc`/`free`) for kernel code that
//! wants plain free functions without threading a reference through every
//! call site.
#![cfg_attr(not(test), no_std)]

pub mod buddy;
pub mod config;
pub mod error;
pub mod facade;
pub mod macros;
pub mod platform;
pub mod slab;
pub mod sync;
pub mod util;

use core::sync::atomic::{AtomicBool, Ordering};

use facade::Pmm;
use platform::{Platform, SingleCpu};

/// The [`Platform`] backing the process-wide singleton below. The generic
/// [`facade::Pmm`] type supports real multi-CPU hosts; the singleton picks a
/// single fixed `Platform` so it can be named as one concrete static, the way
/// the teacher crate's own `HEAP_BASE`-style globals are a single fixed type.
/// Kernels with more than one CPU should instantiate `Pmm<TheirPlatform>`
/// directly rather than going through these free functions.
pub type DefaultPlatform = SingleCpu;

static INITIALISED: AtomicBool = AtomicBool::new(false);
static PMM: Pmm<DefaultPlatform> = Pmm::new();

/// Initialise the process-wide allocator over `[heap_start, heap_end)`.
///
/// Calling this more than once, or calling [`alloc`]/[`free`] before calling
/// this, is a programmer error: both are reported via `debug_assert!` rather
/// than a `Result`, matching the teacher crate's own once-only globals.
pub fn init(heap_start: usize, heap_end: usize) {
    let already = INITIALISED.swap(true, Ordering::AcqRel);
    debug_assert!(!already, "pmm::init called twice");
    // SAFETY: `already` being false means no other caller has observed (or
    // will observe, since the flag is now set) `PMM` as initialised; the
    // swap above is the single synchronization point guarding this access.
    let pmm = unsafe { &mut *(&PMM as *const Pmm<DefaultPlatform> as *mut Pmm<DefaultPlatform>) };
    pmm.init(heap_start, heap_end);
}

/// Allocate `size` bytes from the process-wide allocator. See
/// [`facade::Pmm::alloc`].
pub fn alloc(size: usize) -> usize {
    debug_assert!(INITIALISED.load(Ordering::Acquire), "pmm::alloc called before pmm::init");
    PMM.alloc(size)
}

/// Free a pointer returned by [`alloc`]. See [`facade::Pmm::free`].
pub fn free(addr: usize) {
    debug_assert!(INITIALISED.load(Ordering::Acquire), "pmm::free called before pmm::init");
    PMM.free(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static SETUP: Once = Once::new();

    fn ensure_init() {
        SETUP.call_once(|| {
            let mem = vec![0u8; 1 << 24].leak();
            let start = mem.as_mut_ptr() as usize;
            let end = start + mem.len();
            init(start, end);
        });
    }

    #[test]
    fn singleton_round_trips_a_small_allocation() {
        ensure_init();
        let p = alloc(32);
        assert_ne!(p, 0);
        free(p);
    }
}
