//! Declined-free reasons. These never cross the public `alloc`/`free` boundary —
//! the facade follows the null-pointer / silent-no-op convention there — but they
//! let the internal allocators log *why* a free was rejected and let tests assert
//! on the specific failure mode.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeError {
    /// Header magic did not match the expected constant.
    BadMagic,
    /// The buddy registry has no order recorded for this address.
    NotRegistered,
    /// The slab's `type_size` does not match any known class.
    TypeMismatch,
    /// The target address is not aligned to the slab's cell size.
    Misaligned,
    /// The computed bitmap group index is outside `0..groups`.
    GroupOutOfRange,
    /// The cell's bit was already clear (double free).
    AlreadyFree,
}

impl fmt::Display for FreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FreeError::BadMagic => "header magic mismatch",
            FreeError::NotRegistered => "address not present in buddy registry",
            FreeError::TypeMismatch => "slab type_size matches no known class",
            FreeError::Misaligned => "address misaligned for slab cell size",
            FreeError::GroupOutOfRange => "bitmap group index out of range",
            FreeError::AlreadyFree => "cell already free (double free)",
        };
        f.write_str(msg)
    }
}
