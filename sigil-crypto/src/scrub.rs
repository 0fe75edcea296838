//! Volatile zeroization for sensitive buffers.

use std::ptr;

/// Types holding sensitive bytes that must be erased when released.
pub trait Scrubbed {
    fn scrub(&mut self);
}

/// Secure memset, guaranteed not to be elided or reordered.
///
/// # Safety
///
/// `dst..dst+count` must be properly allocated and writable.
#[inline(never)]
pub unsafe fn wipe(dst: *mut u8, count: usize) {
    for i in 0..count {
        ptr::write_volatile(dst.add(i), 0);
    }
}

impl Scrubbed for [u8] {
    fn scrub(&mut self) {
        unsafe { wipe(self.as_mut_ptr(), self.len()) }
    }
}

impl<const N: usize> Scrubbed for [u8; N] {
    fn scrub(&mut self) {
        unsafe { wipe(self.as_mut_ptr(), N) }
    }
}
