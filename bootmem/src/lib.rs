//! Byte fill and byte copy over raw physical addresses.
//!
//! These primitives run before anything else in the boot stage: there is no allocator,
//! no runtime initialisation and no bounds checking beyond the length supplied by the
//! caller. Validating that a destination is writable is the job of the code calling them.
//!
//! ## Example
//!
//! ```rust
//! let mut buffer = [0xFF_u8; 8];
//!
//! unsafe { bootmem::fill(buffer.as_mut_ptr(), 0, 4) };
//! assert_eq!(buffer, [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
//!
//! let src = [1_u8, 2, 3, 4];
//! unsafe { bootmem::copy(buffer.as_mut_ptr().add(4), src.as_ptr(), src.len()) };
//! assert_eq!(buffer, [0, 0, 0, 0, 1, 2, 3, 4]);
//! ```
#![cfg_attr(not(test), no_std)]
// The loops below must never be turned into calls to `memset`/`memcpy`,
// which this crate defines itself on bare-metal targets.
#![no_builtins]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic, clippy::nursery)]

#[cfg(target_os = "none")]
mod symbols;

/// Writes `value` into `len` consecutive bytes starting at `dst`.
///
/// A `len` of zero is a no-op and `dst` is not touched.
///
/// # Safety
///
/// `dst` must be valid for writes of `len` bytes and must not be accessed concurrently.
#[inline]
pub unsafe extern "C" fn fill(dst: *mut u8, value: u8, len: usize) {
    for i in 0..len {
        unsafe { dst.add(i).write(value) };
    }
}

/// Copies `len` bytes from `src` to `dst`, front to back.
///
/// A `len` of zero is a no-op.
///
/// # Safety
///
/// - `src` must be valid for reads of `len` bytes.
/// - `dst` must be valid for writes of `len` bytes.
/// - The two ranges must NOT overlap. Use [`move_bytes`] when they may.
#[inline]
pub unsafe extern "C" fn copy(dst: *mut u8, src: *const u8, len: usize) {
    debug_assert!(
        len == 0 || !ranges_overlap(dst.addr(), src.addr(), len),
        "`copy` called on overlapping ranges"
    );
    for i in 0..len {
        unsafe { dst.add(i).write(src.add(i).read()) };
    }
}

/// Copies `len` bytes from `src` to `dst`, correctly handling overlapping ranges.
///
/// # Safety
///
/// - `src` must be valid for reads of `len` bytes.
/// - `dst` must be valid for writes of `len` bytes.
#[inline]
pub unsafe extern "C" fn move_bytes(dst: *mut u8, src: *const u8, len: usize) {
    if dst.addr() <= src.addr() || dst.addr() >= src.addr().wrapping_add(len) {
        // Destination starts before the source (or after its end):
        // a forward walk never reads a byte it already overwrote.
        for i in 0..len {
            unsafe { dst.add(i).write(src.add(i).read()) };
        }
    } else {
        for i in (0..len).rev() {
            unsafe { dst.add(i).write(src.add(i).read()) };
        }
    }
}

#[must_use]
#[inline]
const fn ranges_overlap(a: usize, b: usize, len: usize) -> bool {
    a < b.wrapping_add(len) && b < a.wrapping_add(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fill_zero_len_is_noop() {
        let mut buffer = [0x5A_u8; 16];
        unsafe { fill(buffer.as_mut_ptr(), 0, 0) };
        assert_eq!(buffer, [0x5A; 16]);
    }

    #[test]
    fn test_copy_zero_len_is_noop() {
        let mut buffer = [0x5A_u8; 16];
        let src = [0_u8; 16];
        unsafe { copy(buffer.as_mut_ptr(), src.as_ptr(), 0) };
        assert_eq!(buffer, [0x5A; 16]);
    }

    #[test]
    fn test_fill_stays_in_bounds() {
        let mut buffer = [0_u8; 16];
        unsafe { fill(buffer.as_mut_ptr().add(4), 0xAA, 8) };
        assert_eq!(&buffer[..4], &[0; 4]);
        assert_eq!(&buffer[4..12], &[0xAA; 8]);
        assert_eq!(&buffer[12..], &[0; 4]);
    }

    #[test]
    fn test_copy() {
        let src: [u8; 8] = core::array::from_fn(|i| u8::try_from(i).unwrap());
        let mut dst = [0_u8; 8];
        unsafe { copy(dst.as_mut_ptr(), src.as_ptr(), src.len()) };
        assert_eq!(dst, src);
    }

    #[test]
    fn test_move_forward_overlap() {
        let mut buffer = [1_u8, 2, 3, 4, 5, 6, 7, 8];
        let base = buffer.as_mut_ptr();
        unsafe { move_bytes(base, base.add(2), 6) };
        assert_eq!(buffer, [3, 4, 5, 6, 7, 8, 7, 8]);
    }

    #[test]
    fn test_move_backward_overlap() {
        let mut buffer = [1_u8, 2, 3, 4, 5, 6, 7, 8];
        let base = buffer.as_mut_ptr();
        unsafe { move_bytes(base.add(2), base, 6) };
        assert_eq!(buffer, [1, 2, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_ranges_overlap() {
        assert!(ranges_overlap(0x1000, 0x1004, 8));
        assert!(ranges_overlap(0x1004, 0x1000, 8));
        assert!(!ranges_overlap(0x1000, 0x1008, 8));
        assert!(!ranges_overlap(0x1008, 0x1000, 8));
    }

    proptest! {
        #[test]
        fn prop_fill_is_idempotent(
            initial in proptest::collection::vec(any::<u8>(), 1..256),
            value in any::<u8>(),
            start in 0_usize..256,
            len in 0_usize..256,
        ) {
            let start = start % initial.len();
            let len = len.min(initial.len() - start);

            let mut once = initial.clone();
            let mut twice = initial;
            unsafe {
                fill(once.as_mut_ptr().add(start), value, len);
                fill(twice.as_mut_ptr().add(start), value, len);
                fill(twice.as_mut_ptr().add(start), value, len);
            }
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_zero_length_leaves_memory_untouched(
            initial in proptest::collection::vec(any::<u8>(), 1..128),
            value in any::<u8>(),
            at in 0_usize..128,
        ) {
            let at = at % initial.len();
            let src = initial.iter().map(|b| !b).collect::<Vec<_>>();

            let mut memory = initial.clone();
            unsafe {
                fill(memory.as_mut_ptr().add(at), value, 0);
                copy(memory.as_mut_ptr().add(at), src.as_ptr(), 0);
            }
            prop_assert_eq!(memory, initial);
        }

        #[test]
        fn prop_copy_matches_source(
            src in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let mut dst = vec![0_u8; src.len()];
            unsafe { copy(dst.as_mut_ptr(), src.as_ptr(), src.len()) };
            prop_assert_eq!(dst, src);
        }
    }
}
