//! C runtime symbols for freestanding targets.
//!
//! The compiler emits calls to these for struct copies and zero-initialisation,
//! so they have to be available from the very first instruction of the boot stage.

use core::ffi::c_int;

#[unsafe(no_mangle)]
/// # Safety
///
/// See [`crate::fill`].
pub unsafe extern "C" fn memset(dst: *mut u8, c: c_int, n: usize) -> *mut u8 {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "C semantics")]
    let value = c as u8;
    unsafe { crate::fill(dst, value, n) };
    dst
}

#[unsafe(no_mangle)]
/// # Safety
///
/// See [`crate::copy`]. Overlapping ranges are undefined behaviour, as in C.
pub unsafe extern "C" fn memcpy(dst: *mut u8, src: *const u8, n: usize) -> *mut u8 {
    unsafe { crate::copy(dst, src, n) };
    dst
}

#[unsafe(no_mangle)]
/// # Safety
///
/// See [`crate::move_bytes`].
pub unsafe extern "C" fn memmove(dst: *mut u8, src: *const u8, n: usize) -> *mut u8 {
    unsafe { crate::move_bytes(dst, src, n) };
    dst
}
