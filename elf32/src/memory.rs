//! Access to the physical memory the kernel is loaded into.
pub use crate::addr::PhysAddr;

/// Abstract interface for writes into physical memory.
///
/// The loader validates every destination before calling into this trait,
/// so implementations do not have to repeat bounds checks.
pub trait PhysicalMemory {
    /// Copy `src` to the physical range starting at `dest`.
    fn copy_data(&mut self, dest: PhysAddr, src: &[u8]);

    /// Fill `len` bytes starting at `dest` with zeroes.
    fn zero_region(&mut self, dest: PhysAddr, len: u32);
}

/// Identity-mapped physical memory, written through raw pointers.
#[derive(Debug)]
pub struct RawMemory {
    _private: (),
}

impl RawMemory {
    #[must_use]
    #[inline]
    /// Creates a handle writing straight to physical addresses.
    ///
    /// # Safety
    ///
    /// Physical memory must be identity mapped (or the MMU disabled), and every range
    /// the loader is allowed to write to must be backed by RAM that nothing else uses,
    /// including the code, stack and embedded image of the caller.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl PhysicalMemory for RawMemory {
    fn copy_data(&mut self, dest: PhysAddr, src: &[u8]) {
        unsafe { bootmem::copy(dest.as_mut_ptr(), src.as_ptr(), src.len()) };
    }

    fn zero_region(&mut self, dest: PhysAddr, len: u32) {
        unsafe { bootmem::fill(dest.as_mut_ptr(), 0, len as usize) };
    }
}
