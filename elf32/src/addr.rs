//! Physical addresses and address ranges of a 32-bit machine.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(u32);

impl PhysAddr {
    #[must_use]
    #[inline]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    #[must_use]
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[must_use]
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0 as u64
    }

    #[must_use]
    #[inline]
    pub const fn as_ptr<T>(self) -> *const T {
        self.0 as usize as _
    }

    #[must_use]
    #[inline]
    pub const fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as usize as _
    }

    #[must_use]
    #[inline]
    /// Adds `rhs`, returning `None` if the result leaves the 32-bit address space.
    pub const fn checked_add(self, rhs: u32) -> Option<Self> {
        match self.0.checked_add(rhs) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }
}

impl From<PhysAddr> for u32 {
    #[inline]
    fn from(addr: PhysAddr) -> Self {
        addr.0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// A half-open range of physical memory, `[start, end)`.
///
/// Bounds are kept as `u64` so that a range ending exactly at the top of
/// the 32-bit address space can be represented.
///
/// It is guaranteed that `start <= end`.
pub struct MemoryRange {
    start: u64,
    end: u64,
}

impl MemoryRange {
    #[must_use]
    #[inline]
    pub const fn new(start: u64, end: u64) -> Self {
        assert!(start <= end, "Invalid range");
        Self { start, end }
    }

    #[must_use]
    #[inline]
    /// Creates the range of `len` bytes starting at `start`.
    pub const fn from_len(start: PhysAddr, len: u32) -> Self {
        Self {
            start: start.as_u64(),
            end: start.as_u64() + len as u64,
        }
    }

    #[must_use]
    #[inline]
    pub const fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    #[inline]
    pub const fn end(&self) -> u64 {
        self.end
    }

    #[must_use]
    #[inline]
    pub const fn size(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    #[inline]
    /// Returns true if both ranges share at least one byte.
    pub const fn overlaps(&self, other: &Self) -> bool {
        // 0-sized ranges never overlap anything
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}
