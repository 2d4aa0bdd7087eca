//! Placement of loadable segments at their physical addresses.

use crate::{
    LoadResult,
    addr::{MemoryRange, PhysAddr},
    error::LoadError,
    memory::PhysicalMemory,
    program::ProgramHeader,
};

/// Maximum number of loadable segments a single image may carry.
pub const MAX_LOAD_SEGMENTS: usize = 16;

/// Where segments are allowed to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLayout {
    /// Lowest address a segment may occupy
    load_base: PhysAddr,
    /// Exclusive upper bound of usable memory
    limit: Option<u64>,
    /// Memory owned by the loader itself
    reserved: Option<MemoryRange>,
    /// Memory holding the image segments are read from
    source: Option<MemoryRange>,
    /// Added to every declared physical address
    relocation: u32,
}

impl LoadLayout {
    #[must_use]
    #[inline]
    /// Creates a non-relocatable layout starting at `load_base` with no upper bound.
    pub const fn new(load_base: PhysAddr) -> Self {
        Self {
            load_base,
            limit: None,
            reserved: None,
            source: None,
            relocation: 0,
        }
    }

    #[must_use]
    #[inline]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_reserved(mut self, reserved: MemoryRange) -> Self {
        self.reserved = Some(reserved);
        self
    }

    #[must_use]
    #[inline]
    /// Declares where the image itself lives, so that no segment is copied over it.
    pub const fn with_source(mut self, source: MemoryRange) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    #[inline]
    /// Places every segment `relocation` bytes above its declared physical address.
    pub const fn with_relocation(mut self, relocation: u32) -> Self {
        self.relocation = relocation;
        self
    }

    #[must_use]
    #[inline]
    pub const fn load_base(&self) -> PhysAddr {
        self.load_base
    }

    #[must_use]
    #[inline]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    #[inline]
    pub const fn reserved(&self) -> Option<MemoryRange> {
        self.reserved
    }

    #[must_use]
    #[inline]
    pub const fn source(&self) -> Option<MemoryRange> {
        self.source
    }

    #[must_use]
    #[inline]
    pub const fn relocation(&self) -> u32 {
        self.relocation
    }
}

/// Record of one placed segment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadedSegment {
    pub destination: PhysAddr,
    /// Bytes copied from the image
    pub copied: u32,
    /// Bytes zero-filled right after the copied ones
    pub zeroed: u32,
}

impl LoadedSegment {
    #[must_use]
    #[inline]
    /// The whole memory footprint of the segment.
    pub const fn range(&self) -> MemoryRange {
        MemoryRange::new(
            self.destination.as_u64(),
            self.destination.as_u64() + self.copied as u64 + self.zeroed as u64,
        )
    }

    #[must_use]
    #[inline]
    /// The part of the segment backed by image bytes.
    pub const fn file_range(&self) -> MemoryRange {
        MemoryRange::from_len(self.destination, self.copied)
    }
}

#[derive(Debug, Clone, Copy)]
/// An array-backed list of placed segments, in load order.
pub struct LoadedSegments {
    records: [LoadedSegment; MAX_LOAD_SEGMENTS],
    used: usize,
}

impl PartialEq for LoadedSegments {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for LoadedSegments {}

impl Default for LoadedSegments {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadedSegments {
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self {
            records: [LoadedSegment {
                destination: PhysAddr::new(0),
                copied: 0,
                zeroed: 0,
            }; MAX_LOAD_SEGMENTS],
            used: 0,
        }
    }

    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.used
    }

    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }

    #[must_use]
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.used == MAX_LOAD_SEGMENTS
    }

    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[LoadedSegment] {
        &self.records[..self.used]
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, LoadedSegment> {
        self.as_slice().iter()
    }

    fn push(&mut self, record: LoadedSegment) -> LoadResult<()> {
        let slot = self
            .records
            .get_mut(self.used)
            .ok_or(LoadError::TooManySegments)?;
        *slot = record;
        self.used += 1;
        Ok(())
    }
}

impl<'s> IntoIterator for &'s LoadedSegments {
    type Item = &'s LoadedSegment;
    type IntoIter = core::slice::Iter<'s, LoadedSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Copies segments out of an image into physical memory.
///
/// Segments must be submitted in program header order: a segment may only
/// overlap the zero-filled tail of the ones placed before it.
pub struct SegmentLoader<'a, 'm, M: PhysicalMemory> {
    image: &'a [u8],
    layout: LoadLayout,
    memory: &'m mut M,
    placed: LoadedSegments,
}

impl<'a, 'm, M: PhysicalMemory> SegmentLoader<'a, 'm, M> {
    #[must_use]
    #[inline]
    pub const fn new(image: &'a [u8], layout: LoadLayout, memory: &'m mut M) -> Self {
        Self {
            image,
            layout,
            memory,
            placed: LoadedSegments::new(),
        }
    }

    /// Places one segment, whatever its type.
    ///
    /// Every check is performed before the first byte is written, so a failing segment
    /// leaves memory untouched. Segments placed by earlier calls are not rolled back.
    ///
    /// A segment with no memory bytes occupies nothing: it is accepted wherever it points,
    /// nothing is written and it is not recorded.
    ///
    /// # Errors
    ///
    /// - `LoadError::InvalidSegment` if the segment declares more file bytes than memory bytes.
    /// - `LoadError::AddressMismatch` if the destination is outside the layout, hits the
    ///   reserved range or the source image, or overwrites file bytes of an earlier segment.
    /// - `LoadError::Truncated` if the segment's bytes are not all in the image.
    /// - `LoadError::TooManySegments` if `MAX_LOAD_SEGMENTS` segments are already placed.
    pub fn load_segment(&mut self, ph: &ProgramHeader) -> LoadResult<LoadedSegment> {
        if ph.file_size > ph.mem_size {
            return Err(LoadError::InvalidSegment);
        }
        if ph.mem_size == 0 {
            return Ok(LoadedSegment {
                destination: PhysAddr::new(
                    ph.physical_addr
                        .as_u32()
                        .wrapping_add(self.layout.relocation),
                ),
                copied: 0,
                zeroed: 0,
            });
        }

        let destination = ph
            .physical_addr
            .checked_add(self.layout.relocation)
            .ok_or(LoadError::AddressMismatch)?;
        let record = LoadedSegment {
            destination,
            copied: ph.file_size,
            zeroed: ph.zero_fill_size(),
        };
        self.check_destination(&record)?;

        let file_end = u64::from(ph.offset) + u64::from(ph.file_size);
        if file_end > self.image.len() as u64 {
            return Err(LoadError::Truncated);
        }

        if self.placed.is_full() {
            return Err(LoadError::TooManySegments);
        }

        let start = ph.offset as usize;
        let file_data = &self.image[start..start + ph.file_size as usize];
        self.memory.copy_data(destination, file_data);
        // Only wraps for an empty tail ending exactly at the top of memory
        let tail = PhysAddr::new(destination.as_u32().wrapping_add(record.copied));
        self.memory.zero_region(tail, record.zeroed);

        self.placed.push(record)?;
        Ok(record)
    }

    /// Places every loadable segment of `headers`, in order, skipping other types.
    ///
    /// # Errors
    ///
    /// Stops at the first segment that fails to load, see `load_segment`.
    pub fn load_all<I>(mut self, headers: I) -> LoadResult<LoadedSegments>
    where
        I: IntoIterator<Item = ProgramHeader>,
    {
        for ph in headers.into_iter().filter(ProgramHeader::is_loadable) {
            self.load_segment(&ph)?;
        }
        Ok(self.placed)
    }

    #[must_use]
    #[inline]
    pub const fn into_segments(self) -> LoadedSegments {
        self.placed
    }

    fn check_destination(&self, record: &LoadedSegment) -> LoadResult<()> {
        let range = record.range();

        if range.end() > 1 << 32 || range.start() < self.layout.load_base.as_u64() {
            return Err(LoadError::AddressMismatch);
        }
        if self.layout.limit.is_some_and(|limit| range.end() > limit) {
            return Err(LoadError::AddressMismatch);
        }
        if self
            .layout
            .reserved
            .is_some_and(|reserved| reserved.overlaps(&range))
        {
            return Err(LoadError::AddressMismatch);
        }
        if self
            .layout
            .source
            .is_some_and(|source| source.overlaps(&range))
        {
            return Err(LoadError::AddressMismatch);
        }
        if self
            .placed
            .iter()
            .any(|earlier| earlier.file_range().overlaps(&range))
        {
            return Err(LoadError::AddressMismatch);
        }

        Ok(())
    }
}
