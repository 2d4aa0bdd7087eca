//! ELF32 program headers.

use crate::addr::PhysAddr;
use xmas_elf::{header::Header, program};

pub use xmas_elf::program::{Flags as SegmentFlags, Type as SegmentType};

/// Size of an ELF32 program header record.
pub const PROGRAM_HEADER_SIZE: usize = core::mem::size_of::<program::ProgramHeader32>();

/// One decoded entry of the program header table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHeader {
    /// `None` for segment types `xmas-elf` does not recognize
    pub kind: Option<SegmentType>,
    /// Offset of the segment's bytes in the image
    pub offset: u32,
    pub virtual_addr: u32,
    pub physical_addr: PhysAddr,
    /// Bytes stored in the image
    pub file_size: u32,
    /// Bytes occupied in memory, `file_size` included
    pub mem_size: u32,
    pub flags: SegmentFlags,
    pub align: u32,
}

impl From<&program::ProgramHeader32> for ProgramHeader {
    fn from(ph: &program::ProgramHeader32) -> Self {
        Self {
            kind: ph.get_type().ok(),
            offset: ph.offset,
            virtual_addr: ph.virtual_addr,
            physical_addr: PhysAddr::new(ph.physical_addr),
            file_size: ph.file_size,
            mem_size: ph.mem_size,
            flags: ph.flags,
            align: ph.align,
        }
    }
}

impl ProgramHeader {
    #[must_use]
    #[inline]
    pub fn is_loadable(&self) -> bool {
        self.kind == Some(SegmentType::Load)
    }

    #[must_use]
    #[inline]
    /// Number of bytes that must be zero-filled after the file bytes.
    ///
    /// Saturates to zero for segments declaring more file bytes than memory bytes.
    pub const fn zero_fill_size(&self) -> u32 {
        self.mem_size.saturating_sub(self.file_size)
    }
}

/// Lazy iterator over a program header table.
///
/// The table bounds and alignment are validated by `ElfImage::parse`, so each entry
/// is read in place by `xmas-elf` without any further checks.
#[derive(Debug, Clone)]
pub struct ProgramHeaders<'a> {
    input: &'a [u8],
    header: Header<'a>,
    index: u16,
    count: u16,
}

impl<'a> ProgramHeaders<'a> {
    pub(crate) const fn new(input: &'a [u8], header: Header<'a>, count: u16) -> Self {
        Self {
            input,
            header,
            index: 0,
            count,
        }
    }
}

impl Iterator for ProgramHeaders<'_> {
    type Item = ProgramHeader;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let index = self.index;
        self.index += 1;

        match program::parse_program_header(self.input, self.header, index) {
            Ok(program::ProgramHeader::Ph32(ph)) => Some(ProgramHeader::from(ph)),
            // Ruled out by `ElfImage::parse`
            Ok(program::ProgramHeader::Ph64(_)) | Err(_) => {
                self.index = self.count;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.count - self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgramHeaders<'_> {}
