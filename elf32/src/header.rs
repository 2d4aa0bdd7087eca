//! ELF32 file header and image validation.

use crate::{
    ParseResult,
    error::ParseError,
    program::{PROGRAM_HEADER_SIZE, ProgramHeaders},
};
use xmas_elf::{
    ElfFile,
    header::{self, Header, HeaderPt2},
};

pub use xmas_elf::header::{Machine, Type as ElfType};

/// `0x7F 'E' 'L' 'F'`
pub const ELF_MAGIC: [u8; 4] = header::MAGIC;
/// Size of the fixed ELF32 file header.
pub const HEADER_SIZE: usize = 52;

const CLASS_OFFSET: usize = 4;
const DATA_OFFSET: usize = 5;
const ELFCLASS32: u8 = 1;
const ELFDATA2LSB: u8 = 1;
/// Headers are read in place, so the image and its program header table
/// must sit on word boundaries.
const WORD: u16 = 4;

/// The decoded ELF32 file header.
///
/// Class and data encoding are not kept: `ElfImage::parse` only accepts
/// little-endian 32-bit images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfHeader {
    pub elf_type: ElfType,
    pub machine: Machine,
    pub version: u32,
    /// Virtual address of the first instruction to run
    pub entry_point: u32,
    pub flags: u32,
    pub ph_offset: u32,
    pub ph_entry_size: u16,
    pub ph_count: u16,
    pub sh_offset: u32,
    pub sh_entry_size: u16,
    pub sh_count: u16,
    pub sh_string_index: u16,
}

impl ElfHeader {
    fn decode(header: &Header<'_>) -> ParseResult<Self> {
        let HeaderPt2::Header32(pt2) = header.pt2 else {
            return Err(ParseError::UnsupportedClass);
        };

        Ok(Self {
            elf_type: pt2.type_.as_type(),
            machine: pt2.machine.as_machine(),
            version: pt2.version,
            entry_point: pt2.entry_point,
            flags: pt2.flags,
            ph_offset: pt2.ph_offset,
            ph_entry_size: pt2.ph_entry_size,
            ph_count: pt2.ph_count,
            sh_offset: pt2.sh_offset,
            sh_entry_size: pt2.sh_entry_size,
            sh_count: pt2.sh_count,
            sh_string_index: pt2.sh_str_index,
        })
    }

    /// Whether every entry of the program header table can be read in place.
    fn program_headers_are_readable(&self) -> bool {
        self.ph_count == 0
            || (usize::from(self.ph_entry_size) >= PROGRAM_HEADER_SIZE
                && self.ph_entry_size % WORD == 0
                && self.ph_offset != 0
                && self.ph_offset % u32::from(WORD) == 0)
    }
}

/// Location of the section header table inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTable {
    pub offset: u32,
    pub entry_size: u16,
    pub count: u16,
    pub string_index: u16,
}

/// A validated view over an in-memory ELF32 image.
///
/// Construction checks the header and the bounds of the program header table,
/// so iterating over program headers never reads outside of the buffer.
#[derive(Debug, Clone, Copy)]
pub struct ElfImage<'a> {
    input: &'a [u8],
    raw: Header<'a>,
    header: ElfHeader,
}

impl<'a> ElfImage<'a> {
    /// Validates `input` as an ELF32 image built for `machine`.
    ///
    /// # Errors
    ///
    /// Checks are performed in order and the first failing one is reported:
    /// magic, header length, class, data encoding, alignment of `input`, machine,
    /// layout of the program header table and finally its bounds.
    pub fn parse(input: &'a [u8], machine: Machine) -> ParseResult<Self> {
        if input.len() < ELF_MAGIC.len() || input[..ELF_MAGIC.len()] != ELF_MAGIC {
            return Err(ParseError::NotElf);
        }
        if input.len() < HEADER_SIZE {
            return Err(ParseError::Truncated);
        }
        if input[CLASS_OFFSET] != ELFCLASS32 {
            return Err(ParseError::UnsupportedClass);
        }
        if input[DATA_OFFSET] != ELFDATA2LSB {
            return Err(ParseError::UnsupportedEncoding);
        }
        if !input.as_ptr().cast::<u32>().is_aligned() {
            return Err(ParseError::Misaligned);
        }

        let elf = ElfFile::new(input).map_err(|_| ParseError::MalformedHeader)?;
        let header = ElfHeader::decode(&elf.header)?;

        if header.machine != machine {
            return Err(ParseError::WrongMachine);
        }
        if !header.program_headers_are_readable() {
            return Err(ParseError::MalformedHeader);
        }

        let table_end = u64::from(header.ph_offset)
            + u64::from(header.ph_entry_size) * u64::from(header.ph_count);
        if table_end > input.len() as u64 {
            return Err(ParseError::Truncated);
        }

        Ok(Self {
            input,
            raw: elf.header,
            header,
        })
    }

    #[must_use]
    #[inline]
    pub const fn header(&self) -> &ElfHeader {
        &self.header
    }

    #[must_use]
    #[inline]
    pub const fn entry_point(&self) -> u32 {
        self.header.entry_point
    }

    #[must_use]
    #[inline]
    /// Returns a fresh iterator over the program header table.
    ///
    /// Entries are decoded on demand; calling this again restarts from the first entry.
    pub const fn program_headers(&self) -> ProgramHeaders<'a> {
        ProgramHeaders::new(self.input, self.raw, self.header.ph_count)
    }

    /// Returns the location of the section header table.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Truncated` if the table does not fit in the image.
    pub fn section_table(&self) -> ParseResult<SectionTable> {
        let table_end = u64::from(self.header.sh_offset)
            + u64::from(self.header.sh_entry_size) * u64::from(self.header.sh_count);
        if table_end > self.input.len() as u64 {
            return Err(ParseError::Truncated);
        }

        Ok(SectionTable {
            offset: self.header.sh_offset,
            entry_size: self.header.sh_entry_size,
            count: self.header.sh_count,
            string_index: self.header.sh_string_index,
        })
    }
}
