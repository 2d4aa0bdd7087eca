//! ELF32 parsing and loading for boot loaders.
//!
//! The crate validates a little-endian ELF32 image held in memory, reads its headers
//! with `xmas-elf` and places its loadable segments at their physical addresses,
//! through the `PhysicalMemory` trait.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use elf32::{ElfImage, LoadLayout, Machine, PhysAddr, RawMemory, SegmentLoader};
//!
//! # fn load(image: &[u8]) -> Option<u32> {
//! let elf = ElfImage::parse(image, Machine::Arm).ok()?;
//!
//! let mut memory = unsafe { RawMemory::new() };
//! let layout = LoadLayout::new(PhysAddr::new(0x8020_0000));
//! SegmentLoader::new(image, layout, &mut memory)
//!     .load_all(elf.program_headers())
//!     .ok()?;
//!
//! Some(elf.entry_point())
//! # }
//! ```
#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic, clippy::nursery)]

pub mod addr;
pub mod error;
pub mod header;
pub mod loader;
pub mod memory;
pub mod program;

pub use addr::{MemoryRange, PhysAddr};
pub use error::{LoadError, ParseError};
pub use header::{ElfHeader, ElfImage, ElfType, Machine, SectionTable};
pub use loader::{LoadLayout, LoadedSegment, LoadedSegments, MAX_LOAD_SEGMENTS, SegmentLoader};
pub use memory::{PhysicalMemory, RawMemory};
pub use program::{ProgramHeader, ProgramHeaders, SegmentFlags, SegmentType};

pub type ParseResult<T> = Result<T, ParseError>;
pub type LoadResult<T> = Result<T, LoadError>;
