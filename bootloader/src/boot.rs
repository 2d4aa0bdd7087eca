//! Boot dispatcher: validates the embedded kernel and places it in memory.

use crate::config::BootConfig;
use elf32::{
    ElfHeader, ElfImage, LoadError, LoadedSegments, ParseError, PhysAddr, PhysicalMemory,
    SectionTable, SegmentLoader,
};
use log::{debug, info, trace, warn};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BootError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type BootResult = Result<LoadedKernel, BootError>;

/// A kernel resting in physical memory, ready to be jumped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedKernel {
    /// Final location of the kernel's ELF header
    pub header_location: PhysAddr,
    pub entry_point: PhysAddr,
    pub header: ElfHeader,
    /// Section header table of the embedded image, if it lies within the image
    pub sections: Option<SectionTable>,
    pub segments: LoadedSegments,
}

/// Parses `image` and loads all its loadable segments.
///
/// A parse failure happens before any write. A load failure stops the boot at the
/// failing segment, segments placed before it are left as they are.
///
/// # Errors
///
/// Returns the first `ParseError` or `LoadError` encountered, unchanged.
pub fn boot<M: PhysicalMemory>(image: &[u8], config: &BootConfig, memory: &mut M) -> BootResult {
    let elf = ElfImage::parse(image, config.machine)?;
    info!(
        "Kernel image parsed: {} program headers, entry point {:#x}",
        elf.header().ph_count,
        elf.entry_point()
    );

    let mut loader = SegmentLoader::new(image, config.layout(), memory);
    for ph in elf.program_headers() {
        if !ph.is_loadable() {
            trace!("Skipping {:?} segment", ph.kind);
            continue;
        }

        let segment = loader.load_segment(&ph)?;
        debug!(
            "Segment [{}] loaded at {:#x}: {:#x} bytes copied, {:#x} bytes zeroed",
            ph.flags,
            segment.destination.as_u32(),
            segment.copied,
            segment.zeroed
        );
    }
    let segments = loader.into_segments();

    let sections = elf.section_table().ok();
    if sections.is_none() {
        warn!("Section header table lies outside of the kernel image");
    }

    info!("Kernel loaded in {} segments", segments.len());

    Ok(LoadedKernel {
        header_location: config.load_address,
        entry_point: PhysAddr::new(elf.entry_point()),
        header: *elf.header(),
        sections,
        segments,
    })
}
