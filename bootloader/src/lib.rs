//! Second boot stage.
//!
//! Validates the ELF32 kernel embedded in the boot binary, places its segments at their
//! physical addresses and prepares the bootstrap record handed over to it.
#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic, clippy::nursery)]

pub mod boot;
pub mod config;
pub mod handoff;
pub mod logging;
pub mod serial;
pub mod status;

pub use boot::{BootError, BootResult, LoadedKernel, boot};
pub use config::BootConfig;
pub use handoff::BootstrapInfo;
pub use status::{BootCode, BootStatus};

use elf32::{MemoryRange, PhysAddr, PhysicalMemory};

/// Signature of the kernel entry point.
pub type KernelEntry = extern "C" fn(*const BootstrapInfo) -> !;

/// Boots `image` and, on success, writes the bootstrap record at
/// `config.bootstrap_address`.
///
/// `image_address` is where `image` itself lives in physical memory. No segment may be
/// placed over it, and it is reported to the kernel so that it can find its own
/// section headers.
///
/// # Errors
///
/// See `boot`. A segment overlapping the image fails with `LoadError::AddressMismatch`.
/// The bootstrap record is only written after a successful load.
pub fn load_kernel<M: PhysicalMemory>(
    image: &[u8],
    image_address: PhysAddr,
    config: &BootConfig,
    memory: &mut M,
) -> BootResult {
    let source = MemoryRange::new(
        image_address.as_u64(),
        image_address.as_u64() + image.len() as u64,
    );
    let kernel = boot(image, &config.with_image(source), memory)?;

    BootstrapInfo::for_kernel(&kernel, image_address, image.len())
        .write_to(memory, config.bootstrap_address);
    log::debug!(
        "Bootstrap information written at {:#x}",
        config.bootstrap_address.as_u32()
    );

    Ok(kernel)
}
