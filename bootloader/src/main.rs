#![no_main]
#![no_std]
#![warn(clippy::pedantic, clippy::nursery)]

use bootloader::{
    BootConfig, BootResult, BootStatus, KernelEntry, config::SERIAL_BASE, logging,
    serial::OmapUart,
};
use elf32::{PhysAddr, RawMemory};
use log::{debug, error, info};

/// Word-aligned storage, so that ELF headers can be read in place.
#[repr(C, align(4))]
struct Aligned<Bytes: ?Sized> {
    bytes: Bytes,
}

/// The kernel, linked into this binary at build time.
static KERNEL_IMAGE: &Aligned<[u8]> = &Aligned {
    bytes: *include_bytes!(env!("KERNEL_IMAGE_PATH")),
};

#[panic_handler]
/// Handles panics in the boot stage by logging an error message and halting.
fn panic(panic_info: &core::panic::PanicInfo) -> ! {
    error!("[PANIC]: {}", panic_info.message());

    #[cfg(debug_assertions)]
    if let Some(location) = panic_info.location() {
        error!(
            "Panic occured in file '{}' at line {}",
            location.file(),
            location.line()
        );
    }

    halt()
}

fn halt() -> ! {
    loop {
        // Safety:
        // Waiting for an interrupt has no effect on memory.
        #[cfg(target_arch = "arm")]
        unsafe {
            core::arch::asm!("wfi", options(nomem, nostack, preserves_flags));
        };
        #[cfg(not(target_arch = "arm"))]
        core::hint::spin_loop();
    }
}

fn load_embedded_kernel() -> BootResult {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "The boot stage runs on a 32-bit machine"
    )]
    let image_address = PhysAddr::new(KERNEL_IMAGE.bytes.as_ptr() as usize as u32);

    // Safety:
    // The MMU is off. `BootConfig::DEFAULT` keeps segments out of the reserved region
    // holding this stage, and `load_kernel` rejects segments overlapping the image.
    let mut memory = unsafe { RawMemory::new() };

    bootloader::load_kernel(
        &KERNEL_IMAGE.bytes,
        image_address,
        &BootConfig::DEFAULT,
        &mut memory,
    )
}

#[unsafe(no_mangle)]
/// Loads the embedded kernel without starting it.
///
/// On success, the returned status holds the location of the kernel's ELF header.
pub extern "C" fn stage2_load() -> BootStatus {
    BootStatus::from(&load_embedded_kernel())
}

#[unsafe(export_name = "_start")]
/// Entry point, jumped to by the first boot stage with a valid stack and UART3 configured.
pub extern "C" fn stage2_entry() -> ! {
    // Safety:
    // UART3 is only ever driven by the logger.
    if logging::install(unsafe { OmapUart::new(SERIAL_BASE) }).is_err() {
        halt();
    }

    info!("Stage 2 boot loader is starting");
    debug!("Boot loader running in debug mode");

    let kernel = match load_embedded_kernel() {
        Ok(kernel) => kernel,
        Err(error) => {
            error!("Failed to load the kernel: {error}");
            halt();
        }
    };

    info!("Starting kernel at {:#x}", kernel.entry_point.as_u32());

    // Safety:
    // The entry point lies inside the segments that were just loaded and the kernel
    // follows the `KernelEntry` calling convention.
    let entry = unsafe {
        core::mem::transmute::<usize, KernelEntry>(kernel.entry_point.as_u32() as usize)
    };
    entry(BootConfig::DEFAULT.bootstrap_address.as_ptr())
}
