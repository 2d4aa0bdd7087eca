//! Bootstrap information handed over to the kernel.
//!
//! The record follows the Multiboot 1 information layout. Only the ELF section fields
//! and the module fields are filled, everything else is zero.

use crate::boot::LoadedKernel;
use elf32::{PhysAddr, PhysicalMemory};

/// Slack added to the image size reported in `mods_count`.
const IMAGE_SIZE_SLACK: u32 = 0x1000;

#[repr(C, packed)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapInfo {
    pub flags: u32,
    pub mem_lower: u32,
    pub mem_upper: u32,
    pub boot_device: u32,
    pub cmdline: u32,
    /// Size of the embedded kernel image, plus some slack
    pub mods_count: u32,
    /// Address of the embedded kernel image
    pub mods_addr: u32,
    /// Number of section headers
    pub num: u32,
    /// Size of a section header
    pub size: u32,
    /// Address of the section header table
    pub addr: u32,
    /// Index of the section name string table
    pub shndx: u32,
    pub mmap_length: u32,
    pub mmap_addr: u32,
    pub drives_length: u32,
    pub drives_addr: u32,
    pub config_table: u32,
    pub boot_loader_name: u32,
    pub apm_table: u32,
    pub vbe_control_info: u32,
    pub vbe_mode_info: u32,
    pub vbe_mode: u32,
    pub vbe_interface_seg: u32,
    pub vbe_interface_off: u32,
    pub vbe_interface_len: u32,
}

impl BootstrapInfo {
    pub const SIZE: usize = core::mem::size_of::<Self>();

    #[must_use]
    #[inline]
    pub const fn zeroed() -> Self {
        Self {
            flags: 0,
            mem_lower: 0,
            mem_upper: 0,
            boot_device: 0,
            cmdline: 0,
            mods_count: 0,
            mods_addr: 0,
            num: 0,
            size: 0,
            addr: 0,
            shndx: 0,
            mmap_length: 0,
            mmap_addr: 0,
            drives_length: 0,
            drives_addr: 0,
            config_table: 0,
            boot_loader_name: 0,
            apm_table: 0,
            vbe_control_info: 0,
            vbe_mode_info: 0,
            vbe_mode: 0,
            vbe_interface_seg: 0,
            vbe_interface_off: 0,
            vbe_interface_len: 0,
        }
    }

    #[must_use]
    /// Describes `kernel`, loaded from the embedded image found at `image_address`.
    pub fn for_kernel(kernel: &LoadedKernel, image_address: PhysAddr, image_len: usize) -> Self {
        let mut info = Self::zeroed();

        if let Some(sections) = kernel.sections {
            info.num = u32::from(sections.count);
            info.size = u32::from(sections.entry_size);
            info.shndx = u32::from(sections.string_index);
            info.addr = image_address.as_u32().wrapping_add(sections.offset);
        }

        info.mods_addr = image_address.as_u32();
        info.mods_count = u32::try_from(image_len)
            .unwrap_or(u32::MAX)
            .saturating_add(IMAGE_SIZE_SLACK);

        info
    }

    #[must_use]
    /// Little-endian encoding of the record, in field order.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let words = [
            self.flags,
            self.mem_lower,
            self.mem_upper,
            self.boot_device,
            self.cmdline,
            self.mods_count,
            self.mods_addr,
            self.num,
            self.size,
            self.addr,
            self.shndx,
            self.mmap_length,
            self.mmap_addr,
            self.drives_length,
            self.drives_addr,
            self.config_table,
            self.boot_loader_name,
            self.apm_table,
            self.vbe_control_info,
            self.vbe_mode_info,
            self.vbe_mode,
            self.vbe_interface_seg,
            self.vbe_interface_off,
            self.vbe_interface_len,
        ];

        let mut bytes = [0; Self::SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Writes the whole record at `at`.
    pub fn write_to<M: PhysicalMemory>(&self, memory: &mut M, at: PhysAddr) {
        memory.copy_data(at, &self.to_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(BootstrapInfo::SIZE, 24 * 4);
        assert_eq!(core::mem::offset_of!(BootstrapInfo, mods_addr), 24);
        assert_eq!(core::mem::offset_of!(BootstrapInfo, shndx), 40);
    }

    #[test]
    fn test_encoding_follows_field_order() {
        let info = BootstrapInfo {
            num: 0x11,
            addr: 0x8000_1234,
            vbe_interface_len: 0xAABB_CCDD,
            ..BootstrapInfo::zeroed()
        };
        let bytes = info.to_bytes();
        assert_eq!(bytes[28..32], 0x11_u32.to_le_bytes());
        assert_eq!(bytes[36..40], 0x8000_1234_u32.to_le_bytes());
        assert_eq!(bytes[92..96], 0xAABB_CCDD_u32.to_le_bytes());
        assert!(bytes[..28].iter().all(|&b| b == 0));
    }
}
