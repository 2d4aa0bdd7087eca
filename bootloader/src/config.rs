//! Board configuration of the boot stage.
//!
//! The defaults describe a BeagleBoard: the first stage loads this binary at the start
//! of SDRAM and the kernel is linked to run right after it.

use elf32::{LoadLayout, Machine, MemoryRange, PhysAddr};

/// Physical address the kernel is linked at.
pub const KERNEL_LOAD_ADDRESS: u32 = 0x8020_0000;
/// Memory used by this boot stage (code, stack, bootstrap record).
pub const STAGE2_RESERVED: MemoryRange = MemoryRange::new(0x8000_0000, KERNEL_LOAD_ADDRESS as u64);
/// End of the SDRAM bank the kernel is loaded into.
pub const RAM_LIMIT: u64 = 0x9000_0000;
/// Where the bootstrap record handed to the kernel is written.
pub const BOOTSTRAP_ADDRESS: u32 = 0x8000_8000;
/// Base of the OMAP UART3 registers, wired to the board's serial port.
pub const SERIAL_BASE: usize = 0x4902_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Final location of the kernel, and lowest address a segment may occupy
    pub load_address: PhysAddr,
    /// Architecture the kernel must be built for
    pub machine: Machine,
    /// Exclusive upper bound of loadable memory
    pub limit: u64,
    /// Memory segments must never touch
    pub reserved: MemoryRange,
    /// Physical memory holding the kernel image, when it is known
    pub image: Option<MemoryRange>,
    pub bootstrap_address: PhysAddr,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BootConfig {
    pub const DEFAULT: Self = Self {
        load_address: PhysAddr::new(KERNEL_LOAD_ADDRESS),
        machine: Machine::Arm,
        limit: RAM_LIMIT,
        reserved: STAGE2_RESERVED,
        image: None,
        bootstrap_address: PhysAddr::new(BOOTSTRAP_ADDRESS),
    };

    #[must_use]
    #[inline]
    pub const fn with_load_address(mut self, load_address: PhysAddr) -> Self {
        self.load_address = load_address;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_machine(mut self, machine: Machine) -> Self {
        self.machine = machine;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_reserved(mut self, reserved: MemoryRange) -> Self {
        self.reserved = reserved;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_image(mut self, image: MemoryRange) -> Self {
        self.image = Some(image);
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_bootstrap_address(mut self, bootstrap_address: PhysAddr) -> Self {
        self.bootstrap_address = bootstrap_address;
        self
    }

    #[must_use]
    #[inline]
    /// Segment placement rules derived from this configuration.
    pub const fn layout(&self) -> LoadLayout {
        let layout = LoadLayout::new(self.load_address)
            .with_limit(self.limit)
            .with_reserved(self.reserved);
        match self.image {
            Some(image) => layout.with_source(image),
            None => layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = BootConfig::DEFAULT.layout();
        assert_eq!(layout.load_base(), PhysAddr::new(0x8020_0000));
        assert_eq!(layout.limit(), Some(0x9000_0000));
        assert_eq!(layout.relocation(), 0);
        assert_eq!(
            layout.reserved(),
            Some(MemoryRange::new(0x8000_0000, 0x8020_0000))
        );
        assert_eq!(layout.source(), None);
    }

    #[test]
    fn test_image_becomes_load_source() {
        let image = MemoryRange::new(0x8001_0000, 0x8030_0000);
        let layout = BootConfig::DEFAULT.with_image(image).layout();
        assert_eq!(layout.source(), Some(image));
    }

    #[test]
    fn test_bootstrap_record_is_reserved() {
        let config = BootConfig::default();
        let record = MemoryRange::from_len(config.bootstrap_address, 96);
        assert!(config.reserved.start() <= record.start());
        assert!(record.end() <= config.reserved.end());
        assert!(!config.reserved.overlaps(&MemoryRange::from_len(config.load_address, 1)));
    }

    #[test]
    fn test_builders() {
        let config = BootConfig::DEFAULT
            .with_machine(Machine::X86)
            .with_load_address(PhysAddr::new(0x10_0000))
            .with_limit(0x20_0000);
        assert_eq!(config.machine, Machine::X86);
        assert_eq!(config.layout().load_base(), PhysAddr::new(0x10_0000));
        assert_eq!(config.bootstrap_address, BootConfig::DEFAULT.bootstrap_address);
    }
}
