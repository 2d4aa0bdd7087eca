//! Polled output on an OMAP3 UART.
//!
//! The UART is expected to be configured by the first boot stage.

/// Transmit holding register
const THR_REG: usize = 0x00;
/// Line status register
const LSR_REG: usize = 0x14;
/// Set in LSR when the transmit holding register can take a byte
const LSR_THR_EMPTY: u8 = 1 << 5;

pub struct OmapUart {
    base: usize,
}

impl OmapUart {
    #[must_use]
    #[inline]
    /// Creates a driver for the UART mapped at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to the register block of an OMAP UART (or to at least
    /// `LSR_REG + 1` bytes of memory standing in for one), and no other code may drive it.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Sends one byte, spinning until the transmitter can take it.
    pub fn send(&mut self, byte: u8) {
        let regs = self.base as *mut u8;

        // Safety:
        // Register offsets are within the block guaranteed by `new`.
        unsafe {
            while regs.add(LSR_REG).read_volatile() & LSR_THR_EMPTY == 0 {
                core::hint::spin_loop();
            }
            regs.add(THR_REG).write_volatile(byte);
        }
    }
}

impl core::fmt::Write for OmapUart {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.send(b'\r');
            }
            self.send(byte);
        }
        Ok(())
    }
}
