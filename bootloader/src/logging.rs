//! This module contains the global logger instance used by the `log` crate.
//!
//! This logger is only intended to be used during the boot stage and will NOT be available
//! after the jump to the kernel.

use crate::serial::OmapUart;
use core::fmt::Write;
use spin::Mutex;

/// The serial port backing the logger, once initialized.
static SERIAL: Mutex<Option<OmapUart>> = Mutex::new(None);

/// The static API for the logger.
pub static LOGGER_API: SerialLogger = SerialLogger;

/// An API that is backed by the static serial port.
///
/// It is used to interface with the `log` crate.
pub struct SerialLogger;

pub fn init(uart: OmapUart) -> &'static SerialLogger {
    *SERIAL.lock() = Some(uart);
    &LOGGER_API
}

/// Initializes the logger and registers it with the `log` crate.
///
/// # Errors
///
/// Fails if a logger was already registered.
pub fn install(uart: OmapUart) -> Result<(), log::SetLoggerError> {
    log::set_logger(init(uart))?;
    log::set_max_level(if cfg!(debug_assertions) {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    });
    Ok(())
}

impl log::Log for SerialLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if cfg!(debug_assertions) {
            true
        } else {
            metadata.level() <= log::Level::Info
        }
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut serial = SERIAL.lock();
        let Some(uart) = serial.as_mut() else {
            return;
        };

        // There is nowhere to report a failed write to
        let _ = if cfg!(debug_assertions) {
            writeln!(
                uart,
                "[{:5}] {}:{}: {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        } else {
            writeln!(uart, "[{:5}] {}", record.level(), record.args())
        };
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_log_reaches_serial() {
        // Leaked so the logger never holds a dangling register block
        let regs: &'static mut [u8; 0x15] = Box::leak(Box::new([0; 0x15]));
        regs[0x14] = 1 << 5;
        let regs_addr = regs.as_mut_ptr() as usize;

        let logger = init(unsafe { OmapUart::new(regs_addr) });
        logger.log(
            &log::Record::builder()
                .level(log::Level::Error)
                .args(format_args!("boot failed"))
                .build(),
        );

        // Every line ends with a line feed
        assert_eq!(unsafe { (regs_addr as *const u8).read_volatile() }, b'\n');
    }

    #[test]
    fn test_info_is_always_enabled() {
        let metadata = log::Metadata::builder().level(log::Level::Info).build();
        assert!(LOGGER_API.enabled(&metadata));
    }
}
