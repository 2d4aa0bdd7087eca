//! C ABI view of a boot result.

use crate::boot::{BootError, BootResult};
use elf32::{LoadError, ParseError};

/// Outcome of a boot, as seen by code that cannot inspect a Rust `Result`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootCode {
    Ok = 0,
    NotElf = 1,
    UnsupportedClass = 2,
    UnsupportedEncoding = 3,
    WrongMachine = 4,
    MalformedHeader = 5,
    Truncated = 6,
    SegmentTruncated = 7,
    AddressMismatch = 8,
    InvalidSegment = 9,
    TooManySegments = 10,
    Misaligned = 11,
}

impl From<BootError> for BootCode {
    fn from(error: BootError) -> Self {
        match error {
            BootError::Parse(ParseError::NotElf) => Self::NotElf,
            BootError::Parse(ParseError::UnsupportedClass) => Self::UnsupportedClass,
            BootError::Parse(ParseError::UnsupportedEncoding) => Self::UnsupportedEncoding,
            BootError::Parse(ParseError::WrongMachine) => Self::WrongMachine,
            BootError::Parse(ParseError::MalformedHeader) => Self::MalformedHeader,
            BootError::Parse(ParseError::Truncated) => Self::Truncated,
            BootError::Parse(ParseError::Misaligned) => Self::Misaligned,
            BootError::Load(LoadError::Truncated) => Self::SegmentTruncated,
            BootError::Load(LoadError::AddressMismatch) => Self::AddressMismatch,
            BootError::Load(LoadError::InvalidSegment) => Self::InvalidSegment,
            BootError::Load(LoadError::TooManySegments) => Self::TooManySegments,
        }
    }
}

/// Tagged boot result.
///
/// `header_location` is only meaningful when `code` is `BootCode::Ok`, and is zero otherwise.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootStatus {
    pub code: BootCode,
    pub header_location: u32,
}

impl BootStatus {
    #[must_use]
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self.code, BootCode::Ok)
    }
}

impl From<&BootResult> for BootStatus {
    fn from(result: &BootResult) -> Self {
        match result {
            Ok(kernel) => Self {
                code: BootCode::Ok,
                header_location: kernel.header_location.as_u32(),
            },
            Err(error) => {
                log::error!("Boot failed: {error}");
                Self {
                    code: BootCode::from(*error),
                    header_location: 0,
                }
            }
        }
    }
}
