//! Error types for ELF32 kernel loading.
use thiserror::Error;

/// Errors that can occur while inspecting an ELF image.
///
/// Parsing only ever reads the image, so none of these imply that memory was modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The magic bytes are absent
    #[error("Not an ELF image")]
    NotElf,
    /// The image is not a 32-bit ELF
    #[error("Unsupported ELF class")]
    UnsupportedClass,
    /// The image is not little-endian
    #[error("Unsupported data encoding")]
    UnsupportedEncoding,
    /// The image targets another instruction set
    #[error("Wrong machine type")]
    WrongMachine,
    /// The header describes a program header table that cannot be decoded
    #[error("Malformed ELF header")]
    MalformedHeader,
    /// Declared offsets or sizes exceed the image
    #[error("Truncated image")]
    Truncated,
    /// The image does not start on a 4-byte boundary
    #[error("Misaligned image")]
    Misaligned,
}

/// Errors that can occur while placing a segment in physical memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The segment's file bytes exceed the image
    #[error("Truncated segment")]
    Truncated,
    /// The segment's destination is incompatible with the load layout
    #[error("Segment address mismatch")]
    AddressMismatch,
    /// The segment declares more file bytes than memory bytes
    #[error("Invalid segment")]
    InvalidSegment,
    /// The image has more loadable segments than can be tracked
    #[error("Too many loadable segments")]
    TooManySegments,
}
