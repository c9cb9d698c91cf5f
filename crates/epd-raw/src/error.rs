//! Failure reporting
//!
//!
//! - [`Error`] - Runtime errors during device operations, generic over the
//!   [`Transport`] so the underlying bus error is preserved
//! - [`FlushError`] - Errors from the chunked transfer itself
//! - [`PixelError`] - Framebuffer construction and addressing errors
//! - [`CodecError`] - Framebuffer / RAW shape mismatches
//! - [`SourceError`] - Failures reported by a [`ChunkSource`](crate::source::ChunkSource)
//! - [`DescriptorError`] - Inconsistent panel descriptor tables
//! - [`BuilderError`] - Rejected [`Builder`](crate::config::Builder) settings
//!
//! Every device error can be classified with [`Error::recovery`].
//!
//! ## Usage
//!
//! ```
//! use epd_raw::{FrameBuffer, PixelError, PixelValue};
//!
//! let mut storage = [0u8; 8];
//! let mut fb = FrameBuffer::new(4, 4, &mut storage[..]).unwrap();
//! let result = fb.set(4, 0, PixelValue::BLACK);
//! assert!(matches!(result, Err(PixelError::OutOfRange { x: 4, y: 0, .. })));
//! ```

use crate::device::{DeviceState, Phase};
use crate::interface::Transport;
use crate::pixel::PixelKind;

/// What the caller should do after a failed operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Nothing was corrupted; the same call may be retried later
    Retry,
    /// Panel state is undefined; run [`Device::init`](crate::device::Device::init) before the next flush
    Reinit,
    /// The call itself was wrong (ordering or sizing); retrying will not help
    Fix,
}

/// Errors that can occur when driving a panel
///
/// Generic over the transport type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<T: Transport> {
    /// Transport error (SPI/GPIO) while talking to the panel
    Interface(T::Error),
    /// The byte source failed while streaming RAW data
    Source(SourceError),
    /// The source ended before the panel's full RAW length was sent
    ShortWrite {
        /// RAW bytes the panel requires
        expected: usize,
        /// RAW bytes actually sent
        received: usize,
    },
    /// The source still had bytes after the full RAW length was sent
    Truncation {
        /// RAW bytes the panel requires
        expected: usize,
    },
    /// The busy line did not clear in time
    DeviceTimeout {
        /// Operation that was waiting
        phase: Phase,
        /// Time spent polling before giving up
        waited_ms: u32,
    },
    /// A flush was requested while the device was not idle
    Busy {
        /// State the device was in
        state: DeviceState,
    },
    /// An operation was requested before [`Device::init`](crate::device::Device::init)
    NotInitialized {
        /// State the device was in
        state: DeviceState,
    },
    /// Framebuffer does not match the panel
    Codec(CodecError),
}

impl<T: Transport> Error<T> {
    /// Classify the error for the caller's retry / reinit decision
    pub fn recovery(&self) -> Recovery {
        match self {
            Error::Busy { .. } => Recovery::Retry,
            Error::DeviceTimeout { phase, .. } => match phase {
                Phase::Init | Phase::Sleep => Recovery::Reinit,
                Phase::Write | Phase::Refresh => Recovery::Retry,
            },
            Error::Interface(_)
            | Error::Source(_)
            | Error::ShortWrite { .. }
            | Error::Truncation { .. } => Recovery::Reinit,
            Error::NotInitialized { .. } | Error::Codec(_) => Recovery::Fix,
        }
    }
}

impl<T: Transport> core::fmt::Display for Error<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "Interface error: {e:?}"),
            Error::Source(e) => write!(f, "Source error: {e}"),
            Error::ShortWrite { expected, received } => {
                write!(
                    f,
                    "Short write: panel needs {expected} bytes, source ended after {received}"
                )
            }
            Error::Truncation { expected } => {
                write!(f, "Source has more than the {expected} bytes the panel needs")
            }
            Error::DeviceTimeout { phase, waited_ms } => {
                write!(f, "Timeout waiting for display during {phase:?} ({waited_ms} ms)")
            }
            Error::Busy { state } => write!(f, "Display busy ({state:?})"),
            Error::NotInitialized { state } => {
                write!(f, "Display not initialized ({state:?})")
            }
            Error::Codec(e) => write!(f, "Codec error: {e}"),
        }
    }
}

impl<T: Transport + core::fmt::Debug> core::error::Error for Error<T> {}

impl<T: Transport> From<FlushError<T::Error>> for Error<T> {
    fn from(err: FlushError<T::Error>) -> Self {
        match err {
            FlushError::Interface(e) => Error::Interface(e),
            FlushError::Source(e) => Error::Source(e),
            FlushError::ShortWrite { expected, received } => {
                Error::ShortWrite { expected, received }
            }
            FlushError::Truncation { expected } => Error::Truncation { expected },
        }
    }
}

impl<T: Transport> From<CodecError> for Error<T> {
    fn from(err: CodecError) -> Self {
        Error::Codec(err)
    }
}

/// Errors from a single chunked RAW transfer
///
/// Generic over the transport error type.
#[derive(Debug, PartialEq)]
pub enum FlushError<E> {
    /// Transport failed while sending a command or a chunk
    Interface(E),
    /// The byte source failed
    Source(SourceError),
    /// The source ended early
    ShortWrite {
        /// RAW bytes the panel requires
        expected: usize,
        /// RAW bytes actually sent
        received: usize,
    },
    /// The source had bytes left over
    Truncation {
        /// RAW bytes the panel requires
        expected: usize,
    },
}

impl<E: core::fmt::Debug> core::fmt::Display for FlushError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FlushError::Interface(e) => write!(f, "Interface error: {e:?}"),
            FlushError::Source(e) => write!(f, "Source error: {e}"),
            FlushError::ShortWrite { expected, received } => {
                write!(f, "Short write: expected {expected} bytes, got {received}")
            }
            FlushError::Truncation { expected } => {
                write!(f, "Source longer than {expected} bytes")
            }
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for FlushError<E> {}

/// Failure reported by a byte source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceError {
    /// Underlying reader failed
    Io,
    /// Stream content is malformed (e.g. bad or truncated deflate data)
    Corrupt,
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceError::Io => write!(f, "I/O error"),
            SourceError::Corrupt => write!(f, "Corrupt stream"),
        }
    }
}

impl core::error::Error for SourceError {}

/// Framebuffer errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelError {
    /// Coordinates outside the logical `width x height` area
    OutOfRange {
        /// Requested column
        x: u16,
        /// Requested row
        y: u16,
        /// Logical width
        width: u16,
        /// Logical height
        height: u16,
    },
    /// Backing storage cannot hold `width x height` 4-bit pixels
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Zero width or height
    InvalidDimensions {
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },
}

impl core::fmt::Display for PixelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PixelError::OutOfRange {
                x,
                y,
                width,
                height,
            } => write!(f, "Pixel ({x}, {y}) outside {width}x{height}"),
            PixelError::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
            PixelError::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions: {width}x{height}")
            }
        }
    }
}

impl core::error::Error for PixelError {}

/// Codec errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// Framebuffer native size differs from the panel resolution
    SizeMismatch {
        /// Panel width
        expected_width: u16,
        /// Panel height
        expected_height: u16,
        /// Framebuffer native width
        width: u16,
        /// Framebuffer native height
        height: u16,
    },
    /// RAW slice length differs from the panel RAW length
    LengthMismatch {
        /// Panel RAW length
        expected: usize,
        /// Provided length
        provided: usize,
    },
    /// RAW data contains a code the panel does not define
    UnknownCode {
        /// Offending code
        code: u8,
        /// Native pixel index where it was found
        index: usize,
    },
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::SizeMismatch {
                expected_width,
                expected_height,
                width,
                height,
            } => write!(
                f,
                "Framebuffer is {width}x{height}, panel is {expected_width}x{expected_height}"
            ),
            CodecError::LengthMismatch { expected, provided } => {
                write!(f, "RAW length {provided}, panel needs {expected}")
            }
            CodecError::UnknownCode { code, index } => {
                write!(f, "Unknown wire code {code:#04x} at pixel {index}")
            }
        }
    }
}

impl core::error::Error for CodecError {}

/// Inconsistent panel descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorError {
    /// Zero width or height
    InvalidDimensions {
        /// Panel width
        width: u16,
        /// Panel height
        height: u16,
    },
    /// Bits per pixel must be 1, 2, 4 or 8
    InvalidBitsPerPixel(u8),
    /// Level table empty or larger than 16 entries
    InvalidLevelCount(usize),
    /// Level values must be strictly ascending
    UnsortedLevels,
    /// A wire code does not fit in `bits_per_pixel` bits
    CodeOutOfRange {
        /// Offending code
        code: u8,
    },
    /// Two levels share a wire code
    DuplicateCode {
        /// Offending code
        code: u8,
    },
    /// Gray levels must run from black to white; palette indices from 0
    /// without gaps
    IncompleteLevels(PixelKind),
    /// Planar panels need `width * height` to be a multiple of 8
    UnalignedPlanes,
    /// RAW length cannot be split evenly across the data commands
    InvalidSegments {
        /// Number of data commands
        segments: usize,
        /// Panel RAW length
        raw_len: usize,
    },
}

impl core::fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DescriptorError::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions: {width}x{height}")
            }
            DescriptorError::InvalidBitsPerPixel(bpp) => {
                write!(f, "Invalid bits per pixel: {bpp}")
            }
            DescriptorError::InvalidLevelCount(n) => write!(f, "Invalid level count: {n}"),
            DescriptorError::UnsortedLevels => write!(f, "Levels must be strictly ascending"),
            DescriptorError::CodeOutOfRange { code } => {
                write!(f, "Wire code {code:#04x} does not fit the pixel depth")
            }
            DescriptorError::DuplicateCode { code } => {
                write!(f, "Wire code {code:#04x} used twice")
            }
            DescriptorError::IncompleteLevels(kind) => {
                write!(f, "Level table does not cover the {kind:?} range")
            }
            DescriptorError::UnalignedPlanes => {
                write!(f, "Planar panels need width * height divisible by 8")
            }
            DescriptorError::InvalidSegments { segments, raw_len } => write!(
                f,
                "RAW length {raw_len} cannot be split into {segments} segments"
            ),
        }
    }
}

impl core::error::Error for DescriptorError {}

/// Why [`Builder::build`](crate::config::Builder::build) refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Panel descriptor was not specified
    ///
    /// [`Builder::descriptor()`](crate::config::Builder::descriptor) must be called before building.
    MissingDescriptor,
    /// Panel descriptor failed validation
    InvalidDescriptor(DescriptorError),
    /// Chunk size is zero or above [`MAX_CHUNK_SIZE`](crate::flush::MAX_CHUNK_SIZE)
    InvalidChunkSize(usize),
    /// Poll interval must be at least 1 ms
    InvalidPollInterval,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuilderError::MissingDescriptor => write!(f, "Panel descriptor must be specified"),
            BuilderError::InvalidDescriptor(e) => write!(f, "Invalid descriptor: {e}"),
            BuilderError::InvalidChunkSize(size) => write!(
                f,
                "Invalid chunk size {size} (1..={})",
                crate::flush::MAX_CHUNK_SIZE
            ),
            BuilderError::InvalidPollInterval => write!(f, "Poll interval must be at least 1 ms"),
        }
    }
}

impl core::error::Error for BuilderError {}

impl From<DescriptorError> for BuilderError {
    fn from(err: DescriptorError) -> Self {
        BuilderError::InvalidDescriptor(err)
    }
}
