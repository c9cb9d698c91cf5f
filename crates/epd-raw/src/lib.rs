//! # epd-raw
//!
//! A `no_std` driver core for e-paper panels built around one idea: every
//! panel speaks the same 4-bit pixel language, and only a small static
//! table per panel family knows how those pixels become controller RAM.
//!
//! - Drawing happens on a [`FrameBuffer`] of [`PixelValue`]s (0 = black,
//!   15 = white, or a palette index on color panels).
//! - A [`Codec`] built from a [`DisplayDescriptor`] quantizes and packs the
//!   framebuffer into the panel's RAW layout, lazily.
//! - A [`FlushEngine`] streams RAW bytes from any [`ChunkSource`] in bounded
//!   chunks, so a full frame never has to be materialized.
//! - A [`Device`] sequences init, flush, refresh and sleep with bounded busy
//!   waits, over any [`Transport`].
//!
//! ## Features
//!
//! - `graphics` (default): embedded-graphics `DrawTarget` for [`FrameBuffer`]
//! - `alloc`: heap-allocated framebuffers and RAW images
//! - `std`: [`ReaderSource`] over `std::io::Read`
//! - `deflate`: [`InflateSource`] for zlib / raw deflate RAW images
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{self, InputPin, OutputPin};
//! # use embedded_hal::spi::{self, Operation, SpiDevice};
//! # #[derive(Debug)]
//! # struct MockSpi;
//! # impl spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(&mut self, _: &mut [Operation<'_, u8>]) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # #[derive(Debug)]
//! # struct MockPin;
//! # impl digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Infallible> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Infallible> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _: u32) {} }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let (spi, dc, rst, busy, mut delay) = (MockSpi, MockPin, MockPin, MockPin, MockDelay);
//! use epd_raw::{Builder, Device, Interface, PixelValue, Rotation, buffer_len, panels};
//!
//! let config = Builder::new()
//!     .descriptor(panels::descriptor(panels::PanelId::Ws154))
//!     .rotation(Rotation::Rotate90)
//!     .build()?;
//! let mut device = Device::new(Interface::new(spi, dc, rst, busy), config)?;
//! device.init(&mut delay)?;
//!
//! let mut storage = [0u8; buffer_len(200, 200)];
//! let mut fb = device.frame_buffer(&mut storage[..])?;
//! fb.set(10, 20, PixelValue::BLACK)?;
//!
//! device.flush_frame(&fb, &mut delay)?;
//! device.sleep(&mut delay)?;
//! # Ok(())
//! # }
//! ```
//!
//! Pre-encoded images skip the framebuffer entirely: pass any
//! [`ChunkSource`] (a [`SliceSource`], a file through [`ReaderSource`], a
//! compressed stream through [`InflateSource`]) to [`Device::flush`].

#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

/// Codec: framebuffer to RAW and back
pub mod codec;
/// Controller command bytes
pub mod command;
/// Display configuration and builder
pub mod config;
/// Per-panel static descriptors
pub mod descriptor;
/// Device protocol state machine
pub mod device;
/// Error types
pub mod error;
/// Chunked RAW transfer
pub mod flush;
/// 4-bit framebuffer
pub mod framebuffer;
/// embedded-graphics support
#[cfg(feature = "graphics")]
pub mod graphics;
/// Compressed RAW sources
#[cfg(feature = "deflate")]
pub mod inflate;
/// SPI / GPIO transport
pub mod interface;
/// Waveform tables
pub mod lut;
/// Built-in panel families
pub mod panels;
/// Uniform pixel model
pub mod pixel;
/// Chunked byte sources
pub mod source;

#[cfg(test)]
mod mock;

pub use codec::{Codec, Encoder};
pub use config::{Builder, Config, Rotation};
pub use descriptor::{
    BitOrder, BusyPolarity, CommandSet, DisplayDescriptor, Packing, ScanOrder, Step, Timing, Wait,
};
pub use device::{Device, DeviceState, Phase};
pub use error::{
    BuilderError, CodecError, DescriptorError, Error, FlushError, PixelError, Recovery,
    SourceError,
};
pub use flush::{DEFAULT_CHUNK_SIZE, FlushEngine, MAX_CHUNK_SIZE};
pub use framebuffer::{FrameBuffer, buffer_len};
#[cfg(feature = "deflate")]
pub use inflate::InflateSource;
pub use interface::{Interface, InterfaceError, Transport};
pub use panels::PanelId;
pub use pixel::{LEVEL_COUNT, Level, PixelKind, PixelValue, quantize};
#[cfg(feature = "std")]
pub use source::ReaderSource;
pub use source::{ChunkSource, SliceSource};
