//! Hardware transport abstraction
//!
//! This module provides the [`Transport`] trait and the [`Interface`] struct
//! for talking to a panel controller over SPI.
//!
//! ## Wiring
//!
//! All built-in panels use a write-only 4-wire SPI link (CS is owned by the
//! [`SpiDevice`]) plus three control lines:
//! - **DC** output: low while a command byte is clocked out, high for data
//! - **RST** output: pulled low to reset the controller
//! - **BUSY** input: asserted while the controller works; which level means
//!   busy is a per-panel property
//!
//! The transport only reports the raw BUSY level. Interpreting it, and
//! bounding the wait, is up to the [`Device`](crate::device::Device) since
//! both depend on the panel descriptor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use epd_raw::{Interface, Transport};
//!
//! let mut interface = Interface::new(spi_device, dc_pin, rst_pin, busy_pin);
//!
//! interface.write_command(0x12)?; // Soft reset
//! interface.write_data(&[0xFF, 0x00, 0xFF])?;
//! let busy_high = interface.read_busy()?;
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::descriptor::Timing;

/// Bus and control-line contract the driver is written against
///
/// Implement this on your own type for unusual wiring (shared DC lines,
/// GPIO expanders, a host-side simulator). For plain SPI + GPIO use
/// [`Interface`].
pub trait Transport {
    /// Bus or pin failure, kept as-is inside [`Error`](crate::Error)
    type Error: Debug;

    /// Send a command byte (DC low)
    ///
    /// # Errors
    ///
    /// Fails if DC cannot be driven or the SPI write fails.
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send data bytes (DC high)
    ///
    /// Called once per chunk while streaming RAW data, so `data` may be a
    /// fragment of a larger logical transfer.
    ///
    /// # Errors
    ///
    /// Fails if DC cannot be driven or the SPI write fails.
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Pulse the reset line
    ///
    /// RST low for `timing.reset_pulse_ms`, then high and wait
    /// `timing.reset_settle_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset pin cannot be driven.
    fn assert_reset<D: DelayNs>(&mut self, delay: &mut D, timing: &Timing)
    -> Result<(), Self::Error>;

    /// Raw BUSY line level, `true` when high
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be read.
    fn read_busy(&mut self) -> Result<bool, Self::Error>;
}

/// Failure of the [`Interface`] transport
#[derive(Debug, PartialEq)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// The SPI write failed
    Spi(SpiErr),
    /// DC, RST or BUSY could not be driven or read
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InterfaceError::Spi(e) => write!(f, "SPI write failed: {e:?}"),
            InterfaceError::Pin(e) => write!(f, "control line failed: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// [`Transport`] over an embedded-hal v1.0 [`SpiDevice`] and three pins
///
/// DC and RST are [`OutputPin`]s, BUSY an [`InputPin`]; the three pins must
/// share one error type.
///
/// ```rust,ignore
/// use epd_raw::{panels, Builder, Device, Interface};
///
/// let interface = Interface::new(spi_device, dc_pin, rst_pin, busy_pin);
/// let config = Builder::new()
///     .descriptor(panels::descriptor(panels::PanelId::Ws154))
///     .build()?;
/// let mut device = Device::new(interface, config)?;
/// ```
#[derive(Debug)]
pub struct Interface<SPI, DC, RST, BUSY> {
    spi: SPI,
    /// low: command byte, high: parameter bytes
    dc: DC,
    rst: RST,
    busy: BUSY,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Bundle the SPI device and the DC, RST and BUSY pins
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self { spi, dc, rst, busy }
    }

    /// Give back the SPI device and pins
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> Transport for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)
    }

    fn assert_reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timing: &Timing,
    ) -> Result<(), Self::Error> {
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(timing.reset_pulse_ms);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(timing.reset_settle_ms);
        Ok(())
    }

    fn read_busy(&mut self) -> Result<bool, Self::Error> {
        self.busy.is_high().map_err(InterfaceError::Pin)
    }
}
