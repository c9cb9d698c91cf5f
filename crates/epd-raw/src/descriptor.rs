//! Static per-panel description
//!
//! A [`DisplayDescriptor`] is everything the codec, the flush engine and the
//! device state machine need to know about one panel family: resolution,
//! supported levels and their wire codes, how pixels are packed into bytes,
//! the busy-line polarity, timing bounds and the command sequences.
//!
//! Descriptors are plain `const` data. Adding a panel family means writing
//! one more table, see [`panels`](crate::panels).

use crate::error::DescriptorError;
use crate::pixel::{Level, PixelKind, PixelValue};

/// How pixel codes are laid out in RAW bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Packing {
    /// `8 / bits_per_pixel` codes packed side by side in each byte
    Chunky,
    /// One 1-bit plane per code bit, sent back to back; plane 0 carries the
    /// most significant code bit
    Planar,
}

/// Position of the first pixel inside a byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOrder {
    /// First pixel in the most significant bits
    MsbFirst,
    /// First pixel in the least significant bits
    LsbFirst,
}

/// Order in which native pixels are visited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOrder {
    /// Left to right, then top to bottom
    RowMajor,
    /// Top to bottom, then left to right
    ColumnMajor,
}

/// Level of the busy line while the panel is working
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusyPolarity {
    /// BUSY high means busy
    ActiveHigh,
    /// BUSY low means busy
    ActiveLow,
}

impl BusyPolarity {
    /// Whether a raw line level means "busy"
    pub fn is_busy(self, line_high: bool) -> bool {
        match self {
            BusyPolarity::ActiveHigh => line_high,
            BusyPolarity::ActiveLow => !line_high,
        }
    }
}

/// Timing bounds, all in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// RST held low
    pub reset_pulse_ms: u32,
    /// Wait after RST released
    pub reset_settle_ms: u32,
    /// Busy-line polling period
    pub poll_interval_ms: u32,
    /// Default bound for busy waits
    pub busy_timeout_ms: u32,
    /// Bound for the wait that follows the refresh command
    pub refresh_timeout_ms: u32,
}

impl Timing {
    /// 10 ms reset pulse, 10 ms polling, 10 s busy bound, 20 s refresh bound
    pub const DEFAULT: Self = Self {
        reset_pulse_ms: 10,
        reset_settle_ms: 10,
        poll_interval_ms: 10,
        busy_timeout_ms: 10_000,
        refresh_timeout_ms: 20_000,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Busy-wait bound used by a [`Step::WaitReady`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wait {
    /// [`Timing::busy_timeout_ms`]
    Busy,
    /// [`Timing::refresh_timeout_ms`]
    Refresh,
}

/// One entry of a command sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Send a command byte followed by its (possibly empty) data
    Send {
        /// Command byte
        command: u8,
        /// Data bytes
        data: &'static [u8],
    },
    /// Sleep
    DelayMs(u32),
    /// Poll the busy line until the panel is ready
    WaitReady(Wait),
}

impl Step {
    /// Command without data
    pub const fn cmd(command: u8) -> Self {
        Step::Send { command, data: &[] }
    }

    /// Command with data
    pub const fn data(command: u8, data: &'static [u8]) -> Self {
        Step::Send { command, data }
    }
}

/// Command sequences of one panel family
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandSet {
    /// Run by `init`, after the hardware reset
    pub init: &'static [Step],
    /// Run at the start of every flush, before RAW data
    pub pre_write: &'static [Step],
    /// RAM-write command of each RAW segment; RAW bytes are split evenly
    pub data_commands: &'static [u8],
    /// Run after all RAW data is sent
    pub refresh: &'static [Step],
    /// Run by `sleep`
    pub sleep: &'static [Step],
}

/// Static description of one panel family
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayDescriptor {
    /// Registry name
    pub name: &'static str,
    /// Native width in pixels
    pub width: u16,
    /// Native height in pixels
    pub height: u16,
    /// Gray levels or palette indices
    pub kind: PixelKind,
    /// Supported levels, ascending by value
    pub levels: &'static [Level],
    /// Bits per pixel in RAW data
    pub bits_per_pixel: u8,
    /// Code layout
    pub packing: Packing,
    /// First pixel position inside a byte
    pub bit_order: BitOrder,
    /// Native traversal order
    pub scan: ScanOrder,
    /// Level used for trailing pad bits
    pub pad: PixelValue,
    /// Level a fresh framebuffer is filled with
    pub default_level: PixelValue,
    /// Busy-line polarity
    pub busy: BusyPolarity,
    /// Timing bounds
    pub timing: Timing,
    /// Command sequences
    pub commands: CommandSet,
}

impl DisplayDescriptor {
    /// Native pixel count
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Exact RAW length: `ceil(width * height * bits_per_pixel / 8)`
    pub const fn raw_len(&self) -> usize {
        (self.pixel_count() * self.bits_per_pixel as usize).div_ceil(8)
    }

    /// Pixels carried by one byte of one plane (chunky) or of a plane (planar)
    pub const fn pixels_per_byte(&self) -> usize {
        match self.packing {
            Packing::Chunky => 8 / self.bits_per_pixel as usize,
            Packing::Planar => 8,
        }
    }

    /// Length of one RAW segment (the bytes following one data command)
    pub fn segment_len(&self) -> usize {
        match self.commands.data_commands.len() {
            0 => self.raw_len(),
            n => self.raw_len() / n,
        }
    }

    /// Check the table for internal consistency
    ///
    /// # Errors
    ///
    /// Returns a [`DescriptorError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.width == 0 || self.height == 0 {
            return Err(DescriptorError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !matches!(self.bits_per_pixel, 1 | 2 | 4 | 8) {
            return Err(DescriptorError::InvalidBitsPerPixel(self.bits_per_pixel));
        }
        if self.levels.is_empty() || self.levels.len() > crate::pixel::LEVEL_COUNT {
            return Err(DescriptorError::InvalidLevelCount(self.levels.len()));
        }

        let code_limit = 1u16 << self.bits_per_pixel;
        for (i, level) in self.levels.iter().enumerate() {
            if u16::from(level.code) >= code_limit {
                return Err(DescriptorError::CodeOutOfRange { code: level.code });
            }
            if i > 0 && self.levels[i - 1].value >= level.value {
                return Err(DescriptorError::UnsortedLevels);
            }
            if self.levels[..i].iter().any(|l| l.code == level.code) {
                return Err(DescriptorError::DuplicateCode { code: level.code });
            }
        }

        let covered = match self.kind {
            PixelKind::Gray => {
                self.levels.first().map(|l| l.value) == Some(PixelValue::BLACK)
                    && self.levels.last().map(|l| l.value) == Some(PixelValue::WHITE)
            }
            PixelKind::Palette => self
                .levels
                .iter()
                .enumerate()
                .all(|(i, l)| usize::from(l.value.get()) == i),
        };
        if !covered {
            return Err(DescriptorError::IncompleteLevels(self.kind));
        }

        if self.packing == Packing::Planar && self.pixel_count() % 8 != 0 {
            return Err(DescriptorError::UnalignedPlanes);
        }

        let segments = self.commands.data_commands.len();
        if segments > 0 && self.raw_len() % segments != 0 {
            return Err(DescriptorError::InvalidSegments {
                segments,
                raw_len: self.raw_len(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) static GRAY4: [Level; 4] = [
        Level::new(0, 0),
        Level::new(5, 1),
        Level::new(10, 2),
        Level::new(15, 3),
    ];

    /// Small chunky panel used across the unit tests
    pub(crate) fn tiny(width: u16, height: u16) -> DisplayDescriptor {
        DisplayDescriptor {
            name: "tiny",
            width,
            height,
            kind: PixelKind::Gray,
            levels: &GRAY4,
            bits_per_pixel: 2,
            packing: Packing::Chunky,
            bit_order: BitOrder::MsbFirst,
            scan: ScanOrder::RowMajor,
            pad: PixelValue::WHITE,
            default_level: PixelValue::WHITE,
            busy: BusyPolarity::ActiveHigh,
            timing: Timing::DEFAULT,
            commands: CommandSet {
                init: &[],
                pre_write: &[],
                data_commands: &[0x24],
                refresh: &[],
                sleep: &[],
            },
        }
    }

    /// Give a test descriptor the `'static` lifetime the codec and device expect
    pub(crate) fn leak(desc: DisplayDescriptor) -> &'static DisplayDescriptor {
        alloc::boxed::Box::leak(alloc::boxed::Box::new(desc))
    }

    #[test]
    fn test_raw_len_rounds_up() {
        assert_eq!(tiny(2, 2).raw_len(), 1);
        assert_eq!(tiny(3, 1).raw_len(), 1);
        assert_eq!(tiny(5, 1).raw_len(), 2);
        assert_eq!(tiny(3, 3).raw_len(), 3);
    }

    #[test]
    fn test_validate_accepts_tiny() {
        assert_eq!(tiny(3, 3).validate(), Ok(()));
    }

    #[test]
    fn test_validate_zero_dimensions() {
        assert!(matches!(
            tiny(0, 4).validate(),
            Err(DescriptorError::InvalidDimensions { width: 0, .. })
        ));
    }

    #[test]
    fn test_validate_bits_per_pixel() {
        let mut desc = tiny(4, 4);
        desc.bits_per_pixel = 3;
        assert_eq!(desc.validate(), Err(DescriptorError::InvalidBitsPerPixel(3)));
    }

    #[test]
    fn test_validate_code_fits_depth() {
        let mut desc = tiny(4, 4);
        desc.bits_per_pixel = 1;
        assert_eq!(
            desc.validate(),
            Err(DescriptorError::CodeOutOfRange { code: 2 })
        );
    }

    #[test]
    fn test_validate_unsorted_levels() {
        static LEVELS: [Level; 2] = [Level::new(15, 1), Level::new(0, 0)];
        let mut desc = tiny(4, 4);
        desc.levels = &LEVELS;
        assert_eq!(desc.validate(), Err(DescriptorError::UnsortedLevels));
    }

    #[test]
    fn test_validate_duplicate_code() {
        static LEVELS: [Level; 2] = [Level::new(0, 1), Level::new(15, 1)];
        let mut desc = tiny(4, 4);
        desc.levels = &LEVELS;
        assert_eq!(desc.validate(), Err(DescriptorError::DuplicateCode { code: 1 }));
    }

    #[test]
    fn test_validate_level_coverage() {
        static NO_WHITE: [Level; 2] = [Level::new(0, 0), Level::new(10, 1)];
        static GAP: [Level; 2] = [Level::new(0, 0), Level::new(2, 1)];
        let mut desc = tiny(4, 4);
        desc.levels = &NO_WHITE;
        assert_eq!(
            desc.validate(),
            Err(DescriptorError::IncompleteLevels(PixelKind::Gray))
        );

        desc.kind = PixelKind::Palette;
        desc.levels = &GAP;
        assert_eq!(
            desc.validate(),
            Err(DescriptorError::IncompleteLevels(PixelKind::Palette))
        );

        desc.levels = &GRAY4;
        assert_eq!(
            desc.validate(),
            Err(DescriptorError::IncompleteLevels(PixelKind::Palette))
        );
        desc.kind = PixelKind::Gray;
        assert_eq!(desc.validate(), Ok(()));
    }

    #[test]
    fn test_validate_planar_alignment() {
        let mut desc = tiny(3, 3);
        desc.packing = Packing::Planar;
        assert_eq!(desc.validate(), Err(DescriptorError::UnalignedPlanes));
    }

    #[test]
    fn test_validate_segments() {
        static TWO: [u8; 2] = [0x10, 0x13];
        let mut desc = tiny(3, 3);
        desc.commands.data_commands = &TWO;
        assert_eq!(
            desc.validate(),
            Err(DescriptorError::InvalidSegments {
                segments: 2,
                raw_len: 3
            })
        );
    }

    #[test]
    fn test_busy_polarity() {
        assert!(BusyPolarity::ActiveHigh.is_busy(true));
        assert!(!BusyPolarity::ActiveHigh.is_busy(false));
        assert!(BusyPolarity::ActiveLow.is_busy(false));
        assert!(!BusyPolarity::ActiveLow.is_busy(true));
    }
}
