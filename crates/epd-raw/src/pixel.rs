//! Uniform pixel model
//!
//! Every panel is addressed through the same 4-bit [`PixelValue`]. Whether a
//! value is a gray level or a palette index is decided by the panel's
//! [`PixelKind`]; the mapping to the panel's own codes lives in its
//! [`Level`] table.
//!
//! ## Quantization
//!
//! Panels supporting fewer than 16 levels get the nearest supported level.
//! Ties (a value exactly halfway between two levels) resolve toward the
//! higher, lighter level. [`quantize`] is the only place this rule lives, so
//! every encode uses the same one.

/// Number of distinct pixel values in the uniform model
pub const LEVEL_COUNT: usize = 16;

/// A 4-bit pixel value in `0..=15`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PixelValue(u8);

impl PixelValue {
    /// Darkest gray level (or palette index 0)
    pub const BLACK: Self = Self(0);
    /// Lightest gray level
    pub const WHITE: Self = Self(15);
    /// Largest raw value
    pub const MAX: u8 = 15;

    /// Create a pixel value, `None` if `value > 15`
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a pixel value, clamping anything above 15
    pub const fn saturating(value: u8) -> Self {
        if value <= Self::MAX {
            Self(value)
        } else {
            Self(Self::MAX)
        }
    }

    /// Low nibble of `value`, for unpacking framebuffer storage
    pub(crate) const fn from_nibble(value: u8) -> Self {
        Self(value & 0x0F)
    }

    /// Raw value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<PixelValue> for u8 {
    fn from(value: PixelValue) -> Self {
        value.0
    }
}

impl TryFrom<u8> for PixelValue {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

/// How a panel interprets pixel values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelKind {
    /// Values are gray levels, 0 = black, 15 = white
    Gray,
    /// Values are palette indices (e.g. 0 = black, 1 = white, 2 = red)
    Palette,
}

/// One level a panel supports, and its wire code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Level {
    /// Uniform value the level stands for
    pub value: PixelValue,
    /// Native code written to the panel RAM
    pub code: u8,
}

impl Level {
    /// Const constructor for descriptor tables; `value` is clamped to 15
    pub const fn new(value: u8, code: u8) -> Self {
        Self {
            value: PixelValue::saturating(value),
            code,
        }
    }
}

/// Map `value` onto the nearest entry of `levels`
///
/// `levels` must be sorted by ascending value (descriptors are validated for
/// this). Ties go to the higher level. Returns `None` only for an empty table.
pub fn quantize(levels: &[Level], value: PixelValue) -> Option<&Level> {
    let mut best: Option<&Level> = None;
    let mut best_distance = u8::MAX;

    for level in levels {
        let distance = level.value.get().abs_diff(value.get());
        // `<=` lets a later (higher) level win a tie
        if distance <= best_distance {
            best = Some(level);
            best_distance = distance;
        }
    }

    best
}

/// Precomputed value -> code table for one descriptor
///
/// Built once per codec so the hot encode loop is a single index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CodeTable {
    codes: [u8; LEVEL_COUNT],
}

impl CodeTable {
    pub(crate) fn new(levels: &[Level]) -> Self {
        let mut codes = [0u8; LEVEL_COUNT];
        for (raw, slot) in codes.iter_mut().enumerate() {
            let value = PixelValue::saturating(raw as u8);
            if let Some(level) = quantize(levels, value) {
                *slot = level.code;
            }
        }
        Self { codes }
    }

    pub(crate) fn code(&self, value: PixelValue) -> u8 {
        self.codes[value.get() as usize]
    }
}
