//! Device configuration types and builder

pub use crate::error::BuilderError;
use crate::descriptor::DisplayDescriptor;
use crate::flush::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Framebuffer rotation relative to the panel's native orientation
///
/// `Rotate90` and `Rotate270` are the transposed modes: logical width and
/// height are swapped. Rotation only remaps coordinates, the stored pixels
/// never move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// Native panel orientation
    #[default]
    Rotate0,
    /// Quarter turn clockwise
    Rotate90,
    /// Upside down
    Rotate180,
    /// Quarter turn counter-clockwise
    Rotate270,
}

impl Rotation {
    /// Whether logical width and height are swapped
    pub fn is_transposed(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }

    /// Nearest rotation for an angle in degrees (any integer, wraps around)
    pub fn from_degrees(degrees: i32) -> Self {
        match (degrees + 45).div_euclid(90).rem_euclid(4) {
            1 => Rotation::Rotate90,
            2 => Rotation::Rotate180,
            3 => Rotation::Rotate270,
            _ => Rotation::Rotate0,
        }
    }
}

/// Device configuration
///
/// Holds the panel descriptor and the tunables layered on top of it.
/// Use [`Builder`] to create a Config.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Panel descriptor
    pub descriptor: &'static DisplayDescriptor,
    /// Rotation of framebuffers created for this device
    pub rotation: Rotation,
    /// Bytes read from the source and written to the bus per transfer
    pub chunk_size: usize,
    /// Busy-line polling period
    pub poll_interval_ms: u32,
    /// Replaces every busy-wait bound of the descriptor when set
    pub busy_timeout_ms: Option<u32>,
}

impl Config {
    /// Check the descriptor and the tunables
    ///
    /// [`Builder::build`] only returns configurations that pass; a `Config`
    /// assembled by hand is checked again by
    /// [`Device::new`](crate::device::Device::new).
    ///
    /// # Errors
    ///
    /// Same as [`Builder::build`].
    pub fn validate(&self) -> Result<(), BuilderError> {
        self.descriptor.validate()?;
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(BuilderError::InvalidChunkSize(self.chunk_size));
        }
        if self.poll_interval_ms == 0 {
            return Err(BuilderError::InvalidPollInterval);
        }
        Ok(())
    }

    /// Rotated (logical) dimensions as `(width, height)`
    pub fn rotated_dimensions(&self) -> (u16, u16) {
        let (w, h) = (self.descriptor.width, self.descriptor.height);
        if self.rotation.is_transposed() {
            (h, w)
        } else {
            (w, h)
        }
    }
}

/// Builder for constructing device configuration
///
/// # Example
///
/// ```
/// use epd_raw::{panels, Builder, Rotation};
///
/// let config = Builder::new()
///     .descriptor(panels::descriptor(panels::PanelId::Ws154))
///     .rotation(Rotation::Rotate90)
///     .chunk_size(512)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.chunk_size, 512);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder {
    /// Panel descriptor (required)
    descriptor: Option<&'static DisplayDescriptor>,
    /// Framebuffer rotation
    rotation: Rotation,
    /// Transfer chunk size, `None` for [`DEFAULT_CHUNK_SIZE`]
    chunk_size: Option<usize>,
    /// Poll interval, `None` for the descriptor's
    poll_interval_ms: Option<u32>,
    /// Busy-wait bound override
    busy_timeout_ms: Option<u32>,
}

impl Builder {
    /// Start with no panel and no rotation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the panel descriptor (required)
    pub fn descriptor(mut self, descriptor: &'static DisplayDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Set framebuffer rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set transfer chunk size in bytes
    ///
    /// Larger chunks transfer slightly faster, smaller ones save RAM.
    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = Some(bytes);
        self
    }

    /// Set busy-line polling period
    pub fn poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }

    /// Override every busy-wait bound of the descriptor
    pub fn busy_timeout_ms(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }

    /// Finish the builder
    ///
    /// # Errors
    ///
    /// - `BuilderError::MissingDescriptor` if no descriptor was set
    /// - `BuilderError::InvalidDescriptor` if the descriptor fails validation
    /// - `BuilderError::InvalidChunkSize` if the chunk size is 0 or too large
    /// - `BuilderError::InvalidPollInterval` if the poll interval is 0
    pub fn build(self) -> Result<Config, BuilderError> {
        let descriptor = self.descriptor.ok_or(BuilderError::MissingDescriptor)?;
        let config = Config {
            descriptor,
            rotation: self.rotation,
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            poll_interval_ms: self
                .poll_interval_ms
                .unwrap_or(descriptor.timing.poll_interval_ms),
            busy_timeout_ms: self.busy_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::{self, PanelId};

    #[test]
    fn test_missing_descriptor() {
        assert_eq!(
            Builder::new().build().map(|c| c.chunk_size),
            Err(BuilderError::MissingDescriptor)
        );
    }

    #[test]
    fn test_defaults_follow_descriptor() {
        let desc = panels::descriptor(PanelId::Ws420Tricolor);
        let config = Builder::new().descriptor(desc).build().unwrap();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.poll_interval_ms, desc.timing.poll_interval_ms);
        assert_eq!(config.busy_timeout_ms, None);
        assert_eq!(config.rotation, Rotation::Rotate0);
    }

    #[test]
    fn test_chunk_size_bounds() {
        let desc = panels::descriptor(PanelId::Ws154);
        assert_eq!(
            Builder::new().descriptor(desc).chunk_size(0).build().err(),
            Some(BuilderError::InvalidChunkSize(0))
        );
        assert_eq!(
            Builder::new()
                .descriptor(desc)
                .chunk_size(MAX_CHUNK_SIZE + 1)
                .build()
                .err(),
            Some(BuilderError::InvalidChunkSize(MAX_CHUNK_SIZE + 1))
        );
        assert!(
            Builder::new()
                .descriptor(desc)
                .chunk_size(MAX_CHUNK_SIZE)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_zero_poll_interval() {
        let desc = panels::descriptor(PanelId::Ws154);
        assert_eq!(
            Builder::new().descriptor(desc).poll_interval_ms(0).build().err(),
            Some(BuilderError::InvalidPollInterval)
        );
    }

    #[test]
    fn test_rotated_dimensions() {
        let desc = panels::descriptor(PanelId::Gdey075t7);
        let config = Builder::new()
            .descriptor(desc)
            .rotation(Rotation::Rotate270)
            .build()
            .unwrap();
        assert_eq!(config.rotated_dimensions(), (480, 800));
    }

    #[test]
    fn test_rotation_from_degrees_rounds_to_nearest() {
        assert_eq!(Rotation::from_degrees(0), Rotation::Rotate0);
        assert_eq!(Rotation::from_degrees(44), Rotation::Rotate0);
        assert_eq!(Rotation::from_degrees(45), Rotation::Rotate90);
        assert_eq!(Rotation::from_degrees(180), Rotation::Rotate180);
        assert_eq!(Rotation::from_degrees(260), Rotation::Rotate270);
        assert_eq!(Rotation::from_degrees(350), Rotation::Rotate0);
        assert_eq!(Rotation::from_degrees(-90), Rotation::Rotate270);
        assert!(Rotation::Rotate90.is_transposed());
        assert!(!Rotation::Rotate180.is_transposed());
    }
}
