//! 4-bit pixel grid with rotated access
//!
//! Pixels are stored in the panel's native orientation, two per byte, even
//! pixel in the high nibble. [`Rotation`] only changes how logical
//! coordinates are mapped onto that store.

use crate::config::Rotation;
use crate::error::PixelError;
use crate::pixel::PixelValue;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// In-memory grid of [`PixelValue`]s
///
/// Generic over its backing storage so the grid can live in a `static`
/// buffer, on the stack or (with the `alloc` feature) on the heap.
#[derive(Clone, Debug)]
pub struct FrameBuffer<B> {
    buffer: B,
    width: u16,
    height: u16,
    rotation: Rotation,
}

/// Bytes needed to store a `width x height` grid
pub const fn buffer_len(width: u16, height: u16) -> usize {
    (width as usize * height as usize).div_ceil(2)
}

impl<B: AsRef<[u8]>> FrameBuffer<B> {
    /// Wrap `buffer` as a grid of native size `width x height`
    ///
    /// The buffer contents are kept as they are; call
    /// [`fill`](Self::fill) for a known starting state.
    ///
    /// # Errors
    ///
    /// - [`PixelError::InvalidDimensions`] if either dimension is zero
    /// - [`PixelError::BufferTooSmall`] if `buffer` holds fewer than
    ///   [`buffer_len`] bytes
    pub fn new(width: u16, height: u16, buffer: B) -> Result<Self, PixelError> {
        if width == 0 || height == 0 {
            return Err(PixelError::InvalidDimensions { width, height });
        }
        let required = buffer_len(width, height);
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(PixelError::BufferTooSmall { required, provided });
        }
        Ok(Self {
            buffer,
            width,
            height,
            rotation: Rotation::Rotate0,
        })
    }

    /// Logical width (native height when transposed)
    pub fn width(&self) -> u16 {
        if self.rotation.is_transposed() {
            self.height
        } else {
            self.width
        }
    }

    /// Logical height (native width when transposed)
    pub fn height(&self) -> u16 {
        if self.rotation.is_transposed() {
            self.width
        } else {
            self.height
        }
    }

    /// Panel width
    pub fn native_width(&self) -> u16 {
        self.width
    }

    /// Panel height
    pub fn native_height(&self) -> u16 {
        self.height
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Read a pixel at logical coordinates
    ///
    /// # Errors
    ///
    /// [`PixelError::OutOfRange`] outside `width() x height()`.
    pub fn get(&self, x: u16, y: u16) -> Result<PixelValue, PixelError> {
        let (nx, ny) = self.to_native(x, y)?;
        Ok(self.value_at(self.index(nx, ny)))
    }

    /// Read a pixel at native coordinates, ignoring rotation
    ///
    /// # Errors
    ///
    /// [`PixelError::OutOfRange`] outside the native size.
    pub fn native_get(&self, nx: u16, ny: u16) -> Result<PixelValue, PixelError> {
        if nx >= self.width || ny >= self.height {
            return Err(PixelError::OutOfRange {
                x: nx,
                y: ny,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.value_at(self.index(nx, ny)))
    }

    /// Backing store, exactly [`buffer_len`] bytes
    pub fn as_bytes(&self) -> &[u8] {
        let len = buffer_len(self.width, self.height);
        &self.buffer.as_ref()[..len]
    }

    /// Give back the backing storage
    pub fn into_inner(self) -> B {
        self.buffer
    }

    /// Value of the native pixel with row-major index `index`
    pub(crate) fn value_at(&self, index: usize) -> PixelValue {
        let byte = self.buffer.as_ref()[index / 2];
        if index % 2 == 0 {
            PixelValue::from_nibble(byte >> 4)
        } else {
            PixelValue::from_nibble(byte)
        }
    }

    pub(crate) fn index(&self, nx: u16, ny: u16) -> usize {
        ny as usize * self.width as usize + nx as usize
    }

    fn to_native(&self, x: u16, y: u16) -> Result<(u16, u16), PixelError> {
        let (w, h) = (self.width(), self.height());
        if x >= w || y >= h {
            return Err(PixelError::OutOfRange {
                x,
                y,
                width: w,
                height: h,
            });
        }
        Ok(self.remap(x, y))
    }

    /// Native position of an in-range logical point
    pub(crate) fn remap(&self, x: u16, y: u16) -> (u16, u16) {
        let (w, h) = (self.width(), self.height());
        match self.rotation {
            Rotation::Rotate0 => (x, y),
            Rotation::Rotate90 => (y, w - 1 - x),
            Rotation::Rotate180 => (self.width - 1 - x, self.height - 1 - y),
            Rotation::Rotate270 => (h - 1 - y, x),
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> FrameBuffer<B> {
    /// Change how logical coordinates map onto the store
    ///
    /// The stored pixels are not touched.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Write a pixel at logical coordinates
    ///
    /// # Errors
    ///
    /// [`PixelError::OutOfRange`] outside `width() x height()`.
    pub fn set(&mut self, x: u16, y: u16, value: PixelValue) -> Result<(), PixelError> {
        let (nx, ny) = self.to_native(x, y)?;
        let index = self.index(nx, ny);
        self.store(index, value);
        Ok(())
    }

    /// Write the native pixel with row-major index `index`
    pub(crate) fn store(&mut self, index: usize, value: PixelValue) {
        let byte = &mut self.buffer.as_mut()[index / 2];
        let v = value.get();
        if index % 2 == 0 {
            *byte = (*byte & 0x0F) | (v << 4);
        } else {
            *byte = (*byte & 0xF0) | v;
        }
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: PixelValue) {
        let len = buffer_len(self.width, self.height);
        let v = value.get();
        self.buffer.as_mut()[..len].fill((v << 4) | v);
    }
}

#[cfg(feature = "alloc")]
impl FrameBuffer<Vec<u8>> {
    /// Heap-allocate a grid filled with `value`
    ///
    /// # Errors
    ///
    /// [`PixelError::InvalidDimensions`] if either dimension is zero.
    pub fn alloc(width: u16, height: u16, value: PixelValue) -> Result<Self, PixelError> {
        let v = value.get();
        let buffer = alloc::vec![(v << 4) | v; buffer_len(width, height)];
        FrameBuffer::new(width, height, buffer)
    }
}
