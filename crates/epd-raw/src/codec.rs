//! Framebuffer to panel RAW translation
//!
//! A [`Codec`] is bound to one [`DisplayDescriptor`]. [`Codec::encode`] turns a
//! [`FrameBuffer`] into a lazy [`Encoder`] that yields the panel's RAW bytes on
//! demand; [`Codec::decode`] goes the other way for round-trip checks.
//!
//! ## Layout
//!
//! Native pixels are visited in the descriptor's [`ScanOrder`]. Each pixel is
//! quantized to the nearest supported level (ties toward the lighter one) and
//! replaced by that level's wire code. Codes are then packed:
//!
//! - [`Packing::Chunky`]: `8 / bits_per_pixel` codes per byte
//! - [`Packing::Planar`]: one 1-bit plane per code bit, most significant plane
//!   first
//!
//! [`BitOrder`] decides whether the first pixel of a byte sits in its high or
//! low bits. Trailing bits of the last chunky byte carry the code of the
//! descriptor's pad level.
//!
//! ## Example
//!
//! ```
//! use epd_raw::{panels, Codec, FrameBuffer, PixelValue};
//!
//! let descriptor = panels::descriptor(panels::PanelId::Ws154);
//! let codec = Codec::new(descriptor).unwrap();
//!
//! let mut storage = [0u8; 20_000];
//! let mut fb = FrameBuffer::new(200, 200, &mut storage[..]).unwrap();
//! fb.fill(PixelValue::WHITE);
//! fb.set(0, 0, PixelValue::BLACK).unwrap();
//!
//! let raw: Vec<u8> = codec.encode(&fb).unwrap().take(2).collect();
//! assert_eq!(raw, [0x7F, 0xFF]);
//! ```

use crate::descriptor::{BitOrder, DisplayDescriptor, Packing, ScanOrder};
use crate::error::{CodecError, DescriptorError, SourceError};
use crate::framebuffer::FrameBuffer;
use crate::pixel::{CodeTable, PixelValue, quantize};
use crate::source::ChunkSource;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Bidirectional transform between a framebuffer and one panel's RAW layout
#[derive(Clone, Copy, Debug)]
pub struct Codec {
    descriptor: &'static DisplayDescriptor,
    table: CodeTable,
    pad_code: u8,
}

impl Codec {
    /// Create a codec for `descriptor`
    ///
    /// # Errors
    ///
    /// Returns the descriptor's validation error, if any.
    pub fn new(descriptor: &'static DisplayDescriptor) -> Result<Self, DescriptorError> {
        descriptor.validate()?;
        Ok(Self::from_validated(descriptor))
    }

    /// Create a codec for a descriptor that already passed validation
    pub(crate) fn from_validated(descriptor: &'static DisplayDescriptor) -> Self {
        let table = CodeTable::new(descriptor.levels);
        Self {
            descriptor,
            table,
            pad_code: table.code(descriptor.pad),
        }
    }

    /// Panel descriptor
    pub fn descriptor(&self) -> &'static DisplayDescriptor {
        self.descriptor
    }

    /// RAW length of one frame
    pub fn raw_len(&self) -> usize {
        self.descriptor.raw_len()
    }

    /// Lazily encode `fb`
    ///
    /// # Errors
    ///
    /// [`CodecError::SizeMismatch`] if the framebuffer's native size is not
    /// the panel's.
    pub fn encode<'a, B: AsRef<[u8]>>(
        &self,
        fb: &'a FrameBuffer<B>,
    ) -> Result<Encoder<'a, B>, CodecError> {
        self.check_size(fb)?;
        Ok(Encoder {
            codec: *self,
            fb,
            pos: 0,
            len: self.raw_len(),
        })
    }

    /// Encode `fb` into the front of `out`, returning the RAW length
    ///
    /// # Errors
    ///
    /// - [`CodecError::SizeMismatch`] for a framebuffer of the wrong size
    /// - [`CodecError::LengthMismatch`] if `out` is shorter than the RAW length
    pub fn encode_into<B: AsRef<[u8]>>(
        &self,
        fb: &FrameBuffer<B>,
        out: &mut [u8],
    ) -> Result<usize, CodecError> {
        let len = self.raw_len();
        if out.len() < len {
            return Err(CodecError::LengthMismatch {
                expected: len,
                provided: out.len(),
            });
        }
        let mut encoder = self.encode(fb)?;
        encoder.fill(&mut out[..len]);
        Ok(len)
    }

    /// Encode `fb` into a freshly allocated RAW image
    ///
    /// # Errors
    ///
    /// [`CodecError::SizeMismatch`] for a framebuffer of the wrong size.
    #[cfg(feature = "alloc")]
    pub fn encode_to_vec<B: AsRef<[u8]>>(&self, fb: &FrameBuffer<B>) -> Result<Vec<u8>, CodecError> {
        Ok(self.encode(fb)?.collect())
    }

    /// Reverse [`encode`](Self::encode): unpack `raw` into `fb`
    ///
    /// Padding bits are ignored. The framebuffer's rotation is ignored too,
    /// pixels are written at their native positions.
    ///
    /// # Errors
    ///
    /// - [`CodecError::SizeMismatch`] for a framebuffer of the wrong size
    /// - [`CodecError::LengthMismatch`] if `raw` is not exactly one frame
    /// - [`CodecError::UnknownCode`] for a code no level maps to
    pub fn decode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        raw: &[u8],
        fb: &mut FrameBuffer<B>,
    ) -> Result<(), CodecError> {
        self.check_size(fb)?;
        if raw.len() != self.raw_len() {
            return Err(CodecError::LengthMismatch {
                expected: self.raw_len(),
                provided: raw.len(),
            });
        }

        let desc = self.descriptor;
        for p in 0..desc.pixel_count() {
            let code = self.read_code(raw, p);
            let level = desc
                .levels
                .iter()
                .find(|l| l.code == code)
                .ok_or(CodecError::UnknownCode { code, index: p })?;
            fb.store(native_index(desc, p), level.value);
        }
        Ok(())
    }

    /// Nearest supported level for `value`, as the panel will show it
    pub fn quantize(&self, value: PixelValue) -> PixelValue {
        quantize(self.descriptor.levels, value)
            .map(|l| l.value)
            .unwrap_or(value)
    }

    fn check_size<B: AsRef<[u8]>>(&self, fb: &FrameBuffer<B>) -> Result<(), CodecError> {
        let desc = self.descriptor;
        if fb.native_width() != desc.width || fb.native_height() != desc.height {
            return Err(CodecError::SizeMismatch {
                expected_width: desc.width,
                expected_height: desc.height,
                width: fb.native_width(),
                height: fb.native_height(),
            });
        }
        Ok(())
    }

    /// Wire code of scan position `p` in `raw`
    fn read_code(&self, raw: &[u8], p: usize) -> u8 {
        let desc = self.descriptor;
        let bpp = desc.bits_per_pixel as usize;
        match desc.packing {
            Packing::Chunky => {
                let ppb = desc.pixels_per_byte();
                let shift = chunky_shift(desc.bit_order, bpp, p % ppb);
                let mask = ((1u16 << bpp) - 1) as u8;
                (raw[p / ppb] >> shift) & mask
            }
            Packing::Planar => {
                let plane_len = desc.pixel_count() / 8;
                let shift = planar_shift(desc.bit_order, p % 8);
                (0..bpp).fold(0u8, |code, plane| {
                    let bit = (raw[plane * plane_len + p / 8] >> shift) & 1;
                    code | (bit << (bpp - 1 - plane))
                })
            }
        }
    }
}

/// Bit offset of slot `k` of a chunky byte
fn chunky_shift(order: BitOrder, bpp: usize, k: usize) -> usize {
    match order {
        BitOrder::MsbFirst => 8 - bpp * (k + 1),
        BitOrder::LsbFirst => bpp * k,
    }
}

/// Bit offset of slot `k` of a plane byte
fn planar_shift(order: BitOrder, k: usize) -> usize {
    match order {
        BitOrder::MsbFirst => 7 - k,
        BitOrder::LsbFirst => k,
    }
}

/// Row-major framebuffer index of scan position `p`
fn native_index(desc: &DisplayDescriptor, p: usize) -> usize {
    let (w, h) = (desc.width as usize, desc.height as usize);
    match desc.scan {
        ScanOrder::RowMajor => p,
        ScanOrder::ColumnMajor => (p % h) * w + p / h,
    }
}

/// Lazy RAW byte sequence of one framebuffer
///
/// Yields exactly [`DisplayDescriptor::raw_len`] bytes. Cloning gives an
/// independent cursor over the same framebuffer, so a frame can be encoded
/// again without touching the pixels.
#[derive(Debug)]
pub struct Encoder<'a, B> {
    codec: Codec,
    fb: &'a FrameBuffer<B>,
    pos: usize,
    len: usize,
}

impl<B> Clone for Encoder<'_, B> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec,
            fb: self.fb,
            pos: self.pos,
            len: self.len,
        }
    }
}

impl<B: AsRef<[u8]>> Encoder<'_, B> {
    /// Bytes not produced yet
    pub fn remaining(&self) -> usize {
        self.len - self.pos
    }

    /// Start over from the first byte
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Produce the next `out.len()` bytes (the caller bounds it by `remaining`)
    fn fill(&mut self, out: &mut [u8]) {
        for slot in out.iter_mut() {
            *slot = self.byte_at(self.pos);
            self.pos += 1;
        }
    }

    fn code_at(&self, p: usize) -> u8 {
        let desc = self.codec.descriptor;
        if p < desc.pixel_count() {
            self.codec
                .table
                .code(self.fb.value_at(native_index(desc, p)))
        } else {
            self.codec.pad_code
        }
    }

    fn byte_at(&self, i: usize) -> u8 {
        let desc = self.codec.descriptor;
        let bpp = desc.bits_per_pixel as usize;
        match desc.packing {
            Packing::Chunky => {
                let ppb = desc.pixels_per_byte();
                (0..ppb).fold(0u8, |byte, k| {
                    let code = self.code_at(i * ppb + k);
                    byte | (code << chunky_shift(desc.bit_order, bpp, k))
                })
            }
            Packing::Planar => {
                let plane_len = desc.pixel_count() / 8;
                let bit = bpp - 1 - i / plane_len;
                let first = (i % plane_len) * 8;
                (0..8).fold(0u8, |byte, k| {
                    let b = (self.code_at(first + k) >> bit) & 1;
                    byte | (b << planar_shift(desc.bit_order, k))
                })
            }
        }
    }
}

impl<B: AsRef<[u8]>> Iterator for Encoder<'_, B> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.pos >= self.len {
            return None;
        }
        let byte = self.byte_at(self.pos);
        self.pos += 1;
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<B: AsRef<[u8]>> ExactSizeIterator for Encoder<'_, B> {}

impl<B: AsRef<[u8]>> ChunkSource for Encoder<'_, B> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let n = buf.len().min(self.remaining());
        self.fill(&mut buf[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::tests::{leak, tiny};
    use crate::pixel::Level;
    use alloc::vec::Vec;

    fn px(value: u8) -> PixelValue {
        PixelValue::new(value).unwrap()
    }

    /// 2x2 framebuffer holding `values` in row-major order
    fn frame(values: [u8; 4]) -> FrameBuffer<[u8; 2]> {
        let mut fb = FrameBuffer::new(2, 2, [0u8; 2]).unwrap();
        for (i, v) in values.iter().enumerate() {
            fb.set(i as u16 % 2, i as u16 / 2, px(*v)).unwrap();
        }
        fb
    }

    fn encode_all<B: AsRef<[u8]>>(codec: &Codec, fb: &FrameBuffer<B>) -> Vec<u8> {
        codec.encode(fb).unwrap().collect()
    }

    #[test]
    fn test_four_level_chunky_byte() {
        let codec = Codec::new(leak(tiny(2, 2))).unwrap();
        let fb = frame([0, 5, 10, 15]);
        assert_eq!(encode_all(&codec, &fb), [0b00_01_10_11]);
    }

    #[test]
    fn test_lsb_first() {
        let mut desc = tiny(2, 2);
        desc.bit_order = BitOrder::LsbFirst;
        let codec = Codec::new(leak(desc)).unwrap();
        assert_eq!(encode_all(&codec, &frame([0, 5, 10, 15])), [0b11_10_01_00]);
    }

    #[test]
    fn test_column_major() {
        let mut desc = tiny(2, 2);
        desc.scan = ScanOrder::ColumnMajor;
        let codec = Codec::new(leak(desc)).unwrap();
        // visits (0,0) (0,1) (1,0) (1,1)
        assert_eq!(encode_all(&codec, &frame([0, 5, 10, 15])), [0b00_10_01_11]);
    }

    #[test]
    fn test_rotation_changes_native_placement() {
        let codec = Codec::new(leak(tiny(2, 2))).unwrap();
        let mut fb = FrameBuffer::new(2, 2, [0u8; 2]).unwrap();
        fb.set_rotation(crate::config::Rotation::Rotate180);
        for (i, v) in [0u8, 5, 10, 15].iter().enumerate() {
            fb.set(i as u16 % 2, i as u16 / 2, px(*v)).unwrap();
        }
        assert_eq!(encode_all(&codec, &fb), [0b11_10_01_00]);
    }

    #[test]
    fn test_quantizes_between_levels() {
        let codec = Codec::new(leak(tiny(2, 2))).unwrap();
        // 2 -> 0, 3 -> 5, 7 -> 5, 8 -> 10
        assert_eq!(encode_all(&codec, &frame([2, 3, 7, 8])), [0b00_01_01_10]);
        assert_eq!(codec.quantize(px(12)), px(10));
        assert_eq!(codec.quantize(px(13)), px(15));
    }

    #[test]
    fn test_padding_uses_pad_level() {
        let codec = Codec::new(leak(tiny(3, 1))).unwrap();
        let mut fb = FrameBuffer::new(3, 1, [0u8; 2]).unwrap();
        fb.fill(PixelValue::BLACK);
        // pad level is white (code 3)
        assert_eq!(encode_all(&codec, &fb), [0b00_00_00_11]);

        let mut desc = tiny(3, 1);
        desc.pad = PixelValue::BLACK;
        let codec = Codec::new(leak(desc)).unwrap();
        fb.fill(PixelValue::WHITE);
        assert_eq!(encode_all(&codec, &fb), [0b11_11_11_00]);
    }

    #[test]
    fn test_length_matches_formula() {
        for (w, h) in [(1, 1), (2, 2), (3, 3), (5, 2), (7, 3), (16, 1)] {
            let desc = leak(tiny(w, h));
            let codec = Codec::new(desc).unwrap();
            let storage = alloc::vec![0u8; crate::framebuffer::buffer_len(w, h)];
            let fb = FrameBuffer::new(w, h, storage).unwrap();
            let encoder = codec.encode(&fb).unwrap();
            let expected = (w as usize * h as usize * 2).div_ceil(8);
            assert_eq!(encoder.len(), expected);
            assert_eq!(encoder.count(), expected);
        }
    }

    #[test]
    fn test_planar_planes() {
        let mut desc = tiny(4, 2);
        desc.packing = Packing::Planar;
        let codec = Codec::new(leak(desc)).unwrap();

        let mut fb = FrameBuffer::new(4, 2, [0u8; 4]).unwrap();
        for (i, v) in [0u8, 5, 10, 15, 15, 10, 5, 0].iter().enumerate() {
            fb.set(i as u16 % 4, i as u16 / 4, px(*v)).unwrap();
        }
        // codes 0 1 2 3 3 2 1 0: high bits, then low bits
        assert_eq!(encode_all(&codec, &fb), [0b0011_1100, 0b0101_1010]);
    }

    #[test]
    fn test_one_bit_chunky() {
        static MONO: [Level; 2] = [Level::new(0, 0), Level::new(15, 1)];
        let mut desc = tiny(10, 1);
        desc.levels = &MONO;
        desc.bits_per_pixel = 1;
        let codec = Codec::new(leak(desc)).unwrap();

        let mut fb = FrameBuffer::new(10, 1, [0u8; 5]).unwrap();
        fb.fill(PixelValue::WHITE);
        fb.set(1, 0, px(7)).unwrap();
        fb.set(9, 0, px(0)).unwrap();
        assert_eq!(encode_all(&codec, &fb), [0b1011_1111, 0b1011_1111]);
    }

    #[test]
    fn test_size_mismatch() {
        let codec = Codec::new(leak(tiny(2, 2))).unwrap();
        let fb = FrameBuffer::new(2, 3, [0u8; 3]).unwrap();
        assert_eq!(
            codec.encode(&fb).err(),
            Some(CodecError::SizeMismatch {
                expected_width: 2,
                expected_height: 2,
                width: 2,
                height: 3
            })
        );
    }

    #[test]
    fn test_decode_round_trip() {
        for (packing, order, scan) in [
            (Packing::Chunky, BitOrder::MsbFirst, ScanOrder::RowMajor),
            (Packing::Chunky, BitOrder::LsbFirst, ScanOrder::ColumnMajor),
            (Packing::Planar, BitOrder::MsbFirst, ScanOrder::ColumnMajor),
        ] {
            let mut desc = tiny(4, 4);
            desc.packing = packing;
            desc.bit_order = order;
            desc.scan = scan;
            let codec = Codec::new(leak(desc)).unwrap();

            let mut fb = FrameBuffer::new(4, 4, [0u8; 8]).unwrap();
            for i in 0..16u16 {
                fb.set(i % 4, i / 4, px(i as u8)).unwrap();
            }
            let raw = encode_all(&codec, &fb);

            let mut out = FrameBuffer::new(4, 4, [0u8; 8]).unwrap();
            codec.decode(&raw, &mut out).unwrap();
            for i in 0..16u16 {
                let expected = codec.quantize(px(i as u8));
                assert_eq!(out.get(i % 4, i / 4), Ok(expected));
            }
        }
    }

    #[test]
    fn test_decode_unknown_code() {
        static SPARSE: [Level; 2] = [Level::new(0, 0), Level::new(15, 3)];
        let mut desc = tiny(2, 2);
        desc.levels = &SPARSE;
        let codec = Codec::new(leak(desc)).unwrap();
        let mut fb = FrameBuffer::new(2, 2, [0u8; 2]).unwrap();
        assert_eq!(
            codec.decode(&[0b00_01_10_11], &mut fb),
            Err(CodecError::UnknownCode { code: 1, index: 1 })
        );
    }

    #[test]
    fn test_decode_length_mismatch() {
        let codec = Codec::new(leak(tiny(2, 2))).unwrap();
        let mut fb = FrameBuffer::new(2, 2, [0u8; 2]).unwrap();
        assert_eq!(
            codec.decode(&[0, 0], &mut fb),
            Err(CodecError::LengthMismatch {
                expected: 1,
                provided: 2
            })
        );
    }

    #[test]
    fn test_encoder_chunks_and_restarts() {
        let codec = Codec::new(leak(tiny(4, 4))).unwrap();
        let mut fb = FrameBuffer::new(4, 4, [0u8; 8]).unwrap();
        for i in 0..16u16 {
            fb.set(i % 4, i / 4, px(i as u8)).unwrap();
        }
        let whole = encode_all(&codec, &fb);

        let mut encoder = codec.encode(&fb).unwrap();
        let replay = encoder.clone();
        let mut chunked = Vec::new();
        let mut buf = [0u8; 3];
        loop {
            let n = encoder.read_chunk(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            chunked.extend_from_slice(&buf[..n]);
        }
        assert_eq!(chunked, whole);
        assert_eq!(replay.collect::<Vec<_>>(), whole);

        encoder.rewind();
        assert_eq!(encoder.len(), whole.len());
    }

    #[test]
    fn test_encode_into() {
        let codec = Codec::new(leak(tiny(2, 2))).unwrap();
        let fb = frame([15, 15, 0, 0]);
        let mut out = [0xAAu8; 3];
        assert_eq!(codec.encode_into(&fb, &mut out), Ok(1));
        assert_eq!(out, [0b11_11_00_00, 0xAA, 0xAA]);
        assert_eq!(
            codec.encode_into(&fb, &mut []),
            Err(CodecError::LengthMismatch {
                expected: 1,
                provided: 0
            })
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_encode_to_vec() {
        let codec = Codec::new(leak(tiny(2, 2))).unwrap();
        let fb = frame([0, 5, 10, 15]);
        assert_eq!(codec.encode_to_vec(&fb), Ok(alloc::vec![0b00_01_10_11]));
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        let mut desc = tiny(2, 2);
        desc.bits_per_pixel = 0;
        assert_eq!(
            Codec::new(leak(desc)).err(),
            Some(DescriptorError::InvalidBitsPerPixel(0))
        );
    }
}
