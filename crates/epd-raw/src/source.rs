//! Chunked byte sources for the low-memory path
//!
//! A [`ChunkSource`] hands out RAW bytes a chunk at a time, so a panel can be
//! fed from a file, a network stream or a decompressor without ever holding
//! the whole image in RAM. The codec's [`Encoder`](crate::codec::Encoder) is
//! a `ChunkSource` too, which is how the framebuffer path shares the same
//! transfer code.
//!
//! Sources are finite and, apart from the encoder, not restartable.

use crate::error::SourceError;

/// Producer of the next chunk of RAW bytes
pub trait ChunkSource {
    /// Fill the front of `buf` with the next bytes of the stream
    ///
    /// Returns the number of bytes written, `0` once the stream is exhausted.
    /// A short (non-zero) read does not mean the stream has ended. `buf` is
    /// never empty when called by the driver.
    ///
    /// # Errors
    ///
    /// [`SourceError`] if the underlying stream fails; the source should not
    /// be used afterwards.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        (**self).read_chunk(buf)
    }
}

/// Source over an in-memory RAW image
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Stream `data` from the start
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Bytes not handed out yet
    pub fn remaining(&self) -> usize {
        self.data.len()
    }
}

impl ChunkSource for SliceSource<'_> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let n = buf.len().min(self.data.len());
        let (head, tail) = self.data.split_at(n);
        buf[..n].copy_from_slice(head);
        self.data = tail;
        Ok(n)
    }
}

/// Source over any [`std::io::Read`], e.g. a RAW image file
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ReaderSource<R> {
    /// Wrap `reader`
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Give back the reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ChunkSource for ReaderSource<R> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        loop {
            match self.reader.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("[SRC] Read failed: {}", e);
                    return Err(SourceError::Io);
                }
            }
        }
    }
}
