//! Compressed RAW images
//!
//! [`InflateSource`] decompresses a zlib or raw deflate stream on the fly.
//! Paired with the flush engine it lets a panel be fed from a compressed
//! image without the decompressed frame ever existing in RAM.

use alloc::boxed::Box;
use miniz_oxide::inflate::stream::{InflateState, inflate};
use miniz_oxide::{DataFormat, MZError, MZFlush, MZStatus};

use crate::error::SourceError;
use crate::source::ChunkSource;

/// Compressed bytes read from the inner source per refill
const INPUT_SIZE: usize = 512;

/// Source decompressing another [`ChunkSource`]
pub struct InflateSource<S> {
    inner: S,
    state: Box<InflateState>,
    input: [u8; INPUT_SIZE],
    pos: usize,
    len: usize,
    inner_done: bool,
    finished: bool,
}

impl<S: ChunkSource> InflateSource<S> {
    /// Decompress a zlib stream (RFC 1950), checksum included
    pub fn zlib(inner: S) -> Self {
        Self::with_format(inner, DataFormat::Zlib)
    }

    /// Decompress a headerless deflate stream (RFC 1951)
    pub fn raw(inner: S) -> Self {
        Self::with_format(inner, DataFormat::Raw)
    }

    fn with_format(inner: S, format: DataFormat) -> Self {
        Self {
            inner,
            state: InflateState::new_boxed(format),
            input: [0; INPUT_SIZE],
            pos: 0,
            len: 0,
            inner_done: false,
            finished: false,
        }
    }

    /// Give back the compressed source
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn refill(&mut self) -> Result<(), SourceError> {
        if self.pos < self.len || self.inner_done {
            return Ok(());
        }
        let n = self.inner.read_chunk(&mut self.input)?;
        self.pos = 0;
        self.len = n;
        self.inner_done = n == 0;
        Ok(())
    }
}

impl<S: ChunkSource> ChunkSource for InflateSource<S> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }

        loop {
            self.refill()?;

            let result = inflate(
                &mut self.state,
                &self.input[self.pos..self.len],
                buf,
                MZFlush::None,
            );
            self.pos += result.bytes_consumed;
            let written = result.bytes_written;

            match result.status {
                Ok(MZStatus::StreamEnd) => {
                    log::debug!("[SRC] Deflate stream complete");
                    self.finished = true;
                    return Ok(written);
                }
                Ok(_) | Err(MZError::Buf) => {
                    if written > 0 {
                        return Ok(written);
                    }
                    if result.bytes_consumed == 0 && (self.inner_done || self.pos < self.len) {
                        log::warn!("[SRC] Deflate stream truncated");
                        return Err(SourceError::Corrupt);
                    }
                }
                Err(e) => {
                    log::warn!("[SRC] Deflate stream corrupt: {:?}", e);
                    return Err(SourceError::Corrupt);
                }
            }
        }
    }
}
