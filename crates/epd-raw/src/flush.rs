//! Chunked RAW transfer
//!
//! The [`FlushEngine`] moves exactly one frame of RAW bytes from a
//! [`ChunkSource`] to a [`Transport`] through a fixed scratch buffer, so the
//! RAM cost of a flush is one chunk no matter how large the panel is.

use crate::descriptor::DisplayDescriptor;
use crate::error::FlushError;
use crate::interface::Transport;
use crate::source::ChunkSource;

/// Default bytes per transfer
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Largest supported chunk, the size of the scratch buffer
pub const MAX_CHUNK_SIZE: usize = 4096;

/// Streams RAW data in bounded chunks
///
/// RAW bytes are split evenly across the descriptor's data commands; each
/// command is sent right before its segment.
pub struct FlushEngine {
    scratch: [u8; MAX_CHUNK_SIZE],
    chunk_size: usize,
}

impl FlushEngine {
    /// Create an engine reading `chunk_size` bytes at a time
    ///
    /// `chunk_size` is clamped to `1..=MAX_CHUNK_SIZE`.
    pub const fn new(chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            1
        } else if chunk_size > MAX_CHUNK_SIZE {
            MAX_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            scratch: [0; MAX_CHUNK_SIZE],
            chunk_size,
        }
    }

    /// Bytes per transfer
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Send one frame from `source`
    ///
    /// Returns the number of RAW bytes written, always
    /// [`raw_len`](DisplayDescriptor::raw_len) on success.
    ///
    /// # Errors
    ///
    /// - [`FlushError::ShortWrite`] if the source ends early
    /// - [`FlushError::Truncation`] if the source has bytes left after the frame
    /// - [`FlushError::Source`] / [`FlushError::Interface`] on I/O failure
    ///
    /// The panel RAM content is undefined after any error.
    pub fn flush<T, S>(
        &mut self,
        transport: &mut T,
        source: &mut S,
        descriptor: &DisplayDescriptor,
    ) -> Result<usize, FlushError<T::Error>>
    where
        T: Transport,
        S: ChunkSource + ?Sized,
    {
        let expected = descriptor.raw_len();
        let commands = descriptor.commands.data_commands;
        let segment_len = descriptor.segment_len();
        let mut sent = 0;

        for segment in 0..commands.len().max(1) {
            if let Some(&command) = commands.get(segment) {
                transport
                    .write_command(command)
                    .map_err(FlushError::Interface)?;
            }

            let mut left = segment_len;
            while left > 0 {
                let want = left.min(self.chunk_size);
                let n = source
                    .read_chunk(&mut self.scratch[..want])
                    .map_err(FlushError::Source)?
                    .min(want);
                if n == 0 {
                    log::warn!("[EPD] Source ended after {} of {} bytes", sent, expected);
                    return Err(FlushError::ShortWrite {
                        expected,
                        received: sent,
                    });
                }
                transport
                    .write_data(&self.scratch[..n])
                    .map_err(FlushError::Interface)?;
                sent += n;
                left -= n;
            }
            log::debug!("[EPD] Segment {} done ({} bytes)", segment, segment_len);
        }

        // one extra byte tells a longer source from an exact one
        let extra = source
            .read_chunk(&mut self.scratch[..1])
            .map_err(FlushError::Source)?;
        if extra > 0 {
            log::warn!("[EPD] Source longer than {} bytes", expected);
            return Err(FlushError::Truncation { expected });
        }

        Ok(sent)
    }
}

impl Default for FlushEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::tests::tiny;
    use crate::error::SourceError;
    use crate::mock::{MockError, MockTransport, Op};
    use crate::source::SliceSource;
    use alloc::vec::Vec;

    /// 8x8 at 2bpp: 16 RAW bytes
    fn frame() -> Vec<u8> {
        (0..16).collect()
    }

    /// Hands out one byte per call
    struct Trickle<'a>(&'a [u8]);

    impl ChunkSource for Trickle<'_> {
        fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
            match self.0.split_first() {
                Some((first, rest)) => {
                    buf[0] = *first;
                    self.0 = rest;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    struct Failing;

    impl ChunkSource for Failing {
        fn read_chunk(&mut self, _buf: &mut [u8]) -> Result<usize, SourceError> {
            Err(SourceError::Corrupt)
        }
    }

    #[test]
    fn test_streams_in_chunks() {
        let desc = tiny(8, 8);
        let data = frame();
        let mut transport = MockTransport::new(false);
        let mut engine = FlushEngine::new(5);

        let sent = engine
            .flush(&mut transport, &mut SliceSource::new(&data), &desc)
            .unwrap();

        assert_eq!(sent, 16);
        assert_eq!(transport.commands(), [0x24]);
        assert_eq!(transport.data_sizes(), [5, 5, 5, 1]);
        assert_eq!(transport.data_for(0x24), data);
    }

    #[test]
    fn test_segments_get_their_command() {
        static PLANES: [u8; 2] = [0x10, 0x13];
        let mut desc = tiny(8, 8);
        desc.commands.data_commands = &PLANES;
        let data = frame();
        let mut transport = MockTransport::new(false);
        let mut engine = FlushEngine::new(5);

        engine
            .flush(&mut transport, &mut SliceSource::new(&data), &desc)
            .unwrap();

        assert_eq!(
            transport.ops,
            [
                Op::Command(0x10),
                Op::Data((0..5).collect()),
                Op::Data((5..8).collect()),
                Op::Command(0x13),
                Op::Data((8..13).collect()),
                Op::Data((13..16).collect()),
            ]
        );
    }

    #[test]
    fn test_no_data_command() {
        let mut desc = tiny(8, 8);
        desc.commands.data_commands = &[];
        let data = frame();
        let mut transport = MockTransport::new(false);

        FlushEngine::default()
            .flush(&mut transport, &mut SliceSource::new(&data), &desc)
            .unwrap();

        assert!(transport.commands().is_empty());
        assert_eq!(transport.data_sizes(), [16]);
    }

    #[test]
    fn test_short_source() {
        let desc = tiny(8, 8);
        let data = frame();
        let mut transport = MockTransport::new(false);
        let mut engine = FlushEngine::new(4);

        let result = engine.flush(&mut transport, &mut SliceSource::new(&data[..10]), &desc);

        assert_eq!(
            result,
            Err(FlushError::ShortWrite {
                expected: 16,
                received: 10
            })
        );
    }

    #[test]
    fn test_long_source() {
        let desc = tiny(8, 8);
        let data: Vec<u8> = (0..17).collect();
        let mut transport = MockTransport::new(false);
        let mut engine = FlushEngine::new(4);

        let result = engine.flush(&mut transport, &mut SliceSource::new(&data), &desc);

        assert_eq!(result, Err(FlushError::Truncation { expected: 16 }));
        assert_eq!(transport.data_for(0x24), data[..16]);
    }

    #[test]
    fn test_trickling_source() {
        let desc = tiny(8, 8);
        let data = frame();
        let mut transport = MockTransport::new(false);

        let sent = FlushEngine::default()
            .flush(&mut transport, &mut Trickle(&data), &desc)
            .unwrap();

        assert_eq!(sent, 16);
        assert_eq!(transport.data_sizes(), [1usize; 16]);
    }

    #[test]
    fn test_source_error() {
        let desc = tiny(8, 8);
        let mut transport = MockTransport::new(false);

        let result = FlushEngine::default().flush(&mut transport, &mut Failing, &desc);

        assert_eq!(result, Err(FlushError::Source(SourceError::Corrupt)));
    }

    #[test]
    fn test_transport_error() {
        let desc = tiny(8, 8);
        let data = frame();
        let mut transport = MockTransport::new(false);
        transport.fail_data_write = Some(1);
        let mut engine = FlushEngine::new(8);

        let result = engine.flush(&mut transport, &mut SliceSource::new(&data), &desc);

        assert_eq!(result, Err(FlushError::Interface(MockError)));
    }

    #[test]
    fn test_chunk_size_is_clamped() {
        assert_eq!(FlushEngine::new(0).chunk_size(), 1);
        assert_eq!(FlushEngine::new(1 << 20).chunk_size(), MAX_CHUNK_SIZE);
        assert_eq!(FlushEngine::default().chunk_size(), DEFAULT_CHUNK_SIZE);
    }
}
