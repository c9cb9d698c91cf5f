//! Panel protocol state machine
//!
//! [`Device`] sequences the panel's command tables around the
//! [`FlushEngine`]:
//!
//! ```text
//! PoweredOff --init--> Init --(init steps sent)--> Idle
//! Idle --flush--> Writing --(frame sent)--> Refreshing --(busy clears)--> Idle
//! Refreshing --(timeout)--> Idle, DeviceTimeout
//! Writing --(transfer error)--> Idle, error returned
//! Idle --sleep--> Sleep --init--> Init
//! ```
//!
//! Every operation blocks until done. Nothing is queued and nothing is
//! retried internally; [`Error::recovery`] tells the caller what to do next.

use embedded_hal::delay::DelayNs;

use crate::codec::Codec;
use crate::config::Config;
use crate::descriptor::{DisplayDescriptor, Step, Wait};
use crate::error::{BuilderError, Error, PixelError};
use crate::flush::FlushEngine;
use crate::framebuffer::FrameBuffer;
use crate::interface::Transport;
use crate::source::ChunkSource;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Lifecycle state of a [`Device`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    /// Not initialized since power-up or a failed operation
    PoweredOff,
    /// Running the init sequence
    Init,
    /// Ready for a flush
    Idle,
    /// Streaming RAW data
    Writing,
    /// Waiting for the panel to finish a refresh
    Refreshing,
    /// Deep sleep, `init` required
    Sleep,
}

/// Operation a busy-wait belonged to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Init sequence
    Init,
    /// Pre-write steps and RAW transfer
    Write,
    /// Refresh sequence
    Refresh,
    /// Sleep sequence
    Sleep,
}

/// One panel behind one transport
pub struct Device<T: Transport> {
    /// Hardware transport
    transport: T,
    /// Panel and tuning
    config: Config,
    /// Framebuffer encoder for this panel
    codec: Codec,
    /// Chunked transfer with its scratch buffer
    engine: FlushEngine,
    /// Lifecycle state
    state: DeviceState,
}

impl<T: Transport> Device<T> {
    /// Create a device in the [`DeviceState::PoweredOff`] state
    ///
    /// Nothing is sent until [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// The checks of [`Builder::build`](crate::config::Builder::build), run
    /// again since [`Config`] fields are public.
    pub fn new(transport: T, config: Config) -> Result<Self, BuilderError> {
        config.validate()?;
        Ok(Self {
            transport,
            codec: Codec::from_validated(config.descriptor),
            engine: FlushEngine::new(config.chunk_size),
            config,
            state: DeviceState::PoweredOff,
        })
    }

    /// Hardware reset followed by the panel's init sequence
    ///
    /// Allowed from any state. The device is [`DeviceState::Idle`] only after
    /// the last init step succeeded.
    ///
    /// # Errors
    ///
    /// [`Error::Interface`] or [`Error::DeviceTimeout`]; the state is then
    /// [`DeviceState::PoweredOff`].
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<T>> {
        log::info!("[EPD] Init {}", self.descriptor().name);
        self.state = DeviceState::Init;

        match self.reset_and_run_init(delay) {
            Ok(()) => {
                self.state = DeviceState::Idle;
                log::info!("[EPD] Ready");
                Ok(())
            }
            Err(e) => {
                self.state = DeviceState::PoweredOff;
                log::warn!("[EPD] Init failed: {}", e);
                Err(e)
            }
        }
    }

    /// Stream one frame of RAW data from `source`, then refresh
    ///
    /// `source` must yield exactly
    /// [`raw_len`](DisplayDescriptor::raw_len) bytes. The device is back in
    /// [`DeviceState::Idle`] when this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before `init` or after `sleep`
    /// - [`Error::Busy`] if the panel is still working on a previous refresh
    /// - [`Error::ShortWrite`] / [`Error::Truncation`] for a source of the
    ///   wrong length; no refresh is issued
    /// - [`Error::Source`] / [`Error::Interface`] on I/O failure
    /// - [`Error::DeviceTimeout`] if the panel stays busy too long
    pub fn flush<S, D>(&mut self, source: &mut S, delay: &mut D) -> Result<(), Error<T>>
    where
        S: ChunkSource + ?Sized,
        D: DelayNs,
    {
        self.check_ready()?;
        if self.line_busy()? {
            log::warn!("[EPD] Flush rejected, panel still busy");
            return Err(Error::Busy {
                state: DeviceState::Refreshing,
            });
        }

        self.state = DeviceState::Writing;
        let result = self.write_and_refresh(source, delay);
        self.state = DeviceState::Idle;
        result
    }

    /// Encode `fb` and [`flush`](Self::flush) it
    ///
    /// # Errors
    ///
    /// As [`flush`](Self::flush), plus [`Error::Codec`] if the framebuffer
    /// does not match the panel.
    pub fn flush_frame<B, D>(&mut self, fb: &FrameBuffer<B>, delay: &mut D) -> Result<(), Error<T>>
    where
        B: AsRef<[u8]>,
        D: DelayNs,
    {
        self.check_ready()?;
        let mut encoder = self.codec.encode(fb)?;
        self.flush(&mut encoder, delay)
    }

    /// Put the panel into deep sleep
    ///
    /// Sleeping an already sleeping device does nothing.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] from [`DeviceState::PoweredOff`], or an I/O /
    /// timeout error, after which the state is `PoweredOff`.
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<T>> {
        if self.state == DeviceState::Sleep {
            return Ok(());
        }
        self.check_ready()?;

        match self.run_steps(self.descriptor().commands.sleep, Phase::Sleep, delay) {
            Ok(()) => {
                self.state = DeviceState::Sleep;
                log::info!("[EPD] Sleep");
                Ok(())
            }
            Err(e) => {
                self.state = DeviceState::PoweredOff;
                Err(e)
            }
        }
    }

    /// Wrap `storage` as a framebuffer for this panel
    ///
    /// The buffer gets the configured rotation and is filled with the
    /// panel's default level.
    ///
    /// # Errors
    ///
    /// [`PixelError::BufferTooSmall`] if `storage` cannot hold the panel.
    pub fn frame_buffer<B>(&self, storage: B) -> Result<FrameBuffer<B>, PixelError>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let desc = self.descriptor();
        let mut fb = FrameBuffer::new(desc.width, desc.height, storage)?;
        fb.set_rotation(self.config.rotation);
        fb.fill(desc.default_level);
        Ok(fb)
    }

    /// Heap-allocate a framebuffer for this panel
    ///
    /// # Errors
    ///
    /// Only for an invalid descriptor, which [`Config`] construction rules out.
    #[cfg(feature = "alloc")]
    pub fn new_frame_buffer(&self) -> Result<FrameBuffer<Vec<u8>>, PixelError> {
        let desc = self.descriptor();
        let mut fb = FrameBuffer::alloc(desc.width, desc.height, desc.default_level)?;
        fb.set_rotation(self.config.rotation);
        Ok(fb)
    }

    /// Current lifecycle state
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Panel descriptor
    pub fn descriptor(&self) -> &'static DisplayDescriptor {
        self.config.descriptor
    }

    /// Codec for this panel
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }

    fn check_ready(&self) -> Result<(), Error<T>> {
        match self.state {
            DeviceState::Idle => Ok(()),
            DeviceState::PoweredOff | DeviceState::Sleep => {
                Err(Error::NotInitialized { state: self.state })
            }
            DeviceState::Init | DeviceState::Writing | DeviceState::Refreshing => {
                Err(Error::Busy { state: self.state })
            }
        }
    }

    fn reset_and_run_init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<T>> {
        let desc = self.descriptor();
        self.transport
            .assert_reset(delay, &desc.timing)
            .map_err(Error::Interface)?;
        self.run_steps(desc.commands.init, Phase::Init, delay)
    }

    fn write_and_refresh<S, D>(&mut self, source: &mut S, delay: &mut D) -> Result<(), Error<T>>
    where
        S: ChunkSource + ?Sized,
        D: DelayNs,
    {
        let desc = self.descriptor();
        self.run_steps(desc.commands.pre_write, Phase::Write, delay)?;

        let sent = self.engine.flush(&mut self.transport, source, desc)?;
        log::info!("[EPD] Wrote {} bytes", sent);

        self.state = DeviceState::Refreshing;
        self.run_steps(desc.commands.refresh, Phase::Refresh, delay)?;
        log::info!("[EPD] Refresh done");
        Ok(())
    }

    fn run_steps<D: DelayNs>(
        &mut self,
        steps: &[Step],
        phase: Phase,
        delay: &mut D,
    ) -> Result<(), Error<T>> {
        for step in steps {
            match *step {
                Step::Send { command, data } => {
                    self.transport
                        .write_command(command)
                        .map_err(Error::Interface)?;
                    if !data.is_empty() {
                        self.transport.write_data(data).map_err(Error::Interface)?;
                    }
                }
                Step::DelayMs(ms) => delay.delay_ms(ms),
                Step::WaitReady(wait) => self.wait_ready(wait, phase, delay)?,
            }
        }
        Ok(())
    }

    /// Poll BUSY until it clears or the bound for `wait` runs out
    fn wait_ready<D: DelayNs>(
        &mut self,
        wait: Wait,
        phase: Phase,
        delay: &mut D,
    ) -> Result<(), Error<T>> {
        let timing = &self.descriptor().timing;
        let timeout_ms = self.config.busy_timeout_ms.unwrap_or(match wait {
            Wait::Busy => timing.busy_timeout_ms,
            Wait::Refresh => timing.refresh_timeout_ms,
        });
        let interval_ms = self.config.poll_interval_ms.max(1);

        let mut waited_ms = 0u32;
        while self.line_busy()? {
            if waited_ms >= timeout_ms {
                log::warn!("[EPD] Timeout during {:?} after {} ms", phase, waited_ms);
                return Err(Error::DeviceTimeout { phase, waited_ms });
            }
            delay.delay_ms(interval_ms);
            waited_ms = waited_ms.saturating_add(interval_ms);
        }
        log::debug!("[EPD] Ready after {} ms", waited_ms);
        Ok(())
    }

    fn line_busy(&mut self) -> Result<bool, Error<T>> {
        let high = self.transport.read_busy().map_err(Error::Interface)?;
        Ok(self.descriptor().busy.is_busy(high))
    }
}
