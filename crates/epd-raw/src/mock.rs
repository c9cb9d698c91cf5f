//! Test doubles shared by the unit tests

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::descriptor::Timing;
use crate::interface::Transport;

/// One recorded transport call
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Reset,
    Command(u8),
    Data(Vec<u8>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MockError;

/// Transport that records every call and plays back a scripted BUSY line
#[derive(Debug)]
pub(crate) struct MockTransport {
    pub(crate) ops: Vec<Op>,
    /// Raw BUSY levels returned by the next reads, oldest first
    pub(crate) busy_script: VecDeque<bool>,
    /// Level returned once the script is exhausted
    pub(crate) idle_level: bool,
    /// Fail the n-th data write (0-based)
    pub(crate) fail_data_write: Option<usize>,
    /// Fail every BUSY read
    pub(crate) fail_busy_read: bool,
    data_writes: usize,
}

impl MockTransport {
    pub(crate) fn new(idle_level: bool) -> Self {
        Self {
            ops: Vec::new(),
            busy_script: VecDeque::new(),
            idle_level,
            fail_data_write: None,
            fail_busy_read: false,
            data_writes: 0,
        }
    }

    /// Report "busy" for the next `reads` polls
    pub(crate) fn busy_for(&mut self, reads: usize) {
        for _ in 0..reads {
            self.busy_script.push_back(!self.idle_level);
        }
    }

    pub(crate) fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// All data bytes written after each occurrence of `command`
    pub(crate) fn data_for(&self, command: u8) -> Vec<u8> {
        let mut current = None;
        let mut out = Vec::new();
        for op in &self.ops {
            match op {
                Op::Command(c) => current = Some(*c),
                Op::Data(d) if current == Some(command) => out.extend_from_slice(d),
                _ => {}
            }
        }
        out
    }

    /// Sizes of the data writes, in order
    pub(crate) fn data_sizes(&self) -> Vec<usize> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Data(d) => Some(d.len()),
                _ => None,
            })
            .collect()
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.ops.push(Op::Command(command));
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let n = self.data_writes;
        self.data_writes += 1;
        if self.fail_data_write == Some(n) {
            return Err(MockError);
        }
        self.ops.push(Op::Data(data.to_vec()));
        Ok(())
    }

    fn assert_reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timing: &Timing,
    ) -> Result<(), Self::Error> {
        self.ops.push(Op::Reset);
        delay.delay_ms(timing.reset_pulse_ms);
        delay.delay_ms(timing.reset_settle_ms);
        Ok(())
    }

    fn read_busy(&mut self) -> Result<bool, Self::Error> {
        if self.fail_busy_read {
            return Err(MockError);
        }
        Ok(self.busy_script.pop_front().unwrap_or(self.idle_level))
    }
}

/// Delay that only adds up the requested time
#[derive(Default)]
pub(crate) struct MockDelay {
    pub(crate) elapsed_ns: u64,
}

impl MockDelay {
    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
