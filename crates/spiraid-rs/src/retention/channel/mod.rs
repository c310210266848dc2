//! Command sequencing for one channel: lanes in and out of a byte-wide FRAM.

#[cfg(test)]
mod channel_tests;

use crate::device::SpiDevice;
use crate::error::{Fault, IssueError, ProtocolFault};
use crate::metrics::{self, ChannelOp};
use crate::retention::Access;
use crate::spi::command::Command;
use crate::spi::engine::SpiEngine;
use crate::spi::mode::SpiMode;

/// Widest lane a channel register holds.
pub const MAX_LANE: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Sequence {
    access: Access,
    address: usize,
    width: usize,
    step: usize,
}

impl Sequence {
    /// Exchanges needed: WRITE_ENABLE + WRITE per byte, or one READ per byte.
    const fn steps(&self) -> usize {
        match self.access {
            Access::Write => self.width * 2,
            Access::Read => self.width,
        }
    }

    const fn byte(&self) -> usize {
        match self.access {
            Access::Write => self.step / 2,
            Access::Read => self.step,
        }
    }
}

/// Channel owns one engine plus the outbound and inbound lane registers.
///
/// A request runs to completion or to its first fault; it cannot be cancelled.
pub struct Channel<S> {
    index: usize,
    engine: SpiEngine<S>,
    outbound: u32,
    inbound: u32,
    pending: Option<Sequence>,
    fault: Option<ProtocolFault>,
    ticks: u64,
}

impl<S: SpiDevice> Channel<S> {
    pub fn new(index: usize, device: S, mode: SpiMode) -> Self {
        Self {
            index,
            engine: SpiEngine::new(device, mode),
            outbound: 0,
            inbound: 0,
            pending: None,
            fault: None,
            ticks: 0,
        }
    }

    /// `request` accepts a lane transfer of `width` bytes starting at `address`.
    ///
    /// For writes the lane is taken from the outbound register; reads assemble
    /// into the inbound register, byte `k` at bits `8k..8k+8`.
    ///
    /// # Errors
    /// `Fault::InvalidState` while busy, `Fault::Protocol` when the span does not fit the device.
    pub fn request(&mut self, access: Access, address: u32, width: usize) -> Result<(), Fault> {
        if self.busy() {
            return Err(Fault::InvalidState);
        }
        let capacity = self.engine.device().capacity();
        let width = width.clamp(1, MAX_LANE);
        let start = usize::try_from(address).unwrap_or(usize::MAX);
        let last = start.saturating_add(width - 1);
        if last >= capacity {
            return Err(Fault::Protocol {
                channel: self.index,
                fault: ProtocolFault::AddressOutOfRange {
                    address: u32::try_from(last).unwrap_or(u32::MAX),
                    capacity,
                },
            });
        }

        if access == Access::Read {
            self.inbound = 0;
        }
        self.fault = None;
        self.ticks = 0;
        let sequence = Sequence {
            access,
            address: start,
            width,
            step: 0,
        };
        self.pending = Some(sequence);
        tracing::trace!(channel = self.index, %access, address, width, "channel request accepted");
        self.issue(sequence);
        Ok(())
    }

    fn command(&self, seq: Sequence) -> Result<Command, ProtocolFault> {
        let address = seq.address + seq.byte();
        let address = u16::try_from(address).map_err(|_| ProtocolFault::AddressOutOfRange {
            address: u32::try_from(address).unwrap_or(u32::MAX),
            capacity: self.engine.device().capacity(),
        })?;
        Ok(match seq.access {
            Access::Write if seq.step % 2 == 0 => Command::write_enable(),
            Access::Write => Command::write(address, self.outbound.to_le_bytes()[seq.byte()]),
            Access::Read => Command::read(address),
        })
    }

    fn issue(&mut self, seq: Sequence) {
        let started = self.command(seq).and_then(|cmd| {
            self.engine.start(cmd).map_err(|err| match err {
                IssueError::Protocol(fault) => fault,
                // The engine is idle between steps.
                IssueError::Busy => ProtocolFault::Malformed {
                    opcode: cmd.opcode(),
                    reason: "engine busy between sequence steps",
                },
            })
        });
        if let Err(fault) = started {
            self.abort(fault);
        }
    }

    fn abort(&mut self, fault: ProtocolFault) {
        tracing::warn!(channel = self.index, %fault, "channel sequence aborted");
        self.fault = Some(fault);
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(seq) = self.pending.take() {
            metrics::record_channel_op(ChannelOp {
                channel: self.index,
                op: seq.access,
                bytes: seq.width as u64,
                ticks: self.ticks,
                error: self.fault.is_some(),
            });
        }
    }

    /// Advances the engine by one clock and sequences the next exchange when it retires.
    pub fn tick(&mut self) {
        let Some(mut seq) = self.pending else {
            return;
        };
        self.ticks += 1;
        self.engine.tick();
        if self.engine.busy() {
            return;
        }
        if let Some(fault) = self.engine.fault() {
            self.abort(fault);
            return;
        }
        if seq.access == Access::Read {
            let byte = u32::from(self.engine.received().unwrap_or(0));
            self.inbound |= byte << (8 * seq.byte());
        }
        seq.step += 1;
        if seq.step == seq.steps() {
            self.finish();
        } else {
            self.pending = Some(seq);
            self.issue(seq);
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn busy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn outbound(&self) -> u32 {
        self.outbound
    }

    pub const fn set_outbound(&mut self, value: u32) {
        self.outbound = value;
    }

    #[must_use]
    pub const fn inbound(&self) -> u32 {
        self.inbound
    }

    /// Fault that ended the last request, held until the next request or `clear`.
    #[must_use]
    pub const fn fault(&self) -> Option<ProtocolFault> {
        self.fault
    }

    /// Ticks spent on the current or last request.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Resets the lane registers and the held fault.
    pub const fn clear(&mut self) {
        self.outbound = 0;
        self.inbound = 0;
        self.fault = None;
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.engine.device().capacity()
    }

    #[must_use]
    pub const fn engine(&self) -> &SpiEngine<S> {
        &self.engine
    }

    #[must_use]
    pub const fn device(&self) -> &S {
        self.engine.device()
    }

    pub const fn device_mut(&mut self) -> &mut S {
        self.engine.device_mut()
    }
}
