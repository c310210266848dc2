//! Bit-level SPI master for one channel.


use heapless::Deque;

use crate::device::SpiDevice;
use crate::error::{IssueError, ProtocolFault};
use crate::spi::FIFO_DEPTH;
use crate::spi::command::Command;
use crate::spi::mode::SpiMode;
use crate::spi::opcodes::{Opcode, STATUS_WEL};

/// Op is the engine's current phase. Every phase but `Idle` counts as busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Op {
    #[default]
    Idle,
    /// Frame is in the FIFO, chip-select still high.
    Load,
    /// Shifting command, address or data bytes out.
    Write,
    /// Shifting a response byte in.
    Read,
    /// Last bit sent, chip-select still low.
    WaitCs,
    /// Chip-select high, inter-frame idle.
    Gap,
}

/// SpiEngine runs one chip-select framed exchange at a time, one bit per tick.
///
/// A frame of `B` bytes keeps the engine busy for `8 * B + 3` ticks: one to
/// drop chip-select, eight per byte, one to raise chip-select and one gap.
pub struct SpiEngine<S> {
    device: S,
    mode: SpiMode,
    op: Op,
    fifo: Deque<u8, FIFO_DEPTH>,
    current: Option<Command>,
    command_word: u32,
    frame_len: usize,
    tx: u8,
    rx: u8,
    bits_left: u8,
    index: usize,
    read_from: usize,
    cs: bool,
    mosi: bool,
    tx_ready: bool,
    received: Option<u8>,
    fault: Option<ProtocolFault>,
    write_enabled: bool,
}

impl<S: SpiDevice> SpiEngine<S> {
    pub fn new(device: S, mode: SpiMode) -> Self {
        Self {
            device,
            mode,
            op: Op::Idle,
            fifo: Deque::new(),
            current: None,
            command_word: 0,
            frame_len: 0,
            tx: 0,
            rx: 0,
            bits_left: 0,
            index: 0,
            read_from: 0,
            cs: true,
            mosi: false,
            tx_ready: false,
            received: None,
            fault: None,
            write_enabled: false,
        }
    }

    /// `issue` validates a raw command and starts its exchange.
    ///
    /// # Errors
    /// `IssueError::Busy` while an exchange is in flight, otherwise the
    /// `ProtocolFault` that makes the command unsendable. Nothing changes on error.
    pub fn issue(
        &mut self,
        opcode: u8,
        address: Option<u16>,
        data: Option<u8>,
        read_len: usize,
    ) -> Result<(), IssueError> {
        if self.busy() {
            return Err(IssueError::Busy);
        }
        self.start(Command::new(opcode, address, data, read_len)?)
    }

    /// `start` loads an already shaped command into the FIFO.
    ///
    /// # Errors
    /// See [`SpiEngine::issue`].
    pub fn start(&mut self, command: Command) -> Result<(), IssueError> {
        if self.busy() {
            return Err(IssueError::Busy);
        }
        let capacity = self.device.capacity();
        if let Some(address) = command.address()
            && usize::from(address) >= capacity
        {
            return Err(ProtocolFault::AddressOutOfRange {
                address: u32::from(address),
                capacity,
            }
            .into());
        }
        if command.opcode() == Opcode::Write && !self.write_enabled {
            return Err(ProtocolFault::WriteNotEnabled.into());
        }

        self.fifo.clear();
        for byte in command.frame() {
            // The frame never exceeds the FIFO depth.
            let _ = self.fifo.push_back(byte);
        }
        (self.command_word, self.frame_len) = command.word();
        self.read_from = command.read_from();
        self.current = Some(command);
        self.received = None;
        self.fault = None;
        self.op = Op::Load;
        tracing::trace!(word = format_args!("{:#010x}", self.command_word), "spi frame loaded");
        Ok(())
    }

    /// Advances the engine by one clock.
    pub fn tick(&mut self) {
        self.tx_ready = false;
        match self.op {
            Op::Idle => {}
            Op::Load => {
                self.cs = false;
                self.device.select(self.mode);
                self.index = 0;
                self.next_byte();
            }
            Op::Write | Op::Read => self.shift_bit(),
            Op::WaitCs => {
                self.cs = true;
                self.mosi = false;
                match self.device.deselect() {
                    Ok(()) => self.retire(),
                    Err(fault) => {
                        tracing::warn!(%fault, word = format_args!("{:#010x}", self.command_word), "device rejected frame");
                        self.fault = Some(fault.into());
                    }
                }
                self.op = Op::Gap;
            }
            Op::Gap => {
                self.op = Op::Idle;
                self.current = None;
            }
        }
    }

    fn next_byte(&mut self) {
        match self.fifo.pop_front() {
            Some(byte) => {
                self.tx = byte;
                self.rx = 0;
                self.bits_left = 8;
                self.op = if self.index >= self.read_from {
                    Op::Read
                } else {
                    Op::Write
                };
            }
            None => self.op = Op::WaitCs,
        }
    }

    fn shift_bit(&mut self) {
        self.mosi = self.tx & 0x80 != 0;
        self.tx <<= 1;
        let miso = self.device.transfer(self.mosi);
        self.rx = (self.rx << 1) | u8::from(miso);
        self.bits_left -= 1;
        if self.bits_left == 0 {
            self.tx_ready = true;
            if self.op == Op::Read {
                self.received = Some(self.rx);
            }
            self.index += 1;
            self.next_byte();
        }
    }

    /// Tracks the device's write enable latch from frames it accepted.
    fn retire(&mut self) {
        match self.current.map(|c| c.opcode()) {
            Some(Opcode::WriteEnable) => self.write_enabled = true,
            Some(Opcode::Write) => self.write_enabled = false,
            Some(Opcode::ReadStatus) => {
                if let Some(status) = self.received {
                    self.write_enabled = status & STATUS_WEL != 0;
                }
            }
            _ => {}
        }
    }

    #[must_use]
    pub fn busy(&self) -> bool {
        self.op != Op::Idle
    }

    #[must_use]
    pub const fn op(&self) -> Op {
        self.op
    }

    /// Chip-select level; `true` means deasserted.
    #[must_use]
    pub const fn cs(&self) -> bool {
        self.cs
    }

    #[must_use]
    pub const fn mosi(&self) -> bool {
        self.mosi
    }

    /// High for the one tick in which a byte finished shifting.
    #[must_use]
    pub const fn tx_ready(&self) -> bool {
        self.tx_ready
    }

    /// Response byte of the current or last exchange.
    #[must_use]
    pub const fn received(&self) -> Option<u8> {
        self.received
    }

    /// Fault reported by the device for the current or last exchange.
    #[must_use]
    pub const fn fault(&self) -> Option<ProtocolFault> {
        self.fault
    }

    #[must_use]
    pub const fn write_enabled(&self) -> bool {
        self.write_enabled
    }

    /// Packed, left-aligned command register of the current or last exchange.
    #[must_use]
    pub const fn command_word(&self) -> u32 {
        self.command_word
    }

    #[must_use]
    pub const fn frame_len(&self) -> usize {
        self.frame_len
    }

    #[must_use]
    pub const fn mode(&self) -> SpiMode {
        self.mode
    }

    /// Idle level of sclk for the configured mode.
    #[must_use]
    pub const fn sclk_idle(&self) -> bool {
        self.mode.idle_clock()
    }

    #[must_use]
    pub const fn device(&self) -> &S {
        &self.device
    }

    pub const fn device_mut(&mut self) -> &mut S {
        &mut self.device
    }
}
