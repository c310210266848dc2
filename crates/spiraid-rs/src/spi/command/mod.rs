//! Validated device commands and their wire framing.


use heapless::Vec;

use crate::error::ProtocolFault;
use crate::spi::FIFO_DEPTH;
use crate::spi::opcodes::Opcode;

/// Filler clocked out while the device drives its response.
pub const DUMMY: u8 = 0x00;

/// Command is one device exchange: an opcode plus the address and data phases it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    opcode: Opcode,
    address: Option<u16>,
    data: Option<u8>,
}

impl Command {
    /// `new` validates a raw command against the frame shape of its opcode.
    ///
    /// # Arguments
    /// * `opcode` - Raw opcode byte.
    /// * `address` - 16-bit device address, required by READ and WRITE only.
    /// * `data` - Data byte, required by WRITE and WRITE_STATUS only.
    /// * `read_len` - Bytes the caller expects back from the device.
    ///
    /// # Errors
    /// Returns `ProtocolFault::UnknownOpcode` or `ProtocolFault::Malformed`.
    pub fn new(
        opcode: u8,
        address: Option<u16>,
        data: Option<u8>,
        read_len: usize,
    ) -> Result<Self, ProtocolFault> {
        let opcode = Opcode::try_from(opcode)?;
        if opcode.has_address() != address.is_some() {
            return Err(ProtocolFault::Malformed {
                opcode,
                reason: "address phase does not match opcode",
            });
        }
        if opcode.has_data() != data.is_some() {
            return Err(ProtocolFault::Malformed {
                opcode,
                reason: "data phase does not match opcode",
            });
        }
        if read_len != opcode.read_len() {
            return Err(ProtocolFault::Malformed {
                opcode,
                reason: "unsupported read length",
            });
        }
        Ok(Self {
            opcode,
            address,
            data,
        })
    }

    #[must_use]
    pub const fn write_enable() -> Self {
        Self {
            opcode: Opcode::WriteEnable,
            address: None,
            data: None,
        }
    }

    #[must_use]
    pub const fn write(address: u16, data: u8) -> Self {
        Self {
            opcode: Opcode::Write,
            address: Some(address),
            data: Some(data),
        }
    }

    #[must_use]
    pub const fn read(address: u16) -> Self {
        Self {
            opcode: Opcode::Read,
            address: Some(address),
            data: None,
        }
    }

    #[must_use]
    pub const fn read_status() -> Self {
        Self {
            opcode: Opcode::ReadStatus,
            address: None,
            data: None,
        }
    }

    #[must_use]
    pub const fn write_status(status: u8) -> Self {
        Self {
            opcode: Opcode::WriteStatus,
            address: None,
            data: Some(status),
        }
    }

    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[must_use]
    pub const fn address(&self) -> Option<u16> {
        self.address
    }

    #[must_use]
    pub const fn data(&self) -> Option<u8> {
        self.data
    }

    /// `read_from` is the index of the first frame byte clocked in from the device.
    #[must_use]
    pub const fn read_from(&self) -> usize {
        self.opcode.frame_len() - self.opcode.read_len()
    }

    /// `frame` returns the bytes shifted out MSB first, dummy-padded for read phases.
    #[must_use]
    pub fn frame(&self) -> Vec<u8, FIFO_DEPTH> {
        let mut frame = Vec::new();
        let mut push = |b: u8| {
            // Every opcode frames at most FIFO_DEPTH bytes.
            let _ = frame.push(b);
        };
        push(self.opcode.code());
        if let Some(address) = self.address {
            let [hi, lo] = address.to_be_bytes();
            push(hi);
            push(lo);
        }
        if let Some(data) = self.data {
            push(data);
        }
        for _ in 0..self.opcode.read_len() {
            push(DUMMY);
        }
        frame
    }

    /// `word` packs the frame into the left-aligned, big-endian command register.
    ///
    /// # Returns
    /// A tuple of `(command_word, frame_len)`.
    #[must_use]
    pub fn word(&self) -> (u32, usize) {
        let frame = self.frame();
        let mut bytes = [0u8; FIFO_DEPTH];
        bytes[..frame.len()].copy_from_slice(&frame);
        (u32::from_be_bytes(bytes), frame.len())
    }
}
