//! FRAM command opcodes understood by the channel devices.

use crate::error::ProtocolFault;

/// Write Status Register
pub const WRSR: u8 = 0x01;
/// Write memory data - requires the write enable latch
pub const WRITE: u8 = 0x02;
/// Read memory data
pub const READ: u8 = 0x03;
/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Write Enable - sets the write enable latch
pub const WREN: u8 = 0x06;

/// Write enable latch bit of the status register.
pub const STATUS_WEL: u8 = 1 << 1;
/// Status register bits writable through WRSR.
pub const STATUS_WRITABLE: u8 = 0x8C;

/// Opcode is a command the engine knows how to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    WriteStatus,
    Write,
    Read,
    ReadStatus,
    WriteEnable,
}

impl Opcode {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::WriteStatus => WRSR,
            Self::Write => WRITE,
            Self::Read => READ,
            Self::ReadStatus => RDSR,
            Self::WriteEnable => WREN,
        }
    }

    /// `frame_len` returns the number of bytes clocked while chip-select is low.
    #[must_use]
    pub const fn frame_len(self) -> usize {
        match self {
            Self::WriteEnable => 1,
            Self::WriteStatus | Self::ReadStatus => 2,
            Self::Write | Self::Read => 4,
        }
    }

    #[must_use]
    pub const fn has_address(self) -> bool {
        matches!(self, Self::Write | Self::Read)
    }

    #[must_use]
    pub const fn has_data(self) -> bool {
        matches!(self, Self::Write | Self::WriteStatus)
    }

    /// `read_len` returns how many trailing frame bytes are clocked in from the device.
    #[must_use]
    pub const fn read_len(self) -> usize {
        match self {
            Self::Read | Self::ReadStatus => 1,
            _ => 0,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = ProtocolFault;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            WRSR => Ok(Self::WriteStatus),
            WRITE => Ok(Self::Write),
            READ => Ok(Self::Read),
            RDSR => Ok(Self::ReadStatus),
            WREN => Ok(Self::WriteEnable),
            other => Err(ProtocolFault::UnknownOpcode(other)),
        }
    }
}
