//! Fault taxonomy shared by the channel engines, the orchestrator and the bus adapter.

use thiserror::Error;

use crate::spi::opcodes::Opcode;

/// DeviceFault is reported by a device when a frame violates its protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceFault {
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("write enable latch was not set (status {status:#04x})")]
    WriteNotEnabled { status: u8 },
    #[error("address {address:#06x} is outside the {capacity} byte array")]
    AddressOutOfRange { address: u16, capacity: usize },
    #[error("frame ended after {bits} bits")]
    Truncated { bits: usize },
}

/// ProtocolFault aborts a channel exchange; nothing is committed to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolFault {
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("malformed {opcode:?} command: {reason}")]
    Malformed {
        opcode: Opcode,
        reason: &'static str,
    },
    #[error("WRITE issued without a preceding WRITE_ENABLE")]
    WriteNotEnabled,
    #[error("address {address:#06x} is outside the {capacity} byte device")]
    AddressOutOfRange { address: u32, capacity: usize },
    #[error("device rejected the frame: {0}")]
    Device(#[from] DeviceFault),
}

/// IssueError is returned by an engine that refuses to start an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IssueError {
    #[error("engine is busy")]
    Busy,
    #[error(transparent)]
    Protocol(#[from] ProtocolFault),
}

/// Fault is the outcome of a rejected or failed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("channel {channel}: {fault}")]
    Protocol {
        channel: usize,
        fault: ProtocolFault,
    },
    #[error("a transaction is already in flight")]
    InvalidState,
}

/// IntegrityFault flags redundant data that disagrees on read. The read still completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntegrityFault {
    #[error("parity byte {found:#04x} does not match computed {expected:#04x}")]
    ParityMismatch { expected: u8, found: u8 },
    #[error("mirror channels {mask:#06b} disagree with the majority")]
    MirrorMismatch { mask: u8 },
}

/// ConfigError rejects a controller configuration at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("spi mode {0} is not supported (modes 0 and 3 only)")]
    UnsupportedSpiMode(u8),
    #[error("data region of {data_len:#x} bytes exceeds device capacity {capacity:#x}")]
    DataRegion { data_len: u32, capacity: usize },
    #[error("register map at {base:#010x} overflows the bus address space")]
    Overflow { base: u32 },
}

/// BusError is carried by an acknowledge that could not be satisfied normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("address {0:#010x} is not mapped")]
    Unmapped(u32),
    #[error("register at {0:#010x} is read-only")]
    ReadOnly(u32),
    #[error("{0:#x} is not a valid raid mode")]
    InvalidMode(u32),
    #[error(transparent)]
    Fault(#[from] Fault),
    #[error("no acknowledge after {ticks} ticks")]
    Timeout { ticks: u64 },
}
