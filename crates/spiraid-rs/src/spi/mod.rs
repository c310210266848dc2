//! Per-channel SPI transaction engine: opcodes, clock modes, command framing and the bit shifter.

pub mod command;
pub mod engine;
pub mod mode;
pub mod opcodes;

/// Depth of the outbound byte queue. One queue load holds a whole frame.
pub const FIFO_DEPTH: usize = 4;
