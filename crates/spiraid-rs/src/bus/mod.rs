//! Memory-mapped bus front end: register decode, handshake and a blocking host.

pub mod adapter;
pub mod host;
pub mod regmap;
