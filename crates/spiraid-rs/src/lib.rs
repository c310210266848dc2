//! Tick-accurate RAID controller built from four SPI FRAM channels.
#![allow(clippy::cargo_common_metadata)]

pub mod bus;
pub mod config;
pub mod device;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod retention;
pub mod spi;
