//! Serial memory devices attached to a channel engine.

pub mod fram;
pub mod image;

use crate::error::DeviceFault;
use crate::spi::mode::SpiMode;

/// SpiDevice is the slave side of one channel link.
///
/// The engine calls `select` when chip-select falls, `transfer` once per bit
/// (MOSI in, MISO out), and `deselect` when chip-select rises. Devices commit
/// side effects on `deselect` only, so a rejected frame leaves them unchanged.
pub trait SpiDevice {
    /// Addressable bytes.
    fn capacity(&self) -> usize;

    fn select(&mut self, mode: SpiMode);

    fn transfer(&mut self, mosi: bool) -> bool;

    /// # Errors
    /// Returns the `DeviceFault` that made the device discard the frame.
    fn deselect(&mut self) -> Result<(), DeviceFault>;
}

impl<T: SpiDevice + ?Sized> SpiDevice for Box<T> {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn select(&mut self, mode: SpiMode) {
        (**self).select(mode);
    }

    fn transfer(&mut self, mosi: bool) -> bool {
        (**self).transfer(mosi)
    }

    fn deselect(&mut self) -> Result<(), DeviceFault> {
        (**self).deselect()
    }
}
