//! Behavioral model of a 2 KiB, 16-bit addressed SPI FRAM.


use crate::device::SpiDevice;
use crate::device::image::{ERASED, Image};
use crate::error::DeviceFault;
use crate::spi::mode::SpiMode;
use crate::spi::opcodes::{RDSR, READ, STATUS_WEL, STATUS_WRITABLE, WREN, WRITE, WRSR};

/// Bytes in one FRAM.
pub const CAPACITY: usize = 2048;

/// Fram decodes frames bit by bit and commits writes when chip-select rises.
///
/// A WRITE needs the write enable latch and clears it. WRITE_STATUS only
/// touches the bits in `STATUS_WRITABLE`. Reads and WRITEs stream over
/// consecutive addresses while chip-select stays low.
pub struct Fram {
    image: Image,
    status: u8,
    mode: Option<SpiMode>,
    shift: u8,
    bits: usize,
    rx: Vec<u8>,
    out: u8,
}

impl Default for Fram {
    fn default() -> Self {
        Self::new()
    }
}

impl Fram {
    #[must_use]
    pub fn new() -> Self {
        Self::with_image(Image::in_memory(CAPACITY))
    }

    /// Wraps an existing image; its length becomes the device capacity.
    #[must_use]
    pub fn with_image(image: Image) -> Self {
        Self {
            image,
            status: 0,
            mode: None,
            shift: 0,
            bits: 0,
            rx: Vec::with_capacity(4),
            out: 0,
        }
    }

    #[must_use]
    pub const fn status(&self) -> u8 {
        self.status
    }

    #[must_use]
    pub const fn write_enabled(&self) -> bool {
        self.status & STATUS_WEL != 0
    }

    /// Mode of the frame in progress, if chip-select is low.
    #[must_use]
    pub const fn selected(&self) -> Option<SpiMode> {
        self.mode
    }

    #[must_use]
    pub fn peek(&self, address: usize) -> Option<u8> {
        self.image.memory().get(address).copied()
    }

    /// Backdoor store that bypasses the protocol, for fault injection.
    pub fn poke(&mut self, address: usize, value: u8) -> bool {
        self.image.write_at(address, &[value]) == 1
    }

    #[must_use]
    pub const fn image(&self) -> &Image {
        &self.image
    }

    fn address(&self) -> usize {
        usize::from(u16::from_be_bytes([self.rx[1], self.rx[2]]))
    }

    fn on_byte(&mut self) {
        let n = self.rx.len();
        self.out = match self.rx[0] {
            RDSR if n == 1 => self.status,
            READ if n >= 3 => self.peek(self.address() + n - 3).unwrap_or(ERASED),
            _ => 0,
        };
    }

    fn commit(&mut self, bits: usize) -> Result<(), DeviceFault> {
        let capacity = self.capacity();
        let truncated = DeviceFault::Truncated { bits };
        let opcode = self.rx[0];
        match opcode {
            WREN => self.status |= STATUS_WEL,
            WRSR => {
                let value = *self.rx.get(1).ok_or(truncated)?;
                self.status = (self.status & !STATUS_WRITABLE) | (value & STATUS_WRITABLE);
            }
            WRITE => {
                if self.rx.len() < 4 {
                    return Err(truncated);
                }
                if !self.write_enabled() {
                    return Err(DeviceFault::WriteNotEnabled {
                        status: self.status,
                    });
                }
                let address = self.address();
                let data = &self.rx[3..];
                if address + data.len() > capacity {
                    return Err(out_of_range(address, capacity));
                }
                self.image.write_at(address, data);
                self.status &= !STATUS_WEL;
                tracing::trace!(address, len = data.len(), "fram write committed");
            }
            READ => {
                if self.rx.len() < 3 {
                    return Err(truncated);
                }
                let address = self.address();
                let last = address + self.rx.len().saturating_sub(4);
                if last >= capacity {
                    return Err(out_of_range(address, capacity));
                }
            }
            RDSR => {}
            other => return Err(DeviceFault::UnknownOpcode(other)),
        }
        Ok(())
    }
}

fn out_of_range(address: usize, capacity: usize) -> DeviceFault {
    DeviceFault::AddressOutOfRange {
        address: u16::try_from(address).unwrap_or(u16::MAX),
        capacity,
    }
}

impl SpiDevice for Fram {
    fn capacity(&self) -> usize {
        self.image.len()
    }

    fn select(&mut self, mode: SpiMode) {
        self.mode = Some(mode);
        self.shift = 0;
        self.bits = 0;
        self.rx.clear();
        self.out = 0;
    }

    fn transfer(&mut self, mosi: bool) -> bool {
        if self.mode.is_none() {
            return true;
        }
        let miso = self.out & 0x80 != 0;
        self.out <<= 1;
        self.shift = (self.shift << 1) | u8::from(mosi);
        self.bits += 1;
        if self.bits % 8 == 0 {
            self.rx.push(self.shift);
            self.on_byte();
        }
        miso
    }

    fn deselect(&mut self) -> Result<(), DeviceFault> {
        if self.mode.take().is_none() {
            return Ok(());
        }
        let bits = self.bits;
        let result = if bits % 8 != 0 {
            Err(DeviceFault::Truncated { bits })
        } else if self.rx.is_empty() {
            Ok(())
        } else {
            self.commit(bits)
        };
        if let Err(fault) = &result {
            tracing::warn!(%fault, "fram discarded frame");
        }
        self.rx.clear();
        self.bits = 0;
        result
    }
}
