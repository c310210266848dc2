//! Bus address decode.

#[cfg(test)]
mod regmap_tests;

use crate::error::ConfigError;

/// Default bus address of the data region.
pub const DEFAULT_BASE: u32 = 0x3000_0000;
/// Default data region length; offsets map 1:1 onto device addresses.
pub const DEFAULT_DATA_LEN: u32 = 0x400;
pub const MODE_OFFSET: u32 = 0x400;
pub const STATUS_OFFSET: u32 = 0x401;

/// Status register bit raised by a failed redundancy check.
pub const STATUS_INTEGRITY: u32 = 1 << 0;

/// Register is the target of a decoded bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Data region; the offset doubles as the device address.
    Data(u32),
    Mode,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    base: u32,
    data_len: u32,
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            data_len: DEFAULT_DATA_LEN,
        }
    }
}

impl RegisterMap {
    /// # Errors
    /// `ConfigError::DataRegion` if the data region runs into the mode register,
    /// `ConfigError::Overflow` if the registers do not fit the 32-bit bus.
    pub const fn new(base: u32, data_len: u32) -> Result<Self, ConfigError> {
        if data_len > MODE_OFFSET {
            return Err(ConfigError::DataRegion {
                data_len,
                capacity: MODE_OFFSET as usize,
            });
        }
        if base.checked_add(STATUS_OFFSET).is_none() {
            return Err(ConfigError::Overflow { base });
        }
        Ok(Self { base, data_len })
    }

    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    #[must_use]
    pub const fn data_len(&self) -> u32 {
        self.data_len
    }

    #[must_use]
    pub const fn decode(&self, addr: u32) -> Option<Register> {
        let Some(offset) = addr.checked_sub(self.base) else {
            return None;
        };
        if offset < self.data_len {
            Some(Register::Data(offset))
        } else if offset == MODE_OFFSET {
            Some(Register::Mode)
        } else if offset == STATUS_OFFSET {
            Some(Register::Status)
        } else {
            None
        }
    }

    /// Bus address of a data region offset.
    #[must_use]
    pub const fn data(&self, offset: u32) -> u32 {
        self.base.wrapping_add(offset)
    }

    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.base.wrapping_add(MODE_OFFSET)
    }

    #[must_use]
    pub const fn status(&self) -> u32 {
        self.base.wrapping_add(STATUS_OFFSET)
    }
}
