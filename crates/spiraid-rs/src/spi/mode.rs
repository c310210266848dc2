//! SPI clock polarity/phase configurations accepted by the engine.

use crate::error::ConfigError;

/// SpiMode selects clock polarity and phase. Only modes 0 and 3 can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiMode {
    /// Clock idles low, data sampled on the rising (leading) edge.
    #[default]
    Mode0,
    /// Clock idles high, data sampled on the trailing edge.
    Mode3,
}

impl SpiMode {
    /// # Errors
    /// Returns `ConfigError::UnsupportedSpiMode` for modes 1 and 2.
    pub const fn new(cpol: bool, cpha: bool) -> Result<Self, ConfigError> {
        match (cpol, cpha) {
            (false, false) => Ok(Self::Mode0),
            (true, true) => Ok(Self::Mode3),
            (cpol, cpha) => Err(ConfigError::UnsupportedSpiMode(
                ((cpol as u8) << 1) | cpha as u8,
            )),
        }
    }

    /// # Errors
    /// Returns `ConfigError::UnsupportedSpiMode` for anything but 0 and 3.
    pub const fn from_number(mode: u8) -> Result<Self, ConfigError> {
        match mode {
            0 => Ok(Self::Mode0),
            3 => Ok(Self::Mode3),
            other => Err(ConfigError::UnsupportedSpiMode(other)),
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode3 => 3,
        }
    }

    #[must_use]
    pub const fn cpol(self) -> bool {
        matches!(self, Self::Mode3)
    }

    #[must_use]
    pub const fn cpha(self) -> bool {
        matches!(self, Self::Mode3)
    }

    /// `idle_clock` is the sclk level while chip-select is deasserted.
    #[must_use]
    pub const fn idle_clock(self) -> bool {
        self.cpol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_zero_and_three_are_supported() {
        assert_eq!(SpiMode::new(false, false), Ok(SpiMode::Mode0));
        assert_eq!(SpiMode::new(true, true), Ok(SpiMode::Mode3));
        assert_eq!(SpiMode::from_number(3).map(SpiMode::number), Ok(3));
        assert!(SpiMode::Mode3.idle_clock());
        assert!(!SpiMode::Mode0.idle_clock());
    }

    #[test]
    fn mixed_polarity_and_phase_is_a_config_error() {
        assert_eq!(
            SpiMode::new(false, true),
            Err(ConfigError::UnsupportedSpiMode(1))
        );
        assert_eq!(
            SpiMode::new(true, false),
            Err(ConfigError::UnsupportedSpiMode(2))
        );
        assert_eq!(
            SpiMode::from_number(7),
            Err(ConfigError::UnsupportedSpiMode(7))
        );
    }
}
