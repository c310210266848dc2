//! Controller construction parameters.

use std::path::PathBuf;

use anyhow::Context;

use crate::bus::adapter::BusAdapter;
use crate::bus::host::{DEFAULT_TICK_BUDGET, Host};
use crate::bus::regmap::RegisterMap;
use crate::device::fram::{CAPACITY, Fram};
use crate::error::ConfigError;
use crate::retention::array::Array;
use crate::retention::controller::Controller;
use crate::spi::mode::SpiMode;

/// ControllerConfig describes one controller instance. The default matches the
/// reference board: SPI mode 0, 2 KiB FRAMs, registers at `0x3000_0000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub spi_mode: SpiMode,
    /// Bytes per channel device.
    pub capacity: usize,
    pub regmap: RegisterMap,
    /// Directory holding persistent `channel-{i}.img` files; in memory when `None`.
    pub image_dir: Option<PathBuf>,
    pub tick_budget: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            spi_mode: SpiMode::default(),
            capacity: CAPACITY,
            regmap: RegisterMap::default(),
            image_dir: None,
            tick_budget: DEFAULT_TICK_BUDGET,
        }
    }
}

impl ControllerConfig {
    /// # Errors
    /// `ConfigError::DataRegion` if the data region is larger than a device.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let data_len = self.regmap.data_len();
        if usize::try_from(data_len).map_or(true, |len| len > self.capacity) {
            return Err(ConfigError::DataRegion {
                data_len,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Builds the FRAM array, orchestrator, bus adapter and host.
    ///
    /// # Errors
    /// Returns an error for an invalid configuration or unusable image files.
    pub fn build(&self) -> anyhow::Result<Host<Fram>> {
        self.validate().context("invalid controller configuration")?;
        if let Some(dir) = &self.image_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating image directory {}", dir.display()))?;
        }
        let array = Array::init_array(self.image_dir.as_deref(), self.spi_mode, self.capacity)?;
        tracing::info!(
            spi_mode = self.spi_mode.number(),
            base = format_args!("{:#010x}", self.regmap.base()),
            capacity = self.capacity,
            persistent = self.image_dir.is_some(),
            "controller ready"
        );
        let adapter = BusAdapter::new(Controller::new(array), self.regmap);
        Ok(Host::new(adapter, self.tick_budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        let cfg = ControllerConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.regmap.base(), 0x3000_0000);
        assert_eq!(cfg.spi_mode, SpiMode::Mode0);
    }

    #[test]
    fn data_region_larger_than_device_is_rejected() {
        let cfg = ControllerConfig {
            capacity: 0x200,
            ..ControllerConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DataRegion {
                data_len: 0x400,
                capacity: 0x200
            })
        );
        assert!(cfg.build().is_err());
    }

    #[test]
    fn persistent_build_survives_rebuild() {
        let dir = tempdir().unwrap();
        let cfg = ControllerConfig {
            spi_mode: SpiMode::Mode3,
            image_dir: Some(dir.path().join("images")),
            ..ControllerConfig::default()
        };

        let mut host = cfg.build().unwrap();
        host.write_data(0x44, 0xDEAD_BEEF).unwrap();
        drop(host);

        let mut host = cfg.build().unwrap();
        assert_eq!(host.read_data(0x44), Ok(0xDEAD_BEEF));
    }
}
