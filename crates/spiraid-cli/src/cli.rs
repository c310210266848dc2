use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use spiraid_rs::bus::host::DEFAULT_TICK_BUDGET;
use spiraid_rs::bus::regmap::{DEFAULT_BASE, DEFAULT_DATA_LEN, RegisterMap};
use spiraid_rs::config::ControllerConfig;
use spiraid_rs::layout::mapping::RaidMode;
use spiraid_rs::spi::mode::SpiMode;

#[derive(Parser)]
#[command(name = "spiraid", author, version, about = "SPI FRAM RAID controller simulation")]
pub struct Cli {
    #[command(flatten)]
    pub controller: ControllerArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read one word from the data region.
    Read {
        /// Offset from the register map base.
        #[arg(long, value_parser = parse_u32)]
        addr: u32,
    },
    /// Write one word to the data region.
    Write {
        /// Offset from the register map base.
        #[arg(long, value_parser = parse_u32)]
        addr: u32,
        #[arg(long, value_parser = parse_u32)]
        value: u32,
    },
    /// Show or change the RAID mode register.
    Mode {
        #[arg(long)]
        set: Option<RaidMode>,
    },
    /// Read the status register.
    Status,
    /// Interactive session against one controller instance.
    Console,
    /// Randomized write/read-verify workload across all modes.
    Soak {
        #[arg(long, default_value_t = 256)]
        ops: u64,
        #[arg(long, default_value_t = 0x5EED)]
        seed: u64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ControllerArgs {
    /// SPI mode of every channel (0 or 3).
    #[arg(long, env = "SPIRAID_SPI_MODE", default_value_t = 0)]
    pub spi_mode: u8,

    /// Bus address of the register map.
    #[arg(long, env = "SPIRAID_BASE", value_parser = parse_u32, default_value_t = DEFAULT_BASE)]
    pub base: u32,

    /// Directory for persistent channel images; in memory when unset.
    #[arg(long, env = "SPIRAID_IMAGE_DIR")]
    pub image_dir: Option<PathBuf>,

    /// Ticks a bus access may take before it times out.
    #[arg(long, env = "SPIRAID_TICK_BUDGET", default_value_t = DEFAULT_TICK_BUDGET)]
    pub tick_budget: u64,

    /// RAID mode written to the mode register at startup.
    #[arg(long, env = "SPIRAID_MODE")]
    pub mode: Option<RaidMode>,

    /// Capacity of the console request and metrics queues.
    #[arg(long, env = "SPIRAID_QUEUE_CAP", default_value_t = 1024)]
    pub queue_cap: usize,
}

impl ControllerArgs {
    pub fn to_config(&self) -> anyhow::Result<ControllerConfig> {
        let spi_mode = SpiMode::from_number(self.spi_mode)?;
        let regmap = RegisterMap::new(self.base, DEFAULT_DATA_LEN)?;
        Ok(ControllerConfig {
            spi_mode,
            regmap,
            image_dir: self.image_dir.clone(),
            tick_budget: self.tick_budget,
            ..ControllerConfig::default()
        })
    }
}

/// Accepts decimal or `0x`-prefixed hexadecimal, with optional `_` separators.
pub fn parse_u32(s: &str) -> Result<u32, String> {
    let cleaned = s.trim().replace('_', "");
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => cleaned.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse_in_hex_and_decimal() {
        assert_eq!(parse_u32("0x3000_0000"), Ok(0x3000_0000));
        assert_eq!(parse_u32("0XFF"), Ok(0xFF));
        assert_eq!(parse_u32("42"), Ok(42));
        assert!(parse_u32("0xZZ").is_err());
        assert!(parse_u32("-1").is_err());
    }

    #[test]
    fn args_map_onto_controller_config() {
        let cli = Cli::try_parse_from([
            "spiraid",
            "--spi-mode",
            "3",
            "--base",
            "0x1000",
            "--mode",
            "raid5",
            "read",
            "--addr",
            "0x4",
        ])
        .unwrap();
        let cfg = cli.controller.to_config().unwrap();
        assert_eq!(cfg.spi_mode, SpiMode::Mode3);
        assert_eq!(cfg.regmap.base(), 0x1000);
        assert_eq!(cli.controller.mode, Some(RaidMode::StripeParity));
        assert!(matches!(cli.command, Command::Read { addr: 0x4 }));
    }

    #[test]
    fn unsupported_spi_mode_fails_at_configuration() {
        let cli = Cli::try_parse_from(["spiraid", "--spi-mode", "1", "status"]).unwrap();
        assert!(cli.controller.to_config().is_err());
    }
}
