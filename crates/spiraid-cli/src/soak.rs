use anyhow::Context;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{info, warn};

use spiraid_rs::bus::host::Host;
use spiraid_rs::device::SpiDevice;
use spiraid_rs::layout::mapping::{self, RaidMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub mode: RaidMode,
    pub offset: u32,
    pub expected: u32,
    pub found: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoakReport {
    pub ops: u64,
    pub verified: u64,
    pub mismatches: Vec<Mismatch>,
}

/// Writes and reads back random words at random word-aligned offsets in random modes.
///
/// STRIPE_PARITY words are drawn with a consistent top byte, the only ones the
/// layout can store unchanged.
pub fn run_soak<S: SpiDevice>(host: &mut Host<S>, ops: u64, seed: u64) -> anyhow::Result<SoakReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data_len = host.adapter().regmap().data_len();
    let capacity = u32::try_from(host.adapter().controller().capacity()).unwrap_or(u32::MAX);
    let slots = data_len.min(capacity) / 4;
    if slots == 0 {
        anyhow::bail!("data region too small for a word");
    }

    let mut report = SoakReport {
        ops,
        ..SoakReport::default()
    };
    for i in 0..ops {
        let mode = RaidMode::ALL[rng.random_range(0..RaidMode::ALL.len())];
        let offset = rng.random_range(0..slots) * 4;
        let mut word: u32 = rng.random();
        if !mapping::representable(mode, word) {
            let [b0, b1, b2, _] = word.to_le_bytes();
            word = u32::from_le_bytes([b0, b1, b2, b0 ^ b1 ^ b2]);
        }

        host.set_mode(mode)
            .with_context(|| format!("op {i}: setting mode {mode}"))?;
        host.write_data(offset, word)
            .with_context(|| format!("op {i}: writing {word:#010x} at {offset:#x}"))?;
        let found = host
            .read_data(offset)
            .with_context(|| format!("op {i}: reading {offset:#x}"))?;

        if found == word {
            report.verified += 1;
        } else {
            warn!("soak mismatch: mode={mode}, offset={offset:#x}, expected={word:#010x}, found={found:#010x}");
            report.mismatches.push(Mismatch {
                mode,
                offset,
                expected: word,
                found,
            });
        }
    }
    info!(
        "soak: ops={}, verified={}, mismatches={}",
        report.ops,
        report.verified,
        report.mismatches.len()
    );
    Ok(report)
}
