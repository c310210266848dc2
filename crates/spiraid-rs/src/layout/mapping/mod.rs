//! Word-to-channel mapping for each RAID mode.


use std::fmt;

use crate::error::IntegrityFault;
use crate::layout::bits::Bits;
use crate::layout::stripe::raid0::RAID0;
use crate::layout::stripe::raid1::RAID1;
use crate::layout::stripe::raid3::RAID3;
use crate::layout::stripe::traits::stripe::Stripe;

/// Number of channels behind the controller.
pub const CHANNELS: usize = 4;

/// Host data unit. Byte 0 is the least significant.
pub type Word = u32;

/// RaidMode selects how a word is spread over the channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RaidMode {
    /// Whole word on every channel.
    #[default]
    Mirror,
    /// Byte `i` on channel `i`.
    Stripe,
    /// Bytes 0..3 on channels 0..3, their XOR on channel 3.
    StripeParity,
}

impl RaidMode {
    pub const ALL: [Self; 3] = [Self::Mirror, Self::Stripe, Self::StripeParity];

    /// Mode register value.
    #[must_use]
    pub const fn encoding(self) -> u32 {
        match self {
            Self::Mirror => 0,
            Self::Stripe => 1,
            Self::StripeParity => 5,
        }
    }

    #[must_use]
    pub const fn from_encoding(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Mirror),
            1 => Some(Self::Stripe),
            5 => Some(Self::StripeParity),
            _ => None,
        }
    }

    /// Bytes each channel stores per word.
    #[must_use]
    pub const fn lane_width(self) -> usize {
        match self {
            Self::Mirror => 4,
            Self::Stripe | Self::StripeParity => 1,
        }
    }

    /// Whether reads in this mode check redundancy.
    #[must_use]
    pub const fn checks_integrity(self) -> bool {
        !matches!(self, Self::Stripe)
    }
}

impl fmt::Display for RaidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mirror => "mirror",
            Self::Stripe => "stripe",
            Self::StripeParity => "stripe-parity",
        })
    }
}

impl std::str::FromStr for RaidMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mirror" | "raid1" | "0" => Ok(Self::Mirror),
            "stripe" | "raid0" | "1" => Ok(Self::Stripe),
            "stripe-parity" | "parity" | "raid5" | "5" => Ok(Self::StripeParity),
            other => Err(format!("unknown raid mode '{other}'")),
        }
    }
}

/// Readback is a reassembled word with the outcome of its redundancy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readback {
    pub word: Word,
    /// Set when the parity channel disagrees with the data channels.
    pub parity_fault: bool,
    pub integrity: Option<IntegrityFault>,
}

impl Readback {
    const fn clean(word: Word) -> Self {
        Self {
            word,
            parity_fault: false,
            integrity: None,
        }
    }
}

/// `split` computes the outbound register of every channel for `word`.
#[must_use]
pub fn split(mode: RaidMode, word: Word) -> [u32; CHANNELS] {
    match mode {
        RaidMode::Mirror => {
            let mut stripe = RAID1::<CHANNELS, 4>::zero();
            stripe.write(&[Bits::from_register(word)]);
            registers(&stripe)
        }
        RaidMode::Stripe => {
            let mut stripe = RAID0::<CHANNELS, 1>::zero();
            stripe.write(&byte_lanes(word));
            registers(&stripe)
        }
        RaidMode::StripeParity => {
            let mut stripe = RAID3::<CHANNELS, 1>::zero();
            stripe.write(&byte_lanes(word)[..RAID3::<CHANNELS, 1>::PARITY_IDX]);
            registers(&stripe)
        }
    }
}

/// `join` reassembles a word from the inbound registers of every channel.
#[must_use]
pub fn join(mode: RaidMode, lanes: [u32; CHANNELS]) -> Readback {
    match mode {
        RaidMode::Mirror => {
            let mut stripe = RAID1::<CHANNELS, 4>::zero();
            stripe.write_raw(&lanes.map(Bits::from_register));
            let mut out = [Bits::zero(); 1];
            stripe.read(&mut out);
            let mismatched = stripe.as_verify().map(|v| v.mismatched()).unwrap_or_default();
            let mut readback = Readback::clean(out[0].to_register());
            if !mismatched.is_empty() {
                let mask = mismatched.iter().fold(0u8, |m, &i| m | (1 << i));
                readback.integrity = Some(IntegrityFault::MirrorMismatch { mask });
            }
            readback
        }
        RaidMode::Stripe => {
            let mut stripe = RAID0::<CHANNELS, 1>::zero();
            stripe.write_raw(&lanes.map(Bits::from_register));
            let mut out = [Bits::zero(); CHANNELS];
            stripe.read(&mut out);
            Readback::clean(u32::from_le_bytes(out.map(|b| b.0[0])))
        }
        RaidMode::StripeParity => {
            let mut stripe = RAID3::<CHANNELS, 1>::zero();
            stripe.write_raw(&lanes.map(Bits::from_register));
            let mut out = [Bits::zero(); CHANNELS - 1];
            stripe.read(&mut out);
            let expected = stripe.parity().0[0];
            let found = stripe.0[RAID3::<CHANNELS, 1>::PARITY_IDX].0[0];
            let word = u32::from_le_bytes([out[0].0[0], out[1].0[0], out[2].0[0], expected]);
            let mut readback = Readback::clean(word);
            if stripe.as_verify().is_some_and(|v| !v.consistent()) {
                readback.parity_fault = true;
                readback.integrity = Some(IntegrityFault::ParityMismatch { expected, found });
            }
            readback
        }
    }
}

/// `representable` reports whether `word` survives a round trip in `mode` unchanged.
#[must_use]
pub fn representable(mode: RaidMode, word: Word) -> bool {
    match mode {
        RaidMode::StripeParity => {
            let [b0, b1, b2, b3] = word.to_le_bytes();
            b3 == b0 ^ b1 ^ b2
        }
        RaidMode::Mirror | RaidMode::Stripe => true,
    }
}

fn byte_lanes(word: Word) -> [Bits<1>; CHANNELS] {
    word.to_le_bytes().map(|b| Bits([b]))
}

fn registers<S, const N: usize>(stripe: &S) -> [u32; CHANNELS]
where
    S: Stripe<CHANNELS, N>,
{
    let mut raw = [Bits::<N>::zero(); CHANNELS];
    stripe.read_raw(&mut raw);
    raw.map(|lane| lane.to_register())
}
