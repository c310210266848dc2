//! Stripe trait definitions for reading and writing RAID layouts.

#[cfg(test)]
mod stripe_tests;

use crate::layout::bits::Bits;
use crate::layout::stripe::traits::verify::Verify;

/// Stripe describes how one word's lanes are placed on `D` channels of `N` bytes.
pub trait Stripe<const D: usize, const N: usize> {
    /// DATA is the number of lanes the host supplies.
    const DATA: usize;
    /// CHANNELS is the number of lanes stored.
    const CHANNELS: usize;

    /// write encodes host lanes into the stripe.
    ///
    /// # Arguments
    /// * `data` - Exactly `DATA` lanes.
    fn write(&mut self, data: &[Bits<N>]);
    /// write_raw loads lanes as read back from the channels, without encoding.
    ///
    /// # Arguments
    /// * `data` - Exactly `CHANNELS` lanes.
    fn write_raw(&mut self, data: &[Bits<N>]);
    /// read decodes the stripe into host lanes.
    ///
    /// # Arguments
    /// * `out` - Buffer of exactly `DATA` lanes.
    fn read(&self, out: &mut [Bits<N>]);
    /// read_raw copies out the stored lanes.
    ///
    /// # Arguments
    /// * `out` - Buffer of exactly `CHANNELS` lanes.
    fn read_raw(&self, out: &mut [Bits<N>]);
    /// as_verify returns a consistency checker if the layout carries redundancy.
    fn as_verify(&self) -> Option<&dyn Verify> {
        None
    }
}
