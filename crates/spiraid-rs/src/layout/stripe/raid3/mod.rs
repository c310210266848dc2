//! RAID3 stripe layout: data lanes plus one fixed parity channel.

use crate::layout::bits::Bits;

#[cfg(test)]
mod raid3_tests;
mod stripe_impl;
mod verify_impl;

/// RAID3 stores `D - 1` data lanes and their XOR on the last channel.
pub struct RAID3<const D: usize, const N: usize>(pub [Bits<N>; D]);

impl<const D: usize, const N: usize> RAID3<D, N> {
    pub const PARITY_IDX: usize = D - 1;

    #[must_use]
    pub const fn zero() -> Self {
        Self([Bits::<N>::zero(); D])
    }

    /// `parity` is the XOR of the stored data lanes.
    #[must_use]
    pub fn parity(&self) -> Bits<N> {
        let mut p = Bits::<N>::zero();
        for lane in &self.0[..Self::PARITY_IDX] {
            p ^= lane;
        }
        p
    }

    pub fn write_parity(&mut self) {
        self.0[Self::PARITY_IDX] = self.parity();
    }
}
