//! RAID0 stripe layout: one host lane per channel, no redundancy.

use crate::layout::bits::Bits;

mod stripe_impl;

/// RAID0 stores raw striped lanes without parity.
pub struct RAID0<const D: usize, const N: usize>(pub [Bits<N>; D]);

impl<const D: usize, const N: usize> RAID0<D, N> {
    #[must_use]
    pub const fn zero() -> Self {
        Self([Bits::<N>::zero(); D])
    }
}
