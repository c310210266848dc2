//! RAID1 stripe layout: the host lane mirrored onto every channel.

use crate::layout::bits::Bits;

#[cfg(test)]
mod raid1_tests;
mod stripe_impl;
mod verify_impl;

/// RAID1 stores a copy of the host lane on each channel.
pub struct RAID1<const D: usize, const N: usize>(pub [Bits<N>; D]);

impl<const D: usize, const N: usize> RAID1<D, N> {
    #[must_use]
    pub const fn zero() -> Self {
        Self([Bits::<N>::zero(); D])
    }

    /// `majority` returns the index of the most common copy. Ties go to the lowest index.
    #[must_use]
    pub fn majority(&self) -> usize {
        let mut best = 0;
        let mut best_count = 0;
        for (i, lane) in self.0.iter().enumerate() {
            let count = self.0.iter().filter(|other| *other == lane).count();
            if count > best_count {
                best = i;
                best_count = count;
            }
        }
        best
    }
}
