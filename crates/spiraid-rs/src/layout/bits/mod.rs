//! Fixed-width byte lanes with XOR helpers for RAID layouts.

use std::ops::{BitXor, BitXorAssign};

#[cfg(test)]
mod bits_tests;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
/// Bits stores the `N` bytes one channel holds for a word.
pub struct Bits<const N: usize>(pub [u8; N]);

impl<const N: usize> Bits<N> {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; N])
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// `from_register` takes the low `N` bytes of a channel register, little-endian.
    #[must_use]
    pub fn from_register(reg: u32) -> Self {
        let mut out = Self::zero();
        for (dst, src) in out.0.iter_mut().zip(reg.to_le_bytes()) {
            *dst = src;
        }
        out
    }

    /// `to_register` places the lane in the low bytes of a channel register.
    #[must_use]
    pub fn to_register(&self) -> u32 {
        let mut bytes = [0u8; 4];
        for (dst, src) in bytes.iter_mut().zip(self.0) {
            *dst = src;
        }
        u32::from_le_bytes(bytes)
    }

    #[inline]
    pub fn xor_in_place(&mut self, rhs: &Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a ^= *b;
        }
    }
}

impl<const N: usize> BitXor for Bits<N> {
    type Output = Self;
    #[inline]
    fn bitxor(mut self, rhs: Self) -> Self::Output {
        self.xor_in_place(&rhs);
        self
    }
}

impl<const N: usize> BitXorAssign for Bits<N> {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.xor_in_place(&rhs);
    }
}

impl<const N: usize> BitXorAssign<&Self> for Bits<N> {
    #[inline]
    fn bitxor_assign(&mut self, rhs: &Self) {
        self.xor_in_place(rhs);
    }
}
