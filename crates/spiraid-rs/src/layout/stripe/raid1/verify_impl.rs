use crate::layout::stripe::raid1::RAID1;
use crate::layout::stripe::traits::verify::Verify;

impl<const D: usize, const N: usize> Verify for RAID1<D, N> {
    fn mismatched(&self) -> Vec<usize> {
        let best = self.0[self.majority()];
        (0..D).filter(|&i| self.0[i] != best).collect()
    }
}
