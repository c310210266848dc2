use crate::layout::stripe::raid3::RAID3;
use crate::layout::stripe::traits::verify::Verify;

impl<const D: usize, const N: usize> Verify for RAID3<D, N> {
    fn mismatched(&self) -> Vec<usize> {
        if self.0[Self::PARITY_IDX] == self.parity() {
            Vec::new()
        } else {
            vec![Self::PARITY_IDX]
        }
    }
}
