use crate::layout::bits::Bits;
use crate::layout::stripe::raid3::RAID3;
use crate::layout::stripe::traits::stripe::Stripe;
use crate::layout::stripe::traits::verify::Verify;

impl<const D: usize, const N: usize> Stripe<D, N> for RAID3<D, N> {
    const DATA: usize = D - 1;
    const CHANNELS: usize = D;

    fn write(&mut self, data: &[Bits<N>]) {
        assert_eq!(data.len(), Self::DATA, "RAID3 expects {} lanes.", Self::DATA);
        self.0[..Self::DATA].copy_from_slice(data);
        self.write_parity();
    }

    fn write_raw(&mut self, data: &[Bits<N>]) {
        assert_eq!(
            data.len(),
            Self::CHANNELS,
            "RAID3 expects {} raw lanes.",
            Self::CHANNELS
        );
        self.0.copy_from_slice(data);
    }

    fn read(&self, out: &mut [Bits<N>]) {
        assert_eq!(
            out.len(),
            Self::DATA,
            "Output buffer must be {} lanes.",
            Self::DATA
        );
        out.copy_from_slice(&self.0[..Self::DATA]);
    }

    fn read_raw(&self, out: &mut [Bits<N>]) {
        assert_eq!(
            out.len(),
            Self::CHANNELS,
            "Output buffer must be {} lanes.",
            Self::CHANNELS
        );
        out.copy_from_slice(&self.0);
    }

    fn as_verify(&self) -> Option<&dyn Verify> {
        Some(self)
    }
}
