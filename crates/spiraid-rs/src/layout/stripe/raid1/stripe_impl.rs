use crate::layout::bits::Bits;
use crate::layout::stripe::raid1::RAID1;
use crate::layout::stripe::traits::stripe::Stripe;
use crate::layout::stripe::traits::verify::Verify;

impl<const D: usize, const N: usize> Stripe<D, N> for RAID1<D, N> {
    const DATA: usize = 1;
    const CHANNELS: usize = D;

    fn write(&mut self, data: &[Bits<N>]) {
        assert_eq!(data.len(), Self::DATA, "RAID1 expects {} lane.", Self::DATA);
        self.0.fill(data[0]);
    }

    fn write_raw(&mut self, data: &[Bits<N>]) {
        assert_eq!(
            data.len(),
            Self::CHANNELS,
            "RAID1 expects {} lanes.",
            Self::CHANNELS
        );
        self.0.copy_from_slice(data);
    }

    fn read(&self, out: &mut [Bits<N>]) {
        assert_eq!(
            out.len(),
            Self::DATA,
            "Output buffer must be {} lane.",
            Self::DATA
        );
        out[0] = self.0[self.majority()];
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
