use crate::layout::bits::Bits;
use crate::layout::stripe::raid0::RAID0;
use crate::layout::stripe::traits::stripe::Stripe;

impl<const D: usize, const N: usize> Stripe<D, N> for RAID0<D, N> {
    const DATA: usize = D;
    const CHANNELS: usize = D;

    fn write(&mut self, data: &[Bits<N>]) {
        assert_eq!(data.len(), Self::DATA, "RAID0 expects {} lanes.", Self::DATA);
        self.0.copy_from_slice(data);
    }

    fn write_raw(&mut self, data: &[Bits<N>]) {
        self.write(data);
    }

    fn read(&self, out: &mut [Bits<N>]) {
        assert_eq!(
            out.len(),
            Self::DATA,
            "Output buffer must be {} lanes.",
            Self::DATA
        );
        out.copy_from_slice(&self.0);
    }

    fn read_raw(&self, out: &mut [Bits<N>]) {
        self.read(out);
    }
}
