use crate::layout::bits::Bits;
use crate::layout::stripe::raid0::RAID0;
use crate::layout::stripe::raid1::RAID1;
use crate::layout::stripe::raid3::RAID3;
use crate::layout::stripe::traits::stripe::Stripe;

fn roundtrip<S: Stripe<4, 1>>(stripe: &mut S, data: &[Bits<1>]) -> Vec<Bits<1>> {
    stripe.write(data);
    let mut out = vec![Bits::zero(); S::DATA];
    stripe.read(&mut out);
    out
}

#[test]
fn every_layout_reads_back_what_it_wrote() {
    let data = [Bits([0x11]), Bits([0x22]), Bits([0x33]), Bits([0x44])];
    assert_eq!(roundtrip(&mut RAID0::<4, 1>::zero(), &data), data.to_vec());
    assert_eq!(roundtrip(&mut RAID1::<4, 1>::zero(), &data[..1]), data[..1].to_vec());
    assert_eq!(roundtrip(&mut RAID3::<4, 1>::zero(), &data[..3]), data[..3].to_vec());
}

#[test]
fn only_redundant_layouts_verify() {
    assert!(RAID0::<4, 1>::zero().as_verify().is_none());
    assert!(RAID1::<4, 1>::zero().as_verify().is_some());
    assert!(RAID3::<4, 1>::zero().as_verify().is_some());
}

#[test]
fn channel_counts_follow_layout() {
    assert_eq!(<RAID0<4, 1> as Stripe<4, 1>>::DATA, 4);
    assert_eq!(<RAID1<4, 4> as Stripe<4, 4>>::DATA, 1);
    assert_eq!(<RAID3<4, 1> as Stripe<4, 1>>::DATA, 3);
    assert_eq!(<RAID3<4, 1> as Stripe<4, 1>>::CHANNELS, 4);
}
