use crate::layout::bits::Bits;
use crate::layout::stripe::raid3::RAID3;
use crate::layout::stripe::traits::stripe::Stripe;
use crate::layout::stripe::traits::verify::Verify;

#[test]
fn parity_lives_on_last_channel() {
    assert_eq!(RAID3::<4, 1>::PARITY_IDX, 3);

    let mut r = RAID3::<4, 1>::zero();
    r.write(&[Bits([0xAB]), Bits([0xCD]), Bits([0xEF])]);
    assert_eq!(r.0[3], Bits([0x89]));
    assert!(r.consistent());
}

#[test]
fn corrupted_parity_is_detected_not_repaired() {
    let mut r = RAID3::<4, 1>::zero();
    r.write_raw(&[Bits([0xAB]), Bits([0xCD]), Bits([0xEF]), Bits([0x00])]);
    assert_eq!(r.mismatched(), vec![3]);
    assert_eq!(r.parity(), Bits([0x89]));
    assert_eq!(r.0[3], Bits([0x00]));

    let mut out = [Bits::zero(); 3];
    r.read(&mut out);
    assert_eq!(out, [Bits([0xAB]), Bits([0xCD]), Bits([0xEF])]);
}

#[test]
fn wider_lanes_xor_bytewise() {
    let mut r = RAID3::<3, 2>::zero();
    r.write(&[Bits([0x0F, 0xF0]), Bits([0xFF, 0xFF])]);
    assert_eq!(r.0[2], Bits([0xF0, 0x0F]));
}

#[test]
#[should_panic(expected = "RAID3 expects 3 lanes.")]
fn write_rejects_parity_lane_from_host() {
    let mut r = RAID3::<4, 1>::zero();
    r.write(&[Bits([0]); 4]);
}
