use crate::layout::bits::Bits;
use crate::layout::stripe::raid1::RAID1;
use crate::layout::stripe::traits::stripe::Stripe;
use crate::layout::stripe::traits::verify::Verify;

const WORD: Bits<4> = Bits([0xCD, 0xAB, 0x34, 0x12]);

#[test]
fn write_mirrors_every_channel() {
    let mut r = RAID1::<4, 4>::zero();
    r.write(&[WORD]);
    for d in 0..4 {
        assert_eq!(r.0[d], WORD, "channel {d}");
    }
    assert!(r.consistent());
}

#[test]
fn read_takes_majority_and_flags_minority() {
    let mut r = RAID1::<4, 4>::zero();
    r.write_raw(&[WORD, Bits([0; 4]), WORD, WORD]);

    let mut out = [Bits::zero(); 1];
    r.read(&mut out);
    assert_eq!(out[0], WORD);
    assert_eq!(r.mismatched(), vec![1]);
}

#[test]
fn tie_goes_to_lowest_channel() {
    let other = Bits([1, 2, 3, 4]);
    let mut r = RAID1::<4, 4>::zero();
    r.write_raw(&[other, WORD, WORD, other]);
    assert_eq!(r.majority(), 0);
    assert_eq!(r.mismatched(), vec![1, 2]);

    r.write_raw(&[Bits([9; 4]), WORD, other, Bits([7; 4])]);
    assert_eq!(r.majority(), 0);
}

#[test]
#[should_panic(expected = "RAID1 expects 4 lanes.")]
fn write_raw_needs_every_channel() {
    let mut r = RAID1::<4, 4>::zero();
    r.write_raw(&[WORD]);
}
