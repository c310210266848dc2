use super::*;
use std::mem::{align_of, size_of};

#[test]
fn zero_works_for_lane_widths() {
    assert_eq!(Bits::<1>::zero().as_bytes(), &[0u8; 1]);
    assert_eq!(Bits::<4>::zero().as_bytes(), &[0u8; 4]);
}

#[test]
fn layout_is_transparent_over_byte_array() {
    assert_eq!(size_of::<Bits<1>>(), size_of::<[u8; 1]>());
    assert_eq!(align_of::<Bits<4>>(), align_of::<[u8; 4]>());
}

#[test]
fn register_conversion_is_little_endian() {
    let lane = Bits::<4>::from_register(0x1234_ABCD);
    assert_eq!(lane.as_bytes(), &[0xCD, 0xAB, 0x34, 0x12]);
    assert_eq!(lane.to_register(), 0x1234_ABCD);

    let byte = Bits::<1>::from_register(0x1234_ABCD);
    assert_eq!(byte.as_bytes(), &[0xCD]);
    assert_eq!(byte.to_register(), 0xCD);
}

#[test]
fn xor_operators_agree() {
    let a = Bits::<2>([0b1010_1010, 0x0F]);
    let b = Bits::<2>([0b0101_0101, 0xFF]);
    let c = a ^ b;
    assert_eq!(c.as_bytes(), &[0xFF, 0xF0]);

    let mut d = a;
    d ^= b;
    assert_eq!(d, c);

    let mut e = a;
    e ^= &b;
    e ^= &b;
    assert_eq!(e, a);
}
