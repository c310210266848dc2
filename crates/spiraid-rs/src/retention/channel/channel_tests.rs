use super::*;
use crate::device::fram::{CAPACITY, Fram};

fn channel() -> Channel<Fram> {
    Channel::new(2, Fram::new(), SpiMode::Mode0)
}

fn run(ch: &mut Channel<Fram>) -> u64 {
    let mut ticks = 0;
    while ch.busy() {
        ch.tick();
        ticks += 1;
        assert!(ticks < 10_000, "channel never retired");
    }
    ticks
}

#[test]
fn single_byte_write_is_enable_then_write() {
    let mut ch = channel();
    ch.set_outbound(0xAB);
    ch.request(Access::Write, 0x10, 1).unwrap();
    assert!(ch.busy());
    assert_eq!(run(&mut ch), 11 + 35);
    assert_eq!(ch.ticks(), 46);
    assert_eq!(ch.device().peek(0x10), Some(0xAB));
    assert_eq!(ch.device().peek(0x11), Some(0xFF));
    assert_eq!(ch.fault(), None);
}

#[test]
fn four_byte_lane_is_stored_little_endian() {
    let mut ch = channel();
    ch.set_outbound(0x1234_ABCD);
    ch.request(Access::Write, 0x100, 4).unwrap();
    assert_eq!(run(&mut ch), 4 * 46);
    let stored: Vec<_> = (0x100..0x104).map(|a| ch.device().peek(a).unwrap()).collect();
    assert_eq!(stored, [0xCD, 0xAB, 0x34, 0x12]);

    ch.clear();
    ch.request(Access::Read, 0x100, 4).unwrap();
    assert_eq!(run(&mut ch), 4 * 35);
    assert_eq!(ch.inbound(), 0x1234_ABCD);
}

#[test]
fn erased_byte_reads_ff() {
    let mut ch = channel();
    ch.request(Access::Read, 0x7FF, 1).unwrap();
    run(&mut ch);
    assert_eq!(ch.inbound(), 0xFF);
}

#[test]
fn request_while_busy_is_invalid_state() {
    let mut ch = channel();
    ch.request(Access::Read, 0, 1).unwrap();
    ch.tick();
    assert_eq!(ch.request(Access::Read, 1, 1), Err(Fault::InvalidState));
    run(&mut ch);
    assert!(ch.request(Access::Read, 1, 1).is_ok());
}

#[test]
fn span_past_capacity_is_rejected_without_side_effects() {
    let mut ch = channel();
    ch.set_outbound(0xDEAD_BEEF);
    assert_eq!(
        ch.request(Access::Write, 0x7FE, 4),
        Err(Fault::Protocol {
            channel: 2,
            fault: ProtocolFault::AddressOutOfRange {
                address: 0x801,
                capacity: CAPACITY
            }
        })
    );
    assert!(!ch.busy());
    assert_eq!(ch.device().peek(0x7FE), Some(0xFF));
    assert_eq!(ch.outbound(), 0xDEAD_BEEF);
}

#[test]
fn clear_resets_registers() {
    let mut ch = channel();
    ch.set_outbound(0x55);
    ch.request(Access::Read, 0, 1).unwrap();
    run(&mut ch);
    ch.clear();
    assert_eq!((ch.outbound(), ch.inbound(), ch.fault()), (0, 0, None));
}

struct Rejecting;

impl SpiDevice for Rejecting {
    fn capacity(&self) -> usize {
        CAPACITY
    }

    fn select(&mut self, _mode: SpiMode) {}

    fn transfer(&mut self, _mosi: bool) -> bool {
        true
    }

    fn deselect(&mut self) -> Result<(), crate::error::DeviceFault> {
        Err(crate::error::DeviceFault::UnknownOpcode(0x06))
    }
}

#[test]
fn device_fault_aborts_remaining_sequence() {
    let mut ch = Channel::new(1, Rejecting, SpiMode::Mode3);
    ch.set_outbound(0x1234_5678);
    ch.request(Access::Write, 0, 4).unwrap();
    let mut ticks = 0;
    while ch.busy() {
        ch.tick();
        ticks += 1;
    }
    assert_eq!(ticks, 11);
    assert_eq!(
        ch.fault(),
        Some(ProtocolFault::Device(crate::error::DeviceFault::UnknownOpcode(0x06)))
    );
    assert!(ch.request(Access::Read, 0, 1).is_ok());
    assert_eq!(ch.fault(), None);
}
