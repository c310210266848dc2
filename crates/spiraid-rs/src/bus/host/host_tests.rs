use super::*;
use crate::bus::regmap::RegisterMap;
use crate::config::ControllerConfig;
use crate::device::fram::Fram;
use crate::error::Fault;

fn host() -> Host<Fram> {
    ControllerConfig::default().build().unwrap()
}

#[test]
fn wishbone_harness_sequence() {
    let mut host = host();
    let base = RegisterMap::default().base();

    host.set_mode(RaidMode::StripeParity).unwrap();
    assert_eq!(host.mode(), Ok(RaidMode::StripeParity));
    host.set_mode(RaidMode::Stripe).unwrap();
    assert_eq!(host.status(), Ok(0));

    for i in 0..4 {
        host.write(base + i * 4, i + 0xF0).unwrap();
    }
    host.idle(5);
    for i in 0..4 {
        assert_eq!(host.read(base + i * 4), Ok(i + 0xF0));
    }
}

#[test]
fn mirror_words_at_four_byte_stride_roundtrip() {
    let mut host = host();
    for i in 0..4u32 {
        host.write_data(i * 4, 0x0A0B_0C0D << i).unwrap();
    }
    for i in 0..4u32 {
        assert_eq!(host.read_data(i * 4), Ok(0x0A0B_0C0D << i));
    }
    assert_eq!(host.status(), Ok(0));
}

#[test]
fn erased_storage_reads_all_ones() {
    let mut host = host();
    assert_eq!(host.read_data(0x3FC), Ok(0xFFFF_FFFF));
}

#[test]
fn small_budget_times_out_then_recovers() {
    let mut host = host();
    host.set_budget(20);
    assert_eq!(
        host.write_data(0x10, 0x1234_ABCD),
        Err(BusError::Timeout { ticks: 20 })
    );

    host.set_budget(DEFAULT_TICK_BUDGET);
    assert_eq!(host.read_data(0x10), Ok(0x1234_ABCD));
}

#[test]
fn failed_transaction_surfaces_fault() {
    let mut host = ControllerConfig {
        capacity: 0x400,
        ..ControllerConfig::default()
    }
    .build()
    .unwrap();
    assert!(matches!(
        host.read_data(0x3FD),
        Err(BusError::Fault(Fault::Protocol { .. }))
    ));
    host.set_mode(RaidMode::Stripe).unwrap();
    assert_eq!(host.read_data(0x3FF), Ok(0xFFFF_FFFF));
}

#[test]
fn identical_retry_after_timeout_runs_its_own_transaction() {
    let mut host = host();
    host.set_mode(RaidMode::Stripe).unwrap();
    let start = host.adapter().controller().now();

    host.set_budget(5);
    assert_eq!(
        host.write_data(0x20, 0x0BAD_F00D),
        Err(BusError::Timeout { ticks: 5 })
    );
    host.set_budget(DEFAULT_TICK_BUDGET);
    assert_eq!(host.write_data(0x20, 0x0BAD_F00D), Ok(()));

    // Two STRIPE writes of 48 busy ticks each.
    let elapsed = host.adapter().controller().now() - start;
    assert!(elapsed >= 2 * 48, "retry finished after {elapsed} ticks");
    assert!(!host.adapter().pending());
    assert_eq!(host.read_data(0x20), Ok(0x0BAD_F00D));
}

#[test]
fn mode_register_sits_at_harness_offset() {
    let mut host = host();
    let base = RegisterMap::default().base();
    host.write(base + 0x400, 5).unwrap();
    assert_eq!(host.mode(), Ok(RaidMode::StripeParity));
    assert_eq!(host.read(base + 0x400), Ok(5));
    assert_eq!(host.read(base + 0x401), Ok(0));
}
