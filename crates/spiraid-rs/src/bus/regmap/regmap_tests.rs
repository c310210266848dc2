use super::*;

#[test]
fn default_map_matches_harness_addresses() {
    let map = RegisterMap::default();
    assert_eq!(map.base(), 0x3000_0000);
    assert_eq!(map.data_len(), 0x400);
    assert_eq!(map.decode(0x3000_0000), Some(Register::Data(0)));
    assert_eq!(map.decode(0x3000_03FF), Some(Register::Data(0x3FF)));
    assert_eq!(map.decode(0x3000_0400), Some(Register::Mode));
    assert_eq!(map.decode(0x3000_0401), Some(Register::Status));
    assert_eq!(map.mode(), 0x3000_0400);
    assert_eq!(map.status(), 0x3000_0401);
    assert_eq!(map.data(0x10), 0x3000_0010);
}

#[test]
fn addresses_outside_the_map_are_unmapped() {
    let map = RegisterMap::default();
    assert_eq!(map.decode(0x2FFF_FFFF), None);
    assert_eq!(map.decode(0x3000_0402), None);
    assert_eq!(map.decode(0x3000_0800), None);
    assert_eq!(map.decode(0), None);
}

#[test]
fn short_data_region_leaves_a_hole() {
    let map = RegisterMap::new(0x1000, 0x100).unwrap();
    assert_eq!(map.decode(0x10FF), Some(Register::Data(0xFF)));
    assert_eq!(map.decode(0x1100), None);
    assert_eq!(map.decode(0x1400), Some(Register::Mode));
}

#[test]
fn invalid_maps_are_config_errors() {
    assert_eq!(
        RegisterMap::new(0, 0x500),
        Err(ConfigError::DataRegion {
            data_len: 0x500,
            capacity: 0x400
        })
    );
    assert_eq!(
        RegisterMap::new(0xFFFF_FF00, 0x400),
        Err(ConfigError::Overflow { base: 0xFFFF_FF00 })
    );
}
