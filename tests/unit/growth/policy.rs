use super::*;

fn all_flags() -> impl Iterator<Item = NeighborFlags> {
    (0u8..16).map(NeighborFlags::from_bits)
}

#[test]
fn flag_bits_follow_west_north_south_east_order() {
    let n = NeighborFlags::from_bits(0b1001);
    assert!(n.west());
    assert!(!n.north());
    assert!(!n.south());
    assert!(n.east());
    assert_eq!(n.horizontal(), 2);
    assert_eq!(n.vertical(), 0);
}

#[test]
fn corners_requires_one_horizontal_and_one_vertical() {
    let grown: Vec<u8> = all_flags()
        .filter(|&n| GrowthPolicy::Corners.grows(n))
        .map(NeighborFlags::bits)
        .collect();
    // S+E, N+E, W+S, W+N
    assert_eq!(grown, vec![0b0011, 0b0101, 0b1010, 0b1100]);
}

#[test]
fn not_corners_is_the_negation_of_corners() {
    for n in all_flags() {
        assert_ne!(
            GrowthPolicy::Corners.grows(n),
            GrowthPolicy::NotCorners.grows(n),
            "flags {:04b}",
            n.bits()
        );
    }
}

#[test]
fn strict_policies_exclude_the_other_axis() {
    let w = NeighborFlags::from_bits(NeighborFlags::WEST);
    let n = NeighborFlags::from_bits(NeighborFlags::NORTH);
    let wn = NeighborFlags::from_bits(NeighborFlags::WEST | NeighborFlags::NORTH);

    assert!(GrowthPolicy::StrictHorizontal.grows(w));
    assert!(!GrowthPolicy::StrictHorizontal.grows(n));
    assert!(!GrowthPolicy::StrictHorizontal.grows(wn));

    assert!(GrowthPolicy::StrictVertical.grows(n));
    assert!(!GrowthPolicy::StrictVertical.grows(w));
    assert!(!GrowthPolicy::StrictVertical.grows(wn));
}

#[test]
fn any_neighbor_and_always() {
    assert!(!GrowthPolicy::AnyNeighbor.grows(NeighborFlags::default()));
    assert!(GrowthPolicy::Always.grows(NeighborFlags::default()));
    assert!(GrowthPolicy::AnyNeighbor.grows(NeighborFlags::from_bits(NeighborFlags::SOUTH)));
}

#[test]
fn custom_policy_is_called() {
    fn only_east(n: NeighborFlags) -> bool {
        n.bits() == NeighborFlags::EAST
    }
    let p = GrowthPolicy::Custom(only_east);
    assert!(p.grows(NeighborFlags::from_bits(NeighborFlags::EAST)));
    assert!(!p.grows(NeighborFlags::from_bits(NeighborFlags::ALL)));
    assert_eq!(p.name(), "custom");
}

#[test]
fn policies_parse_from_kebab_case() {
    let p: GrowthPolicy = serde_json::from_str("\"strict-vertical\"").unwrap();
    assert!(matches!(p, GrowthPolicy::StrictVertical));
    assert!(serde_json::from_str::<GrowthPolicy>("\"custom\"").is_err());
}
