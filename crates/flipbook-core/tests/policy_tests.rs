use flipbook_core::*;
use proptest::prelude::*;

fn fixed(radius: usize) -> WindowPolicy {
    WindowPolicy::fixed_radius(radius, radius)
}

#[test]
fn test_fixed_radius_middle_of_book() {
    let resident = fixed(6).resident_set(10, 20, DeviceClass::Standard);
    assert_eq!(resident.to_vec(), (3..=16).collect::<Vec<_>>());
    assert_eq!(resident.len(), 14);
}

#[test]
fn test_fixed_radius_clamped_at_start() {
    let resident = fixed(6).resident_set(1, 20, DeviceClass::Standard);
    assert_eq!(resident.to_vec(), (0..=7).collect::<Vec<_>>());
}

#[test]
fn test_fixed_radius_clamped_at_end() {
    let resident = fixed(6).resident_set(20, 20, DeviceClass::Standard);
    assert_eq!(resident.to_vec(), (13..=19).collect::<Vec<_>>());
}

#[test]
fn test_fixed_radius_depends_on_device_class() {
    let policy = WindowPolicy::default();
    assert_eq!(
        policy.strategy(),
        WindowStrategy::FixedRadius {
            radius: 10,
            constrained_radius: 6
        }
    );

    let standard = policy.resident_set(50, 100, DeviceClass::Standard);
    let constrained = policy.resident_set(50, 100, DeviceClass::Constrained);
    assert_eq!(standard.first(), Some(39));
    assert_eq!(standard.last(), Some(60));
    assert_eq!(constrained.first(), Some(43));
    assert_eq!(constrained.last(), Some(56));
}

#[test]
fn test_spread_pair_cover_is_alone() {
    let policy = WindowPolicy::spread_pair();
    let resident = policy.resident_set(1, 20, DeviceClass::Standard);
    assert_eq!(resident.to_vec(), vec![0]);
}

#[test]
fn test_spread_pair_visible_pages() {
    let policy = WindowPolicy::spread_pair();
    assert_eq!(
        policy.resident_set(5, 20, DeviceClass::Standard).to_vec(),
        vec![4, 5]
    );
    // The facing page past the end is dropped, not aliased
    assert_eq!(
        policy.resident_set(20, 20, DeviceClass::Standard).to_vec(),
        vec![19]
    );
}

#[test]
fn test_spread_pair_ignores_device_class() {
    let policy = WindowPolicy::spread_pair();
    assert_eq!(
        policy.resident_set(8, 20, DeviceClass::Constrained),
        policy.resident_set(8, 20, DeviceClass::Standard)
    );
}

#[test]
fn test_spread_pair_keeps_cover() {
    let policy = WindowPolicy::new(WindowStrategy::SpreadPair {
        keep_cover: true,
        preload_adjacent: false,
    });
    assert_eq!(
        policy.resident_set(9, 20, DeviceClass::Standard).to_vec(),
        vec![0, 8, 9]
    );
}

#[test]
fn test_preload_set_adjacent_spreads() {
    let policy = WindowPolicy::new(WindowStrategy::SpreadPair {
        keep_cover: false,
        preload_adjacent: true,
    });
    assert_eq!(policy.preload_set(5, 20).to_vec(), vec![2, 3, 6, 7]);
    assert_eq!(policy.preload_set(1, 20).to_vec(), vec![1, 2]);
    assert_eq!(policy.preload_set(20, 20).to_vec(), vec![17, 18]);
    assert!(policy.preload_set(5, 0).is_empty());

    assert!(WindowPolicy::spread_pair().preload_set(5, 20).is_empty());
    assert!(WindowPolicy::default().preload_set(5, 20).is_empty());
}

#[test]
fn test_empty_catalog_has_no_resident_pages() {
    for policy in [WindowPolicy::default(), WindowPolicy::spread_pair()] {
        for page in [0, 1, 5, 100] {
            assert!(policy.resident_set(page, 0, DeviceClass::Standard).is_empty());
        }
    }
}

#[test]
fn test_out_of_range_page_never_aliases() {
    let resident = fixed(2).resident_set(30, 20, DeviceClass::Standard);
    assert!(resident.is_empty());

    let resident = fixed(2).resident_set(21, 20, DeviceClass::Standard);
    assert_eq!(resident.to_vec(), vec![18, 19]);
}

#[test]
fn test_visible_pages() {
    let single = WindowPolicy::default();
    assert_eq!(single.visible_pages(4, 10).to_vec(), vec![3]);
    assert!(single.visible_pages(11, 10).is_empty());

    let spread = WindowPolicy::spread_pair();
    assert_eq!(spread.visible_pages(1, 10).to_vec(), vec![0]);
    assert_eq!(spread.visible_pages(4, 10).to_vec(), vec![3, 4]);
    assert_eq!(spread.visible_pages(10, 10).to_vec(), vec![9]);
}

#[test]
fn test_flip_targets() {
    let single = WindowPolicy::default();
    assert_eq!(single.next_page(4), 5);
    assert_eq!(single.previous_page(4), 3);
    assert_eq!(single.previous_page(1), 1);

    let spread = WindowPolicy::spread_pair();
    assert_eq!(spread.next_page(1), 2);
    assert_eq!(spread.next_page(2), 4);
    assert_eq!(spread.previous_page(4), 2);
    assert_eq!(spread.previous_page(2), 1);
}

fn any_strategy() -> impl Strategy<Value = WindowStrategy> {
    prop_oneof![
        (0usize..40, 0usize..40).prop_map(|(radius, constrained_radius)| {
            WindowStrategy::FixedRadius {
                radius,
                constrained_radius,
            }
        }),
        (any::<bool>(), any::<bool>()).prop_map(|(keep_cover, preload_adjacent)| {
            WindowStrategy::SpreadPair {
                keep_cover,
                preload_adjacent,
            }
        }),
    ]
}

proptest! {
    #[test]
    fn prop_resident_set_within_bounds(
        strategy in any_strategy(),
        total in 0usize..300,
        page_seed in 0usize..1000,
        constrained in any::<bool>(),
    ) {
        let policy = WindowPolicy::new(strategy);
        let device = if constrained { DeviceClass::Constrained } else { DeviceClass::Standard };
        let page = if total == 0 { 1 } else { 1 + page_seed % total };

        let resident = policy.resident_set(page, total, device);
        for index in resident.iter() {
            prop_assert!(index < total, "index {} outside 0..{}", index, total);
        }
        for index in policy.preload_set(page, total).iter() {
            prop_assert!(index < total, "preload index {} outside 0..{}", index, total);
        }
        if total > 0 {
            prop_assert!(resident.contains(page - 1), "current page {} not resident", page);
        }
    }

    #[test]
    fn prop_resident_set_is_deterministic(
        strategy in any_strategy(),
        total in 0usize..300,
        page in 1usize..300,
    ) {
        let policy = WindowPolicy::new(strategy);
        prop_assert_eq!(
            policy.resident_set(page, total, DeviceClass::Standard),
            policy.resident_set(page, total, DeviceClass::Standard)
        );
    }
}
