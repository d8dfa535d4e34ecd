use flipbook_core::*;
use proptest::prelude::*;

fn create_window(page_count: usize) -> PageWindow {
    let config = CatalogConfig::default();
    let pages = (0..page_count).map(|i| config.page_id(i)).collect();
    PageWindow::new(PageCatalog::from_pages(pages))
}

#[test]
fn test_new_window_is_unloaded() {
    let window = create_window(12);
    assert_eq!(window.len(), 12);
    assert_eq!(window.loaded_count(), 0);
    assert!(window.slots().iter().all(|slot| *slot == PageSlot::Unloaded));
}

#[test]
fn test_load_range_uses_catalog_identifiers() {
    let mut window = create_window(10);
    let loaded = window.load_range(&ResidentSet::from_range(2..=4));

    assert_eq!(loaded, 3);
    assert_eq!(
        window.slot(3),
        Some(&PageSlot::Loaded(PageId::new("assets/page_03.jpg")))
    );
    assert_eq!(window.slot(5), Some(&PageSlot::Unloaded));
}

#[test]
fn test_load_range_is_idempotent() {
    let mut window = create_window(10);
    let resident = ResidentSet::from_range(0..=5);

    assert_eq!(window.load_range(&resident), 6);
    assert_eq!(window.load_range(&resident), 0);
    assert_eq!(window.loaded_count(), 6);
}

#[test]
fn test_out_of_bounds_indices_are_ignored() {
    let mut window = create_window(5);
    let resident: ResidentSet = [3, 4, 5, 99].into_iter().collect();

    assert_eq!(window.load_range(&resident), 2);
    assert_eq!(window.len(), 5);
    assert_eq!(window.unload_except(&ResidentSet::from_range(90..=99)), 2);
}

#[test]
fn test_unload_except_keeps_resident_pages() {
    let mut window = create_window(20);
    window.load_range(&ResidentSet::from_range(0..=9));

    let resident = ResidentSet::from_range(5..=12);
    assert_eq!(window.unload_except(&resident), 5);
    for index in 5..=9 {
        assert!(window.is_loaded(index));
    }
    for index in 0..5 {
        assert!(!window.is_loaded(index));
    }
    // 10..=12 were never loaded; unload_except does not load them
    assert!(!window.is_loaded(10));
}

#[test]
fn test_load_all() {
    let mut window = create_window(8);
    window.load_range(&ResidentSet::from_range(0..=1));

    assert_eq!(window.load_all(), 6);
    assert_eq!(window.load_all(), 0);
    assert!(window.slots().iter().all(PageSlot::is_loaded));
}

#[test]
fn test_changes_are_recorded_by_index() {
    let mut window = create_window(6);
    window.load_range(&ResidentSet::from_range(1..=2));
    window.unload_except(&ResidentSet::from_range(2..=3));

    let changes = window.take_changes();
    assert_eq!(
        changes,
        vec![
            SlotChange::Loaded {
                index: 1,
                page: PageId::new("assets/page_01.jpg")
            },
            SlotChange::Loaded {
                index: 2,
                page: PageId::new("assets/page_02.jpg")
            },
            SlotChange::Unloaded { index: 1 },
        ]
    );
    assert!(window.take_changes().is_empty());
}

#[test]
fn test_empty_window() {
    let mut window = create_window(0);
    assert!(window.is_empty());
    assert_eq!(window.load_range(&ResidentSet::from_range(0..=3)), 0);
    assert_eq!(window.load_all(), 0);
    assert_eq!(window.unload_except(&ResidentSet::new()), 0);
}

proptest! {
    #[test]
    fn prop_load_then_unload_matches_resident_set(
        total in 0usize..120,
        preloaded in prop::collection::vec(0usize..150, 0..40),
        resident in prop::collection::vec(0usize..150, 0..40),
    ) {
        let mut window = create_window(total);
        window.load_range(&preloaded.into_iter().collect());

        let resident: ResidentSet = resident.into_iter().collect();
        window.load_range(&resident);
        window.unload_except(&resident);

        for index in 0..total {
            prop_assert_eq!(
                window.is_loaded(index),
                resident.contains(index),
                "slot {} disagrees with the resident set",
                index
            );
            prop_assert_eq!(window.slot(index).unwrap().is_loaded(), resident.contains(index));
        }
        prop_assert_eq!(window.len(), total);
    }
}
