use super::*;

/// Two rows of five 100x80 keys with a 10px gap, codes 'a'.. in row order.
fn two_rows() -> Vec<Key> {
    let mut keys = Vec::new();
    for row in 0..2 {
        for col in 0..5 {
            let code = 'a' as i32 + row * 5 + col;
            keys.push(Key::new(col * 100, row * 80, 100, 80, code).with_gap(10));
        }
    }
    keys
}

#[test]
fn threshold_is_squared_mean_extent() {
    let keys = two_rows();
    // min(100, 80) + 10 = 90 for every key
    assert_eq!(proximity_threshold(&keys), 90 * 90);
    let index = KeyGeometryIndex::build(&keys).unwrap();
    assert_eq!(index.proximity_threshold(), 8100);
}

#[test]
fn threshold_uses_integer_mean() {
    let keys = vec![
        Key::new(0, 0, 10, 10, 1),
        Key::new(10, 0, 20, 20, 2).with_gap(1),
    ];
    // (10 + 21) / 2 = 15
    assert_eq!(proximity_threshold(&keys), 225);
}

#[test]
fn threshold_recomputed_after_gap_change() {
    let mut keys = two_rows();
    let before = KeyGeometryIndex::build(&keys).unwrap();
    for key in &mut keys {
        key.gap = 30;
    }
    let after = KeyGeometryIndex::build(&keys).unwrap();
    assert_eq!(before.proximity_threshold(), 8100);
    assert_eq!(after.proximity_threshold(), 110 * 110);
}

#[test]
fn rebuilding_is_deterministic() {
    let keys = two_rows();
    let a = KeyGeometryIndex::build(&keys).unwrap();
    let b = KeyGeometryIndex::build(&keys).unwrap();
    assert_eq!(a, b);
    for i in 0..keys.len() {
        assert_eq!(a.neighbors(i), b.neighbors(i));
    }
}

#[test]
fn empty_keyboard_is_rejected() {
    assert_eq!(KeyGeometryIndex::build(&[]), Err(GeometryError::Empty));
}

#[test]
fn invalid_key_is_rejected_with_index() {
    let mut keys = two_rows();
    keys[3].width = 0;
    let err = KeyGeometryIndex::build(&keys).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidKey { index: 3, .. }));

    let mut keys = two_rows();
    keys[1].x = -5;
    let err = KeyGeometryIndex::build(&keys).unwrap_err();
    assert!(err.to_string().contains("negative origin"));
}

#[test]
fn bounds_cover_all_keys() {
    let index = KeyGeometryIndex::build(&two_rows()).unwrap();
    assert_eq!(index.bounds(), (500, 160));
    assert_eq!(index.cell_size(), (50, 32));
}

#[test]
fn every_point_sees_its_containing_key() {
    let keys = two_rows();
    let index = KeyGeometryIndex::build(&keys).unwrap();
    for (i, key) in keys.iter().enumerate() {
        for &(x, y) in &[
            (key.x, key.y),
            (key.x + key.width - 1, key.y + key.height - 1),
            key.center(),
        ] {
            assert!(
                index.candidates_at(x, y).contains(&i),
                "key {i} missing from cell at ({x}, {y})"
            );
        }
    }
}

#[test]
fn wide_key_is_found_far_from_its_center() {
    let keys = vec![
        Key::new(0, 0, 50, 50, 1),
        Key::new(50, 0, 450, 50, 32),
    ];
    let index = KeyGeometryIndex::build(&keys).unwrap();
    assert!(index.candidates_at(495, 10).contains(&1));
}

#[test]
fn outside_bounds_has_no_candidates() {
    let index = KeyGeometryIndex::build(&two_rows()).unwrap();
    assert!(index.candidates_at(-1, 10).is_empty());
    assert!(index.candidates_at(10, -1).is_empty());
    assert!(index.candidates_at(500, 10).is_empty());
    assert!(index.candidates_at(10, 160).is_empty());
}

#[test]
fn neighbors_start_with_self_and_are_distance_ordered() {
    let keys = two_rows();
    let index = KeyGeometryIndex::build(&keys).unwrap();
    let near = index.neighbors(6);
    assert_eq!(near[0], 6);
    let (cx, cy) = keys[6].center();
    let dists: Vec<i64> = near[1..]
        .iter()
        .map(|&j| keys[j].squared_distance_from(cx, cy))
        .collect();
    assert!(dists.windows(2).all(|w| w[0] <= w[1]));
    // direct left/right/up neighbors are all present
    for j in [5, 7, 1] {
        assert!(near.contains(&j), "missing neighbor {j}");
    }
}

#[test]
fn out_of_range_lookups_are_empty() {
    let index = KeyGeometryIndex::build(&two_rows()).unwrap();
    assert!(index.key(10).is_none());
    assert!(index.key(usize::MAX).is_none());
    assert!(index.neighbors(42).is_empty());
}

#[test]
fn code_for_falls_back_to_tap() {
    let key = Key::new(0, 0, 10, 10, 97)
        .with_binding(KeyBinding::new(GestureKind::SwipeUp, 65))
        .with_binding(KeyBinding::new(GestureKind::SwipeUp, 66));
    assert_eq!(key.code_for(GestureKind::SwipeUp), 66);
    assert_eq!(key.code_for(GestureKind::LongPress), 97);
    assert_eq!(key.bindings.len(), 1);
}

#[test]
fn containment_is_half_open() {
    let key = Key::new(10, 10, 20, 20, 1);
    assert!(key.is_inside(10, 10));
    assert!(key.is_inside(29, 29));
    assert!(!key.is_inside(30, 15));
    assert!(!key.is_inside(15, 30));
}

#[test]
fn layout_from_toml() {
    let toml = r#"
name = "mini"

[[keys]]
x = 0
y = 0
width = 100
height = 80
code = 97
label = "a"

[[keys.bindings]]
gesture = "swipe_up"
code = 49

[[keys]]
x = 100
y = 0
width = 100
height = 80
gap = 4
code = -1
shift = true
sticky = true
"#;
    let layout = KeyboardLayout::from_toml(toml).unwrap();
    assert_eq!(layout.name.as_deref(), Some("mini"));
    assert_eq!(layout.keys.len(), 2);
    assert_eq!(layout.keys[0].code_for(GestureKind::SwipeUp), 49);
    assert!(layout.keys[1].shift && layout.keys[1].sticky);
    assert_eq!(layout.keys[1].gap, 4);
    let index = KeyGeometryIndex::from_provider(&layout).unwrap();
    assert_eq!(index.len(), 2);
}

#[test]
fn layout_parse_error() {
    let err = KeyboardLayout::from_toml("keys = 3").unwrap_err();
    assert!(matches!(err, GeometryError::Parse(_)));
}
