#![cfg(feature = "avl")]
//! Unit tests for AvlTreeMap.

use arbormap::tree::AvlTreeMap;
use rstest::rstest;

fn map_of(keys: impl IntoIterator<Item = i32>) -> AvlTreeMap<i32, i32> {
    keys.into_iter().map(|key| (key, key * 10)).collect()
}

fn assert_every_node_balanced(map: &AvlTreeMap<i32, i32>) {
    if let Some(root) = map.root() {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            assert!(
                node.is_avl_balanced(),
                "node {} has balance factor {}",
                node.key(),
                node.balance_factor()
            );
            stack.extend(node.left());
            stack.extend(node.right());
        }
    }
}

// =============================================================================
// Balance Tests
// =============================================================================

#[rstest]
fn test_increasing_inserts_stay_balanced() {
    let mut map = AvlTreeMap::new();
    for key in 1..=7 {
        map.insert(key, key * 10);
        assert_every_node_balanced(&map);
        assert_eq!(map.validate(), Ok(()));
        if key == 3 {
            assert_eq!(map.root().map(|node| *node.key()), Some(2));
        }
    }
    assert_eq!(map.root().map(|node| *node.key()), Some(4));
    assert_eq!(map.height(), 2);
}

#[rstest]
#[case::ascending((1..=1000).collect())]
#[case::descending((1..=1000).rev().collect())]
#[case::zigzag((0..500).flat_map(|key| [key, 1000 - key]).collect())]
fn test_height_is_logarithmic(#[case] keys: Vec<i32>) {
    let map = map_of(keys);
    // An AVL tree with n nodes is at most 1.44 * log2(n + 2) tall.
    assert!(map.height() <= 14, "height {}", map.height());
    assert_eq!(map.validate(), Ok(()));
}

#[rstest]
fn test_removals_stay_balanced() {
    let mut map = map_of(1..=100);
    for key in (1..=100).step_by(2) {
        assert!(map.remove(&key));
        assert_every_node_balanced(&map);
    }
    assert_eq!(map.len(), 50);
    assert_eq!(map.validate(), Ok(()));
    assert_eq!(
        map.keys().copied().collect::<Vec<_>>(),
        (2..=100).step_by(2).collect::<Vec<_>>()
    );
}

#[rstest]
fn test_remove_with_double_rotation() {
    // Dropping 9 leaves 5 left-heavy through the inner grandchild 4.
    let mut map = map_of([5, 2, 8, 1, 4, 9, 3]);
    assert!(map.remove(&9));
    assert_eq!(map.validate(), Ok(()));
    let root = map.root().unwrap();
    assert_eq!(root.key(), &4);
    assert_eq!(root.left().map(|node| *node.key()), Some(2));
    assert_eq!(root.right().map(|node| *node.key()), Some(5));
}

// =============================================================================
// Map Behavior Tests
// =============================================================================

#[rstest]
fn test_scenario_insert_three_keys() {
    let map = map_of([1, 2, 3]);
    let mut values = Vec::new();
    map.traverse_inorder(|value| values.push(*value));
    assert_eq!(values, vec![10, 20, 30]);
    assert_eq!(map.len(), 3);
}

#[rstest]
fn test_remove_from_three_element_map() {
    let mut map = map_of([1, 2, 3]);
    assert!(map.remove(&3));
    assert_eq!(map.len(), 2);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[rstest]
fn test_remove_absent_key() {
    let mut map = map_of([1, 2, 3]);
    assert!(!map.remove(&99));
    assert_eq!(map.len(), 3);
}

#[rstest]
fn test_insert_duplicate_keeps_value_and_shape() {
    let mut map = map_of(1..=5);
    let height = map.height();
    let node = map.insert(4, 0);
    assert_eq!(node.value(), &40);
    assert_eq!(map.height(), height);
    assert_eq!(map.len(), 5);
}

#[rstest]
fn test_search_returns_node_without_restructuring() {
    let map = map_of(1..=7);
    let node = map.search(&6).unwrap();
    assert_eq!(node.value(), &60);
    assert_eq!(node.parent().map(|parent| *parent.key()), Some(4));
    assert_eq!(map.root().map(|root| *root.key()), Some(4));
}

#[rstest]
fn test_get_mut_and_remove_entry() {
    let mut map = map_of(1..=3);
    *map.get_mut(&2).unwrap() = 0;
    assert_eq!(map.remove_entry(&2), Some((2, 0)));
    assert_eq!(map.remove_entry(&2), None);
    assert!(!map.contains_key(&2));
}

#[rstest]
fn test_level_order_of_perfect_tree() {
    let map = map_of(1..=7);
    let mut values = Vec::new();
    map.traverse_level_order(|value| values.push(*value / 10));
    assert_eq!(values, vec![4, 2, 6, 1, 3, 5, 7]);
}

#[rstest]
fn test_display() {
    let map: AvlTreeMap<i32, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    assert_eq!(format!("{map}"), "{1: a, 2: b, 3: c}");
}
