use probing_hashmap::{Config, Error, Linear, LinearProbingMap};

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[test]
fn update_value() {
    let mut map: LinearProbingMap<String, i32> = LinearProbingMap::new();
    assert_eq!(map.insert("one".to_string(), 1).unwrap(), None);
    assert_eq!(map.insert("one".to_string(), 5).unwrap(), Some(1));
    assert_eq!(map.get("one").unwrap(), Some(&5));
    assert_eq!(map.len(), 1);
}

#[test]
fn capacity_is_coprime_with_stride() {
    for sz in [0usize, 7, 16, 17, 33, 34, 50, 51] {
        let mut map: LinearProbingMap<u64, u64> = LinearProbingMap::with_capacity(sz);
        assert!(map.capacity() >= sz.max(7));
        for i in 0..500 {
            assert_eq!(gcd(map.capacity(), Linear::STRIDE), 1, "capacity {}", map.capacity());
            map.insert(i, i * 2).unwrap();
        }
        for i in 0..500 {
            assert_eq!(map.peek(&i).unwrap(), Some(&(i * 2)));
        }
    }
}

#[test]
fn remove_of_absent_key_changes_nothing() {
    let mut map: LinearProbingMap<u32, u32> = LinearProbingMap::new();
    map.insert(1, 1).unwrap();
    assert_eq!(map.remove(&2).unwrap(), None);
    assert_eq!(map.len(), 1);
    assert_eq!(map.remove(&1).unwrap(), Some(1));
    assert_eq!(map.remove(&1).unwrap(), None);
    assert!(map.is_empty());
    assert_eq!(map.get(&1).unwrap(), None);
}

#[test]
fn clear_then_reuse() {
    let mut map: LinearProbingMap<u32, u32> = LinearProbingMap::new();
    for i in 0..100 {
        map.insert(i, i).unwrap();
    }
    let capacity = map.capacity();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.capacity(), capacity);
    assert_eq!(map.keys().count(), 0);
    for i in 0..100 {
        assert_eq!(map.insert(i, i + 1).unwrap(), None);
    }
    assert_eq!(map.len(), 100);
}

#[test]
fn stored_empty_value_is_not_absence() {
    let mut map: LinearProbingMap<&str, Option<u8>> = LinearProbingMap::new();
    map.insert("none", None).unwrap();
    assert_eq!(map.get("none").unwrap(), Some(&None));
    assert_eq!(map.get("missing").unwrap(), None);
    assert!(map.contains_key("none").unwrap());
}

#[test]
fn illegal_creation() {
    assert_eq!(
        Config::try_from((-3i64, 0.5)).unwrap_err(),
        Error::InvalidCapacity(-3)
    );
    let infinite = Config::new().capacity(5).load_factor(f64::INFINITY);
    assert!(matches!(
        LinearProbingMap::<u32, u32>::with_config(infinite),
        Err(Error::InvalidLoadFactor(_))
    ));
    assert!(matches!(
        LinearProbingMap::<u32, u32>::with_config(Config::new().capacity(6).load_factor(-0.5)),
        Err(Error::InvalidLoadFactor(_))
    ));
}

#[test]
fn debug_output_lists_entries() {
    let mut map: LinearProbingMap<u32, &str> = LinearProbingMap::new();
    assert_eq!(format!("{map:?}"), "{}");
    map.insert(3, "three").unwrap();
    assert_eq!(format!("{map:?}"), r#"{3: "three"}"#);
}
