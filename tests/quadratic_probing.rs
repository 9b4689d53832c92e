use hashbrown::HashMap;
use probing_hashmap::{Config, QuadraticProbingMap};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[test]
fn update_value() {
    let mut map: QuadraticProbingMap<i32, i32> = QuadraticProbingMap::new();
    map.add(1, 1).unwrap();
    assert_eq!(map.get(&1).unwrap(), Some(&1));
    map.add(1, 5).unwrap();
    assert_eq!(map.get(&1).unwrap(), Some(&5));
    map.add(1, -7).unwrap();
    assert_eq!(map.get(&1).unwrap(), Some(&-7));
    assert_eq!(map.len(), 1);
}

// As the table grows its capacity remains a power of two.
#[test]
fn table_size() {
    for sz in 1..=32 {
        let mut map: QuadraticProbingMap<i32, i32> = QuadraticProbingMap::with_capacity(sz);
        for i in 0..1000 {
            let c = map.capacity();
            assert_eq!(c & (c - 1), 0, "capacity {c} after {i} inserts");
            map.add(i, i).unwrap();
        }
        assert_eq!(map.len(), 1000);
    }
}

#[test]
fn iterator() {
    let nums: Vec<i32> = (0..40).map(|i| (i * 37) % 11 - 5).collect();
    let mut map: QuadraticProbingMap<i32, i32> = QuadraticProbingMap::new();
    let mut model: HashMap<i32, i32> = HashMap::new();
    for &n in &nums {
        assert_eq!(map.add(n, n).unwrap(), model.insert(n, n));
    }

    let keys: Vec<i32> = map.keys().copied().collect();
    for k in &keys {
        assert_eq!(map.get(k).unwrap(), Some(k));
        assert_eq!(map.get(k).unwrap(), model.get(k));
        assert!(map.has_key(k).unwrap());
        assert!(nums.contains(k));
    }
    for k in model.keys() {
        assert_eq!(map.peek(k).unwrap(), Some(k));
    }

    let unique: BTreeSet<i32> = nums.iter().copied().collect();
    assert_eq!(unique.len(), map.keys().len());
    assert_eq!(model.len(), map.values().count());
}

#[test]
fn remove() {
    let mut map: QuadraticProbingMap<i32, i32> = QuadraticProbingMap::new();

    map.put(11, 0).unwrap();
    map.put(12, 0).unwrap();
    map.put(13, 0).unwrap();
    assert_eq!(map.len(), 3);

    for i in 1..=10 {
        map.put(i, 0).unwrap();
    }
    assert_eq!(map.len(), 13);

    for i in 1..=10 {
        map.remove(&i).unwrap();
    }
    assert_eq!(map.len(), 3);

    map.remove(&11).unwrap();
    map.remove(&12).unwrap();
    map.remove(&13).unwrap();
    assert_eq!(map.len(), 0);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Record {
    field: i32,
}

#[test]
fn complex_remove() {
    let mut map: QuadraticProbingMap<Record, i32> = QuadraticProbingMap::new();
    let records: Vec<Record> = (1..=4).map(|field| Record { field }).collect();
    for r in &records {
        map.add(r.clone(), 111).unwrap();
    }

    for i in [1, 2, 0, 3] {
        assert_eq!(map.remove(&records[i]).unwrap(), Some(111));
    }
    assert_eq!(map.len(), 0);
    assert!(map.iter().next().is_none());
}

#[test]
fn illegal_creation() {
    for raw in [(-3i64, 0.5), (5, f64::INFINITY), (6, -0.5)] {
        let err = Config::try_from(raw)
            .and_then(QuadraticProbingMap::<i32, i32>::with_config)
            .unwrap_err();
        assert!(err.is_configuration(), "{raw:?}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 50, .. ProptestConfig::default() })]

    #[test]
    fn prop_remove_random(values in proptest::collection::vec(-10i32..=10, 1..30)) {
        let mut map: QuadraticProbingMap<i32, i32> = QuadraticProbingMap::new();
        let distinct: BTreeSet<i32> = values.iter().copied().collect();
        for v in values {
            map.put(v, 5).unwrap();
        }
        prop_assert_eq!(map.len(), distinct.len());

        let keys: Vec<i32> = map.keys().copied().collect();
        for k in keys {
            map.remove(&k).unwrap();
        }
        prop_assert!(map.is_empty());
    }

    #[test]
    fn prop_random_map_operation(
        keys in proptest::collection::vec(-10i32..=10, 1..30),
        p_add in 0.0f64..1.0,
        p_remove in 0.0f64..1.0,
        rolls in proptest::collection::vec(0.0f64..1.0, 30),
    ) {
        let mut map: QuadraticProbingMap<i32, usize> = QuadraticProbingMap::new();
        let mut model: HashMap<i32, usize> = HashMap::new();
        for (i, (k, r)) in keys.into_iter().zip(rolls).enumerate() {
            if r < p_add {
                prop_assert_eq!(map.add(k, i).unwrap(), model.insert(k, i));
            }
            prop_assert_eq!(map.get(&k).unwrap(), model.get(&k));
            prop_assert_eq!(map.contains_key(&k).unwrap(), model.contains_key(&k));
            prop_assert_eq!(map.len(), model.len());

            if r > p_remove {
                prop_assert_eq!(map.remove(&k).unwrap(), model.remove(&k));
            }
            prop_assert_eq!(map.get(&k).unwrap(), model.get(&k));
            prop_assert_eq!(map.contains_key(&k).unwrap(), model.contains_key(&k));
            prop_assert_eq!(map.len(), model.len());
        }
    }

    #[test]
    fn prop_random_iterator(
        sz in 1usize..30,
        ops in proptest::collection::vec((0i32..30, -30i32..30, any::<bool>()), 1..60),
    ) {
        let mut map: QuadraticProbingMap<i32, Vec<i32>> = QuadraticProbingMap::with_capacity(sz);
        let mut model: HashMap<i32, Vec<i32>> = HashMap::new();
        for (k, v, drop_value) in ops {
            if map.get(&k).unwrap().is_none() {
                map.put(k, Vec::new()).unwrap();
            }
            let l1 = map.get_mut(&k).unwrap().unwrap();
            let l2 = model.entry(k).or_default();
            if drop_value {
                l1.retain(|x| *x != v);
                l2.retain(|x| *x != v);
            } else {
                l1.push(v);
                l2.push(v);
            }
            prop_assert_eq!(&*l1, &*l2);
            prop_assert_eq!(map.len(), model.len());
            let c = map.capacity();
            prop_assert_eq!(c & (c - 1), 0);
        }
    }
}
