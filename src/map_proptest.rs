#![cfg(test)]

// Property tests for OpenAddressingMap kept inside the crate so they can
// inspect the bucket array and counters directly.

use crate::map::{Lookup, OpenAddressingMap, Slot};
use crate::probing::{gcd, is_prime, DoubleHashing, Linear, Probing, Quadratic};
use crate::Config;
use hashbrown::HashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeSet;
use std::hash::{BuildHasher, Hasher};

// Keys come from a small range so probe sequences collide and tombstones
// pile up between resizes.
#[derive(Clone, Debug)]
enum Op {
    Insert(i32, i32),
    Remove(i32),
    Get(i32),
    Peek(i32),
    Contains(i32),
    Mutate(i32, i32),
    Clear,
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = -12i32..12;
    let op = prop_oneof![
        4 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        2 => key.clone().prop_map(Op::Get),
        1 => key.clone().prop_map(Op::Peek),
        2 => key.clone().prop_map(Op::Contains),
        1 => (key, any::<i32>()).prop_map(|(k, d)| Op::Mutate(k, d)),
        1 => Just(Op::Clear),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..120)
}

// Layout invariants that must hold between any two operations:
// - `len` equals the occupied buckets and `used_buckets` equals occupied plus tombstones.
// - At least one bucket is empty.
// - The capacity satisfies the strategy's rule.
// - Each live key's own probe walk stops at the bucket holding it.
fn check_layout<P, S>(
    sut: &OpenAddressingMap<i32, i32, P, S>,
    capacity_ok: fn(usize) -> bool,
) -> Result<(), TestCaseError>
where
    P: Probing<i32>,
    S: BuildHasher,
{
    let occupied = sut.slots.iter().filter(|s| matches!(s, Slot::Occupied(..))).count();
    let tombstones = sut.slots.iter().filter(|s| matches!(s, Slot::Tombstone)).count();
    prop_assert_eq!(sut.len(), occupied);
    prop_assert_eq!(sut.used_buckets(), occupied + tombstones);
    prop_assert!(sut.used_buckets() < sut.capacity());
    prop_assert!(capacity_ok(sut.capacity()), "capacity {}", sut.capacity());

    for (i, slot) in sut.slots.iter().enumerate() {
        if let Slot::Occupied(k, _) = slot {
            match sut.lookup(k) {
                Ok(Lookup::Found { index, .. }) => prop_assert_eq!(index, i),
                other => prop_assert!(false, "key {} at {} resolved to {:?}", k, i, other),
            }
        }
    }
    Ok(())
}

// Property: state-machine equivalence against hashbrown::HashMap.
// - insert/remove return the model's previous value.
// - get/peek/contains agree with the model; relocation never changes answers.
// - iteration yields each live pair exactly once.
// - layout invariants hold after every op.
fn run<P, S>(
    mut sut: OpenAddressingMap<i32, i32, P, S>,
    ops: Vec<Op>,
    capacity_ok: fn(usize) -> bool,
) -> Result<(), TestCaseError>
where
    P: Probing<i32>,
    S: BuildHasher,
{
    let mut model: HashMap<i32, i32> = HashMap::new();
    check_layout(&sut, capacity_ok)?;

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let prev = sut.insert(k, v).expect("insert");
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::Remove(k) => {
                let before = sut.len();
                let removed = sut.remove(&k).expect("remove");
                prop_assert_eq!(removed, model.remove(&k));
                let expected = if removed.is_some() { before - 1 } else { before };
                prop_assert_eq!(sut.len(), expected);
                prop_assert_eq!(sut.peek(&k).expect("peek"), None);
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(&k).expect("get"), model.get(&k));
            }
            Op::Peek(k) => {
                prop_assert_eq!(sut.peek(&k).expect("peek"), model.get(&k));
            }
            Op::Contains(k) => {
                prop_assert_eq!(sut.contains_key(&k).expect("contains"), model.contains_key(&k));
            }
            Op::Mutate(k, d) => {
                if let Some(v) = sut.get_mut(&k).expect("get_mut") {
                    *v = v.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(&k) {
                    *v = v.wrapping_add(d);
                }
            }
            Op::Clear => {
                let capacity = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), capacity);
            }
            Op::Iterate => {
                let pairs: Vec<(i32, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(pairs.len(), sut.len());
                let s: BTreeSet<_> = pairs.into_iter().collect();
                let m: BTreeSet<_> = model.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(s, m);
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_layout(&sut, capacity_ok)?;
    }
    Ok(())
}

fn linear_ok(c: usize) -> bool {
    gcd(c, Linear::STRIDE) == 1
}

fn quadratic_ok(c: usize) -> bool {
    c & (c - 1) == 0
}

fn double_hashing_ok(c: usize) -> bool {
    is_prime(c)
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

fn config(capacity: usize, load_factor: f64) -> Config {
    Config::new().capacity(capacity).load_factor(load_factor)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_linear(ops in arb_ops(), cap in 0usize..40, lf in 0.1f64..1.5) {
        let sut = OpenAddressingMap::<i32, i32, Linear>::with_config(config(cap, lf));
        run(sut.unwrap(), ops, linear_ok)?;
    }

    #[test]
    fn prop_quadratic(ops in arb_ops(), cap in 0usize..40, lf in 0.1f64..1.5) {
        let sut = OpenAddressingMap::<i32, i32, Quadratic>::with_config(config(cap, lf));
        run(sut.unwrap(), ops, quadratic_ok)?;
    }

    #[test]
    fn prop_double_hashing(ops in arb_ops(), cap in 0usize..40, lf in 0.1f64..1.5) {
        let sut = OpenAddressingMap::<i32, i32, DoubleHashing>::with_config(config(cap, lf));
        run(sut.unwrap(), ops, double_hashing_ok)?;
    }

    // Same invariants under worst-case collisions: every key shares the home
    // bucket (and, for double hashing, the stride).
    #[test]
    fn prop_linear_with_collisions(ops in arb_ops()) {
        let sut = OpenAddressingMap::<i32, i32, Linear, _>::with_hasher(ConstBuildHasher);
        run(sut, ops, linear_ok)?;
    }

    #[test]
    fn prop_quadratic_with_collisions(ops in arb_ops()) {
        let sut = OpenAddressingMap::<i32, i32, Quadratic, _>::with_hasher(ConstBuildHasher);
        run(sut, ops, quadratic_ok)?;
    }

    #[test]
    fn prop_double_hashing_with_collisions(ops in arb_ops()) {
        let sut = OpenAddressingMap::<i32, i32, DoubleHashing, _>::with_hasher(ConstBuildHasher);
        run(sut, ops, double_hashing_ok)?;
    }
}
