//! Collision resolution strategies.
//!
//! A strategy decides which buckets a lookup visits after the home bucket, and which table
//! capacities make that sequence visit every bucket:
//!
//! | strategy | offset for attempt `x` | capacity rule |
//! | --- | --- | --- |
//! | [`Linear`] | `17 * x` | `gcd(capacity, 17) == 1` |
//! | [`Quadratic`] | `(x² + x) / 2` | power of two |
//! | [`DoubleHashing`] | `x * stride(key)` | prime |
//!
//! Strategies are zero-sized markers chosen at compile time. Anything a strategy needs per
//! lookup is returned from [`Probing::setup`] and threaded back into [`Probing::probe`].

use crate::hashing::{hash_code, normalize_index, SecondaryHash};
use core::hash::BuildHasher;

/// Probing discipline for keys of type `K`.
pub trait Probing<K: ?Sized> {
    /// Short label used in logs.
    const NAME: &'static str;

    /// Per-lookup precomputation.
    type State: Copy;

    fn setup<S: BuildHasher>(key: &K, build: &S, capacity: usize) -> Self::State;

    /// Offset from the home bucket for attempt `x` (`x >= 1`), reduced modulo `capacity`.
    fn probe(state: Self::State, x: usize, capacity: usize) -> usize;

    /// Smallest capacity `>= capacity` for which the probe sequence reaches every bucket.
    fn adjust_capacity(capacity: usize) -> usize;

    /// Capacity to grow to on resize, before [`Probing::adjust_capacity`] is applied.
    fn increase_capacity(capacity: usize) -> usize {
        capacity.saturating_mul(2).saturating_add(1)
    }
}

/// Fixed-stride probing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Linear {
    /// Stride between consecutive probes. Any positive constant works once the capacity is
    /// coprime with it.
    pub const STRIDE: usize = 17;
}

impl<K: ?Sized> Probing<K> for Linear {
    const NAME: &'static str = "linear";
    type State = ();

    #[inline]
    fn setup<S: BuildHasher>(_key: &K, _build: &S, _capacity: usize) {}

    #[inline]
    fn probe(_state: (), x: usize, capacity: usize) -> usize {
        mul_mod(Self::STRIDE, x, capacity)
    }

    fn adjust_capacity(mut capacity: usize) -> usize {
        while gcd(Self::STRIDE, capacity) != 1 {
            capacity += 1;
        }
        capacity
    }
}

/// Triangular-number probing over a power-of-two table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadratic;

impl<K: ?Sized> Probing<K> for Quadratic {
    const NAME: &'static str = "quadratic";
    type State = ();

    #[inline]
    fn setup<S: BuildHasher>(_key: &K, _build: &S, _capacity: usize) {}

    #[inline]
    fn probe(_state: (), x: usize, capacity: usize) -> usize {
        let x = x as u128;
        ((x * x + x) / 2 % capacity as u128) as usize
    }

    fn adjust_capacity(capacity: usize) -> usize {
        capacity.max(1).next_power_of_two()
    }

    /// Next power of two strictly above `capacity`.
    fn increase_capacity(capacity: usize) -> usize {
        capacity.saturating_add(1).next_power_of_two()
    }
}

/// Probing with a key-dependent stride taken from the key's [`SecondaryHash`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleHashing;

impl<K: ?Sized + SecondaryHash> Probing<K> for DoubleHashing {
    const NAME: &'static str = "double-hashing";
    /// The stride, in `[1, capacity)`.
    type State = usize;

    fn setup<S: BuildHasher>(key: &K, build: &S, capacity: usize) -> usize {
        let stride = normalize_index(hash_code(build, &key.secondary_hash()), capacity);
        // A zero stride would never leave the home bucket.
        stride.max(1)
    }

    #[inline]
    fn probe(stride: usize, x: usize, capacity: usize) -> usize {
        mul_mod(stride, x, capacity)
    }

    fn adjust_capacity(capacity: usize) -> usize {
        next_prime(capacity)
    }
}

#[inline]
fn mul_mod(a: usize, b: usize, m: usize) -> usize {
    (a as u128 * b as u128 % m as u128) as usize
}

/// Greatest common divisor.
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Primality by trial division.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime `>= n`.
pub fn next_prime(mut n: usize) -> usize {
    while !is_prime(n) {
        n += 1;
    }
    n
}
