//! Key hashing and bucket index normalization.
//!
//! A key is either *plain*, identified by its own `Hash + Eq`, or *secondary-hashable*,
//! identified by an independent integer hash. The second kind is spelled
//! [`Secondary<K>`]: it hashes and compares through [`SecondaryHash::secondary_hash`], so
//! two keys that share a secondary hash land in the same bucket and match each other.

use core::hash::{BuildHasher, Hash, Hasher};

/// Deterministic hash of `key` under `build`.
#[inline]
pub fn hash_code<T, S>(build: &S, key: &T) -> u64
where
    T: ?Sized + Hash,
    S: BuildHasher,
{
    build.hash_one(key)
}

/// Maps any hash into `[0, capacity)` by clearing the sign bit and reducing modulo `capacity`.
#[inline]
pub fn normalize_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "capacity must be positive");
    ((hash & (i64::MAX as u64)) % capacity as u64) as usize
}

/// An independent integer hash of a key.
///
/// Double hashing derives its probe stride from it. Wrapped in [`Secondary`], it also
/// becomes the key's identity.
pub trait SecondaryHash {
    fn secondary_hash(&self) -> i64;
}

macro_rules! impl_secondary_hash_for_int {
    ($($t:ty),*) => {
        $(
            impl SecondaryHash for $t {
                #[inline]
                fn secondary_hash(&self) -> i64 {
                    *self as i64
                }
            }
        )*
    };
}

impl_secondary_hash_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: ?Sized + SecondaryHash> SecondaryHash for &T {
    #[inline]
    fn secondary_hash(&self) -> i64 {
        (**self).secondary_hash()
    }
}

/// Key whose identity is its secondary hash.
///
/// `Hash` and `Eq` delegate to [`SecondaryHash::secondary_hash`] of the wrapped value, so the
/// wrapped type itself needs neither.
#[derive(Clone, Copy, Default)]
pub struct Secondary<K>(pub K);

impl<K> Secondary<K> {
    pub fn into_inner(self) -> K {
        self.0
    }
}

impl<K: SecondaryHash> SecondaryHash for Secondary<K> {
    #[inline]
    fn secondary_hash(&self) -> i64 {
        self.0.secondary_hash()
    }
}

impl<K: SecondaryHash> Hash for Secondary<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.secondary_hash().hash(state);
    }
}

impl<K: SecondaryHash> PartialEq for Secondary<K> {
    fn eq(&self, other: &Self) -> bool {
        self.0.secondary_hash() == other.0.secondary_hash()
    }
}

impl<K: SecondaryHash> Eq for Secondary<K> {}

impl<K: core::fmt::Debug> core::fmt::Debug for Secondary<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}
