//! OpenAddressingMap: single-array hash map with tombstone deletion and pluggable probing.

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::hashing::{hash_code, normalize_index};
use crate::probing::{DoubleHashing, Linear, Probing, Quadratic};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use rustc_hash::FxBuildHasher;

/// State of one bucket.
#[derive(Debug)]
pub(crate) enum Slot<K, V> {
    /// Never used since the last resize or clear.
    Empty,
    /// Held an entry that was removed; probe walks continue past it.
    Tombstone,
    Occupied(K, V),
}

impl<K, V> Slot<K, V> {
    #[inline]
    fn occupied(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    #[inline]
    fn occupied_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    #[inline]
    fn into_occupied(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }
}

/// Outcome of walking a key's probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// The key lives at `index`; `tombstone` is the first tombstone passed on the way there.
    Found {
        index: usize,
        tombstone: Option<usize>,
    },
    /// The key is absent; the walk stopped at the empty bucket `index`.
    Vacant {
        index: usize,
        tombstone: Option<usize>,
    },
}

/// Hash map storing every entry directly in one bucket array.
///
/// Collisions are resolved by the probing strategy `P`: [`Linear`], [`Quadratic`] or
/// [`DoubleHashing`]. Removal leaves a tombstone that is reclaimed either when a later lookup
/// moves an entry found behind it into its place, or when the table is rebuilt on growth.
///
/// Lookups that may relocate an entry (`get`, `get_mut`, `contains_key`) take `&mut self`;
/// [`OpenAddressingMap::peek`] is the read-only alternative.
///
/// ```
/// use probing_hashmap::QuadraticProbingMap;
///
/// let mut m: QuadraticProbingMap<&str, i32> = QuadraticProbingMap::new();
/// assert_eq!(m.insert("a", 1)?, None);
/// assert_eq!(m.insert("a", 2)?, Some(1));
/// assert_eq!(m.get("a")?, Some(&2));
/// assert_eq!(m.remove("a")?, Some(2));
/// assert!(m.is_empty());
/// # Ok::<(), probing_hashmap::Error>(())
/// ```
pub struct OpenAddressingMap<K, V, P, S = FxBuildHasher> {
    hasher: S,
    pub(crate) slots: Box<[Slot<K, V>]>,
    load_factor: f64,
    threshold: usize,
    // Occupied plus tombstoned buckets.
    used_buckets: usize,
    key_count: usize,
    _probing: PhantomData<fn() -> P>,
}

pub type LinearProbingMap<K, V, S = FxBuildHasher> = OpenAddressingMap<K, V, Linear, S>;
pub type QuadraticProbingMap<K, V, S = FxBuildHasher> = OpenAddressingMap<K, V, Quadratic, S>;
pub type DoubleHashingMap<K, V, S = FxBuildHasher> = OpenAddressingMap<K, V, DoubleHashing, S>;

fn empty_slots<K, V>(capacity: usize) -> Box<[Slot<K, V>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

impl<K, V, P> OpenAddressingMap<K, V, P>
where
    K: Eq + Hash,
    P: Probing<K>,
{
    pub fn new() -> Self {
        Self::with_hasher(FxBuildHasher)
    }

    /// Map with room for at least `capacity` buckets and the default load factor.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_valid_config(Config::new().capacity(capacity), FxBuildHasher)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_hasher(config, FxBuildHasher)
    }
}

impl<K, V, P> Default for OpenAddressingMap<K, V, P>
where
    K: Eq + Hash,
    P: Probing<K>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over immutable entries in physical bucket order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.it.find_map(Slot::occupied)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over mutable entries in physical bucket order.
pub struct IterMut<'a, K, V> {
    it: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.it.find_map(Slot::occupied_mut)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// Owning iterator in physical bucket order.
pub struct IntoIter<K, V> {
    it: std::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.it.find_map(Slot::into_occupied)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// Iterator over keys in physical bucket order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over values in physical bucket order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V, P, S> OpenAddressingMap<K, V, P, S>
where
    K: Eq + Hash,
    P: Probing<K>,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_valid_config(Config::default(), hasher)
    }

    /// Fails with a configuration error if the load factor is not finite and positive.
    pub fn with_config_and_hasher(config: Config, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config, hasher))
    }

    fn from_valid_config(config: Config, hasher: S) -> Self {
        let capacity = P::adjust_capacity(config.min_capacity());
        let threshold = config::threshold(capacity, config.load_factor);
        log::debug!(
            "new {} map: capacity={capacity} load_factor={} threshold={threshold}",
            P::NAME,
            config.load_factor,
        );
        Self {
            hasher,
            slots: empty_slots(capacity),
            load_factor: config.load_factor,
            threshold,
            used_buckets: 0,
            key_count: 0,
            _probing: PhantomData,
        }
    }

    /// Empties every bucket. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = Slot::Empty);
        self.used_buckets = 0;
        self.key_count = 0;
    }

    /// Walks the probe sequence of `key` over `capacity` buckets, calling `visit` on each
    /// bucket index until it returns `Some`.
    fn probe_walk<Q, T>(
        &self,
        key: &Q,
        capacity: usize,
        mut visit: impl FnMut(usize) -> Option<T>,
    ) -> Result<T>
    where
        Q: ?Sized + Hash,
        P: Probing<Q>,
    {
        let state = <P as Probing<Q>>::setup(key, &self.hasher, capacity);
        let home = normalize_index(hash_code(&self.hasher, key), capacity);
        let mut i = home;
        for x in 1..=capacity {
            if let Some(found) = visit(i) {
                return Ok(found);
            }
            i = (home + <P as Probing<Q>>::probe(state, x, capacity)) % capacity;
        }
        log::error!(
            "{} probe walk exhausted {capacity} buckets (len={}, used={})",
            <P as Probing<Q>>::NAME,
            self.key_count,
            self.used_buckets,
        );
        Err(Error::InvariantViolation {
            attempts: capacity,
            capacity,
        })
    }

    pub(crate) fn lookup<Q>(&self, key: &Q) -> Result<Lookup>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: Probing<Q>,
    {
        let mut tombstone = None;
        self.probe_walk(key, self.capacity(), |index| match &self.slots[index] {
            Slot::Empty => Some(Lookup::Vacant { index, tombstone }),
            Slot::Tombstone => {
                tombstone.get_or_insert(index);
                None
            }
            Slot::Occupied(k, _) if <K as Borrow<Q>>::borrow(k) == key => {
                Some(Lookup::Found { index, tombstone })
            }
            Slot::Occupied(..) => None,
        })
    }

    /// Moves the entry at `index` into the earlier tombstone, if any, leaving a tombstone
    /// behind. Returns the entry's new index.
    fn relocate(&mut self, index: usize, tombstone: Option<usize>) -> usize {
        match tombstone {
            Some(t) => {
                log::trace!("{} relocating bucket {index} -> {t}", P::NAME);
                self.slots.swap(index, t);
                t
            }
            None => index,
        }
    }

    fn value_at(&self, index: usize) -> &V {
        match &self.slots[index] {
            Slot::Occupied(_, v) => v,
            _ => unreachable!("bucket {index} is not occupied"),
        }
    }

    fn value_at_mut(&mut self, index: usize) -> &mut V {
        match &mut self.slots[index] {
            Slot::Occupied(_, v) => v,
            _ => unreachable!("bucket {index} is not occupied"),
        }
    }

    /// Inserts or updates `key`, returning the previous value.
    ///
    /// Grows the table first once the used buckets reach the threshold. When the key already
    /// exists in place, the stored key is kept and only the value is replaced. When the entry
    /// is found behind a tombstone, it moves into that tombstone holding the given key.
    ///
    /// A failed growth leaves the map untouched. If the growth succeeds but the walk in the
    /// grown table then fails, the grown table is kept; only a strategy whose capacity rule
    /// does not cover every bucket gets there.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if self.used_buckets >= self.threshold {
            self.resize()?;
        }
        match self.lookup(&key)? {
            Lookup::Found { index, tombstone } => {
                let index = self.relocate(index, tombstone);
                match &mut self.slots[index] {
                    Slot::Occupied(k, v) => {
                        if tombstone.is_some() {
                            *k = key;
                        }
                        Ok(Some(core::mem::replace(v, value)))
                    }
                    _ => unreachable!("bucket {index} is not occupied"),
                }
            }
            Lookup::Vacant { index, tombstone } => {
                match tombstone {
                    Some(t) => self.slots[t] = Slot::Occupied(key, value),
                    None => {
                        self.slots[index] = Slot::Occupied(key, value);
                        self.used_buckets += 1;
                    }
                }
                self.key_count += 1;
                Ok(None)
            }
        }
    }

    /// Same as [`OpenAddressingMap::insert`].
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.insert(key, value)
    }

    /// Same as [`OpenAddressingMap::insert`].
    #[inline]
    pub fn add(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.insert(key, value)
    }

    /// Returns the value for `key`, moving the entry into the first tombstone on its probe
    /// path so the next lookup is shorter.
    pub fn get<Q>(&mut self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: Probing<Q>,
    {
        match self.lookup(key)? {
            Lookup::Found { index, tombstone } => {
                let index = self.relocate(index, tombstone);
                Ok(Some(self.value_at(index)))
            }
            Lookup::Vacant { .. } => Ok(None),
        }
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: Probing<Q>,
    {
        match self.lookup(key)? {
            Lookup::Found { index, tombstone } => {
                let index = self.relocate(index, tombstone);
                Ok(Some(self.value_at_mut(index)))
            }
            Lookup::Vacant { .. } => Ok(None),
        }
    }

    /// Looks up `key` without touching the layout.
    pub fn peek<Q>(&self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: Probing<Q>,
    {
        match self.lookup(key)? {
            Lookup::Found { index, .. } => Ok(Some(self.value_at(index))),
            Lookup::Vacant { .. } => Ok(None),
        }
    }

    /// Whether `key` is present. Relocates like [`OpenAddressingMap::get`].
    pub fn contains_key<Q>(&mut self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: Probing<Q>,
    {
        match self.lookup(key)? {
            Lookup::Found { index, tombstone } => {
                self.relocate(index, tombstone);
                Ok(true)
            }
            Lookup::Vacant { .. } => Ok(false),
        }
    }

    /// Same as [`OpenAddressingMap::contains_key`].
    #[inline]
    pub fn has_key<Q>(&mut self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: Probing<Q>,
    {
        self.contains_key(key)
    }

    /// Removes `key` and returns its value. The bucket becomes a tombstone.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        P: Probing<Q>,
    {
        match self.lookup(key)? {
            Lookup::Found { index, .. } => {
                let removed = core::mem::replace(&mut self.slots[index], Slot::Tombstone);
                self.key_count -= 1;
                Ok(removed.into_occupied().map(|(_, v)| v))
            }
            Lookup::Vacant { .. } => Ok(None),
        }
    }

    /// Grows the table and reinserts every live entry into fresh buckets, dropping tombstones.
    ///
    /// Placements are computed before any entry moves, so a failure leaves the map untouched.
    fn resize(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let capacity = P::adjust_capacity(P::increase_capacity(old_capacity));

        // Reinsertion into an empty table of distinct keys stops at the first free bucket.
        let mut taken = vec![false; capacity];
        let mut targets = Vec::with_capacity(self.key_count);
        for (k, _) in self.slots.iter().filter_map(Slot::occupied) {
            let target = self.probe_walk(k, capacity, |i| (!taken[i]).then_some(i))?;
            taken[target] = true;
            targets.push(target);
        }

        let mut fresh = empty_slots(capacity);
        let old = core::mem::take(&mut self.slots).into_vec();
        let live = old.into_iter().filter_map(Slot::into_occupied);
        for ((k, v), target) in live.zip(targets) {
            fresh[target] = Slot::Occupied(k, v);
        }

        log::trace!(
            "{} resize {old_capacity} -> {capacity}: {} keys kept, {} tombstones dropped",
            P::NAME,
            self.key_count,
            self.used_buckets - self.key_count,
        );
        self.slots = fresh;
        self.threshold = config::threshold(capacity, self.load_factor);
        self.used_buckets = self.key_count;
        Ok(())
    }
}

impl<K, V, P, S> OpenAddressingMap<K, V, P, S> {
    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Used-bucket count at which the next insert grows the table.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Buckets holding a live entry or a tombstone.
    pub fn used_buckets(&self) -> usize {
        self.used_buckets
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
            remaining: self.key_count,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
            remaining: self.key_count,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<'a, K, V, P, S> IntoIterator for &'a OpenAddressingMap<K, V, P, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, P, S> IntoIterator for &'a mut OpenAddressingMap<K, V, P, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, P, S> IntoIterator for OpenAddressingMap<K, V, P, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.slots.into_vec().into_iter(),
            remaining: self.key_count,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, P, S> fmt::Debug for OpenAddressingMap<K, V, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
