//! probing-hashmap: a single-threaded open-addressing hash map with
//! interchangeable collision resolution.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one mutation/query protocol shared by three probing
//!   disciplines, each with the capacity rule that makes its probe
//!   sequence visit every bucket.
//! - Layers:
//!   - `hashing`: `hash_code` and `normalize_index` turn a key into a home
//!     bucket; `SecondaryHash` / `Secondary<K>` express keys identified
//!     by an independent integer hash.
//!   - `probing`: the `Probing<K>` trait and its three markers, `Linear`
//!     (stride 17, capacity coprime with 17), `Quadratic` (triangular
//!     numbers, power-of-two capacity) and `DoubleHashing` (stride from
//!     the secondary hash, prime capacity).
//!   - `OpenAddressingMap<K, V, P, S>`: bucket array of
//!     `Empty | Tombstone | Occupied(K, V)`, counters, insert / lookup /
//!     remove / resize / iterate.
//!
//! Constraints
//! - Single-threaded and synchronous; every call is bounded by the
//!   table capacity.
//! - `len <= used_buckets <= capacity`, where `used_buckets` counts live
//!   entries plus tombstones.
//! - Every live entry is reached by its probe sequence before any empty
//!   bucket.
//! - At least one bucket is always empty: the resize threshold is
//!   clamped below the capacity, so every probe walk can terminate.
//!
//! Deletion and relocation
//! - `remove` leaves a tombstone; the slot is not reused in place.
//! - A lookup that finds its key after passing a tombstone swaps the
//!   entry into the first tombstone it saw. This is why `get`,
//!   `get_mut` and `contains_key` take `&mut self`; `peek` looks up
//!   without moving anything.
//! - Growth rebuilds the bucket array from live entries only, dropping
//!   all tombstones.
//!
//! Failure model
//! - Invalid load factors (and negative raw capacities) are
//!   configuration errors at construction.
//! - A probe walk that visits `capacity` buckets without resolving
//!   returns `Error::InvariantViolation` before any bucket is written.
//!   It only happens with a strategy whose capacity rule is wrong.
//!
//! Notes and non-goals
//! - Iteration order is physical bucket order, not insertion order.
//! - The default hasher is `rustc_hash::FxBuildHasher`, which is
//!   deterministic and not DoS-resistant.
//! - No internal synchronization; share across threads only behind a lock.

pub mod config;
pub mod error;
pub mod hashing;
pub mod map;
mod map_proptest;
pub mod probing;

// Public surface
pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::{Error, Result};
pub use hashing::{Secondary, SecondaryHash};
pub use map::{DoubleHashingMap, LinearProbingMap, OpenAddressingMap, QuadraticProbingMap};
pub use probing::{DoubleHashing, Linear, Probing, Quadratic};
