//! HashTable: open addressing with quadratic probing over a prime-length
//! slot array.
//!
//! Layout
//! - `Inner` owns the slots, the active count and the hasher; it holds all
//!   probing logic and never re-enters itself through the public API.
//! - `HashTable` wraps `Inner` with a debug reentrancy guard so the
//!   caller-supplied hasher cannot observe a half-finished resize or
//!   relocation.
//!
//! Invariants
//! - `capacity()` is prime and never decreases.
//! - `len()` equals the number of `Slot::Occupied` positions.
//! - After every insert, `2 * len() < capacity()`.
//! - Keys are unique among occupied slots.

use crate::error::TableError;
use crate::hash::{home_slot, FoldHasher, KeyHasher};
use crate::prime::next_prime;
use crate::reentrancy::DebugReentrancy;
use crate::slot::{Entry, Slot};
use core::fmt;
use log::{debug, trace, warn};

/// Outcome of an insertion probe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Probe {
    /// Occupied slot already holding the key.
    Found(usize),
    /// Where a new entry goes: the first tombstone on the path, else the
    /// empty slot that ended it.
    Vacant(usize),
}

impl Probe {
    fn index(self) -> usize {
        match self {
            Probe::Found(i) | Probe::Vacant(i) => i,
        }
    }
}

/// `i`-th position of the quadratic probe sequence starting at `home`.
#[inline]
fn probe_index(home: usize, i: usize, capacity: usize) -> usize {
    let cap = capacity as u64;
    let step = (i as u64 % cap) * (i as u64 % cap) % cap;
    ((home as u64 + step) % cap) as usize
}

/// Whether `removed` lies on the circular stretch `[home, current)`.
///
/// An entry sitting at `current` with home `home` qualifies for relocation
/// after a removal at `removed` exactly when this holds.
pub(crate) fn spans_removed(home: usize, removed: usize, current: usize) -> bool {
    if current > home {
        home <= removed && removed < current
    } else if current < home {
        removed >= home || removed < current
    } else {
        false
    }
}

/// First empty slot on the quadratic path from `home` in a tombstone-free
/// array. A freshly grown array is under a quarter full, so the quadratic
/// path always reaches one; the linear scan only keeps this total.
fn first_empty<V>(slots: &[Slot<V>], home: usize) -> usize {
    let capacity = slots.len();
    let quadratic = (0..capacity)
        .map(|i| probe_index(home, i, capacity))
        .find(|&index| slots[index].is_empty());
    debug_assert!(quadratic.is_some(), "no empty slot on the path from {home}");
    quadratic
        .or_else(|| slots.iter().position(Slot::is_empty))
        .unwrap_or(home)
}

struct Inner<V, H> {
    slots: Box<[Slot<V>]>,
    len: usize,
    hasher: H,
}

impl<V, H: KeyHasher> Inner<V, H> {
    fn with_capacity(capacity: usize, hasher: H) -> Self {
        Self {
            slots: Slot::empty_array(next_prime(capacity)),
            len: 0,
            hasher,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn home(&self, key: &str) -> usize {
        home_slot(&self.hasher, key, self.capacity())
    }

    /// Read-only probe. Stops at the first empty slot; skips tombstones and
    /// other keys.
    fn find_index(&self, key: &str) -> Option<usize> {
        let capacity = self.capacity();
        let home = self.home(key);
        for i in 0..capacity {
            let index = probe_index(home, i, capacity);
            match &self.slots[index] {
                Slot::Empty => return None,
                slot if slot.holds(key) => return Some(index),
                _ => {}
            }
        }
        warn!(
            "search probe for {:?} exhausted {} slots without reaching an empty slot; reporting not found",
            key, capacity
        );
        None
    }

    /// Insertion probe. Does not touch any slot.
    fn probe_for_insert(&self, key: &str) -> Result<Probe, TableError> {
        let capacity = self.capacity();
        let home = self.home(key);
        let mut reclaim = None;
        for i in 0..capacity {
            let index = probe_index(home, i, capacity);
            match &self.slots[index] {
                Slot::Empty => return Ok(Probe::Vacant(reclaim.unwrap_or(index))),
                Slot::Tombstone => {
                    reclaim.get_or_insert(index);
                }
                slot if slot.holds(key) => return Ok(Probe::Found(index)),
                Slot::Occupied(_) => {}
            }
        }
        match reclaim {
            Some(index) => {
                warn!(
                    "insert probe for {:?} exhausted {} slots; reusing tombstone at {}",
                    key, capacity, index
                );
                Ok(Probe::Vacant(index))
            }
            None => Err(TableError::TableFull {
                key: key.to_owned(),
                capacity,
            }),
        }
    }

    fn needs_grow(&self) -> bool {
        // (len + 1) / capacity >= 0.5
        2 * (self.len + 1) >= self.capacity()
    }

    fn insert(&mut self, key: String, value: V) -> Result<Option<V>, TableError> {
        if self.needs_grow() {
            self.grow();
        }
        match self.probe_for_insert(&key)? {
            Probe::Found(index) => {
                trace!("overwriting {:?} at {}", key, index);
                Ok(self.slots[index]
                    .entry_mut()
                    .map(|entry| core::mem::replace(&mut entry.value, value)))
            }
            Probe::Vacant(index) => {
                trace!("placing {:?} at {}", key, index);
                self.slots[index] = Slot::Occupied(Entry::new(key, value));
                self.len += 1;
                Ok(None)
            }
        }
    }

    /// Rebuilds into `next_prime(2 * capacity)` slots, carrying over
    /// occupied entries in index order and dropping tombstones. The new
    /// array is filled before it replaces the old one.
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = next_prime(old_capacity.saturating_mul(2));
        let mut slots = Slot::empty_array(new_capacity);
        let old = core::mem::take(&mut self.slots);
        for slot in old.into_vec() {
            if let Slot::Occupied(entry) = slot {
                let home = home_slot(&self.hasher, &entry.key, new_capacity);
                let index = first_empty(&slots, home);
                slots[index] = Slot::Occupied(entry);
            }
        }
        self.slots = slots;
        debug!(
            "resized table {} -> {} slots ({} entries)",
            old_capacity, new_capacity, self.len
        );
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find_index(key)?;
        let entry = self.slots[index].bury()?;
        self.len -= 1;
        self.rehash_after_removal(index);
        Some(entry.value)
    }

    /// Walks forward from `removed + 1` until an empty slot, pulling back
    /// every entry whose `[home, current)` stretch covers `removed`.
    fn rehash_after_removal(&mut self, removed: usize) {
        let capacity = self.capacity();
        let mut current = (removed + 1) % capacity;
        for _ in 1..capacity {
            let home = match &self.slots[current] {
                Slot::Empty => break,
                Slot::Tombstone => None,
                Slot::Occupied(entry) => Some(self.home(&entry.key)),
            };
            if let Some(home) = home {
                if spans_removed(home, removed, current) {
                    self.relocate(current);
                }
            }
            current = (current + 1) % capacity;
        }
    }

    /// Evicts the entry at `from` and places it again via the insertion
    /// probe. `from` becomes a tombstone first, so it lies on the entry's
    /// own path and the probe always has somewhere to land.
    fn relocate(&mut self, from: usize) {
        let Some(entry) = self.slots[from].bury() else {
            return;
        };
        self.len -= 1;
        let to = self
            .probe_for_insert(&entry.key)
            .map(Probe::index)
            .unwrap_or(from);
        if to != from {
            debug!("relocating {:?} from {} to {}", entry.key, from, to);
        }
        self.slots[to] = Slot::Occupied(entry);
        self.len += 1;
    }
}

/// String-keyed open-addressing table.
///
/// Values are opaque to the table: it stores and hands them back, never
/// inspecting them. Keys are non-empty strings.
pub struct HashTable<V, H = FoldHasher> {
    inner: Inner<V, H>,
    reentrancy: DebugReentrancy,
}

impl<V> HashTable<V> {
    /// Table with at least `capacity` slots, rounded up to a prime.
    pub fn new(capacity: usize) -> Result<Self, TableError> {
        Self::with_hasher(capacity, FoldHasher)
    }
}

impl<V, H> HashTable<V, H>
where
    H: KeyHasher,
{
    pub fn with_hasher(capacity: usize, hasher: H) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidCapacity);
        }
        Ok(Self {
            inner: Inner::with_capacity(capacity, hasher),
            reentrancy: DebugReentrancy::new(),
        })
    }

    /// Number of active entries.
    pub fn len(&self) -> usize {
        self.inner.len
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn hasher(&self) -> &H {
        &self.inner.hasher
    }

    /// Inserts or overwrites. Returns the previous value when `key` was
    /// already present; `len()` only grows for new keys.
    ///
    /// Grows the table first whenever the insert could push the active load
    /// to one half or more.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>, TableError> {
        let _g = self.reentrancy.enter("insert");
        let key = key.into();
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }
        self.inner.insert(key, value)
    }

    pub fn search(&self, key: &str) -> Option<&V> {
        let _g = self.reentrancy.enter("search");
        if key.is_empty() {
            return None;
        }
        let index = self.inner.find_index(key)?;
        self.inner.slots[index].entry().map(Entry::value)
    }

    pub fn search_mut(&mut self, key: &str) -> Option<&mut V> {
        let _g = self.reentrancy.enter("search_mut");
        if key.is_empty() {
            return None;
        }
        let index = self.inner.find_index(key)?;
        self.inner.slots[index]
            .entry_mut()
            .map(|entry| &mut entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let _g = self.reentrancy.enter("contains_key");
        !key.is_empty() && self.inner.find_index(key).is_some()
    }

    /// Tombstones `key`'s slot and returns its value, then repairs the probe
    /// sequences that ran through it.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let _g = self.reentrancy.enter("remove");
        if key.is_empty() {
            return None;
        }
        let removed = self.inner.remove(key);
        if removed.is_some() {
            trace!("removed {:?}; {} entries left", key, self.inner.len);
        }
        removed
    }

    /// Active entries as `(slot index, key, value)`, in index order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str, &V)> + '_ {
        self.inner
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.entry().map(|e| (i, e.key(), e.value())))
    }

    /// Snapshot of the active slots for diagnostics.
    pub fn dump<'a>(&'a self, label: &'a str) -> TableDump<'a> {
        let _g = self.reentrancy.enter("dump");
        TableDump {
            label,
            total: self.inner.len,
            slots: self.entries().map(|(i, k, _)| (i, k)).collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn raw_slots(&self) -> &[Slot<V>] {
        &self.inner.slots
    }
}

impl<V: fmt::Debug, H> fmt::Debug for HashTable<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.inner.len)
            .field("capacity", &self.inner.slots.len())
            .field("slots", &self.inner.slots)
            .finish()
    }
}

/// `(index, key)` listing of the active slots, labelled for display.
///
/// Renders as `Total <label> nodes: <n>` followed by one `<index>: <key>`
/// line per active slot. Not a stable format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableDump<'a> {
    label: &'a str,
    total: usize,
    slots: Vec<(usize, &'a str)>,
}

impl<'a> TableDump<'a> {
    pub fn label(&self) -> &'a str {
        self.label
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn slots(&self) -> &[(usize, &'a str)] {
        &self.slots
    }
}

impl fmt::Display for TableDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total {} nodes: {}", self.label, self.total)?;
        for (index, key) in &self.slots {
            write!(f, "\n{}: {}", index, key)?;
        }
        Ok(())
    }
}
