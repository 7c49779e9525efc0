//! Per-position storage of the probing table.

/// A live key/value pair. Keys are immutable once stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: V,
}

impl<V> Entry<V> {
    pub fn new(key: String, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (String, V) {
        (self.key, self.value)
    }
}

/// Three-state slot.
///
/// `Empty` ends every probe sequence. `Tombstone` keeps probe sequences
/// that once passed through this position intact: searches step over it,
/// inserts may reclaim it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(Entry<V>),
}

impl<V> Slot<V> {
    /// A boxed array of `capacity` never-used slots.
    pub(crate) fn empty_array(capacity: usize) -> Box<[Slot<V>]> {
        std::iter::repeat_with(|| Slot::Empty).take(capacity).collect()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    pub fn entry(&self) -> Option<&Entry<V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn entry_mut(&mut self) -> Option<&mut Entry<V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    /// Occupied slot holding exactly `key`.
    #[inline]
    pub(crate) fn holds(&self, key: &str) -> bool {
        matches!(self, Slot::Occupied(entry) if entry.key == key)
    }

    /// Turns an occupied slot into a tombstone and hands back its entry.
    /// Other states are left untouched.
    pub(crate) fn bury(&mut self) -> Option<Entry<V>> {
        if !self.is_occupied() {
            return None;
        }
        match std::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }
}
