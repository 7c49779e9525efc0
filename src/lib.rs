//! songgraph: an artist/song graph builder whose name indexes are
//! open-addressing hash tables with quadratic probing and tombstone
//! deletion.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: deduplicate artist and song names before linking them in an
//!   undirected graph, with the index layer small enough to reason about
//!   slot by slot.
//! - Layers:
//!   - Slot<V>: three-state storage (`Empty`, `Tombstone`,
//!     `Occupied`), so "never used" and "deleted" cannot be confused.
//!   - HashTable<V, H>: quadratic probing over a prime number of slots,
//!     growth before the active load reaches one half, and a repair pass
//!     after every removal.
//!   - Graph: arena of nodes keyed by generational `NodeKey`s; the graph
//!     owns nodes, the tables only hold keys.
//!   - Catalog: parses the command language and keeps tables and graph in
//!     step.
//!
//! Constraints
//! - Single-threaded: no locking inside. Tables are `Send` but `!Sync`;
//!   callers that share one across threads wrap it in a lock.
//! - Deterministic: the default `FoldHasher` has no random state, so slot
//!   positions (and therefore dumps) are reproducible.
//! - Every probe, repair walk and resize is bounded by the capacity.
//!
//! Probing
//! - Home slot is `hash(key) % capacity`; attempt `i` visits
//!   `home + i^2 (mod capacity)` for `i` in `0..capacity`.
//! - Search stops at the first `Empty` slot and steps over tombstones.
//! - Insert remembers the first tombstone on the path and places a new key
//!   there, else at the `Empty` slot that ended the path. A live match is
//!   overwritten in place.
//! - A prime capacity with load below one half guarantees a free slot
//!   within the first `(capacity + 1) / 2` attempts, so the exhausted-probe
//!   branches are defensive: search reports "not found", insert reuses a
//!   tombstone if it saw one and otherwise returns `TableFull` before
//!   touching any slot.
//!
//! Removal
//! - The slot becomes a tombstone and the value is moved out to the
//!   caller.
//! - A forward linear walk from the next slot up to the first `Empty`
//!   slot relocates every entry whose circular stretch `[home, current)`
//!   covers the removed index. The vacated position is itself left as a
//!   tombstone so entries behind it stay reachable.
//!
//! Growth
//! - Capacity goes to `next_prime(2 * capacity)`; live entries are
//!   re-placed in index order and tombstones are dropped. Capacity never
//!   shrinks.
//!
//! Reentrancy policy
//! - The hasher is caller code run during probing. Public table methods
//!   hold a debug-only guard so a hasher that calls back into the same
//!   table panics instead of observing a half-moved slot array.
//!
//! Notes and non-goals
//! - Keys are strings; values are opaque to the table.
//! - No persistence and no ordering guarantees beyond the diagnostic dump,
//!   which lists active slots in index order.

pub mod command;
pub mod config;
pub mod error;
pub mod graph;
pub mod hash;
pub mod hash_table;
mod hash_table_proptest;
pub mod logger;
pub mod prime;
mod reentrancy;
pub mod slot;

// Public surface
pub use command::{Catalog, Command, PrintTarget};
pub use error::{CommandError, GraphError, TableError};
pub use graph::{ComponentStats, Graph, GraphNode, NodeKey, NodeKind};
pub use hash::{FoldHasher, KeyHasher};
pub use hash_table::{HashTable, TableDump};
