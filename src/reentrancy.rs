//! Debug-only reentrancy guard.
//!
//! The table calls back into caller code while probing (the `KeyHasher`).
//! A hasher that reaches back into the same table would observe slots in
//! the middle of a resize or relocation. In debug builds every public
//! table operation holds this guard and a nested entry panics, naming
//! both operations. In release builds it compiles to nothing.

use core::cell::Cell;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

/// Per-table tracker. Embed it next to the guarded state and enter it with
/// `let _g = self.reentrancy.enter("op");`.
///
/// `Cell` keeps the owner `!Sync`; the owner stays `Send` so callers can
/// hand a table to another thread or wrap it in a lock.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    #[cfg(not(debug_assertions))]
    _nosync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            #[cfg(not(debug_assertions))]
            _nosync: PhantomData,
        }
    }

    /// Enter a guarded section on behalf of `op`. In debug builds, panics if
    /// another operation is still inside.
    #[inline]
    pub fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrancy detected: `{op}` entered while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            ReentrancyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            ReentrancyGuard { _z: PhantomData }
        }
    }

    /// Name of the operation currently inside, if any. Always `None` in
    /// release builds.
    #[cfg(test)]
    pub fn current(&self) -> Option<&'static str> {
        #[cfg(debug_assertions)]
        {
            self.active.get()
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for ReentrancyGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn enter_and_exit_is_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter("search");
        }
        let _g = r.enter("insert");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn tracks_current_operation() {
        let r = DebugReentrancy::new();
        assert_eq!(r.current(), None);
        let g = r.enter("remove");
        assert_eq!(r.current(), Some("remove"));
        drop(g);
        assert_eq!(r.current(), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_panics_in_debug() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g1 = r.enter("insert");
            let _g2 = r.enter("search");
        }));
        let err = res.expect_err("expected reentrancy to panic in debug builds");
        let msg = err
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(msg.contains("`search`"), "message: {msg}");
        assert!(msg.contains("`insert`"), "message: {msg}");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn reentrancy_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter("insert");
        let _g2 = r.enter("search");
        let (_g1, _g2) = (_g1, _g2);
    }
}
