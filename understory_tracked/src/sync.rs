// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lock-guarded shared hosts.
//!
//! A host's field slots and its [`DirtyState`] change together, so concurrent
//! access has to serialize on the whole host. [`SharedTracked`] does that with
//! one [`parking_lot::Mutex`] per host: every compare-mark-store sequence runs
//! under the lock, and the lock is released on every exit path.

use parking_lot::Mutex;

use crate::host::{TrackChanges, TrackChangesExt};
use crate::state::DirtyState;

/// A host object shared between threads.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use understory_tracked::{DirtyState, SharedTracked, TrackChanges, set_tracked_field};
///
/// #[derive(Default)]
/// struct Session { user: u32, dirty: DirtyState }
///
/// impl TrackChanges for Session {
///     fn dirty_state(&self) -> &DirtyState { &self.dirty }
///     fn dirty_state_mut(&mut self) -> &mut DirtyState { &mut self.dirty }
/// }
///
/// let session = Arc::new(SharedTracked::new(Session::default()));
/// let writer = Arc::clone(&session);
/// thread::spawn(move || {
///     writer.with_mut(|s| set_tracked_field(s, |s| &mut s.user, 42));
/// })
/// .join()
/// .unwrap();
///
/// let mut saved = None;
/// let flushed: Result<bool, ()> = session.save_if_dirty(|s| {
///     saved = Some(s.user);
///     Ok(())
/// });
/// assert_eq!(flushed, Ok(true));
/// assert_eq!(saved, Some(42));
/// assert!(!session.is_dirty());
/// ```
#[derive(Debug, Default)]
pub struct SharedTracked<H> {
    inner: Mutex<H>,
}

impl<H: TrackChanges> SharedTracked<H> {
    /// Wraps a host.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            inner: Mutex::new(host),
        }
    }

    /// Runs `f` with shared access to the host.
    pub fn with<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Runs `f` with exclusive access to the host.
    ///
    /// Setters called inside `f` see a consistent value and dirty state.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Returns the host's current dirty state.
    #[must_use]
    pub fn dirty_state(&self) -> DirtyState {
        *self.inner.lock().dirty_state()
    }

    /// Returns `true` if the host is dirty.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().is_dirty()
    }

    /// Forces the host dirty. Returns `true` if it was clean.
    pub fn mark_dirty(&self) -> bool {
        self.inner.lock().mark_dirty()
    }

    /// Forces the host clean. Returns `true` if it was dirty.
    pub fn clean(&self) -> bool {
        self.inner.lock().clean()
    }

    /// Saves the host if it is dirty, holding the lock across the query, the
    /// save and the clean.
    ///
    /// A writer on another thread cannot slip a change in between the save and
    /// the clean, so no change is ever cleaned without having been saved.
    ///
    /// The lock is not reentrant: `save` must not call back into this same
    /// `SharedTracked`, or it deadlocks. It receives the host directly instead.
    pub fn save_if_dirty<E>(&self, save: impl FnOnce(&H) -> Result<(), E>) -> Result<bool, E> {
        self.inner.lock().save_if_dirty(save)
    }

    /// Consumes the wrapper, returning the host.
    #[must_use]
    pub fn into_inner(self) -> H {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::set_tracked_field;
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    #[derive(Default)]
    struct Counter {
        value: u64,
        dirty: DirtyState,
    }

    impl TrackChanges for Counter {
        fn dirty_state(&self) -> &DirtyState {
            &self.dirty
        }

        fn dirty_state_mut(&mut self) -> &mut DirtyState {
            &mut self.dirty
        }
    }

    #[test]
    fn shared_host_starts_clean() {
        let shared = SharedTracked::new(Counter::default());
        assert!(!shared.is_dirty());
        assert_eq!(shared.dirty_state(), DirtyState::Clean);
    }

    #[test]
    fn concurrent_writers_serialize_on_the_host_lock() {
        let shared = Arc::new(SharedTracked::new(Counter::default()));
        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    shared.with_mut(|c| {
                        let next = c.value + n;
                        set_tracked_field(c, |c| &mut c.value, next)
                    })
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(shared.with(|c| c.value), (1..=8).sum::<u64>());
        assert!(shared.is_dirty());
    }

    #[test]
    fn failed_save_keeps_host_dirty() {
        let shared = SharedTracked::new(Counter::default());
        shared.mark_dirty();
        assert_eq!(shared.save_if_dirty(|_| Err("offline")), Err("offline"));
        assert!(shared.is_dirty());
        assert_eq!(shared.save_if_dirty(|_| Ok::<(), &str>(())), Ok(true));
        assert!(!shared.is_dirty());
    }

    #[test]
    fn clean_is_idempotent_through_the_lock() {
        let shared = SharedTracked::new(Counter::default());
        assert!(!shared.clean());
        assert!(shared.mark_dirty());
        assert!(shared.clean());
        assert!(!shared.clean());
        assert!(!shared.into_inner().dirty.is_dirty());
    }
}
