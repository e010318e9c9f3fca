// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host object traits.
//!
//! This module provides the [`TrackChanges`] trait for objects that own a
//! [`DirtyState`], and [`TrackChangesExt`] for the mark/query/clean API and the
//! save-then-clean pattern persistence layers use.

use crate::state::DirtyState;

/// A trait for objects that take part in change tracking.
///
/// Implementors own exactly one [`DirtyState`]. Generated setters (see
/// [`tracked_fields!`](crate::tracked_fields)) and hand-written setters that call
/// [`set_tracked`](crate::set_tracked) reach it through this trait.
///
/// # Example
///
/// ```rust
/// use understory_tracked::{DirtyState, TrackChanges, TrackChangesExt};
///
/// #[derive(Default)]
/// struct Document {
///     title: String,
///     dirty: DirtyState,
/// }
///
/// impl TrackChanges for Document {
///     fn dirty_state(&self) -> &DirtyState {
///         &self.dirty
///     }
///
///     fn dirty_state_mut(&mut self) -> &mut DirtyState {
///         &mut self.dirty
///     }
/// }
///
/// let mut doc = Document::default();
/// assert!(!doc.is_dirty());
/// doc.mark_dirty();
/// assert!(doc.is_dirty());
/// doc.clean();
/// assert!(!doc.is_dirty());
/// ```
pub trait TrackChanges {
    /// Returns a reference to the object's dirty state.
    fn dirty_state(&self) -> &DirtyState;

    /// Returns a mutable reference to the object's dirty state.
    fn dirty_state_mut(&mut self) -> &mut DirtyState;
}

impl TrackChanges for DirtyState {
    #[inline]
    fn dirty_state(&self) -> &DirtyState {
        self
    }

    #[inline]
    fn dirty_state_mut(&mut self) -> &mut DirtyState {
        self
    }
}

/// Extension methods for [`TrackChanges`].
pub trait TrackChangesExt: TrackChanges {
    /// Forces the object dirty.
    ///
    /// Returns `true` if it was clean before.
    #[inline]
    fn mark_dirty(&mut self) -> bool {
        self.dirty_state_mut().mark()
    }

    /// Returns `true` if the object changed since it was last cleaned.
    #[inline]
    fn is_dirty(&self) -> bool {
        self.dirty_state().is_dirty()
    }

    /// Forces the object clean.
    ///
    /// Returns `true` if it was dirty before. Never fails on a clean object.
    #[inline]
    fn clean(&mut self) -> bool {
        self.dirty_state_mut().clean()
    }

    /// Runs `save` if the object is dirty, then cleans it if `save` succeeded.
    ///
    /// Returns `Ok(true)` if a save happened, `Ok(false)` if the object was
    /// already clean. If `save` fails the object stays dirty and the error is
    /// returned.
    ///
    /// ```rust
    /// use understory_tracked::{DirtyState, TrackChangesExt};
    ///
    /// let mut state = DirtyState::Dirty;
    /// let failed: Result<bool, &str> = state.save_if_dirty(|_| Err("disk full"));
    /// assert_eq!(failed, Err("disk full"));
    /// assert!(state.is_dirty());
    ///
    /// assert_eq!(state.save_if_dirty(|_| Ok::<(), &str>(())), Ok(true));
    /// assert!(!state.is_dirty());
    /// assert_eq!(state.save_if_dirty(|_| Ok::<(), &str>(())), Ok(false));
    /// ```
    fn save_if_dirty<E, F>(&mut self, save: F) -> Result<bool, E>
    where
        F: FnOnce(&Self) -> Result<(), E>,
    {
        if !self.is_dirty() {
            return Ok(false);
        }
        save(&*self)?;
        self.clean();
        Ok(true)
    }
}

impl<T: TrackChanges + ?Sized> TrackChangesExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::set_tracked;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Note {
        body: String,
        tags: Vec<String>,
        dirty: DirtyState,
    }

    impl Note {
        fn set_body(&mut self, body: String) {
            set_tracked(&mut self.dirty, &mut self.body, body);
        }

        // Hand-written setter honoring the same contract.
        fn add_tag(&mut self, tag: &str) {
            if !self.tags.iter().any(|t| t == tag) {
                self.tags.push(String::from(tag));
                self.mark_dirty();
            }
        }
    }

    impl TrackChanges for Note {
        fn dirty_state(&self) -> &DirtyState {
            &self.dirty
        }

        fn dirty_state_mut(&mut self) -> &mut DirtyState {
            &mut self.dirty
        }
    }

    #[test]
    fn new_host_is_clean() {
        let note = Note::default();
        assert!(!note.is_dirty());
    }

    #[test]
    fn hand_written_setter_uses_same_signal() {
        let mut note = Note::default();
        note.add_tag("rust");
        assert!(note.is_dirty());
        note.clean();

        note.add_tag("rust");
        assert!(!note.is_dirty());

        note.set_body(String::from("hello"));
        assert!(note.is_dirty());
    }

    #[test]
    fn save_if_dirty_skips_clean_hosts() {
        let mut note = Note::default();
        let mut saves = 0;
        let saved: Result<bool, ()> = note.save_if_dirty(|_| {
            saves += 1;
            Ok(())
        });
        assert_eq!(saved, Ok(false));
        assert_eq!(saves, 0);
    }

    #[test]
    fn save_if_dirty_sees_current_values() {
        let mut note = Note::default();
        note.set_body(String::from("draft"));
        let mut persisted = String::new();
        let saved: Result<bool, ()> = note.save_if_dirty(|n| {
            persisted.clone_from(&n.body);
            Ok(())
        });
        assert_eq!(saved, Ok(true));
        assert_eq!(persisted, "draft");
        assert!(!note.is_dirty());
    }

    #[test]
    fn clean_twice_is_fine() {
        let mut note = Note::default();
        assert!(!note.clean());
        assert!(!note.clean());
        assert!(!note.is_dirty());
    }
}
