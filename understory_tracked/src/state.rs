// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-object dirty signal.

/// Whether a host object has changed since it was last cleaned.
///
/// There are exactly two states. A freshly constructed host starts [`Clean`](Self::Clean),
/// becomes [`Dirty`](Self::Dirty) on the first real change (or an explicit
/// [`mark`](Self::mark)), and only returns to `Clean` through [`clean`](Self::clean).
/// Nothing in the API produces a "dirty, but false" value: clean *is* the absence
/// of the signal.
///
/// # Example
///
/// ```rust
/// use understory_tracked::DirtyState;
///
/// let mut state = DirtyState::new();
/// assert!(!state.is_dirty());
///
/// assert!(state.mark());
/// assert!(!state.mark(), "already dirty");
/// assert!(state.is_dirty());
///
/// assert!(state.clean());
/// assert!(!state.clean(), "cleaning a clean state is a no-op");
/// assert!(state.is_clean());
/// ```
///
/// # Serialization
///
/// With the `serde` feature, `DirtyState` serializes as a `bool`. Hosts that want
/// a clean object to dump without any trace of the signal can write:
///
/// ```rust,ignore
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Record {
///     name: String,
///     #[serde(default, skip_serializing_if = "DirtyState::is_clean")]
///     dirty: DirtyState,
/// }
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirtyState {
    /// No change observed since construction or the last clean.
    #[default]
    Clean,
    /// At least one tracked field changed since the last clean.
    Dirty,
}

impl DirtyState {
    /// Creates a clean state.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self::Clean
    }

    /// Marks the state dirty.
    ///
    /// Returns `true` if this call moved the state from clean to dirty. Marking an
    /// already-dirty state leaves it dirty and returns `false`.
    pub fn mark(&mut self) -> bool {
        let transitioned = self.is_clean();
        *self = Self::Dirty;
        #[cfg(feature = "log")]
        if transitioned {
            log::trace!("dirty state: clean -> dirty");
        }
        transitioned
    }

    /// Returns `true` if the state is dirty.
    #[must_use]
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        matches!(self, Self::Dirty)
    }

    /// Returns `true` if the state is clean.
    ///
    /// Takes `&self` so it can be used with `serde(skip_serializing_if)`.
    #[must_use]
    #[inline]
    pub const fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    /// Returns the state to clean.
    ///
    /// Returns `true` if the state was dirty. Cleaning a clean state never fails
    /// and changes nothing.
    pub fn clean(&mut self) -> bool {
        let transitioned = self.is_dirty();
        *self = Self::Clean;
        #[cfg(feature = "log")]
        if transitioned {
            log::trace!("dirty state: dirty -> clean");
        }
        transitioned
    }

    /// Cleans the state, returning whether it was dirty.
    ///
    /// This is `is_dirty` followed by `clean` in one step.
    #[inline]
    pub fn take(&mut self) -> bool {
        self.clean()
    }
}

impl From<bool> for DirtyState {
    #[inline]
    fn from(dirty: bool) -> Self {
        if dirty { Self::Dirty } else { Self::Clean }
    }
}

impl From<DirtyState> for bool {
    #[inline]
    fn from(state: DirtyState) -> Self {
        state.is_dirty()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DirtyState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_dirty())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DirtyState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <bool as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::from)
    }
}
