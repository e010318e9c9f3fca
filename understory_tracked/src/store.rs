// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object field storage with change tracking.
//!
//! [`TrackedStore`] is a generic host object: sparse storage for the fields
//! declared in a [`FieldRegistry`] plus one [`DirtyState`]. Values live in a
//! sorted `SmallVec` keyed by [`FieldId`], the same layout `PropertyStore` uses,
//! so a host with a handful of written fields does not allocate for them.

use core::fmt;
use smallvec::SmallVec;

use crate::compare::Incomparable;
use crate::host::TrackChanges;
use crate::id::{FieldId, FieldKey, ReadableField};
use crate::registry::{FieldRegistry, FieldSpec};
use crate::state::DirtyState;
use crate::value::ErasedValue;

/// Fields stored inline before spilling to the heap.
const INLINE_CAPACITY: usize = 8;

/// Error returned by [`TrackedStore`] field access.
///
/// A failed [`set`](TrackedStore::set) leaves the stored value and the dirty
/// state exactly as they were.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldError {
    /// The handle does not name a declared field.
    Undeclared(FieldId),
    /// The handle's value type differs from the field's declared type.
    TypeMismatch {
        /// The field name.
        field: &'static str,
        /// The declared value type.
        expected: &'static str,
        /// The handle's value type.
        found: &'static str,
    },
    /// The field was redeclared without a getter.
    WriteOnly {
        /// The field name.
        field: &'static str,
    },
    /// The field's comparator could not compare the old and new values.
    Incomparable {
        /// The field name.
        field: &'static str,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undeclared(id) => write!(f, "{id} is not a declared field"),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field {field:?} is declared as `{expected}`, accessed as `{found}`"
            ),
            Self::WriteOnly { field } => write!(f, "field {field:?} has no getter"),
            Self::Incomparable { field } => {
                write!(f, "field {field:?}: {Incomparable}")
            }
        }
    }
}

impl core::error::Error for FieldError {}

/// Sparse, change-tracked storage for one host object.
///
/// # Example
///
/// ```rust
/// use understory_tracked::{FieldRegistry, FieldSpec, TrackChangesExt, TrackedStore};
///
/// let mut registry = FieldRegistry::new();
/// let [test1] = registry.declare_accessor::<i32, 1>(["test1"], FieldSpec::default()).unwrap();
///
/// let mut store = TrackedStore::new();
/// assert!(!store.is_dirty());
/// assert_eq!(store.get(test1, &registry), &0);
///
/// // Writing the default is not a change.
/// assert_eq!(store.set(test1, 0, &registry), Ok(false));
/// assert!(!store.is_dirty());
///
/// assert_eq!(store.set(test1, 5, &registry), Ok(true));
/// assert_eq!(store.get(test1, &registry), &5);
/// assert!(store.is_dirty());
///
/// store.clean();
/// assert!(!store.is_dirty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TrackedStore {
    /// Written values, sorted by [`FieldId`] for binary search lookup.
    entries: SmallVec<[(FieldId, ErasedValue); INLINE_CAPACITY]>,
    state: DirtyState,
}

impl TrackedStore {
    /// Creates an empty, clean store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no field has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of written fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the ids of written fields, in id order.
    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Returns `true` if the field has been written at least once.
    #[must_use]
    pub fn has_value(&self, id: FieldId) -> bool {
        self.find_entry(id).is_ok()
    }

    #[inline]
    fn find_entry(&self, id: FieldId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(fid, _)| *fid)
    }

    /// Stored value for `id`, if one exists with the declared type.
    ///
    /// A slot left over from an earlier declaration of another type counts as
    /// never written.
    fn current<T: 'static>(&self, id: FieldId) -> Option<&T> {
        self.find_entry(id)
            .ok()
            .and_then(|idx| self.entries[idx].1.downcast_ref())
    }

    /// Writes a field through its gated setter.
    ///
    /// Compares `value` with the stored value (or the declared default if the
    /// field was never written), marks the store dirty if they differ, and then
    /// stores `value` either way. Returns whether the store was marked.
    ///
    /// # Errors
    ///
    /// Returns an error, without storing or marking, if the field is not
    /// declared, is declared with another type, or its comparator fails.
    pub fn set<T: Clone + 'static>(
        &mut self,
        field: impl FieldKey<T>,
        value: T,
        registry: &FieldRegistry,
    ) -> Result<bool, FieldError> {
        let id = field.field_id();
        let (name, spec) = resolve::<T>(registry, id)?;

        let old = self.current::<T>(id).unwrap_or(spec.default_value());
        let equal = spec
            .compare(old, &value)
            .map_err(|_| FieldError::Incomparable { field: name })?;

        if !equal {
            self.state.mark();
        }
        match self.find_entry(id) {
            Ok(idx) => match self.entries[idx].1.downcast_mut::<T>() {
                Some(slot) => *slot = value,
                None => self.entries[idx].1 = ErasedValue::new(value),
            },
            Err(idx) => self.entries.insert(idx, (id, ErasedValue::new(value))),
        }
        Ok(!equal)
    }

    /// Reads a field through its getter.
    ///
    /// Returns the stored value, or the declared default if the field was never
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not declared, is declared with another
    /// type, or was redeclared write-only.
    pub fn try_get<'a, T: Clone + 'static>(
        &'a self,
        field: impl ReadableField<T>,
        registry: &'a FieldRegistry,
    ) -> Result<&'a T, FieldError> {
        let id = field.field_id();
        let (name, spec) = resolve::<T>(registry, id)?;
        if !registry.is_readable(id) {
            return Err(FieldError::WriteOnly { field: name });
        }
        Ok(self.current::<T>(id).unwrap_or(spec.default_value()))
    }

    /// Reads a field through its getter.
    ///
    /// # Panics
    ///
    /// Panics if [`try_get`](Self::try_get) would return an error. Handles from
    /// [`FieldRegistry::declare_accessor`] on the same registry never do unless
    /// the field was since redeclared.
    #[must_use]
    pub fn get<'a, T: Clone + 'static>(
        &'a self,
        field: impl ReadableField<T>,
        registry: &'a FieldRegistry,
    ) -> &'a T {
        match self.try_get(field, registry) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

fn resolve<T: 'static>(
    registry: &FieldRegistry,
    id: FieldId,
) -> Result<(&'static str, &FieldSpec<T>), FieldError> {
    let registration = registry.get(id).ok_or(FieldError::Undeclared(id))?;
    let spec = registry
        .spec::<T>(id)
        .ok_or(FieldError::TypeMismatch {
            field: registration.name(),
            expected: registration.type_name(),
            found: core::any::type_name::<T>(),
        })?;
    Ok((registration.name(), spec))
}

impl TrackChanges for TrackedStore {
    #[inline]
    fn dirty_state(&self) -> &DirtyState {
        &self.state
    }

    #[inline]
    fn dirty_state_mut(&mut self) -> &mut DirtyState {
        &mut self.state
    }
}
