// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field identification types.
//!
//! This module provides [`FieldId`] for runtime field identification and two
//! typed handles: [`Field<T>`] for fields declared with a getter and a setter,
//! and [`WriteOnly<T>`] for fields declared with a setter only.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A runtime field identifier.
///
/// A lightweight handle (u16) that identifies a field within a
/// [`FieldRegistry`](crate::FieldRegistry). Redeclaring a name keeps its id.
///
/// ```rust
/// use understory_tracked::FieldId;
///
/// let id = FieldId::new(3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u16);

impl FieldId {
    /// Creates a new field ID from the given index.
    ///
    /// Normally produced by [`FieldRegistry`](crate::FieldRegistry) declarations.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this field ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldId").field(&self.0).finish()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.0)
    }
}

/// A handle that can be passed to [`TrackedStore::set`](crate::TrackedStore::set).
///
/// Implemented by both [`Field<T>`] and [`WriteOnly<T>`].
pub trait FieldKey<T>: Copy {
    /// Returns the runtime id of the field.
    fn field_id(self) -> FieldId;
}

/// A handle that can also be passed to [`TrackedStore::get`](crate::TrackedStore::get).
///
/// Only [`Field<T>`] implements this: a write-only field has no getter.
pub trait ReadableField<T>: FieldKey<T> {}

/// A typed handle to a field declared with a getter and a gated setter.
///
/// Returned by [`FieldRegistry::declare_accessor`](crate::FieldRegistry::declare_accessor).
pub struct Field<T> {
    id: FieldId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Field<T> {
    /// Creates a typed handle from a field ID.
    ///
    /// The caller must make sure the id was declared with type `T`; a mismatch
    /// is reported by the store at use.
    #[must_use]
    #[inline]
    pub const fn from_id(id: FieldId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying field ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> FieldId {
        self.id
    }

    /// Drops the getter capability.
    #[must_use]
    #[inline]
    pub const fn write_only(self) -> WriteOnly<T> {
        WriteOnly::from_id(self.id)
    }
}

/// A typed handle to a field declared with a gated setter only.
///
/// Returned by [`FieldRegistry::declare_writable`](crate::FieldRegistry::declare_writable).
/// There is no way to read through it:
///
/// ```rust,compile_fail
/// use understory_tracked::{FieldRegistry, FieldSpec, TrackedStore};
///
/// let mut registry = FieldRegistry::new();
/// let [secret] = registry.declare_writable::<u32, 1>(["secret"], FieldSpec::default()).unwrap();
/// let store = TrackedStore::new();
/// let _ = store.get(secret, &registry);
/// ```
pub struct WriteOnly<T> {
    id: FieldId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> WriteOnly<T> {
    /// Creates a typed write-only handle from a field ID.
    #[must_use]
    #[inline]
    pub const fn from_id(id: FieldId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying field ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> FieldId {
        self.id
    }
}

impl<T> From<Field<T>> for WriteOnly<T> {
    #[inline]
    fn from(field: Field<T>) -> Self {
        field.write_only()
    }
}

impl<T> FieldKey<T> for Field<T> {
    #[inline]
    fn field_id(self) -> FieldId {
        self.id
    }
}

impl<T> ReadableField<T> for Field<T> {}

impl<T> FieldKey<T> for WriteOnly<T> {
    #[inline]
    fn field_id(self) -> FieldId {
        self.id
    }
}

// Manual trait implementations to avoid requiring T: Clone, etc.

macro_rules! impl_handle_traits {
    ($handle:ident) => {
        impl<T> Copy for $handle<T> {}

        impl<T> Clone for $handle<T> {
            #[inline]
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> PartialEq for $handle<T> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl<T> Eq for $handle<T> {}

        impl<T> Hash for $handle<T> {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        impl<T> fmt::Debug for $handle<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($handle))
                    .field("id", &self.id)
                    .field("type", &core::any::type_name::<T>())
                    .finish()
            }
        }
    };
}

impl_handle_traits!(Field);
impl_handle_traits!(WriteOnly);
