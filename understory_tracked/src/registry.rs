// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime field declarations.
//!
//! [`FieldRegistry`] is the runtime counterpart of [`tracked_fields!`](crate::tracked_fields):
//! a host type declares its tracked fields once, by name, and gets back typed
//! handles for use with [`TrackedStore`](crate::TrackedStore).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use hashbrown::HashMap;

use crate::compare::{Comparator, Incomparable, partial_eq};
use crate::id::{Field, FieldId, WriteOnly};

/// How a field was declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Setter only; no getter exists.
    WriteOnly,
    /// Getter and setter.
    ReadWrite,
}

/// Per-field configuration: the default value and the equality policy.
///
/// The default value is what a getter returns before the field is first
/// written, and what the first write is compared against.
///
/// ```rust
/// use understory_tracked::{FieldSpec, partial_cmp_eq};
///
/// let spec = FieldSpec::new(1.0_f64).compare_with(partial_cmp_eq);
/// assert_eq!(spec.default_value(), &1.0);
/// assert!(spec.compare(&1.0, &f64::NAN).is_err());
/// ```
#[derive(Clone)]
pub struct FieldSpec<T> {
    default_value: T,
    comparator: Comparator<T>,
}

impl<T: PartialEq> FieldSpec<T> {
    /// Creates a spec with the given default and [`PartialEq`] comparison.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            default_value,
            comparator: partial_eq::<T>,
        }
    }
}

impl<T> FieldSpec<T> {
    /// Creates a spec with the given default and comparator.
    ///
    /// Usable for types that do not implement [`PartialEq`].
    #[must_use]
    pub fn with_comparator(default_value: T, comparator: Comparator<T>) -> Self {
        Self {
            default_value,
            comparator,
        }
    }

    /// Replaces the comparator.
    #[must_use]
    pub fn compare_with(mut self, comparator: Comparator<T>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Returns the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Returns the comparator.
    #[must_use]
    #[inline]
    pub fn comparator(&self) -> Comparator<T> {
        self.comparator
    }

    /// Runs the comparator on two values.
    #[inline]
    pub fn compare(&self, old: &T, new: &T) -> Result<bool, Incomparable> {
        (self.comparator)(old, new)
    }
}

impl<T: Default + PartialEq> Default for FieldSpec<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}

/// Error returned when a declaration batch is rejected.
///
/// Nothing from a rejected batch is installed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclareError {
    /// A name is not a valid identifier.
    InvalidFieldName {
        /// The offending name.
        name: &'static str,
        /// Its position in the batch.
        index: usize,
    },
    /// The batch would exceed the 65,535 fields a registry can hold.
    TooManyFields,
}

impl fmt::Display for DeclareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldName { name, index } => {
                write!(f, "invalid field name {name:?} at position {index}")
            }
            Self::TooManyFields => write!(f, "too many fields declared (max {})", u16::MAX),
        }
    }
}

impl core::error::Error for DeclareError {}

/// Returns `true` if `name` can be used as a field name.
///
/// A field name starts with an ASCII letter or `_`, continues with ASCII
/// alphanumerics or `_`, and is not `_` alone.
///
/// ```rust
/// use understory_tracked::is_valid_field_name;
///
/// assert!(is_valid_field_name("test1"));
/// assert!(is_valid_field_name("_private"));
/// assert!(!is_valid_field_name("1st"));
/// assert!(!is_valid_field_name("has space"));
/// assert!(!is_valid_field_name("_"));
/// assert!(!is_valid_field_name(""));
/// ```
#[must_use]
pub fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    name != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A registration entry for a field.
pub struct FieldRegistration {
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    access: Access,
    spec: Box<dyn Any>,
}

impl FieldRegistration {
    /// Returns the field name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the field's value type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the name of the field's value type.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns how the field was (last) declared.
    #[must_use]
    #[inline]
    pub fn access(&self) -> Access {
        self.access
    }
}

impl fmt::Debug for FieldRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistration")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

/// The set of tracked fields declared for one host type.
///
/// Declarations happen once, typically when the host type is set up; the
/// resulting handles and the registry are then shared read-only by every host
/// instance. Declaring never touches any instance state.
///
/// # Redeclaration
///
/// Declaring a name that already exists is not an error. The name keeps its
/// [`FieldId`] and the new declaration replaces the old one's type, default,
/// comparator and [`Access`]. This holds within one batch too: the last
/// occurrence wins.
///
/// # Example
///
/// ```rust
/// use understory_tracked::{Access, FieldRegistry, FieldSpec};
///
/// let mut registry = FieldRegistry::new();
/// let [test1, test2] = registry
///     .declare_accessor::<i32, 2>(["test1", "test2"], FieldSpec::default())
///     .unwrap();
/// let [token] = registry
///     .declare_writable(["token"], FieldSpec::new(String::new()))
///     .unwrap();
///
/// assert_eq!(registry.len(), 3);
/// assert_eq!(registry.by_name("test2"), Some(test2.id()));
/// assert_eq!(registry.name(test1.id()), Some("test1"));
/// assert_eq!(registry.get(token.id()).unwrap().access(), Access::WriteOnly);
///
/// // All or nothing: one bad name rejects the whole batch.
/// assert!(registry.declare_accessor::<i32, 2>(["ok", "not ok"], FieldSpec::default()).is_err());
/// assert_eq!(registry.by_name("ok"), None);
/// ```
#[derive(Default)]
pub struct FieldRegistry {
    fields: Vec<FieldRegistration>,
    by_name: HashMap<&'static str, FieldId>,
}

impl FieldRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares setter-only fields.
    ///
    /// Returns one [`WriteOnly`] handle per name, in order. Repeated names yield
    /// the same handle.
    pub fn declare_writable<T: Clone + 'static, const N: usize>(
        &mut self,
        names: [&'static str; N],
        spec: FieldSpec<T>,
    ) -> Result<[WriteOnly<T>; N], DeclareError> {
        let ids = self.declare(names, spec, Access::WriteOnly)?;
        Ok(ids.map(WriteOnly::from_id))
    }

    /// Declares fields with both a getter and a setter.
    ///
    /// Returns one [`Field`] handle per name, in order. Repeated names yield the
    /// same handle.
    pub fn declare_accessor<T: Clone + 'static, const N: usize>(
        &mut self,
        names: [&'static str; N],
        spec: FieldSpec<T>,
    ) -> Result<[Field<T>; N], DeclareError> {
        let ids = self.declare(names, spec, Access::ReadWrite)?;
        Ok(ids.map(Field::from_id))
    }

    fn declare<T: Clone + 'static, const N: usize>(
        &mut self,
        names: [&'static str; N],
        spec: FieldSpec<T>,
        access: Access,
    ) -> Result<[FieldId; N], DeclareError> {
        // Validate the whole batch before installing anything.
        for (index, &name) in names.iter().enumerate() {
            if !is_valid_field_name(name) {
                return Err(DeclareError::InvalidFieldName { name, index });
            }
        }
        let added = names
            .iter()
            .enumerate()
            .filter(|&(i, name)| !self.by_name.contains_key(name) && !names[..i].contains(name))
            .count();
        if self.fields.len() + added > usize::from(u16::MAX) {
            return Err(DeclareError::TooManyFields);
        }

        Ok(names.map(|name| self.install(name, spec.clone(), access)))
    }

    fn install<T: Clone + 'static>(
        &mut self,
        name: &'static str,
        spec: FieldSpec<T>,
        access: Access,
    ) -> FieldId {
        let registration = FieldRegistration {
            name,
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            access,
            spec: Box::new(spec),
        };

        if let Some(&id) = self.by_name.get(name) {
            #[cfg(feature = "log")]
            log::debug!(
                "redeclaring field {name:?} as {access:?} {}",
                registration.type_name
            );
            self.fields[usize::from(id.index())] = registration;
            return id;
        }

        #[expect(clippy::cast_possible_truncation, reason = "checked in declare")]
        let id = FieldId::new(self.fields.len() as u16);
        self.fields.push(registration);
        self.by_name.insert(name, id);
        id
    }

    /// Returns the number of declared fields.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a field.
    #[must_use]
    pub fn name(&self, id: FieldId) -> Option<&'static str> {
        self.get(id).map(FieldRegistration::name)
    }

    /// Returns the registration for a field.
    #[must_use]
    pub fn get(&self, id: FieldId) -> Option<&FieldRegistration> {
        self.fields.get(usize::from(id.index()))
    }

    /// Returns `true` if the field is declared with a getter.
    #[must_use]
    pub fn is_readable(&self, id: FieldId) -> bool {
        self.get(id).is_some_and(|r| r.access == Access::ReadWrite)
    }

    /// Returns the spec of a field declared with type `T`.
    ///
    /// Returns `None` if the field is not declared or was declared with another type.
    #[must_use]
    pub fn spec<T: 'static>(&self, id: FieldId) -> Option<&FieldSpec<T>> {
        self.get(id).and_then(|r| r.spec.downcast_ref())
    }

    /// Returns an iterator over all declared fields, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldRegistration)> {
        self.fields.iter().enumerate().map(|(i, r)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len <= u16::MAX")]
            (FieldId::new(i as u16), r)
        })
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("count", &self.fields.len())
            .field("fields", &self.fields.iter().map(|r| r.name).collect::<Vec<_>>())
            .finish()
    }
}
