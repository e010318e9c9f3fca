// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tracked: change tracking for host objects.
//!
//! This crate lets a data-holding object record whether it has changed since it
//! was last saved, without the object's own logic setting a flag on every
//! mutation. A persistence layer can then ask "does this need saving?" without
//! diffing the object.
//!
//! It models change tracking as:
//!
//! - **Dirty state** ([`DirtyState`]): a two-state signal, clean or dirty, owned
//!   by each host object. Marking is idempotent; cleaning a clean object is a no-op.
//! - **Gated setters** ([`set_tracked`], [`try_set_tracked`], [`set_tracked_field`]):
//!   compare the incoming value with the stored one, mark dirty only on a real
//!   change, and always store.
//! - **Accessor generation**: [`tracked_fields!`] generates getters and gated
//!   setters for named struct fields at compile time, and [`FieldRegistry`]
//!   declares fields by name at run time for use with [`TrackedStore`].
//! - **Host integration** ([`TrackChanges`], [`TrackChangesExt`]): the contract a
//!   host implements to expose its dirty state, plus mark/query/clean and the
//!   save-then-clean pattern.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_tracked::{DirtyState, TrackChanges, TrackChangesExt, tracked_fields};
//!
//! #[derive(Default)]
//! struct User {
//!     name: String,
//!     age: u32,
//!     dirty: DirtyState,
//! }
//!
//! impl TrackChanges for User {
//!     fn dirty_state(&self) -> &DirtyState {
//!         &self.dirty
//!     }
//!
//!     fn dirty_state_mut(&mut self) -> &mut DirtyState {
//!         &mut self.dirty
//!     }
//! }
//!
//! tracked_fields! {
//!     impl User {
//!         pub accessor name: String;
//!         pub accessor age: u32;
//!     }
//! }
//!
//! let mut user = User::default();
//! assert!(!user.is_dirty());
//!
//! user.set_age(0); // same as the current value
//! assert!(!user.is_dirty());
//!
//! user.set_name("Ada".into());
//! assert!(user.is_dirty());
//!
//! // A persistence layer saves and cleans in one step.
//! let saved: Result<bool, ()> = user.save_if_dirty(|u| {
//!     assert_eq!(u.name(), "Ada");
//!     Ok(())
//! });
//! assert_eq!(saved, Ok(true));
//! assert!(!user.is_dirty());
//! ```
//!
//! ## Runtime Declarations
//!
//! When fields are only known by name at run time, declare them on a
//! [`FieldRegistry`] and keep values in a [`TrackedStore`]:
//!
//! ```rust
//! use understory_tracked::{FieldRegistry, FieldSpec, TrackChangesExt, TrackedStore};
//!
//! let mut registry = FieldRegistry::new();
//! let [title] = registry.declare_accessor(["title"], FieldSpec::new(String::new())).unwrap();
//! let [secret] = registry.declare_writable(["secret"], FieldSpec::new(0_u64)).unwrap();
//!
//! let mut store = TrackedStore::new();
//! store.set(secret, 7, &registry).unwrap();
//! assert!(store.is_dirty());
//! store.clean();
//!
//! store.set(title, String::from("Draft"), &registry).unwrap();
//! assert_eq!(store.get(title, &registry), "Draft");
//! ```
//!
//! Declarations are all-or-nothing per batch: a name that is not an identifier
//! rejects the whole batch with [`DeclareError::InvalidFieldName`]. Redeclaring a
//! name is not an error; the last declaration wins.
//!
//! ## Equality
//!
//! Setters use [`PartialEq`] by default. A [`Comparator`] can be supplied per
//! field instead; when it returns [`Incomparable`] the setter fails and neither
//! the field nor the dirty state changes. [`partial_cmp_eq`] is such a
//! comparator for [`PartialOrd`] types that rejects unordered values like `NaN`.
//!
//! Only the assigned value is compared. Changes made through interior
//! mutability or to objects a field merely refers to are not observed.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! ## Features
//!
//! - `std` (default): links the standard library.
//! - `serde`: serializes [`DirtyState`] as a `bool`. Combined with
//!   `#[serde(default, skip_serializing_if = "DirtyState::is_clean")]`, a clean
//!   host serializes without any trace of the signal.
//! - `sync`: `SharedTracked`, a host behind one `parking_lot` mutex.
//! - `log`: emits `log` records on dirty transitions and field redeclaration.
//!
//! The serialization and logging tests are gated on their features; run the
//! suite with `--all-features` to cover them.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod compare;
mod gate;
mod host;
mod id;
mod macros;
mod registry;
mod state;
mod store;
#[cfg(feature = "sync")]
mod sync;
mod value;

pub use compare::{Comparator, Incomparable, partial_cmp_eq, partial_eq};
pub use gate::{
    replace_tracked, set_tracked, set_tracked_field, try_set_tracked, try_set_tracked_field,
};
pub use host::{TrackChanges, TrackChangesExt};
pub use id::{Field, FieldId, FieldKey, ReadableField, WriteOnly};
pub use registry::{
    Access, DeclareError, FieldRegistration, FieldRegistry, FieldSpec, is_valid_field_name,
};
pub use state::DirtyState;
pub use store::{FieldError, TrackedStore};
#[cfg(feature = "sync")]
pub use sync::SharedTracked;
pub use value::ErasedValue;

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
}
