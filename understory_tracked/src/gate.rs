// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gated setter helpers.
//!
//! Every setter that wants to take part in change tracking goes through one of
//! these functions. The rule is the same in all of them:
//!
//! 1. Compare the stored value with the incoming one.
//! 2. If they differ, mark the [`DirtyState`].
//! 3. Store the incoming value, whether or not it was equal.
//!
//! If the comparison fails, nothing is marked and nothing is stored.
//!
//! Hand-written setters should call these rather than re-implementing the rule:
//!
//! ```rust
//! use understory_tracked::{DirtyState, set_tracked};
//!
//! struct Invoice {
//!     total_cents: u64,
//!     currency: &'static str,
//!     dirty: DirtyState,
//! }
//!
//! impl Invoice {
//!     fn set_currency(&mut self, currency: &'static str) {
//!         // Normalize before storing; still gated on the stored value.
//!         let currency = if currency.is_empty() { "EUR" } else { currency };
//!         set_tracked(&mut self.dirty, &mut self.currency, currency);
//!     }
//! }
//!
//! let mut invoice = Invoice { total_cents: 0, currency: "EUR", dirty: DirtyState::new() };
//! invoice.set_currency("");
//! assert!(invoice.dirty.is_clean());
//! invoice.set_currency("USD");
//! assert!(invoice.dirty.is_dirty());
//! # let _ = invoice.total_cents;
//! ```

use core::mem;

use crate::compare::{Comparator, Incomparable};
use crate::host::TrackChanges;
use crate::state::DirtyState;

/// Stores `value` into `slot`, marking `state` dirty if it differs from the old value.
///
/// Returns `true` if the value differed.
#[inline]
pub fn set_tracked<T: PartialEq>(state: &mut DirtyState, slot: &mut T, value: T) -> bool {
    let changed = *slot != value;
    if changed {
        state.mark();
    }
    *slot = value;
    changed
}

/// Like [`set_tracked`], using `comparator` for the equality check.
///
/// On `Err` the slot keeps its old value and `state` is untouched.
///
/// ```rust
/// use understory_tracked::{DirtyState, Incomparable, partial_cmp_eq, try_set_tracked};
///
/// let mut state = DirtyState::new();
/// let mut ratio = 0.5_f64;
///
/// assert_eq!(try_set_tracked(&mut state, &mut ratio, f64::NAN, partial_cmp_eq), Err(Incomparable));
/// assert_eq!(ratio, 0.5);
/// assert!(state.is_clean());
///
/// assert_eq!(try_set_tracked(&mut state, &mut ratio, 0.75, partial_cmp_eq), Ok(true));
/// assert!(state.is_dirty());
/// ```
pub fn try_set_tracked<T>(
    state: &mut DirtyState,
    slot: &mut T,
    value: T,
    comparator: Comparator<T>,
) -> Result<bool, Incomparable> {
    let changed = !comparator(slot, &value)?;
    if changed {
        state.mark();
    }
    *slot = value;
    Ok(changed)
}

/// Like [`set_tracked`], but returns the previous value.
#[inline]
pub fn replace_tracked<T: PartialEq>(state: &mut DirtyState, slot: &mut T, value: T) -> T {
    if *slot != value {
        state.mark();
    }
    mem::replace(slot, value)
}

/// [`set_tracked`] for a field of a [`TrackChanges`] host.
///
/// `field` projects the host onto the slot being written, which lets the slot and
/// the host's dirty state be borrowed one after the other. This is what
/// [`tracked_fields!`](crate::tracked_fields) setters call.
///
/// ```rust
/// use understory_tracked::{DirtyState, TrackChanges, set_tracked_field};
///
/// #[derive(Default)]
/// struct Counter {
///     hits: u32,
///     dirty: DirtyState,
/// }
///
/// impl TrackChanges for Counter {
///     fn dirty_state(&self) -> &DirtyState { &self.dirty }
///     fn dirty_state_mut(&mut self) -> &mut DirtyState { &mut self.dirty }
/// }
///
/// let mut counter = Counter::default();
/// assert!(!set_tracked_field(&mut counter, |c| &mut c.hits, 0));
/// assert!(set_tracked_field(&mut counter, |c| &mut c.hits, 1));
/// assert!(counter.dirty.is_dirty());
/// ```
pub fn set_tracked_field<H, T, F>(host: &mut H, field: F, value: T) -> bool
where
    H: TrackChanges + ?Sized,
    T: PartialEq,
    F: FnOnce(&mut H) -> &mut T,
{
    let slot = field(&mut *host);
    let changed = *slot != value;
    *slot = value;
    if changed {
        host.dirty_state_mut().mark();
    }
    changed
}

/// [`try_set_tracked`] for a field of a [`TrackChanges`] host.
///
/// On `Err` the slot keeps its old value and the host's dirty state is untouched.
pub fn try_set_tracked_field<H, T, F>(
    host: &mut H,
    field: F,
    value: T,
    comparator: Comparator<T>,
) -> Result<bool, Incomparable>
where
    H: TrackChanges + ?Sized,
    F: FnOnce(&mut H) -> &mut T,
{
    let slot = field(&mut *host);
    let changed = !comparator(slot, &value)?;
    *slot = value;
    if changed {
        host.dirty_state_mut().mark();
    }
    Ok(changed)
}
