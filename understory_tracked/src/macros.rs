// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compile-time accessor generation.

/// Generates gated setters (and optionally getters) for fields of a host struct.
///
/// The host must implement [`TrackChanges`](crate::TrackChanges). Each entry is
/// one of:
///
/// - `accessor name: Type;` generates `fn name(&self) -> &Type` and
///   `fn set_name(&mut self, value: Type) -> bool`.
/// - `writable name: Type;` generates only `set_name`. No getter exists.
///
/// Either form may end with `=> comparator` to use a
/// [`Comparator`](crate::Comparator) instead of `PartialEq`; the setter then
/// returns `Result<bool, Incomparable>` and leaves the field and the dirty state
/// untouched on `Err`.
///
/// Setters return `true` when they marked the host dirty. Attributes (including
/// doc comments) and a visibility may precede each entry and apply to every
/// method generated for it.
///
/// Each field of a host may appear once across all invocations for that host.
/// Repeating a name, even as `writable` in one block and `accessor` in another,
/// defines `set_<name>` twice and fails to compile; merge overlapping
/// declarations into a single `accessor` entry. The runtime
/// [`FieldRegistry`](crate::FieldRegistry) accepts redeclaration instead, and
/// the last one wins.
///
/// # Example
///
/// ```rust
/// use understory_tracked::{DirtyState, TrackChanges, TrackChangesExt, partial_cmp_eq, tracked_fields};
///
/// #[derive(Default)]
/// struct Record {
///     test1: i32,
///     label: String,
///     password: String,
///     weight: f64,
///     dirty: DirtyState,
/// }
///
/// impl TrackChanges for Record {
///     fn dirty_state(&self) -> &DirtyState { &self.dirty }
///     fn dirty_state_mut(&mut self) -> &mut DirtyState { &mut self.dirty }
/// }
///
/// tracked_fields! {
///     impl Record {
///         pub accessor test1: i32;
///         pub accessor label: String;
///         pub writable password: String;
///         pub accessor weight: f64 => partial_cmp_eq;
///     }
/// }
///
/// let mut record = Record::default();
/// assert!(!record.is_dirty());
///
/// record.set_test1(5);
/// assert_eq!(*record.test1(), 5);
/// assert!(record.is_dirty());
///
/// record.clean();
/// record.set_label("same".into());
/// record.clean();
/// record.set_label("same".into());
/// assert!(!record.is_dirty());
///
/// record.set_password("hunter2".into());
/// assert!(record.is_dirty());
///
/// record.clean();
/// assert!(record.set_weight(f64::NAN).is_err());
/// assert_eq!(*record.weight(), 0.0);
/// assert!(!record.is_dirty());
/// ```
///
/// Field names must be identifiers; anything else is rejected when the macro
/// expands:
///
/// ```rust,compile_fail
/// use understory_tracked::tracked_fields;
///
/// struct Host;
///
/// tracked_fields! {
///     impl Host {
///         accessor "not-a-name": u8;
///     }
/// }
/// ```
///
/// A write-only field has no getter:
///
/// ```rust,compile_fail
/// use understory_tracked::{DirtyState, TrackChanges, tracked_fields};
///
/// #[derive(Default)]
/// struct Host { token: u64, dirty: DirtyState }
///
/// impl TrackChanges for Host {
///     fn dirty_state(&self) -> &DirtyState { &self.dirty }
///     fn dirty_state_mut(&mut self) -> &mut DirtyState { &mut self.dirty }
/// }
///
/// tracked_fields! {
///     impl Host {
///         writable token: u64;
///     }
/// }
///
/// let _ = Host::default().token();
/// ```
#[macro_export]
macro_rules! tracked_fields {
    (
        impl $host:ty {
            $(
                $(#[$meta:meta])*
                $vis:vis $kind:ident $name:ident : $ty:ty $(=> $cmp:expr)?;
            )*
        }
    ) => {
        impl $host {
            $(
                $crate::__tracked_field!(
                    $kind [$(#[$meta])*] $vis $name: $ty [$($cmp)?]
                );
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tracked_field {
    (accessor [$(#[$meta:meta])*] $vis:vis $name:ident: $ty:ty [$($cmp:expr)?]) => {
        $(#[$meta])*
        #[inline]
        #[must_use]
        $vis fn $name(&self) -> &$ty {
            &self.$name
        }

        $crate::__tracked_field!(writable [$(#[$meta])*] $vis $name: $ty [$($cmp)?]);
    };
    (writable [$(#[$meta:meta])*] $vis:vis $name:ident: $ty:ty []) => {
        $crate::__private::paste! {
            $(#[$meta])*
            $vis fn [<set_ $name>](&mut self, value: $ty) -> bool {
                $crate::set_tracked_field(self, |host| &mut host.$name, value)
            }
        }
    };
    (writable [$(#[$meta:meta])*] $vis:vis $name:ident: $ty:ty [$cmp:expr]) => {
        $crate::__private::paste! {
            $(#[$meta])*
            $vis fn [<set_ $name>](
                &mut self,
                value: $ty,
            ) -> ::core::result::Result<bool, $crate::Incomparable> {
                $crate::try_set_tracked_field(self, |host| &mut host.$name, value, $cmp)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::compare::partial_cmp_eq;
    use crate::host::{TrackChanges, TrackChangesExt};
    use crate::state::DirtyState;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Account {
        test1: i32,
        email: String,
        api_key: String,
        balance: f32,
        notes: Vec<String>,
        dirty: DirtyState,
    }

    impl TrackChanges for Account {
        fn dirty_state(&self) -> &DirtyState {
            &self.dirty
        }

        fn dirty_state_mut(&mut self) -> &mut DirtyState {
            &mut self.dirty
        }
    }

    crate::tracked_fields! {
        impl Account {
            accessor test1: i32;
            /// Contact address.
            pub(crate) accessor email: String;
            writable api_key: String;
            accessor balance: f32 => partial_cmp_eq;
        }
    }

    impl Account {
        // Hand-written setter in the same contract.
        fn push_note(&mut self, note: &str) {
            if self.notes.last().map(String::as_str) != Some(note) {
                self.notes.push(String::from(note));
                self.mark_dirty();
            }
        }
    }

    #[test]
    fn generated_host_starts_clean() {
        assert!(!Account::default().is_dirty());
    }

    #[test]
    fn write_then_read() {
        let mut account = Account::default();
        assert!(account.set_test1(5));
        assert_eq!(*account.test1(), 5);
    }

    #[test]
    fn two_different_values_mark() {
        let mut account = Account::default();
        account.set_test1(1);
        account.clean();
        account.set_test1(2);
        assert!(account.is_dirty());
    }

    #[test]
    fn equal_value_after_clean_is_a_no_op() {
        let mut account = Account::default();
        account.set_email(String::from("same"));
        account.clean();
        assert!(!account.set_email(String::from("same")));
        assert!(!account.is_dirty());
    }

    #[test]
    fn unchanged_default_does_not_mark() {
        let mut account = Account::default();
        assert!(!account.set_test1(0));
        assert!(!account.is_dirty());
    }

    #[test]
    fn writable_field_marks() {
        let mut account = Account::default();
        assert!(account.set_api_key(String::from("k-123")));
        assert_eq!(account.api_key, "k-123");
        assert!(account.is_dirty());
    }

    #[test]
    fn comparator_failure_leaves_host_untouched() {
        let mut account = Account::default();
        assert_eq!(account.set_balance(10.0), Ok(true));
        account.clean();
        assert!(account.set_balance(f32::NAN).is_err());
        assert_eq!(*account.balance(), 10.0);
        assert!(!account.is_dirty());
    }

    #[test]
    fn fields_share_one_signal() {
        let mut account = Account::default();
        account.set_test1(3);
        let _ = account.email();
        assert!(account.is_dirty());
    }

    #[test]
    fn hand_written_setter_participates() {
        let mut account = Account::default();
        account.push_note("first");
        assert!(account.is_dirty());
        account.clean();
        account.push_note("first");
        assert!(!account.is_dirty());
    }
}
