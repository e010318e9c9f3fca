// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Equality policy for gated setters.
//!
//! A gated setter asks one question before it stores a value: is the incoming
//! value equal to the current one? A [`Comparator`] answers it, and may refuse
//! with [`Incomparable`] when the two values have no meaningful equality.

use core::cmp::Ordering;
use core::fmt;

/// Decides whether two values of a tracked field are equal.
///
/// Returns `Ok(true)` when the values are equal (the setter will not mark),
/// `Ok(false)` when they differ, and `Err(Incomparable)` when they cannot be
/// compared. On error the setter leaves both the field and the dirty state alone.
pub type Comparator<T> = fn(&T, &T) -> Result<bool, Incomparable>;

/// Error returned by a [`Comparator`] that cannot compare two values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Incomparable;

impl fmt::Display for Incomparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("values cannot be compared for equality")
    }
}

impl core::error::Error for Incomparable {}

/// The default comparator: plain [`PartialEq`]. Never fails.
///
/// Note that for floating point fields `NaN != NaN`, so writing `NaN` over `NaN`
/// marks the host dirty. Use [`partial_cmp_eq`] to reject `NaN` instead.
#[inline]
pub fn partial_eq<T: PartialEq>(old: &T, new: &T) -> Result<bool, Incomparable> {
    Ok(old == new)
}

/// A comparator built on [`PartialOrd`] that fails when the values are unordered.
///
/// ```rust
/// use understory_tracked::{Incomparable, partial_cmp_eq};
///
/// assert_eq!(partial_cmp_eq(&1.0_f64, &1.0), Ok(true));
/// assert_eq!(partial_cmp_eq(&1.0_f64, &2.0), Ok(false));
/// assert_eq!(partial_cmp_eq(&f64::NAN, &1.0), Err(Incomparable));
/// ```
#[inline]
pub fn partial_cmp_eq<T: PartialOrd>(old: &T, new: &T) -> Result<bool, Incomparable> {
    old.partial_cmp(new)
        .map(|ordering| ordering == Ordering::Equal)
        .ok_or(Incomparable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn partial_eq_compares_values_not_identity() {
        let a = String::from("same");
        let b = String::from("same");
        assert_eq!(partial_eq(&a, &b), Ok(true));
        assert_eq!(partial_eq(&a, &String::from("other")), Ok(false));
    }

    #[test]
    fn partial_eq_treats_nan_as_changed() {
        assert_eq!(partial_eq(&f64::NAN, &f64::NAN), Ok(false));
    }

    #[test]
    fn partial_cmp_eq_rejects_unordered() {
        assert_eq!(partial_cmp_eq(&f32::NAN, &f32::NAN), Err(Incomparable));
        assert_eq!(partial_cmp_eq(&3_i32, &3), Ok(true));
    }

    #[test]
    fn incomparable_display() {
        assert_eq!(
            format!("{Incomparable}"),
            "values cannot be compared for equality"
        );
    }
}
