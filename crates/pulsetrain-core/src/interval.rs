// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Intervals
//!
//! A rectangular pulse is a time span `[start, end)`. This module provides the
//! span itself together with the two operations everything else is built on:
//! overlap arithmetic and a tolerance-aware "precedes" relation.
//!
//! `precedes` is *not* a total order. It is only meaningful for mutually
//! non-overlapping intervals, where it agrees with ordering by start time and
//! can therefore drive `partition_point` over sorted sequences.
//! For that reason `Interval` does not implement `PartialEq` or `PartialOrd`;
//! comparisons are explicit and always take a [`Tolerance`].

use crate::{TimeVariable, tolerance::Tolerance};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegenerateIntervalError<T> {
    start: T,
    end: T,
}

impl<T: Copy> DegenerateIntervalError<T> {
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub fn end(&self) -> T {
        self.end
    }
}

impl<T: Display> Display for DegenerateIntervalError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Degenerate interval: start {} and end {} coincide within tolerance",
            self.start, self.end
        )
    }
}

impl<T: fmt::Debug + Display> std::error::Error for DegenerateIntervalError<T> {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonFiniteBoundError<T> {
    start: T,
    end: T,
}

impl<T: Copy> NonFiniteBoundError<T> {
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub fn end(&self) -> T {
        self.end
    }
}

impl<T: Display> Display for NonFiniteBoundError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Interval bounds must be finite: start {}, end {}",
            self.start, self.end
        )
    }
}

impl<T: fmt::Debug + Display> std::error::Error for NonFiniteBoundError<T> {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalError<T> {
    Degenerate(DegenerateIntervalError<T>),
    NonFiniteBound(NonFiniteBoundError<T>),
}

impl<T: Display> Display for IntervalError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalError::Degenerate(e) => write!(f, "{e}"),
            IntervalError::NonFiniteBound(e) => write!(f, "{e}"),
        }
    }
}

impl<T: fmt::Debug + Display> std::error::Error for IntervalError<T> {}

impl<T> From<DegenerateIntervalError<T>> for IntervalError<T> {
    fn from(err: DegenerateIntervalError<T>) -> Self {
        IntervalError::Degenerate(err)
    }
}

impl<T> From<NonFiniteBoundError<T>> for IntervalError<T> {
    fn from(err: NonFiniteBoundError<T>) -> Self {
        IntervalError::NonFiniteBound(err)
    }
}

/// A rectangular pulse `[start, end)` on a real-valued time axis.
///
/// The only invariant enforced at construction is that the endpoints are
/// finite and do not coincide within tolerance. The width is not required to
/// be positive, but every algorithm in the workspace assumes it is.
///
/// # Examples
///
/// ```
/// use pulsetrain_core::interval::Interval;
///
/// let a = Interval::new(0.0, 2.0).unwrap();
/// let b = Interval::new(1.0, 3.0).unwrap();
/// assert_eq!(a.width(), 2.0);
/// assert_eq!(a.overlap(&b), 1.0);
/// assert_eq!(a.proportional_overlap(&b), 0.5);
/// assert!(Interval::new(4.0, 4.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Interval<T = f64> {
    start_time: T,
    end_time: T,
}

impl<T: TimeVariable> Interval<T> {
    /// Creates an interval using the default [`Tolerance`].
    #[inline]
    pub fn new(start: T, end: T) -> Result<Self, IntervalError<T>> {
        Self::with_tolerance(start, end, &Tolerance::default())
    }

    /// Creates an interval, rejecting endpoints that coincide within `tol`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulsetrain_core::{interval::Interval, tolerance::Tolerance};
    ///
    /// let coarse = Tolerance::new(0.5).unwrap();
    /// assert!(Interval::with_tolerance(1.0, 1.25, &coarse).is_err());
    /// assert!(Interval::with_tolerance(1.0, 1.75, &coarse).is_ok());
    /// ```
    #[inline]
    pub fn with_tolerance(
        start: T,
        end: T,
        tol: &Tolerance<T>,
    ) -> Result<Self, IntervalError<T>> {
        if !start.is_finite() || !end.is_finite() {
            return Err(NonFiniteBoundError::new(start, end).into());
        }
        if tol.is_degenerate(start, end) {
            return Err(DegenerateIntervalError::new(start, end).into());
        }
        Ok(Self {
            start_time: start,
            end_time: end,
        })
    }

    /// Creates an interval without validating it in release builds.
    ///
    /// Internal to the pulse-train crates, which use it to derive pieces from
    /// already validated intervals (e.g. splitting at a wraparound boundary).
    /// Use [`Interval::new`] or [`Interval::with_tolerance`] instead.
    #[doc(hidden)]
    #[inline]
    pub fn new_unchecked(start: T, end: T) -> Self {
        debug_assert!(
            start.is_finite() && end.is_finite() && start != end,
            "Interval::new_unchecked: invalid bounds [{start}, {end})"
        );
        Self {
            start_time: start,
            end_time: end,
        }
    }

    #[inline]
    pub fn start(&self) -> T {
        self.start_time
    }

    #[inline]
    pub fn end(&self) -> T {
        self.end_time
    }

    #[inline]
    pub fn width(&self) -> T {
        self.end_time - self.start_time
    }

    /// Half-open containment: `start <= t < end`.
    #[inline]
    pub fn contains(&self, t: T) -> bool {
        t >= self.start_time && t < self.end_time
    }

    /// Length of time during which `self` and `other` overlap.
    ///
    /// Symmetric in its arguments. Touching intervals overlap by zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulsetrain_core::interval::Interval;
    ///
    /// let a = Interval::new(0.0, 2.0).unwrap();
    /// let b = Interval::new(5.0, 7.0).unwrap();
    /// assert_eq!(Interval::overlap(&a, &b), 0.0);
    /// assert_eq!(a.overlap(&a), a.width());
    /// ```
    #[inline]
    pub fn overlap(&self, other: &Self) -> T {
        if self.start_time > other.end_time || self.end_time < other.start_time {
            return T::zero();
        }
        let left = (other.start_time - self.start_time).max(T::zero());
        let right = (self.end_time - other.end_time).max(T::zero());
        self.width() - left - right
    }

    /// Fraction of `self` covered by `other`, in `[0, 1]`.
    #[inline]
    pub fn proportional_overlap(&self, other: &Self) -> T {
        self.overlap(other) / self.width()
    }

    /// `true` if `self` ends at or before `other` starts, within `tol`.
    #[inline]
    pub fn precedes(&self, other: &Self, tol: &Tolerance<T>) -> bool {
        tol.at_or_before(self.end_time, other.start_time)
    }

    /// `true` if both endpoints match within `tol`.
    #[inline]
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance<T>) -> bool {
        tol.approx_eq(self.start_time, other.start_time)
            && tol.approx_eq(self.end_time, other.end_time)
    }

    /// Moves both endpoints by `delta`.
    #[inline]
    pub fn shift_phase(&mut self, delta: T) {
        self.start_time = self.start_time + delta;
        self.end_time = self.end_time + delta;
    }

    /// Returns a copy moved by `delta`.
    #[inline]
    pub fn translated(&self, delta: T) -> Self {
        let mut out = *self;
        out.shift_phase(delta);
        out
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_time, self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Interval<f64>: Send, Sync, Copy);

    fn iv(a: f64, b: f64) -> Interval {
        Interval::new(a, b).expect("valid interval")
    }

    #[test]
    fn test_new_stores_endpoints_and_width() {
        let i = iv(1.5, 4.0);
        assert_eq!(i.start(), 1.5);
        assert_eq!(i.end(), 4.0);
        assert_eq!(i.width(), 2.5);
    }

    #[test]
    fn test_new_rejects_degenerate() {
        let err = Interval::new(112.5, 112.5).unwrap_err();
        match err {
            IntervalError::Degenerate(e) => {
                assert_eq!(e.start(), 112.5);
                assert_eq!(e.end(), 112.5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Interval::new(1.0, 1.0 + 1e-7).is_err());
        assert!(Interval::new(1.0, 1.0 + 1e-5).is_ok());
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(matches!(
            Interval::new(f64::NAN, 1.0),
            Err(IntervalError::NonFiniteBound(_))
        ));
        assert!(matches!(
            Interval::new(0.0, f64::INFINITY),
            Err(IntervalError::NonFiniteBound(_))
        ));
    }

    #[test]
    fn test_reversed_bounds_are_kept_as_given() {
        let i = iv(3.0, 1.0);
        assert_eq!(i.start(), 3.0);
        assert_eq!(i.width(), -2.0);
    }

    #[test]
    fn test_contains_is_half_open() {
        let i = iv(1.0, 2.0);
        assert!(i.contains(1.0));
        assert!(i.contains(1.999));
        assert!(!i.contains(2.0));
        assert!(!i.contains(0.5));
    }

    #[test]
    fn test_overlap_disjoint_is_zero() {
        let a = iv(0.0, 2.0);
        let b = iv(5.0, 7.0);
        assert_eq!(a.overlap(&b), 0.0);
        assert_eq!(b.overlap(&a), 0.0);
    }

    #[test]
    fn test_overlap_partial() {
        let a = iv(0.0, 2.0);
        let b = iv(1.0, 3.0);
        assert_eq!(a.overlap(&b), 1.0);
        assert_eq!(a.proportional_overlap(&b), 0.5);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let pulses = [
            iv(0.0, 2.0),
            iv(1.0, 3.0),
            iv(2.5, 4.5),
            iv(4.0, 6.0),
            iv(5.0, 7.0),
            iv(0.5, 6.5),
        ];
        for a in &pulses {
            for b in &pulses {
                assert!((a.overlap(b) - b.overlap(a)).abs() < 1e-12, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_self_overlap_is_full() {
        let a = iv(2.5, 4.5);
        assert_eq!(a.overlap(&a), a.width());
        assert_eq!(a.proportional_overlap(&a), 1.0);
    }

    #[test]
    fn test_overlap_containment() {
        let outer = iv(0.0, 10.0);
        let inner = iv(2.0, 3.0);
        assert_eq!(outer.overlap(&inner), 1.0);
        assert_eq!(inner.overlap(&outer), 1.0);
        assert_eq!(inner.proportional_overlap(&outer), 1.0);
        assert_eq!(outer.proportional_overlap(&inner), 0.1);
    }

    #[test]
    fn test_touching_intervals_overlap_by_zero() {
        let a = iv(0.0, 2.0);
        let b = iv(2.0, 4.0);
        assert_eq!(a.overlap(&b), 0.0);
        assert_eq!(b.overlap(&a), 0.0);
    }

    #[test]
    fn test_precedes() {
        let tol = Tolerance::default();
        let low = iv(0.0, 2.0);
        let mid = iv(1.0, 3.0);
        let high = iv(5.0, 7.0);
        let touching = iv(2.0, 4.0);

        assert!(low.precedes(&high, &tol));
        assert!(!high.precedes(&low, &tol));
        assert!(low.precedes(&touching, &tol));
        assert!(!low.precedes(&mid, &tol));
        assert!(!low.precedes(&low, &tol));
    }

    #[test]
    fn test_precedes_absorbs_noise() {
        let tol = Tolerance::default();
        let a = iv(0.0, 2.0 + 1e-9);
        let b = iv(2.0, 4.0);
        assert!(a.precedes(&b, &tol));
    }

    #[test]
    fn test_approx_eq() {
        let tol = Tolerance::default();
        let a = iv(1.0, 3.0);
        assert!(a.approx_eq(&iv(1.0 + 1e-9, 3.0 - 1e-9), &tol));
        assert!(!a.approx_eq(&iv(1.0, 3.1), &tol));
        assert!(!a.approx_eq(&iv(0.9, 3.0), &tol));
    }

    #[test]
    fn test_shift_phase_moves_both_endpoints() {
        let mut a = iv(1.0, 3.0);
        a.shift_phase(2.5);
        assert_eq!(a.start(), 3.5);
        assert_eq!(a.end(), 5.5);
        a.shift_phase(-3.5);
        assert_eq!(a.start(), 0.0);
        assert_eq!(a.width(), 2.0);

        let b = a.translated(10.0);
        assert_eq!(b.start(), 10.0);
        assert_eq!(a.start(), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(iv(1.0, 5.0).to_string(), "[1, 5)");
        assert!(
            Interval::new(2.0, 2.0)
                .unwrap_err()
                .to_string()
                .contains("Degenerate")
        );
    }

    #[test]
    fn test_f32_intervals() {
        let a: Interval<f32> = Interval::new(0.0, 2.0).unwrap();
        let b: Interval<f32> = Interval::new(1.0, 3.0).unwrap();
        assert_eq!(a.overlap(&b), 1.0);
    }
}
