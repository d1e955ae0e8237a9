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

//! # Tolerance
//!
//! Floating-point time values coming out of modular phase arithmetic are
//! never exact, so every equality and ordering decision in the workspace goes
//! through a [`Tolerance`]. The appropriate epsilon depends on the time unit
//! of the inputs (seconds vs. microseconds), so callers pass it in.
//!
//! The convention is fixed:
//!
//! - `a` equals `b` iff `|a - b| < epsilon`
//! - `a` is at or before `b` iff `a <= b + epsilon`
//! - `a` exceeds `b` iff `a > b + epsilon`

use crate::TimeVariable;
use std::fmt::Display;

/// Epsilon used by [`Tolerance::default`].
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidToleranceError<T> {
    epsilon: T,
}

impl<T: Copy> InvalidToleranceError<T> {
    #[inline]
    pub fn new(epsilon: T) -> Self {
        Self { epsilon }
    }

    #[inline]
    pub fn epsilon(&self) -> T {
        self.epsilon
    }
}

impl<T: Display> Display for InvalidToleranceError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid tolerance: epsilon {} must be positive and finite",
            self.epsilon
        )
    }
}

impl<T: std::fmt::Debug + Display> std::error::Error for InvalidToleranceError<T> {}

/// Absolute tolerance for comparing time values.
///
/// # Examples
///
/// ```
/// use pulsetrain_core::tolerance::Tolerance;
///
/// let tol = Tolerance::new(1e-3).unwrap();
/// assert!(tol.approx_eq(1.0, 1.0005));
/// assert!(tol.at_or_before(2.0005, 2.0));
/// assert!(tol.exceeds(2.01, 2.0));
/// assert!(Tolerance::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<T = f64> {
    epsilon: T,
}

impl<T: TimeVariable> Default for Tolerance<T> {
    fn default() -> Self {
        Self {
            epsilon: T::from(EPSILON).expect("default epsilon representable"),
        }
    }
}

impl<T: TimeVariable> Tolerance<T> {
    /// Creates a tolerance with the given epsilon.
    ///
    /// Fails if `epsilon` is not strictly positive and finite. With a zero
    /// epsilon `approx_eq` could never hold.
    #[inline]
    pub fn new(epsilon: T) -> Result<Self, InvalidToleranceError<T>> {
        if epsilon.is_finite() && epsilon > T::zero() {
            Ok(Self { epsilon })
        } else {
            Err(InvalidToleranceError::new(epsilon))
        }
    }

    #[inline]
    pub fn epsilon(&self) -> T {
        self.epsilon
    }

    #[inline]
    pub fn approx_eq(&self, a: T, b: T) -> bool {
        (a - b).abs() < self.epsilon
    }

    #[inline]
    pub fn approx_zero(&self, a: T) -> bool {
        a.abs() < self.epsilon
    }

    /// `true` if an interval `[start, end)` would collapse under this tolerance.
    #[inline]
    pub fn is_degenerate(&self, start: T, end: T) -> bool {
        self.approx_eq(start, end)
    }

    /// `a <= b`, with `epsilon` of slack in favour of `a`.
    #[inline]
    pub fn at_or_before(&self, a: T, b: T) -> bool {
        a <= b + self.epsilon
    }

    /// `a > b` by more than `epsilon`. Exactly the negation of [`Self::at_or_before`].
    #[inline]
    pub fn exceeds(&self, a: T, b: T) -> bool {
        !self.at_or_before(a, b)
    }
}

impl<T: Display> Display for Tolerance<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tolerance({})", self.epsilon)
    }
}
