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

//! # Pulse Train Core
//!
//! Numeric and interval primitives shared by the pulse-train crates.
//!
//! ## Modules
//!
//! - `tolerance`: the single epsilon convention used for every equality and
//!   ordering decision on time values (`Tolerance<T>`).
//! - `interval`: a rectangular time span (`Interval<T>`) with overlap
//!   arithmetic and tolerance-aware ordering suitable for binary search over
//!   sorted, non-overlapping sequences.
//! - `sum`: compensated floating-point accumulation (`NeumaierSum<T>`).
//!
//! All time quantities are generic over [`TimeVariable`], which is satisfied
//! by `f32` and `f64`. `f64` is the default everywhere.

use num_traits::{Float, ToPrimitive};
use std::fmt::{Debug, Display};

pub mod interval;
pub mod sum;
pub mod tolerance;

pub trait TimeVariable: Float + Send + Sync + Debug + Display + 'static {}
impl<T> TimeVariable for T where T: Float + Send + Sync + Debug + Display + 'static {}

/// Converts a count into the time domain.
///
/// # Panics
///
/// Panics if `n` is not representable by `T`, which cannot happen for
/// integer counts and the primitive float types.
#[inline]
pub fn count_to_time<T: TimeVariable, N: ToPrimitive>(n: N) -> T {
    T::from(n).expect("count not representable in the time domain")
}

pub mod prelude {
    pub use crate::TimeVariable;
    pub use crate::interval::{
        DegenerateIntervalError, Interval, IntervalError, NonFiniteBoundError,
    };
    pub use crate::sum::NeumaierSum;
    pub use crate::tolerance::{EPSILON, InvalidToleranceError, Tolerance};
}
