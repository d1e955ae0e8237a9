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

//! Compensated summation.
//!
//! Simulation loops add up many small per-step contributions. Naive
//! sequential accumulation lets the rounding error grow with the number of
//! terms and makes the result depend on the order of additions, which matters
//! once per-worker partial sums are merged in arbitrary order.
//! [`NeumaierSum`] keeps a running compensation term so the error stays
//! bounded independently of the number of terms.

use crate::TimeVariable;

/// Neumaier's variant of Kahan summation.
///
/// Unlike plain Kahan summation it also compensates when the next term is
/// larger in magnitude than the running sum.
///
/// # Examples
///
/// ```
/// use pulsetrain_core::sum::NeumaierSum;
///
/// let terms = [1.0, 1e100, 1.0, -1e100];
/// let naive: f64 = terms.iter().sum();
/// let compensated: NeumaierSum<f64> = terms.iter().copied().collect();
/// assert_eq!(naive, 0.0);
/// assert_eq!(compensated.total(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeumaierSum<T = f64> {
    sum: T,
    compensation: T,
}

impl<T: TimeVariable> Default for NeumaierSum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeVariable> NeumaierSum<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            sum: T::zero(),
            compensation: T::zero(),
        }
    }

    #[inline]
    pub fn add(&mut self, x: T) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation = self.compensation + ((self.sum - t) + x);
        } else {
            self.compensation = self.compensation + ((x - t) + self.sum);
        }
        self.sum = t;
    }

    /// Folds another partial sum into this one, carrying both compensation terms.
    #[inline]
    pub fn merge(mut self, other: Self) -> Self {
        self.add(other.sum);
        self.add(other.compensation);
        self
    }

    #[inline]
    pub fn total(&self) -> T {
        self.sum + self.compensation
    }
}

impl<T: TimeVariable> Extend<T> for NeumaierSum<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl<T: TimeVariable> FromIterator<T> for NeumaierSum<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sum_is_zero() {
        let s: NeumaierSum<f64> = NeumaierSum::new();
        assert_eq!(s.total(), 0.0);
        assert_eq!(NeumaierSum::<f32>::default().total(), 0.0);
    }

    #[test]
    fn test_many_small_terms() {
        let n = 1_000_000;
        let s: NeumaierSum<f64> = std::iter::repeat_n(0.1, n).collect();
        assert!((s.total() - 100_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_and_small_terms_cancel_correctly() {
        let mut s = NeumaierSum::new();
        s.add(1.0);
        s.add(1e100);
        s.add(1.0);
        s.add(-1e100);
        assert_eq!(s.total(), 2.0);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let terms: Vec<f64> = (0..10_000).map(|i| 1.0 / (1.0 + i as f64)).collect();
        let whole: NeumaierSum<f64> = terms.iter().copied().collect();

        let (left, right) = terms.split_at(3_333);
        let a: NeumaierSum<f64> = left.iter().copied().collect();
        let b: NeumaierSum<f64> = right.iter().copied().collect();

        assert!((a.merge(b).total() - whole.total()).abs() < 1e-12);
        assert!((b.merge(a).total() - whole.total()).abs() < 1e-12);
    }
}
