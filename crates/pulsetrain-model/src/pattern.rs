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

//! # Pulse Patterns
//!
//! A pattern is the ordered set of pulses emitted within a single PRI. It is
//! validated once, when it is built, and is immutable afterwards; a
//! [`PeriodicTrain`](crate::train::PeriodicTrain) derives its materialized
//! sequence from it and can always regenerate that sequence.

use crate::err::{OverlappingPatternError, PatternError};
use pulsetrain_core::{
    TimeVariable, interval::Interval, sum::NeumaierSum, tolerance::Tolerance,
};
use std::fmt::Display;

/// A non-empty, strictly ordered, pairwise non-overlapping list of pulses.
///
/// Every pulse precedes the next one under [`Interval::precedes`] with the
/// pattern's tolerance, and every pulse has positive width.
#[derive(Debug, Clone)]
pub struct Pattern<T: TimeVariable = f64> {
    pulses: Vec<Interval<T>>,
    tolerance: Tolerance<T>,
}

impl<T: TimeVariable> Pattern<T> {
    /// Validates `pulses` as a pattern.
    ///
    /// # Errors
    ///
    /// - [`PatternError::Empty`] if `pulses` is empty.
    /// - [`PatternError::ReversedPulse`] if a pulse ends before it starts.
    /// - [`PatternError::Overlapping`] if a pulse does not strictly follow its
    ///   predecessor.
    pub fn try_from_intervals(
        pulses: Vec<Interval<T>>,
        tolerance: Tolerance<T>,
    ) -> Result<Self, PatternError<T>> {
        if pulses.is_empty() {
            return Err(PatternError::Empty);
        }
        for (index, pulse) in pulses.iter().enumerate() {
            if pulse.width() <= T::zero() {
                return Err(PatternError::ReversedPulse {
                    index,
                    interval: *pulse,
                });
            }
        }
        for (index, pair) in pulses.windows(2).enumerate() {
            if !pair[0].precedes(&pair[1], &tolerance) {
                return Err(OverlappingPatternError::new(index + 1, pair[0], pair[1]).into());
            }
        }
        Ok(Self { pulses, tolerance })
    }

    /// A pattern consisting of one pulse.
    pub fn single(pulse: Interval<T>) -> Result<Self, PatternError<T>> {
        Self::try_from_intervals(vec![pulse], Tolerance::default())
    }

    /// Builds a pattern from a contiguous run of an already validated one.
    pub(crate) fn from_validated_slice(pulses: &[Interval<T>], tolerance: Tolerance<T>) -> Self {
        debug_assert!(!pulses.is_empty());
        Self {
            pulses: pulses.to_vec(),
            tolerance,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    /// Always `false`; patterns are non-empty by construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Interval<T>] {
        &self.pulses
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Interval<T>> {
        self.pulses.iter()
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance<T> {
        self.tolerance
    }

    #[inline]
    pub fn first(&self) -> Interval<T> {
        self.pulses[0]
    }

    #[inline]
    pub fn last(&self) -> Interval<T> {
        self.pulses[self.pulses.len() - 1]
    }

    /// Sum of pulse widths within one period.
    pub fn total_width(&self) -> T {
        self.pulses
            .iter()
            .map(Interval::width)
            .collect::<NeumaierSum<T>>()
            .total()
    }
}

impl<'a, T: TimeVariable> IntoIterator for &'a Pattern<T> {
    type Item = &'a Interval<T>;
    type IntoIter = std::slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pulses.iter()
    }
}

impl<T: TimeVariable> Display for Pattern<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pattern[")?;
        for (i, p) in self.pulses.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "]")
    }
}

/// Builder for [`Pattern`].
///
/// Pulses are collected as raw bounds and validated together in
/// [`PatternBuilder::build`].
///
/// # Examples
///
/// ```
/// use pulsetrain_model::pattern::PatternBuilder;
///
/// let pattern = PatternBuilder::new()
///     .pulse(0.0, 10.0)
///     .pulse(500.0, 510.0)
///     .build()
///     .unwrap();
/// assert_eq!(pattern.len(), 2);
///
/// assert!(PatternBuilder::new().pulse(0.0, 10.0).pulse(5.0, 15.0).build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PatternBuilder<T: TimeVariable = f64> {
    bounds: Vec<(T, T)>,
    tolerance: Tolerance<T>,
}

impl<T: TimeVariable> Default for PatternBuilder<T> {
    fn default() -> Self {
        Self {
            bounds: Vec::new(),
            tolerance: Tolerance::default(),
        }
    }
}

impl<T: TimeVariable> PatternBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tolerance(mut self, tolerance: Tolerance<T>) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn pulse(mut self, start: T, end: T) -> Self {
        self.bounds.push((start, end));
        self
    }

    #[inline]
    pub fn interval(mut self, interval: Interval<T>) -> Self {
        self.bounds.push((interval.start(), interval.end()));
        self
    }

    pub fn pulses<I>(mut self, bounds: I) -> Self
    where
        I: IntoIterator<Item = (T, T)>,
    {
        self.bounds.extend(bounds);
        self
    }

    pub fn build(self) -> Result<Pattern<T>, PatternError<T>> {
        let tolerance = self.tolerance;
        let pulses = self
            .bounds
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                Interval::with_tolerance(start, end, &tolerance)
                    .map_err(|error| PatternError::InvalidPulse { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Pattern::try_from_intervals(pulses, tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsetrain_core::interval::IntervalError;

    fn iv(a: f64, b: f64) -> Interval {
        Interval::new(a, b).expect("valid interval")
    }

    #[test]
    fn test_builder_accepts_ordered_pulses() {
        let p: Pattern = PatternBuilder::new()
            .pulses([(0.0, 0.2), (37.5, 37.7), (75.0, 75.2)])
            .pulse(450.0, 570.0)
            .build()
            .expect("valid pattern");
        assert_eq!(p.len(), 4);
        assert!(!p.is_empty());
        assert_eq!(p.first().start(), 0.0);
        assert_eq!(p.last().end(), 570.0);
        assert!((p.total_width() - 120.6).abs() < 1e-9);
    }

    #[test]
    fn test_builder_accepts_touching_pulses() {
        let p = PatternBuilder::new()
            .pulse(0.0, 5.0)
            .pulse(5.0, 10.0)
            .build()
            .expect("touching pulses do not overlap");
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_builder_rejects_empty() {
        assert!(matches!(
            PatternBuilder::<f64>::new().build(),
            Err(PatternError::Empty)
        ));
    }

    #[test]
    fn test_builder_reports_degenerate_pulse_index() {
        let err = PatternBuilder::new()
            .pulse(0.0, 0.2)
            .pulse(112.5, 112.5)
            .build()
            .unwrap_err();
        match err {
            PatternError::InvalidPulse { index, error } => {
                assert_eq!(index, 1);
                assert!(matches!(error, IntervalError::Degenerate(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_builder_rejects_overlap() {
        let err = PatternBuilder::new()
            .pulse(0.0, 10.0)
            .pulse(20.0, 30.0)
            .pulse(25.0, 40.0)
            .build()
            .unwrap_err();
        match err {
            PatternError::Overlapping(e) => {
                assert_eq!(e.index(), 2);
                assert_eq!(e.previous().start(), 20.0);
                assert_eq!(e.next().start(), 25.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_out_of_order() {
        let err =
            Pattern::try_from_intervals(vec![iv(10.0, 20.0), iv(0.0, 5.0)], Tolerance::default())
                .unwrap_err();
        assert!(matches!(err, PatternError::Overlapping(_)));
    }

    #[test]
    fn test_rejects_reversed_pulse() {
        let err = Pattern::single(iv(10.0, 0.0)).unwrap_err();
        assert!(matches!(err, PatternError::ReversedPulse { index: 0, .. }));
    }

    #[test]
    fn test_custom_tolerance_is_kept() {
        let tol = Tolerance::new(0.5).unwrap();
        let p = PatternBuilder::new()
            .tolerance(tol)
            .pulse(0.0, 10.0)
            .pulse(9.8, 20.0)
            .build()
            .expect("overlap within tolerance is absorbed");
        assert_eq!(p.tolerance(), tol);
        assert!(
            PatternBuilder::new()
                .tolerance(tol)
                .pulse(0.0, 0.25)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_display() {
        let p = PatternBuilder::new()
            .interval(iv(0.0, 1.0))
            .pulse(2.0, 3.0)
            .build()
            .unwrap();
        assert_eq!(p.to_string(), "Pattern[[0, 1), [2, 3)]");
        assert_eq!((&p).into_iter().count(), 2);
    }
}
