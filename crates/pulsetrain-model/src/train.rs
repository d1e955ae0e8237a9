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

//! # Periodic Trains
//!
//! A [`PeriodicTrain`] repeats a [`Pattern`] every `pri` time units across an
//! observation window `[0, duration)` and keeps the resulting pulses as one
//! flat, sorted sequence (the *materialized* sequence).
//!
//! The window is treated as a ring: shifting the phase rotates every pulse
//! around it. A pulse that ends up crossing the cut point at `duration` is
//! stored as two pieces, a tail `[start, duration)` at the end of the
//! sequence and a head `[0, overhang)` at the front. Indexing, iteration and
//! binary search therefore keep working on a plain sorted slice, and no call
//! site needs modular arithmetic. The next shift merges the two pieces back
//! before rotating again, so consecutive shifts compose exactly.

use crate::{
    err::{
        IndexOutOfBoundsError, InvalidPeriodError, OrderingViolationError, PatternError,
        PatternOutsidePeriodError, TrainError, UnsupportedOperationError,
    },
    pattern::{Pattern, PatternBuilder},
};
use pulsetrain_core::{
    TimeVariable, count_to_time, interval::Interval, sum::NeumaierSum, tolerance::Tolerance,
};
use std::{
    cmp::Ordering,
    fmt::Display,
    ops::{Bound, Index, RangeBounds},
};
use tracing::{debug, instrument, trace};

/// Reduces `t` onto the ring `[0, duration)`.
///
/// Values within tolerance of `duration` snap to `0` so that a full
/// rotation never produces a sliver just below the cut point.
#[inline]
fn wrap_time<T: TimeVariable>(t: T, duration: T, tol: &Tolerance<T>) -> T {
    let mut r = t % duration;
    if r.is_sign_negative() {
        r = r + duration;
    }
    if r >= duration || tol.approx_eq(r, duration) {
        T::zero()
    } else {
        r
    }
}

/// A pattern of pulses repeated every `pri` over `[0, duration)`.
///
/// # Invariants
///
/// - The materialized sequence is sorted by start time and consecutive
///   pulses do not overlap (within tolerance).
/// - Every pulse lies within `[0, duration]`.
/// - The total pulse width equals `periods() * pattern().total_width()`
///   regardless of how often the phase has been shifted.
/// - Right after construction (or [`reset_phase`](Self::reset_phase)) the
///   sequence holds `pattern().len() * periods()` pulses. While a pulse is
///   split across the cut point it holds one more.
///
/// # Examples
///
/// ```
/// use pulsetrain_model::train::PeriodicTrainBuilder;
///
/// let mut train = PeriodicTrainBuilder::new()
///     .pri(1000.0)
///     .pulse(0.0, 10.0)
///     .pulse(500.0, 510.0)
///     .build()
///     .unwrap();
///
/// train.shift_phase(995.0);
/// let starts: Vec<f64> = train.iter().map(|p| p.start()).collect();
/// assert_eq!(train.len(), 3);
/// assert_eq!(starts, vec![0.0, 495.0, 995.0]);
///
/// train.shift_phase(5.0);
/// assert_eq!(train.len(), 2);
/// assert_eq!(train[1].start(), 500.0);
/// ```
#[derive(Debug, Clone)]
pub struct PeriodicTrain<T: TimeVariable = f64> {
    pri: T,
    duration: T,
    periods: usize,
    pattern: Pattern<T>,
    intervals: Vec<Interval<T>>,
    phase: T,
    // A head piece from a wraparound split sits at index 0.
    wrapped: bool,
}

impl<T: TimeVariable> PeriodicTrain<T> {
    /// A train that spans exactly one period.
    #[inline]
    pub fn new(pri: T, pattern: Pattern<T>) -> Result<Self, TrainError<T>> {
        Self::with_duration(pri, pri, pattern)
    }

    /// Creates a train observing `pattern` every `pri` over `[0, duration)`.
    ///
    /// The number of materialized periods is `floor(duration / pri)`. Any
    /// remainder of the window stays empty.
    ///
    /// # Errors
    ///
    /// - [`TrainError::InvalidPeriod`] if `pri` is not positive and finite or
    ///   `duration` is not finite or shorter than `pri`.
    /// - [`TrainError::PatternOutsidePeriod`] if a pulse leaves `[0, pri]`.
    #[instrument(level = "debug", skip_all, fields(pri = %pri, duration = %duration), err(Display))]
    pub fn with_duration(pri: T, duration: T, pattern: Pattern<T>) -> Result<Self, TrainError<T>> {
        let tol = pattern.tolerance();
        if !pri.is_finite()
            || !duration.is_finite()
            || !tol.exceeds(pri, T::zero())
            || !tol.at_or_before(pri, duration)
        {
            return Err(InvalidPeriodError::new(pri, duration).into());
        }

        let (first, last) = (pattern.first(), pattern.last());
        if !tol.at_or_before(T::zero(), first.start()) {
            return Err(PatternOutsidePeriodError::new(0, first, pri).into());
        }
        if !tol.at_or_before(last.end(), pri) {
            return Err(PatternOutsidePeriodError::new(pattern.len() - 1, last, pri).into());
        }

        let periods = ((duration + tol.epsilon()) / pri)
            .floor()
            .to_usize()
            .ok_or_else(|| InvalidPeriodError::new(pri, duration))?;
        let intervals = Self::materialize(pri, periods, &pattern);

        debug!(
            periods,
            pulses = intervals.len(),
            "materialized periodic train"
        );

        Ok(Self {
            pri,
            duration,
            periods,
            pattern,
            intervals,
            phase: T::zero(),
            wrapped: false,
        })
    }

    fn materialize(pri: T, periods: usize, pattern: &Pattern<T>) -> Vec<Interval<T>> {
        let mut out = Vec::with_capacity(periods * pattern.len());
        for k in 0..periods {
            let offset = count_to_time::<T, _>(k) * pri;
            out.extend(pattern.iter().map(|p| p.translated(offset)));
        }
        out
    }

    #[inline]
    pub fn pri(&self) -> T {
        self.pri
    }

    #[inline]
    pub fn duration(&self) -> T {
        self.duration
    }

    /// Number of whole periods materialized, `floor(duration / pri)`.
    #[inline]
    pub fn periods(&self) -> usize {
        self.periods
    }

    #[inline]
    pub fn pattern(&self) -> &Pattern<T> {
        &self.pattern
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance<T> {
        self.pattern.tolerance()
    }

    /// Accumulated phase offset, in `[0, duration)`.
    #[inline]
    pub fn phase(&self) -> T {
        self.phase
    }

    /// `true` while one pulse is stored as a head and a tail piece.
    #[inline]
    pub fn is_split(&self) -> bool {
        self.wrapped
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Interval<T>> {
        self.intervals.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Interval<T>] {
        &self.intervals
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Interval<T>> {
        self.intervals.iter()
    }

    /// Sum of the widths of all materialized pulses.
    pub fn total_width(&self) -> T {
        self.intervals
            .iter()
            .map(Interval::width)
            .collect::<NeumaierSum<T>>()
            .total()
    }

    /// Fraction of each period during which the train is emitting.
    #[inline]
    pub fn duty_cycle(&self) -> T {
        self.pattern.total_width() / self.pri
    }

    /// Slicing the materialized sequence is not supported.
    ///
    /// A slice of a rotated ring has no well-defined pri or duration. Use
    /// [`from_pattern_range`](Self::from_pattern_range) to build a train from
    /// part of the pattern instead.
    ///
    /// # Errors
    ///
    /// Always returns [`TrainError::UnsupportedOperation`].
    pub fn slice<R: RangeBounds<usize>>(&self, _range: R) -> Result<Self, TrainError<T>> {
        Err(UnsupportedOperationError::new(
            "slicing a materialized periodic train",
            "slice the pattern with `from_pattern_range` instead",
        )
        .into())
    }

    /// Builds a new train with the same pri, duration and tolerance from the
    /// pattern pulses selected by `range`.
    pub fn from_pattern_range<R>(&self, range: R) -> Result<Self, TrainError<T>>
    where
        R: RangeBounds<usize>,
    {
        let len = self.pattern.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if end > len || start > end {
            return Err(IndexOutOfBoundsError::new(end.max(start), len).into());
        }
        if start == end {
            return Err(PatternError::Empty.into());
        }
        let pattern = Pattern::from_validated_slice(
            &self.pattern.as_slice()[start..end],
            self.pattern.tolerance(),
        );
        Self::with_duration(self.pri, self.duration, pattern)
    }

    /// Inserts `interval` into the materialized sequence at `index`.
    ///
    /// The interval must precede the pulse currently at `index`, follow the
    /// pulse at `index - 1`, and lie within `[0, duration]`. Inserted pulses
    /// take part in later phase shifts but are not part of the pattern, so
    /// [`reset_phase`](Self::reset_phase) drops them.
    ///
    /// # Errors
    ///
    /// - [`TrainError::IndexOutOfBounds`] if `index > len()`.
    /// - [`TrainError::OrderingViolation`] if the insertion would break the
    ///   ordering invariant.
    pub fn insert(&mut self, index: usize, interval: Interval<T>) -> Result<(), TrainError<T>> {
        if index > self.intervals.len() {
            return Err(IndexOutOfBoundsError::new(index, self.intervals.len()).into());
        }
        let tol = self.tolerance();
        let violation = || OrderingViolationError::new(index, interval);

        if interval.width() <= T::zero()
            || !tol.at_or_before(T::zero(), interval.start())
            || !tol.at_or_before(interval.end(), self.duration)
        {
            return Err(violation().into());
        }
        // Head and tail of a split pulse must stay at both ends so the next
        // shift can merge them.
        if self.wrapped && (index == 0 || index == self.intervals.len()) {
            return Err(violation().into());
        }
        if let Some(next) = self.intervals.get(index) {
            if !interval.precedes(next, &tol) {
                return Err(violation().into());
            }
        }
        if index > 0 && !self.intervals[index - 1].precedes(&interval, &tol) {
            return Err(violation().into());
        }

        self.intervals.insert(index, interval);
        Ok(())
    }

    /// Rotates every pulse by `delta` around the ring `[0, duration)`.
    ///
    /// `delta` may be negative or larger than `duration`. Shifting by `d1`
    /// and then by `d2` yields the same train as shifting once by `d1 + d2`.
    /// The total pulse width is preserved.
    pub fn shift_phase(&mut self, delta: T) {
        self.merge_split_pulse();
        self.rotate(delta);
        self.split_overhang();

        let tol = self.tolerance();
        self.phase = wrap_time(self.phase + delta, self.duration, &tol);

        trace!(
            delta = %delta,
            phase = %self.phase,
            pulses = self.intervals.len(),
            split = self.wrapped,
            "shifted train phase"
        );
        debug_assert!(self.is_well_formed(), "shift_phase broke the train invariants");
    }

    /// Regenerates the materialized sequence from the pattern at phase zero.
    pub fn reset_phase(&mut self) {
        self.intervals = Self::materialize(self.pri, self.periods, &self.pattern);
        self.phase = T::zero();
        self.wrapped = false;
    }

    /// A copy of this train's pattern materialized and shifted to `phase`.
    ///
    /// The result depends only on the pattern, pri, duration and `phase`, not
    /// on the shifts applied to `self`.
    pub fn shifted_to(&self, phase: T) -> Self {
        let mut out = Self {
            pri: self.pri,
            duration: self.duration,
            periods: self.periods,
            pattern: self.pattern.clone(),
            intervals: Self::materialize(self.pri, self.periods, &self.pattern),
            phase: T::zero(),
            wrapped: false,
        };
        out.shift_phase(phase);
        out
    }

    fn merge_split_pulse(&mut self) {
        if !self.wrapped {
            return;
        }
        let head = self.intervals.remove(0);
        if let Some(tail) = self.intervals.last_mut() {
            *tail = Interval::new_unchecked(tail.start(), tail.end() + head.width());
        }
        self.wrapped = false;
    }

    fn rotate(&mut self, delta: T) {
        let duration = self.duration;
        let tol = self.tolerance();
        for pulse in &mut self.intervals {
            let width = pulse.width();
            let start = wrap_time(pulse.start() + delta, duration, &tol);
            *pulse = Interval::new_unchecked(start, start + width);
        }
        // Rotation leaves two sorted runs.
        self.intervals.sort_by(|a, b| {
            a.start()
                .partial_cmp(&b.start())
                .unwrap_or(Ordering::Equal)
        });
    }

    fn split_overhang(&mut self) {
        let tol = self.tolerance();
        let duration = self.duration;
        let Some(&last) = self.intervals.last() else {
            return;
        };
        let overhang = last.end() - duration;
        if !tol.exceeds(overhang, T::zero()) {
            return;
        }

        let n = self.intervals.len();
        debug_assert!(
            self.intervals[..n - 1]
                .iter()
                .all(|p| tol.at_or_before(p.end(), duration)),
            "more than one pulse crosses the end of the window"
        );

        self.intervals[n - 1] = Interval::new_unchecked(last.start(), duration);
        let first = self.intervals[0];
        if n > 1 && tol.approx_eq(first.end(), overhang) {
            // The head region is already occupied up to the overhang.
            self.intervals[0] = Interval::new_unchecked(T::zero(), first.end());
        } else {
            self.intervals.insert(0, Interval::new_unchecked(T::zero(), overhang));
            self.wrapped = true;
        }
    }

    fn is_well_formed(&self) -> bool {
        let tol = self.tolerance();
        let in_window = self.intervals.iter().all(|p| {
            tol.at_or_before(T::zero(), p.start()) && tol.at_or_before(p.end(), self.duration)
        });
        let ordered = self
            .intervals
            .windows(2)
            .all(|w| w[0].precedes(&w[1], &tol));
        in_window && ordered
    }
}

impl<T: TimeVariable> Index<usize> for PeriodicTrain<T> {
    type Output = Interval<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.intervals[index]
    }
}

impl<'a, T: TimeVariable> IntoIterator for &'a PeriodicTrain<T> {
    type Item = &'a Interval<T>;
    type IntoIter = std::slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl<T: TimeVariable> Display for PeriodicTrain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PeriodicTrain {{ pri: {}, duration: {}, phase: {}, pulses: {}, pattern: {} }}",
            self.pri,
            self.duration,
            self.phase,
            self.intervals.len(),
            self.pattern
        )
    }
}

/// Builder for [`PeriodicTrain`].
///
/// `pri` is required. `duration` defaults to `pri`.
#[derive(Debug, Clone)]
pub struct PeriodicTrainBuilder<T: TimeVariable = f64> {
    pri: Option<T>,
    duration: Option<T>,
    pattern: PatternBuilder<T>,
}

impl<T: TimeVariable> Default for PeriodicTrainBuilder<T> {
    fn default() -> Self {
        Self {
            pri: None,
            duration: None,
            pattern: PatternBuilder::new(),
        }
    }
}

impl<T: TimeVariable> PeriodicTrainBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn pri(mut self, pri: T) -> Self {
        self.pri = Some(pri);
        self
    }

    #[inline]
    pub fn duration(mut self, duration: T) -> Self {
        self.duration = Some(duration);
        self
    }

    #[inline]
    pub fn tolerance(mut self, tolerance: Tolerance<T>) -> Self {
        self.pattern = self.pattern.tolerance(tolerance);
        self
    }

    #[inline]
    pub fn pulse(mut self, start: T, end: T) -> Self {
        self.pattern = self.pattern.pulse(start, end);
        self
    }

    #[inline]
    pub fn interval(mut self, interval: Interval<T>) -> Self {
        self.pattern = self.pattern.interval(interval);
        self
    }

    pub fn pulses<I>(mut self, bounds: I) -> Self
    where
        I: IntoIterator<Item = (T, T)>,
    {
        self.pattern = self.pattern.pulses(bounds);
        self
    }

    pub fn build(self) -> Result<PeriodicTrain<T>, TrainError<T>> {
        let pri = self.pri.ok_or(TrainError::MissingPri)?;
        let duration = self.duration.unwrap_or(pri);
        let pattern = self.pattern.build()?;
        PeriodicTrain::with_duration(pri, duration, pattern)
    }
}
