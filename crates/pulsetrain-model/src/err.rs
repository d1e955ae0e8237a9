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

use pulsetrain_core::{
    TimeVariable,
    interval::{Interval, IntervalError},
};
use std::fmt::{Debug, Display};

#[derive(Debug, Clone, Copy)]
pub struct OverlappingPatternError<T: TimeVariable> {
    index: usize,
    previous: Interval<T>,
    next: Interval<T>,
}

impl<T: TimeVariable> OverlappingPatternError<T> {
    #[inline]
    pub fn new(index: usize, previous: Interval<T>, next: Interval<T>) -> Self {
        Self {
            index,
            previous,
            next,
        }
    }

    /// Index of the pulse that does not follow its predecessor.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn previous(&self) -> Interval<T> {
        self.previous
    }

    #[inline]
    pub fn next(&self) -> Interval<T> {
        self.next
    }
}

impl<T: TimeVariable> Display for OverlappingPatternError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pattern pulse {} {} does not strictly follow pulse {} {}",
            self.index,
            self.next,
            self.index - 1,
            self.previous
        )
    }
}

impl<T: TimeVariable> std::error::Error for OverlappingPatternError<T> {}

#[derive(Debug, Clone, Copy)]
pub enum PatternError<T: TimeVariable> {
    Empty,
    InvalidPulse {
        index: usize,
        error: IntervalError<T>,
    },
    ReversedPulse {
        index: usize,
        interval: Interval<T>,
    },
    Overlapping(OverlappingPatternError<T>),
}

impl<T: TimeVariable> Display for PatternError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternError::Empty => write!(f, "Pattern must contain at least one pulse"),
            PatternError::InvalidPulse { index, error } => {
                write!(f, "Pattern pulse {index} is invalid: {error}")
            }
            PatternError::ReversedPulse { index, interval } => {
                write!(f, "Pattern pulse {index} {interval} ends before it starts")
            }
            PatternError::Overlapping(e) => write!(f, "{e}"),
        }
    }
}

impl<T: TimeVariable> std::error::Error for PatternError<T> {}

impl<T: TimeVariable> From<OverlappingPatternError<T>> for PatternError<T> {
    fn from(err: OverlappingPatternError<T>) -> Self {
        PatternError::Overlapping(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidPeriodError<T: TimeVariable> {
    pri: T,
    duration: T,
}

impl<T: TimeVariable> InvalidPeriodError<T> {
    #[inline]
    pub fn new(pri: T, duration: T) -> Self {
        Self { pri, duration }
    }

    #[inline]
    pub fn pri(&self) -> T {
        self.pri
    }

    #[inline]
    pub fn duration(&self) -> T {
        self.duration
    }
}

impl<T: TimeVariable> Display for InvalidPeriodError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid period: pri {} must be positive and finite and duration {} must be finite and at least one pri",
            self.pri, self.duration
        )
    }
}

impl<T: TimeVariable> std::error::Error for InvalidPeriodError<T> {}

#[derive(Debug, Clone, Copy)]
pub struct PatternOutsidePeriodError<T: TimeVariable> {
    index: usize,
    interval: Interval<T>,
    pri: T,
}

impl<T: TimeVariable> PatternOutsidePeriodError<T> {
    #[inline]
    pub fn new(index: usize, interval: Interval<T>, pri: T) -> Self {
        Self {
            index,
            interval,
            pri,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn interval(&self) -> Interval<T> {
        self.interval
    }

    #[inline]
    pub fn pri(&self) -> T {
        self.pri
    }
}

impl<T: TimeVariable> Display for PatternOutsidePeriodError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pattern pulse {} {} lies outside the period [0, {})",
            self.index, self.interval, self.pri
        )
    }
}

impl<T: TimeVariable> std::error::Error for PatternOutsidePeriodError<T> {}

#[derive(Debug, Clone, Copy)]
pub struct OrderingViolationError<T: TimeVariable> {
    index: usize,
    interval: Interval<T>,
}

impl<T: TimeVariable> OrderingViolationError<T> {
    #[inline]
    pub fn new(index: usize, interval: Interval<T>) -> Self {
        Self { index, interval }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn interval(&self) -> Interval<T> {
        self.interval
    }
}

impl<T: TimeVariable> Display for OrderingViolationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Inserting {} at index {} would break the sorted, non-overlapping order of the train",
            self.interval, self.index
        )
    }
}

impl<T: TimeVariable> std::error::Error for OrderingViolationError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexOutOfBoundsError {
    index: usize,
    len: usize,
}

impl IndexOutOfBoundsError {
    #[inline]
    pub fn new(index: usize, len: usize) -> Self {
        Self { index, len }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl Display for IndexOutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Index {} out of bounds for length {}", self.index, self.len)
    }
}

impl std::error::Error for IndexOutOfBoundsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnsupportedOperationError {
    operation: &'static str,
    hint: &'static str,
}

impl UnsupportedOperationError {
    #[inline]
    pub fn new(operation: &'static str, hint: &'static str) -> Self {
        Self { operation, hint }
    }

    #[inline]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    #[inline]
    pub fn hint(&self) -> &'static str {
        self.hint
    }
}

impl Display for UnsupportedOperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unsupported operation: {} ({})", self.operation, self.hint)
    }
}

impl std::error::Error for UnsupportedOperationError {}

#[derive(Debug, Clone, Copy)]
pub enum TrainError<T: TimeVariable> {
    MissingPri,
    Pattern(PatternError<T>),
    InvalidPeriod(InvalidPeriodError<T>),
    PatternOutsidePeriod(PatternOutsidePeriodError<T>),
    OrderingViolation(OrderingViolationError<T>),
    IndexOutOfBounds(IndexOutOfBoundsError),
    UnsupportedOperation(UnsupportedOperationError),
}

impl<T: TimeVariable> Display for TrainError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TrainError::*;
        match self {
            MissingPri => write!(f, "Missing pri"),
            Pattern(e) => write!(f, "{e}"),
            InvalidPeriod(e) => write!(f, "{e}"),
            PatternOutsidePeriod(e) => write!(f, "{e}"),
            OrderingViolation(e) => write!(f, "{e}"),
            IndexOutOfBounds(e) => write!(f, "{e}"),
            UnsupportedOperation(e) => write!(f, "{e}"),
        }
    }
}

impl<T: TimeVariable + Debug> std::error::Error for TrainError<T> {}

impl<T: TimeVariable> From<PatternError<T>> for TrainError<T> {
    fn from(err: PatternError<T>) -> Self {
        TrainError::Pattern(err)
    }
}

impl<T: TimeVariable> From<OverlappingPatternError<T>> for TrainError<T> {
    fn from(err: OverlappingPatternError<T>) -> Self {
        TrainError::Pattern(PatternError::Overlapping(err))
    }
}

impl<T: TimeVariable> From<InvalidPeriodError<T>> for TrainError<T> {
    fn from(err: InvalidPeriodError<T>) -> Self {
        TrainError::InvalidPeriod(err)
    }
}

impl<T: TimeVariable> From<PatternOutsidePeriodError<T>> for TrainError<T> {
    fn from(err: PatternOutsidePeriodError<T>) -> Self {
        TrainError::PatternOutsidePeriod(err)
    }
}

impl<T: TimeVariable> From<OrderingViolationError<T>> for TrainError<T> {
    fn from(err: OrderingViolationError<T>) -> Self {
        TrainError::OrderingViolation(err)
    }
}

impl<T: TimeVariable> From<IndexOutOfBoundsError> for TrainError<T> {
    fn from(err: IndexOutOfBoundsError) -> Self {
        TrainError::IndexOutOfBounds(err)
    }
}

impl<T: TimeVariable> From<UnsupportedOperationError> for TrainError<T> {
    fn from(err: UnsupportedOperationError) -> Self {
        TrainError::UnsupportedOperation(err)
    }
}
