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

use crate::config::Method;
use pulsetrain_core::TimeVariable;
use std::fmt::{Debug, Display};

/// Two trains do not observe the same window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationMismatchError<T: TimeVariable> {
    reference: T,
    probe: T,
}

impl<T: TimeVariable> DurationMismatchError<T> {
    #[inline]
    pub fn new(reference: T, probe: T) -> Self {
        Self { reference, probe }
    }

    #[inline]
    pub fn reference(&self) -> T {
        self.reference
    }

    #[inline]
    pub fn probe(&self) -> T {
        self.probe
    }
}

impl<T: TimeVariable> Display for DurationMismatchError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Train durations differ: reference observes {} but probe observes {}",
            self.reference, self.probe
        )
    }
}

impl<T: TimeVariable> std::error::Error for DurationMismatchError<T> {}

/// The step size leaves no complete step inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncrementExceedsDurationError<T: TimeVariable> {
    increment: T,
    duration: T,
}

impl<T: TimeVariable> IncrementExceedsDurationError<T> {
    #[inline]
    pub fn new(increment: T, duration: T) -> Self {
        Self {
            increment,
            duration,
        }
    }

    #[inline]
    pub fn increment(&self) -> T {
        self.increment
    }

    #[inline]
    pub fn duration(&self) -> T {
        self.duration
    }
}

impl<T: TimeVariable> Display for IncrementExceedsDurationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Increment {} exceeds the train duration {}",
            self.increment, self.duration
        )
    }
}

impl<T: TimeVariable> std::error::Error for IncrementExceedsDurationError<T> {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationConfigError<T: TimeVariable> {
    NonPositiveIncrement(T),
    ThresholdOutOfRange(T),
    NonFinite { field: &'static str, value: T },
}

impl<T: TimeVariable> Display for SimulationConfigError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SimulationConfigError::*;
        match self {
            NonPositiveIncrement(v) => write!(f, "Increment must be positive, got {}", v),
            ThresholdOutOfRange(v) => write!(f, "Threshold must lie in [0, 1), got {}", v),
            NonFinite { field, value } => write!(f, "{} must be finite, got {}", field, value),
        }
    }
}

impl<T: TimeVariable> std::error::Error for SimulationConfigError<T> {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoincidenceError<T: TimeVariable> {
    DurationMismatch(DurationMismatchError<T>),
    MethodNotImplemented(Method),
    IncrementExceedsDuration(IncrementExceedsDurationError<T>),
    Config(SimulationConfigError<T>),
}

impl<T: TimeVariable> Display for CoincidenceError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CoincidenceError::*;
        match self {
            DurationMismatch(e) => write!(f, "{}", e),
            MethodNotImplemented(m) => {
                write!(f, "Coincidence method `{}` is not implemented", m)
            }
            IncrementExceedsDuration(e) => write!(f, "{}", e),
            Config(e) => write!(f, "Invalid simulation config: {}", e),
        }
    }
}

impl<T: TimeVariable + Debug> std::error::Error for CoincidenceError<T> {}

impl<T: TimeVariable> From<DurationMismatchError<T>> for CoincidenceError<T> {
    fn from(err: DurationMismatchError<T>) -> Self {
        CoincidenceError::DurationMismatch(err)
    }
}

impl<T: TimeVariable> From<IncrementExceedsDurationError<T>> for CoincidenceError<T> {
    fn from(err: IncrementExceedsDurationError<T>) -> Self {
        CoincidenceError::IncrementExceedsDuration(err)
    }
}

impl<T: TimeVariable> From<SimulationConfigError<T>> for CoincidenceError<T> {
    fn from(err: SimulationConfigError<T>) -> Self {
        CoincidenceError::Config(err)
    }
}
