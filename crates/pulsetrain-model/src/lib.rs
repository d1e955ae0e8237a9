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

//! # Pulse Train Model
//!
//! Validated pulse patterns and the periodic trains built from them.
//!
//! A [`pattern::Pattern`] is the sorted, non-overlapping list of pulses
//! emitted within one pulse repetition interval (pri). A
//! [`train::PeriodicTrain`] repeats it across an observation window and
//! supports circular phase shifts of the whole window.

pub mod err;
pub mod pattern;
pub mod train;

pub mod prelude {
    pub use crate::err::{
        IndexOutOfBoundsError, InvalidPeriodError, OrderingViolationError,
        OverlappingPatternError, PatternError, PatternOutsidePeriodError, TrainError,
        UnsupportedOperationError,
    };
    pub use crate::pattern::{Pattern, PatternBuilder};
    pub use crate::train::{PeriodicTrain, PeriodicTrainBuilder};
}
