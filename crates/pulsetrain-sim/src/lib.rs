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

//! # Pulse Train Coincidence
//!
//! Estimates how often a probe pulse train overlaps the pulses of a
//! reference train when the probe's phase is unknown.
//!
//! [`coincidence::simulate`] sweeps the probe's phase across the common
//! observation window, either on the calling thread or spread over the
//! rayon pool ([`config::Execution`]). Both modes count the same
//! coincidences.

pub mod coincidence;
pub mod config;
pub mod err;

pub mod prelude {
    pub use crate::coincidence::{CoincidenceReport, coincidence_fraction, simulate};
    pub use crate::config::{Execution, Method, SimulationConfig, SimulationConfigBuilder};
    pub use crate::err::{
        CoincidenceError, DurationMismatchError, IncrementExceedsDurationError,
        SimulationConfigError,
    };
}
