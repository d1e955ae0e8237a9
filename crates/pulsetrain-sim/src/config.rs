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

use crate::err::SimulationConfigError;
use pulsetrain_core::{TimeVariable, tolerance::Tolerance};
use std::fmt::Display;

/// How the coincidence fraction is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Sweep the probe's phase across the window and count coincidences.
    #[default]
    Simulation,
    /// Closed-form evaluation. Not available yet.
    Formula,
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Simulation => write!(f, "simulation"),
            Method::Formula => write!(f, "formula"),
        }
    }
}

/// How the phase sweep is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Execution {
    /// One probe copy, shifted step by step.
    #[default]
    Sequential,
    /// Steps fan out over the rayon pool, each with its own probe copy.
    Parallel,
}

impl Display for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Execution::Sequential => write!(f, "sequential"),
            Execution::Parallel => write!(f, "parallel"),
        }
    }
}

/// Parameters of a coincidence estimation.
///
/// `increment` is the phase step of the sweep and the main precision versus
/// runtime knob. A reference pulse counts as coincident once a probe pulse
/// covers more than `threshold` of its width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig<T: TimeVariable = f64> {
    pub(crate) method: Method,
    pub(crate) increment: T,
    pub(crate) threshold: T,
    pub(crate) tolerance: Tolerance<T>,
    pub(crate) execution: Execution,
}

impl<T: TimeVariable> Default for SimulationConfig<T> {
    fn default() -> Self {
        Self {
            method: Method::Simulation,
            increment: T::one(),
            threshold: T::zero(),
            tolerance: Tolerance::default(),
            execution: Execution::Sequential,
        }
    }
}

impl<T: TimeVariable> SimulationConfig<T> {
    #[inline]
    pub fn builder() -> SimulationConfigBuilder<T> {
        SimulationConfigBuilder::new()
    }

    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    #[inline]
    pub fn increment(&self) -> T {
        self.increment
    }

    #[inline]
    pub fn threshold(&self) -> T {
        self.threshold
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance<T> {
        self.tolerance
    }

    #[inline]
    pub fn execution(&self) -> Execution {
        self.execution
    }

    pub fn validate(&self) -> Result<(), SimulationConfigError<T>> {
        use SimulationConfigError::*;
        if !self.increment.is_finite() {
            return Err(NonFinite {
                field: "increment",
                value: self.increment,
            });
        }
        if !self.threshold.is_finite() {
            return Err(NonFinite {
                field: "threshold",
                value: self.threshold,
            });
        }
        if self.increment <= T::zero() {
            return Err(NonPositiveIncrement(self.increment));
        }
        if self.threshold < T::zero() || self.threshold >= T::one() {
            return Err(ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }
}

impl<T: TimeVariable> Display for SimulationConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SimulationConfig {{ method: {}, increment: {}, threshold: {}, {}, execution: {} }}",
            self.method, self.increment, self.threshold, self.tolerance, self.execution
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfigBuilder<T: TimeVariable = f64> {
    config: SimulationConfig<T>,
}

impl<T: TimeVariable> Default for SimulationConfigBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeVariable> SimulationConfigBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
        }
    }

    #[inline]
    pub fn method(mut self, method: Method) -> Self {
        self.config.method = method;
        self
    }

    #[inline]
    pub fn increment(mut self, increment: T) -> Self {
        self.config.increment = increment;
        self
    }

    #[inline]
    pub fn threshold(mut self, threshold: T) -> Self {
        self.config.threshold = threshold;
        self
    }

    #[inline]
    pub fn tolerance(mut self, tolerance: Tolerance<T>) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn execution(mut self, execution: Execution) -> Self {
        self.config.execution = execution;
        self
    }

    pub fn build(self) -> Result<SimulationConfig<T>, SimulationConfigError<T>> {
        self.config.validate()?;
        Ok(self.config)
    }
}
