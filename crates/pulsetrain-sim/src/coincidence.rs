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

//! Phase-sweep estimation of how often two pulse trains coincide.
//!
//! The probe train is rotated through the observation window in steps of
//! `increment`. At every step each reference pulse is checked against the
//! probe pulses that could overlap it, found by binary search over the
//! probe's sorted sequence. A reference pulse is coincident when one probe
//! pulse covers more than `threshold` of its width. The coincidence
//! fraction is the share of coincident (step, reference pulse) pairs.

use crate::{
    config::{Execution, Method, SimulationConfig},
    err::{CoincidenceError, DurationMismatchError, IncrementExceedsDurationError},
};
use pulsetrain_core::{
    TimeVariable, count_to_time, interval::Interval, sum::NeumaierSum, tolerance::Tolerance,
};
use pulsetrain_model::train::PeriodicTrain;
use rayon::prelude::*;
use std::fmt::Display;
use tracing::{debug, instrument, trace};

/// Outcome of a phase sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoincidenceReport<T: TimeVariable = f64> {
    fraction: T,
    coincident: u64,
    examined: u64,
    steps: usize,
    mean_covered_fraction: T,
}

impl<T: TimeVariable> CoincidenceReport<T> {
    /// `coincident / examined`, in `[0, 1]`.
    #[inline]
    pub fn fraction(&self) -> T {
        self.fraction
    }

    /// Number of (step, reference pulse) pairs that coincided.
    #[inline]
    pub fn coincident(&self) -> u64 {
        self.coincident
    }

    /// Number of (step, reference pulse) pairs examined.
    #[inline]
    pub fn examined(&self) -> u64 {
        self.examined
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Mean over all examined pairs of the largest share of the reference
    /// pulse covered by a single probe pulse.
    #[inline]
    pub fn mean_covered_fraction(&self) -> T {
        self.mean_covered_fraction
    }
}

impl<T: TimeVariable> Display for CoincidenceReport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CoincidenceReport {{ fraction: {}, coincident: {}/{}, steps: {}, mean covered: {} }}",
            self.fraction, self.coincident, self.examined, self.steps, self.mean_covered_fraction
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct StepTally<T: TimeVariable> {
    coincident: u64,
    examined: u64,
    covered: NeumaierSum<T>,
}

impl<T: TimeVariable> Default for StepTally<T> {
    fn default() -> Self {
        Self {
            coincident: 0,
            examined: 0,
            covered: NeumaierSum::new(),
        }
    }
}

impl<T: TimeVariable> StepTally<T> {
    #[inline]
    fn merge(self, other: Self) -> Self {
        Self {
            coincident: self.coincident + other.coincident,
            examined: self.examined + other.examined,
            covered: self.covered.merge(other.covered),
        }
    }
}

/// Counts the reference pulses that coincide with `probe` at one phase.
///
/// Both slices must be sorted and non-overlapping. Scanning continues past
/// the first covering probe pulse to record the best coverage, but each
/// reference pulse is credited at most once per step.
fn count_step<T: TimeVariable>(
    reference: &[Interval<T>],
    probe: &[Interval<T>],
    threshold: T,
    tol: &Tolerance<T>,
) -> StepTally<T> {
    let mut tally = StepTally::default();
    for pulse in reference {
        let first = probe.partition_point(|c| c.precedes(pulse, tol));
        let mut best = T::zero();
        let mut hit = false;
        for candidate in probe[first..]
            .iter()
            .take_while(|c| c.start() < pulse.end())
        {
            let covered = pulse.proportional_overlap(candidate);
            best = best.max(covered);
            hit |= tol.exceeds(covered, threshold);
        }
        tally.examined += 1;
        if hit {
            tally.coincident += 1;
        }
        tally.covered.add(best);
    }
    tally
}

fn sweep_sequential<T: TimeVariable>(
    reference: &PeriodicTrain<T>,
    probe: &PeriodicTrain<T>,
    steps: usize,
    config: &SimulationConfig<T>,
) -> StepTally<T> {
    let tol = config.tolerance();
    let mut probe = probe.clone();
    let mut tally = StepTally::default();
    for s in 0..steps {
        let step = count_step(reference.as_slice(), probe.as_slice(), config.threshold(), &tol);
        trace!(step = s, coincident = step.coincident, "step counted");
        tally = tally.merge(step);
        probe.shift_phase(config.increment());
    }
    tally
}

fn sweep_parallel<T: TimeVariable>(
    reference: &PeriodicTrain<T>,
    probe: &PeriodicTrain<T>,
    steps: usize,
    config: &SimulationConfig<T>,
) -> StepTally<T> {
    let tol = config.tolerance();
    (0..steps)
        .into_par_iter()
        .map(|s| {
            let mut shifted = probe.clone();
            shifted.shift_phase(count_to_time::<T, _>(s) * config.increment());
            let step =
                count_step(reference.as_slice(), shifted.as_slice(), config.threshold(), &tol);
            trace!(step = s, coincident = step.coincident, "step counted");
            step
        })
        .reduce(StepTally::default, StepTally::merge)
}

/// Sweeps `probe` across the window and reports how often it coincides with
/// `reference`.
///
/// Neither train is modified. The sweep starts at the probe's current
/// phase and runs `floor(duration / increment)` steps.
///
/// # Errors
///
/// - [`CoincidenceError::Config`] if `config` fails validation.
/// - [`CoincidenceError::DurationMismatch`] if the trains observe windows
///   of different length.
/// - [`CoincidenceError::MethodNotImplemented`] for [`Method::Formula`].
/// - [`CoincidenceError::IncrementExceedsDuration`] if not even one step
///   fits in the window.
#[instrument(
    level = "debug",
    skip_all,
    fields(
        method = %config.method(),
        execution = %config.execution(),
        increment = %config.increment()
    ),
    err(Display)
)]
pub fn simulate<T: TimeVariable>(
    reference: &PeriodicTrain<T>,
    probe: &PeriodicTrain<T>,
    config: &SimulationConfig<T>,
) -> Result<CoincidenceReport<T>, CoincidenceError<T>> {
    config.validate()?;
    let tol = config.tolerance();
    let duration = reference.duration();
    if !tol.approx_eq(duration, probe.duration()) {
        return Err(DurationMismatchError::new(duration, probe.duration()).into());
    }
    if config.method() != Method::Simulation {
        return Err(CoincidenceError::MethodNotImplemented(config.method()));
    }

    let steps = (duration / config.increment())
        .floor()
        .to_usize()
        .filter(|&s| s > 0)
        .ok_or_else(|| IncrementExceedsDurationError::new(config.increment(), duration))?;

    debug!(
        steps,
        reference_pulses = reference.len(),
        probe_pulses = probe.len(),
        "starting coincidence sweep"
    );
    let tally = match config.execution() {
        Execution::Sequential => sweep_sequential(reference, probe, steps, config),
        Execution::Parallel => sweep_parallel(reference, probe, steps, config),
    };

    let examined = count_to_time::<T, _>(tally.examined);
    let report = CoincidenceReport {
        fraction: count_to_time::<T, _>(tally.coincident) / examined,
        coincident: tally.coincident,
        examined: tally.examined,
        steps,
        mean_covered_fraction: tally.covered.total() / examined,
    };

    debug!(
        steps,
        coincident = report.coincident,
        examined = report.examined,
        fraction = %report.fraction,
        "coincidence sweep finished"
    );
    Ok(report)
}

/// Fraction of (step, reference pulse) pairs at which `probe` covers more
/// than `threshold` of the reference pulse.
///
/// See [`simulate`] for the full report and error conditions.
///
/// # Examples
///
/// ```
/// use pulsetrain_model::train::{PeriodicTrain, PeriodicTrainBuilder};
/// use pulsetrain_sim::{coincidence::coincidence_fraction, config::SimulationConfig};
///
/// let reference: PeriodicTrain = PeriodicTrainBuilder::new()
///     .pri(100.0)
///     .pulse(0.0, 1.0)
///     .build()
///     .unwrap();
/// let probe: PeriodicTrain = PeriodicTrainBuilder::new()
///     .pri(100.0)
///     .pulse(0.0, 10.0)
///     .build()
///     .unwrap();
///
/// let fraction = coincidence_fraction(&reference, &probe, &SimulationConfig::default()).unwrap();
/// assert!((fraction - 0.1).abs() < 1e-12);
/// ```
pub fn coincidence_fraction<T: TimeVariable>(
    reference: &PeriodicTrain<T>,
    probe: &PeriodicTrain<T>,
    config: &SimulationConfig<T>,
) -> Result<T, CoincidenceError<T>> {
    simulate(reference, probe, config).map(|r| r.fraction())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::SimulationConfigError;
    use pulsetrain_model::train::PeriodicTrainBuilder;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use static_assertions::assert_impl_all;

    assert_impl_all!(CoincidenceReport<f64>: Send, Sync, Copy);

    const PROBE_PULSES: [(f64, f64); 7] = [
        (0.0, 0.2),
        (37.5, 37.7),
        (75.0, 75.2),
        (112.5, 112.7),
        (150.0, 162.0),
        (300.0, 312.0),
        (450.0, 570.0),
    ];

    fn magnetron() -> PeriodicTrain {
        PeriodicTrainBuilder::new()
            .pri(1000.0)
            .duration(6000.0)
            .pulse(0.0, 1.0)
            .build()
            .expect("valid reference")
    }

    fn solid_state() -> PeriodicTrain {
        PeriodicTrainBuilder::new()
            .pri(1200.0)
            .duration(6000.0)
            .pulses(PROBE_PULSES)
            .build()
            .expect("valid probe")
    }

    fn config(increment: f64, threshold: f64, execution: Execution) -> SimulationConfig {
        SimulationConfig::builder()
            .increment(increment)
            .threshold(threshold)
            .execution(execution)
            .build()
            .expect("valid config")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_radar_scenario_any_overlap() {
        let report = simulate(
            &magnetron(),
            &solid_state(),
            &config(1.0, 0.0, Execution::Sequential),
        )
        .unwrap();
        assert_eq!(report.steps(), 6000);
        assert_eq!(report.examined(), 36_000);
        assert_eq!(report.coincident(), 6 * 740);
        assert_close(report.fraction(), 740.0 / 6000.0);
    }

    #[test]
    fn test_radar_scenario_half_coverage() {
        let fraction = coincidence_fraction(
            &magnetron(),
            &solid_state(),
            &config(1.0, 0.5, Execution::Sequential),
        )
        .unwrap();
        assert_close(fraction, 0.12);
    }

    #[test]
    fn test_radar_scenario_half_step() {
        let report = simulate(
            &magnetron(),
            &solid_state(),
            &config(0.5, 0.0, Execution::Sequential),
        )
        .unwrap();
        assert_eq!(report.steps(), 12_000);
        assert_eq!(report.coincident(), 6 * 1495);
        assert_close(report.fraction(), 1495.0 / 12_000.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for (increment, threshold) in [(1.0, 0.0), (1.0, 0.5), (0.5, 0.0)] {
            let seq = simulate(
                &magnetron(),
                &solid_state(),
                &config(increment, threshold, Execution::Sequential),
            )
            .unwrap();
            let par = simulate(
                &magnetron(),
                &solid_state(),
                &config(increment, threshold, Execution::Parallel),
            )
            .unwrap();
            assert_eq!(seq.coincident(), par.coincident());
            assert_eq!(seq.examined(), par.examined());
            assert_eq!(seq.steps(), par.steps());
            assert_close(seq.mean_covered_fraction(), par.mean_covered_fraction());
        }
    }

    #[test]
    fn test_random_trains_agree_across_modes() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
        for _ in 0..8 {
            let mut builder = PeriodicTrainBuilder::new().pri(200.0).duration(800.0);
            let mut cursor = 0.0;
            while cursor < 150.0 {
                let start = cursor + f64::from(rng.random_range(0u32..40)) * 0.25;
                let end = start + f64::from(rng.random_range(1u32..60)) * 0.25;
                if end > 200.0 {
                    break;
                }
                builder = builder.pulse(start, end);
                cursor = end;
            }
            let probe = match builder.build() {
                Ok(train) => train,
                Err(_) => continue,
            };
            let reference = PeriodicTrainBuilder::new()
                .pri(400.0)
                .duration(800.0)
                .pulse(10.0, 13.5)
                .pulse(210.0, 211.0)
                .build()
                .unwrap();
            let threshold = f64::from(rng.random_range(0u32..4)) * 0.25;

            let seq = simulate(
                &reference,
                &probe,
                &config(0.25, threshold, Execution::Sequential),
            )
            .unwrap();
            let par = simulate(
                &reference,
                &probe,
                &config(0.25, threshold, Execution::Parallel),
            )
            .unwrap();
            assert_eq!(seq.coincident(), par.coincident());
            assert!((0.0..=1.0).contains(&seq.fraction()));
            assert!((0.0..=1.0 + 1e-9).contains(&seq.mean_covered_fraction()));
        }
    }

    #[test]
    fn test_identical_trains() {
        let report = simulate(
            &magnetron(),
            &magnetron(),
            &config(1.0, 0.0, Execution::Sequential),
        )
        .unwrap();
        // Only the six phases that realign the pulses coincide.
        assert_eq!(report.coincident(), 36);
        assert_close(report.fraction(), 0.001);
        assert_close(report.mean_covered_fraction(), 0.001);
    }

    #[test]
    fn test_sweep_starts_at_current_phase() {
        let mut probe = solid_state();
        probe.shift_phase(300.0);
        for execution in [Execution::Sequential, Execution::Parallel] {
            let fraction =
                coincidence_fraction(&magnetron(), &probe, &config(1.0, 0.0, execution)).unwrap();
            assert_close(fraction, 740.0 / 6000.0);
        }
    }

    #[test]
    fn test_trains_are_not_mutated() {
        let reference = magnetron();
        let probe = solid_state();
        simulate(&reference, &probe, &config(1.0, 0.0, Execution::Sequential)).unwrap();
        assert_eq!(probe.phase(), 0.0);
        assert_eq!(probe.len(), 35);
        assert!(!probe.is_split());
        assert_eq!(reference.len(), 6);
    }

    #[test]
    fn test_duration_mismatch() {
        let probe = PeriodicTrainBuilder::new()
            .pri(1000.0)
            .duration(5000.0)
            .pulse(0.0, 1.0)
            .build()
            .unwrap();
        let err = simulate(&magnetron(), &probe, &SimulationConfig::default()).unwrap_err();
        match err {
            CoincidenceError::DurationMismatch(e) => {
                assert_eq!(e.reference(), 6000.0);
                assert_eq!(e.probe(), 5000.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_formula_method_is_not_implemented() {
        let cfg = SimulationConfig::builder()
            .method(Method::Formula)
            .build()
            .unwrap();
        let err = coincidence_fraction(&magnetron(), &solid_state(), &cfg).unwrap_err();
        assert_eq!(err, CoincidenceError::MethodNotImplemented(Method::Formula));
    }

    #[test]
    fn test_increment_exceeding_duration() {
        let err = simulate(
            &magnetron(),
            &solid_state(),
            &config(7000.0, 0.0, Execution::Sequential),
        )
        .unwrap_err();
        assert!(matches!(err, CoincidenceError::IncrementExceedsDuration(_)));
    }

    #[test]
    fn test_unvalidated_config_is_rejected() {
        let cfg = SimulationConfig {
            increment: -1.0,
            ..SimulationConfig::default()
        };
        let err = simulate(&magnetron(), &solid_state(), &cfg).unwrap_err();
        assert_eq!(
            err,
            CoincidenceError::Config(SimulationConfigError::NonPositiveIncrement(-1.0))
        );
    }

    #[test]
    fn test_count_step_counts_each_reference_pulse_once() {
        let tol = Tolerance::default();
        let reference = [Interval::new(0.0, 10.0).unwrap()];
        let probe = [
            Interval::new(0.0, 6.0).unwrap(),
            Interval::new(6.0, 10.0).unwrap(),
        ];
        let tally = count_step(&reference, &probe, 0.0, &tol);
        assert_eq!(tally.coincident, 1);
        assert_eq!(tally.examined, 1);
        assert_close(tally.covered.total(), 0.6);

        let tally = count_step(&reference, &probe, 0.6, &tol);
        assert_eq!(tally.coincident, 0);
    }
}
