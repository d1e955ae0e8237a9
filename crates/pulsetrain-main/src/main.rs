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

use pulsetrain_core::tolerance::Tolerance;
use pulsetrain_model::prelude::*;
use pulsetrain_sim::prelude::*;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn main() {
    enable_tracing();

    let duration = 6000.0;

    // Magnetron: one 1-unit pulse per 1000 units
    let reference = PeriodicTrainBuilder::new()
        .pri(1000.0)
        .duration(duration)
        .pulse(0.0, 1.0)
        .build()
        .expect("valid reference train");

    // Solid-state radar: short pulse burst followed by three long pulses
    let probe = PeriodicTrainBuilder::new()
        .pri(1200.0)
        .duration(duration)
        .pulses([
            (0.0, 0.2),
            (37.5, 37.7),
            (75.0, 75.2),
            (112.5, 112.7),
            (150.0, 162.0),
            (300.0, 312.0),
            (450.0, 570.0),
        ])
        .build()
        .expect("valid probe train");

    info!(
        reference_pulses = reference.len(),
        reference_duty = %reference.duty_cycle(),
        probe_pulses = probe.len(),
        probe_duty = %probe.duty_cycle(),
        "trains materialized"
    );

    for threshold in [0.0, 0.5] {
        for execution in [Execution::Sequential, Execution::Parallel] {
            let config = SimulationConfig::builder()
                .increment(1.0)
                .threshold(threshold)
                .tolerance(Tolerance::default())
                .execution(execution)
                .build()
                .expect("valid simulation config");

            let t0 = Instant::now();
            let report = simulate(&reference, &probe, &config).expect("simulation");
            let elapsed = t0.elapsed();

            info!(
                %threshold,
                %execution,
                fraction = %report.fraction(),
                coincident = report.coincident(),
                examined = report.examined(),
                mean_covered = %report.mean_covered_fraction(),
                elapsed_ms = elapsed.as_millis() as u64,
                "coincidence estimated"
            );
        }
    }
}
