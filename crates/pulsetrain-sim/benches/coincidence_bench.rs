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

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pulsetrain_model::train::{PeriodicTrain, PeriodicTrainBuilder};
use pulsetrain_sim::{
    coincidence::simulate,
    config::{Execution, SimulationConfig},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{env, hint::black_box};

const DURATION: f64 = 6000.0;

fn reference_train() -> PeriodicTrain {
    PeriodicTrainBuilder::new()
        .pri(1000.0)
        .duration(DURATION)
        .pulse(0.0, 1.0)
        .build()
        .expect("valid reference train")
}

/// A probe with `pulses` random pulses per 1200-unit period.
fn random_probe(pulses: usize, rng: &mut impl Rng) -> PeriodicTrain {
    let pri = 1200.0;
    let slot = pri / pulses as f64;
    let mut builder = PeriodicTrainBuilder::new().pri(pri).duration(DURATION);
    for i in 0..pulses {
        let base = i as f64 * slot;
        let width = rng.random_range(0.1..slot * 0.5);
        let offset = rng.random_range(0.0..slot - width);
        builder = builder.pulse(base + offset, base + offset + width);
    }
    builder.build().expect("valid probe train")
}

fn register_shift(c: &mut Criterion, pulse_counts: &[usize], rng: &mut ChaCha8Rng) {
    let mut group = c.benchmark_group("shift_phase");
    for &pulses in pulse_counts {
        let probe = random_probe(pulses, rng);
        let deltas: Vec<f64> = (0..256).map(|_| rng.random_range(0.0..DURATION)).collect();
        group.throughput(Throughput::Elements(deltas.len() as u64));
        group.bench_function(BenchmarkId::new("shift", pulses), |b| {
            b.iter_batched(
                || probe.clone(),
                |mut train| {
                    for &d in &deltas {
                        train.shift_phase(black_box(d));
                    }
                    black_box(train.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn register_simulate(
    c: &mut Criterion,
    pulse_counts: &[usize],
    increment: f64,
    rng: &mut ChaCha8Rng,
) {
    let reference = reference_train();
    let mut group = c.benchmark_group(format!("simulate/inc={increment}"));
    group.sample_size(10);
    for &pulses in pulse_counts {
        let probe = random_probe(pulses, rng);
        for execution in [Execution::Sequential, Execution::Parallel] {
            let config = SimulationConfig::builder()
                .increment(increment)
                .execution(execution)
                .build()
                .expect("valid config");
            group.bench_function(BenchmarkId::new(execution.to_string(), pulses), |b| {
                b.iter(|| {
                    let report = simulate(black_box(&reference), black_box(&probe), &config)
                        .expect("simulation succeeds");
                    black_box(report.coincident())
                });
            });
        }
    }
    group.finish();
}

fn coincidence_benches(c: &mut Criterion) {
    // Defaults (override with env)
    let increment = env::var("PULSETRAIN_INCREMENT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1.0f64);
    let seed = env::var("PULSETRAIN_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0xC0FFEEu64);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    register_shift(c, &[7, 64, 512], &mut rng);
    register_simulate(c, &[7, 64], increment, &mut rng);
}

criterion_group!(benches, coincidence_benches);
criterion_main!(benches);
