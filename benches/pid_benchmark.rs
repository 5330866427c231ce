//! Benchmark for the PID controller
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rpid::{derivative, pid};

fn make_config() -> pid::PidConfig<f64> {
    pid::PidConfigBuilder::new(0.01, 1.0, 10.0)
        .kp(1.0)
        .ki(0.5)
        .kd(0.1)
        .build()
        .unwrap()
}

/// The default controller keeps a two-slot history, so each update is a handful of flops.
fn bench_central_difference_pid(c: &mut Criterion) {
    let mut pid = pid::PidController::new(make_config());
    pid.set_setpoint(1.0);
    let mut measurement = 0.9;

    c.bench_function("central difference PID", |b| {
        b.iter(|| {
            let output = pid.update(black_box(measurement));
            measurement += 0.0001; // prevent constant inputs
            black_box(output);
        });
    });
}

/// Same stencil through the generic N-tap kernel, which pays for a loop and modulo indexing.
fn bench_kernel_pid(c: &mut Criterion) {
    let mut pid =
        pid::PidController::with_estimator(make_config(), derivative::FiniteDifference::central());
    pid.set_setpoint(1.0);
    let mut measurement = 0.9;

    c.bench_function("3-tap kernel PID", |b| {
        b.iter(|| {
            let output = pid.update(black_box(measurement));
            measurement += 0.0001; // prevent constant inputs
            black_box(output);
        });
    });
}

// Naive PID law without validation, clamping or estimator indirection, as a lower bound.
fn bench_naive_pid(c: &mut Criterion) {
    let (kp, ki, kd) = (1.0, 0.5, 0.1);
    let dt = 0.01;
    let setpoint = 1.0;
    let mut err_sum: f64 = 0.0;
    let mut last_input: f64 = 0.0;
    let mut measurement = 0.9;

    c.bench_function("naive PID", |b| {
        b.iter(|| {
            let input = black_box(measurement);
            let error = setpoint - input;
            err_sum += dt * error;
            let d_input = (input - last_input) / dt;
            let output = kp * error + ki * err_sum - kd * d_input;
            last_input = input;
            black_box(output);

            measurement += 0.0001; // prevent constant inputs
        });
    });
}

criterion_group!(
    benches,
    bench_central_difference_pid,
    bench_kernel_pid,
    bench_naive_pid,
);
criterion_main!(benches);
