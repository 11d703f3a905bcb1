//! Criterion benchmarks for the per-input-change work.
//!
//! Every slider move runs calculate → diagram → figure synchronously, so
//! this is the latency the dashboard pays per frame in which inputs change.
//!
//! Run with: cargo bench -p flowsim-logic

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flowsim_logic::allocation::allocate;
use flowsim_logic::config::SimulationInputs;
use flowsim_logic::figure::render;
use flowsim_logic::policy::Policy;
use flowsim_logic::svg::to_svg;

fn bench_allocate(c: &mut Criterion) {
    let inputs = SimulationInputs::default().with_policy(Policy::StabilizationFund);
    c.bench_function("allocate", |b| b.iter(|| allocate(black_box(&inputs))));
}

fn bench_render(c: &mut Criterion) {
    let inputs = SimulationInputs::default();
    c.bench_function("render_figure", |b| b.iter(|| render(black_box(&inputs))));
}

fn bench_svg(c: &mut Criterion) {
    let figure = render(&SimulationInputs::default().with_total_value(900.0));
    c.bench_function("to_svg", |b| b.iter(|| to_svg(black_box(&figure))));
}

criterion_group!(benches, bench_allocate, bench_render, bench_svg);
criterion_main!(benches);
