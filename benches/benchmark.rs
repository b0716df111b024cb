//! Benchmarks for the two hot paths: the integrator on its own, and a complete
//! displayed frame (resolve, render, advance, guard, compose).
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use double_pendulum::pendulum::{
    integrator::advance, params::PendulumParams, simulation::Simulation, state::PendulumState,
};

fn integrate_ten_thousand_steps() {
    let params = PendulumParams::default();
    let mut state =
        PendulumState::new(params.physical, params.initial, params.display.pivot()).unwrap();
    for _ in 0..10_000 {
        advance(&mut state);
    }
    black_box(state.angles());
}

fn benchmark(c: &mut Criterion) {
    c.bench_function("integrate_ten_thousand_steps", |b| {
        b.iter(integrate_ten_thousand_steps);
    });

    let mut simulation = Simulation::new(&PendulumParams::default()).unwrap();
    simulation.start();
    c.bench_function("step_and_compose_frame", |b| {
        b.iter(|| {
            black_box(simulation.step_frame().unwrap());
            black_box(simulation.compose().pixel(0, 0));
        });
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
