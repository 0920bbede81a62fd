use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use patrolsim_logic::input::{Parameters, Scenario};
use patrolsim_logic::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scenario(systems: usize) -> Scenario {
    let parameters = Parameters {
        patrols: 6,
        systems,
        tau: 50,
        nu: 20,
        nu_max: 60,
        mu: 1.0,
        rho: 1.0,
        delta: 1.0,
    };
    Scenario::random(parameters, &mut StdRng::seed_from_u64(42))
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    for systems in [10, 40, 160] {
        let scenario = scenario(systems);
        let empire = scenario.empire().unwrap();
        let config = scenario.config(SimulationConfig {
            target_comfort: None,
            ..SimulationConfig::default()
        });

        group.bench_with_input(BenchmarkId::from_parameter(systems), &systems, |b, _| {
            b.iter(|| {
                let mut sim = Simulation::new(empire.clone(), config.clone()).unwrap();
                sim.seed_population();
                black_box(sim.run())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
