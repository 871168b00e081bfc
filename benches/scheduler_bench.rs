//! Compare one-worker vs all-core trial search, plus the cost of building a single trial.
//!
//! Run with: `cargo bench --bench scheduler`
//! Or quick comparison: `cargo run --bin benchmark_parallel_speedup` (see src/bin)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use progressive_dinner::scheduler::candidate_builder::CandidateBuilder;
use progressive_dinner::scheduler::validate_dinner;
use progressive_dinner::{DinnerConfig, HostingPolicy, MatchScheduler, SearchBudget, Team};

fn roster(count: usize) -> Vec<Team> {
    (0..count).map(|i| Team::new(format!("team-{i}"))).collect()
}

fn bench_single_trial(c: &mut Criterion) {
    let config = DinnerConfig::new("bench", 6, 6);
    let dinner = validate_dinner(&config, roster(36)).expect("36 teams in sixes should validate");
    let builder = CandidateBuilder::new(HostingPolicy::EveryTeamHosts);
    let evaluator = dinner.evaluator();

    c.bench_function("build_and_score_36_teams", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let trial = builder.build(&dinner.team_set, &dinner.courses, black_box(seed));
            black_box(evaluator.score(&trial))
        });
    });
}

fn bench_search_sequential_vs_parallel(c: &mut Criterion) {
    let teams = roster(64);
    let config = DinnerConfig::new("bench", 8, 8);
    let attempts = 256;

    let mut group = c.benchmark_group("trial_search");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        let budget = SearchBudget {
            workers: 1,
            ..SearchBudget::attempts(attempts, 42)
        };
        b.iter(|| {
            black_box(MatchScheduler::new().schedule_with_budget(&config, teams.clone(), &budget))
        });
    });

    group.bench_function("parallel", |b| {
        let budget = SearchBudget::attempts(attempts, 42);
        b.iter(|| {
            black_box(MatchScheduler::new().schedule_with_budget(&config, teams.clone(), &budget))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_single_trial, bench_search_sequential_vs_parallel);
criterion_main!(benches);
