//! Run the trial search once on one worker and once on all cores, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup

use std::time::Instant;

use progressive_dinner::{DinnerConfig, MatchScheduler, SearchBudget, Team};

fn main() {
    let teams = 64;
    let group_size = 8;
    let attempts = 2000;
    let seed = 12345u64;

    let roster: Vec<Team> = (0..teams)
        .map(|i| Team::new(format!("team-{i}")).with_address(format!("{i} Benchmark Row")))
        .collect();
    let config = DinnerConfig::new("benchmark", group_size, group_size);

    println!(
        "Trial search: {} teams, groups of {}, {} courses, {} attempts",
        teams,
        group_size,
        config.course_count(),
        attempts
    );
    println!();

    let sequential_budget = SearchBudget {
        workers: 1,
        ..SearchBudget::attempts(attempts, seed)
    };
    let parallel_budget = SearchBudget::attempts(attempts, seed);

    let scheduler = MatchScheduler::new();
    let run = |label: &str, budget: &SearchBudget| {
        let t0 = Instant::now();
        let plan = match scheduler.schedule_with_budget(&config, roster.clone(), budget) {
            Ok(plan) => plan,
            Err(err) => {
                eprintln!("{label} run failed: {err}");
                std::process::exit(1);
            }
        };
        let elapsed = t0.elapsed();
        let ms = elapsed.as_secs_f64() * 1000.0;
        println!(
            "{label:<11}  {:.2} ms  ({:.1} trials/s)",
            ms,
            plan.report.attempts as f64 / elapsed.as_secs_f64()
        );
        (plan, ms)
    };

    let (plan_seq, seq_ms) = run("Sequential:", &sequential_budget);
    let (plan_par, par_ms) = run("Parallel:", &parallel_budget);

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    assert_eq!(plan_seq, plan_par, "worker count must not change the plan");
    println!(
        "(Plans match; best score {} repeats, worst pair {})",
        plan_seq.score.repeat_meetings, plan_seq.score.max_pair_repeats
    );
}
