//! Parallel trial search.
//!
//! Every attempt builds and scores its own trial; the only shared state is the best-trial
//! holder behind one mutex plus an atomic stop index. Once an optimal trial is known at
//! attempt `i`, attempts after `i` are skipped. Attempts before `i` still run, so the winner
//! (lowest score, then lowest attempt index) does not depend on thread count or timing unless
//! the wall-clock deadline cuts the search short.
//!
//! Attempts are dispatched in bounded batches and seeds are computed per attempt, so neither
//! a huge attempt ceiling nor a passed deadline costs more than one batch of work.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;

use crate::data::{Course, TeamSet};
use crate::parallel::WorkerPool;
use crate::scheduler::candidate_builder::CandidateBuilder;
use crate::scheduler::evaluator::ScheduleEvaluator;
use crate::scheduler::plan::{ScheduleScore, Termination, TrialPlan};
use crate::scheduler::rng::seed_at;

/// Attempts handed to each worker per batch.
const ATTEMPTS_PER_WORKER: usize = 32;

/// Where attempt seeds come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// One attempt per listed seed.
    Listed(Vec<u64>),
    /// `attempts` seeds from the SplitMix64 stream of `base_seed`.
    Derived { base_seed: u64, attempts: usize },
}

impl SeedSource {
    pub fn len(&self) -> usize {
        match self {
            SeedSource::Listed(seeds) => seeds.len(),
            SeedSource::Derived { attempts, .. } => *attempts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seed for `attempt`; `attempt` must be below [SeedSource::len].
    pub fn seed(&self, attempt: usize) -> u64 {
        match self {
            SeedSource::Listed(seeds) => seeds[attempt],
            SeedSource::Derived { base_seed, .. } => seed_at(*base_seed, attempt),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoredTrial {
    pub attempt: usize,
    pub score: ScheduleScore,
    pub trial: TrialPlan,
}

impl ScoredTrial {
    fn beats(&self, other: &ScoredTrial) -> bool {
        (self.score, self.attempt) < (other.score, other.attempt)
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Option<ScoredTrial>,
    /// Trials actually built.
    pub attempts: usize,
    pub termination: Termination,
    pub deadline_hit: bool,
}

pub struct TrialSearch<'a> {
    pub team_set: &'a TeamSet,
    pub courses: &'a [Course],
    pub builder: CandidateBuilder,
    pub evaluator: ScheduleEvaluator,
}

impl TrialSearch<'_> {
    pub fn run(&self, seeds: &SeedSource, deadline: Option<Instant>, pool: &WorkerPool) -> SearchOutcome {
        let best: Mutex<Option<ScoredTrial>> = Mutex::new(None);
        let stop_after = AtomicUsize::new(usize::MAX);
        let attempts = AtomicUsize::new(0);
        let deadline_hit = AtomicBool::new(false);
        let past_deadline = || deadline.is_some_and(|deadline| Instant::now() >= deadline);

        let run_attempt = |attempt: usize| {
            if attempt > stop_after.load(Ordering::Acquire) {
                return;
            }
            // The first attempt always runs so a valid configuration always yields a plan.
            if attempt > 0 && past_deadline() {
                deadline_hit.store(true, Ordering::Relaxed);
                return;
            }

            let seed = seeds.seed(attempt);
            let trial = self.builder.build(self.team_set, self.courses, seed);
            attempts.fetch_add(1, Ordering::Relaxed);

            let violations = self.evaluator.structural_violations(&trial);
            if !violations.is_empty() {
                tracing::warn!(attempt, seed, ?violations, "discarding malformed trial");
                return;
            }

            let score = self.evaluator.score(&trial);
            if self.evaluator.is_optimal(score) {
                stop_after.fetch_min(attempt, Ordering::AcqRel);
            }

            let candidate = ScoredTrial {
                attempt,
                score,
                trial,
            };
            let mut guard = best.lock().unwrap_or_else(PoisonError::into_inner);
            let replace = guard
                .as_ref()
                .map_or(true, |current| candidate.beats(current));
            if replace {
                tracing::debug!(
                    attempt,
                    seed,
                    repeats = score.repeat_meetings,
                    worst_pair = score.max_pair_repeats,
                    "new best trial"
                );
                *guard = Some(candidate);
            }
        };

        let ceiling = seeds.len();
        let batch = pool
            .effective_workers()
            .saturating_mul(ATTEMPTS_PER_WORKER)
            .max(1);
        pool.install(|| {
            let mut start = 0;
            while start < ceiling {
                let end = start.saturating_add(batch).min(ceiling);
                (start..end).into_par_iter().for_each(|attempt| run_attempt(attempt));

                // Everything below the stop index has run by now.
                if stop_after.load(Ordering::Acquire) < end {
                    break;
                }
                if past_deadline() {
                    deadline_hit.store(true, Ordering::Relaxed);
                    break;
                }
                start = end;
            }
        });

        let best = best.into_inner().unwrap_or_else(PoisonError::into_inner);
        let termination = match &best {
            Some(found) if self.evaluator.is_optimal(found.score) => Termination::Found,
            _ => Termination::BudgetExhausted,
        };

        SearchOutcome {
            best,
            attempts: attempts.into_inner(),
            termination,
            deadline_hit: deadline_hit.into_inner(),
        }
    }
}
