pub mod candidate_builder;
pub mod evaluator;
pub mod meeting_graph;
pub mod plan;
pub mod rng;
pub mod search;

use std::collections::HashSet;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::data::{Course, DinnerConfig, HostingPolicy, SearchBudget, Team, TeamSet};
use crate::error::{ConfigError, SchedulingError};
use crate::parallel::WorkerPool;
use crate::scheduler::candidate_builder::CandidateBuilder;
use crate::scheduler::evaluator::ScheduleEvaluator;
use crate::scheduler::plan::{Plan, ScheduleScore, SearchReport, TrialPlan};
use crate::scheduler::search::{SeedSource, TrialSearch};

pub use evaluator::{lower_bound, Violation};
pub use plan::{CourseMatch, Termination};

/// A dinner that passed every configuration check; ready to search.
#[derive(Debug, Clone)]
pub struct ValidatedDinner {
    pub dinner_id: Uuid,
    pub team_set: TeamSet,
    /// Sorted by position, 0..C-1.
    pub courses: Vec<Course>,
    pub hosting: HostingPolicy,
}

impl ValidatedDinner {
    pub fn evaluator(&self) -> ScheduleEvaluator {
        ScheduleEvaluator::new(&self.team_set, self.courses.len(), self.hosting)
    }

    pub fn lower_bound(&self) -> ScheduleScore {
        self.evaluator().lower_bound()
    }

    /// Resolves a stored plan against this dinner: same dinner id, same course ids, known teams.
    /// Structural rules are left to [ScheduleEvaluator::structural_violations].
    pub fn trial_from_plan(&self, plan: &Plan) -> Result<TrialPlan, Violation> {
        if plan.dinner_id != self.dinner_id {
            return Err(Violation::DinnerMismatch {
                expected: self.dinner_id,
                found: plan.dinner_id,
            });
        }
        for course_match in &plan.matches {
            let Some(course) = self.courses.get(course_match.course_position) else {
                continue;
            };
            if course.id != course_match.course_id {
                return Err(Violation::CourseMismatch {
                    position: course.position,
                    expected: course.id.clone(),
                    found: course_match.course_id.clone(),
                });
            }
        }
        TrialPlan::from_plan(plan, &self.team_set)
    }
}

/// Runs the trial search for one dinner and publishes the best plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScheduler;

impl MatchScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Schedules with the budget carried by `config`.
    pub fn schedule(&self, config: &DinnerConfig, roster: Vec<Team>) -> Result<Plan, SchedulingError> {
        self.schedule_with_budget(config, roster, &config.budget)
    }

    pub fn schedule_with_budget(
        &self,
        config: &DinnerConfig,
        roster: Vec<Team>,
        budget: &SearchBudget,
    ) -> Result<Plan, SchedulingError> {
        let dinner = validate_dinner(config, roster)
            .and_then(|dinner| check_budget(budget).map(|()| dinner))
            .inspect_err(|err| tracing::warn!(dinner = %config.id, %err, "dinner rejected"))?;

        let started = Instant::now();
        let seeds = attempt_seeds(budget);
        let deadline = budget
            .time_limit_ms
            .and_then(|ms| started.checked_add(Duration::from_millis(ms)));
        let pool = WorkerPool::with_workers(budget.workers);
        let evaluator = dinner.evaluator();

        tracing::info!(
            dinner = %config.id,
            teams = dinner.team_set.len(),
            group_size = dinner.team_set.group_size(),
            courses = dinner.courses.len(),
            attempts = seeds.len(),
            time_limit_ms = budget.time_limit_ms,
            workers = pool.effective_workers(),
            "searching"
        );

        let search = TrialSearch {
            team_set: &dinner.team_set,
            courses: &dinner.courses,
            builder: CandidateBuilder::new(dinner.hosting),
            evaluator,
        };
        let outcome = search.run(&seeds, deadline, &pool);

        let Some(best) = outcome.best else {
            return Err(SchedulingError::Infeasible {
                reason: "no structurally valid trial was produced".to_string(),
            });
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            dinner = %config.id,
            termination = ?outcome.termination,
            attempts = outcome.attempts,
            deadline_hit = outcome.deadline_hit,
            repeats = best.score.repeat_meetings,
            worst_pair = best.score.max_pair_repeats,
            elapsed_ms,
            "search finished"
        );

        // Attempts past an optimal winner may or may not have started; leave them out.
        let attempts = match outcome.termination {
            Termination::Found => best.attempt + 1,
            Termination::BudgetExhausted => outcome.attempts,
        };
        let report = SearchReport {
            termination: outcome.termination,
            attempts,
            winning_attempt: best.attempt,
            winning_seed: best.trial.seed,
            deadline_hit: outcome.deadline_hit,
            elapsed_ms,
        };
        Ok(Plan::from_trial(
            &best.trial,
            &dinner.team_set,
            &dinner.courses,
            config.id,
            best.score,
            evaluator.lower_bound(),
            report,
        ))
    }
}

/// All configuration checks, in order, without searching.
pub fn validate_dinner(config: &DinnerConfig, roster: Vec<Team>) -> Result<ValidatedDinner, SchedulingError> {
    let team_set = TeamSet::validate(roster, config.group_size)?;
    if let Some(team_size) = config.team_size {
        team_set.check_team_size(team_size)?;
    }

    let courses = config.ordered_courses();
    check_course_positions(&courses)?;

    let team_count = team_set.len();
    let per_course = team_set.groups_per_course();
    if courses.len() < per_course {
        return Err(ConfigError::InsufficientCourses {
            courses: courses.len(),
            required: per_course,
        }
        .into());
    }

    let slots = courses.len() * per_course;
    if slots < team_count && config.hosting == HostingPolicy::EveryTeamHosts {
        // Each course seats T/G hosts, so every team hosting once takes G courses.
        return Err(ConfigError::InsufficientCourses {
            courses: courses.len(),
            required: team_set.group_size(),
        }
        .into());
    }
    if slots > team_count {
        return Err(SchedulingError::Infeasible {
            reason: format!(
                "{} course(s) need {slots} hosts in total but {team_count} teams can only host once each",
                courses.len()
            ),
        });
    }

    Ok(ValidatedDinner {
        dinner_id: config.id,
        team_set,
        courses,
        hosting: config.hosting,
    })
}

fn check_course_positions(courses: &[Course]) -> Result<(), ConfigError> {
    let mut ids = HashSet::with_capacity(courses.len());
    for (expected, course) in courses.iter().enumerate() {
        if course.position != expected {
            return Err(ConfigError::InvalidCourses(format!(
                "positions must run 0..{} without gaps, found {} at slot {expected}",
                courses.len(),
                course.position
            )));
        }
        if !ids.insert(course.id.as_str()) {
            return Err(ConfigError::InvalidCourses(format!(
                "duplicate course id '{}'",
                course.id
            )));
        }
    }
    Ok(())
}

fn check_budget(budget: &SearchBudget) -> Result<(), SchedulingError> {
    if budget.attempt_ceiling() == 0 {
        return Err(ConfigError::EmptyBudget.into());
    }
    Ok(())
}

fn attempt_seeds(budget: &SearchBudget) -> SeedSource {
    if let Some(seeds) = &budget.seeds {
        return SeedSource::Listed(seeds.iter().copied().take(budget.max_attempts).collect());
    }
    let base_seed = budget.base_seed.unwrap_or_else(|| {
        let seed = fresh_seed();
        tracing::info!(base_seed = seed, "no base seed configured, drew one");
        seed
    });
    SeedSource::Derived {
        base_seed,
        attempts: budget.max_attempts,
    }
}

fn fresh_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(err) => {
            tracing::warn!(%err, "os randomness unavailable, seeding from clock");
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or_default()
        }
    }
}
