//! Dinner configuration: the event, its courses and the search budget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of trial plans generated per scheduling request.
pub const DEFAULT_MAX_ATTEMPTS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Ordinal position within the dinner, 0..C-1.
    pub position: usize,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
        }
    }
}

/// Who gets a hosting slot when there are fewer slots than teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingPolicy {
    /// Every team hosts exactly once; fewer slots than teams is a configuration error.
    #[default]
    EveryTeamHosts,
    /// Slots go to teams in roster (sign-up) order; the roster tail never hosts.
    RosterPriority,
}

/// Limits for the trial search. Whichever ceiling is hit first ends the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    pub max_attempts: usize,
    /// Wall-clock cap. Runs that stop on this are not reproducible.
    pub time_limit_ms: Option<u64>,
    /// Seed the per-attempt seeds are derived from. None draws one from the OS.
    pub base_seed: Option<u64>,
    /// Explicit per-attempt seeds; overrides `base_seed` and caps attempts at its length.
    pub seeds: Option<Vec<u64>>,
    /// Worker threads. 0 uses every core.
    pub workers: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            time_limit_ms: None,
            base_seed: None,
            seeds: None,
            workers: 0,
        }
    }
}

impl SearchBudget {
    pub fn attempts(max_attempts: usize, base_seed: u64) -> Self {
        Self {
            max_attempts,
            base_seed: Some(base_seed),
            ..Self::default()
        }
    }

    /// Attempts that will be made at most.
    pub fn attempt_ceiling(&self) -> usize {
        match &self.seeds {
            Some(seeds) => seeds.len().min(self.max_attempts),
            None => self.max_attempts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DinnerConfig {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    /// Max members per team. None leaves team sizes unchecked.
    #[serde(default)]
    pub team_size: Option<usize>,
    /// Teams sharing one course, host included.
    #[serde(alias = "teams_per_course")]
    pub group_size: usize,
    pub courses: Vec<Course>,
    #[serde(default)]
    pub hosting: HostingPolicy,
    #[serde(default)]
    pub budget: SearchBudget,
}

impl DinnerConfig {
    /// Dinner with `course_count` generically named courses.
    pub fn new(name: impl Into<String>, group_size: usize, course_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: Utc::now(),
            team_size: None,
            group_size,
            courses: (0..course_count)
                .map(|position| {
                    Course::new(
                        format!("course-{position}"),
                        default_course_name(position, course_count),
                        position,
                    )
                })
                .collect(),
            hosting: HostingPolicy::default(),
            budget: SearchBudget::default(),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_hosting(mut self, hosting: HostingPolicy) -> Self {
        self.hosting = hosting;
        self
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Courses sorted by position.
    pub fn ordered_courses(&self) -> Vec<Course> {
        let mut courses = self.courses.clone();
        courses.sort_by_key(|course| course.position);
        courses
    }
}

fn default_course_name(position: usize, count: usize) -> String {
    match (position, count) {
        (0, 3) => "Starter".to_string(),
        (1, 3) => "Main".to_string(),
        (2, 3) => "Dessert".to_string(),
        _ => format!("Course {}", position + 1),
    }
}
