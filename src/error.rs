//! Error types for dinner validation, scheduling and file loading.

use thiserror::Error;

/// A dinner configuration that can never produce a plan. Detected before any search work.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("group size must be at least 1")]
    InvalidGroupSize,

    #[error("team roster is empty")]
    EmptyRoster,

    #[error("{teams} teams cannot be split into groups of {group_size}")]
    NotDivisible { teams: usize, group_size: usize },

    #[error("duplicate team id '{0}'")]
    DuplicateTeam(String),

    #[error("team '{team}' seats {capacity} guest(s) but groups need {required}")]
    CapacityTooSmall {
        team: String,
        capacity: usize,
        required: usize,
    },

    #[error("team '{team}' has {members} member(s), dinner allows {team_size}")]
    OversizedTeam {
        team: String,
        members: usize,
        team_size: usize,
    },

    #[error("{courses} course(s) configured, at least {required} required")]
    InsufficientCourses { courses: usize, required: usize },

    #[error("invalid courses: {0}")]
    InvalidCourses(String),

    #[error("search budget allows zero attempts")]
    EmptyBudget,
}

/// Failure of a scheduling request. A structurally valid plan with repeat meetings is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no structurally valid plan exists: {reason}")]
    Infeasible { reason: String },
}

/// Reading dinner or plan files from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse json '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to parse yaml '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
