//! Match scheduling for progressive dinners: teams rotate through courses hosted at each
//! other's addresses, meeting as many distinct teams as possible.

pub mod cli;
pub mod data;
pub mod error;
pub mod export;
pub mod logging;
pub mod parallel;
pub mod scheduler;

pub use data::{Course, DinnerConfig, HostingPolicy, SearchBudget, Team, TeamSet};
pub use error::{ConfigError, LoadError, SchedulingError};
pub use scheduler::plan::{CourseMatch, Plan, ScheduleScore, SearchReport, Termination};
pub use scheduler::MatchScheduler;
