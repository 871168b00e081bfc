pub mod dinner;
pub mod loader;
pub mod team;

pub use dinner::{Course, DinnerConfig, HostingPolicy, SearchBudget, DEFAULT_MAX_ATTEMPTS};
pub use loader::{load_dinner_file, load_plan, DinnerFile};
pub use team::{Team, TeamSet};
