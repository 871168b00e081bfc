//! Load dinner files and stored plans. JSON by default, YAML for `.yaml`/`.yml`.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::dinner::DinnerConfig;
use crate::data::team::Team;
use crate::error::LoadError;
use crate::scheduler::plan::Plan;

/// Everything needed to schedule one dinner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DinnerFile {
    pub dinner: DinnerConfig,
    pub teams: Vec<Team>,
}

pub fn load_dinner_file(path: impl AsRef<Path>) -> Result<DinnerFile, LoadError> {
    read_structured(path.as_ref())
}

pub fn load_plan(path: impl AsRef<Path>) -> Result<Plan, LoadError> {
    read_structured(path.as_ref())
}

fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;

    if is_yaml(path) {
        serde_yaml::from_str(&raw).map_err(|source| LoadError::Yaml {
            path: display,
            source,
        })
    } else {
        serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: display,
            source,
        })
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("dinner-loader-{name}-{stamp}.{ext}"))
    }

    #[test]
    fn yaml_dinner_file_loads_with_defaults() {
        let path = unique_temp_path("yaml", "yaml");
        let raw = "\
dinner:
  name: Harbour walk
  group_size: 3
  courses:
    - { id: c0, name: Starter, position: 0 }
    - { id: c1, name: Main, position: 1 }
    - { id: c2, name: Dessert, position: 2 }
  budget:
    max_attempts: 32
    base_seed: 9
teams:
  - { id: a, members: [Ada, Ben], address: Pier 1 }
  - { id: b }
  - { id: c }
";
        fs::write(&path, raw).expect("fixture should be written");

        let file = load_dinner_file(&path).expect("yaml should load");
        assert_eq!(file.dinner.group_size, 3);
        assert_eq!(file.dinner.courses.len(), 3);
        assert_eq!(file.dinner.budget.max_attempts, 32);
        assert_eq!(file.dinner.budget.base_seed, Some(9));
        assert_eq!(file.teams[0].members, vec!["Ada", "Ben"]);
        assert_eq!(file.teams[1].address, "");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_json_reports_path() {
        let path = unique_temp_path("broken", "json");
        fs::write(&path, "{ not json").expect("fixture should be written");

        let err = load_dinner_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_dinner_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
