use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub members: Vec<String>,
    /// Opaque location token; the scheduler never reads it.
    #[serde(default)]
    pub address: String,
    /// Guests the team can seat. None means "whatever the dinner needs".
    #[serde(default)]
    pub capacity: Option<usize>,
}

impl Team {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
            address: String::new(),
            capacity: None,
        }
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// Validated roster. Teams keep their roster order; the scheduler addresses them by index.
#[derive(Debug, Clone)]
pub struct TeamSet {
    teams: Vec<Team>,
    index: HashMap<String, usize>,
    group_size: usize,
}

impl TeamSet {
    pub fn validate(teams: Vec<Team>, group_size: usize) -> Result<Self, ConfigError> {
        if group_size == 0 {
            return Err(ConfigError::InvalidGroupSize);
        }
        if teams.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        if teams.len() % group_size != 0 {
            return Err(ConfigError::NotDivisible {
                teams: teams.len(),
                group_size,
            });
        }

        let guest_capacity = group_size - 1;
        let mut index = HashMap::with_capacity(teams.len());
        for (position, team) in teams.iter().enumerate() {
            if index.insert(team.id.clone(), position).is_some() {
                return Err(ConfigError::DuplicateTeam(team.id.clone()));
            }
            if let Some(capacity) = team.capacity {
                if capacity < guest_capacity {
                    return Err(ConfigError::CapacityTooSmall {
                        team: team.id.clone(),
                        capacity,
                        required: guest_capacity,
                    });
                }
            }
        }

        Ok(Self {
            teams,
            index,
            group_size,
        })
    }

    /// Rejects teams with more members than the dinner allows.
    pub fn check_team_size(&self, team_size: usize) -> Result<(), ConfigError> {
        match self.teams.iter().find(|team| team.members.len() > team_size) {
            Some(team) => Err(ConfigError::OversizedTeam {
                team: team.id.clone(),
                members: team.members.len(),
                team_size,
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn groups_per_course(&self) -> usize {
        self.teams.len() / self.group_size
    }

    pub fn guest_capacity(&self) -> usize {
        self.group_size - 1
    }

    pub fn team(&self, index: usize) -> &Team {
        &self.teams[index]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }
}
