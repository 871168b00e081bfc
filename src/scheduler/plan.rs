//! Trial plans (index based, internal to the search) and the published [Plan].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::{Course, TeamSet};
use crate::scheduler::evaluator::Violation;

/// One group within a course: the host plus its guests, as team indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub host: usize,
    pub guests: Vec<usize>,
}

impl Group {
    pub fn members(&self) -> Vec<usize> {
        let mut members = Vec::with_capacity(self.guests.len() + 1);
        members.push(self.host);
        members.extend_from_slice(&self.guests);
        members
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseGroups {
    pub position: usize,
    pub groups: Vec<Group>,
}

/// A complete candidate assignment produced from one seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialPlan {
    pub seed: u64,
    pub courses: Vec<CourseGroups>,
    /// Teams without a hosting slot, in roster order.
    pub non_hosts: Vec<usize>,
}

impl TrialPlan {
    /// Rebuilds the index form of a stored plan against a roster.
    pub fn from_plan(plan: &Plan, team_set: &TeamSet) -> Result<Self, Violation> {
        let lookup = |id: &str| {
            team_set
                .index_of(id)
                .ok_or_else(|| Violation::UnknownTeam(id.to_string()))
        };

        let mut by_position: BTreeMap<usize, Vec<Group>> = BTreeMap::new();
        for course_match in &plan.matches {
            let guests = course_match
                .guests
                .iter()
                .map(|id| lookup(id))
                .collect::<Result<Vec<_>, _>>()?;
            by_position
                .entry(course_match.course_position)
                .or_default()
                .push(Group {
                    host: lookup(&course_match.host)?,
                    guests,
                });
        }

        let non_hosts = plan
            .non_hosts
            .iter()
            .map(|id| lookup(id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            seed: plan.report.winning_seed,
            courses: by_position
                .into_iter()
                .map(|(position, groups)| CourseGroups { position, groups })
                .collect(),
            non_hosts,
        })
    }
}

/// Repeat-meeting score. Ordered lexicographically: total repeats, then the worst pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleScore {
    pub repeat_meetings: u32,
    pub max_pair_repeats: u32,
}

impl ScheduleScore {
    pub const PERFECT: ScheduleScore = ScheduleScore {
        repeat_meetings: 0,
        max_pair_repeats: 0,
    };

    pub fn new(repeat_meetings: u32, max_pair_repeats: u32) -> Self {
        Self {
            repeat_meetings,
            max_pair_repeats,
        }
    }

    pub fn is_perfect(&self) -> bool {
        *self == Self::PERFECT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A trial reached the lower bound for this dinner.
    Found,
    /// The attempt or time budget ran out; the best trial so far was kept.
    BudgetExhausted,
}

/// How the search ended.
///
/// Equality ignores `elapsed_ms`, so two runs with the same seeds and an attempt-only budget
/// compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub termination: Termination,
    /// Attempts that decided the result: up to the winner when found, else every attempt run.
    pub attempts: usize,
    pub winning_attempt: usize,
    pub winning_seed: u64,
    /// The wall-clock limit ended the search before the attempt ceiling.
    #[serde(default)]
    pub deadline_hit: bool,
    #[serde(default)]
    pub elapsed_ms: u64,
}

impl PartialEq for SearchReport {
    fn eq(&self, other: &Self) -> bool {
        self.termination == other.termination
            && self.attempts == other.attempts
            && self.winning_attempt == other.winning_attempt
            && self.winning_seed == other.winning_seed
            && self.deadline_hit == other.deadline_hit
    }
}

impl Eq for SearchReport {}

/// One group of one course, with teams referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMatch {
    pub id: Uuid,
    pub course_id: String,
    pub course_position: usize,
    pub group: usize,
    pub host: String,
    pub guests: Vec<String>,
}

impl CourseMatch {
    /// Host first, then guests.
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.host.as_str()).chain(self.guests.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub dinner_id: Uuid,
    /// Ordered by course position, then group.
    pub matches: Vec<CourseMatch>,
    pub score: ScheduleScore,
    pub lower_bound: ScheduleScore,
    #[serde(default)]
    pub non_hosts: Vec<String>,
    pub report: SearchReport,
}

impl Plan {
    pub(crate) fn from_trial(
        trial: &TrialPlan,
        team_set: &TeamSet,
        courses: &[Course],
        dinner_id: Uuid,
        score: ScheduleScore,
        lower_bound: ScheduleScore,
        report: SearchReport,
    ) -> Self {
        let id_of = |index: usize| team_set.team(index).id.clone();
        let mut matches = Vec::new();

        for (course, course_groups) in courses.iter().zip(&trial.courses) {
            for (group_index, group) in course_groups.groups.iter().enumerate() {
                matches.push(CourseMatch {
                    id: match_id(&dinner_id, course.position, group_index),
                    course_id: course.id.clone(),
                    course_position: course.position,
                    group: group_index,
                    host: id_of(group.host),
                    guests: group.guests.iter().map(|&guest| id_of(guest)).collect(),
                });
            }
        }

        Self {
            dinner_id,
            matches,
            score,
            lower_bound,
            non_hosts: trial.non_hosts.iter().map(|&index| id_of(index)).collect(),
            report,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.score <= self.lower_bound
    }

    pub fn matches_for_course(&self, position: usize) -> impl Iterator<Item = &CourseMatch> {
        self.matches
            .iter()
            .filter(move |course_match| course_match.course_position == position)
    }

    /// How many times each team hosts, keyed by team id.
    pub fn host_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for course_match in &self.matches {
            *counts.entry(course_match.host.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Stable id for a group: same dinner, course and group index give the same id.
fn match_id(dinner_id: &Uuid, position: usize, group: usize) -> Uuid {
    Uuid::new_v5(dinner_id, format!("course-match/{position}/{group}").as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_order_total_repeats_before_worst_pair() {
        let mut scores = vec![
            ScheduleScore::new(6, 1),
            ScheduleScore::new(5, 2),
            ScheduleScore::PERFECT,
            ScheduleScore::new(5, 1),
        ];
        scores.sort();
        assert_eq!(
            scores,
            vec![
                ScheduleScore::PERFECT,
                ScheduleScore::new(5, 1),
                ScheduleScore::new(5, 2),
                ScheduleScore::new(6, 1),
            ]
        );
        assert!(ScheduleScore::PERFECT.is_perfect());
    }

    fn report(elapsed_ms: u64) -> SearchReport {
        SearchReport {
            termination: Termination::BudgetExhausted,
            attempts: 8,
            winning_attempt: 3,
            winning_seed: 99,
            deadline_hit: false,
            elapsed_ms,
        }
    }

    #[test]
    fn report_equality_ignores_elapsed_time() {
        assert_eq!(report(5), report(4000));
        let mut cut_short = report(5);
        cut_short.deadline_hit = true;
        assert_ne!(report(5), cut_short);
    }

    #[test]
    fn stored_reports_without_timing_fields_still_load() {
        let stored = r#"{"termination":"found","attempts":1,"winning_attempt":0,"winning_seed":7}"#;
        let report: SearchReport = serde_json::from_str(stored).expect("report should parse");
        assert!(!report.deadline_hit);
        assert_eq!(report.elapsed_ms, 0);
    }

    #[test]
    fn match_ids_are_stable_and_distinct() {
        let dinner = Uuid::new_v4();
        assert_eq!(match_id(&dinner, 1, 2), match_id(&dinner, 1, 2));
        assert_ne!(match_id(&dinner, 1, 2), match_id(&dinner, 2, 1));
        assert_ne!(match_id(&dinner, 0, 0), match_id(&Uuid::new_v4(), 0, 0));
    }
}
