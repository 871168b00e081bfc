//! Scoring and structural checks for trial plans.

use thiserror::Error;
use uuid::Uuid;

use crate::data::{HostingPolicy, TeamSet};
use crate::scheduler::meeting_graph::MeetingGraph;
use crate::scheduler::plan::{ScheduleScore, TrialPlan};

/// A broken plan invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("expected {expected} course(s), found {found}")]
    CourseCount { expected: usize, found: usize },

    #[error("course slot {index} has position {found}")]
    CoursePosition { index: usize, found: usize },

    #[error("plan belongs to dinner {found}, expected {expected}")]
    DinnerMismatch { expected: Uuid, found: Uuid },

    #[error("course {position}: plan names course '{found}', dinner has '{expected}'")]
    CourseMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("course {position}: expected {expected} group(s), found {found}")]
    GroupCount {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("course {position} group {group}: expected {expected} team(s), found {found}")]
    GroupSize {
        position: usize,
        group: usize,
        expected: usize,
        found: usize,
    },

    #[error("course {position} group {group}: team #{team} listed twice")]
    DuplicateMember {
        position: usize,
        group: usize,
        team: usize,
    },

    #[error("course {position}: team #{team} seated {count} time(s)")]
    Seating {
        position: usize,
        team: usize,
        count: usize,
    },

    #[error("team #{team} hosts {count} time(s), expected {expected}")]
    HostCount {
        team: usize,
        count: usize,
        expected: usize,
    },

    #[error("expected {expected} non-hosting team(s), found {found}")]
    NonHostCount { expected: usize, found: usize },

    #[error("team index {0} is outside the roster")]
    TeamOutOfRange(usize),

    #[error("team '{0}' is not on the roster")]
    UnknownTeam(String),
}

/// Lowest score any plan for (teams, group size, courses) can reach, from counting alone.
///
/// Each course seats every team with `group_size - 1` others, so the dinner produces
/// `courses * teams * (group_size - 1) / 2` pair meetings over `teams * (teams - 1) / 2`
/// distinct pairs. Meetings beyond the pair count must be repeats, and spreading them evenly
/// bounds the worst pair. The bound is not always reachable once hosting rules are applied.
pub fn lower_bound(teams: usize, group_size: usize, courses: usize) -> ScheduleScore {
    if teams == 0 || group_size == 0 {
        return ScheduleScore::PERFECT;
    }
    let pair_meetings = courses * teams * (group_size - 1) / 2;
    let distinct_pairs = teams * teams.saturating_sub(1) / 2;
    let repeats = pair_meetings.saturating_sub(distinct_pairs);
    let worst = if repeats == 0 {
        0
    } else {
        pair_meetings.div_ceil(distinct_pairs) - 1
    };
    ScheduleScore::new(saturate(repeats), saturate(worst))
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleEvaluator {
    team_count: usize,
    group_size: usize,
    course_count: usize,
    hosting: HostingPolicy,
}

impl ScheduleEvaluator {
    pub fn new(team_set: &TeamSet, course_count: usize, hosting: HostingPolicy) -> Self {
        Self {
            team_count: team_set.len(),
            group_size: team_set.group_size(),
            course_count,
            hosting,
        }
    }

    /// Rebuilds the meeting graph from the trial's groups. Pure: scoring twice gives the same score.
    pub fn meeting_graph(&self, trial: &TrialPlan) -> MeetingGraph {
        let mut graph = MeetingGraph::new(self.team_count);
        for course in &trial.courses {
            for group in &course.groups {
                let members: Vec<usize> = group
                    .members()
                    .into_iter()
                    .filter(|&team| team < self.team_count)
                    .collect();
                graph.record_group(&members);
            }
        }
        graph
    }

    pub fn score(&self, trial: &TrialPlan) -> ScheduleScore {
        let graph = self.meeting_graph(trial);
        ScheduleScore::new(graph.repeat_meetings(), graph.max_pair_repeats())
    }

    pub fn lower_bound(&self) -> ScheduleScore {
        lower_bound(self.team_count, self.group_size, self.course_count)
    }

    pub fn is_optimal(&self, score: ScheduleScore) -> bool {
        score <= self.lower_bound()
    }

    /// Every invariant the trial breaks. Empty means structurally valid.
    pub fn structural_violations(&self, trial: &TrialPlan) -> Vec<Violation> {
        let mut violations = Vec::new();
        let per_course = self.team_count / self.group_size.max(1);

        if trial.courses.len() != self.course_count {
            violations.push(Violation::CourseCount {
                expected: self.course_count,
                found: trial.courses.len(),
            });
        }

        let mut host_counts = vec![0usize; self.team_count];
        for (index, course) in trial.courses.iter().enumerate() {
            let position = course.position;
            if position != index {
                violations.push(Violation::CoursePosition {
                    index,
                    found: position,
                });
            }
            if course.groups.len() != per_course {
                violations.push(Violation::GroupCount {
                    position,
                    expected: per_course,
                    found: course.groups.len(),
                });
            }

            let mut seated = vec![0usize; self.team_count];
            for (group_index, group) in course.groups.iter().enumerate() {
                let members = group.members();
                if members.len() != self.group_size {
                    violations.push(Violation::GroupSize {
                        position,
                        group: group_index,
                        expected: self.group_size,
                        found: members.len(),
                    });
                }

                let mut in_group = Vec::with_capacity(members.len());
                for team in members {
                    if team >= self.team_count {
                        violations.push(Violation::TeamOutOfRange(team));
                        continue;
                    }
                    if in_group.contains(&team) {
                        violations.push(Violation::DuplicateMember {
                            position,
                            group: group_index,
                            team,
                        });
                        continue;
                    }
                    in_group.push(team);
                    seated[team] += 1;
                }
                if let Some(count) = host_counts.get_mut(group.host) {
                    *count += 1;
                }
            }

            for (team, &count) in seated.iter().enumerate() {
                if count != 1 {
                    violations.push(Violation::Seating {
                        position,
                        team,
                        count,
                    });
                }
            }
        }

        let expected_non_hosts = match self.hosting {
            HostingPolicy::EveryTeamHosts => 0,
            HostingPolicy::RosterPriority => self
                .team_count
                .saturating_sub(self.course_count * per_course),
        };
        if trial.non_hosts.len() != expected_non_hosts {
            violations.push(Violation::NonHostCount {
                expected: expected_non_hosts,
                found: trial.non_hosts.len(),
            });
        }

        for (team, &count) in host_counts.iter().enumerate() {
            let expected = usize::from(!trial.non_hosts.contains(&team));
            if count != expected {
                violations.push(Violation::HostCount {
                    team,
                    count,
                    expected,
                });
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Team;
    use crate::scheduler::plan::{CourseGroups, Group};

    fn team_set(teams: usize, group_size: usize) -> TeamSet {
        let roster = (0..teams).map(|i| Team::new(format!("t{i}"))).collect();
        TeamSet::validate(roster, group_size).expect("valid roster")
    }

    fn group(host: usize, guests: &[usize]) -> Group {
        Group {
            host,
            guests: guests.to_vec(),
        }
    }

    /// Affine plane of order 3 with a transversal host per group: no pair meets twice.
    fn nine_team_perfect_plan() -> TrialPlan {
        TrialPlan {
            seed: 0,
            courses: vec![
                CourseGroups {
                    position: 0,
                    groups: vec![group(0, &[1, 2]), group(3, &[4, 5]), group(6, &[7, 8])],
                },
                CourseGroups {
                    position: 1,
                    groups: vec![group(1, &[3, 8]), group(4, &[6, 2]), group(7, &[0, 5])],
                },
                CourseGroups {
                    position: 2,
                    groups: vec![group(2, &[3, 7]), group(5, &[6, 1]), group(8, &[0, 4])],
                },
            ],
            non_hosts: Vec::new(),
        }
    }

    #[test]
    fn perfect_nine_team_plan_scores_zero_and_is_valid() {
        let evaluator = ScheduleEvaluator::new(&team_set(9, 3), 3, HostingPolicy::EveryTeamHosts);
        let trial = nine_team_perfect_plan();
        assert_eq!(evaluator.score(&trial), ScheduleScore::PERFECT);
        assert!(evaluator.structural_violations(&trial).is_empty());
        assert!(evaluator.is_optimal(evaluator.score(&trial)));
    }

    #[test]
    fn scoring_is_idempotent() {
        let evaluator = ScheduleEvaluator::new(&team_set(9, 3), 3, HostingPolicy::EveryTeamHosts);
        let mut trial = nine_team_perfect_plan();
        trial.courses[2].groups[0] = group(2, &[0, 1]);
        trial.courses[2].groups[2] = group(8, &[3, 4]);
        trial.courses[2].groups[1] = group(5, &[6, 7]);

        let first = evaluator.score(&trial);
        let second = evaluator.score(&trial);
        assert_eq!(first, second);
        assert!(first.repeat_meetings > 0);
    }

    #[test]
    fn structural_violations_name_each_broken_rule() {
        let evaluator = ScheduleEvaluator::new(&team_set(6, 3), 2, HostingPolicy::EveryTeamHosts);
        let trial = TrialPlan {
            seed: 0,
            courses: vec![
                CourseGroups {
                    position: 0,
                    groups: vec![group(0, &[1, 1]), group(3, &[4, 5])],
                },
                CourseGroups {
                    position: 1,
                    groups: vec![group(0, &[2, 4]), group(1, &[3])],
                },
            ],
            non_hosts: Vec::new(),
        };

        let violations = evaluator.structural_violations(&trial);
        assert!(violations.contains(&Violation::DuplicateMember {
            position: 0,
            group: 0,
            team: 1
        }));
        assert!(violations.contains(&Violation::Seating {
            position: 0,
            team: 2,
            count: 0
        }));
        assert!(violations.contains(&Violation::GroupSize {
            position: 1,
            group: 1,
            expected: 3,
            found: 2
        }));
        assert!(violations.contains(&Violation::HostCount {
            team: 0,
            count: 2,
            expected: 1
        }));
        assert!(violations.contains(&Violation::HostCount {
            team: 2,
            count: 0,
            expected: 1
        }));
    }

    #[test]
    fn course_positions_must_run_from_zero_without_gaps() {
        let evaluator = ScheduleEvaluator::new(&team_set(9, 3), 3, HostingPolicy::EveryTeamHosts);
        let mut trial = nine_team_perfect_plan();
        trial.courses[2].position = 7;

        assert_eq!(
            evaluator.structural_violations(&trial),
            vec![Violation::CoursePosition { index: 2, found: 7 }]
        );
    }

    #[test]
    fn indices_outside_the_roster_are_reported_not_indexed() {
        let evaluator = ScheduleEvaluator::new(&team_set(9, 3), 3, HostingPolicy::EveryTeamHosts);
        let mut trial = nine_team_perfect_plan();
        trial.courses[0].groups[0] = group(0, &[1, 99]);

        let violations = evaluator.structural_violations(&trial);
        assert!(violations.contains(&Violation::TeamOutOfRange(99)));
        assert!(violations.contains(&Violation::Seating {
            position: 0,
            team: 2,
            count: 0
        }));
        // Scoring skips the stray index instead of panicking.
        assert_eq!(evaluator.score(&trial).repeat_meetings, 0);
    }

    #[test]
    fn lower_bound_counts_unavoidable_repeats() {
        assert_eq!(lower_bound(9, 3, 3), ScheduleScore::PERFECT);
        // Six teams, three courses: 18 meetings over 15 pairs.
        assert_eq!(lower_bound(6, 3, 3), ScheduleScore::new(3, 1));
        // One group per course: the same three teams meet every time.
        assert_eq!(lower_bound(3, 3, 3), ScheduleScore::new(6, 2));
        assert_eq!(lower_bound(4, 1, 1), ScheduleScore::PERFECT);
    }
}
