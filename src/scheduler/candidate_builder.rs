//! Builds one complete trial plan from a seed.
//!
//! The seed permutes the roster once; that permutation decides host cohorts and breaks every
//! tie during guest selection. Guests are packed greedily, one group at a time, preferring
//! teams that have met the group's current members least often so far.

use crate::data::{Course, HostingPolicy, TeamSet};
use crate::scheduler::meeting_graph::MeetingGraph;
use crate::scheduler::plan::{CourseGroups, Group, TrialPlan};
use crate::scheduler::rng::Rng;

#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateBuilder {
    hosting: HostingPolicy,
}

impl CandidateBuilder {
    pub fn new(hosting: HostingPolicy) -> Self {
        Self { hosting }
    }

    /// Expects a configuration that already passed validation: `courses` sorted by position and
    /// no more hosting slots than teams.
    pub fn build(&self, team_set: &TeamSet, courses: &[Course], seed: u64) -> TrialPlan {
        let team_count = team_set.len();
        let group_size = team_set.group_size();
        let per_course = team_set.groups_per_course();
        let slots = (courses.len() * per_course).min(team_count);

        let mut rng = Rng::new(seed);
        let mut order: Vec<usize> = (0..team_count).collect();
        rng.shuffle(&mut order);

        let (hosts, mut non_hosts) = self.split_hosts(&order, slots);
        non_hosts.sort_unstable();

        let mut graph = MeetingGraph::new(team_count);
        let mut planned = Vec::with_capacity(courses.len());

        for (course, cohort) in courses.iter().zip(hosts.chunks(per_course)) {
            let mut course_hosts = cohort.to_vec();
            rng.shuffle(&mut course_hosts);

            let mut grouped = vec![false; team_count];
            for &host in &course_hosts {
                grouped[host] = true;
            }

            let mut groups = Vec::with_capacity(per_course);
            for &host in &course_hosts {
                let mut members = Vec::with_capacity(group_size);
                members.push(host);
                while members.len() < group_size {
                    // `order` is the permuted roster, so the first minimum wins ties.
                    let Some(guest) = order
                        .iter()
                        .copied()
                        .filter(|&team| !grouped[team])
                        .min_by_key(|&team| graph.cost_with(team, &members))
                    else {
                        break;
                    };
                    grouped[guest] = true;
                    members.push(guest);
                }
                graph.record_group(&members);
                groups.push(Group {
                    host,
                    guests: members[1..].to_vec(),
                });
            }

            planned.push(CourseGroups {
                position: course.position,
                groups,
            });
        }

        TrialPlan {
            seed,
            courses: planned,
            non_hosts,
        }
    }

    /// Hosts in cohort order, plus the teams that never host.
    fn split_hosts(&self, order: &[usize], slots: usize) -> (Vec<usize>, Vec<usize>) {
        match self.hosting {
            HostingPolicy::EveryTeamHosts => {
                (order[..slots].to_vec(), order[slots..].to_vec())
            }
            // Earliest sign-ups win the slots; the permutation only orders them into cohorts.
            HostingPolicy::RosterPriority => order
                .iter()
                .copied()
                .partition(|&team| team < slots),
        }
    }
}
