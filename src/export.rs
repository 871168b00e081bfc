//! Flat CSV rendering of a plan, one row per group, for printing or spreadsheet import.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::data::Team;
use crate::scheduler::plan::Plan;

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    course_position: usize,
    course_id: &'a str,
    group: usize,
    host: &'a str,
    host_address: &'a str,
    guests: String,
}

/// Writes the plan as CSV. Guests are joined with `;`. `teams` supplies host addresses;
/// hosts missing from it get an empty address.
pub fn write_plan_csv<W: Write>(plan: &Plan, teams: &[Team], writer: W) -> Result<(), csv::Error> {
    let addresses: HashMap<&str, &str> = teams
        .iter()
        .map(|team| (team.id.as_str(), team.address.as_str()))
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    for course_match in &plan.matches {
        csv_writer.serialize(PlanRow {
            course_position: course_match.course_position,
            course_id: &course_match.course_id,
            group: course_match.group,
            host: &course_match.host,
            host_address: addresses
                .get(course_match.host.as_str())
                .copied()
                .unwrap_or(""),
            guests: course_match.guests.join(";"),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn plan_to_csv_string(plan: &Plan, teams: &[Team]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_plan_csv(plan, teams, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::scheduler::plan::{CourseMatch, ScheduleScore, SearchReport, Termination};

    fn two_group_plan() -> Plan {
        let dinner_id = Uuid::nil();
        Plan {
            dinner_id,
            matches: vec![
                CourseMatch {
                    id: Uuid::nil(),
                    course_id: "starter".to_string(),
                    course_position: 0,
                    group: 0,
                    host: "a".to_string(),
                    guests: vec!["b".to_string(), "c".to_string()],
                },
                CourseMatch {
                    id: Uuid::nil(),
                    course_id: "starter".to_string(),
                    course_position: 0,
                    group: 1,
                    host: "d".to_string(),
                    guests: vec!["e".to_string(), "f".to_string()],
                },
            ],
            score: ScheduleScore::PERFECT,
            lower_bound: ScheduleScore::PERFECT,
            non_hosts: Vec::new(),
            report: SearchReport {
                termination: Termination::Found,
                attempts: 1,
                winning_attempt: 0,
                winning_seed: 0,
                deadline_hit: false,
                elapsed_ms: 3,
            },
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_group() {
        let teams = vec![Team::new("a").with_address("1 Elm St")];
        let csv = plan_to_csv_string(&two_group_plan(), &teams).expect("csv should render");
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "course_position,course_id,group,host,host_address,guests"
        );
        assert_eq!(lines[1], "0,starter,0,a,1 Elm St,b;c");
        assert_eq!(lines[2], "0,starter,1,d,,e;f");
        assert_eq!(lines.len(), 3);
    }
}
