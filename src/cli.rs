use std::env;
use std::str::FromStr;

use serde_json::json;

use crate::data::{load_dinner_file, load_plan, DinnerFile};
use crate::export::plan_to_csv_string;
use crate::scheduler::{validate_dinner, MatchScheduler};

const USAGE: &str = "usage: progressive-dinner <schedule|validate|score>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Schedule,
    Validate,
    Score,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("schedule") => Some(Command::Schedule),
        Some("validate") => Some(Command::Validate),
        Some("score") => Some(Command::Score),
        _ => None,
    }
}

pub fn run() -> i32 {
    let args: Vec<String> = env::args().collect();
    run_with_args(&args)
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Schedule) => handle_schedule(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Score) => handle_score(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_schedule(args: &[String]) -> i32 {
    let Some(path) = positional(args, 2) else {
        eprintln!(
            "usage: progressive-dinner schedule <dinner-file> [--attempts N] [--seed S] \
             [--workers W] [--time-limit-ms M] [--csv]"
        );
        return 2;
    };
    let Some(DinnerFile { mut dinner, teams }) = load_or_report(path) else {
        return 1;
    };

    let budget = &mut dinner.budget;
    budget.max_attempts = parse_flag(args, "--attempts").unwrap_or(budget.max_attempts);
    budget.workers = parse_flag(args, "--workers").unwrap_or(budget.workers);
    if let Some(seed) = parse_flag(args, "--seed") {
        budget.base_seed = Some(seed);
        budget.seeds = None;
    }
    if let Some(limit) = parse_flag(args, "--time-limit-ms") {
        budget.time_limit_ms = Some(limit);
    }

    let plan = match MatchScheduler::new().schedule(&dinner, teams.clone()) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("scheduling failed: {err}");
            return 1;
        }
    };

    let rendered = if args.iter().any(|arg| arg == "--csv") {
        plan_to_csv_string(&plan, &teams).map_err(|err| err.to_string())
    } else {
        serde_json::to_string_pretty(&plan).map_err(|err| err.to_string())
    };
    match rendered {
        Ok(payload) => {
            print!("{payload}");
            if !payload.ends_with('\n') {
                println!();
            }
            0
        }
        Err(err) => {
            eprintln!("failed to render plan: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = positional(args, 2) else {
        eprintln!("usage: progressive-dinner validate <dinner-file>");
        return 2;
    };
    let Some(DinnerFile { dinner, teams }) = load_or_report(path) else {
        return 1;
    };

    match validate_dinner(&dinner, teams) {
        Ok(validated) => {
            let bound = validated.lower_bound();
            println!(
                "validation passed: teams={}, group_size={}, courses={}, lower_bound=({}, {})",
                validated.team_set.len(),
                validated.team_set.group_size(),
                validated.courses.len(),
                bound.repeat_meetings,
                bound.max_pair_repeats
            );
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_score(args: &[String]) -> i32 {
    let (Some(dinner_path), Some(plan_path)) = (positional(args, 2), positional(args, 3)) else {
        eprintln!("usage: progressive-dinner score <dinner-file> <plan-file>");
        return 2;
    };
    let Some(DinnerFile { dinner, teams }) = load_or_report(dinner_path) else {
        return 1;
    };
    let plan = match load_plan(plan_path) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let validated = match validate_dinner(&dinner, teams) {
        Ok(validated) => validated,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let evaluator = validated.evaluator();
    let trial = match validated.trial_from_plan(&plan) {
        Ok(trial) => trial,
        Err(violation) => {
            eprintln!("plan does not match dinner: {violation}");
            return 1;
        }
    };
    let violations = evaluator.structural_violations(&trial);
    if !violations.is_empty() {
        eprintln!("plan is invalid: {} violation(s)", violations.len());
        for violation in violations {
            eprintln!("- {violation}");
        }
        return 1;
    }

    let score = evaluator.score(&trial);
    let lower_bound = evaluator.lower_bound();
    let payload = json!({
        "score": score,
        "lower_bound": lower_bound,
        "optimal": score <= lower_bound,
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize score: {err}");
            1
        }
    }
}

fn load_or_report(path: &str) -> Option<DinnerFile> {
    load_dinner_file(path)
        .map_err(|err| eprintln!("{err}"))
        .ok()
}

/// Positional argument at `index`. Flags always follow positionals.
fn positional(args: &[String], index: usize) -> Option<&str> {
    args.get(index)
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
}

/// Value following `name`. Invalid values are reported and ignored.
fn parse_flag<T: FromStr>(args: &[String], name: &str) -> Option<T> {
    let raw = args
        .iter()
        .position(|arg| arg == name)
        .and_then(|index| args.get(index + 1))?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("invalid {name} '{raw}', keeping configured value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn commands_dispatch_by_name() {
        assert_eq!(
            parse_command(&args(&["bin", "schedule", "x.json"])),
            Some(Command::Schedule)
        );
        assert_eq!(parse_command(&args(&["bin", "score"])), Some(Command::Score));
        assert_eq!(parse_command(&args(&["bin", "serve"])), None);
        assert_eq!(parse_command(&args(&["bin"])), None);
    }

    #[test]
    fn flags_parse_and_reject_garbage() {
        let argv = args(&["bin", "schedule", "d.json", "--attempts", "64", "--seed", "nope"]);
        assert_eq!(parse_flag::<usize>(&argv, "--attempts"), Some(64));
        assert_eq!(parse_flag::<u64>(&argv, "--seed"), None);
        assert_eq!(parse_flag::<u64>(&argv, "--workers"), None);
    }

    #[test]
    fn flags_are_not_positionals() {
        let argv = args(&["bin", "schedule", "--csv"]);
        assert_eq!(positional(&argv, 2), None);
    }
}
