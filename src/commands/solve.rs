//! Solve command implementation

use std::path::PathBuf;

use anyhow::Context;

use crate::{model::SchedulingProblem, scheduling::solve_all, AccountId, SolveResult};

use super::{read_json, resolve_account_id};

/// Parameters for the solve command
#[derive(Debug)]
pub struct SolveParams {
    pub problems: Vec<PathBuf>,
    pub account_id: Option<AccountId>,
    pub out_dir: Option<PathBuf>,
    pub as_json: bool,
}

/// Handle the solve command
///
/// Every file is read first, then all problems are solved in parallel. A
/// structurally invalid problem fails the command after the others are
/// reported.
pub fn handle_solve(params: SolveParams) -> anyhow::Result<()> {
    let account_id = resolve_account_id(params.account_id)?;

    let problems = params
        .problems
        .iter()
        .map(|path| read_json::<SchedulingProblem>(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let results = solve_all(&account_id, &problems);

    let mut solved = Vec::new();
    let mut failures = 0usize;
    for (path, result) in params.problems.iter().zip(results) {
        match result {
            Ok(result) => {
                if let Some(dir) = &params.out_dir {
                    write_result(dir, &result)?;
                }
                if !params.as_json {
                    print_summary(&path.display().to_string(), &result);
                }
                solved.push(result);
            }
            Err(e) => {
                failures += 1;
                eprintln!("✗ {}: {}", path.display(), e);
            }
        }
    }

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&solved)?);
    }

    if failures > 0 {
        anyhow::bail!("{} of {} problems failed validation", failures, params.problems.len());
    }
    Ok(())
}

fn write_result(dir: &std::path::Path, result: &SolveResult) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}.json", result.run_id));
    std::fs::write(&path, serde_json::to_string_pretty(result)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn print_summary(label: &str, result: &SolveResult) {
    println!(
        "{}: run {} {:?} ({}/{} games scheduled)",
        label,
        result.run_id,
        result.status,
        result.metrics.scheduled_games,
        result.metrics.total_games
    );
    for assignment in &result.assignments {
        println!(
            "  ✓ {} on {} {} → {} umpires [{}]",
            assignment.game_id,
            assignment.field_id,
            assignment.start_time,
            assignment.end_time,
            assignment.umpire_ids.join(", ")
        );
    }
    for unscheduled in &result.unscheduled {
        println!("  ⚠ {}: {}", unscheduled.game_id, unscheduled.reason);
    }
}
