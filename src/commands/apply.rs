//! Apply command implementation

use std::path::PathBuf;

use crate::{
    cli::StorageArgs, scheduling::apply_proposal, ApplyContext, ApplyRequest, ApplyResult,
};

use super::{open_database, read_json, resolve_account_id};

/// Handle the apply command
pub fn handle_apply(
    request: PathBuf,
    storage: StorageArgs,
    season_id: Option<String>,
    as_json: bool,
) -> anyhow::Result<()> {
    let account_id = resolve_account_id(storage.account_id)?;
    let request: ApplyRequest = read_json(&request)?;
    let mut db = open_database(storage.db.as_deref())?;

    let context = ApplyContext { season_id };
    let result = apply_proposal(&mut db, &account_id, &request, Some(&context))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &ApplyResult) {
    println!(
        "Run {}: {:?} ({} applied, {} skipped)",
        result.run_id,
        result.status,
        result.applied_game_ids.len(),
        result.skipped.len()
    );
    for game_id in &result.applied_game_ids {
        println!("  ✓ {}", game_id);
    }
    for skip in &result.skipped {
        println!("  ⚠ {}: {}", skip.game_id, skip.reason);
    }
}
