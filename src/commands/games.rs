//! Games listing command implementation

use crate::{cli::StorageArgs, model::time::format_instant, storage::GameRecord};

use super::{open_database, resolve_account_id};

/// Handle the games command
pub fn handle_games(
    storage: StorageArgs,
    season_id: Option<String>,
    as_json: bool,
) -> anyhow::Result<()> {
    let account_id = resolve_account_id(storage.account_id)?;
    let db = open_database(storage.db.as_deref())?;
    let games = db.list_games(&account_id, season_id.as_deref())?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&games)?);
        return Ok(());
    }

    if games.is_empty() {
        println!("No games found for account {}", account_id);
    }
    for game in &games {
        println!("{}", describe_game(game));
    }
    Ok(())
}

/// One-line description of a game and its placement
pub fn describe_game(game: &GameRecord) -> String {
    let matchup = format!(
        "{} [{}] {} vs {}",
        game.game_id, game.season_id, game.home_team_season_id, game.visitor_team_season_id
    );
    match (&game.field_id, game.start_time, game.end_time) {
        (Some(field), Some(start), Some(end)) => {
            let umpires = if game.umpire_ids.is_empty() {
                "no umpires".to_string()
            } else {
                game.umpire_ids.join(", ")
            };
            format!(
                "{} on {} {} → {} ({})",
                matchup,
                field,
                format_instant(start),
                format_instant(end),
                umpires
            )
        }
        _ => format!("{} (unscheduled)", matchup),
    }
}
