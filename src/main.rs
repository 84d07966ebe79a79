//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use league_scheduler::{
    cli::{Commands, LeagueScheduler},
    commands::{
        apply::handle_apply,
        games::handle_games,
        import::handle_import,
        solve::{handle_solve, SolveParams},
    },
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = LeagueScheduler::parse();

    match app.command {
        Commands::Solve {
            problems,
            account_id,
            out,
            json,
        } => handle_solve(SolveParams {
            problems,
            account_id,
            out_dir: out,
            as_json: json,
        })?,

        Commands::Apply {
            request,
            storage,
            season_id,
            json,
        } => handle_apply(request, storage, season_id, json)?,

        Commands::Import { seed, storage } => handle_import(seed, storage)?,

        Commands::Games {
            storage,
            season_id,
            json,
        } => handle_games(storage, season_id, json)?,
    }

    Ok(())
}
