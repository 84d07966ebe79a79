//! Import command implementation

use std::path::PathBuf;

use crate::{cli::StorageArgs, storage::SeedData};

use super::{open_database, read_json, resolve_account_id};

/// Handle the import command
pub fn handle_import(seed: PathBuf, storage: StorageArgs) -> anyhow::Result<()> {
    let account_id = resolve_account_id(storage.account_id)?;
    let seed: SeedData = read_json(&seed)?;
    let mut db = open_database(storage.db.as_deref())?;

    db.import_seed(&account_id, &seed)?;

    println!(
        "✓ Imported {} fields and {} games for account {}",
        seed.fields.len(),
        seed.games.len(),
        account_id
    );
    Ok(())
}
