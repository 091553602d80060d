//! Entry management: list and remove.

use crate::cli::{EntriesCommand, GlobalOpts};
use crate::config::EntryStore;
use crate::error::CliError;
use crate::output;

pub fn handle(cmd: &EntriesCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let mut store = EntryStore::load(global.config_dir.as_deref())?;

    match cmd {
        EntriesCommand::List => {
            if store.entries().is_empty() {
                println!("No entries configured. Add one with: nobetci setup");
            } else {
                println!("{}", output::entries_table(store.entries()));
            }
            Ok(())
        }

        EntriesCommand::Remove { unique_id } => {
            let removed = store.remove(unique_id)?;
            store.save()?;
            println!("Removed {}", removed.unique_id());
            Ok(())
        }
    }
}
