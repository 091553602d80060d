//! Options flow: change only the daily refresh hour of an entry.

use dialoguer::Select;

use nobetci_core::OptionsFlow;
use nobetci_core::config::format_hour;

use super::prompt_err;
use crate::cli::{GlobalOpts, OptionsArgs};
use crate::config::EntryStore;
use crate::error::CliError;

pub fn handle(args: &OptionsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut store = EntryStore::load(global.config_dir.as_deref())?;
    let record = store
        .get(&args.unique_id)
        .ok_or_else(|| CliError::EntryNotFound {
            unique_id: args.unique_id.clone(),
        })?;

    let flow = OptionsFlow::new(Some(record.refresh_hour));

    let choice = match &args.hour {
        Some(hour) => hour.clone(),
        None => {
            let hours = OptionsFlow::hour_choices();
            let default_index = hours
                .iter()
                .position(|h| *h == flow.default_choice())
                .unwrap_or(0);
            let index = Select::new()
                .with_prompt("Daily refresh hour")
                .items(&hours)
                .default(default_index)
                .interact()
                .map_err(prompt_err)?;
            hours[index].clone()
        }
    };

    let hour = flow.submit(&choice)?;
    store.set_refresh_hour(&args.unique_id, hour)?;
    store.save()?;

    println!(
        "Refresh hour for {} set to {}",
        args.unique_id,
        format_hour(hour)
    );
    Ok(())
}
