//! Guided setup: drives the three-step flow and persists the entry.

use dialoguer::{Password, Select};

use nobetci_core::{FlowError, SetupFlow};

use super::prompt_err;
use crate::cli::{GlobalOpts, SetupArgs};
use crate::config::{EntryRecord, EntryStore};
use crate::error::CliError;

pub async fn handle(args: &SetupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut store = EntryStore::load(global.config_dir.as_deref())?;
    let mut flow = SetupFlow::new(store.unique_ids());

    // ── Step `user`: credential entry, re-shown until it validates ───
    let interactive = args.api_key.is_none();
    let mut provided = args.api_key.clone();
    loop {
        let key = match provided.take() {
            Some(key) => key,
            None => Password::new()
                .with_prompt("CollectAPI key")
                .interact()
                .map_err(prompt_err)?,
        };

        match flow.submit_api_key(&key).await {
            Ok(()) => break,
            Err(
                err @ (FlowError::InvalidAuth | FlowError::CannotConnect | FlowError::Unknown),
            ) => {
                if !interactive {
                    return Err(err.into());
                }
                eprintln!("{}: {err}", err.error_key());
            }
            Err(err) => return Err(err.into()),
        }
    }

    // ── Step `location`: city choice from the reference table ────────
    let cities = flow.city_choices();
    if cities.is_empty() {
        return Err(CliError::EmptyCityTable);
    }
    let city_index = Select::new()
        .with_prompt("City")
        .items(&cities)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    flow.submit_city(&cities[city_index])?;

    // ── Step `district`: district + refresh hour ─────────────────────
    let districts = flow.district_choices()?;
    let district_index = Select::new()
        .with_prompt("District")
        .items(&districts)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let hours = SetupFlow::hour_choices();
    let default_hour = hours
        .iter()
        .position(|h| *h == SetupFlow::default_hour_choice())
        .unwrap_or(0);
    let hour_index = Select::new()
        .with_prompt("Daily refresh hour")
        .items(&hours)
        .default(default_hour)
        .interact()
        .map_err(prompt_err)?;

    let entry = match flow.submit_district(&districts[district_index], &hours[hour_index]) {
        Ok(entry) => entry,
        Err(FlowError::AlreadyConfigured) => {
            return Err(CliError::AlreadyConfigured {
                unique_id: format!("{}_{}", cities[city_index], districts[district_index]),
            });
        }
        Err(err) => return Err(err.into()),
    };

    store.add(EntryRecord::from_entry(&entry))?;
    store.save()?;

    println!("Created {}", entry.title());
    Ok(())
}
