//! Reference-table inspection.

use nobetci_core::CityTable;

use crate::cli::CitiesArgs;
use crate::error::CliError;

pub fn handle(args: &CitiesArgs) -> Result<(), CliError> {
    let table = CityTable::global();

    match &args.districts {
        Some(city) => {
            let districts = table.districts(city).ok_or_else(|| CliError::Validation {
                field: "city".into(),
                reason: format!("'{city}' is not in the reference table"),
            })?;
            for district in districts {
                println!("{district}");
            }
        }
        None => {
            for city in table.cities() {
                println!("{city}");
            }
        }
    }
    Ok(())
}
