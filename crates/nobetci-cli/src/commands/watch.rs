//! Watch: one coordinator per entry, sensors rendered on every refresh.

use std::time::Duration;

use tokio::sync::mpsc;

use nobetci_core::{Coordinator, PharmacySensor, build_sensors};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config::EntryStore;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = EntryStore::load(global.config_dir.as_deref())?;
    if store.entries().is_empty() {
        return Err(CliError::NoEntries);
    }

    let mut coordinators = Vec::with_capacity(store.entries().len());
    for record in store.entries() {
        let mut entry = record.to_entry()?;
        if let Some(secs) = args.interval_secs {
            entry.update_interval = Duration::from_secs(secs);
        }
        coordinators.push(Coordinator::from_entry(entry)?);
    }

    if args.once {
        for coordinator in &coordinators {
            coordinator.refresh().await;
        }
        let projections = project(&coordinators);
        render(&projections);
        return Ok(());
    }

    // Immediate refresh, then the fixed-interval loop per coordinator.
    for coordinator in &coordinators {
        coordinator.start().await;
    }

    // The sensor set is fixed from the first snapshot; later polls only
    // change values and availability.
    let projections = project(&coordinators);

    // Funnel every coordinator's state changes into one channel.
    let (tx, mut rx) = mpsc::channel::<()>(8);
    for coordinator in &coordinators {
        let mut sub = coordinator.subscribe();
        let tx = tx.clone();
        tokio::spawn(async move {
            while sub.changed().await.is_ok() {
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
    }
    drop(tx);

    render(&projections);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = rx.recv() => {
                if received.is_some() {
                    render(&projections);
                } else {
                    break;
                }
            }
        }
    }

    for coordinator in &coordinators {
        coordinator.shutdown().await;
    }
    Ok(())
}

fn project(coordinators: &[Coordinator]) -> Vec<(Coordinator, Vec<PharmacySensor>)> {
    coordinators
        .iter()
        .map(|coordinator| (coordinator.clone(), build_sensors(coordinator)))
        .collect()
}

fn render(projections: &[(Coordinator, Vec<PharmacySensor>)]) {
    for (coordinator, sensors) in projections {
        println!("{}", output::device_banner(coordinator));
        if sensors.is_empty() {
            println!("  (no duty pharmacy right now)");
        } else {
            println!("{}", output::sensor_table(sensors));
        }
    }
}
