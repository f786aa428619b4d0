use anyhow::Result;
use dialoguer::Select;
use kalsync_core::config::GlobalConfig;
use kalsync_core::remote::RemoteCalendar;
use kalsync_core::sync::{Conflict, Resolution, SyncEngine};
use owo_colors::OwoColorize;

use crate::commands::{group_name, open_store, prompt_credentials, resolve_url};

pub async fn run(
    config: &GlobalConfig,
    url: Option<&str>,
    user: Option<&str>,
    group: Option<&str>,
) -> Result<()> {
    let url = resolve_url(config, url)?;
    let credentials = prompt_credentials(config, user)?;

    let store = open_store(config)?;
    let mut engine = SyncEngine::new(store);
    let remote = RemoteCalendar::new(&url);
    let name = group_name(config, group);

    match engine
        .sync(&remote, Some(&credentials), name, &mut prompt_resolution)
        .await
    {
        Ok(report) => {
            println!(
                "Synced '{}': {} remote events, {} added, {} conflicts resolved.",
                name, report.fetched, report.added, report.conflicts
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", format!("Sync failed: {}", e).red());
            Err(e.into())
        }
    }
}

/// Ask the user which side of a conflict should win.
fn prompt_resolution(conflict: &Conflict) -> Resolution {
    println!(
        "\nConflict on '{}':\n  local:  {} ({})\n  remote: {} ({})",
        conflict.uid,
        conflict.local.title.yellow(),
        conflict.local.start_date,
        conflict.remote.title.cyan(),
        conflict.remote.start_date,
    );

    let choice = Select::new()
        .with_prompt("Which version should win?")
        .items(&["Keep local", "Keep remote"])
        .default(0)
        .interact()
        .unwrap_or(0);

    if choice == 1 {
        Resolution::KeepRemote
    } else {
        Resolution::KeepLocal
    }
}
