use anyhow::Result;
use kalsync_core::config::GlobalConfig;
use kalsync_core::remote::RemoteCalendar;
use kalsync_core::sync::SyncEngine;
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
    let engine = SyncEngine::new(store);
    let remote = RemoteCalendar::new(&url);
    let name = group_name(config, group);

    match engine.push(&remote, &credentials, name).await {
        Ok(()) => {
            println!("{}", format!("Pushed group '{}'.", name).green());
            Ok(())
        }
        Err(e) => {
            // Attempts are exhausted at this point; report and stop.
            tracing::error!(group = name, error = %e, "push failed");
            println!("{}", format!("Push failed: {}", e).red());
            Err(e.into())
        }
    }
}
