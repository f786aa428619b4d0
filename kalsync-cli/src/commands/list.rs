use anyhow::Result;
use kalsync_core::config::GlobalConfig;
use kalsync_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::commands::{group_name, open_store};

pub fn run(config: &GlobalConfig, group: Option<&str>) -> Result<()> {
    let store = open_store(config)?;
    let group = store.load_group(group_name(config, group))?;

    if group.is_empty() {
        println!("No events in group '{}'.", group.name);
        return Ok(());
    }

    for (i, event) in group.events.iter().enumerate() {
        let mut line = format!("{}: {}", event.start_date, event.title);
        if let Some(minutes) = event.alarm_minutes {
            line.push_str(&format!(" (alarm {} min)", minutes));
        }
        println!("{} {}", format!("[{}]", i).dimmed(), line);
    }

    Ok(())
}
