use anyhow::{Result, bail};
use chrono::NaiveDate;
use kalsync_core::config::GlobalConfig;
use kalsync_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::commands::{group_name, open_store};

pub fn run(
    config: &GlobalConfig,
    index: usize,
    title: &str,
    date: &str,
    alarm: Option<u32>,
    group: Option<&str>,
) -> Result<()> {
    let Ok(start_date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        bail!("Invalid date '{}'. Use the format YYYY-MM-DD.", date);
    };

    let mut store = open_store(config)?;
    let mut group = store.load_group(group_name(config, group))?;

    let Some(event) = group.events.get_mut(index) else {
        bail!("No event at position {} in group '{}'.", index, group.name);
    };

    event.update(title, start_date, alarm)?;
    store.replace_group(&group)?;

    println!("Updated '{}' on {}.", title.green(), start_date);
    Ok(())
}
