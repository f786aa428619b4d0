use anyhow::{Result, bail};
use chrono::NaiveDate;
use kalsync_core::config::GlobalConfig;
use kalsync_core::event::Event;
use kalsync_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::commands::{group_name, open_store};

pub fn run(
    config: &GlobalConfig,
    title: &str,
    date: &str,
    alarm: Option<u32>,
    group: Option<&str>,
) -> Result<()> {
    let Ok(start_date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        bail!("Invalid date '{}'. Use the format YYYY-MM-DD.", date);
    };

    let event = Event::new(title, start_date, alarm)?;

    let mut store = open_store(config)?;
    let mut group = store.load_group(group_name(config, group))?;
    group.events.push(event);
    store.replace_group(&group)?;

    println!("Saved '{}' on {}.", title.green(), start_date);
    Ok(())
}
