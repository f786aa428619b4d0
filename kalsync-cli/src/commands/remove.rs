use anyhow::{Result, bail};
use kalsync_core::config::GlobalConfig;
use kalsync_core::store::EventStore;

use crate::commands::{group_name, open_store};

pub fn run(config: &GlobalConfig, index: usize, group: Option<&str>) -> Result<()> {
    let mut store = open_store(config)?;
    let mut group = store.load_group(group_name(config, group))?;

    if index >= group.events.len() {
        bail!("No event at position {} in group '{}'.", index, group.name);
    }

    // Local only: the next push resends the group without this event, so
    // the server copy drops it without an explicit deletion.
    let removed = group.events.remove(index);
    store.replace_group(&group)?;

    println!("Removed '{}'.", removed.title);
    Ok(())
}
