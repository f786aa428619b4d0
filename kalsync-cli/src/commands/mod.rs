pub mod add;
pub mod edit;
pub mod list;
pub mod push;
pub mod remove;
pub mod sync;

use anyhow::{Context, Result, bail};
use dialoguer::Input;
use kalsync_core::config::GlobalConfig;
use kalsync_core::remote::Credentials;
use kalsync_core::store::SqliteStore;

/// Open the store at the configured path, creating parent directories.
pub(crate) fn open_store(config: &GlobalConfig) -> Result<SqliteStore> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open store at {}", config.db_path.display()))
}

pub(crate) fn group_name<'a>(config: &'a GlobalConfig, flag: Option<&'a str>) -> &'a str {
    flag.unwrap_or(&config.default_group)
}

pub(crate) fn resolve_url(config: &GlobalConfig, flag: Option<&str>) -> Result<String> {
    match flag.or(config.remote_url.as_deref()) {
        Some(url) => Ok(url.to_string()),
        None => bail!("No remote URL. Pass --url or set remote_url in the config file."),
    }
}

/// Gather remote credentials, prompting for whatever was not supplied.
pub(crate) fn prompt_credentials(config: &GlobalConfig, user: Option<&str>) -> Result<Credentials> {
    let username = match user.or(config.username.as_deref()) {
        Some(name) => name.to_string(),
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    Ok(Credentials { username, password })
}
