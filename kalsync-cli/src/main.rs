mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kalsync_core::config::GlobalConfig;

#[derive(Parser)]
#[command(name = "kalsync")]
#[command(about = "Manage grouped calendar events and sync them with a remote calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an event to a group
    Add {
        title: String,

        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Minutes before the event to raise an alarm
        #[arg(short, long)]
        alarm: Option<u32>,

        /// Group to add the event to
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Edit an event by its list position
    Edit {
        index: usize,

        /// New title
        #[arg(short, long)]
        title: String,

        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Minutes before the event to raise an alarm
        #[arg(short, long)]
        alarm: Option<u32>,

        #[arg(short, long)]
        group: Option<String>,
    },
    /// List the events of a group
    List {
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Remove an event by its list position (local only)
    Remove {
        index: usize,

        #[arg(short, long)]
        group: Option<String>,
    },
    /// Pull the remote calendar and merge it into a group
    Sync {
        /// Remote calendar URL (falls back to the config file)
        #[arg(short, long)]
        url: Option<String>,

        /// Username for the remote calendar
        #[arg(long)]
        user: Option<String>,

        #[arg(short, long)]
        group: Option<String>,
    },
    /// Push a group to the remote calendar
    Push {
        /// Remote calendar URL (falls back to the config file)
        #[arg(short, long)]
        url: Option<String>,

        /// Username for the remote calendar
        #[arg(long)]
        user: Option<String>,

        #[arg(short, long)]
        group: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kalsync_core=info".parse()?)
                .add_directive("kalsync_cli=info".parse()?),
        )
        .init();

    let config = GlobalConfig::load()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            title,
            date,
            alarm,
            group,
        } => commands::add::run(&config, &title, &date, alarm, group.as_deref()),
        Commands::Edit {
            index,
            title,
            date,
            alarm,
            group,
        } => commands::edit::run(&config, index, &title, &date, alarm, group.as_deref()),
        Commands::List { group } => commands::list::run(&config, group.as_deref()),
        Commands::Remove { index, group } => {
            commands::remove::run(&config, index, group.as_deref())
        }
        Commands::Sync { url, user, group } => {
            commands::sync::run(&config, url.as_deref(), user.as_deref(), group.as_deref()).await
        }
        Commands::Push { url, user, group } => {
            commands::push::run(&config, url.as_deref(), user.as_deref(), group.as_deref()).await
        }
    }
}
