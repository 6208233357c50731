use anyhow::Result;
use clap::{Parser, Subcommand};

use waypost::cli::{handle_backup_command, handle_providers_command, BackupCommands};
use waypost::config::{paths::WaypostPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "waypost",
    version,
    about = "Local backup, restore and sync for Waypost",
    long_about = "Waypost's local-first backup tool. Export the locally \
                  persisted application state into a portable archive, \
                  inspect archives, and restore them into a fresh \
                  environment. Importing replaces all local data."
)]
struct Cli {
    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Backup(BackupCommands),

    /// List upload destinations
    Providers {
        /// Include destinations unavailable on this host
        #[arg(short, long)]
        all: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = WaypostPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Providers { all }) => {
            handle_providers_command(all)?;
        }
        Some(Commands::Config) => {
            println!("Waypost Configuration");
            println!("=====================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Durable tier:      {}", paths.local_dir().display());
            println!("Ephemeral tier:    {}", paths.session_dir().display());
            println!("Backup directory:  {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!(
                "  Device name: {}",
                settings.device_name.as_deref().unwrap_or("(auto)")
            );
            println!(
                "  Transfer retries: {} (starting at {} ms)",
                settings.retry.max_retries, settings.retry.delay_ms
            );
        }
        None => {
            println!("Waypost - local backup, restore and sync");
            println!();
            println!("Run 'waypost --help' for usage information.");
            println!("Run 'waypost export' to create a backup archive.");
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = std::env::var("RUST_LOG").map_or_else(
        |_| {
            let level = if verbose > 0 { "debug" } else { "warn" };
            EnvFilter::new(level)
        },
        EnvFilter::new,
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
