//! `jumplist-manager` - command line front end
//!
//! Lists installed applications, prints and edits their Jump Lists, and computes
//! the identifier hash behind the shell's destination file names. Everything but
//! `hash` needs the Windows shell.

// Shell-backed commands are only in the binary, not the library
#[cfg(windows)]
mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jumplist_manager::config::{AppConfig, ConfigManager};
use jumplist_manager::{AppIdHash, utils};

/// Inspect and edit the Windows Jump List of any installed application
#[derive(Debug, Parser)]
#[command(name = "jumplist-manager", version, about)]
struct Cli {
    /// Log to standard error at debug level instead of the log file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
#[cfg_attr(not(windows), allow(dead_code))]
enum Command {
    /// Print the CRC-64 of an application identifier and its destination file names
    Hash {
        /// Application identifier (AUMID)
        app_id: String,
    },
    /// List installed applications and their identifiers
    Apps,
    /// Print every group of an application's jump list
    List {
        /// Application identifier (AUMID)
        app_id: String,
        /// Show the size of each item's thumbnail
        #[arg(long)]
        thumbnails: bool,
    },
    /// Pin an item
    Pin(ItemRef),
    /// Unpin an item
    Unpin(ItemRef),
    /// Remove an item from its list
    Remove(ItemRef),
    /// Clear the pinned, recent and frequent lists
    Clear {
        /// Application identifier (AUMID)
        app_id: String,
    },
}

/// An item addressed the way `list` prints it
#[derive(Debug, clap::Args)]
#[cfg_attr(not(windows), allow(dead_code))]
struct ItemRef {
    /// Application identifier (AUMID)
    app_id: String,
    /// Group heading, case-insensitive (e.g. "Recent")
    group: String,
    /// Zero-based position within the group
    index: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        utils::init_stderr_logging("debug").context("Failed to initialize logging")?;
    } else {
        utils::init_logging().context("Failed to initialize logging system")?;
    }

    let config = ConfigManager::load().context("Failed to load configuration")?;

    match cli.command {
        Command::Hash { app_id } => {
            print_hash(&app_id);
            Ok(())
        }
        command => run_shell_command(command, &config),
    }
}

fn print_hash(app_id: &str) {
    let hash = AppIdHash::compute(app_id);
    println!("{hash}");
    println!("{}", hash.automatic_destinations_file_name());
    println!("{}", hash.custom_destinations_file_name());
}

#[cfg(windows)]
fn run_shell_command(command: Command, config: &AppConfig) -> Result<()> {
    commands::run(command, config)
}

#[cfg(not(windows))]
fn run_shell_command(command: Command, _config: &AppConfig) -> Result<()> {
    anyhow::bail!("`{command:?}` needs the Windows shell; only `hash` is available on this platform")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_item_reference() {
        let cli = Cli::try_parse_from(["jumplist-manager", "pin", "Contoso.Writer", "Recent", "2"])
            .unwrap();
        let Command::Pin(item) = cli.command else {
            panic!("expected pin");
        };
        assert_eq!(item.app_id, "Contoso.Writer");
        assert_eq!(item.group, "Recent");
        assert_eq!(item.index, 2);
    }

    #[test]
    fn test_parse_list_flags() {
        let cli =
            Cli::try_parse_from(["jumplist-manager", "-v", "list", "Contoso.Writer", "--thumbnails"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::List { thumbnails: true, .. }));
    }
}
