//! fuzzy-finder CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Print matching paths below the configured base directory
//! fuzzy-finder query readme
//!
//! # Override preferences for one query, print the JSON result list
//! fuzzy-finder query readme --set search_type=1 --json
//!
//! # Open the directory containing the best match
//! fuzzy-finder query readme --select 1 --alt
//!
//! # Act as a launcher extension speaking JSON lines on stdin/stdout
//! fuzzy-finder serve
//! ```
//!
//! # Configuration
//!
//! Base preferences come from `~/.config/fuzzy-finder/config.toml` on Linux
//! (`fuzzy-finder config init` writes the defaults) and from
//! `FUZZY_FINDER_<KEY>` environment variables.

use clap::CommandFactory;
use colored::Colorize;
use fuzzy_finder::{
    FinderError,
    cli::{Cli, Commands, ConfigCommands},
    completions,
    config as settings,
    extension::Extension,
    logging, protocol,
    results::{ERROR_ICON, ResultItem},
};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

type Result<T> = std::result::Result<T, FinderError>;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Query {
            query,
            json,
            select,
            alt,
            ..
        } => {
            let mut extension = Extension::new(settings::load(cli.config.as_deref())?);
            let items = extension.on_query(query.as_deref(), &cli.command.overrides());

            let actionable = !items.iter().all(ResultItem::is_inert);
            match select {
                Some(number) if actionable => activate(&extension, &items, *number, *alt)?,
                _ if *json => {
                    let response = protocol::Response::RenderResultList {
                        items: items.clone(),
                    };
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                _ => print_items(&items)?,
            }

            if items.iter().any(|item| item.icon == ERROR_ICON) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Serve => {
            let mut extension = Extension::new(settings::load(cli.config.as_deref())?).with_cache();
            let stdin = io::stdin();
            protocol::serve(&mut extension, stdin.lock(), io::stdout().lock())?;
        }
        Commands::Config { command } => handle_config_command(cli.config.as_deref(), command)?,
        Commands::Completions { shell } => {
            completions::generate_static(*shell, &mut Cli::command(), &mut io::stdout());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn handle_config_command(explicit: Option<&Path>, command: &ConfigCommands) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => settings::config_path()?,
    };

    match command {
        ConfigCommands::Init { force } => {
            settings::save_defaults(&path, *force)?;
            println!("{} {}", "Wrote".green(), path.display());
        }
        ConfigCommands::Path => println!("{}", path.display()),
    }
    Ok(())
}

/// Print result labels, one per line
///
/// Inert items are messages rather than paths and are colored.
fn print_items(items: &[ResultItem]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for item in items {
        if !item.is_inert() {
            writeln!(stdout, "{}", item.name)?;
        } else if item.icon == ERROR_ICON {
            writeln!(stdout, "{}", item.name.red())?;
        } else {
            writeln!(stdout, "{}", item.name.yellow())?;
        }
    }
    Ok(())
}

/// Run the action of the `number`-th (1-based) item
fn activate(extension: &Extension, items: &[ResultItem], number: u64, alt: bool) -> Result<()> {
    let item = usize::try_from(number)
        .ok()
        .and_then(|n| items.get(n.checked_sub(1)?))
        .filter(|item| !item.is_inert())
        .ok_or_else(|| FinderError::InvalidInput(format!("No result number {number}")))?;

    let action = if alt {
        item.on_alt_enter.as_ref().unwrap_or(&item.on_enter)
    } else {
        &item.on_enter
    };

    extension.on_item_activated(action)?;
    Ok(())
}
