//! Command-line interface for the NearCare provider directory.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use log::debug;
use nearcare_core::{QueryEngine, SqliteRecordStore};
use serde::Serialize;
use std::io::Write;

mod directory;
mod error;
mod fs;
mod query;
mod seed;

pub use error::CliError;

use directory::{AddArgs, DeleteArgs, GetArgs, ListArgs};
use query::{NearArgs, SearchArgs};
use seed::SeedArgs;

/// Environment variable holding the log filter directives.
pub const ENV_LOG: &str = "NEARCARE_LOG";

const DEFAULT_DATABASE: &str = "nearcare.db";

const ARG_DATABASE: &str = "database";
const ARG_ID: &str = "id";
const ENV_GET_ID: &str = "NEARCARE_CMDS_GET_ID";
const ENV_DELETE_ID: &str = "NEARCARE_CMDS_DELETE_ID";

/// Run the NearCare CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command_with(cli.command, &mut stdout)
}

fn run_command_with(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::List(args) => directory::run_list_with(args, writer),
        Command::Get(args) => directory::run_get_with(args, writer),
        Command::Add(args) => directory::run_add_with(args, writer),
        Command::Delete(args) => directory::run_delete_with(args, writer),
        Command::Near(args) => query::run_near_with(args, writer),
        Command::Search(args) => query::run_search_with(args, writer),
        Command::Seed(args) => seed::run_seed_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "nearcare",
    about = "Manage and search a directory of healthcare providers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every provider in insertion order.
    List(ListArgs),
    /// Show a single provider.
    Get(GetArgs),
    /// Register a new provider.
    Add(AddArgs),
    /// Remove a provider.
    Delete(DeleteArgs),
    /// Find providers near a point, nearest first.
    Near(NearArgs),
    /// Find providers whose address mentions an area.
    Search(SearchArgs),
    /// Load providers from a JSON file or the bundled sample data.
    Seed(SeedArgs),
}

/// Database location resolved from the merged configuration.
fn database_path(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

/// Open the provider database and index its contents.
fn open_engine(path: &Utf8Path) -> Result<QueryEngine<SqliteRecordStore>, CliError> {
    fs::ensure_parent_dir(path).map_err(|source| CliError::PrepareDatabase {
        path: path.to_path_buf(),
        source,
    })?;
    let store =
        SqliteRecordStore::open(path.as_std_path()).map_err(|source| CliError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("opened provider database at {path}");
    Ok(QueryEngine::new(store)?)
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
