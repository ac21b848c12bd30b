//! Seed command: bulk-load providers from JSON.
//!
//! The input is a JSON array of provider payloads using the same field names
//! as the request contract (`organizationName`, `latitude`, `longitude`).
//! Every entry is validated before anything is written, and the insert runs
//! as one batch, so a bad entry leaves the database untouched.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use nearcare_core::request::CreateProviderRequest;
use nearcare_core::{NewProvider, ProviderRecord};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};

use crate::fs::open_utf8_file;
use crate::{ARG_DATABASE, CliError, database_path, open_engine, write_json};

/// Bangalore clinics loaded when no seed file is given.
const SAMPLE_PROVIDERS: &str = include_str!("../data/sample_providers.json");

/// CLI arguments for the `seed` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Insert providers from a JSON array. Without a file the \
                 bundled Bangalore sample clinics are loaded. Use --replace \
                 to clear the directory first.",
    about = "Load providers from a JSON file or the bundled sample data"
)]
#[ortho_config(prefix = "NEARCARE")]
pub(crate) struct SeedArgs {
    /// JSON file containing an array of providers.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) file: Option<Utf8PathBuf>,
    /// Remove every existing provider before loading.
    #[arg(long)]
    #[serde(default)]
    pub(crate) replace: bool,
    /// Path to the SQLite provider database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Summary printed after seeding.
#[derive(Debug, Serialize)]
struct SeedReport {
    cleared: usize,
    inserted: Vec<ProviderRecord>,
}

pub(crate) fn run_seed_with(args: SeedArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let requests = match &merged.file {
        Some(path) => load_seed_file(path)?,
        None => bundled_requests()?,
    };
    let drafts = validate_requests(requests)?;

    let engine = open_engine(&database_path(merged.database))?;
    let cleared = if merged.replace { engine.clear()? } else { 0 };
    let inserted = engine.create_many(drafts)?;
    info!("seeded {} providers, cleared {cleared}", inserted.len());
    write_json(writer, &SeedReport { cleared, inserted })
}

/// Loads a JSON array of provider payloads from disk.
pub(crate) fn load_seed_file(path: &Utf8Path) -> Result<Vec<CreateProviderRequest>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenSeedFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseSeedFile {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn bundled_requests() -> Result<Vec<CreateProviderRequest>, CliError> {
    serde_json::from_str(SAMPLE_PROVIDERS).map_err(CliError::ParseBundledSeed)
}

fn validate_requests(requests: Vec<CreateProviderRequest>) -> Result<Vec<NewProvider>, CliError> {
    requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| {
            request
                .into_new_provider()
                .map_err(|source| CliError::InvalidSeedRecord { index, source })
        })
        .collect()
}
