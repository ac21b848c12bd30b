//! Query commands: `near` and `search`.

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use nearcare_core::request::{AreaSearch, ProximitySearch};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{ARG_DATABASE, CliError, database_path, open_engine, write_json};

const ARG_MAX_DISTANCE: &str = "max-distance";

/// CLI arguments for the `near` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Find providers within a great-circle distance of a point. \
                 Results are sorted nearest first and include the distance \
                 in metres. The radius defaults to 5000 metres.",
    about = "Find providers near a point"
)]
#[ortho_config(prefix = "NEARCARE")]
pub(crate) struct NearArgs {
    /// Latitude of the search centre in degrees.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the search centre in degrees.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Search radius in metres.
    #[arg(long = ARG_MAX_DISTANCE, value_name = "metres", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) max_distance: Option<f64>,
    /// Path to the SQLite provider database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Find providers whose address mentions an area")]
#[ortho_config(prefix = "NEARCARE")]
pub(crate) struct SearchArgs {
    /// Case-insensitive fragment of the address.
    #[arg(value_name = "term")]
    #[serde(default)]
    pub(crate) term: Option<String>,
    /// Path to the SQLite provider database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl From<&NearArgs> for ProximitySearch {
    fn from(args: &NearArgs) -> Self {
        Self {
            latitude: args.latitude,
            longitude: args.longitude,
            max_distance_meters: args.max_distance,
        }
    }
}

pub(crate) fn run_near_with(args: NearArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let (centre, radius) = ProximitySearch::from(&merged)
        .resolve()
        .map_err(|err| CliError::Directory(err.into()))?;
    let engine = open_engine(&database_path(merged.database))?;
    let hits = engine.find_near_with_distance(centre, radius)?;
    info!("found {} providers within {radius} m", hits.len());
    write_json(writer, &hits)
}

pub(crate) fn run_search_with(args: SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let search = AreaSearch {
        term: merged.term,
    };
    let engine = open_engine(&database_path(merged.database))?;
    write_json(writer, &engine.handle_area_search(&search)?)
}
