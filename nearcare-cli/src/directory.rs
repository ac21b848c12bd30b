//! Record management commands: `list`, `get`, `add` and `delete`.

use camino::Utf8PathBuf;
use clap::Parser;
use nearcare_core::ProviderId;
use nearcare_core::request::CreateProviderRequest;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{
    ARG_DATABASE, ARG_ID, CliError, ENV_DELETE_ID, ENV_GET_ID, database_path, open_engine,
    write_json,
};

/// CLI arguments for the `list` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List every provider in insertion order")]
#[ortho_config(prefix = "NEARCARE")]
pub(crate) struct ListArgs {
    /// Path to the SQLite provider database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `get` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Show a single provider")]
#[ortho_config(prefix = "NEARCARE")]
pub(crate) struct GetArgs {
    /// Identifier of the provider.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<u64>,
    /// Path to the SQLite provider database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `add` subcommand.
///
/// Text fields and coordinates are validated by the directory, so missing
/// values surface as validation errors naming the field.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Register a provider. Coordinates are given as latitude and \
                 longitude in degrees; name, specialty, organization and \
                 address are required.",
    about = "Register a new provider"
)]
#[ortho_config(prefix = "NEARCARE")]
pub(crate) struct AddArgs {
    /// Provider display name.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Medical specialty.
    #[arg(long, value_name = "specialty")]
    #[serde(default)]
    pub(crate) specialty: Option<String>,
    /// Clinic or organization name.
    #[arg(long = "organization", value_name = "name")]
    #[serde(default)]
    pub(crate) organization: Option<String>,
    /// Street address.
    #[arg(long, value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Latitude in degrees.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude in degrees.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Contact phone number.
    #[arg(long, value_name = "phone")]
    #[serde(default)]
    pub(crate) phone: Option<String>,
    /// Contact email address.
    #[arg(long, value_name = "email")]
    #[serde(default)]
    pub(crate) email: Option<String>,
    /// Path to the SQLite provider database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `delete` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Remove a provider")]
#[ortho_config(prefix = "NEARCARE")]
pub(crate) struct DeleteArgs {
    /// Identifier of the provider.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<u64>,
    /// Path to the SQLite provider database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Resolved configuration for commands addressing one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProviderConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) id: ProviderId,
}

impl TryFrom<GetArgs> for ProviderConfig {
    type Error = CliError;

    fn try_from(args: GetArgs) -> Result<Self, Self::Error> {
        let id = args.id.ok_or(CliError::MissingArgument {
            field: ARG_ID,
            env: ENV_GET_ID,
        })?;
        Ok(Self {
            database: database_path(args.database),
            id: ProviderId::new(id),
        })
    }
}

impl TryFrom<DeleteArgs> for ProviderConfig {
    type Error = CliError;

    fn try_from(args: DeleteArgs) -> Result<Self, Self::Error> {
        let id = args.id.ok_or(CliError::MissingArgument {
            field: ARG_ID,
            env: ENV_DELETE_ID,
        })?;
        Ok(Self {
            database: database_path(args.database),
            id: ProviderId::new(id),
        })
    }
}

impl AddArgs {
    fn into_request(self) -> CreateProviderRequest {
        CreateProviderRequest {
            name: self.name,
            specialty: self.specialty,
            organization_name: self.organization,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            phone: self.phone,
            email: self.email,
        }
    }
}

pub(crate) fn run_list_with(args: ListArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let engine = open_engine(&database_path(merged.database))?;
    write_json(writer, &engine.list_all()?)
}

pub(crate) fn run_get_with(args: GetArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ProviderConfig::try_from(merged)?;
    let engine = open_engine(&config.database)?;
    write_json(writer, &engine.get(config.id)?)
}

pub(crate) fn run_add_with(args: AddArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let database = database_path(merged.database.take());
    let request = merged.into_request();
    let draft = request
        .into_new_provider()
        .map_err(|err| CliError::Directory(err.into()))?;
    let engine = open_engine(&database)?;
    write_json(writer, &engine.create(draft)?)
}

pub(crate) fn run_delete_with(args: DeleteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ProviderConfig::try_from(merged)?;
    let engine = open_engine(&config.database)?;
    write_json(writer, &engine.handle_delete(config.id)?)
}
