//! Focused unit tests covering CLI configuration and seed parsing.

use super::helpers::Workspace;
use super::*;
use crate::directory::ProviderConfig;
use crate::seed::{bundled_requests, load_seed_file};
use nearcare_core::ProviderId;
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn converting_get_without_id_errors() {
    let err = ProviderConfig::try_from(GetArgs::default()).expect_err("missing id should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ID);
            assert_eq!(env, ENV_GET_ID);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_delete_without_id_names_delete_env() {
    let err =
        ProviderConfig::try_from(DeleteArgs::default()).expect_err("missing id should error");
    match err {
        CliError::MissingArgument { env, .. } => assert_eq!(env, ENV_DELETE_ID),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn database_defaults_to_working_directory_file() {
    let args = GetArgs {
        id: Some(7),
        database: None,
    };
    let config = ProviderConfig::try_from(args).expect("config should build");
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(config.id, ProviderId::new(7));
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "id": "not-a-number" }));

    let err = GetArgs::merge_from_layers(composer.layers())
        .map_err(CliError::from)
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honour_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "database": "from-file.db", "max_distance": 2500.0 }),
        None,
    );
    composer.push_environment(json!({ "database": "from-env.db", "latitude": 12.97 }));
    composer.push_cli(json!({ "longitude": 77.59 }));

    let merged = NearArgs::merge_from_layers(composer.layers()).expect("merged config");
    assert_eq!(merged.database, Some(Utf8PathBuf::from("from-env.db")));
    assert_eq!(merged.latitude, Some(12.97));
    assert_eq!(merged.longitude, Some(77.59));
    assert_eq!(merged.max_distance, Some(2500.0));
}

#[rstest]
fn near_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "nearcare",
        "near",
        "--latitude",
        "-33.8688",
        "--longitude",
        "-151.2093",
    ])
    .expect("parse near");
    match cli.command {
        Command::Near(args) => {
            assert_eq!(args.latitude, Some(-33.8688));
            assert_eq!(args.longitude, Some(-151.2093));
            assert_eq!(args.max_distance, None);
        }
        other => panic!("expected near command, found {other:?}"),
    }
}

#[rstest]
fn unknown_subcommand_is_a_parse_error() {
    let err = Cli::try_parse_from(["nearcare", "teleport"]).map_err(CliError::from);
    assert!(matches!(err, Err(CliError::ArgumentParsing(_))));
}

#[rstest]
fn bundled_sample_providers_are_valid() {
    let requests = bundled_requests().expect("bundled data parses");
    assert_eq!(requests.len(), 8);
    for request in requests {
        request.into_new_provider().expect("bundled entry is valid");
    }
}

#[rstest]
fn load_seed_file_reports_missing_file() {
    let workspace = Workspace::new();
    let path = workspace.database().with_file_name("absent.json");

    let err = load_seed_file(&path).expect_err("missing file should error");
    match err {
        CliError::OpenSeedFile { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected OpenSeedFile, found {other:?}"),
    }
}

#[rstest]
fn load_seed_file_rejects_invalid_json() {
    let workspace = Workspace::new();
    let path = workspace.write("seed.json", "{ not valid json");

    let err = load_seed_file(&path).expect_err("invalid json should error");
    match err {
        CliError::ParseSeedFile { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseSeedFile, found {other:?}"),
    }
}
