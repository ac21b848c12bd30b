//! Test helpers for running CLI commands against a scratch database.

use super::*;
use serde_json::Value;
use tempfile::TempDir;

/// Temporary directory holding the database and any seed files.
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("db").join("providers.db")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("write workspace file");
        path
    }

    /// Parse `args` as a `nearcare` invocation against this workspace's
    /// database and return what the command printed.
    pub(super) fn run(&self, args: &[&str]) -> Result<Value, CliError> {
        let mut argv = vec!["nearcare".to_owned()];
        argv.extend(args.iter().map(|arg| (*arg).to_owned()));
        argv.extend([format!("--{ARG_DATABASE}"), self.database().into_string()]);

        let cli = Cli::try_parse_from(argv)?;
        let mut stdout = Vec::new();
        run_command_with(cli.command, &mut stdout)?;
        Ok(serde_json::from_slice(&stdout).expect("command prints JSON"))
    }

    pub(super) fn run_ok(&self, args: &[&str]) -> Value {
        self.run(args)
            .unwrap_or_else(|err| panic!("`{}` failed: {err}", args.join(" ")))
    }
}

/// Provider names in the order a command printed them.
pub(super) fn names(output: &Value) -> Vec<String> {
    output
        .as_array()
        .expect("array output")
        .iter()
        .map(|entry| entry["name"].as_str().expect("name field").to_owned())
        .collect()
}
