//! Temporary workspaces and answer scripts shared by the CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding a database and answer scripts.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("fairway.db")
    }

    /// Write `script` to `<name>.json` and return its path.
    pub(super) fn script(&self, name: &str, script: &Value) -> Utf8PathBuf {
        let path = self.root.join(format!("{name}.json"));
        let payload = serde_json::to_vec_pretty(script).expect("serialize script");
        write_utf8(&path, &payload);
        path
    }
}

/// Answer script for `course` with the given verdicts.
pub(super) fn answers(
    course: &str,
    play_again: &str,
    comparisons: &[&str],
    rank_position: u32,
) -> Value {
    json!({
        "course": { "id": course, "name": format!("{course} links"), "location": "Fife" },
        "play_again": play_again,
        "comparisons": comparisons,
        "rank_position": rank_position,
    })
}

/// Run a parsed command line against an in-memory stdout.
pub(super) fn invoke<I, S>(argv: I) -> (Result<(), crate::CliError>, Vec<u8>)
where
    I: IntoIterator<Item = S>,
    S: Into<std::ffi::OsString> + Clone,
{
    use clap::Parser;

    let mut stdout = Vec::new();
    let outcome = crate::Cli::try_parse_from(argv)
        .map_err(crate::CliError::ArgumentParsing)
        .and_then(|cli| crate::dispatch(cli.command, &mut stdout));
    (outcome, stdout)
}
