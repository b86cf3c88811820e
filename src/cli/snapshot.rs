use std::{fs, path::PathBuf};

use clap::Parser;
use dayahead::{core::Snapshot, prelude::*};

#[derive(Parser)]
pub struct SnapshotArgs {
    /// Day-ahead price snapshot in JSON.
    #[clap(long = "snapshot-path", env = "SNAPSHOT_PATH", default_value = "snapshot.json")]
    pub path: PathBuf,
}

impl SnapshotArgs {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Snapshot> {
        info!("reading the snapshot…");
        let contents = fs::read(&self.path).context("failed to read the snapshot")?;
        serde_json::from_slice(&contents).context("failed to parse the snapshot")
    }
}
