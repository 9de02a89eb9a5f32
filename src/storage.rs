//! JSON snapshot persistence for the habit collection.
//!
//! The whole collection is small, so every mutation rewrites the snapshot.
//! Writes go through a sibling temp file and a rename so a crash mid-write
//! leaves the previous snapshot intact.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::models::habit::Habit;

#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted habits; a missing file is an empty collection.
    pub async fn load(&self) -> anyhow::Result<Vec<Habit>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", self.path.display()))
    }

    pub async fn save(&self, habits: &[Habit]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(habits).context("serializing habits")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
