use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Persistent high-water mark: the highest post id already acted on, stored
/// as decimal text in a single file. Read at the start of every pass and
/// overwritten at the end; last-write-wins, no atomicity guarantee.
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// A missing or unparsable file is fatal for the run.
    pub fn load(&self) -> Result<u64> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read watermark file: {}", self.path.display()))?;
        content
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid watermark value: {:?}", content.trim()))
    }

    pub fn save(&self, value: u64) -> Result<()> {
        std::fs::write(&self.path, value.to_string())
            .with_context(|| format!("Failed to write watermark file: {}", self.path.display()))
    }
}
