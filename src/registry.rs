use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A registry document: `{"handles": ["acct1", "acct2"]}`.
#[derive(Debug, Deserialize)]
struct RegistryDoc {
    handles: Vec<String>,
}

/// Load the handle list from a registry document. Called fresh on every pass
/// so edits to the file take effect without a restart; a malformed document
/// is fatal for the run.
pub fn load_handles(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry file: {}", path.display()))?;
    let doc: RegistryDoc = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse registry JSON: {}", path.display()))?;
    Ok(doc.handles)
}
