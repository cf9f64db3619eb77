use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A human-editable UTF-8 JSON file holding one document.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when the file does not exist yet.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        Ok(Some(value))
    }

    pub fn save<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).context("Failed to create data directory")?;
            }
        }

        // serde_json leaves non-ASCII text unescaped.
        let content = serde_json::to_string_pretty(value)
            .context("Failed to serialize document")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        Ok(())
    }
}
