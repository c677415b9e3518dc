//! Test fixtures and filesystem helpers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

/// Create a fresh temporary directory with a recognisable prefix.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn temp_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("runcopy-")
        .tempdir()
        .context("failed to create temporary directory")
}

/// Sorted names of the entries directly inside `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn entry_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to read entry in {}", dir.display()))?;
    names.sort();
    Ok(names)
}

/// A source directory and destination root laid out inside one temp directory.
pub struct RunFixture {
    root: TempDir,
    source: PathBuf,
    destination: PathBuf,
}

impl RunFixture {
    /// Create empty `source/` and `destination/` directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new() -> Result<Self> {
        let root = temp_dir()?;
        let source = root.path().join("source");
        let destination = root.path().join("destination");
        fs::create_dir_all(&source).context("failed to create source directory")?;
        fs::create_dir_all(&destination).context("failed to create destination directory")?;
        Ok(Self {
            root,
            source,
            destination,
        })
    }

    /// Temporary root holding both directories.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Source directory.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination root directory.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Write `contents` to `name` inside the source directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_source(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.source.join(name);
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Serialize `descriptor` as JSON into `name` inside the source directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor cannot be serialized or written.
    pub fn write_descriptor(&self, name: &str, descriptor: &Value) -> Result<PathBuf> {
        let body = serde_json::to_vec_pretty(descriptor).context("failed to encode descriptor")?;
        self.write_source(name, body)
    }

    /// Create an (empty) directory under the destination root.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn existing_destination(&self, name: &str) -> Result<PathBuf> {
        let path = self.destination.join(name);
        fs::create_dir_all(&path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_fixture_lays_out_source_and_destination() -> Result<()> {
        let fixture = RunFixture::new()?;
        assert!(fixture.source().starts_with(fixture.root()));
        fixture.write_source("a.txt", "alpha")?;
        fixture.write_descriptor("meta.json", &json!({"test_sequence_id": "run7"}))?;
        fixture.existing_destination("run7_1")?;

        assert_eq!(entry_names(fixture.source())?, vec!["a.txt", "meta.json"]);
        assert_eq!(entry_names(fixture.destination())?, vec!["run7_1"]);
        Ok(())
    }
}
