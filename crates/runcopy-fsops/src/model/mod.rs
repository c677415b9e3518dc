//! Domain models for verified run copies.
//!
//! # Design
//! - Keep request types lightweight and copyable; reports are owned and serializable.
//! - Avoid embedding IO handles; callers supply references.

use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use runcopy_config::HashAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{FsOpsError, FsOpsResult};

/// Identifier of a logical batch of files, used to name destination folders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Validate `value` as a run identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::InvalidInput`] when the value is blank or is not a
    /// single path component.
    pub fn new(value: impl Into<String>) -> FsOpsResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(FsOpsError::InvalidInput {
                field: "run_id",
                reason: "empty",
                value: Some(value),
            });
        }
        let mut components = Path::new(&value).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || value.contains(['/', '\\']) {
            return Err(FsOpsError::InvalidInput {
                field: "run_id",
                reason: "not_a_single_path_component",
                value: Some(value),
            });
        }
        Ok(Self(value))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RunId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Immutable inputs for one batch copy.
#[derive(Debug, Copy, Clone)]
pub struct BatchRequest<'a> {
    /// Directory whose top-level regular files are copied.
    pub source_dir: &'a Path,
    /// Directory under which the `<run id>_<n>` folder is created.
    pub destination_root: &'a Path,
    /// Descriptor file carrying the run identifier.
    pub descriptor_path: &'a Path,
}

/// Verified copy of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiedFile {
    /// File that was read.
    pub source: PathBuf,
    /// File that was written and verified.
    pub destination: PathBuf,
    /// Number of bytes copied.
    pub bytes: u64,
    /// Hex digest shared by source and destination.
    pub digest: String,
}

/// Outcome of a successful batch copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Identifier read from the descriptor.
    pub run_id: RunId,
    /// Folder that received the files.
    pub destination: PathBuf,
    /// Algorithm used for verification.
    pub algorithm: HashAlgorithm,
    /// Every copied file, in copy order.
    pub files: Vec<CopiedFile>,
    /// Completion marker path, when one was written.
    pub completion_marker: Option<PathBuf>,
    /// Time the last file verified.
    pub completed_at: DateTime<Utc>,
}

impl BatchReport {
    /// Total bytes copied across the batch.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|file| file.bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_accepts_plain_names() -> FsOpsResult<()> {
        let id = RunId::new("run7")?;
        assert_eq!(id.as_str(), "run7");
        assert_eq!(id.to_string(), "run7");
        assert_eq!(RunId::new("test 1.a")?.as_str(), "test 1.a");
        Ok(())
    }

    #[test]
    fn run_id_rejects_paths_and_blanks() {
        for value in ["", "   ", ".", "..", "a/b", "a\\b", "/abs"] {
            assert!(
                matches!(RunId::new(value), Err(FsOpsError::InvalidInput { field: "run_id", .. })),
                "expected rejection for {value:?}"
            );
        }
    }

    #[test]
    fn batch_report_sums_bytes() -> FsOpsResult<()> {
        let report = BatchReport {
            run_id: RunId::new("run7")?,
            destination: PathBuf::from("dst/run7_1"),
            algorithm: HashAlgorithm::Sha256,
            files: vec![
                CopiedFile {
                    source: PathBuf::from("a"),
                    destination: PathBuf::from("dst/run7_1/a"),
                    bytes: 3,
                    digest: "aa".into(),
                },
                CopiedFile {
                    source: PathBuf::from("b"),
                    destination: PathBuf::from("dst/run7_1/b"),
                    bytes: 4,
                    digest: "bb".into(),
                },
            ],
            completion_marker: None,
            completed_at: Utc::now(),
        };
        assert_eq!(report.total_bytes(), 7);
        Ok(())
    }
}
