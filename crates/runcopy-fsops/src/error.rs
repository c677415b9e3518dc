//! # Design
//!
//! - Provide structured, constant-message errors for the copy pipeline.
//! - Capture operation context (paths, fields, digests) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for copy operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Coarse classification of [`FsOpsError`] used by callers to pick a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No descriptor file was found.
    NotFound,
    /// The request was ambiguous or the destination could not be claimed.
    Conflict,
    /// The run identifier was absent, empty, or not string-like.
    MissingField,
    /// A copied file did not match its source.
    IntegrityMismatch,
    /// Caller-supplied input was unusable.
    InvalidInput,
    /// Filesystem or decoding failure, propagated as-is.
    Io,
}

/// Errors produced by the copy pipeline.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while interacting with the filesystem.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Descriptor JSON could not be parsed.
    #[error("fsops json failure")]
    Json {
        /// Operation that triggered the JSON failure.
        operation: &'static str,
        /// Path involved in the JSON failure.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Directory traversal failures.
    #[error("fsops walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Path involved in the walkdir failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// Descriptor pattern compilation failures.
    #[error("fsops glob failure")]
    Glob {
        /// Operation that triggered the glob failure.
        operation: &'static str,
        /// Glob pattern that failed to compile.
        pattern: String,
        /// Underlying globset error.
        source: globset::Error,
    },
    /// Destination pattern compilation failures.
    #[error("fsops regex failure")]
    Regex {
        /// Operation that triggered the regex failure.
        operation: &'static str,
        /// Pattern that failed to compile.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The source directory holds no descriptor file.
    #[error("no descriptor file in directory")]
    DescriptorNotFound {
        /// Directory that was searched.
        directory: PathBuf,
    },
    /// The source directory holds more than one descriptor file.
    #[error("multiple descriptor files in directory")]
    DescriptorConflict {
        /// Directory that was searched.
        directory: PathBuf,
        /// Every matching descriptor, sorted.
        candidates: Vec<PathBuf>,
    },
    /// The descriptor does not carry a usable run identifier.
    #[error("descriptor field missing or empty")]
    MissingField {
        /// Descriptor that was searched.
        path: PathBuf,
        /// Field that was requested.
        field: String,
    },
    /// Checksums of a source file and its copy differ.
    #[error("checksum mismatch: the file was not copied correctly")]
    IntegrityMismatch {
        /// File that was copied.
        source_path: PathBuf,
        /// Copy that failed verification.
        destination_path: PathBuf,
        /// Digest of the source file.
        expected: String,
        /// Digest of the written copy.
        actual: String,
    },
    /// Input validation failures.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// Exclusive destination reservation kept colliding with concurrent writers.
    #[error("destination reservation exhausted")]
    ReservationExhausted {
        /// Destination root being scanned.
        root: PathBuf,
        /// Number of attempts made.
        attempts: usize,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: serde_json::Error,
    ) -> Self {
        Self::Json {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn glob(
        operation: &'static str,
        pattern: String,
        source: globset::Error,
    ) -> Self {
        Self::Glob {
            operation,
            pattern,
            source,
        }
    }

    /// Classify the error for callers that react per kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DescriptorNotFound { .. } => ErrorKind::NotFound,
            Self::DescriptorConflict { .. } | Self::ReservationExhausted { .. } => {
                ErrorKind::Conflict
            }
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::IntegrityMismatch { .. } => ErrorKind::IntegrityMismatch,
            Self::InvalidInput { .. } | Self::Glob { .. } | Self::Regex { .. } => {
                ErrorKind::InvalidInput
            }
            Self::Io { .. } | Self::Json { .. } | Self::Walkdir { .. } => ErrorKind::Io,
        }
    }
}
