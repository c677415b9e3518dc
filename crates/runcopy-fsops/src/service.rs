//! Batch orchestration: descriptor to verified destination folder.
//!
//! # Design
//! - Steps run in a fixed order: identify the run, enumerate sources, claim the
//!   destination, copy each file with verification.
//! - The first failure aborts the batch. Files already copied stay in place; the
//!   optional completion marker is the only signal that a folder is whole.

use std::ffi::OsStr;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use runcopy_config::{CopyPolicy, HashAlgorithm};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::checksum::Checksummer;
use crate::copier::{DigestSource, VerifiedCopier};
use crate::descriptor::{extract_run_id, locate_descriptor, parse_descriptor};
use crate::error::{FsOpsError, FsOpsResult};
use crate::model::{BatchReport, BatchRequest, CopiedFile, RunId};
use crate::namer::{next_destination, reserve_destination};

/// File name of the marker written after every file in a batch verified.
pub const COMPLETION_MARKER_NAME: &str = ".runcopy-complete.json";

#[derive(Serialize)]
struct CompletionMarker<'a> {
    run_id: &'a RunId,
    algorithm: HashAlgorithm,
    completed_at: DateTime<Utc>,
    files: &'a [CopiedFile],
}

/// Copies every top-level regular file of a source directory into a fresh
/// `<run id>_<n>` folder.
#[derive(Debug, Clone)]
pub struct BatchCopier<D = Checksummer> {
    copier: VerifiedCopier<D>,
    algorithm: HashAlgorithm,
    identifier_field: String,
    write_completion_marker: bool,
    exclusive_reservation: bool,
}

impl BatchCopier {
    /// Build a copier that hashes with the policy's algorithm and chunk size.
    #[must_use]
    pub fn from_policy(policy: &CopyPolicy) -> Self {
        let checksummer =
            Checksummer::new(policy.hash_algorithm).with_chunk_size(policy.chunk_size);
        Self::with_digests(policy, checksummer)
    }
}

impl<D: DigestSource> BatchCopier<D> {
    /// Build a copier that verifies through `digests`.
    #[must_use]
    pub fn with_digests(policy: &CopyPolicy, digests: D) -> Self {
        Self {
            copier: VerifiedCopier::new(digests).remove_corrupt(policy.remove_corrupt),
            algorithm: policy.hash_algorithm,
            identifier_field: policy.identifier_field.clone(),
            write_completion_marker: policy.write_completion_marker,
            exclusive_reservation: policy.exclusive_reservation,
        }
    }

    /// Run one batch copy.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered: descriptor problems, or a source
    /// file named like the completion marker when the marker is enabled, before
    /// any file is touched, then IO or [`FsOpsError::IntegrityMismatch`] for the
    /// file being copied. Earlier copies are left in place.
    pub fn run(&self, request: BatchRequest<'_>) -> FsOpsResult<BatchReport> {
        let tree = parse_descriptor(request.descriptor_path)?;
        let run_id = extract_run_id(&tree, &self.identifier_field, request.descriptor_path)?;
        let sources = regular_files(request.source_dir)?;
        if self.write_completion_marker
            && let Some(clash) = sources
                .iter()
                .find(|source| source.file_name() == Some(OsStr::new(COMPLETION_MARKER_NAME)))
        {
            return Err(FsOpsError::InvalidInput {
                field: "source_file",
                reason: "reserved_name",
                value: Some(clash.display().to_string()),
            });
        }

        let destination = if self.exclusive_reservation {
            reserve_destination(request.destination_root, &run_id)?
        } else {
            let destination = next_destination(request.destination_root, &run_id)?;
            fs::create_dir_all(&destination).map_err(|source| {
                FsOpsError::io("batch.create_destination", &destination, source)
            })?;
            destination
        };

        info!(
            run_id = %run_id,
            source = %request.source_dir.display(),
            destination = %destination.display(),
            files = sources.len(),
            "batch copy started"
        );

        let mut files = Vec::with_capacity(sources.len());
        for source in &sources {
            files.push(self.copier.copy_into(source, &destination)?);
        }
        let completed_at = Utc::now();

        let completion_marker = if self.write_completion_marker {
            Some(self.write_marker(&destination, &run_id, completed_at, &files)?)
        } else {
            None
        };

        let report = BatchReport {
            run_id,
            destination,
            algorithm: self.algorithm,
            files,
            completion_marker,
            completed_at,
        };
        info!(
            run_id = %report.run_id,
            destination = %report.destination.display(),
            files = report.files.len(),
            bytes = report.total_bytes(),
            "batch copy completed"
        );
        Ok(report)
    }

    fn write_marker(
        &self,
        destination: &Path,
        run_id: &RunId,
        completed_at: DateTime<Utc>,
        files: &[CopiedFile],
    ) -> FsOpsResult<PathBuf> {
        let path = destination.join(COMPLETION_MARKER_NAME);
        let marker = CompletionMarker {
            run_id,
            algorithm: self.algorithm,
            completed_at,
            files,
        };
        let serialised = serde_json::to_string_pretty(&marker)
            .map_err(|source| FsOpsError::json("marker.serialize", &path, source))?;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(serialised.as_bytes()))
            .map_err(|source| FsOpsError::io("marker.write", &path, source))?;
        debug!(marker = %path.display(), "completion marker written");
        Ok(path)
    }
}

/// Locate the descriptor in `source_dir` and copy the directory's files under
/// `destination_root` as configured by `policy`.
///
/// # Errors
///
/// Returns any locator or batch failure; see [`locate_descriptor`] and
/// [`BatchCopier::run`].
pub fn copy_run(
    source_dir: &Path,
    destination_root: &Path,
    policy: &CopyPolicy,
) -> FsOpsResult<BatchReport> {
    let descriptor_path = locate_descriptor(source_dir, &policy.descriptor_extension)?;
    BatchCopier::from_policy(policy).run(BatchRequest {
        source_dir,
        destination_root,
        descriptor_path: &descriptor_path,
    })
}

/// Regular files directly inside `dir`, symlinks resolved, sorted by name.
fn regular_files(dir: &Path) -> FsOpsResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| FsOpsError::walkdir("batch.enumerate", dir, source))?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && fs::metadata(entry.path()).is_ok_and(|m| m.is_file()));
        if is_file {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
