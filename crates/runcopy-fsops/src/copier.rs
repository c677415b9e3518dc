//! Single-file copy with checksum verification.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::checksum::{Checksummer, FileDigest};
use crate::error::{FsOpsError, FsOpsResult};
use crate::model::CopiedFile;

/// Produces digests for files on disk.
pub trait DigestSource {
    /// Digest the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    fn digest(&self, path: &Path) -> FsOpsResult<FileDigest>;
}

impl DigestSource for Checksummer {
    fn digest(&self, path: &Path) -> FsOpsResult<FileDigest> {
        self.digest_file(path)
    }
}

/// Copies files and proves the written bytes match the source.
#[derive(Debug, Clone)]
pub struct VerifiedCopier<D = Checksummer> {
    digests: D,
    remove_corrupt: bool,
}

impl<D: DigestSource> VerifiedCopier<D> {
    /// Copier verifying with `digests`; corrupt copies are removed by default.
    #[must_use]
    pub const fn new(digests: D) -> Self {
        Self {
            digests,
            remove_corrupt: true,
        }
    }

    /// Choose whether a destination file failing verification is deleted.
    #[must_use]
    pub const fn remove_corrupt(mut self, remove: bool) -> Self {
        self.remove_corrupt = remove;
        self
    }

    /// Copy `source_file` into `destination_dir`, keeping its file name.
    ///
    /// # Errors
    ///
    /// Returns [`FsOpsError::IntegrityMismatch`] when the written file hashes
    /// differently from the source, [`FsOpsError::InvalidInput`] when the
    /// source has no file name, and IO errors as encountered.
    pub fn copy_into(&self, source_file: &Path, destination_dir: &Path) -> FsOpsResult<CopiedFile> {
        let file_name = source_file
            .file_name()
            .ok_or_else(|| FsOpsError::InvalidInput {
                field: "source_file",
                reason: "no_file_name",
                value: Some(source_file.display().to_string()),
            })?;
        let destination = destination_dir.join(file_name);

        let expected = self.digests.digest(source_file)?;
        fs::copy(source_file, &destination)
            .map_err(|source| FsOpsError::io("copy.write", &destination, source))?;
        let actual = self.digests.digest(&destination)?;

        if expected.hex != actual.hex {
            warn!(
                source = %source_file.display(),
                destination = %destination.display(),
                expected = %expected.hex,
                actual = %actual.hex,
                "checksum mismatch after copy"
            );
            if self.remove_corrupt
                && let Err(err) = fs::remove_file(&destination)
            {
                warn!(
                    error = %err,
                    destination = %destination.display(),
                    "failed to remove corrupt copy"
                );
            }
            return Err(FsOpsError::IntegrityMismatch {
                source_path: source_file.to_path_buf(),
                destination_path: destination,
                expected: expected.hex,
                actual: actual.hex,
            });
        }

        debug!(
            source = %source_file.display(),
            destination = %destination.display(),
            bytes = actual.bytes,
            digest = %actual.hex,
            "copy verified"
        );
        Ok(CopiedFile {
            source: source_file.to_path_buf(),
            destination,
            bytes: actual.bytes,
            digest: actual.hex,
        })
    }
}
