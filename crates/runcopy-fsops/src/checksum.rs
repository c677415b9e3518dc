//! Streaming file checksums.
//!
//! Files are read in fixed-size chunks so arbitrarily large inputs never sit
//! in memory at once.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use runcopy_config::HashAlgorithm;
use runcopy_config::defaults::CHUNK_SIZE;
use sha2::digest::Output;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::{FsOpsError, FsOpsResult};

/// Digest of one file together with the number of bytes hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Lowercase hex digest.
    pub hex: String,
    /// Bytes read from the file.
    pub bytes: u64,
}

/// Streams files through the configured hash algorithm.
#[derive(Debug, Clone, Copy)]
pub struct Checksummer {
    algorithm: HashAlgorithm,
    chunk_size: usize,
}

impl Default for Checksummer {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl Checksummer {
    /// Checksummer using `algorithm` and the default 4096-byte chunk size.
    #[must_use]
    pub const fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Override the read size. Zero is clamped to one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Hash the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the file cannot be opened or read.
    pub fn digest_file(&self, path: &Path) -> FsOpsResult<FileDigest> {
        let mut file =
            File::open(path).map_err(|source| FsOpsError::io("checksum.open", path, source))?;
        self.digest_reader(&mut file)
            .map_err(|source| FsOpsError::io("checksum.read", path, source))
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates read failures other than interruptions.
    pub fn digest_reader(&self, reader: &mut impl Read) -> io::Result<FileDigest> {
        let (hex, bytes) = match self.algorithm {
            HashAlgorithm::Sha256 => {
                let (digest, bytes) = stream::<Sha256>(reader, self.chunk_size)?;
                (format!("{digest:x}"), bytes)
            }
            HashAlgorithm::Sha384 => {
                let (digest, bytes) = stream::<Sha384>(reader, self.chunk_size)?;
                (format!("{digest:x}"), bytes)
            }
            HashAlgorithm::Sha512 => {
                let (digest, bytes) = stream::<Sha512>(reader, self.chunk_size)?;
                (format!("{digest:x}"), bytes)
            }
        };
        Ok(FileDigest { hex, bytes })
    }
}

/// Hash the file at `path` with `algorithm` and return the hex digest.
///
/// # Errors
///
/// Returns an IO error when the file cannot be opened or read.
pub fn compute_checksum(path: &Path, algorithm: HashAlgorithm) -> FsOpsResult<String> {
    Checksummer::new(algorithm)
        .digest_file(path)
        .map(|digest| digest.hex)
}

fn stream<D: Digest>(reader: &mut impl Read, chunk_size: usize) -> io::Result<(Output<D>, u64)> {
    let mut hasher = D::new();
    let mut buffer = vec![0_u8; chunk_size];
    let mut bytes = 0_u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        hasher.update(&buffer[..read]);
        bytes += read as u64;
    }
    Ok((hasher.finalize(), bytes))
}
