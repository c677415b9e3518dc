//! Destination folder naming.
//!
//! # Design
//! - Destination folders are named `<run id>_<n>` where `n` is one past the largest
//!   suffix already present under the destination root.
//! - [`next_destination`] only proposes a name; [`reserve_destination`] claims it with
//!   a non-recursive `create_dir` and rescans when another writer got there first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::RunId;

/// Upper bound on rescans performed by [`reserve_destination`].
pub const MAX_RESERVE_ATTEMPTS: usize = 16;

/// Propose the next free `<run id>_<n>` folder under `root`.
///
/// Every existing entry counts, files included, so the proposal never
/// collides with a sibling. A missing root is treated as empty. Nothing is
/// created on disk.
///
/// # Errors
///
/// Returns an IO error when `root` cannot be listed and
/// [`FsOpsError::InvalidInput`] when the largest suffix is already `u64::MAX`.
pub fn next_destination(root: &Path, run_id: &RunId) -> FsOpsResult<PathBuf> {
    let pattern = format!("^{}_([0-9]+)$", regex::escape(run_id.as_str()));
    let matcher = Regex::new(&pattern).map_err(|source| FsOpsError::Regex {
        operation: "namer.compile",
        pattern: pattern.clone(),
        source,
    })?;

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(root.join(format!("{run_id}_1")));
        }
        Err(source) => return Err(FsOpsError::io("namer.read_dir", root, source)),
    };

    let mut highest = 0_u64;
    for entry in entries {
        let entry = entry.map_err(|source| FsOpsError::io("namer.entry", root, source))?;
        let name = entry.file_name();
        let Some(captures) = name.to_str().and_then(|name| matcher.captures(name)) else {
            continue;
        };
        match captures[1].parse::<u64>() {
            Ok(suffix) => highest = highest.max(suffix),
            Err(_) => warn!(
                entry = %entry.path().display(),
                "ignoring destination suffix that does not fit in u64"
            ),
        }
    }

    let next = highest
        .checked_add(1)
        .ok_or_else(|| FsOpsError::InvalidInput {
            field: "destination_suffix",
            reason: "overflow",
            value: Some(highest.to_string()),
        })?;
    Ok(root.join(format!("{run_id}_{next}")))
}

/// Create and return the next free `<run id>_<n>` folder under `root`.
///
/// `root` itself is created when missing. When another writer claims the
/// proposed folder first the listing is rescanned, up to
/// [`MAX_RESERVE_ATTEMPTS`] times.
///
/// # Errors
///
/// Returns [`FsOpsError::ReservationExhausted`] when every attempt collided,
/// and IO errors as encountered.
pub fn reserve_destination(root: &Path, run_id: &RunId) -> FsOpsResult<PathBuf> {
    reserve_with(root, run_id, |p| fs::create_dir(p))
}

fn reserve_with(
    root: &Path,
    run_id: &RunId,
    mut create_dir: impl FnMut(&Path) -> io::Result<()>,
) -> FsOpsResult<PathBuf> {
    fs::create_dir_all(root).map_err(|source| FsOpsError::io("namer.create_root", root, source))?;
    for attempt in 1..=MAX_RESERVE_ATTEMPTS {
        let candidate = next_destination(root, run_id)?;
        match create_dir(&candidate) {
            Ok(()) => {
                debug!(destination = %candidate.display(), attempt, "destination reserved");
                return Ok(candidate);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                debug!(destination = %candidate.display(), attempt, "destination taken, rescanning");
            }
            Err(source) => return Err(FsOpsError::io("namer.reserve", &candidate, source)),
        }
    }
    Err(FsOpsError::ReservationExhausted {
        root: root.to_path_buf(),
        attempts: MAX_RESERVE_ATTEMPTS,
    })
}
