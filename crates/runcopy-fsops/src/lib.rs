#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Verified copying of run directories into numbered destination folders.
//!
//! Layout: `descriptor.rs` (locate, parse, identifier search), `namer.rs`
//! (destination folder naming), `checksum.rs` (streaming digests),
//! `copier.rs` (single verified copy), `service.rs` (batch orchestration),
//! `model/` (requests and reports), `error.rs` (error taxonomy).

pub mod checksum;
pub mod copier;
pub mod descriptor;
pub mod error;
pub mod model;
pub mod namer;
pub mod service;

pub use checksum::{Checksummer, FileDigest, compute_checksum};
pub use copier::{DigestSource, VerifiedCopier};
pub use descriptor::{
    DescriptorNode, Scalar, extract_run_id, locate_descriptor, parse_descriptor,
};
pub use error::{ErrorKind, FsOpsError, FsOpsResult};
pub use model::{BatchReport, BatchRequest, CopiedFile, RunId};
pub use namer::{MAX_RESERVE_ATTEMPTS, next_destination, reserve_destination};
pub use service::{BatchCopier, COMPLETION_MARKER_NAME, copy_run};
