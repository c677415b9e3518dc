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

//! Copy policy configuration for the runcopy workspace.
//!
//! Layout: `model.rs` (typed policy and hash algorithm), `defaults.rs`
//! (default values and environment keys), `validate.rs` (field parsing and
//! validation), `loader.rs` (file + environment layering).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{PolicyLoader, load_policy};
pub use model::{CopyPolicy, HashAlgorithm};
pub use validate::validate_policy;
