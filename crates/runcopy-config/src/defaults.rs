//! Default values and environment keys for the copy policy.
//!
//! # Design
//! - Centralize defaults so the loader, validation, and tests agree.
//! - Keep environment key names next to the values they override.

/// File extension identifying the descriptor file inside a source directory.
pub const DESCRIPTOR_EXTENSION: &str = ".json";
/// Descriptor field that carries the run identifier.
pub const IDENTIFIER_FIELD: &str = "test_sequence_id";
/// Name of the default checksum algorithm.
pub const HASH_ALGORITHM: &str = "sha256";
/// Read size used when streaming files through the hasher.
pub const CHUNK_SIZE: usize = 4096;
/// Upper bound accepted for the streaming chunk size (16 MiB).
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Environment variable overriding [`DESCRIPTOR_EXTENSION`].
pub const ENV_DESCRIPTOR_EXTENSION: &str = "RUNCOPY_DESCRIPTOR_EXTENSION";
/// Environment variable overriding [`IDENTIFIER_FIELD`].
pub const ENV_IDENTIFIER_FIELD: &str = "RUNCOPY_IDENTIFIER_FIELD";
/// Environment variable overriding [`HASH_ALGORITHM`].
pub const ENV_HASH_ALGORITHM: &str = "RUNCOPY_HASH_ALGORITHM";
/// Environment variable overriding [`CHUNK_SIZE`].
pub const ENV_CHUNK_SIZE: &str = "RUNCOPY_CHUNK_SIZE";
/// Environment variable toggling removal of corrupt copies.
pub const ENV_REMOVE_CORRUPT: &str = "RUNCOPY_REMOVE_CORRUPT";
/// Environment variable toggling the completion marker.
pub const ENV_COMPLETION_MARKER: &str = "RUNCOPY_COMPLETION_MARKER";
/// Environment variable toggling exclusive destination reservation.
pub const ENV_EXCLUSIVE_RESERVATION: &str = "RUNCOPY_EXCLUSIVE_RESERVATION";
