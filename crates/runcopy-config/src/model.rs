//! Typed copy policy model.
//!
//! # Design
//! - Pure data carriers; IO lives in `loader.rs`.
//! - Unknown fields in policy documents are rejected rather than ignored.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;

/// Hash algorithm used to fingerprint source and destination files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum HashAlgorithm {
    /// SHA-256, the default 256-bit digest.
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Render the algorithm as its lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Length in characters of the hex digest produced by this algorithm.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ConfigError::invalid(
                "hash_algorithm",
                value,
                "unsupported_algorithm",
            )),
        }
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Policy describing how a run is located, named, and verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyPolicy {
    /// Extension (including the leading dot) that marks the descriptor file.
    pub descriptor_extension: String,
    /// Descriptor field holding the run identifier.
    pub identifier_field: String,
    /// Algorithm used for integrity verification.
    pub hash_algorithm: HashAlgorithm,
    /// Read size in bytes used while hashing.
    pub chunk_size: usize,
    /// Delete a destination file whose checksum does not match its source.
    pub remove_corrupt: bool,
    /// Write a completion marker after every file of a batch verified.
    pub write_completion_marker: bool,
    /// Reserve the destination folder with an exclusive create-and-retry loop.
    pub exclusive_reservation: bool,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        Self {
            descriptor_extension: defaults::DESCRIPTOR_EXTENSION.to_string(),
            identifier_field: defaults::IDENTIFIER_FIELD.to_string(),
            hash_algorithm: HashAlgorithm::default(),
            chunk_size: defaults::CHUNK_SIZE,
            remove_corrupt: true,
            write_completion_marker: false,
            exclusive_reservation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_algorithm_parses_common_spellings() -> Result<(), ConfigError> {
        assert_eq!("sha256".parse::<HashAlgorithm>()?, HashAlgorithm::Sha256);
        assert_eq!("SHA-384".parse::<HashAlgorithm>()?, HashAlgorithm::Sha384);
        assert_eq!(" sha512 ".parse::<HashAlgorithm>()?, HashAlgorithm::Sha512);
        assert!(matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(ConfigError::InvalidField {
                field: "hash_algorithm",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn default_policy_matches_documented_defaults() {
        let policy = CopyPolicy::default();
        assert_eq!(policy.descriptor_extension, ".json");
        assert_eq!(policy.identifier_field, "test_sequence_id");
        assert_eq!(policy.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(policy.chunk_size, 4096);
        assert!(policy.remove_corrupt);
        assert!(!policy.write_completion_marker);
        assert!(!policy.exclusive_reservation);
    }

    #[test]
    fn policy_documents_fill_missing_fields_with_defaults() -> Result<(), serde_json::Error> {
        let policy: CopyPolicy =
            serde_json::from_str(r#"{"hash_algorithm": "sha512", "chunk_size": 8192}"#)?;
        assert_eq!(policy.hash_algorithm, HashAlgorithm::Sha512);
        assert_eq!(policy.chunk_size, 8192);
        assert_eq!(policy.identifier_field, "test_sequence_id");

        let unknown = serde_json::from_str::<CopyPolicy>(r#"{"chunk": 1}"#);
        assert!(unknown.is_err());
        Ok(())
    }

    #[test]
    fn policy_documents_accept_the_same_algorithm_spellings_as_the_environment()
    -> Result<(), serde_json::Error> {
        let policy: CopyPolicy = serde_json::from_str(r#"{"hash_algorithm": "SHA-384"}"#)?;
        assert_eq!(policy.hash_algorithm, HashAlgorithm::Sha384);

        let rejected = serde_json::from_str::<CopyPolicy>(r#"{"hash_algorithm": "md5"}"#);
        assert!(
            rejected.is_err_and(|err| err.to_string().contains("invalid configuration field"))
        );

        assert_eq!(serde_json::to_string(&HashAlgorithm::Sha384)?, r#""sha384""#);
        Ok(())
    }
}
