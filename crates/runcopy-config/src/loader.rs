//! Layered policy loading: defaults, then an optional JSON file, then the environment.
//!
//! # Design
//! - The environment lookup is injectable so tests never mutate process state.
//! - Every layer is validated once, after all overrides were applied.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::defaults::{
    ENV_CHUNK_SIZE, ENV_COMPLETION_MARKER, ENV_DESCRIPTOR_EXTENSION, ENV_EXCLUSIVE_RESERVATION,
    ENV_HASH_ALGORITHM, ENV_IDENTIFIER_FIELD, ENV_REMOVE_CORRUPT,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{CopyPolicy, HashAlgorithm};
use crate::validate::{parse_bool, parse_chunk_size, validate_policy};

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Builds a [`CopyPolicy`] from a policy file and environment overrides.
pub struct PolicyLoader {
    env: EnvLookup,
}

impl Default for PolicyLoader {
    fn default() -> Self {
        Self::from_process_env()
    }
}

impl PolicyLoader {
    /// Loader reading overrides from the process environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::with_env(|key| std::env::var(key).ok())
    }

    /// Loader reading overrides through the supplied lookup.
    #[must_use]
    pub fn with_env(lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        Self {
            env: Box::new(lookup),
        }
    }

    /// Load the policy, starting from `path` when provided.
    ///
    /// # Errors
    ///
    /// Returns an error when the policy file cannot be read or parsed, or when
    /// the merged policy fails validation.
    pub fn load(&self, path: Option<&Path>) -> ConfigResult<CopyPolicy> {
        let mut policy = match path {
            Some(path) => read_policy_file(path)?,
            None => CopyPolicy::default(),
        };
        self.apply_env(&mut policy)?;
        validate_policy(&policy)?;
        debug!(
            descriptor_extension = %policy.descriptor_extension,
            identifier_field = %policy.identifier_field,
            hash_algorithm = %policy.hash_algorithm,
            chunk_size = policy.chunk_size,
            "copy policy loaded"
        );
        Ok(policy)
    }

    fn apply_env(&self, policy: &mut CopyPolicy) -> ConfigResult<()> {
        if let Some(value) = self.var(ENV_DESCRIPTOR_EXTENSION) {
            policy.descriptor_extension = value;
        }
        if let Some(value) = self.var(ENV_IDENTIFIER_FIELD) {
            policy.identifier_field = value;
        }
        if let Some(value) = self.var(ENV_HASH_ALGORITHM) {
            policy.hash_algorithm = value.parse::<HashAlgorithm>()?;
        }
        if let Some(value) = self.var(ENV_CHUNK_SIZE) {
            policy.chunk_size = parse_chunk_size(&value)?;
        }
        if let Some(value) = self.var(ENV_REMOVE_CORRUPT) {
            policy.remove_corrupt = parse_bool("remove_corrupt", &value)?;
        }
        if let Some(value) = self.var(ENV_COMPLETION_MARKER) {
            policy.write_completion_marker = parse_bool("write_completion_marker", &value)?;
        }
        if let Some(value) = self.var(ENV_EXCLUSIVE_RESERVATION) {
            policy.exclusive_reservation = parse_bool("exclusive_reservation", &value)?;
        }
        Ok(())
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|value| !value.trim().is_empty())
    }
}

/// Load the policy from `path` (optional) layered with the process environment.
///
/// # Errors
///
/// See [`PolicyLoader::load`].
pub fn load_policy(path: Option<&Path>) -> ConfigResult<CopyPolicy> {
    PolicyLoader::from_process_env().load(path)
}

fn read_policy_file(path: &Path) -> ConfigResult<CopyPolicy> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "policy.read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        operation: "policy.parse",
        path: path.to_path_buf(),
        source,
    })
}
