//! Descriptor discovery, parsing, and run-identifier extraction.
//!
//! # Design
//! - Parsed JSON is lowered into [`DescriptorNode`], an ordered tagged tree, so the
//!   depth-first search contract does not depend on `serde_json` map internals.
//! - Field search is generic over the key; the missing-field policy lives in
//!   [`extract_run_id`].

use std::fs;
use std::num::FpCategory;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::RunId;

/// Leaf value of a descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number, kept at parsed precision.
    Number(Number),
    /// JSON string.
    String(String),
}

/// Parsed descriptor content.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorNode {
    /// Key/value pairs in document order.
    Mapping(Vec<(String, DescriptorNode)>),
    /// Ordered elements.
    Sequence(Vec<DescriptorNode>),
    /// Leaf value.
    Scalar(Scalar),
}

impl From<Value> for DescriptorNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(flag) => Self::Scalar(Scalar::Bool(flag)),
            Value::Number(number) => Self::Scalar(Scalar::Number(number)),
            Value::String(text) => Self::Scalar(Scalar::String(text)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl DescriptorNode {
    /// Whether the node carries no usable value.
    ///
    /// `null`, `false`, zero, empty strings, and empty containers are falsy.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Mapping(entries) => entries.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Scalar(Scalar::Null) => true,
            Self::Scalar(Scalar::Bool(flag)) => !flag,
            Self::Scalar(Scalar::Number(number)) => number
                .as_f64()
                .is_some_and(|n| n.classify() == FpCategory::Zero),
            Self::Scalar(Scalar::String(text)) => text.is_empty(),
        }
    }

    /// Depth-first search for the first truthy value stored under `key`.
    ///
    /// Each mapping is checked for `key` before its values are searched in
    /// document order; sequences are searched element by element. Falsy
    /// matches are skipped and the search continues.
    #[must_use]
    pub fn find_field(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(entries) => {
                let direct = entries
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| value)
                    .filter(|value| !value.is_falsy());
                direct.or_else(|| entries.iter().find_map(|(_, value)| value.find_field(key)))
            }
            Self::Sequence(items) => items.iter().find_map(|item| item.find_field(key)),
            Self::Scalar(_) => None,
        }
    }

    /// Render a string-like scalar as text.
    ///
    /// Strings are returned verbatim and numbers in their JSON form; every
    /// other node yields `None`.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Scalar(Scalar::String(text)) => Some(text.clone()),
            Self::Scalar(Scalar::Number(number)) => Some(number.to_string()),
            _ => None,
        }
    }
}

/// Find the single descriptor file directly inside `dir`.
///
/// Only regular files (symlinks are followed) whose name ends in `extension`
/// are candidates; hidden entries are ignored.
///
/// # Errors
///
/// Returns [`FsOpsError::DescriptorNotFound`] when nothing matches,
/// [`FsOpsError::DescriptorConflict`] when more than one file matches, and
/// IO or pattern errors as encountered.
pub fn locate_descriptor(dir: &Path, extension: &str) -> FsOpsResult<PathBuf> {
    let pattern = format!("*{}", globset::escape(extension));
    let matcher = GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| FsOpsError::glob("descriptor.compile", pattern.clone(), source))?
        .compile_matcher();

    let entries =
        fs::read_dir(dir).map_err(|source| FsOpsError::io("descriptor.read_dir", dir, source))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| FsOpsError::io("descriptor.entry", dir, source))?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') || !matcher.is_match(&name) {
            continue;
        }
        let path = entry.path();
        if fs::metadata(&path).is_ok_and(|meta| meta.is_file()) {
            candidates.push(path);
        }
    }
    candidates.sort();

    match candidates.len() {
        0 => Err(FsOpsError::DescriptorNotFound {
            directory: dir.to_path_buf(),
        }),
        1 => {
            let path = candidates.remove(0);
            debug!(descriptor = %path.display(), "descriptor located");
            Ok(path)
        }
        _ => Err(FsOpsError::DescriptorConflict {
            directory: dir.to_path_buf(),
            candidates,
        }),
    }
}

/// Read and parse the descriptor at `path`.
///
/// # Errors
///
/// Returns an IO error when the file cannot be read and a JSON error when it
/// is not valid JSON.
pub fn parse_descriptor(path: &Path) -> FsOpsResult<DescriptorNode> {
    let raw = fs::read(path).map_err(|source| FsOpsError::io("descriptor.read", path, source))?;
    let value: Value = serde_json::from_slice(&raw)
        .map_err(|source| FsOpsError::json("descriptor.parse", path, source))?;
    Ok(DescriptorNode::from(value))
}

/// Pull the run identifier stored under `field` out of a parsed descriptor.
///
/// # Errors
///
/// Returns [`FsOpsError::MissingField`] when the field is absent, falsy, or
/// not string-like, and [`FsOpsError::InvalidInput`] when the value cannot
/// name a folder.
pub fn extract_run_id(tree: &DescriptorNode, field: &str, path: &Path) -> FsOpsResult<RunId> {
    let missing = || FsOpsError::MissingField {
        path: path.to_path_buf(),
        field: field.to_string(),
    };
    let text = tree
        .find_field(field)
        .and_then(DescriptorNode::as_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(missing)?;
    RunId::new(text)
}
