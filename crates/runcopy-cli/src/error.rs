//! CLI error type and its mapping onto process exit codes.

use runcopy_config::ConfigError;
use runcopy_fsops::{ErrorKind, FsOpsError};

/// Failure surfaced to the user.
#[derive(Debug)]
pub(crate) enum CliError {
    /// The request itself was unusable; exit code 2.
    Validation(String),
    /// The copy was attempted and failed; exit code 3.
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField {
                field,
                value,
                reason,
            } => Self::validation(match value {
                Some(value) => format!("invalid configuration field {field} ({reason}): {value}"),
                None => format!("invalid configuration field {field} ({reason})"),
            }),
            other => Self::validation(format!(
                "{:#}",
                anyhow::Error::new(other).context("failed to load copy policy")
            )),
        }
    }
}

impl From<FsOpsError> for CliError {
    fn from(err: FsOpsError) -> Self {
        match err.kind() {
            ErrorKind::NotFound
            | ErrorKind::Conflict
            | ErrorKind::MissingField
            | ErrorKind::InvalidInput => Self::validation(describe(&err)),
            ErrorKind::IntegrityMismatch | ErrorKind::Io => {
                let context = describe(&err);
                Self::failure(anyhow::Error::new(err).context(context))
            }
        }
    }
}

fn describe(err: &FsOpsError) -> String {
    match err {
        FsOpsError::DescriptorNotFound { directory } => {
            format!("no descriptor file found in {}", directory.display())
        }
        FsOpsError::DescriptorConflict {
            directory,
            candidates,
        } => format!(
            "{} descriptor files found in {}; expected exactly one",
            candidates.len(),
            directory.display()
        ),
        FsOpsError::MissingField { path, field } => {
            format!("{field} is missing or empty in {}", path.display())
        }
        FsOpsError::IntegrityMismatch {
            source_path,
            destination_path,
            ..
        } => format!(
            "copy of {} to {} failed verification",
            source_path.display(),
            destination_path.display()
        ),
        FsOpsError::InvalidInput {
            field,
            reason,
            value,
        } => match value {
            Some(value) => format!("invalid {field} ({reason}): {value}"),
            None => format!("invalid {field} ({reason})"),
        },
        FsOpsError::ReservationExhausted { root, attempts } => format!(
            "could not reserve a destination folder under {} after {attempts} attempts",
            root.display()
        ),
        FsOpsError::Io {
            operation, path, ..
        }
        | FsOpsError::Json {
            operation, path, ..
        }
        | FsOpsError::Walkdir {
            operation, path, ..
        } => format!("{operation} failed for {}", path.display()),
        FsOpsError::Glob {
            operation, pattern, ..
        }
        | FsOpsError::Regex {
            operation, pattern, ..
        } => format!("{operation} failed for pattern {pattern}"),
    }
}
