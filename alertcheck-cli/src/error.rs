//! CLI-specific error types and exit code mapping

use alertcheck_core::error::AlertcheckError;
use alertcheck_harness::HarnessError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from alertcheck-core.
    #[error("{0}")]
    Core(#[from] AlertcheckError),

    /// Wrapped harness error (HTTP, GELF socket, polling).
    #[error("{0}")]
    Harness(#[from] HarnessError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                |
    /// |------|----------------------------------------|
    /// | 0    | Success                                |
    /// | 1    | General / command error                |
    /// | 2    | Configuration error                    |
    /// | 3    | Server unreachable or wait timed out   |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Core(AlertcheckError::Config(_)) => 2,
            Self::Core(AlertcheckError::Timeout { .. }) => 3,
            Self::Harness(HarnessError::Config(_)) => 2,
            Self::Harness(e) if e.is_connection_refused() => 3,
            Self::Harness(HarnessError::Timeout { .. }) => 3,
            Self::JsonSerialize(_)
            | Self::Command(_)
            | Self::Io(_)
            | Self::Core(_)
            | Self::Harness(_) => 1,
        }
    }
}
