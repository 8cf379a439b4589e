use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the manifest was scanned and the inventory produced
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (registry error, resolution error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Error taxonomy for scanning one manifest.
///
/// Each variant is fatal for the manifest currently being extracted and
/// for that manifest only; the surrounding scan loop decides whether to
/// skip the file or abort entirely. Conditions that have a safe fallback
/// (an unresolvable property, a package without locations) are logged as
/// warnings instead and never surface here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to parse manifest {path}: {details}")]
    Parse { path: String, details: String },

    #[error("failed to merge project data for {path}: {details}")]
    Merge { path: String, details: String },

    #[error("registry request for {coordinate} failed: {details}")]
    Registry { coordinate: String, details: String },

    #[error("failed resolving {coordinate}: {details}")]
    Resolution { coordinate: String, details: String },

    #[error("operation cancelled")]
    Cancelled,
}

impl ScanError {
    /// Whether an error chain was caused by cancellation.
    ///
    /// Cancellation must never be demoted to a non-fatal, per-node
    /// resolution warning, so callers that aggregate errors check this
    /// before swallowing one.
    pub fn is_cancelled(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<ScanError>(), Some(ScanError::Cancelled))
    }
}
