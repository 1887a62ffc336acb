use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every project contributed to the BOM
    Success = 0,
    /// The BOM was written but at least one project failed
    PartialFailure = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (unreadable evidence, conflicting identities, I/O error, etc.)
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
            ExitCode::PartialFailure => write!(f, "Partial Failure (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for SBOM assembly.
///
/// Recoverable, record-local problems are not errors: they are collected as
/// anomalies on the build result. Everything here fails at least one unit of work.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Evidence file not found: {path}\n\n💡 Hint: {suggestion}")]
    EvidenceFileNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse evidence file: {path}\nDetails: {details}\n\n💡 Hint: Supported encodings are JSON (.json), YAML (.yml/.yaml) and TOML (.toml)")]
    EvidenceParseError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    /// Validation error for request and builder inputs
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflicting evidence for component {identity}: {field} is '{existing}' in one source and '{incoming}' in another\n\n💡 Hint: Two sources disagree about an immutable property of the same package version; the input cannot be trusted")]
    IdentityCollisionConflict {
        identity: String,
        field: String,
        existing: String,
        incoming: String,
    },

    #[error("Failed to read {format} document\nDetails: {details}\n\n💡 Hint: The document was not produced by a compatible version of this tool")]
    SerializationFormat { format: String, details: String },

    #[error("Evidence source unavailable for project '{project}'\nDetails: {details}")]
    SourceUnavailable { project: String, details: String },

    #[error("All {count} project(s) failed; no BOM could be assembled")]
    AllProjectsFailed { count: usize },
}
