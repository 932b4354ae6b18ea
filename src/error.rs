//! Huginn error types

use std::fmt;
use std::path::PathBuf;

/// Workflow stage an error belongs to.
///
/// Every failure aborts the run; the stage tells the operator which step
/// broke and selects the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Config,
    Input,
    Upload,
    Submit,
    Poll,
    Fetch,
    Extract,
    Decode,
    Report,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Config => "config",
            Stage::Input => "input",
            Stage::Upload => "upload",
            Stage::Submit => "submit",
            Stage::Poll => "poll",
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Decode => "decode",
            Stage::Report => "report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Local resource errors
    #[error("unable to open file {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Remote call errors
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("starting entities detection job failed: {0}")]
    Submit(String),

    #[error("describing entities detection job failed: {0}")]
    Describe(String),

    #[error("downloading result object failed: {0}")]
    Download(String),

    #[error("invalid output URI '{uri}': {reason}")]
    InvalidOutputUri { uri: String, reason: String },

    // Job lifecycle errors
    #[error("job {job_id} did not complete after {attempts} status checks (last status: {last_status})")]
    JobTimeout {
        job_id: String,
        attempts: u32,
        last_status: String,
    },

    #[error("job {job_id} ended with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    JobFailed {
        job_id: String,
        status: String,
        message: Option<String>,
    },

    // Archive and decoding errors
    #[error("reading result archive failed: {0}")]
    Archive(#[source] std::io::Error),

    #[error("result archive has no entry named '{name}'")]
    MissingResultEntry { name: String },

    #[error("line {line}: malformed result document: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line} exceeds the {limit} byte line limit")]
    LineTooLong { line: usize, limit: usize },

    #[error("writing report failed: {0}")]
    Report(#[source] std::io::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// The workflow stage this error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            HuginnError::ReadInput { .. } => Stage::Input,
            HuginnError::Upload(_) => Stage::Upload,
            HuginnError::Submit(_) => Stage::Submit,
            HuginnError::Describe(_)
            | HuginnError::JobTimeout { .. }
            | HuginnError::JobFailed { .. } => Stage::Poll,
            HuginnError::Download(_) | HuginnError::InvalidOutputUri { .. } => Stage::Fetch,
            HuginnError::Archive(_) | HuginnError::MissingResultEntry { .. } => Stage::Extract,
            HuginnError::Decode { .. } | HuginnError::LineTooLong { .. } => Stage::Decode,
            HuginnError::Report(_) => Stage::Report,
            HuginnError::Configuration(_) => Stage::Config,
        }
    }

    /// Process exit code for this error.
    ///
    /// Distinct per failure class so scripts can tell a timeout from a
    /// failed status query.
    pub fn exit_code(&self) -> u8 {
        match self {
            HuginnError::Configuration(_) => 2,
            HuginnError::ReadInput { .. } => 3,
            HuginnError::Upload(_) => 4,
            HuginnError::Submit(_) => 5,
            HuginnError::Describe(_) => 6,
            HuginnError::JobTimeout { .. } => 7,
            HuginnError::JobFailed { .. } => 8,
            HuginnError::Download(_) | HuginnError::InvalidOutputUri { .. } => 9,
            HuginnError::Archive(_) | HuginnError::MissingResultEntry { .. } => 10,
            HuginnError::Decode { .. } | HuginnError::LineTooLong { .. } => 11,
            HuginnError::Report(_) => 12,
        }
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
