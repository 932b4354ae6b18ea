//! Entities detection job types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier returned when a job is started.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job_id)
    }
}

/// Lifecycle status reported by the detection service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    InProgress,
    Completed,
    Failed,
    StopRequested,
    Stopped,
    /// A status string this crate does not know about.
    Unknown(String),
}

impl JobStatus {
    /// Parse the service's wire value (e.g. `IN_PROGRESS`).
    pub fn from_wire(value: &str) -> Self {
        match value {
            "SUBMITTED" => JobStatus::Submitted,
            "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            "STOP_REQUESTED" => JobStatus::StopRequested,
            "STOPPED" => JobStatus::Stopped,
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Submitted => "SUBMITTED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::StopRequested => "STOP_REQUESTED",
            JobStatus::Stopped => "STOPPED",
            JobStatus::Unknown(s) => s,
        }
    }

    /// No further transition happens after a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped
        )
    }

    /// Terminal, but without usable output.
    pub fn is_failure(&self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Stopped)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a job status response the workflow cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct JobProperties {
    pub job_id: String,
    pub status: JobStatus,
    /// Declared output location; populated once the job has completed.
    pub output_uri: Option<String>,
    /// Service-provided reason, usually present on failure.
    pub message: Option<String>,
}

impl JobProperties {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            output_uri: None,
            message: None,
        }
    }

    pub fn with_output_uri(mut self, uri: impl Into<String>) -> Self {
        self.output_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// How documents are laid out in the input object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputFormat {
    /// The whole object is one document.
    #[default]
    OneDocPerFile,
    /// Each line of the object is a separate document.
    OneDocPerLine,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::OneDocPerFile => "ONE_DOC_PER_FILE",
            InputFormat::OneDocPerLine => "ONE_DOC_PER_LINE",
        }
    }
}

/// Request to start an asynchronous entities detection job.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitiesJobRequest {
    pub job_name: String,
    /// `s3://` URI of the input object or prefix.
    pub input_uri: String,
    pub input_format: InputFormat,
    /// `s3://` prefix the job writes its archive under.
    pub output_uri: String,
    /// Language code of the input text (e.g. "ja").
    pub language_code: String,
    /// IAM role the service assumes to read input and write output.
    pub data_access_role_arn: String,
}
