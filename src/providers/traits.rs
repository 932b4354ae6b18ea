//! Service traits the workflow is written against.
//!
//! The workflow never talks to AWS directly; it holds an [`ObjectStore`]
//! and an [`EntityJobService`]. The `aws` feature provides implementations
//! backed by the AWS SDK, and tests supply in-memory doubles.
//!
//! Implementations map every failure of the underlying call to the
//! stage-specific [`HuginnError`](crate::HuginnError) variant (`Upload`,
//! `Download`, `Submit`, `Describe`) so the driver can tell which step
//! broke.

use async_trait::async_trait;

use crate::Result;
use crate::types::{EntitiesJobRequest, JobHandle, JobProperties, S3Location};

// ============================================================================
// Object storage
// ============================================================================

/// Single-shot object put/get.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// Upload `body` to `location` in one request.
    async fn put_object(&self, location: &S3Location, body: Vec<u8>) -> Result<()>;

    /// Download the full object body at `location`.
    async fn get_object(&self, location: &S3Location) -> Result<Vec<u8>>;
}

// ============================================================================
// Entity detection jobs
// ============================================================================

/// Asynchronous entities detection job control.
#[async_trait]
pub trait EntityJobService: Send + Sync {
    /// Service name for logging/debugging.
    fn name(&self) -> &str;

    /// Start a job and return its handle.
    async fn start_job(&self, request: &EntitiesJobRequest) -> Result<JobHandle>;

    /// Query the current status of a job.
    async fn describe_job(&self, job: &JobHandle) -> Result<JobProperties>;
}
