//! Huginn - batch named-entity extraction through Amazon Comprehend
//!
//! Huginn uploads a text file to S3, starts an asynchronous entities
//! detection job on it, polls until the job completes, downloads the
//! `tar.gz` result archive, and prints the highest-scoring entities of each
//! document.
//!
//! The remote services sit behind the [`ObjectStore`] and
//! [`EntityJobService`] traits, so the [`Workflow`] can be driven by the
//! AWS SDK clients (the `aws` feature) or by in-memory doubles.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use huginn::providers::{ComprehendJobs, S3Store};
//! use huginn::{Workflow, WorkflowConfig};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let sdk = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
//!     let workflow = Workflow::new(
//!         Arc::new(S3Store::from_sdk_config(&sdk)),
//!         Arc::new(ComprehendJobs::from_sdk_config(&sdk)),
//!         WorkflowConfig::new("my-bucket", "arn:aws:iam::123456789012:role/comprehend"),
//!     )?;
//!
//!     let summary = workflow
//!         .run(Path::new("content.txt"), &mut std::io::stdout())
//!         .await?;
//!     println!("{} documents", summary.documents);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod poller;
pub mod providers;
pub mod results;
pub mod telemetry;
pub mod types;
mod version;
pub mod workflow;

// Re-export main types at crate root
pub use error::{HuginnError, Result, Stage};
pub use poller::PollConfig;
pub use providers::{EntityJobService, ObjectStore};
pub use version::{
    BUILD_TIMESTAMP, GIT_BRANCH, GIT_SHA, PKG_VERSION, git_dirty, long_version, version_string,
};
pub use workflow::{RunSummary, Workflow, WorkflowConfig};

// Re-export all types
pub use types::{
    DocumentResult, EntitiesJobRequest, Entity, InputFormat, JobHandle, JobProperties, JobStatus,
    S3Location,
};
