//! Remote service clients.
//!
//! The traits in [`traits`] are always available; the AWS-backed
//! implementations are behind the `aws` feature.

#[cfg(feature = "aws")]
pub mod comprehend;
#[cfg(feature = "aws")]
pub mod s3;
pub mod traits;

#[cfg(feature = "aws")]
pub use comprehend::ComprehendJobs;
#[cfg(feature = "aws")]
pub use s3::S3Store;
pub use traits::{EntityJobService, ObjectStore};
