//! Public types for the Huginn API.

mod entity;
mod job;
mod location;

pub use entity::{DocumentResult, Entity};
pub use job::{EntitiesJobRequest, InputFormat, JobHandle, JobProperties, JobStatus};
pub use location::S3Location;
