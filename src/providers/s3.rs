//! Amazon S3 object store.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, instrument};

use super::traits::ObjectStore;
use crate::types::S3Location;
use crate::{HuginnError, Result};

/// [`ObjectStore`] backed by the AWS SDK S3 client.
#[derive(Clone)]
pub struct S3Store {
    client: S3Client,
}

impl S3Store {
    /// Create a store from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::from_sdk_config(&config)
    }

    /// Create a store sharing an already loaded SDK config.
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::with_client(S3Client::new(config))
    }

    /// Create with a custom client (for testing against a local endpoint).
    pub fn with_client(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    #[instrument(skip(self, body), fields(location = %location, bytes = body.len()))]
    async fn put_object(&self, location: &S3Location, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| HuginnError::Upload(DisplayErrorContext(&e).to_string()))?;

        debug!("object stored");
        Ok(())
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn get_object(&self, location: &S3Location) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| HuginnError::Download(DisplayErrorContext(&e).to_string()))?;

        // The body is released when `collect` finishes or fails.
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| HuginnError::Download(format!("reading object body: {e}")))?
            .into_bytes();

        debug!(bytes = data.len(), "object downloaded");
        Ok(data.to_vec())
    }
}
