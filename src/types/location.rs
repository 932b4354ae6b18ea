//! `s3://bucket/key` locations.

use std::fmt;

use url::Url;

use crate::{HuginnError, Result};

/// A bucket and object key pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse an `s3://bucket/key` URI.
    ///
    /// The key is the URI path without its leading `/`. A URI with no key
    /// (e.g. `s3://bucket/`) is rejected since it cannot name an object.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: String| HuginnError::InvalidOutputUri {
            uri: uri.to_string(),
            reason,
        };

        let url = Url::parse(uri).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "s3" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        let bucket = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing bucket".to_string()))?;
        let key = url.path().strip_prefix('/').unwrap_or(url.path());
        if key.is_empty() {
            return Err(invalid("missing object key".to_string()));
        }

        Ok(Self::new(bucket, key))
    }
}

impl fmt::Display for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}
