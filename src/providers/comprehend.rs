//! Amazon Comprehend entities detection jobs.
//!
//! Wraps `StartEntitiesDetectionJob` and `DescribeEntitiesDetectionJob`.
//! See: <https://docs.aws.amazon.com/comprehend/latest/dg/API_StartEntitiesDetectionJob.html>

use async_trait::async_trait;
use aws_sdk_comprehend::Client as ComprehendClient;
use aws_sdk_comprehend::error::DisplayErrorContext;
use aws_sdk_comprehend::types::{
    InputDataConfig, InputFormat as SdkInputFormat, LanguageCode, OutputDataConfig,
};
use tracing::{debug, instrument};

use super::traits::EntityJobService;
use crate::types::{EntitiesJobRequest, JobHandle, JobProperties, JobStatus};
use crate::{HuginnError, Result};

/// [`EntityJobService`] backed by the AWS SDK Comprehend client.
#[derive(Clone)]
pub struct ComprehendJobs {
    client: ComprehendClient,
}

impl ComprehendJobs {
    /// Create a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::from_sdk_config(&config)
    }

    /// Create a client sharing an already loaded SDK config.
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::with_client(ComprehendClient::new(config))
    }

    /// Create with a custom client (for testing against a local endpoint).
    pub fn with_client(client: ComprehendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityJobService for ComprehendJobs {
    fn name(&self) -> &str {
        "comprehend"
    }

    #[instrument(skip(self, request), fields(job_name = %request.job_name, input = %request.input_uri))]
    async fn start_job(&self, request: &EntitiesJobRequest) -> Result<JobHandle> {
        let input = InputDataConfig::builder()
            .s3_uri(&request.input_uri)
            .input_format(SdkInputFormat::from(request.input_format.as_str()))
            .build()
            .map_err(|e| HuginnError::Submit(e.to_string()))?;
        let output = OutputDataConfig::builder()
            .s3_uri(&request.output_uri)
            .build()
            .map_err(|e| HuginnError::Submit(e.to_string()))?;

        let response = self
            .client
            .start_entities_detection_job()
            .job_name(&request.job_name)
            .input_data_config(input)
            .output_data_config(output)
            .data_access_role_arn(&request.data_access_role_arn)
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .send()
            .await
            .map_err(|e| HuginnError::Submit(DisplayErrorContext(&e).to_string()))?;

        let job_id = response
            .job_id()
            .ok_or_else(|| HuginnError::Submit("response did not include a job id".into()))?;

        debug!(job_id, "job started");
        Ok(JobHandle::new(job_id))
    }

    #[instrument(skip(self), fields(job_id = %job.job_id))]
    async fn describe_job(&self, job: &JobHandle) -> Result<JobProperties> {
        let response = self
            .client
            .describe_entities_detection_job()
            .job_id(&job.job_id)
            .send()
            .await
            .map_err(|e| HuginnError::Describe(DisplayErrorContext(&e).to_string()))?;

        let props = response.entities_detection_job_properties().ok_or_else(|| {
            HuginnError::Describe("response did not include job properties".into())
        })?;

        let status = props
            .job_status()
            .map(|s| JobStatus::from_wire(s.as_str()))
            .unwrap_or_else(|| JobStatus::Unknown("UNSPECIFIED".to_string()));

        Ok(JobProperties {
            job_id: props.job_id().unwrap_or(job.job_id.as_str()).to_string(),
            status,
            output_uri: props.output_data_config().map(|c| c.s3_uri().to_string()),
            message: props.message().map(str::to_string),
        })
    }
}
