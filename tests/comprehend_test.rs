//! Comprehend job client against a wiremock endpoint.
#![cfg(feature = "aws")]

use aws_sdk_comprehend::config::{BehaviorVersion, Credentials, Region};
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huginn::providers::ComprehendJobs;
use huginn::{
    EntitiesJobRequest, EntityJobService, HuginnError, InputFormat, JobHandle, JobStatus,
};

const JSON_1_1: &str = "application/x-amz-json-1.1";

fn jobs_for(server: &MockServer) -> ComprehendJobs {
    let config = aws_sdk_comprehend::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("ap-northeast-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(server.uri())
        .build();
    ComprehendJobs::with_client(aws_sdk_comprehend::Client::from_conf(config))
}

fn sample_request() -> EntitiesJobRequest {
    EntitiesJobRequest {
        job_name: "sample-entities-detection-job".into(),
        input_uri: "s3://b/comprehend/input/content.txt".into(),
        input_format: InputFormat::OneDocPerFile,
        output_uri: "s3://b/comprehend/output/".into(),
        language_code: "ja".into(),
        data_access_role_arn: "arn:aws:iam::123456789012:role/comprehend".into(),
    }
}

#[tokio::test]
async fn start_job_sends_request_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(
            "x-amz-target",
            "Comprehend_20171127.StartEntitiesDetectionJob",
        ))
        .and(body_partial_json(serde_json::json!({
            "LanguageCode": "ja",
            "JobName": "sample-entities-detection-job",
            "InputDataConfig": {
                "S3Uri": "s3://b/comprehend/input/content.txt",
                "InputFormat": "ONE_DOC_PER_FILE"
            },
            "OutputDataConfig": { "S3Uri": "s3://b/comprehend/output/" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"JobId":"job-1","JobStatus":"SUBMITTED"}"#, JSON_1_1),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = jobs_for(&server).start_job(&sample_request()).await.unwrap();
    assert_eq!(handle, JobHandle::new("job-1"));
}

#[tokio::test]
async fn rejected_start_is_a_submit_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            r#"{"__type":"InvalidRequestException","Message":"role cannot be assumed"}"#,
            JSON_1_1,
        ))
        .mount(&server)
        .await;

    let err = jobs_for(&server)
        .start_job(&sample_request())
        .await
        .unwrap_err();
    assert!(matches!(err, HuginnError::Submit(_)));
}

#[tokio::test]
async fn describe_maps_completed_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(
            "x-amz-target",
            "Comprehend_20171127.DescribeEntitiesDetectionJob",
        ))
        .and(body_partial_json(serde_json::json!({ "JobId": "job-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"EntitiesDetectionJobProperties":{"JobId":"job-1","JobStatus":"COMPLETED","OutputDataConfig":{"S3Uri":"s3://b/comprehend/output/123-NER-job-1/output/output.tar.gz"}}}"#,
            JSON_1_1,
        ))
        .mount(&server)
        .await;

    let props = jobs_for(&server)
        .describe_job(&JobHandle::new("job-1"))
        .await
        .unwrap();
    assert_eq!(props.status, JobStatus::Completed);
    assert_eq!(
        props.output_uri.as_deref(),
        Some("s3://b/comprehend/output/123-NER-job-1/output/output.tar.gz")
    );
}

#[tokio::test]
async fn describe_maps_failed_job_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"EntitiesDetectionJobProperties":{"JobId":"job-1","JobStatus":"FAILED","Message":"NO_READ_ACCESS_TO_INPUT"}}"#,
            JSON_1_1,
        ))
        .mount(&server)
        .await;

    let props = jobs_for(&server)
        .describe_job(&JobHandle::new("job-1"))
        .await
        .unwrap();
    assert_eq!(props.status, JobStatus::Failed);
    assert_eq!(props.message.as_deref(), Some("NO_READ_ACCESS_TO_INPUT"));
    assert!(props.output_uri.is_none());
}
