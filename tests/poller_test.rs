use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use huginn::poller::{PollConfig, wait_for_completion};
use huginn::{
    EntitiesJobRequest, EntityJobService, HuginnError, JobHandle, JobProperties, JobStatus, Result,
};

/// One scripted response to a status query.
enum Step {
    Status(JobStatus),
    QueryFails,
}

/// Mock job service that replays a script of status responses.
///
/// Once the script runs out every query reports `IN_PROGRESS`.
struct ScriptedJobs {
    script: Mutex<VecDeque<Step>>,
    queries: AtomicU32,
}

impl ScriptedJobs {
    fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            queries: AtomicU32::new(0),
        }
    }

    fn in_progress_then_completed(k: usize) -> Self {
        let mut script: Vec<Step> = (0..k).map(|_| Step::Status(JobStatus::InProgress)).collect();
        script.push(Step::Status(JobStatus::Completed));
        Self::new(script)
    }

    fn query_count(&self) -> u32 {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EntityJobService for ScriptedJobs {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn start_job(&self, _request: &EntitiesJobRequest) -> Result<JobHandle> {
        Ok(JobHandle::new("job-1"))
    }

    async fn describe_job(&self, job: &JobHandle) -> Result<JobProperties> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Status(status)) => {
                let props = JobProperties::new(&job.job_id, status.clone());
                Ok(match status {
                    JobStatus::Completed => props.with_output_uri("s3://b/out/output.tar.gz"),
                    JobStatus::Failed => props.with_message("access denied to input"),
                    _ => props,
                })
            }
            Some(Step::QueryFails) => Err(HuginnError::Describe("throttled".into())),
            None => Ok(JobProperties::new(&job.job_id, JobStatus::InProgress)),
        }
    }
}

fn fast_config(max_attempts: u32) -> PollConfig {
    PollConfig::new()
        .interval(Duration::from_millis(1))
        .max_attempts(max_attempts)
}

#[test]
fn default_config_matches_documented_values() {
    let config = PollConfig::default();
    assert_eq!(config.interval, Duration::from_secs(10));
    assert_eq!(config.max_attempts, 100);
    assert!(config.fail_fast);
    assert_eq!(config.budget(), Duration::from_secs(1000));
}

#[tokio::test]
async fn completes_after_k_in_progress_responses() {
    for k in [0usize, 1, 4] {
        let jobs = ScriptedJobs::in_progress_then_completed(k);
        let mut out = Vec::new();

        let props = wait_for_completion(&jobs, &JobHandle::new("job-1"), &fast_config(10), &mut out)
            .await
            .unwrap();

        assert_eq!(props.status, JobStatus::Completed);
        assert_eq!(props.output_uri.as_deref(), Some("s3://b/out/output.tar.gz"));
        assert_eq!(jobs.query_count(), k as u32 + 1);

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("In Progress...").count(), k + 1);
        assert!(out.ends_with("Job Completed.\n"));
    }
}

#[tokio::test]
async fn completion_on_last_attempt_succeeds() {
    let jobs = ScriptedJobs::in_progress_then_completed(2);
    let result =
        wait_for_completion(&jobs, &JobHandle::new("job-1"), &fast_config(3), &mut io::sink()).await;

    assert!(result.is_ok());
    assert_eq!(jobs.query_count(), 3);
}

#[tokio::test]
async fn times_out_after_max_attempts() {
    let jobs = ScriptedJobs::new(vec![]);
    let mut out = Vec::new();

    let err = wait_for_completion(&jobs, &JobHandle::new("job-1"), &fast_config(5), &mut out)
        .await
        .unwrap_err();

    match err {
        HuginnError::JobTimeout {
            job_id,
            attempts,
            last_status,
        } => {
            assert_eq!(job_id, "job-1");
            assert_eq!(attempts, 5);
            assert_eq!(last_status, "IN_PROGRESS");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(jobs.query_count(), 5);

    let out = String::from_utf8(out).unwrap();
    assert!(!out.contains("Job Completed."));
    assert!(out.ends_with("Job Timeout.\n"));
}

#[tokio::test]
async fn zero_attempts_never_queries() {
    let jobs = ScriptedJobs::in_progress_then_completed(0);
    let err = wait_for_completion(&jobs, &JobHandle::new("job-1"), &fast_config(0), &mut io::sink())
        .await
        .unwrap_err();

    assert!(matches!(err, HuginnError::JobTimeout { attempts: 0, .. }));
    assert_eq!(jobs.query_count(), 0);
}

#[tokio::test]
async fn query_error_aborts_immediately() {
    let jobs = ScriptedJobs::new(vec![
        Step::Status(JobStatus::InProgress),
        Step::QueryFails,
        Step::Status(JobStatus::Completed),
    ]);

    let err = wait_for_completion(&jobs, &JobHandle::new("job-1"), &fast_config(10), &mut io::sink())
        .await
        .unwrap_err();

    assert!(matches!(err, HuginnError::Describe(_)));
    assert_eq!(jobs.query_count(), 2);
}

#[tokio::test]
async fn failed_job_stops_polling_when_fail_fast() {
    let jobs = ScriptedJobs::new(vec![
        Step::Status(JobStatus::Submitted),
        Step::Status(JobStatus::Failed),
    ]);

    let err = wait_for_completion(&jobs, &JobHandle::new("job-1"), &fast_config(50), &mut io::sink())
        .await
        .unwrap_err();

    match err {
        HuginnError::JobFailed {
            status, message, ..
        } => {
            assert_eq!(status, "FAILED");
            assert_eq!(message.as_deref(), Some("access denied to input"));
        }
        other => panic!("expected job failure, got {other:?}"),
    }
    assert_eq!(jobs.query_count(), 2);
}

#[tokio::test]
async fn failed_job_is_a_timeout_without_fail_fast() {
    let jobs = ScriptedJobs::new(vec![
        Step::Status(JobStatus::Stopped),
        Step::Status(JobStatus::Stopped),
        Step::Status(JobStatus::Stopped),
    ]);

    let err = wait_for_completion(
        &jobs,
        &JobHandle::new("job-1"),
        &fast_config(3).fail_fast(false),
        &mut io::sink(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        HuginnError::JobTimeout { ref last_status, .. } if last_status == "STOPPED"
    ));
    assert_eq!(jobs.query_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn waits_the_configured_interval_before_each_query() {
    let jobs = ScriptedJobs::in_progress_then_completed(2);
    let config = PollConfig::new()
        .interval(Duration::from_secs(10))
        .max_attempts(5);

    let start = tokio::time::Instant::now();
    wait_for_completion(&jobs, &JobHandle::new("job-1"), &config, &mut io::sink())
        .await
        .unwrap();

    // Three queries, each preceded by one interval.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(30), "waited {elapsed:?}");
    assert!(elapsed < Duration::from_secs(31), "waited {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn default_budget_times_out_after_one_hundred_intervals() {
    let jobs = ScriptedJobs::new(Vec::new());
    let config = PollConfig::default();
    assert_eq!(config.budget(), Duration::from_secs(1000));

    let start = tokio::time::Instant::now();
    let mut out = Vec::new();
    let err = wait_for_completion(&jobs, &JobHandle::new("job-1"), &config, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, HuginnError::JobTimeout { attempts: 100, .. }));
    assert_eq!(jobs.query_count(), 100);
    let elapsed = start.elapsed();
    assert!(elapsed >= config.budget(), "waited {elapsed:?}");
    assert!(elapsed < config.budget() + Duration::from_secs(1), "waited {elapsed:?}");

    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.matches("In Progress...").count(), 100);
    assert!(out.ends_with("Job Timeout.\n"));
}
