//! Telemetry metric name constants.
//!
//! Centralised metric names for huginn runs. Consumers install their own
//! `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `stage` — workflow stage (e.g. "upload", "poll", "extract")
//! - `status` — outcome: "ok" or "error", or the observed job status

/// Stage duration in seconds.
///
/// Labels: `stage`, `status` ("ok" | "error").
pub const STAGE_DURATION_SECONDS: &str = "huginn_stage_duration_seconds";

/// Total job status queries issued by the poller.
///
/// Labels: `status` (job status observed, or "error").
pub const POLLS_TOTAL: &str = "huginn_polls_total";

/// Total result documents decoded from the archive.
pub const DOCUMENTS_TOTAL: &str = "huginn_documents_total";

/// Total entity lines printed after ranking.
pub const ENTITIES_PRINTED_TOTAL: &str = "huginn_entities_printed_total";
