//! Integration tests for the teams snapshot pipeline.
//!
//! These tests run the full fetch → transform → serialize → upload cycle with
//! MockTeamsSource and MemorySink standing in for balldontlie and S3.

mod common;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use common::{LogCapture, celtics, hawks};
use pretty_assertions::assert_eq;
use smartbetting_core::error::PipelineError;
use smartbetting_core::{
    JSON_CONTENT_TYPE, MemorySink, MockTeamsSource, ObjectSink, PipelineStage, StorageError,
    TeamsPipeline,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const KEY: &str = "nba/bronze/teams/teams_2024-01-15.json";

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

/// Sink whose every write is rejected by the store.
#[derive(Default)]
struct RejectingSink {
    attempts: AtomicUsize,
}

#[async_trait]
impl ObjectSink for RejectingSink {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        _body: Bytes,
        _content_type: &'static str,
    ) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::ObjectStore {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: object_store::Error::NotFound {
                path: key.to_string(),
                source: "no such bucket".into(),
            },
        })
    }
}

#[tokio::test]
async fn test_two_teams_uploaded_to_dated_key() {
    let (logs, _guard) = LogCapture::install();
    let source = Arc::new(MockTeamsSource::with_teams(vec![hawks(), celtics()]));
    let sink = Arc::new(MemorySink::new());
    let pipeline = TeamsPipeline::bronze_teams(source.clone(), sink.clone());

    let report = pipeline.run_on(run_date()).await.unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.key, KEY);
    assert_eq!(source.calls(), 1);
    assert_eq!(sink.puts(), 1);
    assert_eq!(sink.keys("lake-smartbetting").await.unwrap(), vec![KEY.to_string()]);

    let object = sink.get_object("lake-smartbetting", KEY).await.unwrap();
    assert_eq!(object.content_type.as_deref(), Some(JSON_CONTENT_TYPE));

    let parsed: serde_json::Value = serde_json::from_str(&object.text()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["full_name"], "Atlanta Hawks");
    assert_eq!(rows[1]["abbreviation"], "BOS");

    let output = logs.contents();
    assert!(output.contains("Getting teams..."));
    assert!(output.contains("Converting object to dict..."));
    assert!(output.contains("Converting to JSON..."));
    assert!(output.contains("Uploading JSON to S3..."));
    assert!(output.contains("JSON uploaded to S3!!!"));
    assert!(output.contains("Successfully processed and uploaded 2 teams to S3"));
}

#[tokio::test]
async fn test_uploaded_text_is_pretty_printed() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = TeamsPipeline::bronze_teams(
        Arc::new(MockTeamsSource::with_teams(vec![hawks()])),
        sink.clone(),
    );
    pipeline.run_on(run_date()).await.unwrap();

    let text = sink
        .get_object("lake-smartbetting", KEY)
        .await
        .unwrap()
        .text();
    let expected = r#"[
  {
    "id": 1,
    "conference": "East",
    "division": "Southeast",
    "city": "Atlanta",
    "name": "Hawks",
    "full_name": "Atlanta Hawks",
    "abbreviation": "ATL"
  }
]"#;
    assert_eq!(text, expected);
}

#[tokio::test]
async fn test_fetch_failure_reports_error_and_skips_upload() {
    let (logs, _guard) = LogCapture::install();
    let sink = Arc::new(MemorySink::new());
    let pipeline = TeamsPipeline::bronze_teams(
        Arc::new(MockTeamsSource::failing_with_status(500, "upstream down")),
        sink.clone(),
    );

    let err = pipeline.run_on(run_date()).await.unwrap_err();

    assert!(matches!(err, PipelineError::FetchFailed));
    assert_eq!(err.stage(), PipelineStage::Fetch);
    assert!(err.to_string().contains("Failed to fetch teams data"));
    assert_eq!(sink.puts(), 0);
    assert!(sink.keys("lake-smartbetting").await.unwrap().is_empty());

    let output = logs.contents();
    assert!(output.contains("API server error. Status: 500, Details: upstream down"));
    assert!(output.contains("Error in teams data pipeline: Failed to fetch teams data from API"));
}

#[tokio::test]
async fn test_unexpected_source_failure_skips_upload() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = TeamsPipeline::bronze_teams(
        Arc::new(MockTeamsSource::failing_unexpectedly("connection reset")),
        sink.clone(),
    );

    let err = pipeline.run_on(run_date()).await.unwrap_err();
    assert!(matches!(err, PipelineError::FetchFailed));
    assert_eq!(sink.puts(), 0);
}

#[tokio::test]
async fn test_rerun_same_day_overwrites() {
    let sink = Arc::new(MemorySink::new());
    let source = Arc::new(MockTeamsSource::with_teams(vec![hawks(), celtics()]));
    source.queue(Ok(vec![hawks()]));
    let pipeline = TeamsPipeline::bronze_teams(source, sink.clone());

    assert_eq!(pipeline.run_on(run_date()).await.unwrap().records, 1);
    assert_eq!(pipeline.run_on(run_date()).await.unwrap().records, 2);

    assert_eq!(sink.puts(), 2);
    assert_eq!(sink.keys("lake-smartbetting").await.unwrap(), vec![KEY.to_string()]);
    let text = sink
        .get_object("lake-smartbetting", KEY)
        .await
        .unwrap()
        .text();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[tokio::test]
async fn test_different_days_write_different_objects() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = TeamsPipeline::bronze_teams(
        Arc::new(MockTeamsSource::with_teams(vec![hawks()])),
        sink.clone(),
    );

    pipeline.run_on(run_date()).await.unwrap();
    pipeline
        .run_on(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap())
        .await
        .unwrap();

    assert_eq!(
        sink.keys("lake-smartbetting").await.unwrap(),
        vec![
            KEY.to_string(),
            "nba/bronze/teams/teams_2024-01-16.json".to_string()
        ]
    );
}

#[tokio::test]
async fn test_upload_failure_reports_error() {
    let (logs, _guard) = LogCapture::install();
    let sink = Arc::new(RejectingSink::default());
    let pipeline = TeamsPipeline::bronze_teams(
        Arc::new(MockTeamsSource::with_teams(vec![hawks(), celtics()])),
        sink.clone(),
    );

    let err = pipeline.run_on(run_date()).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Storage(StorageError::ObjectStore { .. })
    ));
    assert_eq!(err.stage(), PipelineStage::Upload);
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);

    let output = logs.contents();
    assert!(output.contains("Uploading JSON to S3..."));
    assert!(!output.contains("JSON uploaded to S3!!!"));
    assert!(!output.contains("Successfully processed"));
    assert!(output.contains(&format!(
        "Error in teams data pipeline: Failed to write s3://lake-smartbetting/{KEY}"
    )));
}
