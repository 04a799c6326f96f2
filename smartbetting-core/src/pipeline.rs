//! The teams snapshot pipeline.
//!
//! A run moves through four stages in order: Fetch → Transform → Serialize →
//! Upload. It ends in one of two states. On Success every record landed in
//! the destination object. On Failure the first failing stage aborted the
//! run and its error is returned. No stage is retried or skipped, and there
//! is no partial success.

use crate::convert::{records_to_mappings, to_json_text};
use crate::error::PipelineError;
use crate::lake::{Bucket, Catalog, DestinationKey, Schema, Table};
use crate::source::{TeamsSource, fetch_teams};
use crate::storage::{ObjectSink, upload};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fetch,
    Transform,
    Serialize,
    Upload,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Fetch => write!(f, "fetch"),
            PipelineStage::Transform => write!(f, "transform"),
            PipelineStage::Serialize => write!(f, "serialize"),
            PipelineStage::Upload => write!(f, "upload"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Number of team records written.
    pub records: usize,
    pub bucket: String,
    pub key: String,
    /// Size of the uploaded JSON text in bytes.
    pub bytes: usize,
}

/// Fetches teams from a source and writes a dated JSON snapshot to a sink.
pub struct TeamsPipeline {
    source: Arc<dyn TeamsSource>,
    sink: Arc<dyn ObjectSink>,
    bucket: Bucket,
    catalog: Catalog,
    schema: Schema,
    table: Table,
}

impl TeamsPipeline {
    pub fn new(
        source: Arc<dyn TeamsSource>,
        sink: Arc<dyn ObjectSink>,
        bucket: Bucket,
        catalog: Catalog,
        schema: Schema,
        table: Table,
    ) -> Self {
        Self {
            source,
            sink,
            bucket,
            catalog,
            schema,
            table,
        }
    }

    /// The NBA teams table in the bronze layer of the smartbetting lake.
    pub fn bronze_teams(source: Arc<dyn TeamsSource>, sink: Arc<dyn ObjectSink>) -> Self {
        Self::new(
            source,
            sink,
            Bucket::LakeSmartbetting,
            Catalog::Nba,
            Schema::Bronze,
            Table::Teams,
        )
    }

    /// Destination key for a snapshot taken on `date`.
    pub fn destination_key(&self, date: NaiveDate) -> DestinationKey {
        DestinationKey::new(self.catalog, self.schema, self.table, date)
    }

    /// Run once, dated with today's local calendar date.
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        self.run_on(chrono::Local::now().date_naive()).await
    }

    /// Run once, dated with `date`.
    pub async fn run_on(&self, date: NaiveDate) -> Result<PipelineReport, PipelineError> {
        match self.execute(date).await {
            Ok(report) => {
                info!(
                    records = report.records,
                    bucket = %report.bucket,
                    key = %report.key,
                    "Successfully processed and uploaded {} teams to S3",
                    report.records
                );
                Ok(report)
            }
            Err(e) => {
                error!(stage = %e.stage(), "Error in teams data pipeline: {}", e);
                Err(e)
            }
        }
    }

    async fn execute(&self, date: NaiveDate) -> Result<PipelineReport, PipelineError> {
        let teams = fetch_teams(self.source.as_ref())
            .await
            .ok_or(PipelineError::FetchFailed)?;

        let mappings = records_to_mappings(&teams)?;

        let json_text = to_json_text(&mappings)?;

        let key = self.destination_key(date).to_string();
        upload(self.sink.as_ref(), &json_text, self.bucket, &key).await?;

        Ok(PipelineReport {
            records: mappings.len(),
            bucket: self.bucket.to_string(),
            key,
            bytes: json_text.len(),
        })
    }
}
