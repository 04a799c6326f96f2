//! # smartbetting core
//!
//! Core library for the smartbetting data-lake snapshot jobs.
//! Provides the balldontlie teams source, data-lake naming constants, record
//! conversion, the object storage sink, configuration and the pipeline driver.

pub mod config;
pub mod convert;
pub mod error;
pub mod lake;
pub mod pipeline;
pub mod providers;
pub mod source;
pub mod storage;
pub mod types;

// Re-export commonly used types at the crate root.
pub use config::{ApiConfig, SmartbettingConfig, StorageConfig, load_config};
pub use convert::{Mapping, records_to_mappings, to_json_text};
pub use error::{
    ApiError, ApiErrorKind, ConfigError, PipelineError, Result, SmartbettingError, StorageError,
    TransformError,
};
pub use lake::{Bucket, Catalog, DestinationKey, Schema, Table};
pub use pipeline::{PipelineReport, PipelineStage, TeamsPipeline};
pub use providers::{BalldontlieProvider, create_source};
pub use source::{MockTeamsSource, TeamsSource, fetch_teams};
pub use storage::{JSON_CONTENT_TYPE, MemorySink, ObjectSink, S3Sink, upload};
pub use types::Team;
