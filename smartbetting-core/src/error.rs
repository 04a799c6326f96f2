//! Error types for the smartbetting core.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering configuration, the balldontlie API, record transformation, object
//! storage and the pipeline driver.

use crate::pipeline::PipelineStage;

/// Top-level error type for the smartbetting core library.
#[derive(Debug, thiserror::Error)]
pub enum SmartbettingError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} environment variable is required")]
    EnvVarMissing { var: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Coarse category of an [`ApiError`], for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Authentication,
    RateLimited,
    Validation,
    NotFound,
    Server,
    General,
    Unexpected,
}

/// Errors from the balldontlie API.
///
/// Every HTTP-level variant carries the status code and the raw response
/// details so log lines can report both.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid API key. Status: {status}, Details: {details}")]
    Authentication { status: u16, details: String },

    #[error("Rate limit exceeded. Status: {status}, Details: {details}")]
    RateLimited { status: u16, details: String },

    #[error("Invalid request parameters. Status: {status}, Details: {details}")]
    Validation { status: u16, details: String },

    #[error("Resource not found. Status: {status}, Details: {details}")]
    NotFound { status: u16, details: String },

    #[error("API server error. Status: {status}, Details: {details}")]
    Server { status: u16, details: String },

    #[error("General API error. Status: {status}, Details: {details}")]
    General { status: u16, details: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl ApiError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, details: impl Into<String>) -> Self {
        let details = details.into();
        match status {
            400 => ApiError::Validation { status, details },
            401 => ApiError::Authentication { status, details },
            404 => ApiError::NotFound { status, details },
            429 => ApiError::RateLimited { status, details },
            s if s >= 500 => ApiError::Server { status, details },
            _ => ApiError::General { status, details },
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Authentication { .. } => ApiErrorKind::Authentication,
            ApiError::RateLimited { .. } => ApiErrorKind::RateLimited,
            ApiError::Validation { .. } => ApiErrorKind::Validation,
            ApiError::NotFound { .. } => ApiErrorKind::NotFound,
            ApiError::Server { .. } => ApiErrorKind::Server,
            ApiError::General { .. } => ApiErrorKind::General,
            ApiError::Unexpected { .. } => ApiErrorKind::Unexpected,
        }
    }

    /// HTTP status code, when the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { status, .. }
            | ApiError::RateLimited { status, .. }
            | ApiError::Validation { status, .. }
            | ApiError::NotFound { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::General { status, .. } => Some(*status),
            ApiError::Unexpected { .. } => None,
        }
    }
}

/// Errors from converting records into plain mappings.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Record {index} is not an object (found {found})")]
    NotAnObject { index: usize, found: &'static str },

    #[error("Record {index} could not be converted: {message}")]
    Extraction { index: usize, message: String },
}

/// Errors from the object store sink.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage configuration error for bucket '{bucket}': {source}")]
    Config {
        bucket: String,
        source: object_store::Error,
    },

    #[error("Failed to write s3://{bucket}/{key}: {source}")]
    ObjectStore {
        bucket: String,
        key: String,
        source: object_store::Error,
    },
}

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to fetch teams data from API")]
    FetchFailed,

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PipelineError {
    /// The stage the run was in when this error aborted it.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::FetchFailed => PipelineStage::Fetch,
            PipelineError::Transform(_) => PipelineStage::Transform,
            PipelineError::Serialization(_) => PipelineStage::Serialize,
            PipelineError::Storage(_) => PipelineStage::Upload,
        }
    }
}

/// A type alias for results using the top-level `SmartbettingError`.
pub type Result<T> = std::result::Result<T, SmartbettingError>;
