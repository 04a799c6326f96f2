//! The teams data source and its failure downgrade.
//!
//! [`TeamsSource`] is the tagged interface: it returns the records or an
//! [`ApiError`] naming what went wrong. [`fetch_teams`] wraps it with the
//! pipeline's contract, where every API failure is logged and collapsed into
//! `None`. An empty list and a failed call are therefore only told apart by
//! the log; callers that need to branch on the failure kind should call
//! `list_teams` directly.

use crate::error::ApiError;
use crate::types::Team;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{error, info};

/// Anything that can list all NBA teams.
#[async_trait]
pub trait TeamsSource: Send + Sync {
    /// List every team in one call.
    async fn list_teams(&self) -> Result<Vec<Team>, ApiError>;

    /// Short name used in log fields.
    fn name(&self) -> &str;
}

/// Fetch all teams, logging and swallowing any API error.
pub async fn fetch_teams(source: &dyn TeamsSource) -> Option<Vec<Team>> {
    info!(source = source.name(), "Getting teams...");
    match source.list_teams().await {
        Ok(teams) => {
            info!(source = source.name(), records = teams.len(), "Fetched teams");
            Some(teams)
        }
        Err(e) => {
            log_api_error(source.name(), &e);
            None
        }
    }
}

fn log_api_error(source: &str, err: &ApiError) {
    match err.status_code() {
        Some(status) => error!(source, status, kind = ?err.kind(), "{}", err),
        None => error!(source, kind = ?err.kind(), "{}", err),
    }
}

/// A scripted [`TeamsSource`] for tests and dry runs.
///
/// Queued results are returned in order. Once the queue is drained the
/// fallback result is cloned for every further call.
pub struct MockTeamsSource {
    queued: Mutex<Vec<Result<Vec<Team>, ApiError>>>,
    fallback: Result<Vec<Team>, MockFailure>,
    calls: AtomicUsize,
}

/// Cloneable description of a scripted failure.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Status { status: u16, details: String },
    Unexpected { message: String },
}

impl MockFailure {
    fn to_error(&self) -> ApiError {
        match self {
            MockFailure::Status { status, details } => {
                ApiError::from_status(*status, details.clone())
            }
            MockFailure::Unexpected { message } => ApiError::Unexpected {
                message: message.clone(),
            },
        }
    }
}

impl MockTeamsSource {
    /// A source that always returns the given teams.
    pub fn with_teams(teams: Vec<Team>) -> Self {
        Self {
            queued: Mutex::new(Vec::new()),
            fallback: Ok(teams),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose every call fails with the given HTTP status.
    pub fn failing_with_status(status: u16, details: &str) -> Self {
        Self {
            queued: Mutex::new(Vec::new()),
            fallback: Err(MockFailure::Status {
                status,
                details: details.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose every call fails before any response is received.
    pub fn failing_unexpectedly(message: &str) -> Self {
        Self {
            queued: Mutex::new(Vec::new()),
            fallback: Err(MockFailure::Unexpected {
                message: message.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a one-off result ahead of the fallback.
    pub fn queue(&self, result: Result<Vec<Team>, ApiError>) {
        if let Ok(mut queued) = self.queued.lock() {
            queued.insert(0, result);
        }
    }

    /// Number of `list_teams` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TeamsSource for MockTeamsSource {
    async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.queued.lock().ok().and_then(|mut q| q.pop()) {
            return result;
        }
        match &self.fallback {
            Ok(teams) => Ok(teams.clone()),
            Err(failure) => Err(failure.to_error()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;

    fn hawks() -> Team {
        Team::new(1, "East", "Southeast", "Atlanta", "Hawks", "Atlanta Hawks", "ATL")
    }

    #[tokio::test]
    async fn test_fetch_teams_success() {
        let source = MockTeamsSource::with_teams(vec![hawks()]);
        let teams = fetch_teams(&source).await.unwrap();
        assert_eq!(teams, vec![hawks()]);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_teams_empty_list_is_some() {
        let source = MockTeamsSource::with_teams(Vec::new());
        assert_eq!(fetch_teams(&source).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_fetch_teams_downgrades_every_status_category() {
        for status in [400u16, 401, 404, 429, 500, 503, 403] {
            let source = MockTeamsSource::failing_with_status(status, "boom");
            assert!(
                fetch_teams(&source).await.is_none(),
                "status {status} should downgrade to None"
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_teams_downgrades_unexpected() {
        let source = MockTeamsSource::failing_unexpectedly("dns failure");
        assert!(fetch_teams(&source).await.is_none());
    }

    #[tokio::test]
    async fn test_list_teams_keeps_failure_kind() {
        let source = MockTeamsSource::failing_with_status(429, "slow down");
        let err = source.list_teams().await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::RateLimited);
        assert_eq!(err.status_code(), Some(429));
    }

    #[tokio::test]
    async fn test_queued_results_come_first() {
        let source = MockTeamsSource::with_teams(vec![hawks()]);
        source.queue(Err(ApiError::from_status(500, "down")));
        assert!(source.list_teams().await.is_err());
        assert_eq!(source.list_teams().await.unwrap().len(), 1);
        assert_eq!(source.calls(), 2);
    }
}
