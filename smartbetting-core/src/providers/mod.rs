//! Data-source provider implementations.
//!
//! Provides concrete implementations of the `TeamsSource` trait. Use
//! `create_source()` to build the configured one.

pub mod balldontlie;

use crate::config::ApiConfig;
use crate::error::ConfigError;
use crate::source::TeamsSource;
use std::sync::Arc;

pub use balldontlie::BalldontlieProvider;

/// Build the teams source described by `config`.
///
/// Fails before any network call when the API key cannot be resolved.
pub fn create_source(config: &ApiConfig) -> Result<Arc<dyn TeamsSource>, ConfigError> {
    let provider = BalldontlieProvider::new(config)?;
    tracing::debug!(base_url = provider.base_url(), "Created balldontlie source");
    Ok(Arc::new(provider))
}
