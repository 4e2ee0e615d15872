//! Error types for the aula core.
//!
//! Nothing here is fatal to a consumer: every failure degrades to "no
//! data shown" plus a message. Callers get a `Result` at the boundary
//! and decide how to render the error branch.

use thiserror::Error;

/// Failure reported by the external query collaborator.
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("authentication failure: {0}")]
    Auth(String),

    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

/// A schedule window could not be fetched. The cache is left untouched
/// when this is returned.
#[derive(Error, Debug, Clone)]
#[error("failed to load schedule: {source}")]
pub struct ScheduleFetchError {
    #[from]
    source: QueryError,
}

impl ScheduleFetchError {
    /// The collaborator failure behind this error, for consumers that
    /// branch on its class (an auth failure is actionable, a transport
    /// blip is not).
    pub fn query_error(&self) -> &QueryError {
        &self.source
    }
}

/// Event definitions for a class could not be loaded. No matcher is
/// constructed in this case, so no matching is ever attempted against
/// partial data.
#[derive(Error, Debug, Clone)]
#[error("failed to load class events: {source}")]
pub struct EventLoadError {
    #[from]
    source: QueryError,
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
