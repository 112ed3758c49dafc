//! Error types for EcoMetrics

use thiserror::Error;

/// Main error type for EcoMetrics operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Empty geometry")]
    EmptyGeometry,

    #[error("Unknown land-cover class code: {0}")]
    UnknownLandCoverClass(u16),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{service} error: {reason}")]
    RemoteService {
        service: &'static str,
        reason: String,
    },

    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Coarse fault category, used by callers to decide on retries.
///
/// Only [`ErrorKind::RemoteService`] faults are worth retrying, and the
/// engine never retries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed AOI, bad parameter or configuration.
    Input,
    /// Network error, rate limit, malformed response.
    RemoteService,
    /// Upstream schema drift, e.g. an unknown land-cover code.
    DataIntegrity,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidGeometry(_)
            | Error::EmptyGeometry
            | Error::InvalidParameter { .. }
            | Error::Config(_)
            | Error::Other(_) => ErrorKind::Input,
            Error::RemoteService { .. } | Error::MalformedResponse(_) => ErrorKind::RemoteService,
            Error::UnknownLandCoverClass(_) => ErrorKind::DataIntegrity,
        }
    }

    /// Whether the caller may retry the failed call.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::RemoteService
    }

    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for EcoMetrics operations
pub type Result<T> = std::result::Result<T, Error>;
