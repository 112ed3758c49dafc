//! Error types for the remote service clients.

use thiserror::Error;

/// Errors produced by the GBIF client and raster-service parsing.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("parsing response: {0}")]
    Parse(String),

    #[error("rate limited by the remote service")]
    RateLimited,

    #[error("core error: {0}")]
    Core(#[from] ecometrics_core::Error),
}

impl CloudError {
    /// Transient faults a caller may retry. Client errors other than 429
    /// will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            CloudError::Http(_) | CloudError::Network(_) | CloudError::RateLimited => true,
            CloudError::Status { status, .. } => *status >= 500,
            CloudError::Parse(_) => false,
            CloudError::Core(e) => e.is_retryable(),
        }
    }
}

/// Result alias for cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;

/// Convert a client error into a remote-service fault of `service`.
pub(crate) fn into_core(service: &'static str, err: CloudError) -> ecometrics_core::Error {
    match err {
        CloudError::Core(e) => e,
        CloudError::Parse(reason) => ecometrics_core::Error::MalformedResponse(reason),
        other => ecometrics_core::Error::RemoteService {
            service,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecometrics_core::ErrorKind;

    #[test]
    fn test_retryable() {
        assert!(CloudError::RateLimited.is_retryable());
        let unavailable = CloudError::Status {
            status: 503,
            body: String::new(),
        };
        let bad_request = CloudError::Status {
            status: 400,
            body: String::new(),
        };
        assert!(unavailable.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(!CloudError::Parse("x".into()).is_retryable());
    }

    #[test]
    fn test_into_core_keeps_kind() {
        let e = into_core("GBIF", CloudError::RateLimited);
        assert_eq!(e.kind(), ErrorKind::RemoteService);
        assert!(e.to_string().contains("GBIF"));

        let e = into_core("GBIF", CloudError::Parse("bad json".into()));
        assert!(matches!(e, ecometrics_core::Error::MalformedResponse(_)));

        let e = into_core("GBIF", CloudError::Core(ecometrics_core::Error::EmptyGeometry));
        assert_eq!(e.kind(), ErrorKind::Input);
    }
}
