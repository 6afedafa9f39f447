//! Error types shared by the blob storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`BlobDaoError`] failures.
pub type BlobResult<T> = Result<T, BlobDaoError>;

/// Failures that can occur while interacting with the blob store.
#[derive(Debug, Error)]
pub enum BlobDaoError {
    /// Required environment variable is missing.
    #[error("missing blob store environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build blob store client")]
    ClientBuilder {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// A request to an endpoint could not be sent.
    #[error("failed to send blob store request to `{endpoint}`")]
    RequestSend {
        /// API endpoint of the failed request.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The store returned an unexpected status code.
    #[error("unexpected blob store response status {status} for `{endpoint}`")]
    RequestStatus {
        /// API endpoint of the failed request.
        endpoint: String,
        /// Status code the store answered with.
        status: StatusCode,
    },
    /// The requested document does not exist.
    #[error("blob `{path}` not found")]
    NotFound {
        /// Path of the missing document.
        path: String,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode blob store response for `{endpoint}`")]
    DecodeResponse {
        /// API endpoint of the failed request.
        endpoint: String,
        /// Underlying decoding error.
        #[source]
        source: reqwest::Error,
    },
    /// Decoding the session table document failed.
    #[error("failed to deserialize session table at `{path}`")]
    DeserializeSessions {
        /// Path of the malformed document.
        path: String,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },
}

impl From<BlobDaoError> for StorageError {
    fn from(err: BlobDaoError) -> Self {
        match err {
            BlobDaoError::DeserializeSessions { .. } => {
                StorageError::malformed(err.to_string(), err)
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
