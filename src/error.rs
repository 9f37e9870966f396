use thiserror::Error;

/// Failures that abort a batch. A malformed response body is deliberately
/// not represented here: it degrades to a [`crate::normalize::ResultRecord::Failure`]
/// on the success path so the caller can always inspect what the service
/// actually returned.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Missing credential or an otherwise unusable batch request. Raised
    /// before any file or network I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A source file could not be read. Aborts assembly of the whole
    /// batch; there is no partial submission.
    #[error("failed to read document {name}: {source}")]
    DocumentRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The remote call itself failed (network, auth, quota, service-side
    /// fault). Surfaced verbatim; never retried here.
    #[error("inference request failed: {0}")]
    Inference(String),
}

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;
