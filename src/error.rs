use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be interpreted (e.g. `records` is not a list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// More records than the renderer accepts. Nothing is rendered.
    #[error("too many records: {count} exceeds the limit of {cap}")]
    TooManyRecords { count: usize, cap: usize },

    /// Font or shaping data could not be loaded. Fatal at startup.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}
