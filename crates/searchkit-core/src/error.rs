use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller handed over something inconsistent (payload without type,
    /// zero page size, write item without routing). Never retried.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Search engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Search engine rejected request ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// Accepted documents of the batch remain written.
    #[error("Bulk request rejected {failed} of {total} documents")]
    PartialBatch { failed: usize, total: usize },
}

impl Error {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
