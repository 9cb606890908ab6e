use thiserror::Error;

/// Outcome of a failed collaborator call that supports cancellation
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request was cancelled by its owner; not a failure
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Request(#[from] anyhow::Error),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
