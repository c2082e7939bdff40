use crate::types::SourceId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Projection failed for source {source_id}: {reason}")]
    ProjectionFailed { source_id: SourceId, reason: String },

    #[error("Source not found: {0}")]
    SourceNotFound(SourceId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand used by transport implementations when a project request
    /// does not succeed.
    pub fn projection_failed(source_id: &SourceId, reason: impl Into<String>) -> Self {
        Self::ProjectionFailed {
            source_id: source_id.clone(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::projection_failed(&SourceId::from("cam-1"), "ICE restart timed out");
        let msg = err.to_string();
        assert!(msg.contains("cam-1"));
        assert!(msg.contains("ICE restart timed out"));

        let err = Error::SourceNotFound(SourceId::from("cam-9"));
        assert!(err.to_string().contains("cam-9"));
    }
}
