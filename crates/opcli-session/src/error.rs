use thiserror::Error;

use crate::directory::DirectoryError;
use crate::runner::ProcessFailure;

/// Errors surfaced by sign-in and account resolution.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The signin process ended in failure. `diagnostics` is the stderr text
    /// collected during the run.
    #[error("unauthorized: {diagnostics} ({cause})")]
    Unauthorized {
        diagnostics: String,
        #[source]
        cause: ProcessFailure,
    },

    #[error("account not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    DirectoryUnreadable(#[from] DirectoryError),
}

impl SessionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        let err = SessionError::Unauthorized {
            diagnostics: "ERROR: invalid credentials".to_string(),
            cause: ProcessFailure::Lost,
        };
        assert!(err.is_unauthorized());
        assert!(!SessionError::NotFound("A3-AAAAAA".to_string()).is_unauthorized());
    }
}
