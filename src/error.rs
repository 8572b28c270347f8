//! Error types for auto-displaystyle.
//!
//! Usage guards (enabling twice, disabling twice) are not errors; the
//! controller reports them as no-ops.

use thiserror::Error;

/// Errors that can occur while intercepting or refreshing math rendering.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The host has no math render entry point to wrap.
    #[error("math render entry point is not available")]
    EntryPointUnavailable,

    /// A single view failed to refresh.
    #[error("view `{view}` could not be refreshed: {message}")]
    View {
        /// Host label of the view
        view: String,
        /// What went wrong
        message: String,
    },

    /// Settings could not be encoded or decoded.
    #[error("settings error: {0}")]
    Settings(String),

    /// Settings storage failed.
    #[error("settings storage: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for auto-displaystyle operations.
pub type StyleResult<T> = Result<T, StyleError>;

impl StyleError {
    /// Create a view refresh error.
    pub fn view(view: impl Into<String>, message: impl Into<String>) -> Self {
        Self::View {
            view: view.into(),
            message: message.into(),
        }
    }

    /// Create a settings error from any error type.
    pub fn settings(err: impl std::error::Error) -> Self {
        Self::Settings(err.to_string())
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(err: serde_json::Error) -> Self {
        Self::settings(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StyleError::EntryPointUnavailable;
        assert_eq!(err.to_string(), "math render entry point is not available");

        let err = StyleError::view("notes.md", "view closed");
        assert_eq!(err.to_string(), "view `notes.md` could not be refreshed: view closed");
    }

    #[test]
    fn test_json_error_converts() {
        let err: StyleError = serde_json::from_str::<bool>("nope").unwrap_err().into();
        assert!(matches!(err, StyleError::Settings(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StyleError>();
    }
}
