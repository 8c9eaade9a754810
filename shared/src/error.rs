use thiserror::Error;

/// A request that did not produce a usable payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0} s")]
    Timeout(u64),
    /// Non-2xx answer; `message` is whatever the server said, or `HTTP <code>`.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Server did not return JSON")]
    NotJson,
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// The classifier answered but flagged the prediction as failed.
    #[error("{0}")]
    Rejected(String),
}

/// Checks that fail before any request is made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please choose an image first.")]
    NoSelection,
    #[error("Only JPG or PNG images are allowed.")]
    UnsupportedType(String),
    #[error("File too large (max 10 MB).")]
    TooLarge { size: u64, limit: u64 },
    #[error("No base64 data from picker. Try reselecting the image.")]
    MissingPayload,
    #[error("Image data is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("No upload encoder registered for {0}")]
    NoEncoder(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// The text shown in place of a result.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_show_only_the_server_message() {
        let err = ClientError::from(FetchError::Status {
            status: 500,
            message: "model not loaded".into(),
        });
        assert_eq!(err.user_message(), "model not loaded");
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_messages_match_the_form_copy() {
        let err = ClientError::from(ValidationError::TooLarge {
            size: 15 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        });
        assert_eq!(err.user_message(), "File too large (max 10 MB).");
        assert!(err.is_validation());
    }
}
