//! Error types for repofs.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during contents API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured template or URL does not resolve to a usable base URL.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Token not found.
    #[error("no API token found - set it in the config or the token environment variable")]
    NoToken,

    /// Token contains bytes that cannot be sent in an HTTP header.
    #[error("API token is not a valid header value")]
    InvalidToken,

    /// Authentication failed.
    #[error("authentication failed - check that the token is valid and has repository access")]
    AuthenticationFailed,

    /// API rate limit exceeded.
    #[error("API rate limit exceeded - wait and try again")]
    RateLimited,

    /// The file does not exist at the given path.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The file exists and overwriting was not allowed.
    #[error("file already exists: {0} (pass overwrite to replace it)")]
    FileExists(String),

    /// The path names a directory or other non-file entry.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// The path names a file where a directory listing was expected.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Tree listing exceeded the configured entry limit.
    #[error("tree listing exceeded {limit} entries")]
    TreeTooLarge { limit: usize },

    /// The new file was written but the old one could not be deleted.
    ///
    /// `rolled_back` reports whether the copy at `to` was removed again;
    /// when it is `false` the file exists at both paths.
    #[error("rename {from} -> {to} incomplete (rolled back: {rolled_back}): {source}")]
    RenameIncomplete {
        from: String,
        to: String,
        rolled_back: bool,
        #[source]
        source: Box<Error>,
    },

    /// API error with status code.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Network error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// File content was not valid base64.
    #[error("failed to decode file content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// File content was not valid UTF-8 text.
    #[error("file content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Whether the platform reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::ApiError { status: 404, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(Error::FileNotFound("a.txt".into()).is_not_found());
        assert!(
            Error::ApiError {
                status: 404,
                message: "Not Found".into()
            }
            .is_not_found()
        );
        assert!(
            !Error::ApiError {
                status: 500,
                message: String::new()
            }
            .is_not_found()
        );
        assert!(!Error::FileExists("a.txt".into()).is_not_found());
    }

    #[test]
    fn test_rename_incomplete_message() {
        let err = Error::RenameIncomplete {
            from: "a.txt".into(),
            to: "b.txt".into(),
            rolled_back: false,
            source: Box::new(Error::RateLimited),
        };
        let msg = err.to_string();
        assert!(msg.contains("a.txt -> b.txt"));
        assert!(msg.contains("rolled back: false"));
    }
}
