//! Errors raised while talking to the content API

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Content API answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("No {doc_type} document with uid {uid:?}")]
    NotFound { doc_type: String, uid: String },

    #[error("Content API at {0} has no master ref")]
    MissingRef(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    /// Whether the error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
