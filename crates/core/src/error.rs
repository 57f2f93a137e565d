use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("endpoint must be an http or https url: {0}")]
    UnsupportedEndpoint(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },
}

impl SearchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SearchError::Http(error) if error.is_timeout())
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
