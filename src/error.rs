#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CatalogError {
    /// True for failures reaching the endpoint: connection errors, timeouts
    /// and non-success status codes.
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Http(_) | CatalogError::Status { .. })
    }

    /// True when the response body was not the expected JSON shape.
    pub fn is_decode(&self) -> bool {
        matches!(self, CatalogError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
