use thiserror::Error;

/// Main error type for azbucket operations
#[derive(Debug, Error)]
pub enum AzbucketError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Azure API error: {0}")]
    AzureApiError(String),

    #[error("Blob not found: {name}")]
    BlobNotFound { name: String },

    #[error("Local file error: {0}")]
    LocalFileError(String),

    #[error("Invalid base64 payload: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration loading error: {0}")]
    ConfigLoadError(#[from] config::ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AzbucketError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn azure_api<S: Into<String>>(msg: S) -> Self {
        Self::AzureApiError(msg.into())
    }

    pub fn blob_not_found<S: Into<String>>(name: S) -> Self {
        Self::BlobNotFound { name: name.into() }
    }

    pub fn local_file<S: Into<String>>(msg: S) -> Self {
        Self::LocalFileError(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unknown<S: Into<String>>(msg: S) -> Self {
        Self::Unknown(msg.into())
    }
}

/// Result type alias for azbucket operations
pub type Result<T> = std::result::Result<T, AzbucketError>;

/// Convert Azure Core errors to AzbucketError
impl From<azure_core::Error> for AzbucketError {
    fn from(error: azure_core::Error) -> Self {
        Self::AzureApiError(error.to_string())
    }
}
